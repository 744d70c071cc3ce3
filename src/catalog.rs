/*
 *  catalog.rs
 *
 *  PhotoGallery - responsive grid, banner aware
 *  (c) 2020-26 Stuart Hunter
 *
 *  Weather imagery menu catalog shown in the gallery grid
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// What tapping an item opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActType {
    Map,
    Sub,
    Img,
    Imgs,
}

impl fmt::Display for ActType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActType::Map => "MAP",
            ActType::Sub => "SUB",
            ActType::Img => "IMG",
            ActType::Imgs => "IMGS",
        };
        f.write_str(s)
    }
}

/// One tile in the gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub act_type: ActType,
    pub title: String,
    pub kind: String,
    pub data0: String,
    pub area0: String,
    pub data1: String,
    pub area1: String,
    pub data2: String,
    pub area2: String,

    /// Key used to look up the thumbnail url
    pub api_option: String,

    /// Empty until the icon lookup fills it
    #[serde(default)]
    pub icon_url: String,
}

impl MenuItem {
    pub fn new(id: &str, act_type: ActType, title: &str) -> Self {
        Self {
            id: id.to_string(),
            act_type,
            title: title.to_string(),
            kind: String::new(),
            data0: String::new(),
            area0: String::new(),
            data1: String::new(),
            area1: String::new(),
            data2: String::new(),
            area2: String::new(),
            api_option: String::new(),
            icon_url: String::new(),
        }
    }

    pub fn has_icon(&self) -> bool {
        !self.icon_url.is_empty()
    }

    /// Case-insensitive title or kind match; an empty query matches everything
    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        q.is_empty() || self.title.to_lowercase().contains(&q) || self.kind.to_lowercase().contains(&q)
    }
}

// id, title, kind, data0, area0, data1, area1, data2, api option
type Entry = (&'static str, &'static str, &'static str, &'static str, &'static str, &'static str, &'static str, &'static str, &'static str);

const CATALOG: [Entry; 21] = [
    ("k1", "위성영상 한반도 RGB", "satellite", "true+ir", "ko020lc", "rgbt", "ko", "vis_ko", "vis_ko"),
    ("k2", "위성영상 동아시아 RGB", "satellite", "true+ir", "ea020lc", "rgbt", "ea", "vis_ea", "vis_ea"),
    ("k3", "위성영상 전구 RGB", "satellite", "true+ir", "fd020ge", "rgbt", "fd", "vis_fd", "vis_fd"),
    ("k4", "적외영상 한반도", "satellite", "ir105", "ko020lc", "ir105", "ko", "inf_ko", "inf_ko"),
    ("k5", "적외영상 동아시아", "satellite", "ir105", "ea020lc", "ir105", "ea", "inf_ea", "inf_ea"),
    ("k6", "적외영상 전구", "satellite", "ir105", "fd020ge", "ir105", "fd", "inf_fd", "inf_fd"),
    ("k7", "수증기영상 한반도", "satellite", "wv063", "ko020lc", "wv069", "ko", "wv_ko", "wv_ko"),
    ("k8", "수증기영상 동아시아", "satellite", "wv063", "ea020lc", "wv069", "ea", "wv_ea", "wv_ea"),
    ("k9", "수증기영상 전구", "satellite", "wv063", "fd020ge", "wv069", "fd", "wv_fd", "wv_fd"),
    ("k10", "레이더영상 전국합성", "radar", "", "", "", "", "composite_korea", "composite_korea"),
    ("k11", "레이더+적외 합성", "rad+inf", "", "", "", "", "composite_infrared", "composite_infrared"),
    ("k12", "지역 레이더", "local_menu", "", "", "", "", "", "composite_JNI"),
    ("k13", "레이더+카메라", "rad+camera", "", "", "", "", "composite_map", "composite_map"),
    ("k14", "강수형태", "snowrain", "", "", "", "", "snowrain_a", "snowrain_a"),
    ("k15", "기온분포도", "temperature", "", "", "", "", "temperature_a", "temperature_a"),
    ("k16", "태풍정보", "typhoon", "", "", "", "", "typhoon_a", "typhoon_a"),
    ("k17", "시정지도", "visualmap", "", "", "", "", "", ""),
    ("k18", "예보일기도", "forecast", "", "", "", "", "", ""),
    ("k19", "황사", "asiandust", "", "", "", "", "", "asiandust_a"),
    ("k20", "일기도", "weather_chart", "", "", "", "", "", "weatherchart_a"),
    ("k21", "일기예보", "weather_cast", "", "", "", "", "", ""),
];

/// The built-in gallery, in display order
pub fn default_catalog() -> Vec<MenuItem> {
    CATALOG
        .iter()
        .map(|&(id, title, kind, data0, area0, data1, area1, data2, api_option)| MenuItem {
            kind: kind.to_string(),
            data0: data0.to_string(),
            area0: area0.to_string(),
            data1: data1.to_string(),
            area1: area1.to_string(),
            data2: data2.to_string(),
            api_option: api_option.to_string(),
            ..MenuItem::new(id, ActType::Sub, title)
        })
        .collect()
}
