/*
 *  layout/metrics.rs
 *
 *  PhotoGallery - responsive grid, banner aware
 *  (c) 2020-26 Stuart Hunter
 *
 *  Screen geometry inputs: physical display metrics and dp screen metrics
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

use super::error::LayoutError;

/// Device orientation as reported by the platform configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn is_landscape(self) -> bool {
        matches!(self, Orientation::Landscape)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => write!(f, "Portrait"),
            Orientation::Landscape => write!(f, "Landscape"),
        }
    }
}

/// Raw display metrics in physical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMetrics {
    /// Window width in pixels
    pub width_px: u32,

    /// Window height in pixels
    pub height_px: u32,

    /// Pixels per density-independent unit
    pub density: f32,
}

impl DisplayMetrics {
    pub fn new(width_px: u32, height_px: u32, density: f32) -> Result<Self, LayoutError> {
        if !density.is_finite() || density <= 0.0 {
            return Err(LayoutError::InvalidDensity(density));
        }
        Ok(Self { width_px, height_px, density })
    }

    /// Convert a dp length to whole pixels, truncating.
    pub fn dp_to_px(&self, dp: u32) -> u32 {
        (dp as f32 * self.density) as u32
    }

    /// Convert a pixel length to whole dp, truncating.
    pub fn px_to_dp(&self, px: u32) -> u32 {
        (px as f32 / self.density) as u32
    }

    /// Screen metrics in dp for the given orientation.
    ///
    /// Fails when the truncated dp size collapses to zero.
    pub fn screen_metrics(&self, orientation: Orientation) -> Result<ScreenMetrics, LayoutError> {
        ScreenMetrics::new(
            i64::from(self.px_to_dp(self.width_px)),
            i64::from(self.px_to_dp(self.height_px)),
            orientation,
        )
    }
}

/// Screen size in density-independent units, validated positive.
///
/// Fields are private so an instance always satisfies the classifier's
/// precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenMetrics {
    width_dp: u32,
    height_dp: u32,
    orientation: Orientation,
}

impl ScreenMetrics {
    pub fn new(width_dp: i64, height_dp: i64, orientation: Orientation) -> Result<Self, LayoutError> {
        if width_dp <= 0 || height_dp <= 0 || width_dp > i64::from(u32::MAX) || height_dp > i64::from(u32::MAX) {
            return Err(LayoutError::DegenerateMetrics { width: width_dp, height: height_dp });
        }
        Ok(Self {
            width_dp: width_dp as u32,
            height_dp: height_dp as u32,
            orientation,
        })
    }

    pub fn width_dp(&self) -> u32 {
        self.width_dp
    }

    pub fn height_dp(&self) -> u32 {
        self.height_dp
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn smallest_dimension(&self) -> u32 {
        self.width_dp.min(self.height_dp)
    }

    /// Long side over short side, always >= 1.0
    pub fn aspect_ratio(&self) -> f32 {
        let long = self.width_dp.max(self.height_dp) as f32;
        long / self.smallest_dimension() as f32
    }

    /// Absolute difference between the two sides in dp
    pub fn side_difference(&self) -> u32 {
        self.width_dp.abs_diff(self.height_dp)
    }
}
