/*
 *  layout/classifier.rs
 *
 *  PhotoGallery - responsive grid, banner aware
 *  (c) 2020-26 Stuart Hunter
 *
 *  Screen classification and per-category grid presets
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

use super::metrics::{Orientation, ScreenMetrics};

/// Smallest side (dp) at which a screen stops being a phone
pub const LARGE_SCREEN_MIN_DP: u32 = 600;

/// Aspect ratio window treated as a near-square unfolded foldable
pub const FOLDABLE_ASPECT_MIN: f32 = 1.0;
pub const FOLDABLE_ASPECT_MAX: f32 = 1.35;

/// Side difference (dp) that still counts as near-square
pub const FOLDABLE_MAX_SIDE_DIFF_DP: u32 = 200;

/// Screen category derived from the current metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenCategory {
    /// Portrait phone (smallest side < 600dp)
    Phone,

    /// Phone turned sideways
    PhoneLandscape,

    /// Smallest side >= 600dp and clearly rectangular
    Tablet,

    /// Large and near-square, an opened foldable
    FoldableUnfolded,
}

impl fmt::Display for ScreenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScreenCategory::Phone => "PHONE",
            ScreenCategory::PhoneLandscape => "PHONE_LANDSCAPE",
            ScreenCategory::Tablet => "TABLET",
            ScreenCategory::FoldableUnfolded => "FOLDABLE_UNFOLDED",
        };
        write!(f, "{}", name)
    }
}

/// Preferred thumbnail size in dp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailSize {
    pub width_dp: u32,
    pub height_dp: u32,
}

/// Screen-level UI switches that follow from the category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenModes {
    /// List and detail shown side by side
    pub master_detail: bool,

    /// Tall toolbar with room for a subtitle
    pub extended_toolbar: bool,

    /// Search field embedded in the toolbar
    pub inline_search_bar: bool,

    /// Item descriptions shown under the title
    pub show_item_description: bool,

    /// Secondary action buttons visible on each item
    pub show_action_buttons: bool,

    /// Screen handles rotation itself instead of being recreated
    pub handles_configuration_change: bool,
}

impl ScreenModes {
    fn for_category(category: ScreenCategory) -> Self {
        use ScreenCategory::*;
        Self {
            master_detail: category == FoldableUnfolded,
            extended_toolbar: matches!(category, FoldableUnfolded | Tablet),
            inline_search_bar: category == FoldableUnfolded,
            show_item_description: category == Tablet,
            show_action_buttons: category != Phone,
            handles_configuration_change: category != Phone,
        }
    }
}

/// Grid configuration for one screen category and orientation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutProfile {
    pub category: ScreenCategory,
    pub orientation: Orientation,

    /// Screen size the profile was derived from
    pub width_dp: u32,
    pub height_dp: u32,

    /// Grid span count, always > 0
    pub columns: u32,

    /// Gap between grid cells
    pub spacing_dp: u32,

    /// Padding inside each cell
    pub item_padding_dp: u32,

    /// Margin around each cell
    pub item_margin_dp: u32,

    /// Title text size
    pub title_text_size_sp: u32,

    pub thumbnail: ThumbnailSize,

    pub modes: ScreenModes,
}

/// Classify a screen and return its grid profile.
///
/// Total over valid `ScreenMetrics`; the same metrics always produce the
/// same profile.
pub fn classify(metrics: &ScreenMetrics) -> LayoutProfile {
    let category = categorize_screen(metrics);
    match category {
        ScreenCategory::Phone => phone_layout(metrics),
        ScreenCategory::PhoneLandscape => phone_landscape_layout(metrics),
        ScreenCategory::Tablet => tablet_layout(metrics),
        ScreenCategory::FoldableUnfolded => foldable_layout(metrics),
    }
}

/// Pick the category for the metrics
pub fn categorize_screen(metrics: &ScreenMetrics) -> ScreenCategory {
    let smallest = metrics.smallest_dimension();
    if smallest >= LARGE_SCREEN_MIN_DP && is_near_square(metrics) {
        ScreenCategory::FoldableUnfolded
    } else if smallest >= LARGE_SCREEN_MIN_DP {
        ScreenCategory::Tablet
    } else if metrics.orientation().is_landscape() {
        ScreenCategory::PhoneLandscape
    } else {
        ScreenCategory::Phone
    }
}

// near-square: ratio inside the window, or sides within 200dp of each other
fn is_near_square(metrics: &ScreenMetrics) -> bool {
    let ratio = metrics.aspect_ratio();
    (FOLDABLE_ASPECT_MIN..=FOLDABLE_ASPECT_MAX).contains(&ratio)
        || metrics.side_difference() <= FOLDABLE_MAX_SIDE_DIFF_DP
}

fn base_profile(metrics: &ScreenMetrics, category: ScreenCategory) -> LayoutProfile {
    LayoutProfile {
        category,
        orientation: metrics.orientation(),
        width_dp: metrics.width_dp(),
        height_dp: metrics.height_dp(),
        columns: 3,
        spacing_dp: 8,
        item_padding_dp: 8,
        item_margin_dp: 4,
        title_text_size_sp: 14,
        thumbnail: ThumbnailSize { width_dp: 0, height_dp: 200 },
        modes: ScreenModes::for_category(category),
    }
}

/// Portrait phone, full-width thumbnails less the side padding
fn phone_layout(metrics: &ScreenMetrics) -> LayoutProfile {
    let mut layout = base_profile(metrics, ScreenCategory::Phone);
    layout.thumbnail = ThumbnailSize {
        width_dp: metrics.width_dp().saturating_sub(32),
        height_dp: 200,
    };
    layout
}

fn phone_landscape_layout(metrics: &ScreenMetrics) -> LayoutProfile {
    LayoutProfile {
        columns: 6,
        spacing_dp: 6,
        item_padding_dp: 6,
        item_margin_dp: 3,
        title_text_size_sp: 12,
        thumbnail: ThumbnailSize { width_dp: 200, height_dp: 112 },
        ..base_profile(metrics, ScreenCategory::PhoneLandscape)
    }
}

fn tablet_layout(metrics: &ScreenMetrics) -> LayoutProfile {
    let landscape = metrics.orientation().is_landscape();
    LayoutProfile {
        columns: if landscape { 6 } else { 3 },
        spacing_dp: 12,
        item_padding_dp: 12,
        item_margin_dp: 6,
        title_text_size_sp: 16,
        thumbnail: if landscape {
            ThumbnailSize { width_dp: 240, height_dp: 135 }
        } else {
            ThumbnailSize { width_dp: 320, height_dp: 180 }
        },
        ..base_profile(metrics, ScreenCategory::Tablet)
    }
}

/// Near-square viewport gains no per-item width on rotation, so the
/// column count stays at 3 in both orientations.
fn foldable_layout(metrics: &ScreenMetrics) -> LayoutProfile {
    LayoutProfile {
        columns: 3,
        spacing_dp: 10,
        item_padding_dp: 10,
        item_margin_dp: 5,
        title_text_size_sp: 15,
        thumbnail: ThumbnailSize { width_dp: 120, height_dp: 68 },
        ..base_profile(metrics, ScreenCategory::FoldableUnfolded)
    }
}

impl LayoutProfile {
    pub fn is_phone(&self) -> bool {
        matches!(self.category, ScreenCategory::Phone | ScreenCategory::PhoneLandscape)
    }

    pub fn is_tablet(&self) -> bool {
        self.category == ScreenCategory::Tablet
    }
}

impl fmt::Display for LayoutProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Screen Info:")?;
        writeln!(f, "- Type: {}", self.category)?;
        writeln!(f, "- Size: {}x{} dp", self.width_dp, self.height_dp)?;
        writeln!(f, "- Orientation: {}", self.orientation)?;
        writeln!(f, "- Grid Columns: {}", self.columns)?;
        writeln!(f, "- Master-Detail: {}", self.modes.master_detail)?;
        write!(f, "- Extended Toolbar: {}", self.modes.extended_toolbar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(w: i64, h: i64, o: Orientation) -> ScreenMetrics {
        ScreenMetrics::new(w, h, o).unwrap()
    }

    #[test]
    fn test_phone_portrait_and_rotated() {
        let p = classify(&metrics(360, 800, Orientation::Portrait));
        assert_eq!(p.category, ScreenCategory::Phone);
        assert_eq!(p.columns, 3);

        let l = classify(&metrics(800, 360, Orientation::Landscape));
        assert_eq!(l.category, ScreenCategory::PhoneLandscape);
        assert_eq!(l.columns, 6);
    }

    #[test]
    fn test_foldable_heuristic() {
        for o in [Orientation::Portrait, Orientation::Landscape] {
            let p = classify(&metrics(768, 884, o));
            assert_eq!(p.category, ScreenCategory::FoldableUnfolded);
            assert_eq!(p.columns, 3);
        }
        let rotated = classify(&metrics(884, 768, Orientation::Landscape));
        assert_eq!(rotated.category, ScreenCategory::FoldableUnfolded);
        assert_eq!(rotated.columns, 3);
    }

    #[test]
    fn test_tablet_columns_follow_orientation() {
        let p = classify(&metrics(800, 1280, Orientation::Portrait));
        assert_eq!(p.category, ScreenCategory::Tablet);
        assert_eq!(p.columns, 3);

        let l = classify(&metrics(1280, 800, Orientation::Landscape));
        assert_eq!(l.category, ScreenCategory::Tablet);
        assert_eq!(l.columns, 6);
    }

    #[test]
    fn test_near_square_edges() {
        // 1.4 ratio and 240dp apart: neither check holds
        let t = classify(&metrics(600, 840, Orientation::Portrait));
        assert_eq!(t.category, ScreenCategory::Tablet);

        // exactly 200dp apart
        let f = classify(&metrics(600, 800, Orientation::Portrait));
        assert_eq!(f.category, ScreenCategory::FoldableUnfolded);

        // exactly 1.35
        let edge = classify(&metrics(800, 1080, Orientation::Landscape));
        assert_eq!(edge.category, ScreenCategory::FoldableUnfolded);
        let past = classify(&metrics(800, 1090, Orientation::Landscape));
        assert_eq!(past.category, ScreenCategory::Tablet);
    }

    #[test]
    fn test_six_hundred_boundary() {
        let at = classify(&metrics(600, 1000, Orientation::Portrait));
        assert!(!at.is_phone());
        let at_land = classify(&metrics(1000, 600, Orientation::Landscape));
        assert!(!at_land.is_phone());

        for o in [Orientation::Portrait, Orientation::Landscape] {
            let below = classify(&metrics(599, 1000, o));
            assert!(below.is_phone());
            let square = classify(&metrics(599, 599, o));
            assert!(square.is_phone());
        }
    }

    #[test]
    fn test_preset_table() {
        let phone = classify(&metrics(360, 800, Orientation::Portrait));
        assert_eq!(
            (phone.spacing_dp, phone.item_padding_dp, phone.item_margin_dp, phone.title_text_size_sp),
            (8, 8, 4, 14)
        );
        assert_eq!(phone.thumbnail, ThumbnailSize { width_dp: 328, height_dp: 200 });

        let land = classify(&metrics(800, 360, Orientation::Landscape));
        assert_eq!(
            (land.spacing_dp, land.item_padding_dp, land.item_margin_dp, land.title_text_size_sp),
            (6, 6, 3, 12)
        );
        assert_eq!(land.thumbnail, ThumbnailSize { width_dp: 200, height_dp: 112 });

        let tab = classify(&metrics(800, 1280, Orientation::Portrait));
        assert_eq!(
            (tab.spacing_dp, tab.item_padding_dp, tab.item_margin_dp, tab.title_text_size_sp),
            (12, 12, 6, 16)
        );
        assert_eq!(tab.thumbnail, ThumbnailSize { width_dp: 320, height_dp: 180 });
        let tab_land = classify(&metrics(1280, 800, Orientation::Landscape));
        assert_eq!(tab_land.thumbnail, ThumbnailSize { width_dp: 240, height_dp: 135 });

        let fold = classify(&metrics(768, 884, Orientation::Portrait));
        assert_eq!(
            (fold.spacing_dp, fold.item_padding_dp, fold.item_margin_dp, fold.title_text_size_sp),
            (10, 10, 5, 15)
        );
        assert_eq!(fold.thumbnail, ThumbnailSize { width_dp: 120, height_dp: 68 });
    }

    #[test]
    fn test_screen_modes() {
        let fold = classify(&metrics(768, 884, Orientation::Portrait)).modes;
        assert!(fold.master_detail && fold.extended_toolbar && fold.inline_search_bar);
        assert!(!fold.show_item_description);

        let tab = classify(&metrics(800, 1280, Orientation::Portrait)).modes;
        assert!(!tab.master_detail && tab.extended_toolbar && tab.show_item_description);

        let phone = classify(&metrics(360, 800, Orientation::Portrait)).modes;
        assert!(!phone.show_action_buttons && !phone.handles_configuration_change);

        let land = classify(&metrics(800, 360, Orientation::Landscape)).modes;
        assert!(land.show_action_buttons && land.handles_configuration_change);
    }

    #[test]
    fn test_deterministic() {
        let m = metrics(412, 915, Orientation::Portrait);
        assert_eq!(classify(&m), classify(&m));
    }

    #[test]
    fn test_debug_summary() {
        let text = classify(&metrics(360, 800, Orientation::Portrait)).to_string();
        assert!(text.contains("- Type: PHONE"));
        assert!(text.contains("- Size: 360x800 dp"));
        assert!(text.contains("- Grid Columns: 3"));
    }
}
