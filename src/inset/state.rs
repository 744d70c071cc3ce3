/*
 *  inset/state.rs
 *
 *  PhotoGallery - responsive grid, banner aware
 *  (c) 2020-26 Stuart Hunter
 *
 *  Inset inputs and outputs: ad height state, system insets, padding
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

use serde::Serialize;

/// What is known about the banner height for the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "height_px", rename_all = "lowercase")]
pub enum AdHeightState {
    /// Nothing measured yet, or a reload is pending
    #[default]
    Unknown,

    /// Banner measured at this many pixels (> 0)
    Resolved(u32),

    /// Load failed; the fallback height stands in
    Failed,
}

/// Edge insets as reported by the platform, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeInsets {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

/// Side and bottom space taken by system bars and display cutouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SystemInsets {
    pub left: u32,
    pub right: u32,
    pub bottom: u32,
}

impl SystemInsets {
    pub fn new(left: u32, right: u32, bottom: u32) -> Self {
        Self { left, right, bottom }
    }

    /// Sides take whichever of bar or cutout reaches further in; the
    /// bottom only follows the system bars.
    pub fn from_bars_and_cutout(bars: EdgeInsets, cutout: EdgeInsets) -> Self {
        Self {
            left: bars.left.max(cutout.left),
            right: bars.right.max(cutout.right),
            bottom: bars.bottom,
        }
    }
}

/// Grid content padding that keeps items clear of the banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReservedSpace {
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

/// Margins for the ad container itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AdContainerMargins {
    pub left: u32,
    pub right: u32,
    pub bottom: u32,
}

/// One emitted instruction for the view layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct InsetUpdate {
    pub grid_padding: ReservedSpace,
    pub ad_margins: AdContainerMargins,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insets_take_widest_side() {
        let bars = EdgeInsets { left: 0, top: 63, right: 126, bottom: 0 };
        let cutout = EdgeInsets { left: 84, top: 0, right: 0, bottom: 0 };
        let insets = SystemInsets::from_bars_and_cutout(bars, cutout);
        assert_eq!(insets, SystemInsets::new(84, 126, 0));
    }

    #[test]
    fn test_bottom_ignores_cutout() {
        let bars = EdgeInsets { bottom: 48, ..Default::default() };
        let cutout = EdgeInsets { bottom: 90, ..Default::default() };
        assert_eq!(SystemInsets::from_bars_and_cutout(bars, cutout).bottom, 48);
    }

    #[test]
    fn test_state_defaults_unknown() {
        assert_eq!(AdHeightState::default(), AdHeightState::Unknown);
    }
}
