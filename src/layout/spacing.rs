/*
 *  layout/spacing.rs
 *
 *  PhotoGallery - responsive grid, banner aware
 *  (c) 2020-26 Stuart Hunter
 *
 *  Per-item offsets that spread grid spacing evenly across columns
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

use super::classifier::LayoutProfile;
use super::error::LayoutError;
use super::metrics::DisplayMetrics;

/// Offsets applied around one grid cell, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemOffsets {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

/// Grid spacing decoration
///
/// With `include_edge` the outer edges get a full gap as well, otherwise
/// spacing only appears between cells. Either way every column ends up
/// with the same visible width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpacing {
    span_count: u32,
    spacing_px: u32,
    include_edge: bool,
}

impl GridSpacing {
    pub fn new(span_count: u32, spacing_px: u32, include_edge: bool) -> Result<Self, LayoutError> {
        if span_count == 0 {
            return Err(LayoutError::ZeroSpan);
        }
        Ok(Self { span_count, spacing_px, include_edge })
    }

    /// Edge-inclusive decoration for a classified profile
    pub fn for_profile(profile: &LayoutProfile, display: &DisplayMetrics) -> Result<Self, LayoutError> {
        Self::new(profile.columns, display.dp_to_px(profile.spacing_dp), true)
    }

    pub fn span_count(&self) -> u32 {
        self.span_count
    }

    pub fn spacing_px(&self) -> u32 {
        self.spacing_px
    }

    /// Offsets for the item at adapter `position`
    pub fn offsets(&self, position: usize) -> ItemOffsets {
        let n = self.span_count;
        let s = self.spacing_px;
        let column = (position % n as usize) as u32;
        let first_row = position < n as usize;

        if self.include_edge {
            ItemOffsets {
                left: s - column * s / n,
                right: (column + 1) * s / n,
                top: if first_row { s } else { 0 },
                bottom: s,
            }
        } else {
            ItemOffsets {
                left: column * s / n,
                right: s - (column + 1) * s / n,
                top: if first_row { 0 } else { s },
                bottom: 0,
            }
        }
    }
}
