/*
 *  layout/mod.rs
 *
 *  PhotoGallery - responsive grid, banner aware
 *  (c) 2020-26 Stuart Hunter
 *
 *  Responsive layout: screen metrics, classification and grid spacing
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

pub mod error;
pub mod metrics;
pub mod classifier;
pub mod spacing;

// Re-exports for convenience
pub use error::LayoutError;
pub use metrics::{DisplayMetrics, Orientation, ScreenMetrics};
pub use classifier::{classify, LayoutProfile, ScreenCategory, ScreenModes, ThumbnailSize};
pub use spacing::{GridSpacing, ItemOffsets};
