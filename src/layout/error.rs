/*
 *  layout/error.rs
 *
 *  PhotoGallery - responsive grid, banner aware
 *  (c) 2020-26 Stuart Hunter
 *
 *  Errors raised while building screen metrics
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

use thiserror::Error;

/// Rejections raised before anything reaches the classifier.
///
/// The classifier itself never fails; every error lives at the edge where
/// raw platform numbers are turned into `ScreenMetrics`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// Width or height was zero or negative
    #[error("degenerate screen metrics: {width}x{height} dp")]
    DegenerateMetrics { width: i64, height: i64 },

    /// Density must be a finite value above zero
    #[error("invalid display density: {0}")]
    InvalidDensity(f32),

    /// A grid needs at least one column
    #[error("grid span count must be > 0")]
    ZeroSpan,
}
