// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Antialiased CPU rasterization of vector paths.
//!
//! Paths are flattened into polylines, optionally outlined by the stroker, turned into
//! per-pixel coverage by a scanline rasterizer and finally composited onto a pixel buffer
//! through a [`Brush`](paint::Brush).

#![forbid(unsafe_code)]

pub mod error;
pub mod execute;
pub mod fine;
pub mod flatten;
pub mod image_brush;
pub mod options;
pub mod paint;
pub mod path;
pub mod pattern;
pub mod pixmap;
mod rect;
pub mod render;
pub mod strip;
pub mod stroke;
mod util;

pub use peniko::*;

/// The rule deciding which points of a set of (possibly overlapping) polygons are inside.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillRule {
    /// A point is inside if a ray from it crosses the outline an odd number of times.
    #[default]
    EvenOdd,
    /// A point is inside if the signed sum of edge directions crossed by a ray is non-zero.
    NonZero,
}

impl FillRule {
    /// Whether a winding (or crossing) count denotes an inside point.
    pub fn active_fill(&self, winding: i32) -> bool {
        match self {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => winding % 2 != 0,
        }
    }
}

pub use error::{Completion, Error};
pub use execute::{CancellationToken, ExecutionMode};
pub use image_brush::{ImageBrush, ImageSource};
pub use options::{DrawingOptions, ShapeOptions};
pub use paint::{Brush, SolidBrush};
pub use path::Path;
pub use pattern::PatternBrush;
pub use pixmap::{PixelBuffer, Pixmap, Region};
pub use render::{draw_path, draw_rect, fill_path, fill_rect, fill_region, RenderContext};
pub use stroke::{EndCapStyle, JointStyle, Pen};
