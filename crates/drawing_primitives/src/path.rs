// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The path type consumed by fill and draw operations.

use crate::error::{invalid, Error};
use crate::flatten::{self, Subpath};
use peniko::kurbo::{Affine, BezPath, Circle, Ellipse, PathEl, Point, Rect, Shape, Vec2};

/// A vector path made of one or more open or closed subpaths.
///
/// Paths are immutable once constructed; drawing operations only ever borrow them.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    pub(crate) path: BezPath,
}

impl Path {
    pub fn new(path: BezPath) -> Self {
        Self { path }
    }

    /// A closed polygon through the given points.
    pub fn polygon(points: &[Point]) -> Self {
        let mut path = Self::polyline(points).path;
        if !points.is_empty() {
            path.close_path();
        }

        Self { path }
    }

    /// An open polyline through the given points.
    pub fn polyline(points: &[Point]) -> Self {
        let mut path = BezPath::new();
        let mut iter = points.iter();

        if let Some(first) = iter.next() {
            path.move_to(*first);
            for p in iter {
                path.line_to(*p);
            }
        }

        Self { path }
    }

    pub fn rect(rect: Rect) -> Self {
        Self {
            path: rect.to_path(crate::render::DEFAULT_TOLERANCE),
        }
    }

    pub fn ellipse(center: impl Into<Point>, radii: impl Into<Vec2>) -> Self {
        let ellipse = Ellipse::new(center, radii, 0.0);

        Self {
            path: ellipse.to_path(crate::render::DEFAULT_TOLERANCE),
        }
    }

    pub fn circle(center: impl Into<Point>, radius: f64) -> Self {
        Self {
            path: Circle::new(center, radius).to_path(crate::render::DEFAULT_TOLERANCE),
        }
    }

    /// The underlying bezier path.
    pub fn bez_path(&self) -> &BezPath {
        &self.path
    }

    pub fn bounding_box(&self) -> Rect {
        self.path.bounding_box()
    }

    /// Whether the path contains no point at all.
    pub fn is_empty(&self) -> bool {
        !self.path.elements().iter().any(|el| !matches!(el, PathEl::ClosePath))
    }

    /// Check that the path has points and that all of them, control points included, are
    /// representable once `affine` is applied.
    pub(crate) fn validate(&self, affine: Affine) -> Result<(), Error> {
        if self.is_empty() {
            return Err(invalid("path contains no points"));
        }

        match flatten::find_out_of_range_in(&self.path, affine) {
            Some(value) => Err(Error::OutOfRange { value }),
            None => Ok(()),
        }
    }

    /// Flatten the path after applying `affine`, rejecting paths that can't be rasterized.
    pub(crate) fn flatten(&self, affine: Affine, tolerance: f64) -> Result<Vec<Subpath>, Error> {
        self.validate(affine)?;

        Ok(flatten::flatten(&self.path, affine, tolerance))
    }
}

impl From<BezPath> for Path {
    fn from(value: BezPath) -> Self {
        Self { path: value }
    }
}

impl From<Rect> for Path {
    fn from(value: Rect) -> Self {
        Self::rect(value)
    }
}
