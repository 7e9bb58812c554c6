// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Utilities for flattening

use peniko::kurbo::{self, Affine, BezPath};

/// Largest coordinate magnitude the rasterizer handles without losing sub-pixel precision.
pub(crate) const MAX_COORDINATE: f64 = (1 << 24) as f64;

/// A point in pixel space, as used by the rasterizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<kurbo::Point> for Point {
    fn from(value: kurbo::Point) -> Self {
        Self::new(value.x as f32, value.y as f32)
    }
}

/// This is just Line but f32
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlatLine {
    pub p0: Point,
    pub p1: Point,
}

impl FlatLine {
    pub fn new(p0: Point, p1: Point) -> Self {
        Self { p0, p1 }
    }
}

/// A flattened subpath: a polyline, or a polygon when `closed` is set, in which case the last
/// point implicitly connects back to the first one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Subpath {
    pub points: Vec<kurbo::Point>,
    pub closed: bool,
}

impl Subpath {
    pub fn new(points: Vec<kurbo::Point>, closed: bool) -> Self {
        Self { points, closed }
    }

    /// The signed area enclosed by the subpath (treating it as closed). Positive for
    /// clockwise loops in a y-down coordinate system.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }

        let mut area = 0.0;
        for i in 0..n {
            let p0 = self.points[i];
            let p1 = self.points[(i + 1) % n];
            area += p0.x * p1.y - p1.x * p0.y;
        }

        area * 0.5
    }

    /// The length of the polyline, including the closing edge if `closed` is set.
    pub fn length(&self) -> f64 {
        let open = self
            .points
            .windows(2)
            .map(|w| (w[1] - w[0]).hypot())
            .sum::<f64>();

        match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(&first), Some(&last)) => open + (first - last).hypot(),
            _ => open,
        }
    }

    /// Apply an affine transform to every point.
    pub fn transform(&mut self, affine: Affine) {
        for p in &mut self.points {
            *p = affine * *p;
        }
    }
}

/// Flatten a path into polylines.
///
/// Curves are approximated by line segments deviating at most `tolerance` from the
/// curve. Consecutive duplicate points are dropped, and a closing point equal to the start
/// point of a closed subpath is removed, since the closing edge is implicit.
pub fn flatten(path: &BezPath, affine: Affine, tolerance: f64) -> Vec<Subpath> {
    let mut subpaths = vec![];
    let mut current = Subpath::default();
    // Set when `current` only holds the start point carried over from a closed subpath.
    let mut after_close = false;

    let iter = path.iter().map(|el| affine * el);
    kurbo::flatten(iter, tolerance, |el| match el {
        kurbo::PathEl::MoveTo(p) => {
            if !after_close {
                finish(&mut subpaths, &mut current, false);
            }
            current.points.clear();
            current.points.push(p);
            after_close = false;
        }
        kurbo::PathEl::LineTo(p) => {
            if current.points.last() != Some(&p) {
                current.points.push(p);
                after_close = false;
            }
        }
        kurbo::PathEl::QuadTo(_, _) => unreachable!(),
        kurbo::PathEl::CurveTo(_, _, _) => unreachable!(),
        kurbo::PathEl::ClosePath => {
            // A new subpath after a close starts at the same point as the closed one.
            let start = current.points.first().copied();
            finish(&mut subpaths, &mut current, true);
            if let Some(start) = start {
                current.points.push(start);
                after_close = true;
            }
        }
    });

    if !after_close {
        finish(&mut subpaths, &mut current, false);
    }

    subpaths
}

fn finish(subpaths: &mut Vec<Subpath>, current: &mut Subpath, closed: bool) {
    let mut subpath = std::mem::take(current);
    if subpath.points.is_empty() {
        return;
    }

    if closed && subpath.points.len() > 1 && subpath.points.first() == subpath.points.last() {
        subpath.points.pop();
    }

    subpath.closed = closed;
    subpaths.push(subpath);
}

/// Convert subpaths into the lines of their filled area. Every subpath is treated as
/// closed, since filling an open polyline fills the polygon it spans.
pub fn fill_lines(subpaths: &[Subpath], line_buf: &mut Vec<FlatLine>) {
    line_buf.clear();

    for subpath in subpaths {
        let points = &subpath.points;
        if points.len() < 2 {
            continue;
        }

        for w in points.windows(2) {
            line_buf.push(FlatLine::new(w[0].into(), w[1].into()));
        }

        let first = points[0];
        let last = points[points.len() - 1];
        if first != last {
            line_buf.push(FlatLine::new(last.into(), first.into()));
        }
    }
}

#[inline]
fn is_out_of_range(v: f64) -> bool {
    !v.is_finite() || v.abs() > MAX_COORDINATE
}

/// Find the first coordinate that the rasterizer can't represent.
pub(crate) fn find_out_of_range(subpaths: &[Subpath]) -> Option<f64> {
    subpaths
        .iter()
        .flat_map(|s| s.points.iter())
        .flat_map(|p| [p.x, p.y])
        .find(|&v| is_out_of_range(v))
}

/// Find the first end or control point of `path` that the rasterizer can't represent once
/// `affine` is applied.
///
/// This has to run before flattening, since the number of segments a curve is flattened into
/// grows with its size and non-finite control points vanish from the flattened output.
pub(crate) fn find_out_of_range_in(path: &BezPath, affine: Affine) -> Option<f64> {
    path.iter()
        .map(|el| affine * el)
        .flat_map(|el| {
            let points = match el {
                kurbo::PathEl::MoveTo(p) | kurbo::PathEl::LineTo(p) => [Some(p), None, None],
                kurbo::PathEl::QuadTo(p1, p2) => [Some(p1), Some(p2), None],
                kurbo::PathEl::CurveTo(p1, p2, p3) => [Some(p1), Some(p2), Some(p3)],
                kurbo::PathEl::ClosePath => [None, None, None],
            };
            points.into_iter().flatten()
        })
        .flat_map(|p| [p.x, p.y])
        .find(|&v| is_out_of_range(v))
}
