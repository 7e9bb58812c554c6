// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scanline rasterization of flattened paths into per-pixel coverage.
//!
//! A path is rasterized one pixel row at a time. Every row is sampled at a number of
//! horizontal scanlines; for each scanline the crossings with all edges are sorted by x and
//! the winding number is accumulated from left to right. Wherever the fill rule says a span is
//! inside, the exact length of the span within each pixel is added to that pixel's coverage.
//!
//! Rows are independent of each other. The result of a row is a [`Strip`]: a run of coverage
//! values starting at the first column with non-zero coverage.

use crate::flatten::FlatLine;
use crate::pixmap::Region;
use crate::rect::{lines_to_rect, rect_coverage};
use crate::FillRule;
use peniko::kurbo::Rect;
use std::ops::Range;

/// Coverage of a single pixel row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strip {
    /// The column of the first coverage value.
    pub x: u32,
    pub y: u32,
    /// Coverage values, 255 meaning fully covered.
    pub alphas: Vec<u8>,
}

impl Strip {
    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    /// The column one past the last coverage value.
    pub fn x1(&self) -> u32 {
        self.x + self.alphas.len() as u32
    }
}

/// Settings of a single rasterization pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterSettings {
    pub fill_rule: FillRule,
    /// Whether to compute fractional coverage. Otherwise a pixel is either fully covered or
    /// not at all.
    pub antialias: bool,
    /// Number of scanlines per pixel row when antialiasing.
    pub subsamples: u16,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            fill_rule: FillRule::default(),
            antialias: true,
            subsamples: 16,
        }
    }
}

/// A line segment oriented top to bottom. `dir` is +1 if the original segment pointed
/// downwards and -1 otherwise.
#[derive(Debug, Clone, Copy)]
struct Edge {
    x0: f64,
    y0: f64,
    y1: f64,
    dxdy: f64,
    dir: i32,
}

impl Edge {
    fn new(line: &FlatLine) -> Option<Self> {
        let (p0, p1, dir) = if line.p0.y < line.p1.y {
            (line.p0, line.p1, 1)
        } else if line.p0.y > line.p1.y {
            (line.p1, line.p0, -1)
        } else {
            // Horizontal edges never cross a scanline.
            return None;
        };

        let (x0, y0) = (p0.x as f64, p0.y as f64);
        let (x1, y1) = (p1.x as f64, p1.y as f64);

        Some(Self {
            x0,
            y0,
            y1,
            dxdy: (x1 - x0) / (y1 - y0),
            dir,
        })
    }

    /// Whether the scanline at `y` crosses the half-open interval `[y0, y1)` of the edge.
    #[inline(always)]
    fn crosses(&self, y: f64) -> bool {
        self.y0 <= y && y < self.y1
    }

    #[inline(always)]
    fn x_at(&self, y: f64) -> f64 {
        self.x0 + (y - self.y0) * self.dxdy
    }
}

enum Shape {
    Edges(Vec<Edge>),
    /// The lines form an axis-aligned rectangle, whose coverage is computed analytically.
    Rect(Rect),
}

/// Per-worker buffers reused across rows.
#[derive(Debug, Default)]
pub struct RowScratch {
    /// Partial coverage per pixel.
    area: Vec<f32>,
    /// Difference array of fully covered pixels.
    cover: Vec<f32>,
    /// Edges that may cross the current row.
    active: Vec<usize>,
    crossings: Vec<(f64, i32)>,
}

impl RowScratch {
    fn reset(&mut self, width: usize) {
        self.area.clear();
        self.area.resize(width + 1, 0.0);
        self.cover.clear();
        self.cover.resize(width + 1, 0.0);
    }

    /// Add a covered span `[a, b)` in column coordinates relative to the first column.
    #[inline]
    fn add_span(&mut self, a: f64, b: f64, weight: f32, width: usize) {
        let a = a.clamp(0.0, width as f64);
        let b = b.clamp(0.0, width as f64);
        if b <= a {
            return;
        }

        let ia = a as usize;
        let ib = b as usize;

        if ia == ib {
            self.area[ia] += (b - a) as f32 * weight;
            return;
        }

        self.area[ia] += (ia as f64 + 1.0 - a) as f32 * weight;
        self.cover[ia + 1] += weight;
        self.cover[ib] -= weight;
        self.area[ib] += (b - ib as f64) as f32 * weight;
    }
}

/// Computes the coverage of one set of lines, row by row.
pub struct Rasterizer {
    shape: Shape,
    settings: RasterSettings,
    rows: Range<usize>,
    cols: Range<usize>,
}

impl Rasterizer {
    /// Prepare rasterizing `lines`. Only pixels within `region` ever receive coverage.
    pub fn new(lines: &[FlatLine], settings: RasterSettings, region: Region) -> Self {
        let mut x_min = f32::INFINITY;
        let mut y_min = f32::INFINITY;
        let mut x_max = f32::NEG_INFINITY;
        let mut y_max = f32::NEG_INFINITY;

        for line in lines {
            x_min = x_min.min(line.p0.x.min(line.p1.x));
            y_min = y_min.min(line.p0.y.min(line.p1.y));
            x_max = x_max.max(line.p0.x.max(line.p1.x));
            y_max = y_max.max(line.p0.y.max(line.p1.y));
        }

        let clip = |min: f32, max: f32, start: usize, end: usize| {
            if min > max {
                return 0..0;
            }

            let lo = (min.floor().max(0.0) as usize).max(start);
            let hi = (max.ceil().max(0.0) as usize).min(end);
            lo..hi.max(lo)
        };

        let rows = clip(y_min, y_max, region.y, region.y1());
        let cols = clip(x_min, x_max, region.x, region.x1());

        // Without antialiasing every pixel is thresholded at its center scanline, which the
        // scanning path handles.
        let shape = match lines_to_rect(lines, &region) {
            Some(rect) if settings.antialias => Shape::Rect(rect),
            _ => {
                let mut edges = lines.iter().filter_map(Edge::new).collect::<Vec<_>>();
                edges.sort_unstable_by(|a, b| a.y0.total_cmp(&b.y0));
                Shape::Edges(edges)
            }
        };

        Self {
            shape,
            settings,
            rows,
            cols,
        }
    }

    /// The rows that may have non-zero coverage.
    pub fn rows(&self) -> Range<usize> {
        self.rows.clone()
    }

    /// The columns that may have non-zero coverage.
    pub fn cols(&self) -> Range<usize> {
        self.cols.clone()
    }

    /// Whether the lines were recognized as an axis-aligned rectangle.
    pub fn is_rect(&self) -> bool {
        matches!(self.shape, Shape::Rect(_))
    }

    /// Compute the coverage of row `y`. Returns `None` if no pixel of the row is covered.
    pub fn render_row(&self, y: usize, scratch: &mut RowScratch) -> Option<Strip> {
        if !self.rows.contains(&y) || self.cols.is_empty() {
            return None;
        }

        let alphas = match &self.shape {
            Shape::Rect(rect) => rect_coverage(rect, y, self.cols.clone()),
            Shape::Edges(edges) => self.scan_row(edges, y, scratch),
        };

        strip_from_alphas(alphas, self.cols.start, y)
    }

    fn scan_row(&self, edges: &[Edge], y: usize, scratch: &mut RowScratch) -> Vec<u8> {
        let width = self.cols.len();
        let x_origin = self.cols.start as f64;
        let row_top = y as f64;
        let row_bottom = row_top + 1.0;

        let samples = if self.settings.antialias {
            self.settings.subsamples.max(1)
        } else {
            1
        };
        let weight = 1.0 / samples as f32;

        scratch.reset(width);

        // Edges are sorted by their top, so all candidates start before the row bottom.
        let end = edges.partition_point(|e| e.y0 < row_bottom);
        scratch.active.clear();
        scratch
            .active
            .extend((0..end).filter(|&i| edges[i].y1 > row_top));

        for s in 0..samples {
            let sample_y = row_top + (s as f64 + 0.5) / samples as f64;

            scratch.crossings.clear();
            for &i in &scratch.active {
                let edge = &edges[i];
                if edge.crosses(sample_y) {
                    scratch
                        .crossings
                        .push((edge.x_at(sample_y) - x_origin, edge.dir));
                }
            }

            if scratch.crossings.len() < 2 {
                continue;
            }

            scratch.crossings.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for i in 0..scratch.crossings.len() - 1 {
                winding += scratch.crossings[i].1;

                if self.settings.fill_rule.active_fill(winding) {
                    let a = scratch.crossings[i].0;
                    let b = scratch.crossings[i + 1].0;
                    scratch.add_span(a, b, weight, width);
                }
            }
        }

        let mut alphas = Vec::with_capacity(width);
        let mut cover = 0.0f32;
        for i in 0..width {
            cover += scratch.cover[i];
            let coverage = (scratch.area[i] + cover).clamp(0.0, 1.0);

            let alpha = if self.settings.antialias {
                (coverage * 255.0 + 0.5) as u8
            } else if coverage >= 0.5 {
                255
            } else {
                0
            };
            alphas.push(alpha);
        }

        alphas
    }
}

/// Trim uncovered pixels at both ends of a row.
fn strip_from_alphas(mut alphas: Vec<u8>, x: usize, y: usize) -> Option<Strip> {
    let first = alphas.iter().position(|&a| a != 0)?;
    let last = alphas.iter().rposition(|&a| a != 0)?;

    alphas.truncate(last + 1);
    alphas.drain(..first);

    Some(Strip {
        x: (x + first) as u32,
        y: y as u32,
        alphas,
    })
}
