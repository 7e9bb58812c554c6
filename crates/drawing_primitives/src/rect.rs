// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accelerators for filling rectangles more efficiently.
//!
//! When filling axis-aligned rectangles, the coverage of a pixel is just the product of its
//! horizontal and vertical overlap with the rectangle, so we don't need to scan edges at all.

use crate::flatten::FlatLine;
use crate::pixmap::Region;
use peniko::kurbo::Rect;
use std::ops::Range;

/// Check if a sequence of flat lines can be reduced to a rectangle, and clip it to `region`.
pub(crate) fn lines_to_rect(line_buf: &[FlatLine], region: &Region) -> Option<Rect> {
    if line_buf.len() != 4 {
        return None;
    }

    let mut horizontal = line_buf[0].p0.x != line_buf[0].p1.x;
    let mut is_rect = true;

    let mut x_min = f32::INFINITY;
    let mut y_min = f32::INFINITY;
    let mut x_max = f32::NEG_INFINITY;
    let mut y_max = f32::NEG_INFINITY;

    for i in 0..4 {
        let line = &line_buf[i];

        if horizontal {
            is_rect &= line.p0.y == line.p1.y;
        } else {
            is_rect &= line.p0.x == line.p1.x;
        }

        // The sides have to form a single loop.
        is_rect &= line.p1 == line_buf[(i + 1) % 4].p0;

        x_min = x_min.min(line.p0.x.min(line.p1.x));
        y_min = y_min.min(line.p0.y.min(line.p1.y));
        x_max = x_max.max(line.p0.x.max(line.p1.x));
        y_max = y_max.max(line.p0.y.max(line.p1.y));

        horizontal = !horizontal;
    }

    if is_rect {
        Some(Rect::new(
            (x_min as f64).max(region.x as f64),
            (y_min as f64).max(region.y as f64),
            (x_max as f64).min(region.x1() as f64),
            (y_max as f64).min(region.y1() as f64),
        ))
    } else {
        None
    }
}

/// The length of `[start, end)` that lies within the pixel at `pixel_pos`.
#[inline]
fn pixel_coverage(pixel_pos: usize, start: f64, end: f64) -> f64 {
    let pixel_pos = pixel_pos as f64;
    let end = (end - pixel_pos).clamp(0.0, 1.0);
    let start = (start - pixel_pos).clamp(0.0, 1.0);

    (end - start).max(0.0)
}

/// Coverage values of row `y` of a rectangle, for the columns in `cols`.
pub(crate) fn rect_coverage(rect: &Rect, y: usize, cols: Range<usize>) -> Vec<u8> {
    let vertical = pixel_coverage(y, rect.y0, rect.y1);

    cols.map(|x| {
        let horizontal = pixel_coverage(x, rect.x0, rect.x1);
        (horizontal * vertical * 255.0 + 0.5) as u8
    })
    .collect()
}
