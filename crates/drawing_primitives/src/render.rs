// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fill and draw operations, tying flattening, stroking, rasterization and compositing
//! together.

use crate::error::{Completion, Error};
use crate::execute::{is_cancelled, CancellationToken, ExecutionMode};
use crate::fine::composite_strip;
use crate::flatten::{self, FlatLine};
use crate::options::DrawingOptions;
use crate::paint::Brush;
use crate::path::Path;
use crate::pixmap::{PixelBuffer, Region};
use crate::strip::{RasterSettings, Rasterizer, RowScratch};
use crate::stroke::{self, Pen};
use crate::FillRule;
use peniko::kurbo::{Affine, Rect};

pub(crate) const DEFAULT_TOLERANCE: f64 = 0.1;

/// Fill the interior of a path with a brush.
///
/// The interior is decided by `options.shape_options.intersection_rule`. Only pixels within
/// `region` (the whole target by default) are touched. If `cancel` is cancelled while the
/// operation runs, it stops between two rows and returns [`Completion::Cancelled`].
pub fn fill_path<P: PixelBuffer + ?Sized, B: Brush>(
    target: &mut P,
    path: &Path,
    brush: &B,
    options: &DrawingOptions,
    region: Option<Region>,
    cancel: Option<&CancellationToken>,
) -> Result<Completion, Error> {
    options.validate()?;

    let subpaths = path.flatten(options.transform, options.tolerance)?;
    let mut lines = vec![];
    flatten::fill_lines(&subpaths, &mut lines);

    let region = clip_region(target, region);

    Ok(render_lines(
        target,
        &lines,
        brush,
        options,
        options.fill_rule(),
        region,
        cancel,
    ))
}

/// Stroke the outline of a path with a pen.
///
/// The path is outlined in user space and the outline is transformed afterwards, so a
/// non-uniform transform distorts the stroke width like it distorts the path. The outline is
/// filled with `options.stroke_rule`, `NonZero` unless set.
pub fn draw_path<P: PixelBuffer + ?Sized, B: Brush>(
    target: &mut P,
    path: &Path,
    pen: &Pen<B>,
    options: &DrawingOptions,
    region: Option<Region>,
    cancel: Option<&CancellationToken>,
) -> Result<Completion, Error> {
    options.validate()?;
    pen.validate()?;

    // The range limit applies in device space, the centerline is flattened in user space.
    path.validate(options.transform)?;

    let tolerance = user_tolerance(options);
    let subpaths = flatten::flatten(path.bez_path(), Affine::IDENTITY, tolerance);
    let mut outline = stroke::outline(&subpaths, pen, tolerance)?;

    for subpath in &mut outline {
        subpath.transform(options.transform);
    }

    if let Some(value) = flatten::find_out_of_range(&outline) {
        return Err(Error::OutOfRange { value });
    }

    let mut lines = vec![];
    flatten::fill_lines(&outline, &mut lines);

    let region = clip_region(target, region);

    Ok(render_lines(
        target,
        &lines,
        &pen.brush,
        options,
        options.stroke_fill_rule(),
        region,
        cancel,
    ))
}

/// Fill a rectangle, given in user space.
pub fn fill_rect<P: PixelBuffer + ?Sized, B: Brush>(
    target: &mut P,
    rect: Rect,
    brush: &B,
    options: &DrawingOptions,
    region: Option<Region>,
    cancel: Option<&CancellationToken>,
) -> Result<Completion, Error> {
    fill_path(target, &Path::rect(rect), brush, options, region, cancel)
}

/// Stroke the outline of a rectangle, given in user space.
pub fn draw_rect<P: PixelBuffer + ?Sized, B: Brush>(
    target: &mut P,
    rect: Rect,
    pen: &Pen<B>,
    options: &DrawingOptions,
    region: Option<Region>,
    cancel: Option<&CancellationToken>,
) -> Result<Completion, Error> {
    draw_path(target, &Path::rect(rect), pen, options, region, cancel)
}

/// Fill a whole region of the target with a brush. The transform of `options` is ignored.
pub fn fill_region<P: PixelBuffer + ?Sized, B: Brush>(
    target: &mut P,
    brush: &B,
    options: &DrawingOptions,
    region: Option<Region>,
    cancel: Option<&CancellationToken>,
) -> Result<Completion, Error> {
    options.validate()?;

    let region = clip_region(target, region);
    if region.is_empty() {
        return Ok(Completion::Finished);
    }

    let rect = region.to_rect();
    let corners = [
        (rect.x0, rect.y0),
        (rect.x1, rect.y0),
        (rect.x1, rect.y1),
        (rect.x0, rect.y1),
    ]
    .map(|(x, y)| flatten::Point::new(x as f32, y as f32));
    let lines = (0..4)
        .map(|i| FlatLine::new(corners[i], corners[(i + 1) % 4]))
        .collect::<Vec<_>>();

    Ok(render_lines(
        target,
        &lines,
        brush,
        options,
        FillRule::NonZero,
        region,
        cancel,
    ))
}

/// Restrict an operation to the part of the target it may touch.
fn clip_region<P: PixelBuffer + ?Sized>(target: &P, region: Option<Region>) -> Region {
    let full = Region::of(target);

    match region {
        Some(region) => full.intersect(&region),
        None => full,
    }
}

/// The flattening tolerance in user space that keeps the error below `options.tolerance`
/// once the transform is applied.
fn user_tolerance(options: &DrawingOptions) -> f64 {
    let [a, b, c, d, _, _] = options.transform.as_coeffs();

    // Largest singular value of the linear part.
    let frobenius = a * a + b * b + c * c + d * d;
    let det = a * d - b * c;
    let scale = ((frobenius + (frobenius * frobenius - 4.0 * det * det).max(0.0).sqrt()) / 2.0)
        .sqrt();

    if scale > 0.0 {
        options.tolerance / scale
    } else {
        options.tolerance
    }
}

fn render_lines<P: PixelBuffer + ?Sized, B: Brush>(
    target: &mut P,
    lines: &[FlatLine],
    brush: &B,
    options: &DrawingOptions,
    fill_rule: FillRule,
    region: Region,
    cancel: Option<&CancellationToken>,
) -> Completion {
    let settings = RasterSettings {
        fill_rule,
        antialias: options.antialias,
        subsamples: options.samples_per_row(),
    };
    let rasterizer = Rasterizer::new(lines, settings, region);
    let rows = rasterizer.rows();

    log::debug!(
        "rendering {} lines in rows {:?}, columns {:?} ({:?}, rect: {})",
        lines.len(),
        rows,
        rasterizer.cols(),
        options.execution_mode,
        rasterizer.is_rect()
    );

    let cancelled = |rows: usize| {
        log::debug!("operation cancelled after {rows} rows");
        Completion::Cancelled { rows }
    };

    match options.execution_mode {
        ExecutionMode::Serial => {
            let mut scratch = RowScratch::default();

            for (i, y) in rows.enumerate() {
                if is_cancelled(cancel) {
                    return cancelled(i);
                }

                if let Some(strip) = rasterizer.render_row(y, &mut scratch) {
                    composite_strip(target, &strip, brush, region);
                }
            }
        }
        #[cfg(feature = "multithreading")]
        ExecutionMode::Parallel => {
            use rayon::prelude::*;

            let strips = rows
                .into_par_iter()
                .map_init(RowScratch::default, |scratch, y| {
                    if is_cancelled(cancel) {
                        None
                    } else {
                        rasterizer.render_row(y, scratch)
                    }
                })
                .collect::<Vec<_>>();

            for (i, strip) in strips.iter().enumerate() {
                if is_cancelled(cancel) {
                    return cancelled(i);
                }

                if let Some(strip) = strip {
                    composite_strip(target, strip, brush, region);
                }
            }
        }
    }

    Completion::Finished
}

/// A target together with the state applied to every operation on it.
pub struct RenderContext<'a, P: PixelBuffer + ?Sized> {
    target: &'a mut P,
    options: DrawingOptions,
    region: Option<Region>,
    cancel: Option<CancellationToken>,
}

impl<'a, P: PixelBuffer + ?Sized> RenderContext<'a, P> {
    /// Create a new render context.
    pub fn new(target: &'a mut P) -> Self {
        Self {
            target,
            options: DrawingOptions::default(),
            region: None,
            cancel: None,
        }
    }

    pub fn target(&self) -> &P {
        self.target
    }

    pub fn options(&self) -> &DrawingOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: DrawingOptions) {
        self.options = options;
    }

    pub fn set_fill_rule(&mut self, fill_rule: FillRule) {
        self.options.shape_options.intersection_rule = fill_rule;
    }

    pub fn set_antialias(&mut self, antialias: bool) {
        self.options.antialias = antialias;
    }

    /// Pre-concatenate a new transform to the current transformation matrix.
    pub fn transform(&mut self, transform: Affine) {
        self.options.transform = self.options.transform * transform;
    }

    /// Set the current transformation matrix.
    pub fn set_transform(&mut self, transform: Affine) {
        self.options.transform = transform;
    }

    /// Reset the current transformation matrix.
    pub fn reset_transform(&mut self) {
        self.options.transform = Affine::IDENTITY;
    }

    /// Return the current transformation matrix.
    pub fn current_transform(&self) -> Affine {
        self.options.transform
    }

    /// Restrict all following operations to a region of the target.
    pub fn set_region(&mut self, region: Region) {
        self.region = Some(region);
    }

    pub fn reset_region(&mut self) {
        self.region = None;
    }

    pub fn set_cancellation_token(&mut self, token: CancellationToken) {
        self.cancel = Some(token);
    }

    /// Fill a path.
    pub fn fill_path<B: Brush>(&mut self, path: &Path, brush: &B) -> Result<Completion, Error> {
        fill_path(
            self.target,
            path,
            brush,
            &self.options,
            self.region,
            self.cancel.as_ref(),
        )
    }

    /// Stroke a path.
    pub fn draw_path<B: Brush>(&mut self, path: &Path, pen: &Pen<B>) -> Result<Completion, Error> {
        draw_path(
            self.target,
            path,
            pen,
            &self.options,
            self.region,
            self.cancel.as_ref(),
        )
    }

    pub fn fill_rect<B: Brush>(&mut self, rect: Rect, brush: &B) -> Result<Completion, Error> {
        self.fill_path(&Path::rect(rect), brush)
    }

    pub fn draw_rect<B: Brush>(&mut self, rect: Rect, pen: &Pen<B>) -> Result<Completion, Error> {
        self.draw_path(&Path::rect(rect), pen)
    }

    /// Fill the current region, or the whole target if none is set.
    pub fn fill_region<B: Brush>(&mut self, brush: &B) -> Result<Completion, Error> {
        fill_region(
            self.target,
            brush,
            &self.options,
            self.region,
            self.cancel.as_ref(),
        )
    }
}
