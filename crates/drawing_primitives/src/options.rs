// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-operation settings.

use crate::error::{invalid, Error};
use crate::execute::ExecutionMode;
use crate::FillRule;
use peniko::kurbo::Affine;

/// Maximum number of vertical samples taken per pixel row.
pub const MAX_SUBSAMPLES: u16 = 256;

/// Settings concerning the geometry of filled shapes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShapeOptions {
    /// The rule deciding which areas of a filled path are inside.
    pub intersection_rule: FillRule,
}

impl ShapeOptions {
    pub fn with_intersection_rule(mut self, rule: FillRule) -> Self {
        self.intersection_rule = rule;
        self
    }
}

/// Settings of a fill or draw operation.
///
/// Options are plain values: every operation works on its own copy, so changing options after
/// an operation was started has no effect on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawingOptions {
    pub shape_options: ShapeOptions,
    /// Whether edges are antialiased.
    pub antialias: bool,
    /// Vertical samples per pixel row when antialiasing.
    pub antialias_subsamples: u16,
    /// Maximum distance between a curve and its flattened polyline, in pixels.
    pub tolerance: f64,
    /// Transform applied to paths before rasterization.
    pub transform: Affine,
    /// The rule used when filling stroke outlines. `None` means [`FillRule::NonZero`], which
    /// keeps overlapping parts of a stroke filled.
    pub stroke_rule: Option<FillRule>,
    pub execution_mode: ExecutionMode,
}

impl Default for DrawingOptions {
    fn default() -> Self {
        Self {
            shape_options: ShapeOptions::default(),
            antialias: true,
            antialias_subsamples: 16,
            tolerance: 0.1,
            transform: Affine::IDENTITY,
            stroke_rule: None,
            execution_mode: ExecutionMode::default(),
        }
    }
}

impl DrawingOptions {
    pub fn with_intersection_rule(mut self, rule: FillRule) -> Self {
        self.shape_options.intersection_rule = rule;
        self
    }

    pub fn with_antialias(mut self, antialias: bool) -> Self {
        self.antialias = antialias;
        self
    }

    pub fn with_antialias_subsamples(mut self, subsamples: u16) -> Self {
        self.antialias_subsamples = subsamples;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_stroke_rule(mut self, rule: FillRule) -> Self {
        self.stroke_rule = Some(rule);
        self
    }

    pub fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.execution_mode = mode;
        self
    }

    /// The rule used for filling paths.
    pub fn fill_rule(&self) -> FillRule {
        self.shape_options.intersection_rule
    }

    /// The rule used for filling stroke outlines.
    pub fn stroke_fill_rule(&self) -> FillRule {
        self.stroke_rule.unwrap_or(FillRule::NonZero)
    }

    /// Number of samples per pixel row the rasterizer takes.
    pub(crate) fn samples_per_row(&self) -> u16 {
        if self.antialias {
            self.antialias_subsamples
        } else {
            1
        }
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.antialias_subsamples == 0 || self.antialias_subsamples > MAX_SUBSAMPLES {
            return Err(invalid(format!(
                "antialias subsamples must be within 1..={MAX_SUBSAMPLES}, got {}",
                self.antialias_subsamples
            )));
        }

        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(invalid(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }

        if !self.transform.is_finite() {
            return Err(invalid("transform is not finite"));
        }

        Ok(())
    }
}
