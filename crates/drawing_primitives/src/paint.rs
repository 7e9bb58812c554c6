// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color sources for fill and draw operations.

use crate::pixmap::Region;
use crate::util::{ColorExt, COLOR_COMPONENTS};
use peniko::color::{AlphaColor, Srgb};

/// A source of colors for the pixels covered by a path.
///
/// Operations are generic over the brush type, so `sample` is monomorphized into the
/// compositing loop. Brushes are only ever borrowed immutably and may be shared across
/// threads and reused across any number of operations.
pub trait Brush: Sync {
    /// The premultiplied RGBA8 color of the target pixel `(x, y)`, for an operation restricted
    /// to `region`.
    fn sample(&self, x: usize, y: usize, region: &Region) -> [u8; COLOR_COMPONENTS];

    /// Whether every sample is fully opaque.
    fn is_opaque(&self) -> bool {
        false
    }
}

impl<B: Brush + ?Sized> Brush for &B {
    fn sample(&self, x: usize, y: usize, region: &Region) -> [u8; COLOR_COMPONENTS] {
        (**self).sample(x, y, region)
    }

    fn is_opaque(&self) -> bool {
        (**self).is_opaque()
    }
}

/// A brush painting a single color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidBrush {
    color: AlphaColor<Srgb>,
    premul: [u8; COLOR_COMPONENTS],
}

impl SolidBrush {
    pub fn new(color: AlphaColor<Srgb>) -> Self {
        Self {
            color,
            premul: color.to_rgba8_fast(),
        }
    }

    pub fn color(&self) -> AlphaColor<Srgb> {
        self.color
    }

    /// The premultiplied RGBA8 color painted by this brush.
    pub fn premultiplied(&self) -> [u8; COLOR_COMPONENTS] {
        self.premul
    }
}

impl From<AlphaColor<Srgb>> for SolidBrush {
    fn from(value: AlphaColor<Srgb>) -> Self {
        SolidBrush::new(value)
    }
}

impl Brush for SolidBrush {
    #[inline(always)]
    fn sample(&self, _: usize, _: usize, _: &Region) -> [u8; COLOR_COMPONENTS] {
        self.premul
    }

    fn is_opaque(&self) -> bool {
        self.premul[3] == 255
    }
}
