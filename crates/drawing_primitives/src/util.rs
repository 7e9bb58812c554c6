// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::color::{AlphaColor, PremulColor, Srgb};

pub(crate) const COLOR_COMPONENTS: usize = 4;

pub(crate) trait ColorExt {
    /// Using the already-existing `to_rgba8` is slow on x86 because it involves rounding, so
    /// we use a fast method with just + 0.5.
    fn to_rgba8_fast(&self) -> [u8; COLOR_COMPONENTS];
}

impl ColorExt for PremulColor<Srgb> {
    fn to_rgba8_fast(&self) -> [u8; COLOR_COMPONENTS] {
        [
            (self.components[0].clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
            (self.components[1].clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
            (self.components[2].clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
            (self.components[3].clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
        ]
    }
}

impl ColorExt for AlphaColor<Srgb> {
    fn to_rgba8_fast(&self) -> [u8; COLOR_COMPONENTS] {
        self.premultiply().to_rgba8_fast()
    }
}

/// Exact `val / 255` with rounding, for `val <= u16::MAX`.
#[inline(always)]
pub(crate) const fn div_255(val: u32) -> u32 {
    (val + 128 + ((val + 128) >> 8)) >> 8
}

/// Premultiply a straight-alpha RGBA8 color.
#[inline(always)]
pub(crate) fn premultiply_rgba8(rgba: [u8; COLOR_COMPONENTS]) -> [u8; COLOR_COMPONENTS] {
    let a = rgba[3] as u32;

    [
        div_255(rgba[0] as u32 * a) as u8,
        div_255(rgba[1] as u32 * a) as u8,
        div_255(rgba[2] as u32 * a) as u8,
        rgba[3],
    ]
}

/// Convert a premultiplied RGBA8 color back to straight alpha.
#[inline(always)]
pub(crate) fn unpremultiply_rgba8(rgba: [u8; COLOR_COMPONENTS]) -> [u8; COLOR_COMPONENTS] {
    let alpha = rgba[3] as f32 * (1.0 / 255.0);

    if alpha == 0.0 {
        return [0, 0, 0, 0];
    }

    [
        (rgba[0] as f32 / alpha).round().min(255.0) as u8,
        (rgba[1] as f32 / alpha).round().min(255.0) as u8,
        (rgba[2] as f32 / alpha).round().min(255.0) as u8,
        rgba[3],
    ]
}
