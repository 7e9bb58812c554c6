// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fine rasterization: compositing brush colors through coverage onto the target.

use crate::paint::Brush;
use crate::pixmap::{PixelBuffer, Region};
use crate::strip::Strip;
use crate::util::{div_255, COLOR_COMPONENTS};

/// Composite using `SrcOver` (Cs * am + Cb * (1 – αs * am)).
///
/// All colors are premultiplied. `am` is the coverage of the pixel (the alpha mask due to
/// anti-aliasing), so the effective source alpha is `αs * am`.
#[inline(always)]
pub fn src_over(
    cb: [u8; COLOR_COMPONENTS],
    cs: [u8; COLOR_COMPONENTS],
    am: u8,
) -> [u8; COLOR_COMPONENTS] {
    let am = am as u32;
    let inv_as_am = 255 - div_255(am * cs[3] as u32);

    let mut out = [0; COLOR_COMPONENTS];
    for i in 0..COLOR_COMPONENTS {
        let im1 = cb[i] as u32 * inv_as_am;
        let im2 = cs[i] as u32 * am;
        out[i] = div_255(im1 + im2).min(255) as u8;
    }

    out
}

/// Writes the strips of one operation into a target, sampling colors from a brush.
pub struct Fine<'a, P: PixelBuffer + ?Sized, B: Brush> {
    target: &'a mut P,
    brush: &'a B,
    region: Region,
    opaque: bool,
}

impl<'a, P: PixelBuffer + ?Sized, B: Brush> Fine<'a, P, B> {
    /// `region` is passed on to the brush and must lie within the target.
    pub fn new(target: &'a mut P, brush: &'a B, region: Region) -> Self {
        debug_assert!(
            region.x1() <= target.width() && region.y1() <= target.height(),
            "region {region:?} exceeds the target"
        );

        Self {
            target,
            brush,
            region,
            opaque: brush.is_opaque(),
        }
    }

    /// Composite a single strip. Pixels with zero coverage are neither read nor written.
    pub fn strip(&mut self, strip: &Strip) {
        let y = strip.y as usize;
        let x0 = strip.x as usize;

        for (i, &am) in strip.alphas.iter().enumerate() {
            if am == 0 {
                continue;
            }

            let x = x0 + i;
            let cs = self.brush.sample(x, y, &self.region);

            let color = if am == 255 && self.opaque {
                // Opaque source at full coverage is the same as `Copy`.
                cs
            } else {
                src_over(self.target.pixel(x, y), cs, am)
            };

            self.target.set_pixel(x, y, color);
        }
    }
}

/// Composite a single strip of an operation restricted to `region`.
pub fn composite_strip<P: PixelBuffer + ?Sized, B: Brush>(
    target: &mut P,
    strip: &Strip,
    brush: &B,
    region: Region,
) {
    Fine::new(target, brush, region).strip(strip);
}
