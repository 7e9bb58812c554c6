// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A simple pixmap type, and the pixel buffer interface drawing operations write through.

use crate::util::{premultiply_rgba8, unpremultiply_rgba8, COLOR_COMPONENTS};
use peniko::kurbo::Rect;
use zune_png::zune_core::options::DecoderOptions;

/// A destination for drawing operations, storing premultiplied RGBA8 pixels.
///
/// Accessing pixels outside of `width() x height()` is a contract violation and may panic.
pub trait PixelBuffer {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn pixel(&self, x: usize, y: usize) -> [u8; COLOR_COMPONENTS];
    fn set_pixel(&mut self, x: usize, y: usize, color: [u8; COLOR_COMPONENTS]);
}

/// An axis-aligned, pixel-aligned area of a target buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Region {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The region covering a whole buffer.
    pub fn of<P: PixelBuffer + ?Sized>(buffer: &P) -> Self {
        Self::new(0, 0, buffer.width(), buffer.height())
    }

    /// The exclusive right edge, saturating at `usize::MAX`.
    pub fn x1(&self) -> usize {
        self.x.saturating_add(self.width)
    }

    /// The exclusive bottom edge, saturating at `usize::MAX`.
    pub fn y1(&self) -> usize {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn intersect(&self, other: &Region) -> Region {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.x1().min(other.x1()).max(x0);
        let y1 = self.y1().min(other.y1()).max(y0);

        Region::new(x0, y0, x1 - x0, y1 - y0)
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x1() && y >= self.y && y < self.y1()
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.x as f64,
            self.y as f64,
            self.x1() as f64,
            self.y1() as f64,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pixmap {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) buf: Vec<u8>,
}

impl Pixmap {
    pub fn new(width: usize, height: usize) -> Self {
        let buf = vec![0; width * height * COLOR_COMPONENTS];
        Self { width, height, buf }
    }

    /// Create a pixmap filled with a single premultiplied color.
    pub fn filled(width: usize, height: usize, color: [u8; COLOR_COMPONENTS]) -> Self {
        let mut pixmap = Self::new(width, height);
        for px in pixmap.buf.chunks_exact_mut(COLOR_COMPONENTS) {
            px.copy_from_slice(&color);
        }

        pixmap
    }

    /// Create a pixmap from straight-alpha RGBA8 data, as produced by most image decoders.
    pub fn from_rgba8(width: usize, height: usize, data: &[u8]) -> Option<Self> {
        if data.len() != width * height * COLOR_COMPONENTS {
            return None;
        }

        let mut buf = data.to_vec();
        for px in buf.chunks_exact_mut(COLOR_COMPONENTS) {
            let premul = premultiply_rgba8([px[0], px[1], px[2], px[3]]);
            px.copy_from_slice(&premul);
        }

        Some(Self { width, height, buf })
    }

    pub fn from_png(data: &[u8]) -> Option<Pixmap> {
        let options = DecoderOptions::new_cmd().png_set_add_alpha_channel(true);
        let mut decoder = zune_png::PngDecoder::new_with_options(data, options);
        decoder.decode_headers().ok()?;

        let dimensions = decoder.get_dimensions()?;

        // TODO: Convert PNGs with an embedded color profile or gamma to sRGB.
        let decoded = decoder.decode().ok()?.u8()?;

        Self::from_rgba8(dimensions.0, dimensions.1, &decoded)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.buf
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    /// Convert from premultiplied to separate alpha.
    ///
    /// Not fast, but useful for saving to PNG etc.
    pub fn unpremultiply(&mut self) {
        for rgba in self.buf.chunks_exact_mut(COLOR_COMPONENTS) {
            let straight = unpremultiply_rgba8([rgba[0], rgba[1], rgba[2], rgba[3]]);
            rgba.copy_from_slice(&straight);
        }
    }

    /// The premultiplied color of a pixel.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; COLOR_COMPONENTS] {
        let ix = self.index(x, y);
        let mut px = [0; COLOR_COMPONENTS];
        px.copy_from_slice(&self.buf[ix..ix + COLOR_COMPONENTS]);

        px
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: [u8; COLOR_COMPONENTS]) {
        let ix = self.index(x, y);
        self.buf[ix..ix + COLOR_COMPONENTS].copy_from_slice(&color);
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) is outside of a {}x{} pixmap",
            self.width,
            self.height
        );

        (y * self.width + x) * COLOR_COMPONENTS
    }
}

impl PixelBuffer for Pixmap {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn pixel(&self, x: usize, y: usize) -> [u8; COLOR_COMPONENTS] {
        Pixmap::pixel(self, x, y)
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: [u8; COLOR_COMPONENTS]) {
        Pixmap::set_pixel(self, x, y, color)
    }
}

/// Straight-alpha images are converted to and from premultiplied alpha on every access.
#[cfg(feature = "image")]
impl PixelBuffer for ::image::RgbaImage {
    fn width(&self) -> usize {
        ::image::RgbaImage::width(self) as usize
    }

    fn height(&self) -> usize {
        ::image::RgbaImage::height(self) as usize
    }

    fn pixel(&self, x: usize, y: usize) -> [u8; COLOR_COMPONENTS] {
        premultiply_rgba8(self.get_pixel(x as u32, y as u32).0)
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: [u8; COLOR_COMPONENTS]) {
        self.put_pixel(x as u32, y as u32, ::image::Rgba(unpremultiply_rgba8(color)));
    }
}
