// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Brushes sampling from a separate source image.

use crate::error::{invalid, Error};
use crate::paint::Brush;
use crate::pixmap::{Pixmap, Region};
use crate::util::COLOR_COMPONENTS;
use peniko::Extend;

/// A read-only image an [`ImageBrush`] samples from.
///
/// The source may store pixels in any format; `pixel` converts to premultiplied RGBA8 at
/// sample time.
pub trait ImageSource: Sync {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn pixel(&self, x: usize, y: usize) -> [u8; COLOR_COMPONENTS];
}

impl ImageSource for Pixmap {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn pixel(&self, x: usize, y: usize) -> [u8; COLOR_COMPONENTS] {
        Pixmap::pixel(self, x, y)
    }
}

#[cfg(feature = "image")]
mod image_sources {
    use super::ImageSource;
    use crate::util::{premultiply_rgba8, COLOR_COMPONENTS};
    use image::{GrayImage, RgbImage, RgbaImage};

    impl ImageSource for RgbaImage {
        fn width(&self) -> usize {
            RgbaImage::width(self) as usize
        }

        fn height(&self) -> usize {
            RgbaImage::height(self) as usize
        }

        fn pixel(&self, x: usize, y: usize) -> [u8; COLOR_COMPONENTS] {
            premultiply_rgba8(self.get_pixel(x as u32, y as u32).0)
        }
    }

    impl ImageSource for RgbImage {
        fn width(&self) -> usize {
            RgbImage::width(self) as usize
        }

        fn height(&self) -> usize {
            RgbImage::height(self) as usize
        }

        fn pixel(&self, x: usize, y: usize) -> [u8; COLOR_COMPONENTS] {
            let [r, g, b] = self.get_pixel(x as u32, y as u32).0;
            [r, g, b, 255]
        }
    }

    impl ImageSource for GrayImage {
        fn width(&self) -> usize {
            GrayImage::width(self) as usize
        }

        fn height(&self) -> usize {
            GrayImage::height(self) as usize
        }

        fn pixel(&self, x: usize, y: usize) -> [u8; COLOR_COMPONENTS] {
            let [l] = self.get_pixel(x as u32, y as u32).0;
            [l, l, l, 255]
        }
    }
}

/// A brush drawing a borrowed source image.
///
/// The image is positioned at the origin of the operation's region. Where the region is
/// larger than the image, `extend` decides what is sampled: the image is tiled by default.
/// The brush never modifies the source, so it can be reused for any number of operations.
pub struct ImageBrush<'a, I: ImageSource> {
    source: &'a I,
    extend: Extend,
}

impl<I: ImageSource> Clone for ImageBrush<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I: ImageSource> Copy for ImageBrush<'_, I> {}

impl<'a, I: ImageSource> ImageBrush<'a, I> {
    pub fn new(source: &'a I) -> Result<Self, Error> {
        if source.width() == 0 || source.height() == 0 {
            return Err(invalid("image brush source is empty"));
        }

        Ok(Self {
            source,
            extend: Extend::Repeat,
        })
    }

    /// Set how the image is sampled outside of its bounds.
    pub fn with_extend(mut self, extend: Extend) -> Self {
        self.extend = extend;
        self
    }

    pub fn extend(&self) -> Extend {
        self.extend
    }

    pub fn source(&self) -> &'a I {
        self.source
    }
}

/// Map a coordinate relative to the image origin into `0..size`.
fn extend_coordinate(pos: usize, size: usize, extend: Extend) -> usize {
    match extend {
        Extend::Pad => pos.min(size - 1),
        Extend::Repeat => pos % size,
        Extend::Reflect => {
            let period = pos % (2 * size);
            if period < size {
                period
            } else {
                2 * size - 1 - period
            }
        }
    }
}

impl<I: ImageSource> Brush for ImageBrush<'_, I> {
    fn sample(&self, x: usize, y: usize, region: &Region) -> [u8; COLOR_COMPONENTS] {
        debug_assert!(
            x >= region.x && y >= region.y,
            "sample ({x}, {y}) lies before the region origin"
        );

        let src_x = extend_coordinate(x - region.x, self.source.width(), self.extend);
        let src_y = extend_coordinate(y - region.y, self.source.height(), self.extend);

        self.source.pixel(src_x, src_y)
    }
}
