//! Deterministic random drawing commands for benchmarks.

use peniko::color::{AlphaColor, Srgb};
use peniko::kurbo::{Affine, BezPath, Point, Rect, Shape};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

const SEED: [u8; 32] = [0; 32];

#[derive(Copy, Clone)]
pub struct Params {
    pub width: usize,
    pub height: usize,
    pub stroke: bool,
    pub size: usize,
}

#[derive(Clone)]
pub enum Command {
    FillRect(Rect, AlphaColor<Srgb>),
    StrokeRect(Rect, AlphaColor<Srgb>),
    FillPath(BezPath, AlphaColor<Srgb>),
    StrokePath(BezPath, AlphaColor<Srgb>),
}

impl Command {
    fn rect(rect: Rect, color: AlphaColor<Srgb>, stroke: bool) -> Self {
        if stroke {
            Command::StrokeRect(rect, color)
        } else {
            Command::FillRect(rect, color)
        }
    }

    fn path(path: BezPath, color: AlphaColor<Srgb>, stroke: bool) -> Self {
        if stroke {
            Command::StrokePath(path, color)
        } else {
            Command::FillPath(path, color)
        }
    }
}

/// Pixel-aligned rectangles.
pub struct RectAIterator {
    params: Params,
    rng: StdRng,
}

impl RectAIterator {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            rng: StdRng::from_seed(SEED),
        }
    }
}

impl Iterator for RectAIterator {
    type Item = Command;

    fn next(&mut self) -> Option<Self::Item> {
        let size = self.params.size;
        let x = self.rng.gen_range(0..=(self.params.width - size)) as f64;
        let y = self.rng.gen_range(0..=(self.params.height - size)) as f64;
        let color = gen_color(&mut self.rng, 127);

        let rect = Rect::new(x, y, x + size as f64, y + size as f64);
        Some(Command::rect(rect, color, self.params.stroke))
    }
}

/// Rectangles at fractional positions.
pub struct RectUIterator {
    params: Params,
    rng: StdRng,
}

impl RectUIterator {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            rng: StdRng::from_seed(SEED),
        }
    }
}

impl Iterator for RectUIterator {
    type Item = Command;

    fn next(&mut self) -> Option<Self::Item> {
        let size = self.params.size;
        let max_x = (self.params.width - size - 1) as f64;
        let max_y = (self.params.height - size - 1) as f64;

        let x = self.rng.gen_range(0.0..=max_x);
        let y = self.rng.gen_range(0.0..=max_y);
        let color = gen_color(&mut self.rng, 127);

        let rect = Rect::new(x, y, x + size as f64, y + size as f64);
        Some(Command::rect(rect, color, self.params.stroke))
    }
}

/// Rectangles rotated by a slowly increasing angle.
pub struct RectRotIterator {
    params: Params,
    angle: f64,
    rng: StdRng,
}

impl RectRotIterator {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            angle: 0.0,
            rng: StdRng::from_seed(SEED),
        }
    }
}

impl Iterator for RectRotIterator {
    type Item = Command;

    fn next(&mut self) -> Option<Self::Item> {
        let size = self.params.size;
        let half_size = size as f64 / 2.0;

        let x = self.rng.gen_range(0..=(self.params.width - size)) as f64;
        let y = self.rng.gen_range(0..=(self.params.height - size)) as f64;

        let affine = Affine::rotate_about(
            self.angle * PI / 180.0,
            Point::new(x + half_size, y + half_size),
        );
        let color = gen_color(&mut self.rng, 127);
        let rect = Rect::new(x, y, x + size as f64, y + size as f64);

        self.angle += 0.01;

        Some(Command::path(
            affine * rect.to_path(0.1),
            color,
            self.params.stroke,
        ))
    }
}

/// Closed polygons with random, possibly self-intersecting vertices within a square of
/// `size`.
pub struct PolyIterator {
    params: Params,
    vertices: usize,
    rng: StdRng,
}

impl PolyIterator {
    pub fn new(params: Params, vertices: usize) -> Self {
        Self {
            params,
            vertices,
            rng: StdRng::from_seed(SEED),
        }
    }
}

impl Iterator for PolyIterator {
    type Item = Command;

    fn next(&mut self) -> Option<Self::Item> {
        let size = self.params.size as f64;
        let x = self.rng.gen_range(0.0..=(self.params.width as f64 - size));
        let y = self.rng.gen_range(0.0..=(self.params.height as f64 - size));

        let mut path = BezPath::new();
        for i in 0..self.vertices {
            let p = Point::new(
                x + self.rng.gen_range(0.0..size),
                y + self.rng.gen_range(0.0..size),
            );

            if i == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }

        if !self.params.stroke {
            path.close_path();
        }

        let color = gen_color(&mut self.rng, 127);
        Some(Command::path(path, color, self.params.stroke))
    }
}

/// An endless sequence of random colors.
pub struct ColorIter {
    opaque: bool,
    rng: StdRng,
}

impl ColorIter {
    pub fn new(opaque: bool) -> Self {
        Self {
            opaque,
            rng: StdRng::from_seed(SEED),
        }
    }
}

impl Iterator for ColorIter {
    type Item = AlphaColor<Srgb>;

    fn next(&mut self) -> Option<Self::Item> {
        let alpha = if self.opaque {
            255
        } else {
            self.rng.gen_range(0..=255)
        };

        Some(gen_color(&mut self.rng, alpha))
    }
}

fn gen_color(rng: &mut StdRng, alpha: u8) -> AlphaColor<Srgb> {
    let r = rng.gen_range(0..=255);
    let g = rng.gen_range(0..=255);
    let b = rng.gen_range(0..=255);

    AlphaColor::from_rgba8(r, g, b, alpha)
}
