#![allow(dead_code)]

use drawing_primitives::execute::ExecutionMode;
use drawing_primitives::kurbo::{BezPath, PathEl};
use drawing_primitives::{DrawingOptions, Pixmap};

/// The execution mode the tests run with. Set `PARALLEL` at build time to test the parallel
/// mode.
pub fn execution_mode() -> ExecutionMode {
    #[cfg(feature = "multithreading")]
    if option_env!("PARALLEL").is_some() {
        return ExecutionMode::Parallel;
    }

    ExecutionMode::Serial
}

pub fn get_options() -> DrawingOptions {
    DrawingOptions::default().with_execution_mode(execution_mode())
}

pub fn get_pixmap(width: usize, height: usize, transparent: bool) -> Pixmap {
    if transparent {
        Pixmap::new(width, height)
    } else {
        Pixmap::filled(width, height, [255, 255, 255, 255])
    }
}

pub fn alpha(pixmap: &Pixmap, x: usize, y: usize) -> u8 {
    pixmap.pixel(x, y)[3]
}

/// Number of pixels with non-zero alpha.
pub fn covered_pixels(pixmap: &Pixmap) -> usize {
    pixmap.data().chunks_exact(4).filter(|p| p[3] != 0).count()
}

/// Sum of all alpha values, in units of fully covered pixels.
pub fn covered_area(pixmap: &Pixmap) -> f64 {
    pixmap
        .data()
        .chunks_exact(4)
        .map(|p| p[3] as f64 / 255.0)
        .sum()
}

/// The number of differing pixels and the largest difference of a single channel.
pub fn get_diff(expected: &[u8], actual: &[u8]) -> (usize, u8) {
    assert_eq!(expected.len(), actual.len());

    let mut pixel_diff = 0;
    let mut max_diff = 0;

    for (e, a) in expected.chunks_exact(4).zip(actual.chunks_exact(4)) {
        if is_pix_diff(e, a) {
            pixel_diff += 1;
        }

        for i in 0..4 {
            max_diff = max_diff.max(e[i].abs_diff(a[i]));
        }
    }

    (pixel_diff, max_diff)
}

fn is_pix_diff(pixel1: &[u8], pixel2: &[u8]) -> bool {
    if pixel1[3] == 0 && pixel2[3] == 0 {
        return false;
    }

    pixel1 != pixel2
}

/// Convert a path into the path type of the reference rasterizer.
pub fn to_skia_path(path: &BezPath) -> tiny_skia::Path {
    let mut builder = tiny_skia::PathBuilder::new();

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => {
                builder.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32)
            }
            PathEl::CurveTo(p1, p2, p3) => builder.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }

    builder.finish().expect("path is not empty")
}
