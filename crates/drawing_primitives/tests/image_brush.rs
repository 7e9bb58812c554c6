use crate::util::{alpha, get_options, get_pixmap};
use drawing_primitives::kurbo::{Point, Rect};
use drawing_primitives::{
    draw_path, fill_path, fill_rect, fill_region, Extend, ImageBrush, Path, Pen, Pixmap, Region,
};
use image::{GrayImage, Luma, Rgba, RgbaImage};

mod util;

const A: [u8; 4] = [255, 0, 0, 255];
const B: [u8; 4] = [0, 255, 0, 255];
const C: [u8; 4] = [0, 0, 255, 255];
const D: [u8; 4] = [255, 255, 255, 255];

fn checker() -> Pixmap {
    let mut source = Pixmap::new(2, 2);
    source.set_pixel(0, 0, A);
    source.set_pixel(1, 0, B);
    source.set_pixel(0, 1, C);
    source.set_pixel(1, 1, D);

    source
}

#[test]
fn image_is_tiled_from_region_origin() {
    let source = checker();
    let brush = ImageBrush::new(&source).unwrap();
    let mut pixmap = get_pixmap(10, 10, true);
    let region = Region::new(2, 3, 5, 4);

    fill_region(&mut pixmap, &brush, &get_options(), Some(region), None).unwrap();

    assert_eq!(pixmap.pixel(2, 3), A);
    assert_eq!(pixmap.pixel(3, 3), B);
    assert_eq!(pixmap.pixel(4, 3), A);
    assert_eq!(pixmap.pixel(2, 4), C);
    assert_eq!(pixmap.pixel(5, 6), D);
    assert_eq!(alpha(&pixmap, 1, 3), 0);
    assert_eq!(alpha(&pixmap, 7, 3), 0);
    assert_eq!(alpha(&pixmap, 2, 7), 0);
}

#[test]
fn brush_is_reusable() {
    let source = checker();
    let original = source.clone();
    let brush = ImageBrush::new(&source).unwrap();

    let mut first = get_pixmap(8, 8, false);
    let mut second = get_pixmap(8, 8, false);
    let path = Path::polygon(&[
        Point::new(0.5, 0.5),
        Point::new(7.5, 1.5),
        Point::new(3.0, 7.5),
    ]);

    fill_path(&mut first, &path, &brush, &get_options(), None, None).unwrap();
    fill_path(&mut second, &path, &brush, &get_options(), None, None).unwrap();

    assert_eq!(first, second);
    assert_eq!(source, original);
}

#[test]
fn pad_repeats_the_edge() {
    let source = checker();
    let brush = ImageBrush::new(&source).unwrap().with_extend(Extend::Pad);
    let mut pixmap = get_pixmap(5, 5, true);

    fill_rect(
        &mut pixmap,
        Rect::new(0.0, 0.0, 5.0, 5.0),
        &brush,
        &get_options(),
        None,
        None,
    )
    .unwrap();

    assert_eq!(pixmap.pixel(0, 0), A);
    assert_eq!(pixmap.pixel(4, 0), B);
    assert_eq!(pixmap.pixel(0, 4), C);
    assert_eq!(pixmap.pixel(4, 4), D);
}

#[cfg(feature = "image")]
#[test]
fn straight_alpha_source_is_premultiplied() {
    let source = RgbaImage::from_pixel(3, 3, Rgba([255, 0, 0, 128]));
    let brush = ImageBrush::new(&source).unwrap();
    let mut pixmap = get_pixmap(4, 4, true);

    fill_region(&mut pixmap, &brush, &get_options(), None, None).unwrap();

    assert_eq!(pixmap.pixel(0, 0), [128, 0, 0, 128]);
    assert_eq!(pixmap.pixel(3, 3), [128, 0, 0, 128]);
}

#[cfg(feature = "image")]
#[test]
fn gray_source_is_opaque() {
    let source = GrayImage::from_pixel(2, 2, Luma([100]));
    let brush = ImageBrush::new(&source).unwrap();
    let mut pixmap = get_pixmap(4, 4, false);

    fill_region(&mut pixmap, &brush, &get_options(), None, None).unwrap();

    assert_eq!(pixmap.pixel(1, 2), [100, 100, 100, 255]);
}

#[test]
fn image_pen() {
    let source = checker();
    let pen = Pen::new(ImageBrush::new(&source).unwrap(), 2.0);
    let mut pixmap = get_pixmap(10, 10, true);
    let line = Path::polyline(&[Point::new(0.0, 5.0), Point::new(10.0, 5.0)]);

    draw_path(&mut pixmap, &line, &pen, &get_options(), None, None).unwrap();

    // Rows 4 and 5 are covered and sampled relative to the target origin.
    assert_eq!(pixmap.pixel(0, 4), A);
    assert_eq!(pixmap.pixel(1, 4), B);
    assert_eq!(pixmap.pixel(0, 5), C);
    assert_eq!(alpha(&pixmap, 0, 3), 0);
}
