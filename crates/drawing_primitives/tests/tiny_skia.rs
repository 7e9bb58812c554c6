//! Compare coverage against tiny-skia, which rasterizes with a different algorithm.

use crate::util::{covered_area, get_diff, get_options, get_pixmap, to_skia_path};
use drawing_primitives::color::palette;
use drawing_primitives::kurbo::Point;
use drawing_primitives::{
    draw_path, fill_path, DrawingOptions, EndCapStyle, FillRule, JointStyle, Path, Pen, Pixmap,
    SolidBrush,
};
use tiny_skia::{LineCap, LineJoin, Paint, Stroke, Transform};

mod util;

const SIZE: usize = 50;

fn black_paint() -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(0, 0, 0, 255);
    paint.anti_alias = true;
    paint
}

fn options() -> DrawingOptions {
    get_options().with_tolerance(0.01)
}

fn star() -> Path {
    let points = (0..5)
        .map(|i| {
            let angle = i as f64 * 4.0 * std::f64::consts::PI / 5.0 - std::f64::consts::FRAC_PI_2;
            Point::new(25.0 + 22.0 * angle.cos(), 25.0 + 22.0 * angle.sin())
        })
        .collect::<Vec<_>>();

    Path::polygon(&points)
}

fn check(actual: &Pixmap, expected: &tiny_skia::Pixmap, max_diff: u8) {
    let expected_area = expected
        .data()
        .chunks_exact(4)
        .map(|p| p[3] as f64 / 255.0)
        .sum::<f64>();
    let actual_area = covered_area(actual);

    assert!(
        (actual_area - expected_area).abs() < expected_area * 0.01,
        "area {actual_area} differs from {expected_area}"
    );

    let (_, diff) = get_diff(expected.data(), actual.data());
    assert!(diff <= max_diff, "max difference is {diff}");
}

fn fill_both(path: &Path, rule: FillRule) -> (Pixmap, tiny_skia::Pixmap) {
    let mut pixmap = get_pixmap(SIZE, SIZE, true);
    let brush = SolidBrush::new(palette::css::BLACK);
    let options = options().with_intersection_rule(rule);
    fill_path(&mut pixmap, path, &brush, &options, None, None).unwrap();

    let mut reference = tiny_skia::Pixmap::new(SIZE as u32, SIZE as u32).unwrap();
    let rule = match rule {
        FillRule::NonZero => tiny_skia::FillRule::Winding,
        FillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
    };
    reference.fill_path(
        &to_skia_path(path.bez_path()),
        &black_paint(),
        rule,
        Transform::identity(),
        None,
    );

    (pixmap, reference)
}

#[test]
fn circle() {
    let path = Path::circle((25.0, 25.0), 20.0);
    let (pixmap, reference) = fill_both(&path, FillRule::NonZero);

    check(&pixmap, &reference, 64);
}

#[test]
fn star_non_zero() {
    let (pixmap, reference) = fill_both(&star(), FillRule::NonZero);

    // The tips of the star are thinner than a pixel.
    check(&pixmap, &reference, 96);
}

#[test]
fn star_even_odd() {
    let (pixmap, reference) = fill_both(&star(), FillRule::EvenOdd);

    check(&pixmap, &reference, 96);
}

#[test]
fn round_stroke() {
    let path = Path::polyline(&[
        Point::new(8.0, 40.0),
        Point::new(20.0, 10.0),
        Point::new(30.0, 38.0),
        Point::new(42.0, 12.0),
    ]);

    let mut pixmap = get_pixmap(SIZE, SIZE, true);
    let pen = Pen::new(SolidBrush::new(palette::css::BLACK), 5.0)
        .with_joint(JointStyle::Round)
        .with_end_cap(EndCapStyle::Round);
    draw_path(&mut pixmap, &path, &pen, &options(), None, None).unwrap();

    let mut reference = tiny_skia::Pixmap::new(SIZE as u32, SIZE as u32).unwrap();
    let stroke = Stroke {
        width: 5.0,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };
    reference.stroke_path(
        &to_skia_path(path.bez_path()),
        &black_paint(),
        &stroke,
        Transform::identity(),
        None,
    );

    check(&pixmap, &reference, 96);
}
