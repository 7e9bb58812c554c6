// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Converting the centerline of a path into the outline of its stroke.
//!
//! The outline consists of closed polygons whose `NonZero` fill is the visual stroke. An
//! open subpath becomes a single loop: its left offset, the end cap, its right offset traversed
//! backwards and the start cap. A closed subpath becomes two loops of opposite orientation,
//! one on each side of the centerline.

use crate::error::{invalid, Error};
use crate::flatten::Subpath;
use crate::paint::SolidBrush;
use peniko::kurbo::{Point, Vec2};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Below this, the sine of the angle between two segments counts as zero.
const COLLINEAR_EPSILON: f64 = 1e-9;

/// Upper bound for the number of dashes and gaps a single call may produce.
const MAX_DASH_PIECES: f64 = (1 << 20) as f64;

/// How two segments of a stroke are connected, on the outer side of the turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum JointStyle {
    /// Extend both outer edges until they meet, up to the miter limit.
    #[default]
    Miter,
    /// A circular arc around the vertex.
    Round,
    /// Connect the outer corners with a straight line, cutting the corner off.
    Square,
}

/// The shape of the ends of an open stroke.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EndCapStyle {
    /// A flat cut through the endpoint.
    #[default]
    Butt,
    /// A half circle centered at the endpoint.
    Round,
    /// A flat cut, half a stroke width beyond the endpoint.
    Square,
}

/// Everything defining how a path is stroked.
#[derive(Clone, Debug, PartialEq)]
pub struct Pen<B = SolidBrush> {
    /// The color source of the stroke.
    pub brush: B,
    pub width: f64,
    pub joint: JointStyle,
    pub end_cap: EndCapStyle,
    /// The maximum distance of a miter tip from its vertex, in units of half the width.
    pub miter_limit: f64,
    /// Alternating lengths of dashes and gaps, in units of the width. `None` strokes solid.
    pub dash: Option<Vec<f64>>,
}

impl<B> Pen<B> {
    pub const DEFAULT_MITER_LIMIT: f64 = 4.0;

    pub fn new(brush: B, width: f64) -> Self {
        Self {
            brush,
            width,
            joint: JointStyle::default(),
            end_cap: EndCapStyle::default(),
            miter_limit: Self::DEFAULT_MITER_LIMIT,
            dash: None,
        }
    }

    /// A solid pen. Same as [`Pen::new`].
    pub fn solid(brush: B, width: f64) -> Self {
        Self::new(brush, width)
    }

    /// Dashes three widths long, separated by gaps of one width.
    pub fn dash(brush: B, width: f64) -> Self {
        Self::new(brush, width).with_dash(vec![3.0, 1.0])
    }

    pub fn dot(brush: B, width: f64) -> Self {
        Self::new(brush, width).with_dash(vec![1.0, 1.0])
    }

    pub fn dash_dot(brush: B, width: f64) -> Self {
        Self::new(brush, width).with_dash(vec![3.0, 1.0, 1.0, 1.0])
    }

    pub fn dash_dot_dot(brush: B, width: f64) -> Self {
        Self::new(brush, width).with_dash(vec![3.0, 1.0, 1.0, 1.0, 1.0, 1.0])
    }

    pub fn with_joint(mut self, joint: JointStyle) -> Self {
        self.joint = joint;
        self
    }

    pub fn with_end_cap(mut self, end_cap: EndCapStyle) -> Self {
        self.end_cap = end_cap;
        self
    }

    pub fn with_miter_limit(mut self, miter_limit: f64) -> Self {
        self.miter_limit = miter_limit;
        self
    }

    pub fn with_dash(mut self, dash: Vec<f64>) -> Self {
        self.dash = Some(dash);
        self
    }

    /// Check that the pen describes a stroke that can be outlined.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(invalid(format!(
                "pen width must be positive, got {}",
                self.width
            )));
        }

        if !self.miter_limit.is_finite() || self.miter_limit < 1.0 {
            return Err(invalid(format!(
                "miter limit must be at least 1, got {}",
                self.miter_limit
            )));
        }

        if let Some(dash) = &self.dash {
            if dash.iter().any(|l| !l.is_finite() || *l < 0.0) {
                return Err(invalid("dash lengths must be non-negative"));
            }

            if dash.iter().sum::<f64>() <= 0.0 {
                return Err(invalid("dash pattern has no length"));
            }
        }

        Ok(())
    }
}

/// Outline the given centerlines with a pen.
///
/// Arcs of round joins and caps deviate at most `tolerance` from the true circle. The pen is
/// validated before anything is outlined.
pub fn outline<B>(
    subpaths: &[Subpath],
    pen: &Pen<B>,
    tolerance: f64,
) -> Result<Vec<Subpath>, Error> {
    pen.validate()?;

    if !tolerance.is_finite() || tolerance <= 0.0 {
        return Err(invalid(format!(
            "tolerance must be positive, got {tolerance}"
        )));
    }

    let stroker = Stroker {
        half_width: pen.width / 2.0,
        joint: pen.joint,
        end_cap: pen.end_cap,
        miter_limit: pen.miter_limit,
        tolerance,
    };

    let dash = pen
        .dash
        .as_ref()
        .map(|d| d.iter().map(|l| l * pen.width).collect::<Vec<_>>());

    if let Some(pattern) = &dash {
        let period = pattern.iter().sum::<f64>();
        let pieces = subpaths
            .iter()
            .map(|s| (s.length() / period).ceil() * pattern.len() as f64)
            .sum::<f64>();

        if pieces > MAX_DASH_PIECES {
            return Err(invalid(format!(
                "dash pattern would split the path into {pieces} pieces"
            )));
        }
    }

    let mut loops = vec![];

    for subpath in subpaths {
        match &dash {
            Some(pattern) => {
                for piece in dash_polyline(&subpath.points, subpath.closed, pattern) {
                    stroker.stroke(&piece.points, piece.closed, &mut loops);
                }
            }
            None => stroker.stroke(&subpath.points, subpath.closed, &mut loops),
        }
    }

    log::trace!(
        "outlined {} subpaths into {} loops with {} points",
        subpaths.len(),
        loops.len(),
        loops.iter().map(|l| l.points.len()).sum::<usize>()
    );

    Ok(loops)
}

struct Stroker {
    half_width: f64,
    joint: JointStyle,
    end_cap: EndCapStyle,
    miter_limit: f64,
    tolerance: f64,
}

impl Stroker {
    fn stroke(&self, points: &[Point], closed: bool, loops: &mut Vec<Subpath>) {
        let mut points = points.to_vec();
        points.dedup_by(|a, b| (*a - *b).hypot2() < COLLINEAR_EPSILON * COLLINEAR_EPSILON);

        if closed {
            while points.len() > 1
                && (points[0] - points[points.len() - 1]).hypot2()
                    < COLLINEAR_EPSILON * COLLINEAR_EPSILON
            {
                points.pop();
            }
        }

        match points.len() {
            0 => {}
            1 => self.dot(points[0], loops),
            2 => self.open(&points, loops),
            _ if closed => self.closed(&points, loops),
            _ => self.open(&points, loops),
        }
    }

    /// A subpath of zero length. Only a round cap leaves a visible mark.
    fn dot(&self, center: Point, loops: &mut Vec<Subpath>) {
        if self.end_cap != EndCapStyle::Round {
            return;
        }

        let mut out = vec![center + Vec2::new(self.half_width, 0.0)];
        self.arc(center, 0.0, TAU, &mut out);
        loops.push(Subpath::new(out, true));
    }

    fn open(&self, points: &[Point], loops: &mut Vec<Subpath>) {
        let n = points.len();
        let mut out = vec![];

        self.offset_open(points, &mut out);
        self.cap(points[n - 1], direction(points[n - 2], points[n - 1]), &mut out);

        let reversed = points.iter().rev().copied().collect::<Vec<_>>();
        self.offset_open(&reversed, &mut out);
        self.cap(points[0], direction(points[1], points[0]), &mut out);

        loops.push(Subpath::new(out, true));
    }

    fn closed(&self, points: &[Point], loops: &mut Vec<Subpath>) {
        let reversed = points.iter().rev().copied().collect::<Vec<_>>();

        for side in [points, &reversed[..]] {
            let n = side.len();
            let mut out = vec![];

            for i in 0..n {
                let prev = side[(i + n - 1) % n];
                let vertex = side[i];
                let next = side[(i + 1) % n];
                self.join(vertex, prev, next, &mut out);
            }

            loops.push(Subpath::new(out, true));
        }
    }

    /// Offset an open polyline to its left side, from its first to its last point.
    fn offset_open(&self, points: &[Point], out: &mut Vec<Point>) {
        let n = points.len();

        out.push(points[0] + normal(direction(points[0], points[1])) * self.half_width);

        for i in 1..n - 1 {
            self.join(points[i], points[i - 1], points[i + 1], out);
        }

        out.push(points[n - 1] + normal(direction(points[n - 2], points[n - 1])) * self.half_width);
    }

    /// Connect the left offsets of the segments `prev -> vertex` and `vertex -> next`.
    fn join(&self, vertex: Point, prev: Point, next: Point, out: &mut Vec<Point>) {
        let h = self.half_width;
        let len0 = (vertex - prev).hypot();
        let len1 = (next - vertex).hypot();
        let d0 = (vertex - prev) / len0;
        let d1 = (next - vertex) / len1;
        let n0 = normal(d0);
        let n1 = normal(d1);
        let a = vertex + n0 * h;
        let b = vertex + n1 * h;

        let cross = d0.cross(d1);
        let dot = d0.dot(d1);

        if cross.abs() < COLLINEAR_EPSILON && dot > 0.0 {
            out.push(a);
            return;
        }

        if cross >= COLLINEAR_EPSILON {
            // The left side is on the inside of the turn. The offset edges intersect
            // `h * tan(angle / 2)` before the vertex.
            let t = h * cross / (1.0 + dot);
            if t <= len0.min(len1) {
                out.push(a - d0 * t);
            } else {
                out.extend([a, vertex, b]);
            }
            return;
        }

        match self.joint {
            JointStyle::Square => out.extend([a, b]),
            JointStyle::Round => {
                out.push(a);
                self.arc(vertex, n0.atan2(), -cross.abs().atan2(dot), out);
                out.push(b);
            }
            JointStyle::Miter => {
                let cos_half = ((1.0 + dot) / 2.0).max(0.0).sqrt();
                let sin_half = ((1.0 - dot) / 2.0).max(0.0).sqrt();
                let limit = self.miter_limit * h;

                if h <= limit * cos_half {
                    out.push(a + d0 * (h * sin_half / cos_half));
                } else {
                    // Cut the miter perpendicular to the bisector, `limit` away from the vertex.
                    let t = (limit - h * cos_half) / sin_half;
                    out.extend([a + d0 * t, b - d1 * t]);
                }
            }
        }
    }

    /// The cap at `end`, reached in direction `dir`, from its left to its right side.
    fn cap(&self, end: Point, dir: Vec2, out: &mut Vec<Point>) {
        let h = self.half_width;
        let n = normal(dir);

        match self.end_cap {
            EndCapStyle::Butt => {}
            EndCapStyle::Square => {
                out.extend([end + (n + dir) * h, end + (dir - n) * h]);
            }
            EndCapStyle::Round => self.arc(end, n.atan2(), -PI, out),
        }
    }

    /// Push the points strictly between the start and the end of an arc around `center`.
    fn arc(&self, center: Point, start_angle: f64, sweep: f64, out: &mut Vec<Point>) {
        let r = self.half_width;
        let step = if self.tolerance < r {
            2.0 * (1.0 - self.tolerance / r).acos()
        } else {
            FRAC_PI_2
        };
        let n = (sweep.abs() / step.clamp(1e-3, FRAC_PI_2)).ceil().max(1.0) as usize;
        let da = sweep / n as f64;

        for i in 1..n {
            out.push(center + Vec2::from_angle(start_angle + da * i as f64) * r);
        }
    }
}

#[inline]
fn direction(from: Point, to: Point) -> Vec2 {
    (to - from).normalize()
}

/// The left normal of a direction.
#[inline]
fn normal(dir: Vec2) -> Vec2 {
    Vec2::new(-dir.y, dir.x)
}

/// Split a polyline into the pieces covered by the dashes of `pattern`.
///
/// On a closed polyline, a dash that is still on when the end is reached continues into the
/// first dash, so the start point gets a joint instead of two caps. A closed polyline covered
/// by a single dash stays closed.
fn dash_polyline(points: &[Point], closed: bool, pattern: &[f64]) -> Vec<Subpath> {
    let mut pieces: Vec<Vec<Point>> = vec![];

    let Some(&first) = points.first() else {
        return vec![];
    };

    let mut index = 0;
    let mut remaining = pattern[0];
    let mut on = true;
    let mut piece = vec![first];

    let closing = closed.then(|| [points[points.len() - 1], first]);
    let segments = points
        .windows(2)
        .map(|w| [w[0], w[1]])
        .chain(closing.filter(|[a, b]| a != b));

    for [a, b] in segments {
        let seg_len = (b - a).hypot();
        let mut pos = 0.0;

        while seg_len - pos > remaining {
            pos += remaining;
            let p = a.lerp(b, pos / seg_len);

            if on {
                piece.push(p);
                pieces.push(std::mem::take(&mut piece));
            } else {
                piece = vec![p];
            }

            on = !on;
            index = (index + 1) % pattern.len();
            remaining = pattern[index];
        }

        remaining -= seg_len - pos;
        if on {
            piece.push(b);
        }
    }

    if on && !piece.is_empty() {
        if closed {
            if pieces.is_empty() {
                return vec![Subpath::new(points.to_vec(), true)];
            }

            let head = pieces.remove(0);
            piece.extend(head.into_iter().skip(1));
        }

        pieces.push(piece);
    }

    pieces
        .into_iter()
        .map(|piece| Subpath::new(piece, false))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{dash_polyline, outline, EndCapStyle, JointStyle, Pen};
    use crate::error::Error;
    use crate::flatten::Subpath;
    use peniko::kurbo::Point;

    const TOLERANCE: f64 = 0.001;

    fn line() -> Vec<Subpath> {
        vec![Subpath::new(
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
            false,
        )]
    }

    fn pen() -> Pen<()> {
        Pen::new((), 2.0)
    }

    fn total_area(loops: &[Subpath]) -> f64 {
        loops.iter().map(|l| l.signed_area()).sum::<f64>().abs()
    }

    #[test]
    fn butt_line_area() {
        let loops = outline(&line(), &pen(), TOLERANCE).unwrap();

        assert_eq!(loops.len(), 1);
        assert!(loops[0].closed);
        assert!((total_area(&loops) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn square_cap_extends_line() {
        let pen = pen().with_end_cap(EndCapStyle::Square);
        let loops = outline(&line(), &pen, TOLERANCE).unwrap();

        assert!((total_area(&loops) - 24.0).abs() < 1e-9);
    }

    #[test]
    fn round_cap_adds_circle() {
        let pen = pen().with_end_cap(EndCapStyle::Round);
        let loops = outline(&line(), &pen, TOLERANCE).unwrap();

        assert!((total_area(&loops) - (20.0 + std::f64::consts::PI)).abs() < 0.01);
    }

    #[test]
    fn closed_square_has_two_loops() {
        let square = vec![Subpath::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
            ],
            true,
        )];
        let loops = outline(&square, &pen(), TOLERANCE).unwrap();

        assert_eq!(loops.len(), 2);
        let a = loops[0].signed_area();
        let b = loops[1].signed_area();
        assert!(a * b < 0.0, "{a} {b}");

        let mut areas = [a.abs(), b.abs()];
        areas.sort_by(f64::total_cmp);
        assert!((areas[0] - 64.0).abs() < 1e-9);
        assert!((areas[1] - 144.0).abs() < 1e-9);
    }

    fn sharp_v() -> Vec<Subpath> {
        vec![Subpath::new(
            vec![
                Point::new(-1.0, 20.0),
                Point::new(0.0, 0.0),
                Point::new(1.0, 20.0),
            ],
            false,
        )]
    }

    fn min_y(loops: &[Subpath]) -> f64 {
        loops
            .iter()
            .flat_map(|l| l.points.iter())
            .map(|p| p.y)
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn miter_is_limited() {
        let loops = outline(&sharp_v(), &pen(), TOLERANCE).unwrap();
        let top = min_y(&loops);

        assert!(top >= -4.0 - 1e-9, "{top}");
        assert!(top < -3.9, "{top}");
    }

    #[test]
    fn miter_within_limit_is_kept() {
        let right_angle = vec![Subpath::new(
            vec![
                Point::new(0.0, 10.0),
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
            ],
            false,
        )];
        let loops = outline(&right_angle, &pen(), TOLERANCE).unwrap();

        assert!(loops[0].points.contains(&Point::new(-1.0, -1.0)));
    }

    #[test]
    fn round_and_square_joints_stay_within_half_width() {
        for joint in [JointStyle::Round, JointStyle::Square] {
            let loops = outline(&sharp_v(), &pen().with_joint(joint), TOLERANCE).unwrap();
            let top = min_y(&loops);

            assert!(top >= -1.0 - 1e-9, "{joint:?} {top}");
        }
    }

    #[test]
    fn zero_length_subpath() {
        let dot = vec![Subpath::new(vec![Point::new(5.0, 5.0); 3], false)];

        let butt = outline(&dot, &pen(), TOLERANCE).unwrap();
        assert!(butt.is_empty());

        let round = outline(&dot, &pen().with_end_cap(EndCapStyle::Round), TOLERANCE).unwrap();
        assert_eq!(round.len(), 1);
        assert!((total_area(&round) - std::f64::consts::PI).abs() < 0.01);
    }

    #[test]
    fn dashes_split_line() {
        let points = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let pieces = dash_polyline(&points, false, &[3.0, 1.0])
            .iter()
            .map(|p| p.points.iter().map(|q| (q.x.round(), q.y)).collect::<Vec<_>>())
            .collect::<Vec<_>>();

        assert_eq!(
            pieces,
            vec![
                vec![(0.0, 0.0), (3.0, 0.0)],
                vec![(4.0, 0.0), (7.0, 0.0)],
                vec![(8.0, 0.0), (10.0, 0.0)],
            ]
        );
    }

    #[test]
    fn dashes_continue_around_corners() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
        ];
        let pieces = dash_polyline(&points, false, &[3.0, 1.0]);

        assert_eq!(pieces.len(), 1);
        assert!(!pieces[0].closed);
        assert_eq!(
            pieces[0].points,
            vec![
                Point::new(0.0, 0.0),
                Point::new(2.0, 0.0),
                Point::new(2.0, 1.0)
            ]
        );
    }

    fn square(size: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ]
    }

    #[test]
    fn closed_dash_joins_across_start() {
        // A perimeter of 40 ends in the middle of a dash.
        let pieces = dash_polyline(&square(10.0), true, &[6.0, 3.0]);

        assert_eq!(pieces.len(), 4);
        assert!(pieces.iter().all(|p| !p.closed));
        assert_eq!(
            pieces[3].points,
            vec![
                Point::new(0.0, 4.0),
                Point::new(0.0, 0.0),
                Point::new(6.0, 0.0)
            ]
        );
    }

    #[test]
    fn closed_dash_ending_in_gap_is_not_joined() {
        // A perimeter of 36 ends exactly after a gap.
        let pieces = dash_polyline(&square(9.0), true, &[6.0, 3.0]);

        assert_eq!(pieces.len(), 4);
        assert_eq!(pieces[0].points[0], Point::new(0.0, 0.0));
        assert_eq!(pieces[0].points[1], Point::new(6.0, 0.0));
    }

    #[test]
    fn closed_path_within_one_dash_stays_closed() {
        let pieces = dash_polyline(&square(2.0), true, &[10.0, 1.0]);

        assert_eq!(pieces, vec![Subpath::new(square(2.0), true)]);
    }

    #[test]
    fn too_many_dashes_are_rejected() {
        let long = vec![Subpath::new(
            vec![Point::new(0.0, 0.0), Point::new(1e6, 0.0)],
            false,
        )];
        let pen = Pen::new((), 0.001).with_dash(vec![1.0, 1.0]);

        assert!(matches!(
            outline(&long, &pen, TOLERANCE),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn dashed_pen_outlines_every_dash() {
        let pen = Pen::dash((), 1.0);
        let loops = outline(&line(), &pen, TOLERANCE).unwrap();

        assert_eq!(loops.len(), 3);
        assert!((total_area(&loops) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_pens_are_rejected() {
        let pens = [
            pen().with_miter_limit(0.5),
            Pen::new((), 0.0),
            Pen::new((), -1.0),
            Pen::new((), f64::NAN),
            pen().with_dash(vec![-1.0, 1.0]),
            pen().with_dash(vec![0.0, 0.0]),
            pen().with_dash(vec![]),
        ];

        for pen in pens {
            assert!(matches!(
                outline(&line(), &pen, TOLERANCE),
                Err(Error::InvalidConfiguration(_))
            ));
        }
    }
}
