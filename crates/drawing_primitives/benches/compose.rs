//! Compositing of coverage strips.

use bench_gen::ColorIter;
use criterion::Criterion;
use drawing_primitives::fine::Fine;
use drawing_primitives::strip::Strip;
use drawing_primitives::{Pixmap, Region, SolidBrush};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

const WIDTH: usize = 256;
const STRIP_ITERS: usize = 400;
const SEED: [u8; 32] = [0; 32];

pub fn compose(c: &mut Criterion) {
    let mut g = c.benchmark_group("compose");

    let mut rng = StdRng::from_seed(SEED);
    let mut alphas = vec![0; WIDTH];
    rng.fill_bytes(&mut alphas);
    let strip = Strip {
        x: 0,
        y: 0,
        alphas,
    };
    let full = Strip {
        x: 0,
        y: 0,
        alphas: vec![255; WIDTH],
    };

    for (name, opaque) in [("opaque", true), ("translucent", false)] {
        for (kind, strip) in [("random", &strip), ("full", &full)] {
            g.bench_function(format!("{kind} - {name}"), |b| {
                let mut pixmap = Pixmap::new(WIDTH, 1);
                let region = Region::of(&pixmap);

                b.iter(|| {
                    for color in ColorIter::new(opaque).take(STRIP_ITERS) {
                        let brush = SolidBrush::new(color);
                        let mut fine = Fine::new(&mut pixmap, &brush, region);
                        fine.strip(strip);
                    }
                })
            });
        }
    }
}
