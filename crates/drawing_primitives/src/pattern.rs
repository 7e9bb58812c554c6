// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Brushes repeating a small cell of colors over the whole target.

use crate::error::{invalid, Error};
use crate::paint::Brush;
use crate::pixmap::Region;
use crate::util::{ColorExt, COLOR_COMPONENTS};
use peniko::color::{AlphaColor, Srgb};
use std::sync::Arc;

#[derive(Debug, PartialEq)]
struct Repr {
    width: usize,
    height: usize,
    cells: Vec<[u8; COLOR_COMPONENTS]>,
}

/// A brush tiling a `width x height` cell of colors, addressed by target pixel coordinates
/// modulo the cell size. Cloning is cheap, the cell is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternBrush(Arc<Repr>);

impl PatternBrush {
    /// Create a pattern from a row-major list of colors.
    pub fn new(width: usize, height: usize, colors: &[AlphaColor<Srgb>]) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(invalid("pattern cell must not be empty"));
        }

        if colors.len() != width * height {
            return Err(invalid(format!(
                "pattern cell of {width}x{height} needs {} colors, got {}",
                width * height,
                colors.len()
            )));
        }

        Ok(Self(Arc::new(Repr {
            width,
            height,
            cells: colors.iter().map(|c| c.to_rgba8_fast()).collect(),
        })))
    }

    /// Create a two-color pattern from a mask, where `true` selects the foreground color.
    /// All rows of the mask must have the same length.
    pub fn from_mask<R: AsRef<[bool]>>(
        foreground: AlphaColor<Srgb>,
        background: AlphaColor<Srgb>,
        mask: &[R],
    ) -> Result<Self, Error> {
        let height = mask.len();
        let width = mask.first().map(|r| r.as_ref().len()).unwrap_or(0);

        if mask.iter().any(|r| r.as_ref().len() != width) {
            return Err(invalid("pattern mask rows differ in length"));
        }

        let colors = mask
            .iter()
            .flat_map(|r| r.as_ref().iter())
            .map(|&on| if on { foreground } else { background })
            .collect::<Vec<_>>();

        Self::new(width, height, &colors)
    }

    pub fn width(&self) -> usize {
        self.0.width
    }

    pub fn height(&self) -> usize {
        self.0.height
    }

    /// Horizontal lines, one pixel thick every four rows.
    pub fn horizontal(foreground: AlphaColor<Srgb>, background: AlphaColor<Srgb>) -> Self {
        Self::preset(foreground, background, &HORIZONTAL)
    }

    /// Vertical lines, one pixel thick every four columns.
    pub fn vertical(foreground: AlphaColor<Srgb>, background: AlphaColor<Srgb>) -> Self {
        Self::preset(foreground, background, &VERTICAL)
    }

    /// Diagonal lines running from the top left to the bottom right.
    pub fn forward_diagonal(foreground: AlphaColor<Srgb>, background: AlphaColor<Srgb>) -> Self {
        Self::preset(foreground, background, &FORWARD_DIAGONAL)
    }

    /// Diagonal lines running from the top right to the bottom left.
    pub fn backward_diagonal(foreground: AlphaColor<Srgb>, background: AlphaColor<Srgb>) -> Self {
        Self::preset(foreground, background, &BACKWARD_DIAGONAL)
    }

    /// A single foreground pixel in every 4x4 cell.
    pub fn min(foreground: AlphaColor<Srgb>, background: AlphaColor<Srgb>) -> Self {
        Self::preset(foreground, background, &MIN)
    }

    pub fn percent10(foreground: AlphaColor<Srgb>, background: AlphaColor<Srgb>) -> Self {
        Self::preset(foreground, background, &PERCENT10)
    }

    pub fn percent20(foreground: AlphaColor<Srgb>, background: AlphaColor<Srgb>) -> Self {
        Self::preset(foreground, background, &PERCENT20)
    }

    pub fn percent25(foreground: AlphaColor<Srgb>, background: AlphaColor<Srgb>) -> Self {
        Self::preset(foreground, background, &PERCENT25)
    }

    pub fn percent50(foreground: AlphaColor<Srgb>, background: AlphaColor<Srgb>) -> Self {
        Self::preset(foreground, background, &PERCENT50)
    }

    pub fn percent75(foreground: AlphaColor<Srgb>, background: AlphaColor<Srgb>) -> Self {
        Self::preset(foreground, background, &PERCENT75)
    }

    pub fn percent90(foreground: AlphaColor<Srgb>, background: AlphaColor<Srgb>) -> Self {
        Self::preset(foreground, background, &PERCENT90)
    }

    fn preset(
        foreground: AlphaColor<Srgb>,
        background: AlphaColor<Srgb>,
        mask: &[[bool; 4]; 4],
    ) -> Self {
        let colors = mask
            .iter()
            .flatten()
            .map(|&on| if on { foreground } else { background })
            .collect::<Vec<_>>();

        Self(Arc::new(Repr {
            width: 4,
            height: 4,
            cells: colors.iter().map(|c| c.to_rgba8_fast()).collect(),
        }))
    }
}

impl Brush for PatternBrush {
    #[inline]
    fn sample(&self, x: usize, y: usize, _: &Region) -> [u8; COLOR_COMPONENTS] {
        let repr = &self.0;
        repr.cells[(y % repr.height) * repr.width + x % repr.width]
    }

    fn is_opaque(&self) -> bool {
        self.0.cells.iter().all(|c| c[3] == 255)
    }
}

const X: bool = true;
const O: bool = false;

const HORIZONTAL: [[bool; 4]; 4] = [[O, O, O, O], [X, X, X, X], [O, O, O, O], [O, O, O, O]];
const VERTICAL: [[bool; 4]; 4] = [[O, X, O, O], [O, X, O, O], [O, X, O, O], [O, X, O, O]];
const FORWARD_DIAGONAL: [[bool; 4]; 4] = [[X, O, O, O], [O, X, O, O], [O, O, X, O], [O, O, O, X]];
const BACKWARD_DIAGONAL: [[bool; 4]; 4] = [[O, O, O, X], [O, O, X, O], [O, X, O, O], [X, O, O, O]];
const MIN: [[bool; 4]; 4] = [[O, O, O, O], [O, O, O, O], [O, O, X, O], [O, O, O, O]];
const PERCENT10: [[bool; 4]; 4] = [[X, O, O, O], [O, O, O, O], [O, O, X, O], [O, O, O, O]];
const PERCENT20: [[bool; 4]; 4] = [[X, O, X, O], [O, O, O, O], [O, O, X, O], [O, O, O, O]];
const PERCENT25: [[bool; 4]; 4] = [[X, O, X, O], [O, O, O, O], [X, O, X, O], [O, O, O, O]];
const PERCENT50: [[bool; 4]; 4] = [[X, O, X, O], [X, X, X, X], [X, O, X, O], [O, O, O, O]];
const PERCENT75: [[bool; 4]; 4] = [[X, O, X, O], [X, X, X, X], [X, O, X, O], [X, X, X, X]];
const PERCENT90: [[bool; 4]; 4] = [[X, X, X, X], [X, X, X, X], [X, X, X, O], [X, X, X, X]];

#[cfg(test)]
mod tests {
    use super::PatternBrush;
    use crate::error::Error;
    use crate::paint::Brush;
    use crate::pixmap::Region;
    use peniko::color::palette::css::{BLACK, RED, WHITE};

    const REGION: Region = Region::new(0, 0, 100, 100);

    #[test]
    fn sample_wraps_around_cell() {
        let brush = PatternBrush::new(2, 1, &[RED, WHITE]).unwrap();

        assert_eq!(brush.sample(0, 0, &REGION), [255, 0, 0, 255]);
        assert_eq!(brush.sample(1, 0, &REGION), [255, 255, 255, 255]);
        assert_eq!(brush.sample(2, 7, &REGION), [255, 0, 0, 255]);
        assert_eq!(brush.sample(51, 3, &REGION), [255, 255, 255, 255]);
        assert!(brush.is_opaque());
    }

    #[test]
    fn mask_selects_foreground() {
        let brush = PatternBrush::from_mask(BLACK, WHITE, &[[true, false], [false, true]]).unwrap();

        assert_eq!(brush.sample(0, 0, &REGION), [0, 0, 0, 255]);
        assert_eq!(brush.sample(1, 0, &REGION), [255, 255, 255, 255]);
        assert_eq!(brush.sample(3, 3, &REGION), [0, 0, 0, 255]);
    }

    #[test]
    fn horizontal_preset_repeats_every_four_rows() {
        let brush = PatternBrush::horizontal(BLACK, WHITE);

        for x in 0..8 {
            assert_eq!(brush.sample(x, 1, &REGION), [0, 0, 0, 255]);
            assert_eq!(brush.sample(x, 5, &REGION), [0, 0, 0, 255]);
            assert_eq!(brush.sample(x, 2, &REGION), [255, 255, 255, 255]);
        }
    }

    #[test]
    fn invalid_cells_are_rejected() {
        assert!(matches!(
            PatternBrush::new(0, 1, &[]),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            PatternBrush::new(2, 2, &[RED]),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            PatternBrush::from_mask(RED, WHITE, &[vec![true], vec![true, false]]),
            Err(Error::InvalidConfiguration(_))
        ));
    }
}
