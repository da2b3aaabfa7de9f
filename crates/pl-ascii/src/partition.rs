use pl_core::frame::GridCell;

/// Split one mapped cell between the two pens.
///
/// Strictly brighter than `threshold` goes to pen 1, everything else to pen 2.
/// The other pen gets [`GridCell::BLANK`]. `brightness` is the post-inversion
/// value used for glyph selection.
///
/// # Example
/// ```
/// use pl_ascii::partition::partition;
/// use pl_core::frame::GridCell;
/// use pl_core::color::CellColor;
/// let cell = GridCell { ch: '@', color: CellColor::WHITE };
/// assert_eq!(partition(cell, 0.8, 0.5), (cell, GridCell::BLANK));
/// assert_eq!(partition(cell, 0.5, 0.5), (GridCell::BLANK, cell));
/// ```
#[inline(always)]
#[must_use]
pub fn partition(cell: GridCell, brightness: f64, threshold: f64) -> (GridCell, GridCell) {
    if brightness > threshold {
        (cell, GridCell::BLANK)
    } else {
        (GridCell::BLANK, cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pl_core::color::CellColor;

    const MARK: GridCell = GridCell {
        ch: '#',
        color: CellColor::Rgb(1, 2, 3),
    };

    #[test]
    fn exactly_one_pen_draws_a_mark() {
        for i in 0..=100 {
            let b = f64::from(i) / 100.0;
            let (p1, p2) = partition(MARK, b, 0.37);
            assert!(p1.is_blank() ^ p2.is_blank(), "brightness {b}");
        }
    }

    #[test]
    fn blank_side_is_transparent() {
        let (p1, p2) = partition(MARK, 0.9, 0.5);
        assert_eq!(p1, MARK);
        assert_eq!(p2.color, CellColor::Transparent);
    }

    #[test]
    fn inverted_below_equals_plain_above_complement() {
        // pen1 iff (1 − b) < t  ⟺  pen1 iff b > 1 − t
        for t in [0.15_f64, 0.33, 0.5, 0.71, 0.9] {
            for i in 0..100 {
                let b = f64::from(i) / 100.0 + 0.005;
                let inverted_swapped = (1.0 - b) < t;
                let (p1, _) = partition(MARK, b, 1.0 - t);
                assert_eq!(inverted_swapped, !p1.is_blank(), "b={b} t={t}");
            }
        }
    }
}
