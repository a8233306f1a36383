//! Filled pixel circles for brush and eraser dabs.
//!
//! The sweep walks one octant with an integer midpoint decision variable and
//! mirrors every step into the other seven. Odd and even diameters take
//! different branches: an odd circle has a center row, an even one straddles
//! the boundary between two rows.

use model::{BrushDiameter, Span};
use smallvec::SmallVec;

/// Stroke centers are clamped into this range before snapping to cells.
pub const CENTER_COORDINATE_LIMIT: f64 = (1u32 << 24) as f64;

/// Larger diameters are rasterized at this size. Together with
/// [`CENTER_COORDINATE_LIMIT`] it keeps every row and column inside `i32`.
pub const MAX_CIRCLE_DIAMETER: u32 = 1 << 16;

const UNSET_ROW: i32 = -1;

type RowHalfWidths = SmallVec<[i32; 64]>;

/// Emits one span per scanline covered by a circle of `diameter` cells
/// centered at `(center_x, center_y)`, top row first.
///
/// Spans never overlap and leave no covered column out. Diameters above
/// [`MAX_CIRCLE_DIAMETER`] are capped.
pub fn rasterize_circle<F>(center_x: f64, center_y: f64, diameter: BrushDiameter, mut emit_span: F)
where
    F: FnMut(Span),
{
    let capped = diameter.get().min(MAX_CIRCLE_DIAMETER);
    let Ok(diameter_cells) = i32::try_from(capped) else {
        return;
    };
    let is_odd = capped % 2 == 1;
    let (snapped_x, snapped_y, top_row, extra_column) = if is_odd {
        let radius = (diameter_cells - 1) / 2;
        let snapped_y = snap(center_y);
        (snap(center_x), snapped_y, snapped_y - radius, 1)
    } else {
        let radius = diameter_cells / 2;
        let snapped_y = snap(center_y + 0.5);
        (snap(center_x + 0.5), snapped_y, snapped_y - radius, 0)
    };

    let half_widths = if is_odd {
        sweep_odd(diameter_cells, snapped_y, top_row)
    } else {
        sweep_even(diameter_cells, snapped_y, top_row)
    };

    for (row_offset, half_width) in half_widths.iter().copied().enumerate() {
        if half_width == UNSET_ROW {
            continue;
        }
        let span = Span::new(
            snapped_x - half_width,
            snapped_x + half_width + extra_column,
            top_row + row_offset as i32,
        );
        if !span.is_empty() {
            emit_span(span);
        }
    }
}

/// Collects [`rasterize_circle`] output.
pub fn circle_spans(
    center_x: f64,
    center_y: f64,
    diameter: BrushDiameter,
) -> SmallVec<[Span; 32]> {
    let mut spans = SmallVec::new();
    rasterize_circle(center_x, center_y, diameter, |span| spans.push(span));
    spans
}

/// Number of cells a circle of `diameter` covers.
pub fn covered_cell_count(diameter: BrushDiameter) -> u64 {
    let mut cells = 0u64;
    rasterize_circle(0.0, 0.0, diameter, |span| cells += u64::from(span.len()));
    cells
}

fn snap(coordinate: f64) -> i32 {
    if coordinate.is_nan() {
        return 0;
    }
    coordinate
        .floor()
        .clamp(-CENTER_COORDINATE_LIMIT, CENTER_COORDINATE_LIMIT) as i32
}

// Octant mirroring revisits rows near the diagonal; a row keeps its widest
// half-width, and since every candidate is centered the widest one is the
// union of all of them.
fn record(half_widths: &mut RowHalfWidths, top_row: i32, row: i32, half_width: i32) {
    let Ok(offset) = usize::try_from(row - top_row) else {
        return;
    };
    if let Some(slot) = half_widths.get_mut(offset) {
        *slot = (*slot).max(half_width);
    }
}

// Rows span `[cx - w, cx + w + 1)`, symmetric about `center_row`.
fn sweep_odd(diameter_cells: i32, center_row: i32, top_row: i32) -> RowHalfWidths {
    let mut half_widths: RowHalfWidths = SmallVec::from_elem(UNSET_ROW, diameter_cells as usize);
    let mut x = (diameter_cells - 1) / 2;
    let mut y = 0;
    let mut error = 1 - x;
    while x >= y {
        record(&mut half_widths, top_row, center_row - y, x);
        record(&mut half_widths, top_row, center_row + y, x);
        y += 1;
        if error < 0 {
            error += 2 * y + 1;
        } else {
            if x >= y {
                record(&mut half_widths, top_row, center_row + x, y - 1);
                record(&mut half_widths, top_row, center_row - x, y - 1);
            }
            x -= 1;
            error += 2 * (y - x + 1);
        }
    }
    half_widths
}

// Rows span `[cx - w, cx + w)`; rows `center_row - 1` and `center_row` are
// the two widest.
fn sweep_even(diameter_cells: i32, center_row: i32, top_row: i32) -> RowHalfWidths {
    let mut half_widths: RowHalfWidths = SmallVec::from_elem(UNSET_ROW, diameter_cells as usize);
    let mut x = diameter_cells / 2;
    let mut y = 0;
    let mut error = 2 - x;
    while x >= y {
        record(&mut half_widths, top_row, center_row - y - 1, x);
        record(&mut half_widths, top_row, center_row + y, x);
        y += 1;
        if error < 0 {
            error += 2 * y + 2;
        } else {
            if x >= y {
                record(&mut half_widths, top_row, center_row + x - 1, y);
                record(&mut half_widths, top_row, center_row - x, y);
            }
            x -= 1;
            error += 2 * (y - x + 2);
        }
    }
    half_widths
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const CELL_COUNTS: [u64; 100] = [
        1, 4, 5, 12, 21, 32, 37, 52, 57, 76, //
        97, 112, 129, 156, 177, 196, 221, 256, 277, 308, //
        349, 376, 409, 448, 489, 532, 561, 616, 657, 696, //
        749, 804, 837, 904, 957, 1012, 1073, 1124, 1193, 1232, //
        1313, 1388, 1429, 1516, 1581, 1656, 1725, 1796, 1877, 1948, //
        2025, 2120, 2201, 2276, 2369, 2448, 2533, 2632, 2725, 2812, //
        2901, 3008, 3109, 3200, 3305, 3412, 3497, 3624, 3713, 3844, //
        3941, 4052, 4173, 4272, 4405, 4516, 4637, 4764, 4889, 5016, //
        5129, 5252, 5401, 5516, 5653, 5792, 5925, 6052, 6205, 6344, //
        6473, 6632, 6769, 6932, 7049, 7216, 7361, 7504, 7669, 7836, //
    ];

    fn diameter(cells: u32) -> BrushDiameter {
        BrushDiameter::new(cells).expect("diameter")
    }

    fn covered_cells(spans: &[Span]) -> HashSet<(i32, i32)> {
        spans
            .iter()
            .flat_map(|span| (span.x_start..span.x_end).map(move |x| (x, span.y)))
            .collect()
    }

    #[test]
    fn cell_counts_match_captured_values() {
        for (index, expected) in CELL_COUNTS.iter().enumerate() {
            let cells = index as u32 + 1;
            assert_eq!(
                covered_cell_count(diameter(cells)),
                *expected,
                "diameter {cells}"
            );
        }
    }

    #[test]
    fn oversized_diameters_are_capped() {
        let capped = diameter(MAX_CIRCLE_DIAMETER);
        let huge = diameter(u32::MAX);
        assert_eq!(covered_cell_count(huge), covered_cell_count(capped));
        assert_eq!(
            covered_cell_count(diameter(i32::MAX as u32)),
            covered_cell_count(capped)
        );

        let limit = CENTER_COORDINATE_LIMIT as i64;
        let half = i64::from(MAX_CIRCLE_DIAMETER / 2);
        let mut rows = 0usize;
        rasterize_circle(f64::MAX, f64::MIN, huge, |span| {
            rows += 1;
            assert!(span.x_start < span.x_end);
            assert!(i64::from(span.x_end) <= limit + half);
            assert!(i64::from(span.y) >= -limit - half);
        });
        assert!(rows > 0 && rows <= MAX_CIRCLE_DIAMETER as usize);
    }

    #[test]
    fn spans_are_one_per_row_and_contiguous() {
        for cells in 1..=100 {
            let spans = circle_spans(0.0, 0.0, diameter(cells));
            assert_eq!(spans.len(), cells as usize, "diameter {cells}");
            for pair in spans.windows(2) {
                assert_eq!(pair[1].y, pair[0].y + 1, "diameter {cells}");
            }
            let total: u64 = spans.iter().map(|span| u64::from(span.len())).sum();
            assert_eq!(
                total,
                covered_cells(&spans).len() as u64,
                "diameter {cells} spans overlap"
            );
        }
    }

    #[test]
    fn circles_are_point_symmetric() {
        for cells in 1..=100 {
            let spans = circle_spans(0.0, 0.0, diameter(cells));
            let covered = covered_cells(&spans);
            for &(x, y) in &covered {
                // odd circles turn about the center of cell (0, 0), even ones
                // about the corner shared by cells (-1, -1) and (0, 0)
                let mirrored = if cells % 2 == 1 {
                    (-x, -y)
                } else {
                    (-1 - x, -1 - y)
                };
                assert!(
                    covered.contains(&mirrored),
                    "diameter {cells} missing {mirrored:?}"
                );
            }
        }
    }

    #[test]
    fn odd_diameter_snaps_down_and_has_center_row() {
        let spans = circle_spans(5.9, 5.2, diameter(3));
        assert_eq!(
            spans.as_slice(),
            &[Span::new(5, 6, 4), Span::new(4, 7, 5), Span::new(5, 6, 6)]
        );

        let spans = circle_spans(0.0, 0.0, diameter(9));
        let widest = spans.iter().map(Span::len).max().expect("widest span");
        let center = spans
            .iter()
            .find(|span| span.y == 0)
            .expect("center row");
        assert_eq!(center.len(), widest);
        assert_eq!(center, &Span::new(-4, 5, 0));
    }

    #[test]
    fn even_diameter_straddles_two_rows() {
        let spans = circle_spans(2.5, 7.4, diameter(4));
        assert_eq!(
            spans.as_slice(),
            &[
                Span::new(2, 4, 5),
                Span::new(1, 5, 6),
                Span::new(1, 5, 7),
                Span::new(2, 4, 8)
            ]
        );
    }

    #[test]
    fn single_cell_brush_covers_its_cell() {
        let spans = circle_spans(-0.5, 3.99, diameter(1));
        assert_eq!(spans.as_slice(), &[Span::new(-1, 0, 3)]);
    }

    #[test]
    fn two_cell_brush_is_a_square() {
        let spans = circle_spans(1.6, 1.4, diameter(2));
        assert_eq!(spans.as_slice(), &[Span::new(1, 3, 0), Span::new(1, 3, 1)]);
    }

    #[test]
    fn absurd_centers_are_clamped() {
        let spans = circle_spans(f64::INFINITY, f64::NAN, diameter(5));
        assert_eq!(spans.len(), 5);
        assert!(spans.iter().all(|span| span.x_start > 0));
    }
}
