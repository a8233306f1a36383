use model::{BiomeId, RasterGrid, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BiomeLayerStats {
    pub runs: usize,
    pub cells: u64,
}

/// Walks the grid row by row and emits one span per maximal run of `label`.
///
/// This is the whole cost of an overlay refresh, so each row is scanned once
/// and runs are batched instead of drawn cell by cell.
pub fn redraw_biome_layer<F>(grid: &RasterGrid, label: BiomeId, mut draw_span: F) -> BiomeLayerStats
where
    F: FnMut(Span),
{
    let mut stats = BiomeLayerStats::default();
    let width = grid.width() as usize;
    for (y, row) in grid.labels().chunks_exact(width).enumerate() {
        let mut run_start: Option<usize> = None;
        for (x, cell) in row.iter().enumerate() {
            match (run_start, *cell == label) {
                (None, true) => run_start = Some(x),
                (Some(start), false) => {
                    emit_run(&mut stats, &mut draw_span, start, x, y);
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            emit_run(&mut stats, &mut draw_span, start, width, y);
        }
    }
    stats
}

fn emit_run<F>(stats: &mut BiomeLayerStats, draw_span: &mut F, start: usize, end: usize, y: usize)
where
    F: FnMut(Span),
{
    stats.runs += 1;
    stats.cells += (end - start) as u64;
    draw_span(Span::new(start as i32, end as i32, y as i32));
}
