use editor::VectorTracer;
use model::{BIOME_COUNT, BiomeId, RasterGrid};

use crate::palette::StylePalette;

/// Traces the grid into one `<path>` per biome built from horizontal runs.
///
/// The document is sized for the given scale and draws in model units
/// through its `viewBox`.
#[derive(Debug, Default)]
pub struct RunLengthSvgTracer {
    palette: StylePalette,
    traced: usize,
}

impl RunLengthSvgTracer {
    pub fn new(palette: StylePalette) -> Self {
        Self { palette, traced: 0 }
    }

    pub fn traced(&self) -> usize {
        self.traced
    }
}

impl VectorTracer for RunLengthSvgTracer {
    fn trace_to_svg(&mut self, grid: &RasterGrid, style_index: usize, scale: f64) -> String {
        self.traced += 1;
        let (width, height) = (grid.width(), grid.height());
        let mut paths: Vec<String> = vec![String::new(); BIOME_COUNT as usize + 1];
        for (y, row) in grid.labels().chunks_exact(width as usize).enumerate() {
            let mut run_start = 0usize;
            for x in 1..=row.len() {
                if x < row.len() && row[x] == row[run_start] {
                    continue;
                }
                let path = &mut paths[row[run_start].index()];
                let run = x - run_start;
                path.push_str(&format!("M{run_start} {y}h{run}v1h-{run}z"));
                run_start = x;
            }
        }

        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" \
             viewBox=\"0 0 {width} {height}\" shape-rendering=\"crispEdges\" data-style=\"{}\">",
            f64::from(width) * scale,
            f64::from(height) * scale,
            self.palette.style(style_index).name,
        );
        for biome in BiomeId::all() {
            let path = &paths[biome.index()];
            if path.is_empty() {
                continue;
            }
            let color = self.palette.map_color(style_index, biome);
            svg.push_str(&format!(
                "<path class=\"{}\" fill=\"{color}\" d=\"{path}\"/>",
                biome.name()
            ));
        }
        svg.push_str("</svg>");
        svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_runs_by_biome() {
        let mut grid = RasterGrid::new(4, 2).expect("create grid");
        grid.fill_row(BiomeId::WATER, 0, 1, 3).expect("fill");
        grid.fill_row(BiomeId::WATER, 1, 0, 4).expect("fill");

        let mut tracer = RunLengthSvgTracer::new(StylePalette);
        let svg = tracer.trace_to_svg(&grid, 0, 2.0);

        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"8\" height=\"4\""));
        assert!(svg.contains(
            "<path class=\"none\" fill=\"#c4c4c4\" d=\"M0 0h1v1h-1zM3 0h1v1h-1z\"/>"
        ));
        assert!(svg.contains(
            "<path class=\"water\" fill=\"#4cb3fd\" d=\"M1 0h2v1h-2zM0 1h4v1h-4z\"/>"
        ));
        assert!(!svg.contains("class=\"land\""));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(tracer.traced(), 1);
    }
}
