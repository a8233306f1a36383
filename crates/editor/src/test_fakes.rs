//! Recording collaborators for session tests.

use model::{BIOME_COUNT, BiomeId, RasterGrid, Span};

use crate::surface::{BiomePalette, DrawingSurface, Rgb, VectorTracer};

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Resize {
        width_pixels: u32,
        height_pixels: u32,
        scale: f64,
    },
    Clear,
    SetFillColor(Rgb),
    FillSpan {
        span: Span,
        row_height: u32,
    },
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    pub fn filled_spans(&self) -> Vec<(Span, u32)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::FillSpan { span, row_height } => Some((*span, *row_height)),
                _ => None,
            })
            .collect()
    }

    /// Operations recorded after the last clear or resize.
    pub fn since_last_clear(&self) -> &[SurfaceOp] {
        let start = self
            .ops
            .iter()
            .rposition(|op| matches!(op, SurfaceOp::Clear | SurfaceOp::Resize { .. }))
            .map_or(0, |index| index + 1);
        &self.ops[start..]
    }
}

impl DrawingSurface for RecordingSurface {
    fn resize(&mut self, width_pixels: u32, height_pixels: u32, scale: f64) {
        self.ops.push(SurfaceOp::Resize {
            width_pixels,
            height_pixels,
            scale,
        });
    }

    fn clear(&mut self) {
        self.ops.push(SurfaceOp::Clear);
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.ops.push(SurfaceOp::SetFillColor(color));
    }

    fn fill_span(&mut self, span: Span, row_height: u32) {
        self.ops.push(SurfaceOp::FillSpan { span, row_height });
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraceCall {
    pub style_index: usize,
    pub scale: f64,
    pub histogram: [usize; BIOME_COUNT as usize + 1],
}

#[derive(Debug, Default)]
pub struct RecordingTracer {
    pub calls: Vec<TraceCall>,
}

impl VectorTracer for RecordingTracer {
    fn trace_to_svg(&mut self, grid: &RasterGrid, style_index: usize, scale: f64) -> String {
        self.calls.push(TraceCall {
            style_index,
            scale,
            histogram: grid.histogram(),
        });
        format!("<svg data-trace=\"{}\"/>", self.calls.len())
    }
}

/// Encodes the style index and biome code into the color.
#[derive(Debug, Clone, Copy)]
pub struct CodedPalette {
    pub styles: usize,
}

impl CodedPalette {
    pub fn color(style_index: usize, biome: BiomeId) -> Rgb {
        Rgb::new(style_index as u8, biome.raw(), 0)
    }
}

impl BiomePalette for CodedPalette {
    fn style_count(&self) -> usize {
        self.styles
    }

    fn drawing_color(&self, style_index: usize, biome: BiomeId) -> Rgb {
        Self::color(style_index, biome)
    }
}
