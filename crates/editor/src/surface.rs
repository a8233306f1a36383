//! Seams to the host: the drawing surface, the vector tracer and the palette.

use std::fmt;

use model::{BiomeId, RasterGrid, Span};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "#{:02x}{:02x}{:02x}",
            self.red, self.green, self.blue
        )
    }
}

/// Zoomable drawing surface.
///
/// `fill_span` takes model coordinates; the surface multiplies them by the
/// scale last passed to `resize`.
pub trait DrawingSurface {
    /// Reallocates the backing store, which also clears it.
    fn resize(&mut self, width_pixels: u32, height_pixels: u32, scale: f64);

    fn clear(&mut self);

    fn set_fill_color(&mut self, color: Rgb);

    fn fill_span(&mut self, span: Span, row_height: u32);
}

/// Turns the finished grid into the SVG shown behind the surface.
pub trait VectorTracer {
    fn trace_to_svg(&mut self, grid: &RasterGrid, style_index: usize, scale: f64) -> String;
}

/// Colors of every biome per map style.
pub trait BiomePalette {
    fn style_count(&self) -> usize;

    /// Color used while painting `biome` in style `style_index`.
    fn drawing_color(&self, style_index: usize, biome: BiomeId) -> Rgb;
}

impl<T: DrawingSurface + ?Sized> DrawingSurface for &mut T {
    fn resize(&mut self, width_pixels: u32, height_pixels: u32, scale: f64) {
        (**self).resize(width_pixels, height_pixels, scale);
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn set_fill_color(&mut self, color: Rgb) {
        (**self).set_fill_color(color);
    }

    fn fill_span(&mut self, span: Span, row_height: u32) {
        (**self).fill_span(span, row_height);
    }
}
