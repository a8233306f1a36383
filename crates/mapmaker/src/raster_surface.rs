use editor::{DrawingSurface, Rgb};
use image::{Rgba, RgbaImage};
use model::Span;
use view::DeviceRect;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// CPU drawing surface backed by an RGBA image in device pixels.
#[derive(Debug)]
pub struct RasterSurface {
    image: RgbaImage,
    scale: f64,
    fill: Rgba<u8>,
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self {
            image: RgbaImage::new(0, 0),
            scale: 1.0,
            fill: Rgba([0, 0, 0, 255]),
        }
    }
}

impl RasterSurface {
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    fn device_range(start: f64, end: f64, limit: u32) -> (u32, u32) {
        let limit = f64::from(limit);
        let start = start.floor().clamp(0.0, limit);
        let end = end.ceil().clamp(0.0, limit);
        (start as u32, end as u32)
    }
}

impl DrawingSurface for RasterSurface {
    fn resize(&mut self, width_pixels: u32, height_pixels: u32, scale: f64) {
        self.image = RgbaImage::new(width_pixels, height_pixels);
        self.scale = scale;
    }

    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = TRANSPARENT;
        }
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.fill = Rgba([color.red, color.green, color.blue, 255]);
    }

    fn fill_span(&mut self, span: Span, row_height: u32) {
        let rect = DeviceRect::for_rows(span.x_start, span.x_end, span.y, row_height, self.scale);
        let (x_start, x_end) = Self::device_range(rect.x, rect.right(), self.image.width());
        let (y_start, y_end) = Self::device_range(rect.y, rect.bottom(), self.image.height());
        for y in y_start..y_end {
            for x in x_start..x_end {
                self.image.put_pixel(x, y, self.fill);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_scaled_rectangles() {
        let mut surface = RasterSurface::default();
        surface.resize(20, 20, 2.0);
        surface.set_fill_color(Rgb::new(10, 20, 30));
        surface.fill_span(Span::new(1, 3, 2), 1);

        let filled = surface
            .image()
            .enumerate_pixels()
            .filter(|(_, _, pixel)| pixel.0[3] == 255)
            .count();
        assert_eq!(filled, 8);
        assert_eq!(surface.image().get_pixel(2, 4), &Rgba([10, 20, 30, 255]));
        assert_eq!(surface.image().get_pixel(6, 4), &TRANSPARENT);

        surface.clear();
        assert!(surface.image().pixels().all(|pixel| *pixel == TRANSPARENT));
    }

    #[test]
    fn wide_rows_cover_small_scales_and_stay_in_bounds() {
        let mut surface = RasterSurface::default();
        surface.resize(5, 5, 0.5);
        surface.fill_span(Span::new(0, 10, 9), 2);
        // rows 9..11 at half scale cover device rows 4..5 only
        assert_eq!(surface.image().get_pixel(0, 4).0[3], 255);
        assert_eq!(surface.image().get_pixel(4, 4).0[3], 255);
        assert_eq!(surface.image().get_pixel(0, 3).0[3], 0);
    }
}
