use std::fmt;

use model::{BiomeId, BrushDiameter, InvalidDiameter, UnknownBiome};
use rasterizer::MAX_CIRCLE_DIAMETER;
use serde::{Deserialize, Serialize};
use view::{DEFAULT_ZOOM_INDEX, DEFAULT_ZOOM_LEVELS, ViewportError, ZoomLevels};

use crate::tools::ToolSettings;

pub const DEFAULT_BRUSH_SIZE: u32 = 30;
pub const DEFAULT_ERASER_SIZE: u32 = 60;
pub const MAX_PAINT_SIZE: u32 = 500;

/// Editor defaults, loadable from JSON. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub zoom_levels: Vec<f64>,
    pub default_zoom_index: usize,
    pub brush_size: u32,
    pub eraser_size: u32,
    pub max_paint_size: u32,
    pub default_biome: u8,
    pub style_index: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            zoom_levels: DEFAULT_ZOOM_LEVELS.to_vec(),
            default_zoom_index: DEFAULT_ZOOM_INDEX,
            brush_size: DEFAULT_BRUSH_SIZE,
            eraser_size: DEFAULT_ERASER_SIZE,
            max_paint_size: MAX_PAINT_SIZE,
            default_biome: BiomeId::WATER.raw(),
            style_index: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    Zoom(ViewportError),
    PaintSize(InvalidDiameter),
    PaintSizeTooLarge { size: u32, limit: u32 },
    DefaultBiome(UnknownBiome),
    NoneIsNotPaintable,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Zoom(error) => write!(formatter, "zoom configuration: {error}"),
            ConfigError::PaintSize(error) => write!(formatter, "paint size: {error}"),
            ConfigError::PaintSizeTooLarge { size, limit } => {
                write!(formatter, "paint size {size} exceeds the limit of {limit}")
            }
            ConfigError::DefaultBiome(error) => write!(formatter, "default biome: {error}"),
            ConfigError::NoneIsNotPaintable => {
                write!(formatter, "default biome must not be \"none\"")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ViewportError> for ConfigError {
    fn from(error: ViewportError) -> Self {
        Self::Zoom(error)
    }
}

impl From<InvalidDiameter> for ConfigError {
    fn from(error: InvalidDiameter) -> Self {
        Self::PaintSize(error)
    }
}

impl From<UnknownBiome> for ConfigError {
    fn from(error: UnknownBiome) -> Self {
        Self::DefaultBiome(error)
    }
}

impl EditorConfig {
    pub fn zoom_levels(&self) -> Result<ZoomLevels, ConfigError> {
        Ok(ZoomLevels::new(
            self.zoom_levels.clone(),
            self.default_zoom_index,
        )?)
    }

    /// Initial tool panel state. A style index outside `0..style_count`
    /// falls back to the first style. Brush and eraser sizes above
    /// `max_paint_size` are clamped to it; `max_paint_size` itself may not
    /// exceed [`MAX_CIRCLE_DIAMETER`].
    pub fn tool_settings(&self, style_count: usize) -> Result<ToolSettings, ConfigError> {
        let biome = BiomeId::new(self.default_biome)?;
        if biome.is_none() {
            return Err(ConfigError::NoneIsNotPaintable);
        }
        if self.max_paint_size > MAX_CIRCLE_DIAMETER {
            return Err(ConfigError::PaintSizeTooLarge {
                size: self.max_paint_size,
                limit: MAX_CIRCLE_DIAMETER,
            });
        }
        let style_index = if self.style_index < style_count {
            self.style_index
        } else {
            0
        };
        Ok(ToolSettings::new(
            BrushDiameter::new(self.brush_size)?,
            BrushDiameter::new(self.eraser_size)?,
            BrushDiameter::new(self.max_paint_size)?,
            biome,
            style_index,
        ))
    }
}
