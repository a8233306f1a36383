use std::fmt;

use driver::StrokeSamplingError;
use model::RasterGridError;
use view::ViewportError;

pub mod biome_layer;
pub mod config;
pub mod cursor;
mod session;
pub mod surface;
pub mod tools;

pub use biome_layer::{BiomeLayerStats, redraw_biome_layer};
pub use config::{ConfigError, EditorConfig};
pub use cursor::{BrushCursor, CursorOutline};
pub use session::{PaintingSession, SessionEvent, SessionState};
pub use surface::{BiomePalette, DrawingSurface, Rgb, VectorTracer};
pub use tools::{Tool, ToolSettings, UnknownTool};

#[cfg(test)]
mod test_fakes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    Grid(RasterGridError),
    Viewport(ViewportError),
    Sampling(StrokeSamplingError),
    Config(ConfigError),
    UnknownTool(UnknownTool),
    UnknownStyle(usize),
}

impl fmt::Display for SessionError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Grid(error) => write!(formatter, "raster grid: {error}"),
            SessionError::Viewport(error) => write!(formatter, "viewport: {error}"),
            SessionError::Sampling(error) => write!(formatter, "stroke sampling: {error}"),
            SessionError::Config(error) => write!(formatter, "editor config: {error}"),
            SessionError::UnknownTool(error) => write!(formatter, "{error}"),
            SessionError::UnknownStyle(index) => write!(formatter, "unknown map style {index}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<RasterGridError> for SessionError {
    fn from(error: RasterGridError) -> Self {
        Self::Grid(error)
    }
}

impl From<ViewportError> for SessionError {
    fn from(error: ViewportError) -> Self {
        Self::Viewport(error)
    }
}

impl From<StrokeSamplingError> for SessionError {
    fn from(error: StrokeSamplingError) -> Self {
        Self::Sampling(error)
    }
}

impl From<ConfigError> for SessionError {
    fn from(error: ConfigError) -> Self {
        Self::Config(error)
    }
}

impl From<UnknownTool> for SessionError {
    fn from(error: UnknownTool) -> Self {
        Self::UnknownTool(error)
    }
}
