use std::fmt;
use std::str::FromStr;

use model::{BiomeId, BrushDiameter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tool {
    #[default]
    Cursor,
    Brush,
    Eraser,
    Style,
}

impl Tool {
    pub const fn name(self) -> &'static str {
        match self {
            Tool::Cursor => "cursor",
            Tool::Brush => "brush",
            Tool::Eraser => "eraser",
            Tool::Style => "style",
        }
    }

    /// Brush and eraser write to the grid; cursor and style never do.
    pub const fn paints(self) -> bool {
        matches!(self, Tool::Brush | Tool::Eraser)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTool(pub String);

impl fmt::Display for UnknownTool {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "unknown tool \"{}\"", self.0)
    }
}

impl std::error::Error for UnknownTool {}

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "cursor" => Ok(Tool::Cursor),
            "brush" => Ok(Tool::Brush),
            "eraser" => Ok(Tool::Eraser),
            "style" => Ok(Tool::Style),
            other => Err(UnknownTool(other.to_owned())),
        }
    }
}

/// What the tool panel currently holds. Brush and eraser sizes are kept
/// separately and survive switching tools.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    tool: Tool,
    brush_size: BrushDiameter,
    eraser_size: BrushDiameter,
    max_paint_size: BrushDiameter,
    biome: BiomeId,
    style_index: usize,
}

impl ToolSettings {
    pub fn new(
        brush_size: BrushDiameter,
        eraser_size: BrushDiameter,
        max_paint_size: BrushDiameter,
        biome: BiomeId,
        style_index: usize,
    ) -> Self {
        Self {
            tool: Tool::Cursor,
            brush_size: brush_size.min(max_paint_size),
            eraser_size: eraser_size.min(max_paint_size),
            max_paint_size,
            biome,
            style_index,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub(crate) fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Label written by the active tool. The eraser writes [`BiomeId::NONE`].
    pub fn active_label(&self) -> Option<BiomeId> {
        match self.tool {
            Tool::Brush => Some(self.biome),
            Tool::Eraser => Some(BiomeId::NONE),
            Tool::Cursor | Tool::Style => None,
        }
    }

    pub fn paint_size(&self) -> Option<BrushDiameter> {
        match self.tool {
            Tool::Brush => Some(self.brush_size),
            Tool::Eraser => Some(self.eraser_size),
            Tool::Cursor | Tool::Style => None,
        }
    }

    pub fn brush_size(&self) -> BrushDiameter {
        self.brush_size
    }

    pub fn eraser_size(&self) -> BrushDiameter {
        self.eraser_size
    }

    pub fn selected_biome(&self) -> BiomeId {
        self.biome
    }

    pub(crate) fn set_biome(&mut self, biome: BiomeId) {
        self.biome = biome;
    }

    pub fn style_index(&self) -> usize {
        self.style_index
    }

    pub(crate) fn set_style_index(&mut self, style_index: usize) {
        self.style_index = style_index;
    }

    /// Stores a typed size for the active paint tool, clamped to
    /// `1..=max_paint_size` and rounded to whole cells. Returns the stored
    /// diameter, or `None` when the active tool has no size.
    pub(crate) fn set_active_size(&mut self, requested: f64) -> Option<BrushDiameter> {
        let diameter = self.clamp_size(requested);
        match self.tool {
            Tool::Brush => self.brush_size = diameter,
            Tool::Eraser => self.eraser_size = diameter,
            Tool::Cursor | Tool::Style => return None,
        }
        Some(diameter)
    }

    fn clamp_size(&self, requested: f64) -> BrushDiameter {
        let max = f64::from(self.max_paint_size.get());
        let clamped = if requested.is_nan() {
            1.0
        } else {
            requested.clamp(1.0, max)
        };
        BrushDiameter::new(clamped.round() as u32).unwrap_or(self.max_paint_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diameter(cells: u32) -> BrushDiameter {
        BrushDiameter::new(cells).expect("diameter")
    }

    fn settings() -> ToolSettings {
        ToolSettings::new(diameter(30), diameter(60), diameter(500), BiomeId::WATER, 0)
    }

    #[test]
    fn label_and_size_exist_only_for_paint_tools() {
        let mut settings = settings();
        assert_eq!(settings.active_label(), None);
        assert_eq!(settings.paint_size(), None);

        settings.set_tool(Tool::Brush);
        assert_eq!(settings.active_label(), Some(BiomeId::WATER));
        assert_eq!(settings.paint_size(), Some(diameter(30)));

        settings.set_tool(Tool::Eraser);
        assert_eq!(settings.active_label(), Some(BiomeId::NONE));
        assert_eq!(settings.paint_size(), Some(diameter(60)));

        settings.set_tool(Tool::Style);
        assert_eq!(settings.active_label(), None);
    }

    #[test]
    fn sizes_are_per_tool_and_clamped() {
        let mut settings = settings();
        assert_eq!(settings.set_active_size(12.0), None);

        settings.set_tool(Tool::Brush);
        assert_eq!(settings.set_active_size(12.4), Some(diameter(12)));
        assert_eq!(settings.set_active_size(0.0), Some(diameter(1)));
        assert_eq!(settings.set_active_size(9000.0), Some(diameter(500)));
        assert_eq!(settings.set_active_size(f64::NAN), Some(diameter(1)));
        assert_eq!(settings.eraser_size(), diameter(60));

        settings.set_tool(Tool::Eraser);
        assert_eq!(settings.set_active_size(7.5), Some(diameter(8)));
        assert_eq!(settings.brush_size(), diameter(1));
    }

    #[test]
    fn parses_tool_names() {
        assert_eq!("eraser".parse::<Tool>(), Ok(Tool::Eraser));
        assert_eq!(
            "lasso".parse::<Tool>(),
            Err(UnknownTool("lasso".to_owned()))
        );
        assert!(Tool::Brush.paints());
        assert!(!Tool::Style.paints());
    }
}
