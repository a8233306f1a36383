use std::mem;

use driver::{
    DabPoint, FixedStepInterpolation, FixedStepInterpolationConfig, StrokeContext, StrokeSampling,
    StrokeSessionId,
};
use model::{BiomeId, BrushDiameter, RasterGrid};
use rasterizer::circle_spans;
use tracing::{debug, info, trace, warn};
use view::{GridLines, ModelPoint, RescaleOutcome, ScreenPoint, ScreenRect, Viewport};

use crate::SessionError;
use crate::biome_layer::redraw_biome_layer;
use crate::config::EditorConfig;
use crate::cursor::{BrushCursor, CursorOutline};
use crate::surface::{BiomePalette, DrawingSurface, Rgb, VectorTracer};
use crate::tools::{Tool, ToolSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Cursor or style tool selected; the grid cannot change.
    Idle,
    ToolArmed,
    Stroking,
}

/// Notifications for the host, collected until [`PaintingSession::drain_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    MapStarted {
        width: u32,
        height: u32,
    },
    ToolArmed {
        tool: Tool,
        label: BiomeId,
        diameter: BrushDiameter,
    },
    ToolDisarmed {
        tool: Tool,
    },
    GridShown(GridLines),
    GridHidden,
    OverlayRedrawn {
        label: BiomeId,
        runs: usize,
        cells: u64,
        row_height: u32,
    },
    StrokeStarted {
        stroke_session_id: StrokeSessionId,
        point: ModelPoint,
    },
    StrokeEnded {
        stroke_session_id: StrokeSessionId,
        dabs: usize,
        cells_written: u64,
        dirty_rows: usize,
    },
    BackgroundTraced {
        style_index: usize,
        scale: f64,
        svg_bytes: usize,
    },
    Rescaled {
        old_scale: f64,
        new_scale: f64,
    },
    CursorResized(CursorOutline),
    DiameterChanged {
        tool: Tool,
        diameter: BrushDiameter,
    },
    StyleChanged {
        style_index: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ArmedTool {
    label: BiomeId,
    diameter: BrushDiameter,
    color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveStroke {
    stroke_session_id: StrokeSessionId,
    dabs: usize,
    cells_written: u64,
    // pointer left the surface while the button is still held
    outside: bool,
}

/// Paints biome labels into a [`RasterGrid`] from pointer input.
///
/// The session owns the grid and the viewport and drives three host
/// collaborators: the drawing surface that previews strokes and the active
/// biome layer, the tracer that renders the background SVG, and the palette.
/// Everything happens synchronously inside the calling method. Pointer input
/// that arrives in the wrong state is ignored, never reported as an error.
pub struct PaintingSession<S, T, P> {
    config: EditorConfig,
    grid: RasterGrid,
    viewport: Viewport,
    tools: ToolSettings,
    surface: S,
    tracer: T,
    palette: P,
    open: bool,
    armed: Option<ArmedTool>,
    stroke: Option<ActiveStroke>,
    sampler: FixedStepInterpolation,
    pending_dabs: Vec<DabPoint>,
    next_stroke_session_id: StrokeSessionId,
    cursor: BrushCursor,
    background_svg: String,
    events: Vec<SessionEvent>,
}

impl<S, T, P> PaintingSession<S, T, P>
where
    S: DrawingSurface,
    T: VectorTracer,
    P: BiomePalette,
{
    /// Opens an empty `width`×`height` map shown through `frame`.
    pub fn new(
        config: EditorConfig,
        width: u32,
        height: u32,
        frame: ScreenRect,
        surface: S,
        tracer: T,
        palette: P,
    ) -> Result<Self, SessionError> {
        let tools = config.tool_settings(palette.style_count())?;
        let viewport = Viewport::new(config.zoom_levels()?, frame, width, height)?;
        let grid = RasterGrid::new(width, height)?;
        let mut session = Self {
            config,
            grid,
            viewport,
            tools,
            surface,
            tracer,
            palette,
            open: false,
            armed: None,
            stroke: None,
            sampler: FixedStepInterpolation::new(),
            pending_dabs: Vec::new(),
            next_stroke_session_id: 0,
            cursor: BrushCursor::default(),
            background_svg: String::new(),
            events: Vec::new(),
        };
        session.open_map()?;
        Ok(session)
    }

    /// Replaces the map with an empty one. Tool selection survives; a
    /// selected brush or eraser is armed again on the new map.
    pub fn new_map(&mut self, width: u32, height: u32) -> Result<(), SessionError> {
        self.disarm()?;
        let grid = RasterGrid::new(width, height)?;
        self.viewport.start_map(width, height)?;
        self.grid = grid;
        self.open_map()
    }

    fn open_map(&mut self) -> Result<(), SessionError> {
        let (width, height) = self.grid_size();
        let (surface_width, surface_height) = self.viewport.surface_size();
        self.surface
            .resize(surface_width, surface_height, self.viewport.scale());
        self.open = true;
        info!(width, height, scale = self.viewport.scale(), "map started");
        self.events.push(SessionEvent::MapStarted { width, height });
        self.trace_background();
        if self.tools.tool().paints() {
            self.arm();
        }
        Ok(())
    }

    /// Ends editing: closes any stroke, clears the surface and the
    /// background, and restores the default zoom level.
    pub fn shutdown(&mut self) -> Result<(), SessionError> {
        self.disarm()?;
        self.viewport.shutdown();
        self.surface.clear();
        self.background_svg.clear();
        self.open = false;
        debug!("painting session shut down");
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        match (self.armed, self.stroke) {
            (_, Some(_)) => SessionState::Stroking,
            (Some(_), None) => SessionState::ToolArmed,
            (None, None) => SessionState::Idle,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn grid(&self) -> &RasterGrid {
        &self.grid
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn tools(&self) -> &ToolSettings {
        &self.tools
    }

    pub fn cursor(&self) -> &BrushCursor {
        &self.cursor
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    pub fn palette(&self) -> &P {
        &self.palette
    }

    /// Latest traced background document, empty after shutdown.
    pub fn background_svg(&self) -> &str {
        &self.background_svg
    }

    /// Label written by the armed tool.
    pub fn armed_label(&self) -> Option<BiomeId> {
        self.armed.map(|armed| armed.label)
    }

    pub fn canvas_point(&self, pointer: ScreenPoint) -> ModelPoint {
        self.viewport.canvas_point(pointer)
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        mem::take(&mut self.events)
    }

    pub fn select_tool(&mut self, tool: Tool) -> Result<(), SessionError> {
        self.disarm()?;
        self.tools.set_tool(tool);
        debug!(tool = tool.name(), "tool selected");
        if tool.paints() && self.open {
            self.arm();
        }
        Ok(())
    }

    pub fn select_tool_by_name(&mut self, name: &str) -> Result<(), SessionError> {
        let tool = name.parse::<Tool>()?;
        self.select_tool(tool)
    }

    /// Sets the size of the active paint tool. A stroke in progress keeps
    /// the circles it already stamped and uses the new size from the next
    /// pointer move.
    pub fn change_diameter(&mut self, requested: f64) -> Result<(), SessionError> {
        let tool = self.tools.tool();
        let Some(diameter) = self.tools.set_active_size(requested) else {
            trace!(tool = tool.name(), requested, "size change ignored");
            return Ok(());
        };
        if let Some(armed) = self.armed.as_mut() {
            armed.diameter = diameter;
            if self.stroke.is_some() {
                self.sampler
                    .set_config(&FixedStepInterpolationConfig::for_diameter(diameter))?;
            }
            self.resize_cursor();
        }
        debug!(tool = tool.name(), diameter = diameter.get(), "paint size changed");
        self.events
            .push(SessionEvent::DiameterChanged { tool, diameter });
        Ok(())
    }

    /// Selects the brush biome. With the brush selected this restarts
    /// painting: the overlay is cleared and redrawn once for `label`.
    pub fn change_active_label(&mut self, label: BiomeId) -> Result<(), SessionError> {
        self.tools.set_biome(label);
        debug!(label = label.name(), "brush biome selected");
        if self.tools.tool() == Tool::Brush && self.open {
            self.disarm()?;
            self.arm();
        }
        Ok(())
    }

    pub fn change_style(&mut self, style_index: usize) -> Result<(), SessionError> {
        if style_index >= self.palette.style_count() {
            return Err(SessionError::UnknownStyle(style_index));
        }
        self.tools.set_style_index(style_index);
        debug!(style_index, "map style changed");
        self.events.push(SessionEvent::StyleChanged { style_index });
        if let Some(armed) = self.armed.as_mut() {
            armed.color = self.palette.drawing_color(style_index, armed.label);
            self.redraw_overlay();
        }
        if self.open {
            self.trace_background();
        }
        Ok(())
    }

    pub fn set_frame(&mut self, frame: ScreenRect) -> Result<(), SessionError> {
        self.viewport.set_frame(frame)?;
        Ok(())
    }

    pub fn scroll_to(&mut self, scroll_x: f64, scroll_y: f64) -> Result<(), SessionError> {
        self.viewport.scroll_to(scroll_x, scroll_y)?;
        Ok(())
    }

    pub fn wheel(
        &mut self,
        pointer: ScreenPoint,
        delta_y: f64,
        ctrl: bool,
    ) -> Result<(), SessionError> {
        let outcome = self.viewport.wheel(pointer, delta_y, ctrl)?;
        self.apply_rescale(outcome);
        Ok(())
    }

    pub fn zoom_in(&mut self) -> Result<(), SessionError> {
        let outcome = self.viewport.zoom_in()?;
        self.apply_rescale(outcome);
        Ok(())
    }

    pub fn zoom_out(&mut self) -> Result<(), SessionError> {
        let outcome = self.viewport.zoom_out()?;
        self.apply_rescale(outcome);
        Ok(())
    }

    pub fn rescale(&mut self, scale: f64) -> Result<(), SessionError> {
        let outcome = self.viewport.rescale(scale)?;
        self.apply_rescale(outcome);
        Ok(())
    }

    /// Starts a stroke and stamps the first circle under `pointer`.
    pub fn pointer_down(&mut self, pointer: ScreenPoint) -> Result<(), SessionError> {
        if !is_finite_point(pointer) {
            warn!(x = pointer.x, y = pointer.y, "non-finite pointer position ignored");
            return Ok(());
        }
        self.follow_pointer(pointer);
        let Some(armed) = self.armed else {
            trace!("pointer down without an armed tool");
            return Ok(());
        };
        if self.stroke.is_some() {
            trace!("pointer down during a stroke");
            return Ok(());
        }

        let stroke_session_id = self.next_stroke_session_id;
        self.next_stroke_session_id += 1;
        self.sampler.begin_stroke(
            StrokeContext { stroke_session_id },
            &FixedStepInterpolationConfig::for_diameter(armed.diameter),
        )?;
        self.stroke = Some(ActiveStroke {
            stroke_session_id,
            dabs: 0,
            cells_written: 0,
            outside: false,
        });
        self.cursor.raise();

        let point = self.viewport.canvas_point(pointer);
        debug!(stroke_session_id, x = point.x, y = point.y, "stroke started");
        self.events.push(SessionEvent::StrokeStarted {
            stroke_session_id,
            point,
        });
        self.feed_stroke(point)
    }

    /// Follows the pointer anywhere on screen; during a stroke the segment
    /// from the previous position is filled with evenly spaced circles.
    pub fn pointer_move(&mut self, pointer: ScreenPoint) -> Result<(), SessionError> {
        if !is_finite_point(pointer) {
            warn!(x = pointer.x, y = pointer.y, "non-finite pointer position ignored");
            return Ok(());
        }
        self.follow_pointer(pointer);
        if self.stroke.is_none() {
            return Ok(());
        }
        let point = self.viewport.canvas_point(pointer);
        self.feed_stroke(point)
    }

    pub fn pointer_up(&mut self) -> Result<(), SessionError> {
        if self.stroke.is_none() {
            trace!("pointer up without a stroke");
            return Ok(());
        }
        self.end_stroke()
    }

    /// Lost pointer capture ends the stroke exactly like a release.
    pub fn pointer_cancel(&mut self) -> Result<(), SessionError> {
        self.pointer_up()
    }

    pub fn pointer_enter(&mut self, pointer: ScreenPoint) -> Result<(), SessionError> {
        if is_finite_point(pointer) {
            self.follow_pointer(pointer);
        }
        match (self.armed, self.stroke.as_mut()) {
            (_, Some(stroke)) => stroke.outside = false,
            (Some(_), None) => self.cursor.show(),
            (None, None) => trace!("pointer entered without an armed tool"),
        }
        Ok(())
    }

    /// Outside a stroke the cursor disappears; mid-stroke it stays up until
    /// the button is released.
    pub fn pointer_leave(&mut self) -> Result<(), SessionError> {
        match (self.armed, self.stroke.as_mut()) {
            (_, Some(stroke)) => stroke.outside = true,
            (Some(_), None) => self.cursor.hide(),
            (None, None) => trace!("pointer left without an armed tool"),
        }
        Ok(())
    }

    fn follow_pointer(&mut self, pointer: ScreenPoint) {
        self.viewport.track_pointer(pointer);
        self.cursor.move_to(pointer);
    }

    fn feed_stroke(&mut self, point: ModelPoint) -> Result<(), SessionError> {
        let Some(armed) = self.armed else {
            return Ok(());
        };
        let mut dabs = mem::take(&mut self.pending_dabs);
        dabs.clear();
        let stamped = self.stamp_dabs(point, armed, &mut dabs);
        let dab_count = dabs.len();
        self.pending_dabs = dabs;
        let cells = stamped?;

        if let Some(stroke) = self.stroke.as_mut() {
            stroke.dabs += dab_count;
            stroke.cells_written += cells;
        }
        Ok(())
    }

    fn stamp_dabs(
        &mut self,
        point: ModelPoint,
        armed: ArmedTool,
        dabs: &mut Vec<DabPoint>,
    ) -> Result<u64, SessionError> {
        self.sampler.feed_point(point, dabs)?;
        let mut cells = 0u64;
        for dab in dabs.iter() {
            cells += self.stamp(*dab, armed)?;
        }
        Ok(cells)
    }

    /// Writes one circle into the grid and previews it on the surface.
    fn stamp(&mut self, dab: DabPoint, armed: ArmedTool) -> Result<u64, SessionError> {
        let row_height = self.viewport.row_height();
        let mut written = 0u64;
        for span in circle_spans(dab.canvas_x, dab.canvas_y, armed.diameter) {
            if let Some(clipped) = self.grid.paint_span(armed.label, span)? {
                self.surface.fill_span(clipped, row_height);
                written += u64::from(clipped.len());
            }
        }
        trace!(
            stroke_session_id = dab.stroke_session_id,
            x = dab.canvas_x,
            y = dab.canvas_y,
            cells = written,
            "dab stamped"
        );
        Ok(written)
    }

    fn end_stroke(&mut self) -> Result<(), SessionError> {
        let Some(stroke) = self.stroke.take() else {
            return Ok(());
        };
        self.sampler.end_stroke()?;
        if stroke.outside {
            self.cursor.hide();
        }
        self.cursor.lower();

        let dirty_rows = self.grid.dirty_row_count();
        debug!(
            stroke_session_id = stroke.stroke_session_id,
            dabs = stroke.dabs,
            cells_written = stroke.cells_written,
            dirty_rows,
            "stroke ended"
        );
        self.events.push(SessionEvent::StrokeEnded {
            stroke_session_id: stroke.stroke_session_id,
            dabs: stroke.dabs,
            cells_written: stroke.cells_written,
            dirty_rows,
        });
        if stroke.cells_written > 0 {
            self.trace_background();
        }
        Ok(())
    }

    fn arm(&mut self) {
        let tool = self.tools.tool();
        let (Some(label), Some(diameter)) = (self.tools.active_label(), self.tools.paint_size())
        else {
            return;
        };
        let color = self.palette.drawing_color(self.tools.style_index(), label);
        self.armed = Some(ArmedTool {
            label,
            diameter,
            color,
        });
        debug!(
            tool = tool.name(),
            label = label.name(),
            diameter = diameter.get(),
            color = %color,
            "tool armed"
        );
        self.events.push(SessionEvent::ToolArmed {
            tool,
            label,
            diameter,
        });
        self.events
            .push(SessionEvent::GridShown(self.viewport.grid_lines()));
        self.redraw_overlay();
        self.resize_cursor();
    }

    fn disarm(&mut self) -> Result<(), SessionError> {
        if self.armed.is_none() {
            return Ok(());
        }
        self.end_stroke()?;
        self.armed = None;
        self.cursor.hide();
        self.surface.clear();
        let tool = self.tools.tool();
        debug!(tool = tool.name(), "tool disarmed");
        self.events.push(SessionEvent::GridHidden);
        self.events.push(SessionEvent::ToolDisarmed { tool });
        Ok(())
    }

    fn apply_rescale(&mut self, outcome: RescaleOutcome) {
        let RescaleOutcome::Rescaled {
            old_scale,
            new_scale,
            ..
        } = outcome
        else {
            return;
        };
        let (surface_width, surface_height) = self.viewport.surface_size();
        self.surface.resize(surface_width, surface_height, new_scale);
        self.events.push(SessionEvent::Rescaled {
            old_scale,
            new_scale,
        });
        if self.armed.is_some() {
            self.events
                .push(SessionEvent::GridShown(self.viewport.grid_lines()));
            self.redraw_overlay();
            self.resize_cursor();
        }
    }

    /// Clears the surface and paints every cell of the armed label.
    fn redraw_overlay(&mut self) {
        let Some(armed) = self.armed else {
            return;
        };
        let row_height = self.viewport.row_height();
        self.surface.clear();
        self.surface.set_fill_color(armed.color);
        let surface = &mut self.surface;
        let stats = redraw_biome_layer(&self.grid, armed.label, |span| {
            surface.fill_span(span, row_height)
        });
        debug!(
            label = armed.label.name(),
            runs = stats.runs,
            cells = stats.cells,
            row_height,
            "biome layer redrawn"
        );
        self.events.push(SessionEvent::OverlayRedrawn {
            label: armed.label,
            runs: stats.runs,
            cells: stats.cells,
            row_height,
        });
    }

    fn resize_cursor(&mut self) {
        let Some(armed) = self.armed else {
            return;
        };
        let outline = self
            .cursor
            .resize(f64::from(armed.diameter.get()) * self.viewport.scale());
        self.events.push(SessionEvent::CursorResized(outline));
    }

    fn trace_background(&mut self) {
        let style_index = self.tools.style_index();
        let scale = self.viewport.scale();
        self.background_svg = self.tracer.trace_to_svg(&self.grid, style_index, scale);
        self.grid.clear_dirty();
        debug!(
            style_index,
            scale,
            svg_bytes = self.background_svg.len(),
            "background traced"
        );
        self.events.push(SessionEvent::BackgroundTraced {
            style_index,
            scale,
            svg_bytes: self.background_svg.len(),
        });
    }

    fn grid_size(&self) -> (u32, u32) {
        (self.grid.width(), self.grid.height())
    }
}

fn is_finite_point(point: ScreenPoint) -> bool {
    point.x.is_finite() && point.y.is_finite()
}
