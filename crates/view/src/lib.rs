use std::fmt;

use tracing::debug;

mod zoom;

pub use zoom::{DEFAULT_ZOOM_INDEX, DEFAULT_ZOOM_LEVELS, GridLines, ZoomLevels};

/// Pointer position in client (screen) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Position in grid cell units, independent of zoom.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModelPoint {
    pub x: f64,
    pub y: f64,
}

impl ModelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: ModelPoint) -> f64 {
        let delta_x = other.x - self.x;
        let delta_y = other.y - self.y;
        (delta_x * delta_x + delta_y * delta_y).sqrt()
    }
}

/// Axis-aligned rectangle in client pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Edges count as inside.
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.left
            && point.y >= self.top
            && point.x <= self.left + self.width
            && point.y <= self.top + self.height
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Filled rectangle on the surface backing store, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DeviceRect {
    /// Device area of `row_height` model rows starting at row `y`, spanning
    /// columns `x_start..x_end`, at `scale`.
    pub fn for_rows(x_start: i32, x_end: i32, y: i32, row_height: u32, scale: f64) -> Self {
        Self {
            x: f64::from(x_start) * scale,
            y: f64::from(y) * scale,
            width: (f64::from(x_end) - f64::from(x_start)) * scale,
            height: f64::from(row_height) * scale,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportError {
    EmptyZoomLevels,
    InvalidZoom,
    UnorderedZoomLevels,
    UnknownZoomLevel,
    InvalidModelSize,
    InvalidFrame,
    NonFiniteValue,
}

impl fmt::Display for ViewportError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewportError::EmptyZoomLevels => write!(formatter, "no zoom levels configured"),
            ViewportError::InvalidZoom => {
                write!(formatter, "zoom levels must be finite and positive")
            }
            ViewportError::UnorderedZoomLevels => {
                write!(formatter, "zoom levels must be strictly increasing")
            }
            ViewportError::UnknownZoomLevel => write!(formatter, "scale is not a zoom level"),
            ViewportError::InvalidModelSize => write!(formatter, "map size must be positive"),
            ViewportError::InvalidFrame => {
                write!(formatter, "viewport frame must be finite with positive size")
            }
            ViewportError::NonFiniteValue => write!(formatter, "non-finite coordinate"),
        }
    }
}

impl std::error::Error for ViewportError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RescaleOutcome {
    Unchanged,
    Rescaled {
        old_scale: f64,
        new_scale: f64,
        focus: ModelPoint,
    },
}

impl RescaleOutcome {
    pub fn is_rescaled(&self) -> bool {
        matches!(self, RescaleOutcome::Rescaled { .. })
    }
}

/// Zoomable window onto the map.
///
/// `frame` is the visible scroll container in client pixels; the surface is
/// scrolled inside it by `scroll_x`/`scroll_y` device pixels, so its on-screen
/// origin is `frame.left - scroll_x`, `frame.top - scroll_y`.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    zoom_levels: ZoomLevels,
    zoom_index: usize,
    model_width: u32,
    model_height: u32,
    frame: ScreenRect,
    scroll_x: f64,
    scroll_y: f64,
    // last pointer position seen by the zoom controls
    focus: ScreenPoint,
}

impl Viewport {
    pub fn new(
        zoom_levels: ZoomLevels,
        frame: ScreenRect,
        model_width: u32,
        model_height: u32,
    ) -> Result<Self, ViewportError> {
        validate_frame(frame)?;
        let zoom_index = zoom_levels.default_index();
        let mut viewport = Self {
            zoom_levels,
            zoom_index,
            model_width: 1,
            model_height: 1,
            frame,
            scroll_x: 0.0,
            scroll_y: 0.0,
            focus: ScreenPoint::default(),
        };
        viewport.start_map(model_width, model_height)?;
        Ok(viewport)
    }

    /// Attaches a new map, keeping the current zoom level and centering the
    /// scroll position.
    pub fn start_map(&mut self, model_width: u32, model_height: u32) -> Result<(), ViewportError> {
        if model_width == 0 || model_height == 0 {
            return Err(ViewportError::InvalidModelSize);
        }
        self.model_width = model_width;
        self.model_height = model_height;
        let (surface_width, surface_height) = self.surface_size();
        self.scroll_x = ((surface_width as f64 - self.frame.width) / 2.0).floor();
        self.scroll_y = ((surface_height as f64 - self.frame.height) / 2.0).floor();
        self.clamp_scroll();
        self.focus = ScreenPoint::default();
        Ok(())
    }

    /// Restores the default zoom level.
    pub fn shutdown(&mut self) {
        self.zoom_index = self.zoom_levels.default_index();
        self.scroll_x = 0.0;
        self.scroll_y = 0.0;
    }

    pub fn scale(&self) -> f64 {
        self.zoom_levels.as_slice()[self.zoom_index]
    }

    pub fn zoom_index(&self) -> usize {
        self.zoom_index
    }

    pub fn zoom_levels(&self) -> &ZoomLevels {
        &self.zoom_levels
    }

    pub fn model_size(&self) -> (u32, u32) {
        (self.model_width, self.model_height)
    }

    pub fn frame(&self) -> ScreenRect {
        self.frame
    }

    pub fn scroll_offset(&self) -> (f64, f64) {
        (self.scroll_x, self.scroll_y)
    }

    pub fn focus(&self) -> ScreenPoint {
        self.focus
    }

    /// Backing store size for the given scale, truncated like a canvas size.
    fn surface_size_at(&self, scale: f64) -> (u32, u32) {
        (
            (self.model_width as f64 * scale) as u32,
            (self.model_height as f64 * scale) as u32,
        )
    }

    pub fn surface_size(&self) -> (u32, u32) {
        self.surface_size_at(self.scale())
    }

    /// Height of one drawn row in model units. Below 1:1 a model row covers
    /// less than a device pixel, so rows are widened to stay opaque.
    pub fn row_height(&self) -> u32 {
        row_height_for_scale(self.scale())
    }

    pub fn grid_lines(&self) -> GridLines {
        GridLines::for_scale(self.scale())
    }

    pub fn surface_origin(&self) -> ScreenPoint {
        ScreenPoint::new(
            self.frame.left - self.scroll_x,
            self.frame.top - self.scroll_y,
        )
    }

    pub fn set_frame(&mut self, frame: ScreenRect) -> Result<(), ViewportError> {
        validate_frame(frame)?;
        self.frame = frame;
        self.clamp_scroll();
        Ok(())
    }

    /// Scrolls like a scroll container: whole pixels, clamped to the
    /// scrollable range.
    pub fn scroll_to(&mut self, scroll_x: f64, scroll_y: f64) -> Result<(), ViewportError> {
        if !scroll_x.is_finite() || !scroll_y.is_finite() {
            return Err(ViewportError::NonFiniteValue);
        }
        self.scroll_x = scroll_x.round();
        self.scroll_y = scroll_y.round();
        self.clamp_scroll();
        Ok(())
    }

    pub fn track_pointer(&mut self, pointer: ScreenPoint) {
        if pointer.x.is_finite() && pointer.y.is_finite() {
            self.focus = pointer;
        }
    }

    /// Maps a client position to model space. Not rounded.
    pub fn canvas_point(&self, pointer: ScreenPoint) -> ModelPoint {
        let origin = self.surface_origin();
        let scale = self.scale();
        ModelPoint::new((pointer.x - origin.x) / scale, (pointer.y - origin.y) / scale)
    }

    pub fn screen_point(&self, point: ModelPoint) -> ScreenPoint {
        let origin = self.surface_origin();
        let scale = self.scale();
        ScreenPoint::new(point.x * scale + origin.x, point.y * scale + origin.y)
    }

    pub fn rescale(&mut self, new_scale: f64) -> Result<RescaleOutcome, ViewportError> {
        let index = self
            .zoom_levels
            .index_of(new_scale)
            .ok_or(ViewportError::UnknownZoomLevel)?;
        self.rescale_to_index(index)
    }

    /// Switches zoom level keeping the model point under the focus pointer
    /// (or under the frame center when the pointer is outside the frame) at
    /// the same screen position.
    ///
    /// A level whose truncated surface size equals the current one is
    /// skipped: the scale stays where it is.
    pub fn rescale_to_index(&mut self, index: usize) -> Result<RescaleOutcome, ViewportError> {
        let new_scale = self
            .zoom_levels
            .get(index)
            .ok_or(ViewportError::UnknownZoomLevel)?;
        if self.surface_size_at(new_scale) == self.surface_size() {
            return Ok(RescaleOutcome::Unchanged);
        }

        if !self.frame.contains(self.focus) {
            self.focus = self.frame.center();
        }
        let old_scale = self.scale();
        let focus = self.canvas_point(self.focus);
        let scale_delta = checked_add(new_scale, -old_scale)?;
        let next_scroll_x = checked_add(self.scroll_x, checked_mul(focus.x, scale_delta)?)?;
        let next_scroll_y = checked_add(self.scroll_y, checked_mul(focus.y, scale_delta)?)?;

        self.zoom_index = index;
        self.scroll_x = next_scroll_x.round();
        self.scroll_y = next_scroll_y.round();
        self.clamp_scroll();

        debug!(
            old_scale,
            new_scale,
            focus_x = focus.x,
            focus_y = focus.y,
            scroll_x = self.scroll_x,
            scroll_y = self.scroll_y,
            "viewport rescaled"
        );
        Ok(RescaleOutcome::Rescaled {
            old_scale,
            new_scale,
            focus,
        })
    }

    pub fn zoom_in(&mut self) -> Result<RescaleOutcome, ViewportError> {
        if self.zoom_index + 1 >= self.zoom_levels.len() {
            return Ok(RescaleOutcome::Unchanged);
        }
        self.rescale_to_index(self.zoom_index + 1)
    }

    pub fn zoom_out(&mut self) -> Result<RescaleOutcome, ViewportError> {
        if self.zoom_index == 0 {
            return Ok(RescaleOutcome::Unchanged);
        }
        self.rescale_to_index(self.zoom_index - 1)
    }

    /// Ctrl+wheel zooms about the wheel position: scrolling down zooms out.
    /// A wheel without ctrl belongs to the scroll container and is ignored.
    pub fn wheel(
        &mut self,
        pointer: ScreenPoint,
        delta_y: f64,
        ctrl: bool,
    ) -> Result<RescaleOutcome, ViewportError> {
        if !ctrl {
            return Ok(RescaleOutcome::Unchanged);
        }
        self.track_pointer(pointer);
        if delta_y > 0.0 {
            self.zoom_out()
        } else {
            self.zoom_in()
        }
    }

    fn clamp_scroll(&mut self) {
        let (surface_width, surface_height) = self.surface_size();
        let max_x = (surface_width as f64 - self.frame.width).max(0.0).floor();
        let max_y = (surface_height as f64 - self.frame.height).max(0.0).floor();
        self.scroll_x = self.scroll_x.clamp(0.0, max_x);
        self.scroll_y = self.scroll_y.clamp(0.0, max_y);
    }
}

pub fn row_height_for_scale(scale: f64) -> u32 {
    if scale < 1.0 {
        (1.0 / scale).ceil() as u32
    } else {
        1
    }
}

fn validate_frame(frame: ScreenRect) -> Result<(), ViewportError> {
    let finite = frame.left.is_finite()
        && frame.top.is_finite()
        && frame.width.is_finite()
        && frame.height.is_finite();
    if !finite || frame.width <= 0.0 || frame.height <= 0.0 {
        return Err(ViewportError::InvalidFrame);
    }
    Ok(())
}

fn checked_add(current: f64, delta: f64) -> Result<f64, ViewportError> {
    if !delta.is_finite() {
        return Err(ViewportError::NonFiniteValue);
    }
    let next = current + delta;
    if !next.is_finite() {
        return Err(ViewportError::NonFiniteValue);
    }
    Ok(next)
}

fn checked_mul(left: f64, right: f64) -> Result<f64, ViewportError> {
    if !left.is_finite() || !right.is_finite() {
        return Err(ViewportError::NonFiniteValue);
    }
    let next = left * right;
    if !next.is_finite() {
        return Err(ViewportError::NonFiniteValue);
    }
    Ok(next)
}
