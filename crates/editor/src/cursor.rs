use view::ScreenPoint;

/// Outlines wider than this get a center cross.
const CROSSHAIR_MIN_DIAMETER: f64 = 70.0;
const CROSSHAIR_SIZE: f64 = 16.0;

/// Geometry of the circular brush outline, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorOutline {
    pub diameter: f64,
    pub half_extent: f64,
    pub radius: f64,
    /// Top-left corner of the center cross inside the outline box.
    pub crosshair_origin: Option<f64>,
}

impl CursorOutline {
    pub fn new(diameter: f64) -> Self {
        // one pixel of padding around the stroke on each side
        let half_extent = diameter / 2.0 + 1.0;
        let crosshair_origin = (diameter > CROSSHAIR_MIN_DIAMETER)
            .then(|| half_extent.floor() - CROSSHAIR_SIZE / 2.0);
        Self {
            diameter,
            half_extent,
            radius: half_extent - 1.0,
            crosshair_origin,
        }
    }

    pub fn box_size(&self) -> f64 {
        self.diameter + 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrushCursor {
    outline: CursorOutline,
    position: ScreenPoint,
    visible: bool,
    raised: bool,
}

impl Default for BrushCursor {
    fn default() -> Self {
        Self {
            outline: CursorOutline::new(0.0),
            position: ScreenPoint::default(),
            visible: false,
            raised: false,
        }
    }
}

impl BrushCursor {
    pub fn outline(&self) -> CursorOutline {
        self.outline
    }

    pub fn position(&self) -> ScreenPoint {
        self.position
    }

    /// Top-left corner of the outline box.
    pub fn box_origin(&self) -> ScreenPoint {
        ScreenPoint::new(
            self.position.x - self.outline.half_extent,
            self.position.y - self.outline.half_extent,
        )
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_raised(&self) -> bool {
        self.raised
    }

    pub(crate) fn move_to(&mut self, position: ScreenPoint) {
        self.position = position;
    }

    /// Keeps the center in place.
    pub(crate) fn resize(&mut self, diameter: f64) -> CursorOutline {
        self.outline = CursorOutline::new(diameter);
        self.outline
    }

    pub(crate) fn show(&mut self) {
        self.visible = true;
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
    }

    pub(crate) fn raise(&mut self) {
        self.raised = true;
    }

    pub(crate) fn lower(&mut self) {
        self.raised = false;
    }
}
