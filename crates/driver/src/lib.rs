use std::fmt;

use model::BrushDiameter;
use view::ModelPoint;

pub mod fixed_step_interpolation;

pub use fixed_step_interpolation::{FixedStepInterpolation, FixedStepInterpolationConfig};

pub type StrokeSessionId = u64;

/// Interpolation never samples farther apart than this, in model cells.
pub const MAX_STROKE_STEP_CELLS: u32 = 10;

/// Model-space position where one brush circle is stamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DabPoint {
    pub stroke_session_id: StrokeSessionId,
    pub canvas_x: f64,
    pub canvas_y: f64,
}

impl DabPoint {
    pub fn position(&self) -> ModelPoint {
        ModelPoint::new(self.canvas_x, self.canvas_y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeContext {
    pub stroke_session_id: StrokeSessionId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeSamplingError {
    InvalidInput,
    NoActiveStroke,
}

impl fmt::Display for StrokeSamplingError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrokeSamplingError::InvalidInput => write!(formatter, "invalid stroke sampling input"),
            StrokeSamplingError::NoActiveStroke => write!(formatter, "no stroke in progress"),
        }
    }
}

impl std::error::Error for StrokeSamplingError {}

pub trait DabEmitter {
    fn emit_dab(&mut self, dab: DabPoint) -> Result<(), StrokeSamplingError>;
}

impl DabEmitter for Vec<DabPoint> {
    fn emit_dab(&mut self, dab: DabPoint) -> Result<(), StrokeSamplingError> {
        self.push(dab);
        Ok(())
    }
}

pub trait StrokeSampling {
    type Config;

    fn begin_stroke(
        &mut self,
        context: StrokeContext,
        config: &Self::Config,
    ) -> Result<(), StrokeSamplingError>;

    fn feed_point<E>(&mut self, point: ModelPoint, emitter: &mut E) -> Result<(), StrokeSamplingError>
    where
        E: DabEmitter;

    fn end_stroke(&mut self) -> Result<StrokeContext, StrokeSamplingError>;

    fn is_active(&self) -> bool;
}

/// Distance between interpolated dabs for a brush of `diameter` cells.
///
/// Small brushes sample every cell; large ones every eighth of the diameter,
/// but never more than [`MAX_STROKE_STEP_CELLS`] apart.
pub fn stroke_step_cells(diameter: BrushDiameter) -> u32 {
    diameter.get().div_ceil(8).min(MAX_STROKE_STEP_CELLS)
}
