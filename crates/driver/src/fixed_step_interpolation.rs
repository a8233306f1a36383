use model::BrushDiameter;
use view::ModelPoint;

use crate::{
    DabEmitter, DabPoint, StrokeContext, StrokeSampling, StrokeSamplingError, stroke_step_cells,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStepInterpolationConfig {
    pub step_cells: f64,
}

impl Default for FixedStepInterpolationConfig {
    fn default() -> Self {
        Self { step_cells: 1.0 }
    }
}

impl FixedStepInterpolationConfig {
    pub fn for_diameter(diameter: BrushDiameter) -> Self {
        Self {
            step_cells: f64::from(stroke_step_cells(diameter)),
        }
    }
}

/// Stamps a dab at the first point of a stroke, then walks every following
/// segment from its start in equal steps and stamps its end point.
///
/// Each segment restarts the step count, so spacing is only uniform within
/// one segment. The start of a segment is never stamped again because the
/// previous segment (or the stroke start) already stamped it.
#[derive(Debug, Default)]
pub struct FixedStepInterpolation {
    stroke_context: Option<StrokeContext>,
    step_cells: f64,
    last_point: Option<ModelPoint>,
}

impl FixedStepInterpolation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_point(&self) -> Option<ModelPoint> {
        self.last_point
    }

    /// Takes effect from the next segment; dabs already emitted keep their
    /// spacing.
    pub fn set_config(
        &mut self,
        config: &FixedStepInterpolationConfig,
    ) -> Result<(), StrokeSamplingError> {
        validate_config(config)?;
        self.step_cells = config.step_cells;
        Ok(())
    }

    fn emit<E>(
        &self,
        context: StrokeContext,
        canvas_x: f64,
        canvas_y: f64,
        emitter: &mut E,
    ) -> Result<(), StrokeSamplingError>
    where
        E: DabEmitter,
    {
        emitter.emit_dab(DabPoint {
            stroke_session_id: context.stroke_session_id,
            canvas_x,
            canvas_y,
        })
    }
}

fn validate_config(config: &FixedStepInterpolationConfig) -> Result<(), StrokeSamplingError> {
    if !config.step_cells.is_finite() || config.step_cells <= 0.0 {
        return Err(StrokeSamplingError::InvalidInput);
    }
    Ok(())
}

impl StrokeSampling for FixedStepInterpolation {
    type Config = FixedStepInterpolationConfig;

    fn begin_stroke(
        &mut self,
        context: StrokeContext,
        config: &Self::Config,
    ) -> Result<(), StrokeSamplingError> {
        validate_config(config)?;
        self.stroke_context = Some(context);
        self.step_cells = config.step_cells;
        self.last_point = None;
        Ok(())
    }

    fn feed_point<E>(&mut self, point: ModelPoint, emitter: &mut E) -> Result<(), StrokeSamplingError>
    where
        E: DabEmitter,
    {
        let Some(context) = self.stroke_context else {
            return Err(StrokeSamplingError::NoActiveStroke);
        };
        if !point.x.is_finite() || !point.y.is_finite() {
            return Err(StrokeSamplingError::InvalidInput);
        }

        let Some(segment_start) = self.last_point else {
            self.emit(context, point.x, point.y, emitter)?;
            self.last_point = Some(point);
            return Ok(());
        };

        let distance = segment_start.distance_to(point);
        if distance == 0.0 {
            return Ok(());
        }
        let direction_x = (point.x - segment_start.x) / distance;
        let direction_y = (point.y - segment_start.y) / distance;

        let mut step_index = 1u32;
        loop {
            let travelled = f64::from(step_index) * self.step_cells;
            if travelled >= distance {
                break;
            }
            self.emit(
                context,
                segment_start.x + direction_x * travelled,
                segment_start.y + direction_y * travelled,
                emitter,
            )?;
            step_index += 1;
        }
        self.emit(context, point.x, point.y, emitter)?;
        self.last_point = Some(point);
        Ok(())
    }

    fn end_stroke(&mut self) -> Result<StrokeContext, StrokeSamplingError> {
        let context = self
            .stroke_context
            .take()
            .ok_or(StrokeSamplingError::NoActiveStroke)?;
        self.last_point = None;
        Ok(context)
    }

    fn is_active(&self) -> bool {
        self.stroke_context.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> StrokeContext {
        StrokeContext {
            stroke_session_id: 7,
        }
    }

    fn begin(step_cells: f64) -> FixedStepInterpolation {
        let mut algorithm = FixedStepInterpolation::new();
        algorithm
            .begin_stroke(context(), &FixedStepInterpolationConfig { step_cells })
            .expect("begin stroke");
        algorithm
    }

    fn xs(dabs: &[DabPoint]) -> Vec<f64> {
        dabs.iter().map(|dab| dab.canvas_x).collect()
    }

    #[test]
    fn emits_first_point_then_fixed_steps_and_end() {
        let mut algorithm = begin(3.0);
        let mut dabs = Vec::new();
        algorithm
            .feed_point(ModelPoint::new(0.0, 0.0), &mut dabs)
            .expect("first point");
        algorithm
            .feed_point(ModelPoint::new(10.0, 0.0), &mut dabs)
            .expect("second point");

        assert_eq!(xs(&dabs), vec![0.0, 3.0, 6.0, 9.0, 10.0]);
        assert!(dabs.iter().all(|dab| dab.canvas_y == 0.0));
        assert!(dabs.iter().all(|dab| dab.stroke_session_id == 7));
    }

    #[test]
    fn each_segment_restarts_steps() {
        let mut algorithm = begin(3.0);
        let mut dabs = Vec::new();
        for x in [0.0, 5.0, 10.0] {
            algorithm
                .feed_point(ModelPoint::new(x, 0.0), &mut dabs)
                .expect("feed point");
        }
        assert_eq!(xs(&dabs), vec![0.0, 3.0, 5.0, 8.0, 10.0]);
    }

    #[test]
    fn diagonal_segment_keeps_spacing() {
        let mut algorithm = begin(1.0);
        let mut dabs = Vec::new();
        algorithm
            .feed_point(ModelPoint::new(0.0, 0.0), &mut dabs)
            .expect("first point");
        algorithm
            .feed_point(ModelPoint::new(3.0, 4.0), &mut dabs)
            .expect("second point");
        assert_eq!(dabs.len(), 6);
        for pair in dabs.windows(2) {
            let gap = pair[0].position().distance_to(pair[1].position());
            assert!(gap <= 1.0 + 1e-9, "gap {gap}");
        }
        assert_eq!(dabs[5].position(), ModelPoint::new(3.0, 4.0));
    }

    #[test]
    fn repeated_point_emits_nothing() {
        let mut algorithm = begin(1.0);
        let mut dabs = Vec::new();
        algorithm
            .feed_point(ModelPoint::new(2.0, 2.0), &mut dabs)
            .expect("first point");
        algorithm
            .feed_point(ModelPoint::new(2.0, 2.0), &mut dabs)
            .expect("same point");
        assert_eq!(dabs.len(), 1);
    }

    #[test]
    fn feed_without_stroke_is_rejected() {
        let mut algorithm = FixedStepInterpolation::new();
        let mut dabs = Vec::new();
        assert_eq!(
            algorithm.feed_point(ModelPoint::new(1.0, 1.0), &mut dabs),
            Err(StrokeSamplingError::NoActiveStroke)
        );
        assert_eq!(
            algorithm.end_stroke(),
            Err(StrokeSamplingError::NoActiveStroke)
        );
    }

    #[test]
    fn begin_stroke_rejects_non_positive_step() {
        let mut algorithm = FixedStepInterpolation::new();
        let error = algorithm
            .begin_stroke(context(), &FixedStepInterpolationConfig { step_cells: 0.0 })
            .expect_err("invalid step should fail");
        assert_eq!(error, StrokeSamplingError::InvalidInput);
        assert!(!algorithm.is_active());
    }

    #[test]
    fn config_change_applies_to_next_segment() {
        let mut algorithm = begin(1.0);
        let mut dabs = Vec::new();
        algorithm
            .feed_point(ModelPoint::new(0.0, 0.0), &mut dabs)
            .expect("first point");
        algorithm
            .feed_point(ModelPoint::new(3.0, 0.0), &mut dabs)
            .expect("second point");
        algorithm
            .set_config(&FixedStepInterpolationConfig { step_cells: 2.0 })
            .expect("set config");
        algorithm
            .feed_point(ModelPoint::new(8.0, 0.0), &mut dabs)
            .expect("third point");
        assert_eq!(xs(&dabs), vec![0.0, 1.0, 2.0, 3.0, 5.0, 7.0, 8.0]);
    }

    #[test]
    fn end_stroke_returns_context_and_resets() {
        let mut algorithm = begin(1.0);
        let mut dabs = Vec::new();
        algorithm
            .feed_point(ModelPoint::new(0.0, 0.0), &mut dabs)
            .expect("first point");
        assert_eq!(algorithm.end_stroke(), Ok(context()));
        assert!(!algorithm.is_active());
        assert_eq!(algorithm.last_point(), None);
    }
}
