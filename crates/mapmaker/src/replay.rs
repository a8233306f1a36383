use editor::{BiomePalette, DrawingSurface, PaintingSession, SessionError, VectorTracer};
use model::BiomeId;
use replay_protocol::{FrameRect, ScenarioInput};
use tracing::trace;
use view::{ScreenPoint, ScreenRect};

#[derive(Debug)]
pub enum ReplayError {
    Session(SessionError),
    UnknownBiome(u8),
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplayError::Session(error) => write!(formatter, "{error}"),
            ReplayError::UnknownBiome(code) => write!(formatter, "unknown biome code {code}"),
        }
    }
}

impl std::error::Error for ReplayError {}

impl From<SessionError> for ReplayError {
    fn from(error: SessionError) -> Self {
        Self::Session(error)
    }
}

pub fn frame_rect(frame: FrameRect) -> ScreenRect {
    ScreenRect::new(frame.left, frame.top, frame.width, frame.height)
}

/// Feeds one recorded input into the session.
pub fn apply_input<S, T, P>(
    session: &mut PaintingSession<S, T, P>,
    input: &ScenarioInput,
) -> Result<(), ReplayError>
where
    S: DrawingSurface,
    T: VectorTracer,
    P: BiomePalette,
{
    trace!(?input, "replaying input");
    match input {
        ScenarioInput::SelectTool { tool } => session.select_tool_by_name(tool)?,
        ScenarioInput::SelectBiome { biome } => {
            let biome = BiomeId::new(*biome).map_err(|error| ReplayError::UnknownBiome(error.0))?;
            session.change_active_label(biome)?;
        }
        ScenarioInput::SetSize { size } => session.change_diameter(*size)?,
        ScenarioInput::SelectStyle { style_index } => session.change_style(*style_index)?,
        ScenarioInput::PointerDown { x, y } => session.pointer_down(ScreenPoint::new(*x, *y))?,
        ScenarioInput::PointerMove { x, y } => session.pointer_move(ScreenPoint::new(*x, *y))?,
        ScenarioInput::PointerUp => session.pointer_up()?,
        ScenarioInput::PointerCancel => session.pointer_cancel()?,
        ScenarioInput::PointerEnter { x, y } => {
            session.pointer_enter(ScreenPoint::new(*x, *y))?
        }
        ScenarioInput::PointerLeave => session.pointer_leave()?,
        ScenarioInput::Wheel {
            x,
            y,
            delta_y,
            ctrl,
        } => session.wheel(ScreenPoint::new(*x, *y), *delta_y, *ctrl)?,
        ScenarioInput::ZoomIn => session.zoom_in()?,
        ScenarioInput::ZoomOut => session.zoom_out()?,
        ScenarioInput::ScrollTo { x, y } => session.scroll_to(*x, *y)?,
        ScenarioInput::NewMap { width, height } => session.new_map(*width, *height)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use editor::EditorConfig;
    use replay_protocol::Scenario;

    use super::*;
    use crate::palette::StylePalette;
    use crate::raster_surface::RasterSurface;
    use crate::svg_tracer::RunLengthSvgTracer;

    #[test]
    fn replays_a_line_stroke() {
        let mut scenario = Scenario::new("line", 10, 10);
        scenario.header.frame = FrameRect {
            left: 0.0,
            top: 0.0,
            width: 100.0,
            height: 100.0,
        };
        scenario.push(ScenarioInput::SelectTool {
            tool: String::from("brush"),
        });
        scenario.push(ScenarioInput::SelectBiome { biome: 3 });
        scenario.push(ScenarioInput::SetSize { size: 1.0 });
        scenario.push(ScenarioInput::PointerDown { x: 1.0, y: 1.0 });
        scenario.push(ScenarioInput::PointerMove { x: 8.0, y: 1.0 });
        scenario.push(ScenarioInput::PointerUp);

        let mut session = PaintingSession::new(
            EditorConfig::default(),
            scenario.header.width,
            scenario.header.height,
            frame_rect(scenario.header.frame),
            RasterSurface::default(),
            RunLengthSvgTracer::new(StylePalette),
            StylePalette,
        )
        .expect("open session");
        for event in &scenario.events {
            apply_input(&mut session, &event.input).expect("apply input");
        }

        assert_eq!(session.grid().histogram()[3], 8);
        assert!(session.background_svg().contains("class=\"mountains\""));
        assert_eq!(session.tracer().traced(), 2);
        // the brush layer preview shows the stroke
        assert_eq!(session.surface().image().get_pixel(4, 1).0[3], 255);
    }

    #[test]
    fn rejects_unknown_biome_and_tool() {
        let mut session = PaintingSession::new(
            EditorConfig::default(),
            4,
            4,
            frame_rect(FrameRect::default()),
            RasterSurface::default(),
            RunLengthSvgTracer::new(StylePalette),
            StylePalette,
        )
        .expect("open session");
        assert!(matches!(
            apply_input(&mut session, &ScenarioInput::SelectBiome { biome: 40 }),
            Err(ReplayError::UnknownBiome(40))
        ));
        assert!(matches!(
            apply_input(
                &mut session,
                &ScenarioInput::SelectTool {
                    tool: String::from("lasso")
                }
            ),
            Err(ReplayError::Session(SessionError::UnknownTool(_)))
        ));
    }
}
