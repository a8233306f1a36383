//! JSONL format for recorded editor input.
//!
//! The first non-empty line is a [`ScenarioHeader`]; every following line is
//! one [`ScenarioEvent`]. Pointer coordinates are client pixels.

use std::fmt;
use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

pub const SCENARIO_SCHEMA_VERSION: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for FrameRect {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioHeader {
    pub schema_version: u16,
    pub scenario_id: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub frame: FrameRect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioInput {
    SelectTool {
        tool: String,
    },
    SelectBiome {
        biome: u8,
    },
    SetSize {
        size: f64,
    },
    SelectStyle {
        style_index: usize,
    },
    PointerDown {
        x: f64,
        y: f64,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerUp,
    PointerCancel,
    PointerEnter {
        x: f64,
        y: f64,
    },
    PointerLeave,
    Wheel {
        x: f64,
        y: f64,
        delta_y: f64,
        #[serde(default)]
        ctrl: bool,
    },
    ZoomIn,
    ZoomOut,
    ScrollTo {
        x: f64,
        y: f64,
    },
    NewMap {
        width: u32,
        height: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioEvent {
    pub tick: u64,
    #[serde(flatten)]
    pub input: ScenarioInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub header: ScenarioHeader,
    pub events: Vec<ScenarioEvent>,
}

impl Scenario {
    pub fn new(scenario_id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            header: ScenarioHeader {
                schema_version: SCENARIO_SCHEMA_VERSION,
                scenario_id: scenario_id.into(),
                width,
                height,
                frame: FrameRect::default(),
            },
            events: Vec::new(),
        }
    }

    /// Appends `input` one tick after the last event.
    pub fn push(&mut self, input: ScenarioInput) {
        let tick = self.events.last().map_or(0, |event| event.tick + 1);
        self.events.push(ScenarioEvent { tick, input });
    }
}

#[derive(Debug)]
pub enum ScenarioReadError {
    Io(std::io::Error),
    Parse { line: usize, message: String },
    MissingHeader,
    UnsupportedSchema { found: u16 },
}

impl fmt::Display for ScenarioReadError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioReadError::Io(error) => write!(formatter, "read scenario failed: {error}"),
            ScenarioReadError::Parse { line, message } => {
                write!(formatter, "parse scenario JSON at line {line} failed: {message}")
            }
            ScenarioReadError::MissingHeader => write!(formatter, "scenario has no header line"),
            ScenarioReadError::UnsupportedSchema { found } => write!(
                formatter,
                "scenario schema version {found} is not supported (expected {SCENARIO_SCHEMA_VERSION})"
            ),
        }
    }
}

impl std::error::Error for ScenarioReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScenarioReadError::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ScenarioReadError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

fn write_jsonl_line<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), std::io::Error> {
    serde_json::to_writer(&mut *writer, value).map_err(|error| {
        std::io::Error::other(format!("serialize scenario line as JSON failed: {error}"))
    })?;
    writer.write_all(b"\n")
}

pub fn write_scenario(writer: &mut dyn Write, scenario: &Scenario) -> Result<(), std::io::Error> {
    write_jsonl_line(writer, &scenario.header)?;
    for event in &scenario.events {
        write_jsonl_line(writer, event)?;
    }
    Ok(())
}

pub fn read_scenario(reader: &mut dyn BufRead) -> Result<Scenario, ScenarioReadError> {
    let mut header: Option<ScenarioHeader> = None;
    let mut events = Vec::new();
    let mut line_buffer = String::new();
    let mut line_number = 0usize;
    loop {
        line_buffer.clear();
        let bytes = reader.read_line(&mut line_buffer)?;
        if bytes == 0 {
            break;
        }
        line_number += 1;
        if line_buffer.trim().is_empty() {
            continue;
        }
        let parse_error = |error: serde_json::Error| ScenarioReadError::Parse {
            line: line_number,
            message: error.to_string(),
        };
        match header {
            None => {
                let parsed =
                    serde_json::from_str::<ScenarioHeader>(&line_buffer).map_err(parse_error)?;
                if parsed.schema_version != SCENARIO_SCHEMA_VERSION {
                    return Err(ScenarioReadError::UnsupportedSchema {
                        found: parsed.schema_version,
                    });
                }
                header = Some(parsed);
            }
            Some(_) => {
                let event =
                    serde_json::from_str::<ScenarioEvent>(&line_buffer).map_err(parse_error)?;
                events.push(event);
            }
        }
    }
    let header = header.ok_or(ScenarioReadError::MissingHeader)?;
    Ok(Scenario { header, events })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidMapSize { width: u32, height: u32 },
    TickDecreased { previous: u64, current: u64 },
    PointerDownWhileDown { tick: u64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidMapSize { width, height } => {
                write!(formatter, "map size {width}x{height} must be positive")
            }
            ValidationError::TickDecreased { previous, current } => {
                write!(formatter, "tick decreased from {previous} to {current}")
            }
            ValidationError::PointerDownWhileDown { tick } => {
                write!(formatter, "pointer pressed twice without release at tick {tick}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Checks the recording itself. Out-of-state pointer input such as a
/// release without a press is legal and left to the editor.
pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    let ScenarioHeader { width, height, .. } = scenario.header;
    if width == 0 || height == 0 {
        return Err(ValidationError::InvalidMapSize { width, height });
    }

    let mut previous_tick: Option<u64> = None;
    let mut pointer_down = false;
    for event in &scenario.events {
        if let Some(previous) = previous_tick {
            if event.tick < previous {
                return Err(ValidationError::TickDecreased {
                    previous,
                    current: event.tick,
                });
            }
        }
        previous_tick = Some(event.tick);

        match &event.input {
            ScenarioInput::PointerDown { .. } => {
                if pointer_down {
                    return Err(ValidationError::PointerDownWhileDown { tick: event.tick });
                }
                pointer_down = true;
            }
            ScenarioInput::PointerUp | ScenarioInput::PointerCancel => pointer_down = false,
            ScenarioInput::NewMap { width, height } => {
                if *width == 0 || *height == 0 {
                    return Err(ValidationError::InvalidMapSize {
                        width: *width,
                        height: *height,
                    });
                }
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_scenario() -> Scenario {
        let mut scenario = Scenario::new("line", 10, 10);
        scenario.push(ScenarioInput::SelectTool {
            tool: String::from("brush"),
        });
        scenario.push(ScenarioInput::SetSize { size: 1.0 });
        scenario.push(ScenarioInput::PointerDown { x: 1.0, y: 1.0 });
        scenario.push(ScenarioInput::PointerMove { x: 8.0, y: 1.0 });
        scenario.push(ScenarioInput::PointerUp);
        scenario
    }

    #[test]
    fn reads_hand_written_lines() {
        let text = concat!(
            "{\"schema_version\":1,\"scenario_id\":\"plus\",\"width\":10,\"height\":10}\n",
            "\n",
            "{\"tick\":0,\"kind\":\"select_tool\",\"tool\":\"brush\"}\n",
            "{\"tick\":1,\"kind\":\"select_biome\",\"biome\":2}\n",
            "{\"tick\":2,\"kind\":\"pointer_down\",\"x\":5,\"y\":5}\n",
            "{\"tick\":3,\"kind\":\"wheel\",\"x\":5,\"y\":5,\"delta_y\":-1.0}\n",
            "{\"tick\":3,\"kind\":\"pointer_up\"}\n",
        );
        let mut reader = std::io::BufReader::new(text.as_bytes());
        let scenario = read_scenario(&mut reader).expect("read scenario");

        assert_eq!(scenario.header.width, 10);
        assert_eq!(scenario.header.frame, FrameRect::default());
        assert_eq!(scenario.events.len(), 5);
        assert_eq!(
            scenario.events[2].input,
            ScenarioInput::PointerDown { x: 5.0, y: 5.0 }
        );
        assert_eq!(
            scenario.events[3].input,
            ScenarioInput::Wheel {
                x: 5.0,
                y: 5.0,
                delta_y: -1.0,
                ctrl: false
            }
        );
        assert_eq!(validate_scenario(&scenario), Ok(()));
    }

    #[test]
    fn jsonl_roundtrip_preserves_events() {
        let scenario = line_scenario();
        let mut bytes = Vec::new();
        write_scenario(&mut bytes, &scenario).expect("write scenario");
        let text = String::from_utf8(bytes.clone()).expect("utf8");
        assert_eq!(text.lines().count(), 6);
        assert!(text.contains("\"kind\":\"pointer_up\""));

        let mut reader = std::io::BufReader::new(bytes.as_slice());
        let parsed = read_scenario(&mut reader).expect("read scenario");
        assert_eq!(parsed, scenario);
    }

    #[test]
    fn reports_line_of_bad_event() {
        let text = concat!(
            "{\"schema_version\":1,\"scenario_id\":\"bad\",\"width\":4,\"height\":4}\n",
            "{\"tick\":0,\"kind\":\"zoom_in\"}\n",
            "{\"tick\":1,\"kind\":\"teleport\"}\n",
        );
        let mut reader = std::io::BufReader::new(text.as_bytes());
        let error = read_scenario(&mut reader).expect_err("unknown kind should fail");
        assert!(matches!(error, ScenarioReadError::Parse { line: 3, .. }));
    }

    #[test]
    fn rejects_other_schema_versions_and_empty_input() {
        let text = "{\"schema_version\":7,\"scenario_id\":\"future\",\"width\":4,\"height\":4}\n";
        let mut reader = std::io::BufReader::new(text.as_bytes());
        assert!(matches!(
            read_scenario(&mut reader),
            Err(ScenarioReadError::UnsupportedSchema { found: 7 })
        ));

        let mut empty = std::io::BufReader::new("\n\n".as_bytes());
        assert!(matches!(
            read_scenario(&mut empty),
            Err(ScenarioReadError::MissingHeader)
        ));
    }

    #[test]
    fn validation_catches_recording_mistakes() {
        let mut scenario = line_scenario();
        scenario.events[4].tick = 1;
        assert_eq!(
            validate_scenario(&scenario),
            Err(ValidationError::TickDecreased {
                previous: 3,
                current: 1
            })
        );

        let mut double_press = Scenario::new("double", 4, 4);
        double_press.push(ScenarioInput::PointerDown { x: 1.0, y: 1.0 });
        double_press.push(ScenarioInput::PointerDown { x: 2.0, y: 1.0 });
        assert_eq!(
            validate_scenario(&double_press),
            Err(ValidationError::PointerDownWhileDown { tick: 1 })
        );

        let empty_map = Scenario::new("empty", 0, 4);
        assert_eq!(
            validate_scenario(&empty_map),
            Err(ValidationError::InvalidMapSize {
                width: 0,
                height: 4
            })
        );
    }
}
