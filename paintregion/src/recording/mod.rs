//! Recorded pointer sessions.
//!
//! A [`Recording`] is a JSON list of the inputs a host UI would send to a
//! [`PaintControl`]: mode switches, radius changes, pointer presses, moves
//! and releases, erase-all, and data loads. Replaying it drives a control
//! headlessly, which is how painting sessions are reproduced from the CLI and
//! in tests.
//!
//! ```json
//! {
//!   "inputs": [
//!     { "type": "mode", "mode": "draw" },
//!     { "type": "radius", "radius": 20 },
//!     { "type": "down", "lng": 13.40, "lat": 52.52, "zoom": 14 },
//!     { "type": "move", "lng": 13.41, "lat": 52.52, "zoom": 14 },
//!     { "type": "up" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::control::{ControlError, PaintControl};
use crate::coord::{CoordError, GeoPoint};
use crate::geojson::GeoJson;
use crate::sequencer::BrushMode;

/// Errors loading or replaying a recording.
#[derive(Debug, Error)]
pub enum RecordingError {
    /// The recording file could not be read.
    #[error("Failed to read recording {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The recording file could not be written.
    #[error("Failed to write recording {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The recording is not valid JSON or does not match the schema.
    #[error("Invalid recording: {0}")]
    Json(#[from] serde_json::Error),

    /// An input carries an invalid position.
    #[error("Input {index}: {source}")]
    Position {
        index: usize,
        #[source]
        source: CoordError,
    },

    /// The control rejected an input.
    #[error("Input {index}: {source}")]
    Control {
        index: usize,
        #[source]
        source: ControlError,
    },
}

/// One recorded input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Input {
    /// Select draw, erase, or (`null`) no mode.
    Mode { mode: Option<BrushMode> },
    /// Change the brush radius in pixels.
    Radius { radius: f64 },
    /// Pointer pressed.
    Down { lng: f64, lat: f64, zoom: u8 },
    /// Pointer moved.
    Move { lng: f64, lat: f64, zoom: u8 },
    /// Pointer released.
    Up,
    /// Remove the whole region.
    EraseAll,
    /// Replace the region with GeoJSON data.
    Load { data: GeoJson },
}

/// Counts from a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Inputs replayed.
    pub inputs: usize,
    /// Items handed to the sequencer.
    pub queued: usize,
}

/// An ordered list of inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub inputs: Vec<Input>,
}

impl Recording {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an input.
    pub fn push(&mut self, input: Input) {
        self.inputs.push(input);
    }

    /// Builder form of [`Recording::push`].
    pub fn with(mut self, input: Input) -> Self {
        self.push(input);
        self
    }

    /// Number of inputs.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// True when there are no inputs.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Parse a recording from JSON.
    pub fn from_json(json: &str) -> Result<Self, RecordingError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, RecordingError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a recording file.
    pub fn load(path: &Path) -> Result<Self, RecordingError> {
        let json = fs::read_to_string(path).map_err(|source| RecordingError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let recording = Self::from_json(&json)?;
        debug!(path = %path.display(), inputs = recording.len(), "Recording loaded");
        Ok(recording)
    }

    /// Write the recording to a file.
    pub fn save(&self, path: &Path) -> Result<(), RecordingError> {
        let json = self.to_json_pretty()?;
        fs::write(path, json).map_err(|source| RecordingError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Feed every input to `control`, in order.
    ///
    /// Stops at the first input that cannot be applied. Inputs before it
    /// remain applied.
    pub fn replay(&self, control: &mut PaintControl) -> Result<ReplaySummary, RecordingError> {
        let mut summary = ReplaySummary::default();

        for (index, input) in self.inputs.iter().enumerate() {
            let queued = match input {
                Input::Mode { mode } => {
                    control.set_active_mode(*mode);
                    false
                }
                Input::Radius { radius } => {
                    control.set_radius(*radius);
                    false
                }
                Input::Down { lng, lat, zoom } => control
                    .pointer_down(position(index, *lng, *lat)?, *zoom)
                    .is_some(),
                Input::Move { lng, lat, zoom } => control
                    .pointer_move(position(index, *lng, *lat)?, *zoom)
                    .is_some(),
                Input::Up => {
                    control.pointer_up();
                    false
                }
                Input::EraseAll => {
                    control.erase_all();
                    true
                }
                Input::Load { data } => {
                    control
                        .set_data(data)
                        .map_err(|source| RecordingError::Control { index, source })?;
                    true
                }
            };
            summary.inputs += 1;
            if queued {
                summary.queued += 1;
            }
        }

        info!(
            inputs = summary.inputs,
            queued = summary.queued,
            "Recording replayed"
        );
        Ok(summary)
    }
}

fn position(index: usize, lng: f64, lat: f64) -> Result<GeoPoint, RecordingError> {
    GeoPoint::try_new(lng, lat).map_err(|source| RecordingError::Position { index, source })
}
