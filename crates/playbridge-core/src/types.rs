//! Core types for Playbridge

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a bridge instance
///
/// Every event record carries the id of the bridge that produced it, so a
/// host multiplexing several players over one channel can route events back
/// to the right view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BridgeId(pub Uuid);

impl BridgeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BridgeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BridgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Video frame dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A selectable stream inside the opened media (audio or text)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Engine-assigned track identifier
    pub id: i32,
    /// Human-readable name
    pub name: String,
}

impl Track {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Metadata of an opened media source
///
/// Carried by the `open` and `load` events once the engine has parsed the
/// source far enough to know what it is playing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Total playback duration in milliseconds (0 if unknown/live)
    pub duration: i64,
    /// Video frame size in pixels
    pub video_size: Dimensions,
    /// Selectable audio tracks
    pub audio_tracks: Vec<Track>,
    /// Selectable text/subtitle tracks
    pub text_tracks: Vec<Track>,
}

impl MediaInfo {
    pub fn new(duration: i64, video_size: Dimensions) -> Self {
        Self {
            duration,
            video_size,
            audio_tracks: Vec::new(),
            text_tracks: Vec::new(),
        }
    }
}

/// Engine-side playback state machine
///
/// The bridge observes this machine, it never drives it: transitions are
/// reported by the engine and translated one-to-one into outbound events.
/// Engine implementations use [`EngineState::can_transition_to`] for their
/// own bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineState {
    /// No session
    Idle,
    /// Source handed to the engine, not yet parsed
    Opening,
    /// Source opened, metadata available
    Opened,
    /// First frame/metadata ready for playback
    Ready,
    /// Actively playing
    Playing,
    /// Paused
    Paused,
    /// Stalled waiting for data
    Buffering,
    /// Halted and released
    Stopped,
    /// Reached natural end of stream
    Ended,
    /// Unrecoverable playback error
    Error,
}

impl EngineState {
    /// Check if transition to target state is valid
    pub fn can_transition_to(&self, target: EngineState) -> bool {
        use EngineState::*;
        matches!(
            (self, target),
            // From Idle
            (Idle, Opening) |
            // From Opening
            (Opening, Opened) | (Opening, Error) | (Opening, Stopped) |
            // From Opened
            (Opened, Ready) | (Opened, Error) | (Opened, Stopped) |
            // From Ready
            (Ready, Playing) | (Ready, Paused) | (Ready, Buffering) | (Ready, Stopped) | (Ready, Error) |
            // From Playing
            (Playing, Paused) | (Playing, Buffering) | (Playing, Stopped) | (Playing, Ended) | (Playing, Error) |
            // From Paused
            (Paused, Playing) | (Paused, Buffering) | (Paused, Stopped) | (Paused, Error) |
            // From Buffering
            (Buffering, Playing) | (Buffering, Paused) | (Buffering, Stopped) | (Buffering, Ended) | (Buffering, Error) |
            // Terminal states; a new open restarts the cycle
            (Stopped, Opening) | (Ended, Opening) | (Error, Opening)
        )
    }

    /// Terminal for the current session
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EngineState::Stopped | EngineState::Ended | EngineState::Error
        )
    }
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineState::Idle => write!(f, "idle"),
            EngineState::Opening => write!(f, "opening"),
            EngineState::Opened => write!(f, "opened"),
            EngineState::Ready => write!(f, "ready"),
            EngineState::Playing => write!(f, "playing"),
            EngineState::Paused => write!(f, "paused"),
            EngineState::Buffering => write!(f, "buffering"),
            EngineState::Stopped => write!(f, "stopped"),
            EngineState::Ended => write!(f, "ended"),
            EngineState::Error => write!(f, "error"),
        }
    }
}
