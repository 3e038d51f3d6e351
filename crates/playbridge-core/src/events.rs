//! Outbound event vocabulary
//!
//! The twelve lifecycle events a bridge delivers to its host:
//! - one-way, asynchronous, best-effort notifications
//! - at most one per underlying engine transition
//! - serializable as tagged key/value payloads for loosely-typed hosts

use crate::types::{BridgeId, MediaInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload of the `playing` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayingInfo {
    /// Whether the opened media supports seeking
    pub seekable: bool,
    /// Playback position in milliseconds
    pub current_time: i64,
    /// Total duration in milliseconds (0 if unknown/live)
    pub duration: i64,
    /// Position as a 0.0-1.0 fraction of the duration
    pub position: f64,
}

/// Payload of the `paused` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PausedInfo {
    /// Playback position in milliseconds
    pub current_time: i64,
    /// Total duration in milliseconds
    pub duration: i64,
    /// Position as a 0.0-1.0 fraction of the duration
    pub position: f64,
}

/// Payload of the `buffering` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferingInfo {
    /// How full the engine's buffer is, 0.0-100.0
    pub buffer_rate: f64,
}

/// Payload of the periodic `progress` tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressInfo {
    /// Elapsed playback time in milliseconds
    pub current_time: i64,
    /// Remaining playback time in milliseconds
    pub remaining_time: i64,
    /// Total duration in milliseconds
    pub duration: i64,
    /// Position as a 0.0-1.0 fraction of the duration
    pub position: f64,
}

/// Payload of the `recording_state` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingState {
    /// True while the engine is writing output
    pub active: bool,
    /// Destination path of the recording, when known
    pub path: Option<String>,
    /// Whether the reported step succeeded
    pub success: bool,
}

/// Payload of the `snapshot` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotResult {
    /// Destination path of the capture
    pub path: String,
    /// Whether the capture succeeded
    pub success: bool,
    /// Failure description when `success` is false
    pub error: Option<String>,
}

/// Outbound lifecycle event
///
/// Serializes as an internally-tagged object, e.g.
/// `{"event":"playing","seekable":true,"current_time":0,...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlayerEvent {
    /// The bridge began opening a source
    LoadStart,
    /// Source opened, metadata available
    Open(MediaInfo),
    /// First frame/metadata ready for playback
    Load(MediaInfo),
    /// Playback transitioned to actively playing
    Playing(PlayingInfo),
    /// Playback transitioned to paused
    Paused(PausedInfo),
    /// Playback halted and the engine released
    Stopped,
    /// The engine entered a stalled state
    Buffering(BufferingInfo),
    /// Periodic position tick while playing
    Progress(ProgressInfo),
    /// Media reached natural end of stream
    Ended,
    /// Unrecoverable playback error
    Error { message: String },
    /// Recording started, stopped, or failed
    RecordingState(RecordingState),
    /// A snapshot attempt completed
    Snapshot(SnapshotResult),
}

impl PlayerEvent {
    /// The kind discriminant of this event
    pub fn kind(&self) -> EventKind {
        match self {
            PlayerEvent::LoadStart => EventKind::LoadStart,
            PlayerEvent::Open(_) => EventKind::Open,
            PlayerEvent::Load(_) => EventKind::Load,
            PlayerEvent::Playing(_) => EventKind::Playing,
            PlayerEvent::Paused(_) => EventKind::Paused,
            PlayerEvent::Stopped => EventKind::Stopped,
            PlayerEvent::Buffering(_) => EventKind::Buffering,
            PlayerEvent::Progress(_) => EventKind::Progress,
            PlayerEvent::Ended => EventKind::Ended,
            PlayerEvent::Error { .. } => EventKind::Error,
            PlayerEvent::RecordingState(_) => EventKind::RecordingState,
            PlayerEvent::Snapshot(_) => EventKind::Snapshot,
        }
    }
}

/// Event kind discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    LoadStart,
    Open,
    Load,
    Playing,
    Paused,
    Stopped,
    Buffering,
    Progress,
    Ended,
    Error,
    RecordingState,
    Snapshot,
}

impl EventKind {
    /// All twelve kinds, in lifecycle order
    pub const ALL: [EventKind; 12] = [
        EventKind::LoadStart,
        EventKind::Open,
        EventKind::Load,
        EventKind::Playing,
        EventKind::Paused,
        EventKind::Stopped,
        EventKind::Buffering,
        EventKind::Progress,
        EventKind::Ended,
        EventKind::Error,
        EventKind::RecordingState,
        EventKind::Snapshot,
    ];
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventKind::LoadStart => "load_start",
            EventKind::Open => "open",
            EventKind::Load => "load",
            EventKind::Playing => "playing",
            EventKind::Paused => "paused",
            EventKind::Stopped => "stopped",
            EventKind::Buffering => "buffering",
            EventKind::Progress => "progress",
            EventKind::Ended => "ended",
            EventKind::Error => "error",
            EventKind::RecordingState => "recording_state",
            EventKind::Snapshot => "snapshot",
        };
        write!(f, "{}", name)
    }
}

/// A delivered event with bridge metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// The bridge instance that produced the event
    pub target: BridgeId,
    /// Strictly increasing per-bridge sequence number
    pub sequence: u64,
    /// Delivery timestamp
    pub timestamp: DateTime<Utc>,
    /// The event
    #[serde(flatten)]
    pub event: PlayerEvent,
}

impl EventRecord {
    /// Loosely-typed key/value form of this record
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
