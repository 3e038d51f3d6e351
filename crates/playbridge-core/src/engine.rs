//! Playback engine contract
//!
//! The engine is the opaque collaborator that decodes, renders, and records.
//! This module defines:
//! - the notification vocabulary an engine reports with
//! - the [`PlaybackEngine`] trait a binding implements
//! - the pure one-to-one translation into outbound [`PlayerEvent`]s

use crate::events::{
    BufferingInfo, PausedInfo, PlayerEvent, PlayingInfo, ProgressInfo, RecordingState,
    SnapshotResult,
};
use crate::source::ResolvedSource;
use crate::types::MediaInfo;
use crate::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// A state-change notification reported by the engine
///
/// Each notification maps to exactly one outbound event. The Idle → Opening
/// transition has no notification: the bridge announces `load_start` itself
/// when it issues the open command, so an engine that fails before producing
/// anything still yields a well-formed `load_start` → `error` sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineNotification {
    /// Source opened, metadata available
    Opened { info: MediaInfo },
    /// First frame/metadata ready for playback
    Ready { info: MediaInfo },
    /// Playback transitioned to actively playing
    Playing {
        seekable: bool,
        current_time: i64,
        duration: i64,
    },
    /// Playback transitioned to paused
    Paused { current_time: i64, duration: i64 },
    /// Playback halted and the engine released
    Stopped,
    /// The engine entered a stalled state
    Buffering { buffer_rate: f64 },
    /// Playback position advanced
    TimeChanged { current_time: i64, duration: i64 },
    /// Media reached natural end of stream
    EndReached,
    /// Unrecoverable playback error
    EncounteredError { message: String },
    /// Recording started, stopped, or failed
    RecordingChanged {
        active: bool,
        path: Option<String>,
        success: bool,
    },
    /// A snapshot attempt completed
    SnapshotTaken {
        path: String,
        success: bool,
        error: Option<String>,
    },
}

/// Position as a 0.0-1.0 fraction of the duration
fn fraction(current_time: i64, duration: i64) -> f64 {
    if duration > 0 {
        (current_time as f64 / duration as f64).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl From<EngineNotification> for PlayerEvent {
    fn from(notification: EngineNotification) -> Self {
        match notification {
            EngineNotification::Opened { info } => PlayerEvent::Open(info),
            EngineNotification::Ready { info } => PlayerEvent::Load(info),
            EngineNotification::Playing {
                seekable,
                current_time,
                duration,
            } => PlayerEvent::Playing(PlayingInfo {
                seekable,
                current_time,
                duration,
                position: fraction(current_time, duration),
            }),
            EngineNotification::Paused {
                current_time,
                duration,
            } => PlayerEvent::Paused(PausedInfo {
                current_time,
                duration,
                position: fraction(current_time, duration),
            }),
            EngineNotification::Stopped => PlayerEvent::Stopped,
            EngineNotification::Buffering { buffer_rate } => {
                PlayerEvent::Buffering(BufferingInfo { buffer_rate })
            }
            EngineNotification::TimeChanged {
                current_time,
                duration,
            } => PlayerEvent::Progress(ProgressInfo {
                current_time,
                remaining_time: (duration - current_time).max(0),
                duration,
                position: fraction(current_time, duration),
            }),
            EngineNotification::EndReached => PlayerEvent::Ended,
            EngineNotification::EncounteredError { message } => PlayerEvent::Error { message },
            EngineNotification::RecordingChanged {
                active,
                path,
                success,
            } => PlayerEvent::RecordingState(RecordingState {
                active,
                path,
                success,
            }),
            EngineNotification::SnapshotTaken {
                path,
                success,
                error,
            } => PlayerEvent::Snapshot(SnapshotResult {
                path,
                success,
                error,
            }),
        }
    }
}

/// Contract between the bridge and a playback engine binding
///
/// One engine instance backs one bridge. The bridge is the sole observer of
/// a session: `open` hands back the receiving end of the session's
/// notification stream, and only the bridge reads it.
///
/// Command methods are fire-and-forget; outcomes surface as notifications,
/// never as return values:
/// - every accepted `start_recording` produces exactly one terminal
///   `RecordingChanged { active: false, .. }` (on stop, session end, or
///   failure)
/// - every `snapshot` produces exactly one `SnapshotTaken`
/// - `set_muted` affects audio output only and produces no notification
///
/// Recording and snapshot destinations are opaque strings passed through to
/// the engine; the bridge never interprets them.
#[async_trait]
pub trait PlaybackEngine: Send + Sync {
    /// Open a source and return the session's notification stream
    ///
    /// Fails fast only when the engine cannot start a session at all (bad
    /// source, session already active); everything after that is reported
    /// through the stream.
    async fn open(&self, source: ResolvedSource) -> Result<mpsc::Receiver<EngineNotification>>;

    /// Stop and release the current session, if any
    async fn close(&self);

    /// Set output audio mute state
    async fn set_muted(&self, muted: bool);

    /// Begin writing decoded output to `path`
    async fn start_recording(&self, path: &str);

    /// Stop an active recording
    async fn stop_recording(&self);

    /// Capture a single frame to `path`
    async fn snapshot(&self, path: &str);
}
