//! Scripted media descriptions
//!
//! A [`SimMedia`] tells the engine what a "file" looks like and how its
//! playback should unfold: metadata, plus optional failure, stall, halt,
//! and error points along the timeline.

use playbridge_core::{Dimensions, MediaInfo, Track};

/// Description of one simulated media source
#[derive(Debug, Clone)]
pub struct SimMedia {
    pub(crate) duration: i64,
    pub(crate) video_size: Dimensions,
    pub(crate) audio_tracks: Vec<Track>,
    pub(crate) text_tracks: Vec<Track>,
    pub(crate) open_error: Option<String>,
    pub(crate) stall_at: Option<i64>,
    pub(crate) error_at: Option<(i64, String)>,
    pub(crate) halt_at: Option<i64>,
}

impl SimMedia {
    /// A plain clip of the given duration (milliseconds)
    pub fn new(duration_ms: i64) -> Self {
        Self {
            duration: duration_ms,
            video_size: Dimensions::new(1920, 1080),
            audio_tracks: Vec::new(),
            text_tracks: Vec::new(),
            open_error: None,
            stall_at: None,
            error_at: None,
            halt_at: None,
        }
    }

    /// A source that fails as soon as the engine tries to open it
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            open_error: Some(message.into()),
            ..Self::new(0)
        }
    }

    pub fn with_video_size(mut self, width: u32, height: u32) -> Self {
        self.video_size = Dimensions::new(width, height);
        self
    }

    pub fn with_audio_track(mut self, track: Track) -> Self {
        self.audio_tracks.push(track);
        self
    }

    pub fn with_text_track(mut self, track: Track) -> Self {
        self.text_tracks.push(track);
        self
    }

    /// Stall once (buffering, then resume) when playback reaches this position
    pub fn with_stall_at(mut self, position_ms: i64) -> Self {
        self.stall_at = Some(position_ms);
        self
    }

    /// Fail playback when it reaches this position
    pub fn with_error_at(mut self, position_ms: i64, message: impl Into<String>) -> Self {
        self.error_at = Some((position_ms, message.into()));
        self
    }

    /// Halt and release when playback reaches this position, the way a
    /// disappearing live stream would
    pub fn with_halt_at(mut self, position_ms: i64) -> Self {
        self.halt_at = Some(position_ms);
        self
    }

    /// Metadata reported by `Opened`/`Ready` notifications
    pub fn info(&self) -> MediaInfo {
        MediaInfo {
            duration: self.duration,
            video_size: self.video_size,
            audio_tracks: self.audio_tracks.clone(),
            text_tracks: self.text_tracks.clone(),
        }
    }
}
