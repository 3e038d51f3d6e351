//! Per-event callback registry
//!
//! [`EventHandlers`] is an [`EventSink`] with one optional slot per event
//! kind. Unset slots make delivery a safe no-op, so hosts register only what
//! they care about. The registry also derives a `recording_created`
//! convenience callback: fired once per distinct output path when a
//! recording finishes with one.

use crate::events::{
    BufferingInfo, EventRecord, PausedInfo, PlayerEvent, PlayingInfo, ProgressInfo,
    RecordingState, SnapshotResult,
};
use crate::sink::EventSink;
use crate::types::MediaInfo;
use std::sync::Mutex;
use tracing::trace;

type Callback0 = Box<dyn Fn() + Send + Sync>;
type Callback<T> = Box<dyn Fn(&T) + Send + Sync>;
type StrCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Optional per-event callbacks
#[derive(Default)]
pub struct EventHandlers {
    on_load_start: Option<Callback0>,
    on_open: Option<Callback<MediaInfo>>,
    on_load: Option<Callback<MediaInfo>>,
    on_playing: Option<Callback<PlayingInfo>>,
    on_paused: Option<Callback<PausedInfo>>,
    on_stopped: Option<Callback0>,
    on_buffering: Option<Callback<BufferingInfo>>,
    on_progress: Option<Callback<ProgressInfo>>,
    on_ended: Option<Callback0>,
    on_error: Option<StrCallback>,
    on_recording_state: Option<Callback<RecordingState>>,
    on_snapshot: Option<Callback<SnapshotResult>>,
    on_recording_created: Option<StrCallback>,
    last_recording: Mutex<Option<String>>,
}

impl EventHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_load_start(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_load_start = Some(Box::new(f));
        self
    }

    pub fn on_open(mut self, f: impl Fn(&MediaInfo) + Send + Sync + 'static) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    pub fn on_load(mut self, f: impl Fn(&MediaInfo) + Send + Sync + 'static) -> Self {
        self.on_load = Some(Box::new(f));
        self
    }

    pub fn on_playing(mut self, f: impl Fn(&PlayingInfo) + Send + Sync + 'static) -> Self {
        self.on_playing = Some(Box::new(f));
        self
    }

    pub fn on_paused(mut self, f: impl Fn(&PausedInfo) + Send + Sync + 'static) -> Self {
        self.on_paused = Some(Box::new(f));
        self
    }

    pub fn on_stopped(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_stopped = Some(Box::new(f));
        self
    }

    pub fn on_buffering(mut self, f: impl Fn(&BufferingInfo) + Send + Sync + 'static) -> Self {
        self.on_buffering = Some(Box::new(f));
        self
    }

    pub fn on_progress(mut self, f: impl Fn(&ProgressInfo) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    pub fn on_ended(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_ended = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn on_recording_state(
        mut self,
        f: impl Fn(&RecordingState) + Send + Sync + 'static,
    ) -> Self {
        self.on_recording_state = Some(Box::new(f));
        self
    }

    pub fn on_snapshot(mut self, f: impl Fn(&SnapshotResult) + Send + Sync + 'static) -> Self {
        self.on_snapshot = Some(Box::new(f));
        self
    }

    /// Called once per distinct output path when a recording finishes
    pub fn on_recording_created(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_recording_created = Some(Box::new(f));
        self
    }

    /// Route one event to its registered handler, if any
    pub fn dispatch(&self, event: &PlayerEvent) {
        match event {
            PlayerEvent::LoadStart => {
                if let Some(f) = &self.on_load_start {
                    f();
                }
            }
            PlayerEvent::Open(info) => {
                if let Some(f) = &self.on_open {
                    f(info);
                }
            }
            PlayerEvent::Load(info) => {
                if let Some(f) = &self.on_load {
                    f(info);
                }
            }
            PlayerEvent::Playing(info) => {
                if let Some(f) = &self.on_playing {
                    f(info);
                }
            }
            PlayerEvent::Paused(info) => {
                if let Some(f) = &self.on_paused {
                    f(info);
                }
            }
            PlayerEvent::Stopped => {
                if let Some(f) = &self.on_stopped {
                    f();
                }
            }
            PlayerEvent::Buffering(info) => {
                if let Some(f) = &self.on_buffering {
                    f(info);
                }
            }
            PlayerEvent::Progress(info) => {
                if let Some(f) = &self.on_progress {
                    f(info);
                }
            }
            PlayerEvent::Ended => {
                if let Some(f) = &self.on_ended {
                    f();
                }
            }
            PlayerEvent::Error { message } => {
                if let Some(f) = &self.on_error {
                    f(message);
                }
            }
            PlayerEvent::RecordingState(state) => {
                if let Some(f) = &self.on_recording_state {
                    f(state);
                }
                self.notify_recording_created(state);
            }
            PlayerEvent::Snapshot(result) => {
                if let Some(f) = &self.on_snapshot {
                    f(result);
                }
            }
        }
    }

    fn notify_recording_created(&self, state: &RecordingState) {
        if state.active {
            return;
        }
        let Some(path) = &state.path else { return };
        let Ok(mut last) = self.last_recording.lock() else {
            return;
        };
        if last.as_deref() == Some(path.as_str()) {
            trace!(path = %path, "recording already reported");
            return;
        }
        *last = Some(path.clone());
        if let Some(f) = &self.on_recording_created {
            f(path);
        }
    }
}

impl EventSink for EventHandlers {
    fn deliver(&self, record: EventRecord) {
        self.dispatch(&record.event);
    }
}
