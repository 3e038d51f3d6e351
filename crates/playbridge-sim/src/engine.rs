//! The scripted engine
//!
//! [`SimEngine`] implements the playback contract without decoding anything:
//! a registered [`SimMedia`] script is replayed on a background task driven
//! by tokio time, so bridges above it see a faithful notification stream.
//! Recording and snapshot commands really touch the filesystem, which keeps
//! their failure paths genuine.

use crate::media::SimMedia;
use async_trait::async_trait;
use playbridge_core::{
    EngineNotification, EngineState, Error, MediaSource, PlaybackEngine, ResolvedSource, Result,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Internal fallback step when progress ticks are disabled
const DEFAULT_STEP: Duration = Duration::from_millis(250);

/// State shared between the engine facade, the driver task, and commands
struct SessionShared {
    tx: mpsc::Sender<EngineNotification>,
    muted: AtomicBool,
    state: Mutex<EngineState>,
    recording: Mutex<Option<String>>,
    media: SimMedia,
}

impl SessionShared {
    fn current_state(&self) -> EngineState {
        self.state.lock().map(|state| *state).unwrap_or(EngineState::Error)
    }

    /// True in states where decoded frames exist
    fn has_frames(&self) -> bool {
        matches!(
            self.current_state(),
            EngineState::Playing | EngineState::Paused | EngineState::Buffering
        )
    }
}

struct SimSession {
    driver: JoinHandle<()>,
    shared: Arc<SessionShared>,
}

/// Scripted playback engine
///
/// Register media scripts against their URIs, then hand the engine to a
/// bridge. Opening an unregistered URI fails the way an unreachable source
/// would.
pub struct SimEngine {
    catalog: Mutex<HashMap<String, SimMedia>>,
    session: Mutex<Option<SimSession>>,
}

impl SimEngine {
    pub fn new() -> Self {
        Self {
            catalog: Mutex::new(HashMap::new()),
            session: Mutex::new(None),
        }
    }

    /// Register a media script for `uri`
    ///
    /// The URI goes through the same resolution as a bridge source, so
    /// `/clips/a.mp4` and `file:///clips/a.mp4` name the same entry.
    pub fn register(&self, uri: impl Into<String>, media: SimMedia) {
        let uri = uri.into();
        let key = normalize(&uri);
        debug!(uri = %uri, key = %key, "media registered");
        if let Ok(mut catalog) = self.catalog.lock() {
            catalog.insert(key, media);
        }
    }

    fn shared(&self) -> Option<Arc<SessionShared>> {
        self.session
            .lock()
            .ok()
            .and_then(|slot| slot.as_ref().map(|session| session.shared.clone()))
    }
}

impl Default for SimEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(uri: &str) -> String {
    MediaSource::new(uri)
        .resolve(Duration::ZERO)
        .map(|resolved| resolved.url.to_string())
        .unwrap_or_else(|_| uri.to_string())
}

#[async_trait]
impl PlaybackEngine for SimEngine {
    async fn open(&self, source: ResolvedSource) -> Result<mpsc::Receiver<EngineNotification>> {
        let media = self
            .catalog
            .lock()
            .ok()
            .and_then(|catalog| catalog.get(source.url.as_str()).cloned())
            .ok_or_else(|| Error::OpenFailed(format!("no media registered for {}", source.url)))?;

        if let Some(message) = &media.open_error {
            return Err(Error::OpenFailed(message.clone()));
        }

        let (tx, rx) = mpsc::channel(64);
        let shared = Arc::new(SessionShared {
            tx,
            muted: AtomicBool::new(false),
            state: Mutex::new(EngineState::Opening),
            recording: Mutex::new(None),
            media,
        });

        let Ok(mut slot) = self.session.lock() else {
            return Err(Error::OpenFailed("session state poisoned".to_string()));
        };
        if slot.is_some() {
            return Err(Error::SessionActive);
        }
        info!(url = %source.url, network = source.is_network, "session opened");
        let driver = tokio::spawn(drive(shared.clone(), source));
        *slot = Some(SimSession { driver, shared });
        Ok(rx)
    }

    async fn close(&self) {
        let session = self.session.lock().ok().and_then(|mut slot| slot.take());
        if let Some(session) = session {
            session.driver.abort();
            debug!("session released");
        }
    }

    async fn set_muted(&self, muted: bool) {
        if let Some(shared) = self.shared() {
            shared.muted.store(muted, Ordering::Relaxed);
            debug!(muted, "audio mute updated");
        }
    }

    async fn start_recording(&self, path: &str) {
        let Some(shared) = self.shared() else { return };

        let failure = EngineNotification::RecordingChanged {
            active: false,
            path: Some(path.to_string()),
            success: false,
        };

        if !shared.has_frames() {
            warn!(state = %shared.current_state(), path, "cannot record in current state");
            let _ = send(&shared, failure).await;
            return;
        }
        let already_recording = shared
            .recording
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(true);
        if already_recording {
            warn!(path, "recording already active");
            let _ = send(&shared, failure).await;
            return;
        }

        match tokio::fs::write(path, b"").await {
            Ok(()) => {
                if let Ok(mut slot) = shared.recording.lock() {
                    *slot = Some(path.to_string());
                }
                info!(path, "recording started");
                let _ = send(
                    &shared,
                    EngineNotification::RecordingChanged {
                        active: true,
                        path: Some(path.to_string()),
                        success: true,
                    },
                )
                .await;
            }
            Err(e) => {
                warn!(path, error = %e, "recording destination not writable");
                let _ = send(&shared, failure).await;
            }
        }
    }

    async fn stop_recording(&self) {
        let Some(shared) = self.shared() else { return };
        let path = shared.recording.lock().ok().and_then(|mut slot| slot.take());
        match path {
            Some(path) => {
                info!(path = %path, "recording stopped");
                let _ = send(
                    &shared,
                    EngineNotification::RecordingChanged {
                        active: false,
                        path: Some(path),
                        success: true,
                    },
                )
                .await;
            }
            None => debug!("stop_recording with no active recording"),
        }
    }

    async fn snapshot(&self, path: &str) {
        let Some(shared) = self.shared() else { return };

        if !shared.has_frames() {
            let _ = send(
                &shared,
                EngineNotification::SnapshotTaken {
                    path: path.to_string(),
                    success: false,
                    error: Some(format!(
                        "no frame available while {}",
                        shared.current_state()
                    )),
                },
            )
            .await;
            return;
        }

        let frame = format!("simframe {}\n", shared.media.video_size);
        let taken = match tokio::fs::write(path, frame).await {
            Ok(()) => EngineNotification::SnapshotTaken {
                path: path.to_string(),
                success: true,
                error: None,
            },
            Err(e) => EngineNotification::SnapshotTaken {
                path: path.to_string(),
                success: false,
                error: Some(e.to_string()),
            },
        };
        let _ = send(&shared, taken).await;
    }
}

async fn send(shared: &SessionShared, notification: EngineNotification) -> bool {
    shared.tx.send(notification).await.is_ok()
}

fn set_state(shared: &SessionShared, next: EngineState) {
    if let Ok(mut state) = shared.state.lock() {
        if !state.can_transition_to(next) {
            warn!(from = %*state, to = %next, "unexpected engine state transition");
        }
        *state = next;
    }
}

/// Emit any pending terminal recording notification
async fn finalize_recording(shared: &SessionShared) {
    let path = shared.recording.lock().ok().and_then(|mut slot| slot.take());
    if let Some(path) = path {
        info!(path = %path, "recording finalized");
        let _ = send(
            shared,
            EngineNotification::RecordingChanged {
                active: false,
                path: Some(path),
                success: true,
            },
        )
        .await;
    }
}

/// Replay one media script to its terminal state
async fn drive(shared: Arc<SessionShared>, source: ResolvedSource) {
    let media = shared.media.clone();
    let info = media.info();
    let duration = media.duration;

    set_state(&shared, EngineState::Opened);
    if !send(&shared, EngineNotification::Opened { info: info.clone() }).await {
        return;
    }
    set_state(&shared, EngineState::Ready);
    if !send(&shared, EngineNotification::Ready { info }).await {
        return;
    }

    if !source.autoplay {
        debug!("autoplay off, holding in ready state");
        return;
    }

    let emit_ticks = !source.progress_interval.is_zero();
    let step = if emit_ticks {
        source.progress_interval
    } else {
        DEFAULT_STEP
    };
    let step_ms = step.as_millis() as i64;

    set_state(&shared, EngineState::Playing);
    if !send(
        &shared,
        EngineNotification::Playing {
            seekable: true,
            current_time: 0,
            duration,
        },
    )
    .await
    {
        return;
    }

    let mut position: i64 = 0;
    let mut stalled = false;
    loop {
        tokio::time::sleep(step).await;
        position += step_ms;

        if let Some((at, message)) = &media.error_at {
            if position >= *at {
                finalize_recording(&shared).await;
                set_state(&shared, EngineState::Error);
                let _ = send(
                    &shared,
                    EngineNotification::EncounteredError {
                        message: message.clone(),
                    },
                )
                .await;
                return;
            }
        }

        if let Some(at) = media.halt_at {
            if position >= at {
                finalize_recording(&shared).await;
                set_state(&shared, EngineState::Stopped);
                let _ = send(&shared, EngineNotification::Stopped).await;
                return;
            }
        }

        if let Some(at) = media.stall_at {
            if !stalled && position >= at {
                stalled = true;
                set_state(&shared, EngineState::Buffering);
                if !send(&shared, EngineNotification::Buffering { buffer_rate: 0.0 }).await {
                    return;
                }
                tokio::time::sleep(step).await;
                set_state(&shared, EngineState::Playing);
                if !send(
                    &shared,
                    EngineNotification::Playing {
                        seekable: true,
                        current_time: position,
                        duration,
                    },
                )
                .await
                {
                    return;
                }
                continue;
            }
        }

        if position >= duration {
            if source.repeats() {
                position = 0;
                if emit_ticks
                    && !send(
                        &shared,
                        EngineNotification::TimeChanged {
                            current_time: 0,
                            duration,
                        },
                    )
                    .await
                {
                    return;
                }
                continue;
            }
            finalize_recording(&shared).await;
            set_state(&shared, EngineState::Ended);
            let _ = send(&shared, EngineNotification::EndReached).await;
            return;
        }

        if emit_ticks
            && !send(
                &shared,
                EngineNotification::TimeChanged {
                    current_time: position,
                    duration,
                },
            )
            .await
        {
            return;
        }
    }
}
