//! The bridge component
//!
//! [`VideoBridge`] owns one playback engine, subscribes to its session
//! notifications, translates each into exactly one outbound event, and
//! delivers it through the host sink bound at construction. It performs no
//! playback logic of its own: no suppression, no reordering, no coalescing.
//!
//! Teardown invariant: once `close` (or drop) begins, no further event is
//! delivered, even if the engine keeps firing. Delivery and shutdown
//! synchronize on the same gate lock, so an in-flight delivery finishes
//! before the gate reports shut and nothing starts after.

use crate::engine::{EngineNotification, PlaybackEngine};
use crate::events::{EventRecord, PlayerEvent, RecordingState, SnapshotResult};
use crate::sink::EventSink;
use crate::source::MediaSource;
use crate::types::BridgeId;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Bridge configuration
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Tick period for `progress` events; zero disables ticks
    pub progress_interval: Duration,
    /// Initial audio mute state
    pub muted: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            progress_interval: Duration::from_millis(250),
            muted: false,
        }
    }
}

/// Delivery gate: the synchronization point between event delivery and
/// teardown. Sequencing and the open/shut flag live under one lock.
struct DeliveryGate {
    inner: Mutex<GateInner>,
}

struct GateInner {
    open: bool,
    sequence: u64,
}

impl DeliveryGate {
    fn new() -> Self {
        Self {
            inner: Mutex::new(GateInner {
                open: true,
                sequence: 0,
            }),
        }
    }

    /// Deliver one event while holding the gate; false when shut
    fn deliver(&self, target: BridgeId, sink: &dyn EventSink, event: PlayerEvent) -> bool {
        let Ok(mut gate) = self.inner.lock() else {
            return false;
        };
        if !gate.open {
            return false;
        }
        gate.sequence += 1;
        let record = EventRecord {
            target,
            sequence: gate.sequence,
            timestamp: Utc::now(),
            event,
        };
        debug!(bridge = %target, sequence = record.sequence, event = %record.event.kind(), "delivering event");
        sink.deliver(record);
        true
    }

    fn shut(&self) {
        if let Ok(mut gate) = self.inner.lock() {
            gate.open = false;
        }
    }

    fn is_open(&self) -> bool {
        self.inner.lock().map(|gate| gate.open).unwrap_or(false)
    }
}

/// State shared between the bridge and its pump task
struct Shared {
    id: BridgeId,
    sink: Box<dyn EventSink>,
    gate: DeliveryGate,
}

impl Shared {
    fn emit(&self, event: PlayerEvent) -> bool {
        self.gate.deliver(self.id, self.sink.as_ref(), event)
    }
}

struct SessionHandle {
    pump: JoinHandle<()>,
}

/// Embeddable video-player bridge
///
/// One instance per UI placement. Construction binds the bridge to its host
/// sink; there is no other construction path, so every instance has a valid
/// channel before any playback begins.
pub struct VideoBridge {
    shared: Arc<Shared>,
    engine: Arc<dyn PlaybackEngine>,
    config: BridgeConfig,
    muted: AtomicBool,
    session: Mutex<Option<SessionHandle>>,
    /// Serializes open/close so no two opens overlap on the engine
    lifecycle: tokio::sync::Mutex<()>,
}

impl VideoBridge {
    /// Create a bridge owning `engine`, delivering events through `sink`
    pub fn new(engine: Arc<dyn PlaybackEngine>, sink: impl EventSink) -> Self {
        Self::with_config(engine, sink, BridgeConfig::default())
    }

    /// Create a bridge with explicit configuration
    pub fn with_config(
        engine: Arc<dyn PlaybackEngine>,
        sink: impl EventSink,
        config: BridgeConfig,
    ) -> Self {
        let id = BridgeId::new();
        info!(bridge = %id, "bridge created");
        Self {
            shared: Arc::new(Shared {
                id,
                sink: Box::new(sink),
                gate: DeliveryGate::new(),
            }),
            engine,
            muted: AtomicBool::new(config.muted),
            config,
            session: Mutex::new(None),
            lifecycle: tokio::sync::Mutex::new(()),
        }
    }

    /// This bridge's id, carried on every delivered event
    pub fn id(&self) -> BridgeId {
        self.shared.id
    }

    /// Current audio mute state
    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }

    /// True once teardown has begun
    pub fn is_closed(&self) -> bool {
        !self.shared.gate.is_open()
    }

    /// Open a media source
    ///
    /// Emits `load_start` immediately, then hands the source to the engine.
    /// A source or engine failure surfaces as an `error` event, never as a
    /// returned error. An active session is torn down first; its remaining
    /// notifications are suppressed so they cannot interleave with the new
    /// session's stream.
    pub async fn open(&self, source: MediaSource) {
        let _lifecycle = self.lifecycle.lock().await;
        if !self.shared.gate.is_open() {
            warn!(bridge = %self.shared.id, "open on a closed bridge ignored");
            return;
        }
        self.stop_session().await;

        info!(bridge = %self.shared.id, uri = %source.uri, "opening media source");
        self.shared.emit(PlayerEvent::LoadStart);

        let resolved = match source.resolve(self.config.progress_interval) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(bridge = %self.shared.id, code = e.error_code(), error = %e, "source rejected");
                self.shared.emit(PlayerEvent::Error {
                    message: e.to_string(),
                });
                return;
            }
        };

        match self.engine.open(resolved).await {
            Ok(notifications) => {
                self.engine.set_muted(self.is_muted()).await;
                let pump = spawn_pump(self.shared.clone(), notifications);
                if let Ok(mut session) = self.session.lock() {
                    *session = Some(SessionHandle { pump });
                }
            }
            Err(e) => {
                warn!(bridge = %self.shared.id, code = e.error_code(), error = %e, "engine failed to open source");
                self.shared.emit(PlayerEvent::Error {
                    message: e.to_string(),
                });
            }
        }
    }

    /// Set output audio mute state
    ///
    /// Applied to the engine immediately when a session is active, and
    /// remembered for the next open otherwise. Never produces events.
    pub async fn set_muted(&self, value: bool) {
        self.muted.store(value, Ordering::Relaxed);
        if self.session_active() {
            self.engine.set_muted(value).await;
        }
    }

    /// Request the engine begin recording to `path`
    ///
    /// The outcome arrives as a `recording_state` event. With no active
    /// session the failure event is delivered immediately.
    pub async fn start_recording(&self, path: impl Into<String>) {
        let path = path.into();
        if self.session_active() {
            self.engine.start_recording(&path).await;
        } else {
            debug!(bridge = %self.shared.id, path = %path, "start_recording with no active session");
            self.shared.emit(PlayerEvent::RecordingState(RecordingState {
                active: false,
                path: Some(path),
                success: false,
            }));
        }
    }

    /// Request an active recording stop
    ///
    /// With no active session this is a silent no-op: the terminal
    /// `recording_state` contract belongs to `start_recording`, and there is
    /// nothing to terminate here.
    pub async fn stop_recording(&self) {
        if self.session_active() {
            self.engine.stop_recording().await;
        } else {
            debug!(bridge = %self.shared.id, "stop_recording with no active session is a no-op");
        }
    }

    /// Request a single-frame capture to `path`
    ///
    /// The outcome arrives as a `snapshot` event. With no active session the
    /// failure event is delivered immediately.
    pub async fn snapshot(&self, path: impl Into<String>) {
        let path = path.into();
        if self.session_active() {
            self.engine.snapshot(&path).await;
        } else {
            debug!(bridge = %self.shared.id, path = %path, "snapshot with no active session");
            self.shared.emit(PlayerEvent::Snapshot(SnapshotResult {
                path,
                success: false,
                error: Some("no active playback session".to_string()),
            }));
        }
    }

    /// Tear the bridge down
    ///
    /// Shuts the delivery gate first (no event is delivered once this call
    /// begins), then stops the pump and releases the engine. The bridge
    /// cannot be reused afterwards.
    pub async fn close(&self) {
        info!(bridge = %self.shared.id, "closing bridge");
        self.shared.gate.shut();
        let _lifecycle = self.lifecycle.lock().await;
        self.stop_session().await;
    }

    fn session_active(&self) -> bool {
        self.session
            .lock()
            .map(|session| {
                session
                    .as_ref()
                    .map(|handle| !handle.pump.is_finished())
                    .unwrap_or(false)
            })
            .unwrap_or(false)
    }

    async fn stop_session(&self) {
        let handle = self.session.lock().ok().and_then(|mut slot| slot.take());
        if let Some(session) = handle {
            session.pump.abort();
            self.engine.close().await;
            debug!(bridge = %self.shared.id, "session stopped");
        }
    }
}

impl Drop for VideoBridge {
    fn drop(&mut self) {
        self.shared.gate.shut();
        let handle = self.session.get_mut().ok().and_then(|slot| slot.take());
        if let Some(session) = handle {
            session.pump.abort();
            let engine = Arc::clone(&self.engine);
            // Engine release needs an async context; best-effort outside one.
            if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                runtime.spawn(async move { engine.close().await });
            }
        }
    }
}

/// Forward engine notifications to the host until the stream ends or the
/// gate shuts
fn spawn_pump(
    shared: Arc<Shared>,
    mut notifications: mpsc::Receiver<EngineNotification>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(notification) = notifications.recv().await {
            if !shared.emit(PlayerEvent::from(notification)) {
                break;
            }
        }
        debug!(bridge = %shared.id, "notification pump finished");
    })
}
