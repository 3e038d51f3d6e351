//! Playbridge Core - embeddable video-player bridge
//!
//! This crate provides the bridging layer between an opaque media playback
//! engine and a host UI:
//! - a playback engine contract (trait + notification vocabulary)
//! - one-to-one translation of engine notifications into lifecycle events
//! - host delivery seams (sink trait, channel handoff, callback registry)
//! - control operations (mute, recording, snapshot) with event-based outcomes
//! - race-free teardown
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        Host UI                             │
//! │        EventSink / event_channel / EventHandlers           │
//! └──────────────────────────▲─────────────────────────────────┘
//!                            │ PlayerEvent (12 kinds)
//! ┌──────────────────────────┴─────────────────────────────────┐
//! │                       VideoBridge                          │
//! │   open / set_muted / start_recording / stop_recording /    │
//! │   snapshot / close        pump + delivery gate             │
//! └──────────────────────────▲─────────────────────────────────┘
//!                            │ EngineNotification
//! ┌──────────────────────────┴─────────────────────────────────┐
//! │              PlaybackEngine (opaque binding)               │
//! │          decode / render / record / snapshot               │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The bridge is a pure observer/translator: it never suppresses, reorders,
//! or coalesces what the engine reports, and engine failures reach the host
//! as `error` events rather than returned errors.

pub mod bridge;
pub mod engine;
pub mod error;
pub mod events;
pub mod handlers;
pub mod sink;
pub mod source;
pub mod types;

pub use bridge::{BridgeConfig, VideoBridge};
pub use engine::{EngineNotification, PlaybackEngine};
pub use error::{Error, Result};
pub use events::{
    BufferingInfo, EventKind, EventRecord, PausedInfo, PlayerEvent, PlayingInfo, ProgressInfo,
    RecordingState, SnapshotResult,
};
pub use handlers::EventHandlers;
pub use sink::{event_channel, ChannelSink, EventSink};
pub use source::{MediaSource, ResolvedSource};
pub use types::{BridgeId, Dimensions, EngineState, MediaInfo, Track};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the bridge library with default configuration
pub fn init() {
    tracing::info!(version = VERSION, "Playbridge Core initialized");
}
