//! Playbridge Sim - scripted playback engine
//!
//! A deterministic [`PlaybackEngine`](playbridge_core::PlaybackEngine)
//! implementation for development and testing:
//! - media scripts describe metadata plus stall/error/halt points
//! - lifecycles replay on tokio time, so tests run under a paused clock
//! - recording and snapshot really write files, keeping failure paths honest
//!
//! Where a production deployment would bind a real decoder behind the
//! engine contract, this crate stands in with scripts:
//!
//! ```no_run
//! use playbridge_core::{event_channel, MediaSource, VideoBridge};
//! use playbridge_sim::{SimEngine, SimMedia};
//! use std::sync::Arc;
//!
//! # async fn demo() {
//! let engine = Arc::new(SimEngine::new());
//! engine.register("https://demo.local/clip.mp4", SimMedia::new(2_000));
//!
//! let (sink, mut events) = event_channel();
//! let bridge = VideoBridge::new(engine, sink);
//! bridge.open(MediaSource::new("https://demo.local/clip.mp4")).await;
//!
//! while let Some(record) = events.recv().await {
//!     println!("{}", record.event.kind());
//! }
//! # }
//! ```

pub mod engine;
pub mod media;

pub use engine::SimEngine;
pub use media::SimMedia;
