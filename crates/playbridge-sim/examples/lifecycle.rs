//! Full lifecycle demo over the scripted engine
//!
//! Registers a two-second clip, opens it through a bridge, and logs every
//! lifecycle callback until playback ends.
//!
//! Run with: cargo run -p playbridge-sim --example lifecycle

use anyhow::Result;
use playbridge_core::{EventHandlers, MediaSource, Track, VideoBridge};
use playbridge_sim::{SimEngine, SimMedia};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let engine = Arc::new(SimEngine::new());
    engine.register(
        "https://demo.local/clip.mp4",
        SimMedia::new(2_000)
            .with_video_size(1280, 720)
            .with_audio_track(Track::new(1, "English")),
    );

    let done = Arc::new(Notify::new());
    let finished = done.clone();
    let handlers = EventHandlers::new()
        .on_load_start(|| info!("loading"))
        .on_load(|media| {
            info!(
                duration_ms = media.duration,
                size = %media.video_size,
                "media ready"
            )
        })
        .on_playing(|playing| info!(seekable = playing.seekable, "playing"))
        .on_progress(|progress| {
            info!(
                current_ms = progress.current_time,
                remaining_ms = progress.remaining_time,
                "progress"
            )
        })
        .on_error(|message| warn!(message, "playback error"))
        .on_ended(move || {
            info!("playback finished");
            finished.notify_one();
        });

    let bridge = VideoBridge::new(engine, handlers);
    bridge
        .open(MediaSource::new("https://demo.local/clip.mp4"))
        .await;

    done.notified().await;
    bridge.close().await;
    Ok(())
}
