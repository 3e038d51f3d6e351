//! Integration tests over the scripted engine
//!
//! The bridge and the engine run together here. Timing-driven lifecycles
//! replay under a paused tokio clock so they finish instantly and
//! deterministically; recording and snapshot tests run on the real clock
//! because they touch the filesystem.

use playbridge_core::{
    event_channel, BridgeConfig, EventKind, EventRecord, MediaSource, PlayerEvent, VideoBridge,
};
use playbridge_sim::{SimEngine, SimMedia};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

// =============================================================================
// Helpers
// =============================================================================

const CLIP: &str = "https://demo.local/clip.mp4";

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("playbridge-sim-{}-{}", uuid::Uuid::new_v4(), name))
}

fn bridge_over(media: SimMedia) -> (VideoBridge, mpsc::UnboundedReceiver<EventRecord>) {
    bridge_with_config(media, BridgeConfig::default())
}

/// A bridge with progress ticks disabled, for tests that want a stream free
/// of interleaved ticks
fn quiet_bridge(media: SimMedia) -> (VideoBridge, mpsc::UnboundedReceiver<EventRecord>) {
    bridge_with_config(
        media,
        BridgeConfig {
            progress_interval: Duration::ZERO,
            ..BridgeConfig::default()
        },
    )
}

fn bridge_with_config(
    media: SimMedia,
    config: BridgeConfig,
) -> (VideoBridge, mpsc::UnboundedReceiver<EventRecord>) {
    let engine = Arc::new(SimEngine::new());
    engine.register(CLIP, media);
    let (sink, rx) = event_channel();
    (VideoBridge::with_config(engine, sink, config), rx)
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<EventRecord>) -> PlayerEvent {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
        .event
}

async fn wait_for(rx: &mut mpsc::UnboundedReceiver<EventRecord>, kind: EventKind) -> PlayerEvent {
    for _ in 0..64 {
        let event = next_event(rx).await;
        if event.kind() == kind {
            return event;
        }
    }
    panic!("never saw {}", kind);
}

async fn assert_quiet(rx: &mut mpsc::UnboundedReceiver<EventRecord>) {
    tokio::time::sleep(Duration::from_millis(50)).await;
    match rx.try_recv() {
        Err(_) => {}
        Ok(record) => panic!("unexpected event: {:?}", record.event),
    }
}

async fn collect_until(
    rx: &mut mpsc::UnboundedReceiver<EventRecord>,
    terminal: EventKind,
) -> Vec<PlayerEvent> {
    let mut events = Vec::new();
    loop {
        let event = next_event(rx).await;
        let done = event.kind() == terminal;
        events.push(event);
        if done {
            return events;
        }
    }
}

fn kinds(events: &[PlayerEvent]) -> Vec<EventKind> {
    events.iter().map(PlayerEvent::kind).collect()
}

// =============================================================================
// Lifecycle ordering
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_full_lifecycle_order() {
    let (bridge, mut rx) = bridge_over(SimMedia::new(1_000));
    bridge.open(MediaSource::new(CLIP)).await;

    let events = collect_until(&mut rx, EventKind::Ended).await;
    assert_eq!(
        kinds(&events),
        vec![
            EventKind::LoadStart,
            EventKind::Open,
            EventKind::Load,
            EventKind::Playing,
            EventKind::Progress,
            EventKind::Progress,
            EventKind::Progress,
            EventKind::Ended,
        ]
    );

    // First tick payload
    match &events[4] {
        PlayerEvent::Progress(progress) => {
            assert_eq!(progress.current_time, 250);
            assert_eq!(progress.remaining_time, 750);
            assert_eq!(progress.duration, 1_000);
        }
        other => panic!("expected progress, got {:?}", other),
    }

    bridge.close().await;
    assert_quiet(&mut rx).await;
}

#[tokio::test(start_paused = true)]
async fn test_stall_emits_buffering_then_resumes() {
    let (bridge, mut rx) = bridge_over(SimMedia::new(1_000).with_stall_at(400));
    bridge.open(MediaSource::new(CLIP)).await;

    let events = collect_until(&mut rx, EventKind::Ended).await;
    assert_eq!(
        kinds(&events),
        vec![
            EventKind::LoadStart,
            EventKind::Open,
            EventKind::Load,
            EventKind::Playing,
            EventKind::Progress,
            EventKind::Buffering,
            EventKind::Playing,
            EventKind::Progress,
            EventKind::Ended,
        ]
    );
    bridge.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_zero_interval_disables_progress_ticks() {
    let (bridge, mut rx) = quiet_bridge(SimMedia::new(1_000));
    bridge.open(MediaSource::new(CLIP)).await;

    let events = collect_until(&mut rx, EventKind::Ended).await;
    assert_eq!(
        kinds(&events),
        vec![
            EventKind::LoadStart,
            EventKind::Open,
            EventKind::Load,
            EventKind::Playing,
            EventKind::Ended,
        ]
    );
    bridge.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_load_carries_media_metadata() {
    let media = SimMedia::new(2_000)
        .with_video_size(1280, 720)
        .with_audio_track(playbridge_core::Track::new(1, "eng"));
    let (bridge, mut rx) = quiet_bridge(media);
    bridge.open(MediaSource::new(CLIP)).await;

    match wait_for(&mut rx, EventKind::Load).await {
        PlayerEvent::Load(info) => {
            assert_eq!(info.duration, 2_000);
            assert_eq!(info.video_size.width, 1280);
            assert_eq!(info.audio_tracks[0].name, "eng");
        }
        other => panic!("expected load, got {:?}", other),
    }
    bridge.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_halt_surfaces_as_stopped() {
    let (bridge, mut rx) = bridge_over(SimMedia::new(1_000).with_halt_at(500));
    bridge.open(MediaSource::new(CLIP)).await;

    let events = collect_until(&mut rx, EventKind::Stopped).await;
    assert_eq!(
        kinds(&events),
        vec![
            EventKind::LoadStart,
            EventKind::Open,
            EventKind::Load,
            EventKind::Playing,
            EventKind::Progress,
            EventKind::Stopped,
        ]
    );
    bridge.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_midstream_error_surfaces_as_error() {
    let (bridge, mut rx) = bridge_over(SimMedia::new(1_000).with_error_at(500, "demux error"));
    bridge.open(MediaSource::new(CLIP)).await;

    let events = collect_until(&mut rx, EventKind::Error).await;
    assert_eq!(events.last().map(PlayerEvent::kind), Some(EventKind::Error));
    match events.last() {
        Some(PlayerEvent::Error { message }) => assert_eq!(message, "demux error"),
        other => panic!("expected error, got {:?}", other),
    }
    bridge.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_repeat_loops_without_ending() {
    let (bridge, mut rx) =
        bridge_over(SimMedia::new(500));
    bridge
        .open(MediaSource::new(CLIP).with_repeat(true))
        .await;

    // Two full passes worth of events, none of them Ended
    for _ in 0..8 {
        let event = next_event(&mut rx).await;
        assert_ne!(event.kind(), EventKind::Ended);
    }
    bridge.close().await;
    assert_quiet(&mut rx).await;
}

// =============================================================================
// Open failures
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_failing_source_yields_load_start_then_error() {
    let (bridge, mut rx) = bridge_over(SimMedia::failing("corrupt header"));
    bridge.open(MediaSource::new(CLIP)).await;

    assert_eq!(next_event(&mut rx).await.kind(), EventKind::LoadStart);
    match next_event(&mut rx).await {
        PlayerEvent::Error { message } => assert!(message.contains("corrupt header")),
        other => panic!("expected error, got {:?}", other),
    }
    assert_quiet(&mut rx).await;
}

#[tokio::test(start_paused = true)]
async fn test_unregistered_uri_yields_load_start_then_error() {
    let engine = Arc::new(SimEngine::new());
    let (sink, mut rx) = event_channel();
    let bridge = VideoBridge::new(engine, sink);

    bridge.open(MediaSource::new("https://demo.local/missing.mp4")).await;

    assert_eq!(next_event(&mut rx).await.kind(), EventKind::LoadStart);
    assert_eq!(next_event(&mut rx).await.kind(), EventKind::Error);
}

// =============================================================================
// Recording
// =============================================================================

// Recording and snapshot hit the real filesystem, so these run on the real
// clock: a paused clock would let the scripted timeline race ahead of the
// blocking write.

#[tokio::test]
async fn test_recording_writes_file_and_reports_both_edges() {
    let destination = temp_path("out.mp4");
    let (bridge, mut rx) = quiet_bridge(SimMedia::new(5_000));
    bridge.open(MediaSource::new(CLIP)).await;
    wait_for(&mut rx, EventKind::Playing).await;

    bridge.start_recording(destination.to_string_lossy()).await;
    match wait_for(&mut rx, EventKind::RecordingState).await {
        PlayerEvent::RecordingState(state) => {
            assert!(state.active);
            assert!(state.success);
        }
        other => panic!("expected recording_state, got {:?}", other),
    }
    assert!(destination.exists(), "recording file must exist");

    bridge.stop_recording().await;
    match wait_for(&mut rx, EventKind::RecordingState).await {
        PlayerEvent::RecordingState(state) => {
            assert!(!state.active);
            assert!(state.success);
            assert_eq!(
                state.path.as_deref(),
                Some(destination.to_string_lossy().as_ref())
            );
        }
        other => panic!("expected recording_state, got {:?}", other),
    }

    bridge.close().await;
    let _ = std::fs::remove_file(&destination);
}

#[tokio::test]
async fn test_recording_to_unwritable_path_fails_once() {
    let destination = "/playbridge-missing-dir/out.mp4";
    let (bridge, mut rx) = quiet_bridge(SimMedia::new(5_000));
    bridge.open(MediaSource::new(CLIP)).await;
    wait_for(&mut rx, EventKind::Playing).await;

    bridge.start_recording(destination).await;
    match wait_for(&mut rx, EventKind::RecordingState).await {
        PlayerEvent::RecordingState(state) => {
            assert!(!state.active);
            assert!(!state.success);
            assert_eq!(state.path.as_deref(), Some(destination));
        }
        other => panic!("expected recording_state, got {:?}", other),
    }
    assert_quiet(&mut rx).await;
    bridge.close().await;
}

#[tokio::test]
async fn test_recording_is_finalized_when_playback_ends() {
    let destination = temp_path("tail.mp4");
    let (bridge, mut rx) = quiet_bridge(SimMedia::new(1_000));
    bridge.open(MediaSource::new(CLIP)).await;
    wait_for(&mut rx, EventKind::Playing).await;

    bridge.start_recording(destination.to_string_lossy()).await;
    wait_for(&mut rx, EventKind::RecordingState).await;

    // Playback runs out; the recording must close before the end event
    let event = next_event(&mut rx).await;
    match event {
        PlayerEvent::RecordingState(state) => {
            assert!(!state.active);
            assert!(state.success);
        }
        other => panic!("expected terminal recording_state before ended, got {:?}", other),
    }
    assert_eq!(next_event(&mut rx).await.kind(), EventKind::Ended);

    bridge.close().await;
    let _ = std::fs::remove_file(&destination);
}

// =============================================================================
// Snapshot
// =============================================================================

#[tokio::test]
async fn test_snapshot_writes_frame_file() {
    let destination = temp_path("frame.png");
    let (bridge, mut rx) = quiet_bridge(SimMedia::new(5_000).with_video_size(640, 360));
    bridge.open(MediaSource::new(CLIP)).await;
    wait_for(&mut rx, EventKind::Playing).await;

    bridge.snapshot(destination.to_string_lossy()).await;
    match wait_for(&mut rx, EventKind::Snapshot).await {
        PlayerEvent::Snapshot(result) => {
            assert!(result.success);
            assert!(result.error.is_none());
        }
        other => panic!("expected snapshot, got {:?}", other),
    }

    let contents = std::fs::read_to_string(&destination).unwrap();
    assert!(contents.starts_with("simframe 640x360"));

    bridge.close().await;
    let _ = std::fs::remove_file(&destination);
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_before_playback_fails() {
    let destination = temp_path("early.png");
    let (bridge, mut rx) = quiet_bridge(SimMedia::new(60_000));
    bridge
        .open(MediaSource::new(CLIP).with_autoplay(false))
        .await;
    wait_for(&mut rx, EventKind::Load).await;

    bridge.snapshot(destination.to_string_lossy()).await;
    match wait_for(&mut rx, EventKind::Snapshot).await {
        PlayerEvent::Snapshot(result) => {
            assert!(!result.success);
            assert!(result.error.is_some());
        }
        other => panic!("expected snapshot, got {:?}", other),
    }
    assert!(!destination.exists());
    bridge.close().await;
}

// =============================================================================
// Teardown and mute
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_close_mid_playback_suppresses_events() {
    let (bridge, mut rx) = bridge_over(SimMedia::new(60_000));
    bridge.open(MediaSource::new(CLIP)).await;
    wait_for(&mut rx, EventKind::Playing).await;

    bridge.close().await;
    assert_quiet(&mut rx).await;
}

#[tokio::test(start_paused = true)]
async fn test_mute_toggle_is_invisible_in_event_stream() {
    let (bridge, mut rx) = quiet_bridge(SimMedia::new(60_000));
    bridge.open(MediaSource::new(CLIP)).await;
    wait_for(&mut rx, EventKind::Playing).await;

    bridge.set_muted(true).await;
    bridge.set_muted(false).await;

    assert_quiet(&mut rx).await;
    bridge.close().await;
}
