//! Host delivery seams
//!
//! The bridge pushes events through an [`EventSink`]: the host's end of the
//! notification channel, bound at construction. Engine notifications arrive
//! on engine tasks; [`event_channel`] gives the host a single-producer/
//! single-consumer handoff so handlers run on the thread that drains the
//! receiver (typically the UI thread).

use crate::events::EventRecord;
use tokio::sync::mpsc;
use tracing::debug;

/// The host's notification channel
///
/// `deliver` is called from the bridge's pump task and must not block;
/// forward the record and return.
pub trait EventSink: Send + Sync + 'static {
    fn deliver(&self, record: EventRecord);
}

impl<F> EventSink for F
where
    F: Fn(EventRecord) + Send + Sync + 'static,
{
    fn deliver(&self, record: EventRecord) {
        self(record)
    }
}

/// Sink half of an event channel
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<EventRecord>,
}

impl EventSink for ChannelSink {
    fn deliver(&self, record: EventRecord) {
        if self.tx.send(record).is_err() {
            debug!("event receiver dropped, discarding event");
        }
    }
}

/// Create a sink/receiver pair for UI-thread marshaling
///
/// Hand the sink to [`VideoBridge::new`](crate::VideoBridge::new) and drain
/// the receiver wherever host handlers are allowed to run. The channel is
/// unbounded so delivery never blocks the pump.
pub fn event_channel() -> (ChannelSink, mpsc::UnboundedReceiver<EventRecord>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelSink { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::PlayerEvent;
    use crate::types::BridgeId;
    use chrono::Utc;

    fn record(sequence: u64) -> EventRecord {
        EventRecord {
            target: BridgeId::new(),
            sequence,
            timestamp: Utc::now(),
            event: PlayerEvent::Ended,
        }
    }

    #[tokio::test]
    async fn test_channel_sink_forwards_records() {
        let (sink, mut rx) = event_channel();
        sink.deliver(record(1));
        sink.deliver(record(2));

        assert_eq!(rx.recv().await.unwrap().sequence, 1);
        assert_eq!(rx.recv().await.unwrap().sequence, 2);
    }

    #[tokio::test]
    async fn test_delivery_after_receiver_dropped_is_a_noop() {
        let (sink, rx) = event_channel();
        drop(rx);
        sink.deliver(record(1));
    }

    #[test]
    fn test_closures_are_sinks() {
        let sink = |record: EventRecord| {
            assert_eq!(record.sequence, 9);
        };
        sink.deliver(record(9));
    }
}
