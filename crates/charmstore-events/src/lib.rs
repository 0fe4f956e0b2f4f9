mod event;
mod sink;

use std::sync::Arc;

pub use event::*;
pub use sink::*;

/// Unique identifier for a running listing.
pub type OperationId = u64;

/// Shared handle to an event sink.
pub type EventSinkHandle = Arc<dyn EventSink>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sink() {
        let sink = NullSink;
        sink.emit(StoreEvent::Log {
            level: LogLevel::Info,
            message: "test".to_string(),
        });
    }

    #[test]
    fn test_channel_sink() {
        let (sink, rx) = ChannelSink::new();
        sink.emit(StoreEvent::ListStarted {
            op_id: 1,
        });
        sink.emit(StoreEvent::ListStage {
            op_id: 1,
            stage: ListStage::Filtered {
                visible: 3,
            },
        });
        sink.emit(StoreEvent::ListComplete {
            op_id: 1,
            returned: 3,
            dropped: 0,
        });

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 3);

        assert!(matches!(&events[0], StoreEvent::ListStarted { op_id: 1 }));
        assert!(matches!(
            &events[1],
            StoreEvent::ListStage {
                stage: ListStage::Filtered { visible: 3 },
                ..
            }
        ));
        assert!(matches!(
            &events[2],
            StoreEvent::ListComplete {
                returned: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_channel_sink_receiver_dropped() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.emit(StoreEvent::Log {
            level: LogLevel::Info,
            message: "orphaned".to_string(),
        });
    }

    #[test]
    fn test_collector_sink() {
        let sink = CollectorSink::default();
        assert!(sink.is_empty());

        sink.emit(StoreEvent::ListStarted {
            op_id: 7,
        });
        sink.emit(StoreEvent::MetadataFailure {
            op_id: 7,
            entity_id: "cs:trusty/mysql-7".to_string(),
            error: "cannot open archive data for cs:trusty/mysql-7: blob not found".to_string(),
        });

        assert_eq!(sink.len(), 2);
        assert_eq!(
            sink.failures(),
            vec![
                "cannot retrieve metadata for cs:trusty/mysql-7: cannot open archive data for \
                 cs:trusty/mysql-7: blob not found"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_event_op_id() {
        let event = StoreEvent::ListStage {
            op_id: 42,
            stage: ListStage::Sorted,
        };
        assert_eq!(event.op_id(), Some(42));

        let log = StoreEvent::Log {
            level: LogLevel::Debug,
            message: "x".to_string(),
        };
        assert_eq!(log.op_id(), None);
    }

    #[test]
    fn test_event_sink_handle() {
        let collector = Arc::new(CollectorSink::default());
        let handle: EventSinkHandle = collector.clone();
        handle.emit(StoreEvent::ListStage {
            op_id: 1,
            stage: ListStage::Composing {
                total: 2,
            },
        });
        assert_eq!(collector.len(), 1);
        assert_eq!(
            collector.events()[0].to_string(),
            "list #1: composing metadata for 2 entities"
        );
    }
}
