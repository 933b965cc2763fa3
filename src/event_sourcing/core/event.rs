use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use anyhow::Result;

// ============================================================================
// Event Envelope - Event Metadata
// ============================================================================
//
// Wraps drained domain events with the metadata needed to publish them.
// Generic over the event payload.
//
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EventEnvelope<E> {
    // Event Identity
    pub event_id: Uuid,
    pub aggregate_id: Uuid,
    pub sequence_number: i64,

    // Event Type Information
    pub event_type: String,
    pub event_version: i32,

    // Event Payload
    pub event_data: E,

    // Correlation (one dispatch or one scheduler tick)
    pub correlation_id: Uuid,

    pub timestamp: DateTime<Utc>,

    pub metadata: HashMap<String, String>,
}

impl<E: DomainEvent> EventEnvelope<E> {
    pub fn new(
        aggregate_id: Uuid,
        sequence_number: i64,
        event_data: E,
        correlation_id: Uuid,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            aggregate_id,
            sequence_number,
            event_type: event_data.event_type().to_string(),
            event_version: event_data.event_version(),
            event_data,
            correlation_id,
            timestamp: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// Wrap a batch drained from an aggregate whose version is `version`
    /// after recording the batch.
    pub fn wrap_all(
        aggregate_id: Uuid,
        version: i64,
        events: Vec<E>,
        correlation_id: Uuid,
    ) -> Vec<Self> {
        let first = version - events.len() as i64 + 1;
        events
            .into_iter()
            .enumerate()
            .map(|(i, event)| Self::new(aggregate_id, first + i as i64, event, correlation_id))
            .collect()
    }

    pub fn with_metadata(mut self, key: String, value: String) -> Self {
        self.metadata.insert(key, value);
        self
    }
}

// ============================================================================
// Domain Event Trait
// ============================================================================

pub trait DomainEvent: Serialize + DeserializeOwned + Clone + Send + Sync {
    fn event_type(&self) -> &'static str;
    fn event_version(&self) -> i32 { 1 }
}

pub fn serialize_event<E: Serialize>(event: &E) -> Result<String> {
    Ok(serde_json::to_string(event)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, Clone, Debug)]
    struct TestEvent {
        data: String,
    }

    impl DomainEvent for TestEvent {
        fn event_type(&self) -> &'static str { "TestEvent" }
    }

    #[test]
    fn test_event_envelope_creation() {
        let aggregate_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();

        let envelope = EventEnvelope::new(
            aggregate_id,
            1,
            TestEvent { data: "test".to_string() },
            correlation_id,
        );

        assert_eq!(envelope.aggregate_id, aggregate_id);
        assert_eq!(envelope.sequence_number, 1);
        assert_eq!(envelope.event_type, "TestEvent");
        assert_eq!(envelope.correlation_id, correlation_id);
    }

    #[test]
    fn test_wrap_all_numbers_from_version() {
        let events = vec![
            TestEvent { data: "a".to_string() },
            TestEvent { data: "b".to_string() },
        ];

        // Aggregate recorded 5 events in total, last 2 still pending
        let envelopes = EventEnvelope::wrap_all(Uuid::new_v4(), 5, events, Uuid::new_v4());

        let sequence: Vec<i64> = envelopes.iter().map(|e| e.sequence_number).collect();
        assert_eq!(sequence, vec![4, 5]);
    }

    #[test]
    fn test_event_serialization() {
        let event = TestEvent {
            data: "test data".to_string(),
        };

        let json = serialize_event(&event).unwrap();
        let deserialized: TestEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(event.data, deserialized.data);
    }
}
