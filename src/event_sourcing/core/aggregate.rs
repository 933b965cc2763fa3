use uuid::Uuid;

// ============================================================================
// Aggregate Root - Pending Domain Events
// ============================================================================
//
// Aggregates mutate their own state directly and record what happened in an
// append-only buffer. Nothing is published from inside an aggregate: the
// application layer drains the buffer after it has persisted the new state.
//
// ============================================================================

/// Append-only buffer of events recorded by one aggregate instance.
#[derive(Debug, Clone)]
pub struct EventBuffer<E> {
    events: Vec<E>,
    version: i64,
}

impl<E> EventBuffer<E> {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            version: 0,
        }
    }

    pub fn record(&mut self, event: E) {
        self.events.push(event);
        self.version += 1;
    }

    pub fn as_slice(&self) -> &[E] {
        &self.events
    }

    /// Number of events ever recorded, drained or not.
    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn drain(&mut self) -> Vec<E> {
        std::mem::take(&mut self.events)
    }
}

impl<E> Default for EventBuffer<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Generic aggregate root contract shared by `Order` and `Courier`
pub trait AggregateRoot {
    type Event;

    fn aggregate_id(&self) -> Uuid;

    fn event_buffer(&self) -> &EventBuffer<Self::Event>;

    fn event_buffer_mut(&mut self) -> &mut EventBuffer<Self::Event>;

    /// Current version (total events recorded since construction)
    fn version(&self) -> i64 {
        self.event_buffer().version()
    }

    /// Events recorded but not drained yet
    fn pending_events(&self) -> &[Self::Event] {
        self.event_buffer().as_slice()
    }

    /// Drain pending events. Call only after the new state was persisted.
    fn take_events(&mut self) -> Vec<Self::Event> {
        self.event_buffer_mut().drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_drain() {
        let mut buffer = EventBuffer::new();
        buffer.record("first");
        buffer.record("second");

        assert_eq!(buffer.as_slice(), &["first", "second"]);
        assert_eq!(buffer.version(), 2);

        let drained = buffer.drain();
        assert_eq!(drained, vec!["first", "second"]);
        assert!(buffer.as_slice().is_empty());
        // Version survives draining
        assert_eq!(buffer.version(), 2);
    }
}
