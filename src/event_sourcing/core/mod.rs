// ============================================================================
// Event Core - Generic Aggregate and Event Abstractions
// ============================================================================
//
// No delivery-specific code lives here (no Order, no Courier).
//
// ============================================================================

pub mod aggregate;
pub mod event;

pub use aggregate::{AggregateRoot, EventBuffer};
pub use event::{DomainEvent, EventEnvelope, serialize_event};
