// ============================================================================
// Domain Layer - Delivery Business Logic
// ============================================================================
//
// Synchronous and in-memory. Each aggregate has its own subdirectory with:
// - Value objects / entities
// - Events
// - Errors
// - Aggregate implementation
//
// Persistence and publication live in the application layer.
//
// ============================================================================

pub mod shared;
pub mod order;
pub mod courier;
pub mod services;
pub mod events;

pub use events::DeliveryEvent;
