// ============================================================================
// Order Domain - Order Aggregate
// ============================================================================
//
// - Value objects (OrderStatus)
// - Events (OrderCreated, OrderAssigned, OrderCompleted)
// - Errors (OrderError enum)
// - Aggregate (Order with its status state machine)
//
// ============================================================================

pub mod value_objects;
pub mod events;
pub mod errors;
pub mod aggregate;

pub use value_objects::*;
pub use events::*;
pub use errors::*;
pub use aggregate::*;
