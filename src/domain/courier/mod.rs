// ============================================================================
// Courier Domain - Courier Aggregate
// ============================================================================
//
// - Entity (StoragePlace, owned exclusively by a Courier)
// - Events (CourierRegistered, CourierOrderTaken, CourierMoved, ...)
// - Errors (StoragePlaceError, CourierError)
// - Aggregate (Courier: capacity, movement, time estimation)
//
// ============================================================================

pub mod storage_place;
pub mod events;
pub mod errors;
pub mod aggregate;

pub use storage_place::*;
pub use events::*;
pub use errors::*;
pub use aggregate::*;
