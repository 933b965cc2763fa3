// ============================================================================
// Shared Kernel - Value objects and validation used by every aggregate
// ============================================================================

pub mod errors;
pub mod value_objects;

pub use errors::*;
pub use value_objects::*;
