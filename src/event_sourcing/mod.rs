// ============================================================================
// Event Infrastructure
// ============================================================================
//
// Generic, reusable aggregate/event plumbing.
// Delivery-specific code is in src/domain/
//
// ============================================================================

mod core;

pub use self::core::*;
