// ============================================================================
// Domain Services - Logic spanning several aggregates
// ============================================================================

pub mod errors;
pub mod order_dispatcher;

pub use errors::*;
pub use order_dispatcher::*;
