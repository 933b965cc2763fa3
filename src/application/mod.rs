// ============================================================================
// Application Layer - Use cases around the delivery domain
// ============================================================================
//
// - Ports (repository and publisher contracts)
// - In-memory adapters
// - Command handler (create, dispatch, move, query)
//
// ============================================================================

pub mod errors;
pub mod ports;
pub mod in_memory;
pub mod command_handler;

pub use errors::*;
pub use ports::*;
pub use in_memory::*;
pub use command_handler::*;
