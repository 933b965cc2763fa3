// ============================================================================
// delivery_dispatch - couriers, orders and nearest-courier dispatch on a grid
// ============================================================================

pub mod application;
pub mod config;
pub mod domain;
pub mod event_sourcing;
pub mod metrics;
