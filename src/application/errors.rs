use uuid::Uuid;

// ============================================================================
// Application Errors - lookups and storage, on top of domain errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("Courier not found: {0}")]
    CourierNotFound(Uuid),

    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("Courier already exists: {0}")]
    CourierAlreadyExists(Uuid),

    #[error("Order already exists: {0}")]
    OrderAlreadyExists(Uuid),
}
