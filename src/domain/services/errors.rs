use uuid::Uuid;

use crate::domain::courier::CourierError;
use crate::domain::order::OrderError;
use crate::domain::shared::GeneralError;

// ============================================================================
// Dispatch Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Validation(#[from] GeneralError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Courier(#[from] CourierError),

    #[error("Nobody can take order {order_id}")]
    NobodyCanTakeOrder { order_id: Uuid },
}

impl DispatchError {
    pub fn code(&self) -> &'static str {
        match self {
            DispatchError::Validation(e) => e.code(),
            DispatchError::Order(e) => e.code(),
            DispatchError::Courier(e) => e.code(),
            DispatchError::NobodyCanTakeOrder { .. } => "dispatch.nobody.can.take.order",
        }
    }
}
