use uuid::Uuid;

use crate::domain::shared::GeneralError;
use super::value_objects::OrderStatus;

// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrderError {
    #[error(transparent)]
    Validation(#[from] GeneralError),

    #[error("Order is already {status}, courier: {}", fmt_courier(.courier_id))]
    AlreadyAssigned {
        status: OrderStatus,
        courier_id: Option<Uuid>,
    },

    #[error("Order was not assigned (status: {status})")]
    NotAssigned { status: OrderStatus },
}

fn fmt_courier(courier_id: &Option<Uuid>) -> String {
    courier_id.map_or_else(|| "none".to_string(), |id| id.to_string())
}

impl OrderError {
    pub fn code(&self) -> &'static str {
        match self {
            OrderError::Validation(e) => e.code(),
            OrderError::AlreadyAssigned { .. } => "order.already.assigned",
            OrderError::NotAssigned { .. } => "order.was.not.assigned",
        }
    }
}
