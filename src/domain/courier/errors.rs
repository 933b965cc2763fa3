use uuid::Uuid;

use crate::domain::order::OrderError;
use crate::domain::shared::GeneralError;

// ============================================================================
// Courier Business Rule Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoragePlaceError {
    #[error(transparent)]
    Validation(#[from] GeneralError),

    #[error("Storage place is occupied by order {occupied_by}")]
    Occupied { occupied_by: Uuid },

    #[error("Storage place volume {total_volume} is exceeded")]
    VolumeExceeded { total_volume: i32 },

    #[error("Wrong order id, stored order id: {}", fmt_stored(.stored))]
    WrongOrderId { stored: Option<Uuid> },
}

fn fmt_stored(stored: &Option<Uuid>) -> String {
    stored.map_or_else(|| "none".to_string(), |id| id.to_string())
}

impl StoragePlaceError {
    pub fn code(&self) -> &'static str {
        match self {
            StoragePlaceError::Validation(e) => e.code(),
            StoragePlaceError::Occupied { .. } => "storage_place.is.occupied",
            StoragePlaceError::VolumeExceeded { .. } => "storage_place.volume.is.exceeded",
            StoragePlaceError::WrongOrderId { .. } => "storage_place.wrong.order_id",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CourierError {
    #[error(transparent)]
    Validation(#[from] GeneralError),

    #[error(transparent)]
    StoragePlace(#[from] StoragePlaceError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("No suitable storage place for volume {volume}")]
    NoSuitableStoragePlace { volume: i32 },

    #[error("No such order {order_id} in storage places. {}", fmt_held(.held))]
    NoSuchOrder { order_id: Uuid, held: Vec<Uuid> },
}

fn fmt_held(held: &[Uuid]) -> String {
    if held.is_empty() {
        return "No orders are held".to_string();
    }
    let ids: Vec<String> = held.iter().map(Uuid::to_string).collect();
    format!("Held orders: {}", ids.join(", "))
}

impl CourierError {
    pub fn code(&self) -> &'static str {
        match self {
            CourierError::Validation(e) => e.code(),
            CourierError::StoragePlace(e) => e.code(),
            CourierError::Order(e) => e.code(),
            CourierError::NoSuitableStoragePlace { .. } => "courier.no.suitable.storage_place",
            CourierError::NoSuchOrder { .. } => "courier.no.such.order",
        }
    }
}
