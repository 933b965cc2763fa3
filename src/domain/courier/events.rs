use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::shared::{Location, Speed, Volume};
use crate::event_sourcing::DomainEvent;

// ============================================================================
// Courier Events
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CourierEvent {
    Registered(CourierRegistered),
    StoragePlaceAdded(CourierStoragePlaceAdded),
    OrderTaken(CourierOrderTaken),
    OrderDelivered(CourierOrderDelivered),
    Moved(CourierMoved),
}

impl DomainEvent for CourierEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CourierEvent::Registered(_) => "CourierRegistered",
            CourierEvent::StoragePlaceAdded(_) => "CourierStoragePlaceAdded",
            CourierEvent::OrderTaken(_) => "CourierOrderTaken",
            CourierEvent::OrderDelivered(_) => "CourierOrderDelivered",
            CourierEvent::Moved(_) => "CourierMoved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourierRegistered {
    pub courier_id: Uuid,
    pub name: String,
    pub speed: Speed,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourierStoragePlaceAdded {
    pub courier_id: Uuid,
    pub storage_place_id: Uuid,
    pub name: String,
    pub volume: Volume,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourierOrderTaken {
    pub courier_id: Uuid,
    pub order_id: Uuid,
    pub storage_place_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourierOrderDelivered {
    pub courier_id: Uuid,
    pub order_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourierMoved {
    pub courier_id: Uuid,
    pub from: Location,
    pub to: Location,
}
