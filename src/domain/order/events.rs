use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::shared::{Location, Volume};
use crate::event_sourcing::DomainEvent;

// ============================================================================
// Order Events
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OrderEvent {
    Created(OrderCreated),
    Assigned(OrderAssigned),
    Completed(OrderCompleted),
}

impl DomainEvent for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::Created(_) => "OrderCreated",
            OrderEvent::Assigned(_) => "OrderAssigned",
            OrderEvent::Completed(_) => "OrderCompleted",
        }
    }
}

/// Order Created - accepted into the system, waiting for a courier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreated {
    pub order_id: Uuid,
    pub location: Location,
    pub volume: Volume,
}

/// Order Assigned - stored by a courier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAssigned {
    pub order_id: Uuid,
    pub courier_id: Uuid,
}

/// Order Completed - handed over at its location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCompleted {
    pub order_id: Uuid,
    pub courier_id: Uuid,
}
