use serde::{Deserialize, Serialize};

use crate::event_sourcing::DomainEvent;
use super::courier::CourierEvent;
use super::order::OrderEvent;

// ============================================================================
// Delivery Event - Union of every aggregate's events, as published
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "aggregate", content = "event")]
pub enum DeliveryEvent {
    Order(OrderEvent),
    Courier(CourierEvent),
}

impl DomainEvent for DeliveryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DeliveryEvent::Order(e) => e.event_type(),
            DeliveryEvent::Courier(e) => e.event_type(),
        }
    }
}

impl From<OrderEvent> for DeliveryEvent {
    fn from(event: OrderEvent) -> Self {
        DeliveryEvent::Order(event)
    }
}

impl From<CourierEvent> for DeliveryEvent {
    fn from(event: CourierEvent) -> Self {
        DeliveryEvent::Courier(event)
    }
}
