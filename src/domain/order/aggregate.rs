use uuid::Uuid;

use crate::domain::courier::Courier;
use crate::domain::shared::{against_nil, Location, Volume};
use crate::event_sourcing::{AggregateRoot, EventBuffer};
use super::errors::OrderError;
use super::events::*;
use super::value_objects::OrderStatus;

// ============================================================================
// Order Aggregate - Domain Logic
// ============================================================================
//
// Invariant: `courier_id` is set if and only if status is not `Created`.
//
// ============================================================================

#[derive(Debug, Clone)]
pub struct Order {
    id: Uuid,
    location: Location,
    volume: Volume,
    status: OrderStatus,
    courier_id: Option<Uuid>,
    events: EventBuffer<OrderEvent>,
}

impl Order {
    /// The id is supplied by the caller so it can correlate with the
    /// external request that created the order.
    pub fn new(order_id: Uuid, location: Location, volume: Volume) -> Result<Self, OrderError> {
        against_nil(order_id, "order_id")?;

        let mut order = Self {
            id: order_id,
            location,
            volume,
            status: OrderStatus::Created,
            courier_id: None,
            events: EventBuffer::new(),
        };
        order.events.record(OrderEvent::Created(OrderCreated {
            order_id,
            location,
            volume,
        }));
        Ok(order)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn courier_id(&self) -> Option<Uuid> {
        self.courier_id
    }

    /// Only a `Created` order can be handed to a courier
    pub fn ensure_assignable(&self) -> Result<(), OrderError> {
        match self.status {
            OrderStatus::Created => Ok(()),
            status => Err(OrderError::AlreadyAssigned {
                status,
                courier_id: self.courier_id,
            }),
        }
    }

    /// Records the courier that carries this order. Rejected unless the
    /// order is still `Created`; the courier id is never overwritten.
    pub fn assign(&mut self, courier: &Courier) -> Result<(), OrderError> {
        self.ensure_assignable()?;

        self.status = OrderStatus::Assigned;
        self.courier_id = Some(courier.id());
        self.events.record(OrderEvent::Assigned(OrderAssigned {
            order_id: self.id,
            courier_id: courier.id(),
        }));
        Ok(())
    }

    pub fn ensure_completable(&self) -> Result<(), OrderError> {
        match self.status {
            OrderStatus::Assigned => Ok(()),
            status => Err(OrderError::NotAssigned { status }),
        }
    }

    pub fn complete(&mut self) -> Result<(), OrderError> {
        self.ensure_completable()?;
        let courier_id = self
            .courier_id
            .ok_or(OrderError::NotAssigned { status: self.status })?;

        self.status = OrderStatus::Completed;
        self.events.record(OrderEvent::Completed(OrderCompleted {
            order_id: self.id,
            courier_id,
        }));
        Ok(())
    }
}

impl AggregateRoot for Order {
    type Event = OrderEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn event_buffer(&self) -> &EventBuffer<Self::Event> {
        &self.events
    }

    fn event_buffer_mut(&mut self) -> &mut EventBuffer<Self::Event> {
        &mut self.events
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
