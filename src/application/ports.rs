use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::courier::Courier;
use crate::domain::order::Order;
use crate::domain::DeliveryEvent;
use crate::event_sourcing::EventEnvelope;

// ============================================================================
// Ports - Collaborators the delivery core relies on
// ============================================================================
//
// The domain never calls these. The command handler loads aggregates through
// them, runs the domain operation, then stores and publishes the result.
//
// ============================================================================

#[async_trait]
pub trait CourierRepository: Send + Sync {
    async fn add(&self, courier: Courier) -> Result<()>;

    async fn update(&self, courier: Courier) -> Result<()>;

    async fn get(&self, courier_id: Uuid) -> Result<Option<Courier>>;

    /// Every courier, in registration order
    async fn get_all(&self) -> Result<Vec<Courier>>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn add(&self, order: Order) -> Result<()>;

    async fn update(&self, order: Order) -> Result<()>;

    async fn get(&self, order_id: Uuid) -> Result<Option<Order>>;

    /// Oldest order still waiting for a courier
    async fn get_first_created(&self) -> Result<Option<Order>>;

    async fn get_all_assigned(&self) -> Result<Vec<Order>>;

    async fn get_all_not_completed(&self) -> Result<Vec<Order>>;
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, events: Vec<EventEnvelope<DeliveryEvent>>) -> Result<()>;
}
