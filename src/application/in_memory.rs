use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::courier::Courier;
use crate::domain::order::{Order, OrderStatus};
use crate::domain::DeliveryEvent;
use crate::event_sourcing::{serialize_event, EventEnvelope};
use super::errors::ApplicationError;
use super::ports::{CourierRepository, EventPublisher, OrderRepository};

// ============================================================================
// In-Memory Adapters
// ============================================================================
//
// Vec-backed so iteration follows insertion order, which keeps dispatch
// tie-breaks deterministic. Stored aggregates are snapshots: callers get
// clones and must `update` to write changes back.
//
// ============================================================================

#[derive(Debug, Default)]
pub struct InMemoryCourierRepository {
    couriers: RwLock<Vec<Courier>>,
}

impl InMemoryCourierRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourierRepository for InMemoryCourierRepository {
    async fn add(&self, courier: Courier) -> Result<()> {
        let mut couriers = self.couriers.write().await;
        if couriers.iter().any(|c| c.id() == courier.id()) {
            return Err(ApplicationError::CourierAlreadyExists(courier.id()).into());
        }
        couriers.push(courier);
        Ok(())
    }

    async fn update(&self, courier: Courier) -> Result<()> {
        let mut couriers = self.couriers.write().await;
        let slot = couriers
            .iter_mut()
            .find(|c| c.id() == courier.id())
            .ok_or(ApplicationError::CourierNotFound(courier.id()))?;
        *slot = courier;
        Ok(())
    }

    async fn get(&self, courier_id: Uuid) -> Result<Option<Courier>> {
        let couriers = self.couriers.read().await;
        Ok(couriers.iter().find(|c| c.id() == courier_id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Courier>> {
        Ok(self.couriers.read().await.clone())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<Vec<Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn filter<P>(&self, predicate: P) -> Vec<Order>
    where
        P: Fn(&Order) -> bool,
    {
        let orders = self.orders.read().await;
        orders.iter().filter(|o| predicate(o)).cloned().collect()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn add(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        if orders.iter().any(|o| o.id() == order.id()) {
            return Err(ApplicationError::OrderAlreadyExists(order.id()).into());
        }
        orders.push(order);
        Ok(())
    }

    async fn update(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        let slot = orders
            .iter_mut()
            .find(|o| o.id() == order.id())
            .ok_or(ApplicationError::OrderNotFound(order.id()))?;
        *slot = order;
        Ok(())
    }

    async fn get(&self, order_id: Uuid) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|o| o.id() == order_id).cloned())
    }

    async fn get_first_created(&self) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|o| o.status() == OrderStatus::Created).cloned())
    }

    async fn get_all_assigned(&self) -> Result<Vec<Order>> {
        Ok(self.filter(|o| o.status() == OrderStatus::Assigned).await)
    }

    async fn get_all_not_completed(&self) -> Result<Vec<Order>> {
        Ok(self.filter(|o| o.status() != OrderStatus::Completed).await)
    }
}

/// Keeps every published envelope; stands in for a message broker
#[derive(Debug, Default)]
pub struct InMemoryEventPublisher {
    published: RwLock<Vec<EventEnvelope<DeliveryEvent>>>,
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn published(&self) -> Vec<EventEnvelope<DeliveryEvent>> {
        self.published.read().await.clone()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, events: Vec<EventEnvelope<DeliveryEvent>>) -> Result<()> {
        for envelope in &events {
            let payload = serialize_event(&envelope.event_data)?;
            tracing::debug!(
                aggregate_id = %envelope.aggregate_id,
                sequence = envelope.sequence_number,
                event_type = %envelope.event_type,
                payload = %payload,
                "Publishing event"
            );
        }
        self.published.write().await.extend(events);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::{Location, Speed, Volume};

    fn courier(name: &str) -> Courier {
        Courier::new(name, Speed::new(1).unwrap(), Location::MIN).unwrap()
    }

    fn order() -> Order {
        Order::new(Uuid::new_v4(), Location::MAX, Volume::new(1).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_couriers_keep_insertion_order() {
        let repo = InMemoryCourierRepository::new();
        let names = ["c", "a", "b"];
        for name in names {
            repo.add(courier(name)).await.unwrap();
        }

        let all = repo.get_all().await.unwrap();
        let stored: Vec<&str> = all.iter().map(|c| c.name()).collect();
        assert_eq!(stored, names);
    }

    #[tokio::test]
    async fn test_duplicate_courier_rejected() {
        let repo = InMemoryCourierRepository::new();
        let courier = courier("k1");
        repo.add(courier.clone()).await.unwrap();

        let err = repo.add(courier).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApplicationError>(),
            Some(ApplicationError::CourierAlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_update_unknown_courier_fails() {
        let repo = InMemoryCourierRepository::new();
        let err = repo.update(courier("ghost")).await.unwrap_err();
        assert!(err.to_string().starts_with("Courier not found"));
    }

    #[tokio::test]
    async fn test_order_queries_by_status() {
        let repo = InMemoryOrderRepository::new();
        let courier = courier("k1");

        let waiting = order();
        let mut assigned = order();
        assigned.assign(&courier).unwrap();
        let mut done = order();
        done.assign(&courier).unwrap();
        done.complete().unwrap();

        for o in [waiting.clone(), assigned.clone(), done.clone()] {
            repo.add(o).await.unwrap();
        }

        let first = repo.get_first_created().await.unwrap().unwrap();
        assert_eq!(first.id(), waiting.id());

        let assigned_ids: Vec<Uuid> = repo.get_all_assigned().await.unwrap().iter().map(Order::id).collect();
        assert_eq!(assigned_ids, vec![assigned.id()]);

        let open_ids: Vec<Uuid> = repo.get_all_not_completed().await.unwrap().iter().map(Order::id).collect();
        assert_eq!(open_ids, vec![waiting.id(), assigned.id()]);

        assert!(repo.get(done.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_publisher_keeps_envelopes() {
        let publisher = InMemoryEventPublisher::new();
        let mut order = order();
        let events = crate::event_sourcing::AggregateRoot::take_events(&mut order);
        let envelopes = EventEnvelope::wrap_all(
            order.id(),
            1,
            events.into_iter().map(DeliveryEvent::from).collect(),
            Uuid::new_v4(),
        );

        publisher.publish(envelopes).await.unwrap();

        let published = publisher.published().await;
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].event_type, "OrderCreated");
    }
}
