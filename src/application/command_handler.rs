use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::courier::Courier;
use crate::domain::order::Order;
use crate::domain::services::OrderDispatcher;
use crate::domain::shared::{Location, Speed, Volume};
use crate::domain::DeliveryEvent;
use crate::event_sourcing::{AggregateRoot, EventEnvelope};
use crate::metrics::DispatchMetrics;
use super::errors::ApplicationError;
use super::ports::{CourierRepository, EventPublisher, OrderRepository};

// ============================================================================
// Delivery Command Handler
// ============================================================================
//
// Orchestrates: Load → Domain operation → Store → Publish
//
// Every use case works on snapshots loaded from the repositories. Nothing is
// stored or published unless the domain operation succeeded, so a failed
// dispatch leaves both the order and the couriers as they were.
//
// ============================================================================

/// Result of a successful dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub order_id: Uuid,
    pub courier_id: Uuid,
    pub courier_name: String,
    pub estimated_time: f64,
}

/// Result of one scheduler movement step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveReport {
    pub moved: Vec<Uuid>,
    pub completed: Vec<Uuid>,
}

pub struct DeliveryCommandHandler {
    couriers: Arc<dyn CourierRepository>,
    orders: Arc<dyn OrderRepository>,
    publisher: Arc<dyn EventPublisher>,
    metrics: Arc<DispatchMetrics>,
    dispatcher: OrderDispatcher,
    // Serialises writers over shared courier and order state
    write_lock: Mutex<()>,
}

impl DeliveryCommandHandler {
    pub fn new(
        couriers: Arc<dyn CourierRepository>,
        orders: Arc<dyn OrderRepository>,
        publisher: Arc<dyn EventPublisher>,
        metrics: Arc<DispatchMetrics>,
    ) -> Self {
        Self {
            couriers,
            orders,
            publisher,
            metrics,
            dispatcher: OrderDispatcher::new(),
            write_lock: Mutex::new(()),
        }
    }

    pub async fn create_courier(&self, name: &str, speed: Speed, location: Location) -> Result<Uuid> {
        let mut courier = Courier::new(name, speed, location)?;
        let courier_id = courier.id();
        let events = drain_envelopes(&mut courier, "create_courier", Uuid::new_v4());

        let _guard = self.write_lock.lock().await;
        self.couriers.add(courier).await.context("Failed to store courier")?;
        self.publisher.publish(events).await?;

        self.metrics.couriers_registered.inc();
        tracing::info!(courier_id = %courier_id, name, speed = speed.value(), %location, "Courier registered");
        Ok(courier_id)
    }

    pub async fn add_storage_place(&self, courier_id: Uuid, name: &str, volume: Volume) -> Result<Uuid> {
        let _guard = self.write_lock.lock().await;

        let mut courier = self
            .couriers
            .get(courier_id)
            .await?
            .ok_or(ApplicationError::CourierNotFound(courier_id))?;
        let storage_place_id = courier.add_storage_place(name, volume)?;
        let events = drain_envelopes(&mut courier, "add_storage_place", Uuid::new_v4());

        self.couriers.update(courier).await.context("Failed to store courier")?;
        self.publisher.publish(events).await?;

        tracing::info!(
            courier_id = %courier_id,
            storage_place_id = %storage_place_id,
            name,
            volume = volume.value(),
            "Storage place added"
        );
        Ok(storage_place_id)
    }

    pub async fn create_order(&self, order_id: Uuid, location: Location, volume: Volume) -> Result<()> {
        let mut order = Order::new(order_id, location, volume)?;
        let events = drain_envelopes(&mut order, "create_order", order_id);

        let _guard = self.write_lock.lock().await;
        self.orders.add(order).await.context("Failed to store order")?;
        self.publisher.publish(events).await?;

        self.metrics.orders_created.inc();
        tracing::info!(order_id = %order_id, %location, volume = volume.value(), "Order created");
        Ok(())
    }

    /// Dispatches the oldest created order. `Ok(None)` when no order waits.
    pub async fn assign_next_order(&self) -> Result<Option<Assignment>> {
        let _guard = self.write_lock.lock().await;

        let Some(mut order) = self.orders.get_first_created().await? else {
            return Ok(None);
        };
        let mut couriers = self.couriers.get_all().await?;

        let started = Instant::now();
        let dispatched = self
            .dispatcher
            .dispatch(&mut order, &mut couriers)
            .map(|courier| courier.id());
        let elapsed = started.elapsed().as_secs_f64();

        let courier_id = match dispatched {
            Ok(courier_id) => {
                self.metrics.record_dispatch(elapsed);
                courier_id
            }
            Err(e) => {
                self.metrics.record_dispatch_failure(e.code(), elapsed);
                tracing::warn!(order_id = %order.id(), code = e.code(), error = %e, "Dispatch failed");
                return Err(e.into());
            }
        };

        let mut courier = couriers
            .into_iter()
            .find(|c| c.id() == courier_id)
            .ok_or(ApplicationError::CourierNotFound(courier_id))?;

        let assignment = Assignment {
            order_id: order.id(),
            courier_id,
            courier_name: courier.name().to_string(),
            estimated_time: courier.calculate_time_to_location(order.location()),
        };

        // Both aggregates of one dispatch share a correlation id
        let correlation_id = order.id();
        let mut events = drain_envelopes(&mut order, "assign_order", correlation_id);
        events.extend(drain_envelopes(&mut courier, "assign_order", correlation_id));

        // Courier first: an assigned order must never point at a courier
        // that does not hold it
        self.couriers.update(courier).await.context("Failed to store courier")?;
        self.orders.update(order).await.context("Failed to store assigned order")?;
        self.publisher.publish(events).await?;

        tracing::info!(
            order_id = %assignment.order_id,
            courier_id = %assignment.courier_id,
            courier = %assignment.courier_name,
            eta = assignment.estimated_time,
            "Order assigned"
        );
        Ok(Some(assignment))
    }

    /// Moves every courier holding orders one step toward its first order and
    /// completes the orders located where it ends up.
    pub async fn move_couriers(&self) -> Result<MoveReport> {
        let _guard = self.write_lock.lock().await;

        let assigned = self.orders.get_all_assigned().await?;
        let mut report = MoveReport::default();
        if assigned.is_empty() {
            return Ok(report);
        }

        // Every courier step runs before anything is stored, so a failing
        // step leaves the repositories untouched
        let couriers = self.couriers.get_all().await?;
        let mut moved_couriers = Vec::new();
        let mut completed_orders = Vec::new();

        for mut courier in couriers {
            let mut orders: Vec<Order> = assigned
                .iter()
                .filter(|o| o.courier_id() == Some(courier.id()))
                .cloned()
                .collect();
            let Some(target) = orders.first().map(|o| *o.location()) else {
                continue;
            };

            let from = *courier.location();
            courier.move_towards(&target)?;
            let here = *courier.location();
            if here != from {
                report.moved.push(courier.id());
                tracing::debug!(courier_id = %courier.id(), %from, to = %here, "Courier moved");
            }

            for order in orders.iter_mut().filter(|o| *o.location() == here) {
                courier.complete_order(order)?;
                report.completed.push(order.id());
            }

            completed_orders.extend(orders.into_iter().filter(|o| !o.pending_events().is_empty()));
            if !courier.pending_events().is_empty() {
                moved_couriers.push(courier);
            }
        }

        let correlation_id = Uuid::new_v4();
        let mut events = Vec::new();
        for mut courier in moved_couriers {
            events.extend(drain_envelopes(&mut courier, "move_couriers", correlation_id));
            self.couriers.update(courier).await.context("Failed to store courier")?;
        }
        for mut order in completed_orders {
            events.extend(drain_envelopes(&mut order, "move_couriers", correlation_id));
            self.orders.update(order).await.context("Failed to store completed order")?;
        }
        if !events.is_empty() {
            self.publisher.publish(events).await?;
        }

        self.metrics.courier_moves.inc_by(report.moved.len() as u64);
        self.metrics.orders_completed.inc_by(report.completed.len() as u64);
        for order_id in &report.completed {
            tracing::info!(order_id = %order_id, "Order completed");
        }
        Ok(report)
    }

    pub async fn couriers(&self) -> Result<Vec<Courier>> {
        self.couriers.get_all().await
    }

    pub async fn courier(&self, courier_id: Uuid) -> Result<Courier> {
        Ok(self
            .couriers
            .get(courier_id)
            .await?
            .ok_or(ApplicationError::CourierNotFound(courier_id))?)
    }

    pub async fn order(&self, order_id: Uuid) -> Result<Order> {
        Ok(self
            .orders
            .get(order_id)
            .await?
            .ok_or(ApplicationError::OrderNotFound(order_id))?)
    }

    pub async fn orders_not_completed(&self) -> Result<Vec<Order>> {
        self.orders.get_all_not_completed().await
    }
}

/// Drains pending events into publishable envelopes
fn drain_envelopes<A>(
    aggregate: &mut A,
    use_case: &str,
    correlation_id: Uuid,
) -> Vec<EventEnvelope<DeliveryEvent>>
where
    A: AggregateRoot,
    A::Event: Into<DeliveryEvent>,
{
    let aggregate_id = aggregate.aggregate_id();
    let version = aggregate.version();
    let events = aggregate.take_events().into_iter().map(Into::into).collect();
    EventEnvelope::wrap_all(aggregate_id, version, events, correlation_id)
        .into_iter()
        .map(|envelope| envelope.with_metadata("use_case".to_string(), use_case.to_string()))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::in_memory::{InMemoryCourierRepository, InMemoryEventPublisher, InMemoryOrderRepository};
    use crate::domain::order::OrderStatus;
    use crate::domain::services::DispatchError;

    use crate::application::ports::{CourierRepository, OrderRepository};
    use crate::domain::courier::CourierError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Fixture {
        handler: DeliveryCommandHandler,
        orders: Arc<InMemoryOrderRepository>,
        publisher: Arc<InMemoryEventPublisher>,
        metrics: Arc<DispatchMetrics>,
    }

    fn setup() -> Fixture {
        setup_with(Arc::new(InMemoryCourierRepository::new()))
    }

    fn setup_with(couriers: Arc<dyn CourierRepository>) -> Fixture {
        let orders = Arc::new(InMemoryOrderRepository::new());
        let publisher = Arc::new(InMemoryEventPublisher::new());
        let metrics = Arc::new(DispatchMetrics::new().unwrap());
        let handler = DeliveryCommandHandler::new(couriers, orders.clone(), publisher.clone(), metrics.clone());
        Fixture { handler, orders, publisher, metrics }
    }

    /// Courier store whose updates can be switched to fail
    struct FlakyCourierRepository {
        inner: InMemoryCourierRepository,
        fail_updates: AtomicBool,
    }

    #[async_trait]
    impl CourierRepository for FlakyCourierRepository {
        async fn add(&self, courier: Courier) -> Result<()> {
            self.inner.add(courier).await
        }

        async fn update(&self, courier: Courier) -> Result<()> {
            if self.fail_updates.load(Ordering::SeqCst) {
                anyhow::bail!("courier store unavailable");
            }
            self.inner.update(courier).await
        }

        async fn get(&self, courier_id: Uuid) -> Result<Option<Courier>> {
            self.inner.get(courier_id).await
        }

        async fn get_all(&self) -> Result<Vec<Courier>> {
            self.inner.get_all().await
        }
    }

    fn location(x: i32, y: i32) -> Location {
        Location::new(x, y).unwrap()
    }

    fn speed(value: i32) -> Speed {
        Speed::new(value).unwrap()
    }

    fn volume(value: i32) -> Volume {
        Volume::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_assign_next_order_picks_fastest_courier() {
        let f = setup();
        let k1 = f.handler.create_courier("k1", speed(2), location(1, 1)).await.unwrap();
        f.handler.add_storage_place(k1, "rack", volume(20)).await.unwrap();
        let k2 = f.handler.create_courier("k2", speed(3), location(1, 10)).await.unwrap();
        f.handler.add_storage_place(k2, "rack", volume(20)).await.unwrap();
        f.handler.create_courier("k3", speed(5), location(10, 10)).await.unwrap();

        let order_id = Uuid::new_v4();
        f.handler.create_order(order_id, location(5, 5), volume(20)).await.unwrap();

        let assignment = f.handler.assign_next_order().await.unwrap().unwrap();

        assert_eq!(assignment.order_id, order_id);
        assert_eq!(assignment.courier_id, k2);
        assert_eq!(assignment.courier_name, "k2");
        assert_eq!(assignment.estimated_time, 3.0);

        let order = f.handler.order(order_id).await.unwrap();
        assert_eq!(order.status(), OrderStatus::Assigned);
        assert_eq!(order.courier_id(), Some(k2));
        assert_eq!(f.handler.courier(k2).await.unwrap().held_order_ids(), vec![order_id]);
        assert_eq!(f.metrics.orders_assigned.get(), 1);
    }

    #[tokio::test]
    async fn test_assignment_events_share_correlation_id() {
        let f = setup();
        f.handler.create_courier("k1", speed(2), location(1, 1)).await.unwrap();
        let order_id = Uuid::new_v4();
        f.handler.create_order(order_id, location(2, 2), volume(5)).await.unwrap();

        f.handler.assign_next_order().await.unwrap().unwrap();

        let published = f.publisher.published().await;
        let assigned = published.iter().find(|e| e.event_type == "OrderAssigned").unwrap();
        let taken = published.iter().find(|e| e.event_type == "CourierOrderTaken").unwrap();
        assert_eq!(assigned.correlation_id, taken.correlation_id);
        assert_eq!(assigned.aggregate_id, order_id);
        assert_eq!(assigned.sequence_number, 2);
        assert_eq!(assigned.metadata.get("use_case").map(String::as_str), Some("assign_order"));
    }

    #[tokio::test]
    async fn test_assign_without_created_orders_returns_none() {
        let f = setup();
        f.handler.create_courier("k1", speed(2), location(1, 1)).await.unwrap();

        assert_eq!(f.handler.assign_next_order().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_dispatch_persists_nothing() {
        let f = setup();
        f.handler.create_courier("k1", speed(2), location(1, 1)).await.unwrap();
        let order_id = Uuid::new_v4();
        f.handler.create_order(order_id, location(5, 5), volume(20)).await.unwrap();

        let err = f.handler.assign_next_order().await.unwrap_err();

        assert_eq!(
            err.downcast_ref::<DispatchError>(),
            Some(&DispatchError::NobodyCanTakeOrder { order_id })
        );
        let order = f.handler.order(order_id).await.unwrap();
        assert_eq!(order.status(), OrderStatus::Created);
        assert!(f.handler.couriers().await.unwrap().iter().all(|c| !c.is_busy()));
        assert!(f.publisher.published().await.iter().all(|e| e.event_type != "OrderAssigned"));

        let failures = f
            .metrics
            .dispatch_failures
            .with_label_values(&["dispatch.nobody.can.take.order"])
            .get();
        assert_eq!(failures, 1);
    }

    #[tokio::test]
    async fn test_dispatch_without_couriers_fails() {
        let f = setup();
        f.handler.create_order(Uuid::new_v4(), location(5, 5), volume(1)).await.unwrap();

        let err = f.handler.assign_next_order().await.unwrap_err();

        let dispatch = err.downcast_ref::<DispatchError>().unwrap();
        assert_eq!(dispatch.code(), "value.is.required");
    }

    #[tokio::test]
    async fn test_move_couriers_until_delivered() {
        let f = setup();
        let courier_id = f.handler.create_courier("k1", speed(2), location(1, 1)).await.unwrap();
        let order_id = Uuid::new_v4();
        f.handler.create_order(order_id, location(5, 5), volume(5)).await.unwrap();
        f.handler.assign_next_order().await.unwrap().unwrap();

        for _ in 0..3 {
            let report = f.handler.move_couriers().await.unwrap();
            assert_eq!(report.moved, vec![courier_id]);
            assert!(report.completed.is_empty());
        }
        let report = f.handler.move_couriers().await.unwrap();

        assert_eq!(report.completed, vec![order_id]);
        assert_eq!(f.handler.order(order_id).await.unwrap().status(), OrderStatus::Completed);
        assert!(f.handler.orders_not_completed().await.unwrap().is_empty());

        let courier = f.handler.courier(courier_id).await.unwrap();
        assert_eq!(courier.location(), &location(5, 5));
        assert!(!courier.is_busy());
        assert_eq!(f.metrics.orders_completed.get(), 1);
        assert_eq!(f.metrics.courier_moves.get(), 4);

        // Nothing left to move
        assert_eq!(f.handler.move_couriers().await.unwrap(), MoveReport::default());
    }

    #[tokio::test]
    async fn test_failed_courier_store_leaves_order_unassigned() {
        let couriers = Arc::new(FlakyCourierRepository {
            inner: InMemoryCourierRepository::new(),
            fail_updates: AtomicBool::new(false),
        });
        let f = setup_with(couriers.clone());
        let courier_id = f.handler.create_courier("k1", speed(2), location(1, 1)).await.unwrap();
        let order_id = Uuid::new_v4();
        f.handler.create_order(order_id, location(5, 5), volume(5)).await.unwrap();
        couriers.fail_updates.store(true, Ordering::SeqCst);

        assert!(f.handler.assign_next_order().await.is_err());

        let order = f.handler.order(order_id).await.unwrap();
        assert_eq!(order.status(), OrderStatus::Created);
        assert_eq!(order.courier_id(), None);
        assert!(!f.handler.courier(courier_id).await.unwrap().is_busy());
        assert!(f.publisher.published().await.iter().all(|e| e.event_type != "OrderAssigned"));
    }

    #[tokio::test]
    async fn test_failed_move_step_stores_nothing() {
        let f = setup();
        let k1 = f.handler.create_courier("k1", speed(2), location(1, 1)).await.unwrap();
        f.handler.create_order(Uuid::new_v4(), location(5, 5), volume(5)).await.unwrap();
        f.handler.assign_next_order().await.unwrap().unwrap();

        // Order assigned to k2 that k2's stored state does not hold
        let k2 = f.handler.create_courier("k2", speed(2), location(8, 8)).await.unwrap();
        let mut detached = f.handler.courier(k2).await.unwrap();
        let mut stray = Order::new(Uuid::new_v4(), location(8, 8), volume(1)).unwrap();
        detached.take_order(&mut stray).unwrap();
        stray.take_events();
        f.orders.add(stray.clone()).await.unwrap();
        let published_before = f.publisher.published().await.len();

        let err = f.handler.move_couriers().await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CourierError>(),
            Some(CourierError::NoSuchOrder { .. })
        ));
        assert_eq!(f.handler.courier(k1).await.unwrap().location(), &location(1, 1));
        assert_eq!(f.handler.order(stray.id()).await.unwrap().status(), OrderStatus::Assigned);
        assert_eq!(f.publisher.published().await.len(), published_before);
        assert_eq!(f.metrics.courier_moves.get(), 0);
    }

    #[tokio::test]
    async fn test_add_storage_place_to_unknown_courier_fails() {
        let f = setup();

        let err = f
            .handler
            .add_storage_place(Uuid::new_v4(), "rack", volume(20))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ApplicationError>(),
            Some(ApplicationError::CourierNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_order_rejected() {
        let f = setup();
        let order_id = Uuid::new_v4();
        f.handler.create_order(order_id, location(5, 5), volume(1)).await.unwrap();

        let err = f.handler.create_order(order_id, location(6, 6), volume(1)).await.unwrap_err();

        assert!(matches!(
            err.root_cause().downcast_ref::<ApplicationError>(),
            Some(ApplicationError::OrderAlreadyExists(_))
        ));
        assert_eq!(f.metrics.orders_created.get(), 1);
    }
}
