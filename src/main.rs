use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

use delivery_dispatch::application::{
    DeliveryCommandHandler, InMemoryCourierRepository, InMemoryEventPublisher, InMemoryOrderRepository,
};
use delivery_dispatch::config::AppConfig;
use delivery_dispatch::domain::services::DispatchError;
use delivery_dispatch::domain::shared::{Location, Speed, Volume};
use delivery_dispatch::metrics::DispatchMetrics;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    // RUST_LOG wins over DELIVERY_LOG
    // Example: RUST_LOG=trace cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
        )
        .init();

    tracing::info!("🚚 Starting delivery dispatch simulation");
    tracing::debug!(?config, "Configuration loaded");

    // === 1. Wire adapters ===
    let metrics = Arc::new(DispatchMetrics::new()?);
    let publisher = Arc::new(InMemoryEventPublisher::new());
    let handler = DeliveryCommandHandler::new(
        Arc::new(InMemoryCourierRepository::new()),
        Arc::new(InMemoryOrderRepository::new()),
        publisher.clone(),
        metrics.clone(),
    );

    // === 2. Couriers ===
    handler
        .create_courier("Walker", Speed::new(1)?, Location::new(1, 1)?)
        .await?;
    let cyclist = handler
        .create_courier("Cyclist", Speed::new(2)?, Location::new(10, 10)?)
        .await?;
    handler.add_storage_place(cyclist, "basket", Volume::new(15)?).await?;
    let driver = handler
        .create_courier("Driver", Speed::new(3)?, Location::new(5, 5)?)
        .await?;
    handler.add_storage_place(driver, "trunk", Volume::new(30)?).await?;

    // === 3. Orders, spread over the grid ===
    for i in 0..config.demo_orders as i32 {
        let location = Location::new((i * 3) % 10 + 1, (i * 7) % 10 + 1)?;
        let volume = Volume::new((i * 4) % 25 + 1)?;
        handler.create_order(Uuid::new_v4(), location, volume).await?;
    }

    // === 4. Scheduler loop: dispatch one order and move couriers per tick ===
    let mut interval = tokio::time::interval(config.tick_interval);
    let mut tick = 0;
    while tick < config.max_ticks {
        interval.tick().await;
        tick += 1;

        match handler.assign_next_order().await {
            Ok(Some(assignment)) => tracing::info!(
                tick,
                order_id = %assignment.order_id,
                courier = %assignment.courier_name,
                "✅ Assigned"
            ),
            Ok(None) => {}
            Err(e) => match e.downcast_ref::<DispatchError>() {
                // Retried on the next tick once a courier frees up
                Some(DispatchError::NobodyCanTakeOrder { order_id }) => {
                    tracing::info!(tick, order_id = %order_id, "⏳ No free courier, waiting");
                }
                _ => return Err(e),
            },
        }

        let report = handler.move_couriers().await?;
        for order_id in &report.completed {
            tracing::info!(tick, order_id = %order_id, "📦 Delivered");
        }

        if handler.orders_not_completed().await?.is_empty() {
            tracing::info!(tick, "🎉 All orders delivered");
            break;
        }
    }

    let open = handler.orders_not_completed().await?;
    if !open.is_empty() {
        tracing::warn!(open = open.len(), ticks = config.max_ticks, "Tick budget exhausted with open orders");
    }

    for courier in handler.couriers().await? {
        tracing::info!(
            courier = courier.name(),
            location = %courier.location(),
            busy = courier.is_busy(),
            "Courier final state"
        );
    }

    tracing::info!(
        events = publisher.published().await.len(),
        created = metrics.orders_created.get(),
        assigned = metrics.orders_assigned.get(),
        completed = metrics.orders_completed.get(),
        moves = metrics.courier_moves.get(),
        "📊 Run summary"
    );
    tracing::debug!("Metrics:\n{}", metrics.render()?);

    Ok(())
}
