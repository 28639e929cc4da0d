use anyhow::Result as AnyResult;
use delivery_application::command_bus::CommandBus;
use delivery_application::commands::{CreateCourier, CreateOrder};
use delivery_application::context::AppContext;
use delivery_application::geo::FixedGeoLocator;
use delivery_application::queries::{GetCouriers, GetIncompleteOrders};
use delivery_application::query_bus::QueryBus;
use delivery_application::scheduler::{DeliveryScheduler, SchedulerConfig};
use delivery_application::{InMemoryCommandBus, InMemoryQueryBus, register_delivery_handlers};
use delivery_domain::ids::OrderId;
use delivery_domain::location::Location;
use delivery_infra::{InMemoryStore, InMemoryUnitOfWorkFactory};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scheduler_delivers_orders_until_shutdown() -> AnyResult<()> {
    let commands = Arc::new(InMemoryCommandBus::new());
    let queries = InMemoryQueryBus::new();
    register_delivery_handlers(
        &commands,
        &queries,
        Arc::new(InMemoryUnitOfWorkFactory::new(InMemoryStore::new())),
        Arc::new(FixedGeoLocator(Location::new(7, 3)?)),
    )?;
    let ctx = AppContext::system("test");

    let handle = DeliveryScheduler::builder()
        .bus(commands.clone())
        .config(SchedulerConfig {
            assign_interval_ms: 5,
            move_interval_ms: 5,
        })
        .build()
        .start();

    commands
        .dispatch(
            &ctx,
            CreateCourier {
                name: "Bike".into(),
                speed: 2,
                location: Location::new(1, 1)?,
            },
        )
        .await?;
    for _ in 0..2 {
        commands
            .dispatch(
                &ctx,
                CreateOrder {
                    order_id: OrderId::new(),
                    street: "Main street 1".into(),
                    volume: 3,
                },
            )
            .await?;
    }

    // 同一骑手先后送完两单
    let delivered = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match queries.dispatch(&ctx, GetIncompleteOrders).await {
                Ok(pending) if pending.is_empty() => break,
                _ => tokio::time::sleep(Duration::from_millis(5)).await,
            }
        }
    })
    .await;
    assert!(delivered.is_ok(), "orders were not delivered in time");

    handle.shutdown();
    handle.join().await;

    let couriers = queries.dispatch(&ctx, GetCouriers).await?;
    assert!(couriers[0].storage_places.iter().all(|p| p.order_id.is_none()));
    assert_eq!(couriers[0].location.x, 7);
    assert_eq!(couriers[0].location.y, 3);
    Ok(())
}

#[tokio::test]
async fn dropping_the_handle_stops_the_tasks() -> AnyResult<()> {
    let commands = Arc::new(InMemoryCommandBus::new());
    let queries = InMemoryQueryBus::new();
    register_delivery_handlers(
        &commands,
        &queries,
        Arc::new(InMemoryUnitOfWorkFactory::new(InMemoryStore::new())),
        Arc::new(FixedGeoLocator(Location::new(2, 2)?)),
    )?;

    let handle = DeliveryScheduler::builder()
        .bus(commands.clone())
        .config(SchedulerConfig {
            assign_interval_ms: 1,
            move_interval_ms: 1,
        })
        .build()
        .start();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(Arc::strong_count(&commands) > 1);

    drop(handle);
    tokio::time::timeout(Duration::from_secs(5), async {
        while Arc::strong_count(&commands) > 1 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await?;
    Ok(())
}
