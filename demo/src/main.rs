use delivery_application::command_bus::CommandBus;
use delivery_application::commands::{AddCourierStorage, CreateCourier, CreateOrder};
use delivery_application::context::AppContext;
use delivery_application::geo::RandomGeoLocator;
use delivery_application::queries::{GetCouriers, GetIncompleteOrders};
use delivery_application::query_bus::QueryBus;
use delivery_application::scheduler::{DeliveryScheduler, SchedulerConfig};
use delivery_application::{InMemoryCommandBus, InMemoryQueryBus, register_delivery_handlers};
use delivery_domain::ids::OrderId;
use delivery_domain::location::Location;
use delivery_infra::{InMemoryStore, InMemoryUnitOfWorkFactory};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// 演示配置，可通过第一个命令行参数给出 JSON 文件路径
#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    scheduler: SchedulerConfig,
    /// 运行时长（毫秒），到时或收到 Ctrl-C 即退出
    run_ms: u64,
    orders: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig {
                assign_interval_ms: 200,
                move_interval_ms: 100,
            },
            run_ms: 5_000,
            orders: 6,
        }
    }
}

fn load_config() -> anyhow::Result<DemoConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(DemoConfig::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,delivery_application=debug")),
        )
        .init();

    let config = load_config()?;
    tracing::info!(?config, "starting delivery demo");

    let commands = Arc::new(InMemoryCommandBus::new());
    let queries = InMemoryQueryBus::new();
    let factory = Arc::new(InMemoryUnitOfWorkFactory::new(InMemoryStore::new()));
    register_delivery_handlers(&commands, &queries, factory, Arc::new(RandomGeoLocator))?;

    let ctx = AppContext::builder()
        .correlation_id("demo-seed".into())
        .actor("demo".into())
        .build();

    for (name, speed, x, y) in [("Pedestrian", 1, 1, 1), ("Bicycle", 2, 5, 5), ("Car", 3, 10, 10)] {
        let courier_id = commands
            .dispatch(
                &ctx,
                CreateCourier {
                    name: name.into(),
                    speed,
                    location: Location::new(x, y)?,
                },
            )
            .await?;
        if name == "Car" {
            commands
                .dispatch(
                    &ctx,
                    AddCourierStorage {
                        courier_id,
                        name: "Trunk".into(),
                        total_volume: 40,
                    },
                )
                .await?;
        }
    }

    for i in 0..config.orders {
        let volume = [2, 5, 9, 15, 30][i % 5];
        commands
            .dispatch(
                &ctx,
                CreateOrder {
                    order_id: OrderId::new(),
                    street: format!("Delivery street {}", i + 1),
                    volume,
                },
            )
            .await?;
    }

    let handle = DeliveryScheduler::builder()
        .bus(commands.clone())
        .config(config.scheduler)
        .build()
        .start();

    tokio::select! {
        _ = tokio::time::sleep(Duration::from_millis(config.run_ms)) => {}
        _ = tokio::signal::ctrl_c() => tracing::info!("interrupted"),
    }
    handle.shutdown();
    handle.join().await;

    let couriers = queries.dispatch(&ctx, GetCouriers).await?;
    let pending = queries.dispatch(&ctx, GetIncompleteOrders).await?;
    println!("couriers:\n{}", serde_json::to_string_pretty(&couriers)?);
    println!("incomplete orders:\n{}", serde_json::to_string_pretty(&pending)?);
    Ok(())
}
