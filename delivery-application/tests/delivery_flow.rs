use anyhow::Result as AnyResult;
use delivery_application::command_bus::CommandBus;
use delivery_application::commands::{
    AddCourierStorage, AssignCourier, CreateCourier, CreateOrder, MoveCouriers,
};
use delivery_application::context::AppContext;
use delivery_application::dto::{CourierDto, LocationDto, OrderDto};
use delivery_application::error::AppError;
use delivery_application::geo::FixedGeoLocator;
use delivery_application::queries::{GetCouriers, GetIncompleteOrders};
use delivery_application::query_bus::QueryBus;
use delivery_application::{InMemoryCommandBus, InMemoryQueryBus, register_delivery_handlers};
use delivery_domain::error::{DomainError, ErrorKind};
use delivery_domain::ids::{CourierId, OrderId};
use delivery_domain::location::Location;
use delivery_domain::order::{Order, OrderStatus};
use delivery_domain::repository::OrderRepository;
use delivery_domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use delivery_infra::{InMemoryStore, InMemoryUnitOfWorkFactory};
use std::sync::Arc;

struct App {
    commands: InMemoryCommandBus,
    queries: InMemoryQueryBus,
    ctx: AppContext,
}

impl App {
    /// 所有地址都解析到 `(x, y)`
    fn new(x: i32, y: i32) -> AnyResult<Self> {
        let commands = InMemoryCommandBus::new();
        let queries = InMemoryQueryBus::new();
        let factory = Arc::new(InMemoryUnitOfWorkFactory::new(InMemoryStore::new()));
        register_delivery_handlers(
            &commands,
            &queries,
            factory,
            Arc::new(FixedGeoLocator(Location::new(x, y)?)),
        )?;
        let ctx = AppContext::builder()
            .correlation_id("test".into())
            .actor("tester".into())
            .build();
        Ok(Self {
            commands,
            queries,
            ctx,
        })
    }

    async fn courier(&self, name: &str, speed: i32, x: i32, y: i32) -> AnyResult<CourierId> {
        let id = self
            .commands
            .dispatch(
                &self.ctx,
                CreateCourier {
                    name: name.into(),
                    speed,
                    location: Location::new(x, y)?,
                },
            )
            .await?;
        Ok(id)
    }

    async fn order(&self, volume: i32) -> AnyResult<OrderId> {
        let order_id = OrderId::new();
        self.commands
            .dispatch(
                &self.ctx,
                CreateOrder {
                    order_id,
                    street: "Main street 1".into(),
                    volume,
                },
            )
            .await?;
        Ok(order_id)
    }

    async fn couriers(&self) -> AnyResult<Vec<CourierDto>> {
        Ok(self.queries.dispatch(&self.ctx, GetCouriers).await?)
    }

    async fn incomplete_orders(&self) -> AnyResult<Vec<OrderDto>> {
        Ok(self.queries.dispatch(&self.ctx, GetIncompleteOrders).await?)
    }
}

#[tokio::test]
async fn order_is_assigned_moved_and_delivered() -> AnyResult<()> {
    let app = App::new(5, 5)?;
    let courier_id = app.courier("Bike", 3, 1, 1).await?;
    let order_id = app.order(5).await?;

    let assignment = app.commands.dispatch(&app.ctx, AssignCourier).await?;
    assert_eq!(assignment.order_id, order_id);
    assert_eq!(assignment.courier_id, courier_id);

    let orders = app.incomplete_orders().await?;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, "assigned");
    assert_eq!(orders[0].courier_id, Some(courier_id));
    let couriers = app.couriers().await?;
    assert_eq!(couriers[0].storage_places[0].order_id, Some(order_id));

    let mut path = Vec::new();
    for _ in 0..3 {
        let report = app.commands.dispatch(&app.ctx, MoveCouriers).await?;
        assert_eq!(report.moved, 1);
        path.push(app.couriers().await?[0].location);
    }
    assert_eq!(
        path,
        vec![
            LocationDto { x: 4, y: 1 },
            LocationDto { x: 5, y: 3 },
            LocationDto { x: 5, y: 5 },
        ]
    );

    assert!(app.incomplete_orders().await?.is_empty());
    assert_eq!(app.couriers().await?[0].storage_places[0].order_id, None);

    let idle = app.commands.dispatch(&app.ctx, MoveCouriers).await?;
    assert_eq!(idle.moved, 0);
    assert!(idle.completed.is_empty());
    Ok(())
}

#[tokio::test]
async fn completion_is_reported_on_the_arrival_tick() -> AnyResult<()> {
    let app = App::new(2, 1)?;
    app.courier("Car", 5, 1, 1).await?;
    let order_id = app.order(1).await?;
    app.commands.dispatch(&app.ctx, AssignCourier).await?;

    let report = app.commands.dispatch(&app.ctx, MoveCouriers).await?;
    assert_eq!(report.completed, vec![order_id]);
    Ok(())
}

#[tokio::test]
async fn assign_without_pending_order_is_idle() -> AnyResult<()> {
    let app = App::new(5, 5)?;
    app.courier("Bike", 3, 1, 1).await?;

    let err = app
        .commands
        .dispatch(&app.ctx, AssignCourier)
        .await
        .unwrap_err();
    assert!(err.is_idle());
    assert!(matches!(err, AppError::Domain(DomainError::NoPendingOrder)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    Ok(())
}

#[tokio::test]
async fn dangling_courier_reference_is_not_idle() -> AnyResult<()> {
    let factory = Arc::new(InMemoryUnitOfWorkFactory::new(InMemoryStore::new()));
    let commands = InMemoryCommandBus::new();
    let queries = InMemoryQueryBus::new();
    register_delivery_handlers(
        &commands,
        &queries,
        factory.clone(),
        Arc::new(FixedGeoLocator(Location::new(5, 5)?)),
    )?;

    // 已分配订单引用了一个不存在的骑手
    let orphan = Order::restore(
        OrderId::new(),
        Location::new(5, 5)?,
        1,
        OrderStatus::Assigned,
        Some(CourierId::new()),
    )?;
    factory.create().orders().add(&orphan).await?;

    let err = commands
        .dispatch(&AppContext::system("test"), MoveCouriers)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(!err.is_idle());
    Ok(())
}

#[tokio::test]
async fn assign_without_capable_courier_keeps_order_created() -> AnyResult<()> {
    let app = App::new(5, 5)?;
    app.courier("Bike", 3, 1, 1).await?;
    // 默认存储位容量为 10
    app.order(11).await?;

    let err = app
        .commands
        .dispatch(&app.ctx, AssignCourier)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::CourierNotFound { .. })
    ));
    assert!(err.is_idle());

    let orders = app.incomplete_orders().await?;
    assert_eq!(orders[0].status, "created");
    assert_eq!(orders[0].courier_id, None);
    assert!(app.couriers().await?[0].storage_places[0].order_id.is_none());
    Ok(())
}

#[tokio::test]
async fn busy_couriers_are_not_candidates() -> AnyResult<()> {
    let app = App::new(9, 9)?;
    let courier_id = app.courier("Bike", 1, 1, 1).await?;
    app.commands
        .dispatch(
            &app.ctx,
            AddCourierStorage {
                courier_id,
                name: "Box".into(),
                total_volume: 5,
            },
        )
        .await?;

    app.order(1).await?;
    app.order(1).await?;
    app.commands.dispatch(&app.ctx, AssignCourier).await?;

    // 虽然还有空闲存储位，但骑手已持有配送中的订单
    let err = app
        .commands
        .dispatch(&app.ctx, AssignCourier)
        .await
        .unwrap_err();
    assert!(err.is_idle());
    Ok(())
}

#[tokio::test]
async fn oldest_created_order_is_assigned_first() -> AnyResult<()> {
    let app = App::new(5, 5)?;
    app.courier("A", 1, 1, 1).await?;
    app.courier("B", 1, 2, 2).await?;
    let first = app.order(1).await?;
    let second = app.order(1).await?;

    let a = app.commands.dispatch(&app.ctx, AssignCourier).await?;
    let b = app.commands.dispatch(&app.ctx, AssignCourier).await?;
    assert_eq!(a.order_id, first);
    assert_eq!(b.order_id, second);
    assert_ne!(a.courier_id, b.courier_id);
    Ok(())
}

#[tokio::test]
async fn create_order_is_idempotent() -> AnyResult<()> {
    let app = App::new(5, 5)?;
    let order_id = OrderId::new();
    for volume in [3, 7] {
        app.commands
            .dispatch(
                &app.ctx,
                CreateOrder {
                    order_id,
                    street: "Main street 1".into(),
                    volume,
                },
            )
            .await?;
    }

    let orders = app.incomplete_orders().await?;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, order_id);
    assert_eq!(orders[0].volume, 3);
    assert_eq!(orders[0].location, LocationDto { x: 5, y: 5 });
    Ok(())
}

#[tokio::test]
async fn invalid_commands_report_every_field_and_write_nothing() -> AnyResult<()> {
    let app = App::new(5, 5)?;

    let err = app
        .commands
        .dispatch(
            &app.ctx,
            CreateCourier {
                name: " ".into(),
                speed: 0,
                location: Location::new(1, 1)?,
            },
        )
        .await
        .unwrap_err();
    match &err {
        AppError::Validation(v) => {
            assert_eq!(v.len(), 2);
            assert!(v.contains("name") && v.contains("speed"));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = app
        .commands
        .dispatch(
            &app.ctx,
            CreateOrder {
                order_id: OrderId::new(),
                street: String::new(),
                volume: -1,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(v) if v.len() == 2));

    assert!(app.couriers().await?.is_empty());
    assert!(app.incomplete_orders().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn storage_can_be_added_to_existing_couriers_only() -> AnyResult<()> {
    let app = App::new(5, 5)?;

    let err = app
        .commands
        .dispatch(
            &app.ctx,
            AddCourierStorage {
                courier_id: CourierId::new(),
                name: "Trunk".into(),
                total_volume: 30,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let courier_id = app.courier("Van", 2, 1, 1).await?;
    let place_id = app
        .commands
        .dispatch(
            &app.ctx,
            AddCourierStorage {
                courier_id,
                name: "Trunk".into(),
                total_volume: 30,
            },
        )
        .await?;

    let couriers = app.couriers().await?;
    assert_eq!(couriers[0].storage_places.len(), 2);
    assert_eq!(couriers[0].storage_places[1].id, place_id);

    // 只有新加的存储位放得下
    let order_id = app.order(25).await?;
    app.commands.dispatch(&app.ctx, AssignCourier).await?;
    assert_eq!(
        app.couriers().await?[0].storage_places[1].order_id,
        Some(order_id)
    );
    Ok(())
}

#[tokio::test]
async fn dto_serializes_to_plain_json() -> AnyResult<()> {
    let app = App::new(3, 4)?;
    let order_id = app.order(2).await?;

    let json = serde_json::to_value(app.incomplete_orders().await?)?;
    assert_eq!(json[0]["id"], order_id.to_string());
    assert_eq!(json[0]["status"], "created");
    assert_eq!(json[0]["location"], serde_json::json!({ "x": 3, "y": 4 }));
    assert!(json[0]["courier_id"].is_null());
    Ok(())
}
