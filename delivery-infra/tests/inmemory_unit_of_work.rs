use anyhow::Result as AnyResult;
use delivery_domain::courier::Courier;
use delivery_domain::entity::Entity;
use delivery_domain::error::DomainError;
use delivery_domain::ids::{CourierId, OrderId};
use delivery_domain::location::Location;
use delivery_domain::order::{Order, OrderStatus};
use delivery_domain::repository::{CourierRepository, OrderRepository};
use delivery_domain::unit_of_work::{TrackedAggregate, UnitOfWork, UnitOfWorkFactory};
use delivery_infra::{InMemoryStore, InMemoryUnitOfWorkFactory};
use std::time::Duration;

fn factory() -> InMemoryUnitOfWorkFactory {
    InMemoryUnitOfWorkFactory::new(InMemoryStore::new())
}

fn order(x: i32, y: i32, volume: i32) -> AnyResult<Order> {
    Ok(Order::new(OrderId::new(), Location::new(x, y)?, volume)?)
}

fn courier(name: &str, speed: i32) -> AnyResult<Courier> {
    Ok(Courier::new(CourierId::new(), name, speed, Location::new(1, 1)?)?)
}

#[tokio::test]
async fn committed_writes_are_visible_to_new_units() -> AnyResult<()> {
    let factory = factory();
    let o = order(3, 3, 2)?;
    let c = courier("Bike", 2)?;

    let mut uow = factory.create();
    uow.begin().await?;
    uow.orders().add(&o).await?;
    uow.couriers().add(&c).await?;
    uow.commit().await?;
    assert!(!uow.is_active());

    let reader = factory.create();
    assert_eq!(reader.orders().get(*o.id()).await?, o);
    assert_eq!(reader.couriers().get(*c.id()).await?, c);
    Ok(())
}

#[tokio::test]
async fn rollback_discards_every_write() -> AnyResult<()> {
    let factory = factory();
    let o = order(3, 3, 2)?;
    let c = courier("Bike", 2)?;

    let mut uow = factory.create();
    uow.begin().await?;
    uow.orders().add(&o).await?;
    uow.couriers().add(&c).await?;
    uow.rollback().await?;

    let reader = factory.create();
    assert!(reader.orders().get(*o.id()).await.unwrap_err().is_not_found());
    assert!(reader.couriers().get(*c.id()).await.unwrap_err().is_not_found());
    Ok(())
}

#[tokio::test]
async fn dropping_an_active_unit_discards_and_releases_the_gate() -> AnyResult<()> {
    let factory = factory();
    let o = order(3, 3, 2)?;

    {
        let mut uow = factory.create();
        uow.begin().await?;
        uow.orders().add(&o).await?;
    }

    let mut next = factory.create();
    tokio::time::timeout(Duration::from_secs(1), next.begin()).await??;
    assert!(next.orders().get(*o.id()).await.unwrap_err().is_not_found());
    next.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn writes_without_transaction_apply_immediately() -> AnyResult<()> {
    let factory = factory();
    let o = order(5, 5, 1)?;

    let uow = factory.create();
    assert!(!uow.is_active());
    uow.orders().add(&o).await?;

    let reader = factory.create();
    assert_eq!(reader.orders().get(*o.id()).await?, o);
    Ok(())
}

#[tokio::test]
async fn uncommitted_writes_are_isolated() -> AnyResult<()> {
    let factory = factory();
    let o = order(2, 8, 4)?;

    let mut writer = factory.create();
    writer.begin().await?;
    writer.orders().add(&o).await?;

    let reader = factory.create();
    assert!(reader.orders().get(*o.id()).await.unwrap_err().is_not_found());
    assert_eq!(writer.orders().get(*o.id()).await?, o);

    writer.commit().await?;
    assert_eq!(reader.orders().get(*o.id()).await?, o);
    Ok(())
}

#[tokio::test]
async fn repository_handles_bind_at_call_time() -> AnyResult<()> {
    let factory = factory();
    let o = order(2, 2, 1)?;

    let mut uow = factory.create();
    let orders = uow.orders();
    uow.begin().await?;
    orders.add(&o).await?;
    uow.rollback().await?;

    assert!(factory.create().orders().get(*o.id()).await.is_err());
    Ok(())
}

#[tokio::test]
async fn begin_twice_is_a_single_transaction() -> AnyResult<()> {
    let factory = factory();
    let mut uow = factory.create();

    uow.begin().await?;
    uow.begin().await?;
    assert!(uow.is_active());

    uow.commit().await?;
    assert!(matches!(
        uow.commit().await,
        Err(DomainError::InvalidTransaction { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn commit_or_rollback_without_transaction_fails() {
    let mut uow = factory().create();
    assert!(matches!(
        uow.commit().await,
        Err(DomainError::InvalidTransaction { .. })
    ));
    assert!(matches!(
        uow.rollback().await,
        Err(DomainError::InvalidTransaction { .. })
    ));
}

#[tokio::test]
async fn transactions_are_serialized() -> AnyResult<()> {
    let factory = factory();
    let mut first = factory.create();
    let mut second = factory.create();

    first.begin().await?;
    let blocked = tokio::time::timeout(Duration::from_millis(50), second.begin()).await;
    assert!(blocked.is_err(), "second transaction must wait for the first");

    first.commit().await?;
    tokio::time::timeout(Duration::from_secs(1), second.begin()).await??;
    assert!(second.is_active());
    second.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn add_and_update_report_conflicts() -> AnyResult<()> {
    let uow = factory().create();
    let o = order(1, 1, 1)?;
    let c = courier("Car", 3)?;

    assert!(uow.orders().update(&o).await.unwrap_err().is_not_found());
    assert!(uow.couriers().update(&c).await.unwrap_err().is_not_found());

    uow.orders().add(&o).await?;
    uow.couriers().add(&c).await?;
    assert!(matches!(
        uow.orders().add(&o).await,
        Err(DomainError::AlreadyExists { .. })
    ));
    assert!(matches!(
        uow.couriers().add(&c).await,
        Err(DomainError::AlreadyExists { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn only_successful_writes_are_tracked() -> AnyResult<()> {
    let mut uow = factory().create();
    let o = order(1, 1, 1)?;
    let c = courier("Car", 3)?;

    uow.begin().await?;
    uow.orders().add(&o).await?;
    let _ = uow.orders().add(&o).await;
    uow.couriers().add(&c).await?;
    uow.commit().await?;

    let tracked = uow.tracked_aggregates();
    assert_eq!(tracked.len(), 2);
    assert_eq!(tracked[0], TrackedAggregate::Order(o.clone()));
    assert_eq!(tracked[1].aggregate_type(), "courier");
    assert_eq!(tracked[1].aggregate_id(), c.id().value());
    Ok(())
}

#[tokio::test]
async fn order_queries_follow_creation_order() -> AnyResult<()> {
    let uow = factory().create();
    let orders = uow.orders();

    assert!(matches!(
        orders.get_first_in_created_status().await.unwrap_err(),
        DomainError::NoPendingOrder
    ));
    assert!(orders.get_all_in_assigned_status().await?.is_empty());

    let first = order(1, 1, 1)?;
    let mut second = order(2, 2, 1)?;
    let mut third = order(3, 3, 1)?;
    for o in [&first, &second, &third] {
        orders.add(o).await?;
    }

    assert_eq!(orders.get_first_in_created_status().await?, first);

    second.assign(CourierId::new())?;
    orders.update(&second).await?;
    third.assign(CourierId::new())?;
    third.complete()?;
    orders.update(&third).await?;

    let assigned = orders.get_all_in_assigned_status().await?;
    assert_eq!(assigned, vec![second.clone()]);

    let incomplete = orders.get_all_incomplete().await?;
    assert_eq!(incomplete, vec![first.clone(), second.clone()]);
    assert!(incomplete.iter().all(|o| o.status() != OrderStatus::Completed));
    Ok(())
}

#[tokio::test]
async fn free_couriers_exclude_those_with_assigned_orders() -> AnyResult<()> {
    let uow = factory().create();
    let busy = courier("Busy", 1)?;
    let done = courier("Done", 1)?;
    let idle = courier("Idle", 1)?;
    for c in [&busy, &done, &idle] {
        uow.couriers().add(c).await?;
    }

    let mut assigned = order(4, 4, 1)?;
    assigned.assign(*busy.id())?;
    uow.orders().add(&assigned).await?;

    let mut completed = order(5, 5, 1)?;
    completed.assign(*done.id())?;
    completed.complete()?;
    uow.orders().add(&completed).await?;

    let free: Vec<CourierId> = uow
        .couriers()
        .get_all_free()
        .await?
        .iter()
        .map(|c| *c.id())
        .collect();
    assert_eq!(free, vec![*done.id(), *idle.id()]);

    let all = uow.couriers().get_all().await?;
    assert_eq!(all.len(), 3);
    Ok(())
}

#[tokio::test]
async fn courier_updates_keep_storage_places() -> AnyResult<()> {
    let uow = factory().create();
    let mut c = courier("Van", 2)?;
    uow.couriers().add(&c).await?;

    c.add_storage_place("Trunk", 40)?;
    let o = order(6, 6, 30)?;
    c.take_order(&o)?;
    c.move_towards(o.location())?;
    uow.couriers().update(&c).await?;

    let loaded = uow.couriers().get(*c.id()).await?;
    assert_eq!(loaded, c);
    assert_eq!(loaded.storage_places()[1].order_id(), Some(*o.id()));
    Ok(())
}
