use super::queries;
use super::unit_of_work::PgSession;
use crate::rows::{CourierRow, OrderRow};
use async_trait::async_trait;
use delivery_domain::courier::Courier;
use delivery_domain::error::{DomainError, DomainResult};
use delivery_domain::ids::{CourierId, OrderId};
use delivery_domain::order::{Order, OrderStatus};
use delivery_domain::repository::{CourierRepository, OrderRepository};
use futures_util::FutureExt;
use std::sync::Arc;

#[derive(Clone)]
pub struct PgOrderRepository {
    session: Arc<PgSession>,
}

impl PgOrderRepository {
    pub(crate) fn new(session: Arc<PgSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn add(&self, order: &Order) -> DomainResult<()> {
        let row = OrderRow::from_order(order);
        self.session
            .run(move |conn| async move { queries::insert_order(conn, &row).await }.boxed())
            .await?;
        self.session.tracker.track(order);
        Ok(())
    }

    async fn update(&self, order: &Order) -> DomainResult<()> {
        let row = OrderRow::from_order(order);
        self.session
            .run(move |conn| async move { queries::update_order(conn, &row).await }.boxed())
            .await?;
        self.session.tracker.track(order);
        Ok(())
    }

    async fn get(&self, id: OrderId) -> DomainResult<Order> {
        let id = id.value();
        self.session
            .run(move |conn| queries::find_order(conn, id).boxed())
            .await?
            .into_order()
    }

    async fn get_first_in_created_status(&self) -> DomainResult<Order> {
        let created = OrderStatus::Created.code();
        self.session
            .run(move |conn| queries::first_order_with_status(conn, created).boxed())
            .await?
            .ok_or(DomainError::NoPendingOrder)?
            .into_order()
    }

    async fn get_all_in_assigned_status(&self) -> DomainResult<Vec<Order>> {
        let assigned = OrderStatus::Assigned.code();
        self.session
            .run(move |conn| queries::orders_with_status(conn, assigned).boxed())
            .await?
            .into_iter()
            .map(OrderRow::into_order)
            .collect()
    }

    async fn get_all_incomplete(&self) -> DomainResult<Vec<Order>> {
        let completed = OrderStatus::Completed.code();
        self.session
            .run(move |conn| queries::orders_without_status(conn, completed).boxed())
            .await?
            .into_iter()
            .map(OrderRow::into_order)
            .collect()
    }
}

#[derive(Clone)]
pub struct PgCourierRepository {
    session: Arc<PgSession>,
}

impl PgCourierRepository {
    pub(crate) fn new(session: Arc<PgSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl CourierRepository for PgCourierRepository {
    async fn add(&self, courier: &Courier) -> DomainResult<()> {
        let (row, places) = CourierRow::from_courier(courier);
        self.session
            .run(move |conn| {
                async move { queries::insert_courier(conn, &row, &places).await }.boxed()
            })
            .await?;
        self.session.tracker.track(courier);
        Ok(())
    }

    async fn update(&self, courier: &Courier) -> DomainResult<()> {
        let (row, places) = CourierRow::from_courier(courier);
        self.session
            .run(move |conn| {
                async move { queries::update_courier(conn, &row, &places).await }.boxed()
            })
            .await?;
        self.session.tracker.track(courier);
        Ok(())
    }

    async fn get(&self, id: CourierId) -> DomainResult<Courier> {
        let id = id.value();
        let (row, places) = self
            .session
            .run(move |conn| queries::find_courier(conn, id).boxed())
            .await?;
        row.into_courier(places)
    }

    async fn get_all_free(&self) -> DomainResult<Vec<Courier>> {
        let assigned = OrderStatus::Assigned.code();
        self.session
            .run(move |conn| queries::list_couriers(conn, Some(assigned)).boxed())
            .await?
            .into_iter()
            .map(|(row, places)| row.into_courier(places))
            .collect()
    }

    async fn get_all(&self) -> DomainResult<Vec<Courier>> {
        self.session
            .run(|conn| queries::list_couriers(conn, None).boxed())
            .await?
            .into_iter()
            .map(|(row, places)| row.into_courier(places))
            .collect()
    }
}
