use super::unit_of_work::Session;
use async_trait::async_trait;
use delivery_domain::courier::Courier;
use delivery_domain::entity::Entity;
use delivery_domain::error::{DomainError, DomainResult};
use delivery_domain::ids::{CourierId, OrderId};
use delivery_domain::order::{Order, OrderStatus};
use delivery_domain::repository::{CourierRepository, OrderRepository};
use std::sync::Arc;

/// 订单仓储句柄；每次调用时按会话当前状态决定读写事务副本还是已提交数据
#[derive(Clone)]
pub struct InMemoryOrderRepository {
    session: Arc<Session>,
}

impl InMemoryOrderRepository {
    pub(crate) fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn add(&self, order: &Order) -> DomainResult<()> {
        self.session
            .write(|tables, dirty| {
                tables.insert_order(order)?;
                dirty.order(order.id().value());
                Ok(())
            })
            .await?;
        self.session.tracker.track(order);
        Ok(())
    }

    async fn update(&self, order: &Order) -> DomainResult<()> {
        self.session
            .write(|tables, dirty| {
                tables.update_order(order)?;
                dirty.order(order.id().value());
                Ok(())
            })
            .await?;
        self.session.tracker.track(order);
        Ok(())
    }

    async fn get(&self, id: OrderId) -> DomainResult<Order> {
        self.session.read(|tables| tables.order(id.value())).await
    }

    async fn get_first_in_created_status(&self) -> DomainResult<Order> {
        let created = OrderStatus::Created.code();
        self.session
            .read(|tables| tables.orders_where(|row| row.status == created))
            .await?
            .into_iter()
            .next()
            .ok_or(DomainError::NoPendingOrder)
    }

    async fn get_all_in_assigned_status(&self) -> DomainResult<Vec<Order>> {
        let assigned = OrderStatus::Assigned.code();
        self.session
            .read(|tables| tables.orders_where(|row| row.status == assigned))
            .await
    }

    async fn get_all_incomplete(&self) -> DomainResult<Vec<Order>> {
        let completed = OrderStatus::Completed.code();
        self.session
            .read(|tables| tables.orders_where(|row| row.status != completed))
            .await
    }
}

/// 骑手仓储句柄
#[derive(Clone)]
pub struct InMemoryCourierRepository {
    session: Arc<Session>,
}

impl InMemoryCourierRepository {
    pub(crate) fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl CourierRepository for InMemoryCourierRepository {
    async fn add(&self, courier: &Courier) -> DomainResult<()> {
        self.session
            .write(|tables, dirty| {
                tables.insert_courier(courier)?;
                dirty.courier(courier.id().value());
                Ok(())
            })
            .await?;
        self.session.tracker.track(courier);
        Ok(())
    }

    async fn update(&self, courier: &Courier) -> DomainResult<()> {
        self.session
            .write(|tables, dirty| {
                tables.update_courier(courier)?;
                dirty.courier(courier.id().value());
                Ok(())
            })
            .await?;
        self.session.tracker.track(courier);
        Ok(())
    }

    async fn get(&self, id: CourierId) -> DomainResult<Courier> {
        self.session.read(|tables| tables.courier(id.value())).await
    }

    async fn get_all_free(&self) -> DomainResult<Vec<Courier>> {
        self.session
            .read(|tables| {
                let busy = tables.busy_couriers();
                tables.couriers_where(|row| !busy.contains(&row.id))
            })
            .await
    }

    async fn get_all(&self) -> DomainResult<Vec<Courier>> {
        self.session
            .read(|tables| tables.couriers_where(|_| true))
            .await
    }
}
