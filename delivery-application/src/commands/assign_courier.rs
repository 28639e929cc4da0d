use crate::command::Command;
use crate::command_handler::CommandHandler;
use crate::context::AppContext;
use crate::error::AppError;
use crate::transaction::release;
use async_trait::async_trait;
use delivery_domain::dispatcher::{Dispatcher, FastestCourierDispatcher};
use delivery_domain::entity::Entity;
use delivery_domain::ids::{CourierId, OrderId};
use delivery_domain::repository::{CourierRepository, OrderRepository};
use delivery_domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use serde::Serialize;
use std::sync::Arc;

/// 为最早的待分配订单挑选骑手
///
/// 没有待分配订单时返回 `NotFound`，没有可接单的空闲骑手时返回 `CourierNotFound`，
/// 两种情况都不修改任何数据。
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignCourier;

/// 一次成功分配的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub order_id: OrderId,
    pub courier_id: CourierId,
}

impl Command for AssignCourier {
    const NAME: &'static str = "delivery.assign_courier";
    type Output = Assignment;
}

pub struct AssignCourierHandler<F> {
    factory: Arc<F>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl<F: UnitOfWorkFactory> AssignCourierHandler<F> {
    /// 使用按预计送达时间选择的默认策略
    pub fn new(factory: Arc<F>) -> Self {
        Self::with_dispatcher(factory, Arc::new(FastestCourierDispatcher::new()))
    }

    pub fn with_dispatcher(factory: Arc<F>, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            factory,
            dispatcher,
        }
    }

    async fn execute(&self, uow: &mut F::UnitOfWork) -> Result<Assignment, AppError> {
        uow.begin().await?;

        let mut order = uow.orders().get_first_in_created_status().await?;
        let mut couriers = uow.couriers().get_all_free().await?;
        let courier = self.dispatcher.dispatch(&mut order, &mut couriers)?;

        uow.orders().update(&order).await?;
        uow.couriers().update(courier).await?;
        uow.commit().await?;

        let assignment = Assignment {
            order_id: *order.id(),
            courier_id: *courier.id(),
        };
        tracing::info!(
            order_id = %assignment.order_id,
            courier_id = %assignment.courier_id,
            "courier assigned"
        );
        Ok(assignment)
    }
}

#[async_trait]
impl<F> CommandHandler<AssignCourier> for AssignCourierHandler<F>
where
    F: UnitOfWorkFactory + 'static,
{
    async fn handle(&self, _ctx: &AppContext, cmd: AssignCourier) -> Result<Assignment, AppError> {
        cmd.validate()?;
        let mut uow = self.factory.create();
        let result = self.execute(&mut uow).await;
        release(&mut uow).await;
        result
    }
}
