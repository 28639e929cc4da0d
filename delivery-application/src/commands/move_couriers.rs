use crate::command::Command;
use crate::command_handler::CommandHandler;
use crate::context::AppContext;
use crate::error::AppError;
use crate::transaction::release;
use async_trait::async_trait;
use delivery_domain::entity::Entity;
use delivery_domain::error::DomainError;
use delivery_domain::ids::OrderId;
use delivery_domain::repository::{CourierRepository, OrderRepository};
use delivery_domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use serde::Serialize;
use std::sync::Arc;

/// 推进一个节拍：每个已分配订单的骑手朝订单位置移动一次，到达即完成订单
///
/// 全部订单在同一事务内处理，任一订单失败则整个节拍回滚。
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveCouriers;

/// 一个节拍的处理结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    /// 本节拍移动过的骑手数（每个已分配订单一次）
    pub moved: usize,
    /// 本节拍送达的订单
    pub completed: Vec<OrderId>,
}

impl Command for MoveCouriers {
    const NAME: &'static str = "delivery.move_couriers";
    type Output = MoveReport;
}

pub struct MoveCouriersHandler<F> {
    factory: Arc<F>,
}

impl<F: UnitOfWorkFactory> MoveCouriersHandler<F> {
    pub fn new(factory: Arc<F>) -> Self {
        Self { factory }
    }

    async fn execute(&self, uow: &mut F::UnitOfWork) -> Result<MoveReport, AppError> {
        uow.begin().await?;

        let assigned = uow.orders().get_all_in_assigned_status().await?;
        let mut report = MoveReport::default();
        for mut order in assigned {
            let courier_id = order.courier_id().ok_or_else(|| DomainError::InvalidState {
                reason: format!("assigned order {} has no courier", order.id()),
            })?;
            let mut courier = uow.couriers().get(courier_id).await?;

            courier.move_towards(order.location())?;
            if courier.location() == order.location() {
                order.complete()?;
                courier.complete_order(*order.id())?;
                uow.orders().update(&order).await?;
                report.completed.push(*order.id());
                tracing::info!(order_id = %order.id(), courier_id = %courier_id, "order delivered");
            }
            uow.couriers().update(&courier).await?;
            report.moved += 1;
        }

        uow.commit().await?;

        if report.moved == 0 {
            tracing::debug!("no assigned orders to move");
        } else {
            tracing::debug!(
                moved = report.moved,
                completed = report.completed.len(),
                "couriers moved"
            );
        }
        Ok(report)
    }
}

#[async_trait]
impl<F> CommandHandler<MoveCouriers> for MoveCouriersHandler<F>
where
    F: UnitOfWorkFactory + 'static,
{
    async fn handle(&self, _ctx: &AppContext, cmd: MoveCouriers) -> Result<MoveReport, AppError> {
        cmd.validate()?;
        let mut uow = self.factory.create();
        let result = self.execute(&mut uow).await;
        release(&mut uow).await;
        result
    }
}
