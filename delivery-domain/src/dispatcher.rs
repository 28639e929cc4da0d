//! 分配服务（Dispatcher）
//!
//! 无状态领域服务：为一个订单在候选骑手中选出预计送达时间最短者，
//! 并同时完成“骑手取单 + 订单分配”。任何失败路径都不修改订单。
//!
use crate::courier::Courier;
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::order::Order;

/// 订单分配策略
pub trait Dispatcher: Send + Sync {
    /// 选出骑手并完成取单与分配，返回选中的骑手
    fn dispatch<'a>(
        &self,
        order: &mut Order,
        couriers: &'a mut [Courier],
    ) -> DomainResult<&'a Courier>;
}

/// 选择 `距离 / 速度` 最小的骑手；并列时保留输入顺序中最早的一个
#[derive(Debug, Clone, Copy, Default)]
pub struct FastestCourierDispatcher;

impl FastestCourierDispatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Dispatcher for FastestCourierDispatcher {
    fn dispatch<'a>(
        &self,
        order: &mut Order,
        couriers: &'a mut [Courier],
    ) -> DomainResult<&'a Courier> {
        order.validate_assign()?;

        let mut best: Option<(usize, f64)> = None;
        for (index, courier) in couriers.iter().enumerate() {
            if !courier.can_take_order(order) {
                continue;
            }
            let time = courier.calculate_time_to_location(order.location());
            if best.is_none_or(|(_, best_time)| time < best_time) {
                best = Some((index, time));
            }
        }

        let Some((index, _)) = best else {
            return Err(DomainError::CourierNotFound {
                order_id: order.id().to_string(),
            });
        };

        let winner = &mut couriers[index];
        winner.take_order(order)?;
        order.assign(*winner.id())?;

        Ok(winner)
    }
}
