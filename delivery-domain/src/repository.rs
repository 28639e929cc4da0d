//! 仓储接口（Repository）
//!
//! 领域层只定义协议：订单与骑手两个聚合各自一个仓储。
//! 仓储句柄由工作单元提供，事务内调用写入同一事务，事务外调用立即生效。
//!
use crate::courier::Courier;
use crate::error::DomainResult;
use crate::ids::{CourierId, OrderId};
use crate::order::Order;
use async_trait::async_trait;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 新增订单；标识已存在时返回 `AlreadyExists`
    async fn add(&self, order: &Order) -> DomainResult<()>;

    /// 更新订单；不存在时返回 `NotFound`
    async fn update(&self, order: &Order) -> DomainResult<()>;

    async fn get(&self, id: OrderId) -> DomainResult<Order>;

    /// 最早创建、仍处于 `Created` 的订单；没有时返回 `NoPendingOrder`
    async fn get_first_in_created_status(&self) -> DomainResult<Order>;

    /// 全部 `Assigned` 订单，按创建顺序；没有时返回空集合
    async fn get_all_in_assigned_status(&self) -> DomainResult<Vec<Order>>;

    /// 全部未完成（`Created` 或 `Assigned`）订单，按创建顺序
    async fn get_all_incomplete(&self) -> DomainResult<Vec<Order>>;
}

#[async_trait]
pub trait CourierRepository: Send + Sync {
    /// 新增骑手（连同存储位）；标识已存在时返回 `AlreadyExists`
    async fn add(&self, courier: &Courier) -> DomainResult<()>;

    /// 更新骑手（连同存储位）；不存在时返回 `NotFound`
    async fn update(&self, courier: &Courier) -> DomainResult<()>;

    async fn get(&self, id: CourierId) -> DomainResult<Courier>;

    /// 未持有任何 `Assigned` 订单的骑手，按创建顺序
    async fn get_all_free(&self) -> DomainResult<Vec<Courier>>;

    /// 全部骑手，按创建顺序
    async fn get_all(&self) -> DomainResult<Vec<Courier>>;
}
