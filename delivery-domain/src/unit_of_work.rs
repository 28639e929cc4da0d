//! 工作单元（Unit of Work）
//!
//! 一个实例对应一个事务边界，供单条命令使用：
//! - `begin/commit/rollback` 是唯一改变事务状态的入口，必须显式提交；
//! - `orders()/couriers()` 返回共享同一事务会话的仓储句柄；
//! - 每次成功写入都会记录聚合快照，仅用于观察（例如后续的事件发布）。
//!
use crate::aggregate::Aggregate;
use crate::courier::Courier;
use crate::entity::Entity;
use crate::error::DomainResult;
use crate::order::Order;
use crate::repository::{CourierRepository, OrderRepository};
use async_trait::async_trait;
use uuid::Uuid;

/// 工作单元内被写入过的聚合快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackedAggregate {
    Order(Order),
    Courier(Courier),
}

impl TrackedAggregate {
    pub fn aggregate_type(&self) -> &'static str {
        match self {
            TrackedAggregate::Order(_) => Order::TYPE,
            TrackedAggregate::Courier(_) => Courier::TYPE,
        }
    }

    pub fn aggregate_id(&self) -> Uuid {
        match self {
            TrackedAggregate::Order(order) => order.id().value(),
            TrackedAggregate::Courier(courier) => courier.id().value(),
        }
    }
}

impl From<&Order> for TrackedAggregate {
    fn from(order: &Order) -> Self {
        TrackedAggregate::Order(order.clone())
    }
}

impl From<&Courier> for TrackedAggregate {
    fn from(courier: &Courier) -> Self {
        TrackedAggregate::Courier(courier.clone())
    }
}

#[async_trait]
pub trait UnitOfWork: Send {
    type Orders: OrderRepository;
    type Couriers: CourierRepository;

    /// 开启事务；已开启时为幂等空操作
    async fn begin(&mut self) -> DomainResult<()>;

    /// 提交事务；没有活动事务时返回 `InvalidTransaction`
    async fn commit(&mut self) -> DomainResult<()>;

    /// 回滚事务；没有活动事务时返回 `InvalidTransaction`
    async fn rollback(&mut self) -> DomainResult<()>;

    /// 是否存在活动事务
    fn is_active(&self) -> bool;

    /// 订单仓储：有活动事务时绑定事务，否则直接作用于存储
    fn orders(&self) -> Self::Orders;

    /// 骑手仓储：有活动事务时绑定事务，否则直接作用于存储
    fn couriers(&self) -> Self::Couriers;

    /// 本工作单元内成功写入过的聚合（按写入顺序）
    fn tracked_aggregates(&self) -> Vec<TrackedAggregate>;
}

/// 工作单元工厂：每条命令获取一个全新、互相隔离的工作单元
pub trait UnitOfWorkFactory: Send + Sync {
    type UnitOfWork: UnitOfWork + 'static;

    fn create(&self) -> Self::UnitOfWork;
}
