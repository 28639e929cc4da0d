//! 存储位（StoragePlace）
//!
//! 归属于骑手聚合的内部实体：有名称与容量，同一时刻最多放一个订单（按标识引用）。
//! 占用是二元的，不按剩余容量累加。
//!
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult, Violations};
use crate::ids::{OrderId, StoragePlaceId};
use delivery_macros::entity;

#[entity(id = StoragePlaceId)]
#[derive(PartialEq, Eq)]
pub struct StoragePlace {
    name: String,
    total_volume: i32,
    order_id: Option<OrderId>,
}

impl StoragePlace {
    /// 创建空的存储位
    pub fn new(name: impl Into<String>, total_volume: i32) -> DomainResult<Self> {
        Self::restore(StoragePlaceId::new(), name, total_volume, None)
    }

    /// 从持久化状态重建
    pub fn restore(
        id: StoragePlaceId,
        name: impl Into<String>,
        total_volume: i32,
        order_id: Option<OrderId>,
    ) -> DomainResult<Self> {
        let name = name.into();
        let mut violations = Violations::new();
        violations.check(!name.trim().is_empty(), "name", "must not be empty");
        violations.check(
            total_volume > 0,
            "total_volume",
            format!("must be positive, got {total_volume}"),
        );
        violations.into_result()?;

        Ok(Self {
            id,
            name,
            total_volume,
            order_id,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_volume(&self) -> i32 {
        self.total_volume
    }

    pub fn order_id(&self) -> Option<OrderId> {
        self.order_id
    }

    pub fn is_occupied(&self) -> bool {
        self.order_id.is_some()
    }

    /// 空闲且容量足够
    pub fn can_store(&self, volume: i32) -> bool {
        !self.is_occupied() && volume <= self.total_volume
    }

    /// 放入订单
    pub fn store(&mut self, order_id: OrderId, volume: i32) -> DomainResult<()> {
        if let Some(current) = self.order_id {
            return Err(DomainError::InvalidState {
                reason: format!(
                    "storage place {} already holds order {current}",
                    self.id()
                ),
            });
        }
        if volume > self.total_volume {
            return Err(DomainError::InvalidState {
                reason: format!(
                    "storage place {} holds at most {}, order needs {volume}",
                    self.id(),
                    self.total_volume
                ),
            });
        }
        self.order_id = Some(order_id);
        Ok(())
    }

    /// 取出指定订单；存储位未放该订单时失败
    pub fn clear(&mut self, order_id: OrderId) -> DomainResult<()> {
        if self.order_id != Some(order_id) {
            return Err(DomainError::InvalidState {
                reason: format!(
                    "storage place {} does not hold order {order_id}",
                    self.id()
                ),
            });
        }
        self.order_id = None;
        Ok(())
    }
}
