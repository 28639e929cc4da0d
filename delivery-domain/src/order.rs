//! 订单聚合（Order）
//!
//! 状态机：`Created` → `Assigned` →（`Assigned` 重新分配 | `Completed`）。
//! `Completed` 为终态。骑手只以标识引用（`CourierId`），不持有骑手对象。
//!
use crate::aggregate::Aggregate;
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult, Violations};
use crate::ids::{CourierId, OrderId};
use crate::location::Location;
use delivery_macros::{entity, value_object};
use std::fmt;

/// 订单状态
#[value_object]
#[derive(Copy, Hash)]
pub enum OrderStatus {
    Created,
    Assigned,
    Completed,
}

impl OrderStatus {
    /// 持久化使用的小整数编码
    pub fn code(self) -> i16 {
        match self {
            OrderStatus::Created => 1,
            OrderStatus::Assigned => 2,
            OrderStatus::Completed => 3,
        }
    }

    pub fn from_code(code: i16) -> DomainResult<Self> {
        match code {
            1 => Ok(OrderStatus::Created),
            2 => Ok(OrderStatus::Assigned),
            3 => Ok(OrderStatus::Completed),
            other => Err(DomainError::invalid(
                "status",
                format!("unknown order status code {other}"),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Assigned => "assigned",
            OrderStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[entity(id = OrderId)]
#[derive(PartialEq, Eq)]
pub struct Order {
    location: Location,
    volume: i32,
    status: OrderStatus,
    courier_id: Option<CourierId>,
}

impl Aggregate for Order {
    const TYPE: &'static str = "order";
}

impl Order {
    /// 创建新订单（状态 `Created`，未分配骑手）
    pub fn new(id: OrderId, location: Location, volume: i32) -> DomainResult<Self> {
        let mut violations = Violations::new();
        check_volume(&mut violations, volume);
        violations.into_result()?;

        Ok(Self {
            id,
            location,
            volume,
            status: OrderStatus::Created,
            courier_id: None,
        })
    }

    /// 从持久化状态重建
    ///
    /// 额外校验骑手引用与状态一致：`Created` 不得有骑手，`Assigned`/`Completed` 必须有。
    pub fn restore(
        id: OrderId,
        location: Location,
        volume: i32,
        status: OrderStatus,
        courier_id: Option<CourierId>,
    ) -> DomainResult<Self> {
        let mut violations = Violations::new();
        check_volume(&mut violations, volume);
        match (status, courier_id) {
            (OrderStatus::Created, Some(_)) => {
                violations.push("courier_id", "must be empty while order is created")
            }
            (OrderStatus::Assigned | OrderStatus::Completed, None) => violations.push(
                "courier_id",
                format!("is required while order is {status}"),
            ),
            _ => {}
        }
        violations.into_result()?;

        Ok(Self {
            id,
            location,
            volume,
            status,
            courier_id,
        })
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn volume(&self) -> i32 {
        self.volume
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn courier_id(&self) -> Option<CourierId> {
        self.courier_id
    }

    /// 检查当前状态是否允许分配，不修改任何状态
    pub fn validate_assign(&self) -> DomainResult<()> {
        match self.status {
            OrderStatus::Created | OrderStatus::Assigned => Ok(()),
            OrderStatus::Completed => Err(self.transition_error("assign")),
        }
    }

    /// 分配（或重新分配）骑手
    pub fn assign(&mut self, courier_id: CourierId) -> DomainResult<()> {
        self.validate_assign()?;
        self.courier_id = Some(courier_id);
        self.status = OrderStatus::Assigned;
        Ok(())
    }

    /// 完成订单，骑手引用保留
    pub fn complete(&mut self) -> DomainResult<()> {
        if self.status != OrderStatus::Assigned {
            return Err(self.transition_error("complete"));
        }
        self.status = OrderStatus::Completed;
        Ok(())
    }

    fn transition_error(&self, action: &'static str) -> DomainError {
        DomainError::InvalidTransition {
            aggregate: Self::TYPE,
            from: self.status.to_string(),
            action,
        }
    }
}

fn check_volume(violations: &mut Violations, volume: i32) {
    violations.check(volume > 0, "volume", format!("must be positive, got {volume}"));
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "order {} at {} volume {} [{}]",
            self.id(),
            self.location,
            self.volume,
            self.status
        )
    }
}
