//! 骑手聚合（Courier）
//!
//! 持有当前位置、速度与有序的存储位集合：
//! - 取单按插入顺序“首个适配”选择存储位；
//! - 移动每次最多前进 `speed` 格，先消耗 X 轴差值，再把剩余步数用于 Y 轴。
//!
use crate::aggregate::Aggregate;
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult, Violations};
use crate::ids::{CourierId, OrderId, StoragePlaceId};
use crate::location::Location;
use crate::order::Order;
use crate::storage_place::StoragePlace;
use delivery_macros::entity;

/// 新骑手默认携带的存储位
pub const DEFAULT_STORAGE_PLACE_NAME: &str = "Bag";
pub const DEFAULT_STORAGE_PLACE_VOLUME: i32 = 10;

#[entity(id = CourierId)]
#[derive(PartialEq, Eq)]
pub struct Courier {
    name: String,
    speed: i32,
    location: Location,
    storage_places: Vec<StoragePlace>,
}

impl Aggregate for Courier {
    const TYPE: &'static str = "courier";
}

impl Courier {
    /// 创建骑手，并附带一个默认存储位
    pub fn new(
        id: CourierId,
        name: impl Into<String>,
        speed: i32,
        location: Location,
    ) -> DomainResult<Self> {
        let name = name.into();
        let mut violations = Violations::new();
        check_fields(&mut violations, &name, speed);
        violations.into_result()?;

        let bag = StoragePlace::new(DEFAULT_STORAGE_PLACE_NAME, DEFAULT_STORAGE_PLACE_VOLUME)?;

        Ok(Self {
            id,
            name,
            speed,
            location,
            storage_places: vec![bag],
        })
    }

    /// 从持久化状态重建，存储位顺序即首个适配的搜索顺序
    pub fn restore(
        id: CourierId,
        name: impl Into<String>,
        speed: i32,
        location: Location,
        storage_places: Vec<StoragePlace>,
    ) -> DomainResult<Self> {
        let name = name.into();
        let mut violations = Violations::new();
        check_fields(&mut violations, &name, speed);
        violations.check(
            !storage_places.is_empty(),
            "storage_places",
            "courier must have at least one storage place",
        );
        violations.into_result()?;

        Ok(Self {
            id,
            name,
            speed,
            location,
            storage_places,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn storage_places(&self) -> &[StoragePlace] {
        &self.storage_places
    }

    /// 追加一个空存储位，不影响已有的占用
    pub fn add_storage_place(
        &mut self,
        name: impl Into<String>,
        total_volume: i32,
    ) -> DomainResult<StoragePlaceId> {
        let place = StoragePlace::new(name, total_volume)?;
        let id = *place.id();
        self.storage_places.push(place);
        Ok(id)
    }

    /// 是否存在空闲且容量足够的存储位（与 `take_order` 使用同一判定）
    pub fn can_take_order(&self, order: &Order) -> bool {
        self.first_fit(order.volume()).is_some()
    }

    /// 把订单放入首个空闲且容量足够的存储位
    pub fn take_order(&mut self, order: &Order) -> DomainResult<()> {
        let Some(index) = self.first_fit(order.volume()) else {
            return Err(DomainError::StoragePlaceNotFound {
                reason: format!(
                    "courier {} has no free storage place for order {} (volume {})",
                    self.id,
                    order.id(),
                    order.volume()
                ),
            });
        };
        self.storage_places[index].store(*order.id(), order.volume())
    }

    /// 取出已送达的订单，清空对应存储位
    pub fn complete_order(&mut self, order_id: OrderId) -> DomainResult<()> {
        let Some(place) = self
            .storage_places
            .iter_mut()
            .find(|p| p.order_id() == Some(order_id))
        else {
            return Err(DomainError::StoragePlaceNotFound {
                reason: format!("courier {} does not carry order {order_id}", self.id),
            });
        };
        place.clear(order_id)
    }

    /// 朝目标前进一个节拍
    pub fn move_towards(&mut self, target: Location) -> DomainResult<()> {
        if self.location == target {
            return Ok(());
        }

        let mut remaining = self.speed;

        let dx = target.x() - self.location.x();
        let step_x = dx.clamp(-remaining, remaining);
        remaining -= step_x.abs();

        let dy = target.y() - self.location.y();
        let step_y = dy.clamp(-remaining, remaining);

        self.location = Location::new(self.location.x() + step_x, self.location.y() + step_y)?;
        Ok(())
    }

    /// 到达目标所需节拍数（距离 / 速度），仅用于分配时比较
    pub fn calculate_time_to_location(&self, target: Location) -> f64 {
        f64::from(self.location.distance_to(&target)) / f64::from(self.speed)
    }

    fn first_fit(&self, volume: i32) -> Option<usize> {
        self.storage_places.iter().position(|p| p.can_store(volume))
    }
}

fn check_fields(violations: &mut Violations, name: &str, speed: i32) {
    violations.check(!name.trim().is_empty(), "name", "must not be empty");
    violations.check(speed > 0, "speed", format!("must be positive, got {speed}"));
}
