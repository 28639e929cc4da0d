use delivery_domain::courier::Courier;
use delivery_domain::entity::Entity;
use delivery_domain::ids::{CourierId, OrderId, StoragePlaceId};
use delivery_domain::location::Location;
use delivery_domain::order::Order;
use delivery_domain::storage_place::StoragePlace;
use serde::Serialize;

/// 数据传输对象（DTO）
///
/// - 作为应用层的输出载体，面向接口/外部系统序列化友好；
/// - 与领域模型解耦，避免将领域对象直接暴露到接口层；
/// - 应保持只读特性与简洁结构，适配不同用例的返回需求。
pub trait Dto: Serialize + Send + Sync + 'static {}

impl<T: Dto> Dto for Vec<T> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocationDto {
    pub x: i32,
    pub y: i32,
}

impl From<Location> for LocationDto {
    fn from(location: Location) -> Self {
        Self {
            x: location.x(),
            y: location.y(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoragePlaceDto {
    pub id: StoragePlaceId,
    pub name: String,
    pub total_volume: i32,
    pub order_id: Option<OrderId>,
}

impl From<&StoragePlace> for StoragePlaceDto {
    fn from(place: &StoragePlace) -> Self {
        Self {
            id: *place.id(),
            name: place.name().to_string(),
            total_volume: place.total_volume(),
            order_id: place.order_id(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourierDto {
    pub id: CourierId,
    pub name: String,
    pub speed: i32,
    pub location: LocationDto,
    pub storage_places: Vec<StoragePlaceDto>,
}

impl Dto for CourierDto {}

impl From<&Courier> for CourierDto {
    fn from(courier: &Courier) -> Self {
        Self {
            id: *courier.id(),
            name: courier.name().to_string(),
            speed: courier.speed(),
            location: courier.location().into(),
            storage_places: courier.storage_places().iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDto {
    pub id: OrderId,
    pub location: LocationDto,
    pub volume: i32,
    pub status: &'static str,
    pub courier_id: Option<CourierId>,
}

impl Dto for OrderDto {}

impl From<&Order> for OrderDto {
    fn from(order: &Order) -> Self {
        Self {
            id: *order.id(),
            location: order.location().into(),
            volume: order.volume(),
            status: order.status().as_str(),
            courier_id: order.courier_id(),
        }
    }
}
