//! 持久化行结构
//!
//! 与表结构一一对应（orders / couriers / storage_places），内存与 PostgreSQL 两种适配器共用。
//! 行 → 聚合一律经过 `restore`，因此被破坏的数据在读取时就会以校验错误暴露。
//!
use delivery_domain::courier::Courier;
use delivery_domain::entity::Entity;
use delivery_domain::error::DomainResult;
use delivery_domain::ids::{CourierId, OrderId, StoragePlaceId};
use delivery_domain::location::Location;
use delivery_domain::order::{Order, OrderStatus};
use delivery_domain::storage_place::StoragePlace;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct OrderRow {
    pub id: Uuid,
    pub courier_id: Option<Uuid>,
    pub location_x: i32,
    pub location_y: i32,
    pub volume: i32,
    pub status: i16,
}

impl OrderRow {
    pub fn from_order(order: &Order) -> Self {
        Self {
            id: order.id().value(),
            courier_id: order.courier_id().map(|id| id.value()),
            location_x: order.location().x(),
            location_y: order.location().y(),
            volume: order.volume(),
            status: order.status().code(),
        }
    }

    pub fn into_order(self) -> DomainResult<Order> {
        Order::restore(
            OrderId::try_new(self.id)?,
            Location::new(self.location_x, self.location_y)?,
            self.volume,
            OrderStatus::from_code(self.status)?,
            self.courier_id.map(CourierId::try_new).transpose()?,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct CourierRow {
    pub id: Uuid,
    pub name: String,
    pub location_x: i32,
    pub location_y: i32,
    pub speed: i32,
}

impl CourierRow {
    /// 拆分为骑手行与其存储位行（保持存储位顺序）
    pub fn from_courier(courier: &Courier) -> (Self, Vec<StoragePlaceRow>) {
        let courier_id = courier.id().value();
        let row = Self {
            id: courier_id,
            name: courier.name().to_string(),
            location_x: courier.location().x(),
            location_y: courier.location().y(),
            speed: courier.speed(),
        };
        let places = courier
            .storage_places()
            .iter()
            .map(|place| StoragePlaceRow::from_place(courier_id, place))
            .collect();
        (row, places)
    }

    /// 与按顺序排列的存储位行组装为骑手聚合
    pub fn into_courier<I>(self, places: I) -> DomainResult<Courier>
    where
        I: IntoIterator<Item = StoragePlaceRow>,
    {
        let storage_places = places
            .into_iter()
            .map(StoragePlaceRow::into_place)
            .collect::<DomainResult<Vec<_>>>()?;

        Courier::restore(
            CourierId::try_new(self.id)?,
            self.name,
            self.speed,
            Location::new(self.location_x, self.location_y)?,
            storage_places,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct StoragePlaceRow {
    pub id: Uuid,
    pub courier_id: Uuid,
    pub name: String,
    pub total_volume: i32,
    pub order_id: Option<Uuid>,
}

impl StoragePlaceRow {
    pub fn from_place(courier_id: Uuid, place: &StoragePlace) -> Self {
        Self {
            id: place.id().value(),
            courier_id,
            name: place.name().to_string(),
            total_volume: place.total_volume(),
            order_id: place.order_id().map(|id| id.value()),
        }
    }

    pub fn into_place(self) -> DomainResult<StoragePlace> {
        StoragePlace::restore(
            StoragePlaceId::try_new(self.id)?,
            self.name,
            self.total_volume,
            self.order_id.map(OrderId::try_new).transpose()?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delivery_domain::error::DomainError;

    fn loc(x: i32, y: i32) -> Location {
        Location::new(x, y).unwrap()
    }

    #[test]
    fn order_row_preserves_every_field() {
        let mut order = Order::new(OrderId::new(), loc(3, 9), 4).unwrap();
        let courier_id = CourierId::new();
        order.assign(courier_id).unwrap();

        let row = OrderRow::from_order(&order);
        assert_eq!(row.status, 2);
        assert_eq!(row.courier_id, Some(courier_id.value()));
        assert_eq!((row.location_x, row.location_y), (3, 9));

        assert_eq!(row.into_order().unwrap(), order);
    }

    #[test]
    fn courier_row_keeps_storage_place_order() {
        let mut courier = Courier::new(CourierId::new(), "Van", 2, loc(1, 2)).unwrap();
        courier.add_storage_place("Trunk", 40).unwrap();
        courier.add_storage_place("Box", 3).unwrap();
        let order = Order::new(OrderId::new(), loc(5, 5), 30).unwrap();
        courier.take_order(&order).unwrap();

        let (row, places) = CourierRow::from_courier(&courier);
        assert_eq!(places.len(), 3);
        assert!(places.iter().all(|p| p.courier_id == row.id));
        assert_eq!(places[1].order_id, Some(order.id().value()));

        assert_eq!(row.into_courier(places).unwrap(), courier);
    }

    #[test]
    fn corrupted_rows_are_rejected() {
        let row = OrderRow {
            id: Uuid::new_v4(),
            courier_id: None,
            location_x: 0,
            location_y: 5,
            volume: 1,
            status: 2,
        };
        assert!(matches!(row.into_order(), Err(DomainError::Validation(_))));

        let unknown_status = OrderRow {
            id: Uuid::new_v4(),
            courier_id: None,
            location_x: 1,
            location_y: 1,
            volume: 1,
            status: 9,
        };
        assert!(unknown_status.into_order().is_err());

        let courier = CourierRow {
            id: Uuid::new_v4(),
            name: "Ghost".into(),
            location_x: 1,
            location_y: 1,
            speed: 1,
        };
        assert!(courier.into_courier(Vec::new()).is_err());
    }
}
