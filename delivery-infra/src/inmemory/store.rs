use crate::rows::{CourierRow, OrderRow, StoragePlaceRow};
use delivery_domain::courier::Courier;
use delivery_domain::error::{DomainError, DomainResult};
use delivery_domain::order::{Order, OrderStatus};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// 三张表的内存副本；`Vec` 保留插入顺序，即“创建顺序”
#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    orders: Vec<OrderRow>,
    couriers: Vec<CourierRow>,
    storage_places: Vec<StoragePlaceRow>,
}

/// 事务内被写过的行
#[derive(Debug, Default)]
pub(crate) struct DirtyRows {
    orders: HashSet<Uuid>,
    couriers: HashSet<Uuid>,
}

impl DirtyRows {
    pub(crate) fn order(&mut self, id: Uuid) {
        self.orders.insert(id);
    }

    pub(crate) fn courier(&mut self, id: Uuid) {
        self.couriers.insert(id);
    }
}

impl Tables {
    // ---- orders ----

    pub(crate) fn insert_order(&mut self, order: &Order) -> DomainResult<()> {
        let row = OrderRow::from_order(order);
        if self.order_index(row.id).is_some() {
            return Err(DomainError::AlreadyExists {
                entity: "order",
                id: row.id.to_string(),
            });
        }
        self.orders.push(row);
        Ok(())
    }

    pub(crate) fn update_order(&mut self, order: &Order) -> DomainResult<()> {
        let row = OrderRow::from_order(order);
        let index = self
            .order_index(row.id)
            .ok_or_else(|| DomainError::not_found("order", format!("id {}", row.id)))?;
        self.orders[index] = row;
        Ok(())
    }

    pub(crate) fn order(&self, id: Uuid) -> DomainResult<Order> {
        self.orders
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("order", format!("id {id}")))?
            .into_order()
    }

    pub(crate) fn orders_where(
        &self,
        predicate: impl Fn(&OrderRow) -> bool,
    ) -> DomainResult<Vec<Order>> {
        self.orders
            .iter()
            .filter(|row| predicate(row))
            .cloned()
            .map(OrderRow::into_order)
            .collect()
    }

    fn order_index(&self, id: Uuid) -> Option<usize> {
        self.orders.iter().position(|row| row.id == id)
    }

    // ---- couriers ----

    pub(crate) fn insert_courier(&mut self, courier: &Courier) -> DomainResult<()> {
        let (row, places) = CourierRow::from_courier(courier);
        if self.courier_index(row.id).is_some() {
            return Err(DomainError::AlreadyExists {
                entity: "courier",
                id: row.id.to_string(),
            });
        }
        self.couriers.push(row);
        self.storage_places.extend(places);
        Ok(())
    }

    pub(crate) fn update_courier(&mut self, courier: &Courier) -> DomainResult<()> {
        let (row, places) = CourierRow::from_courier(courier);
        let index = self
            .courier_index(row.id)
            .ok_or_else(|| DomainError::not_found("courier", format!("id {}", row.id)))?;
        self.replace_places(row.id, places);
        self.couriers[index] = row;
        Ok(())
    }

    pub(crate) fn courier(&self, id: Uuid) -> DomainResult<Courier> {
        let row = self
            .couriers
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("courier", format!("id {id}")))?;
        self.assemble(row)
    }

    pub(crate) fn couriers_where(
        &self,
        predicate: impl Fn(&CourierRow) -> bool,
    ) -> DomainResult<Vec<Courier>> {
        self.couriers
            .iter()
            .filter(|row| predicate(row))
            .cloned()
            .map(|row| self.assemble(row))
            .collect()
    }

    /// 当前持有 `Assigned` 订单的骑手
    pub(crate) fn busy_couriers(&self) -> HashSet<Uuid> {
        let assigned = OrderStatus::Assigned.code();
        self.orders
            .iter()
            .filter(|row| row.status == assigned)
            .filter_map(|row| row.courier_id)
            .collect()
    }

    fn courier_index(&self, id: Uuid) -> Option<usize> {
        self.couriers.iter().position(|row| row.id == id)
    }

    fn assemble(&self, row: CourierRow) -> DomainResult<Courier> {
        let id = row.id;
        let places = self
            .storage_places
            .iter()
            .filter(move |place| place.courier_id == id)
            .cloned();
        row.into_courier(places)
    }

    fn replace_places(&mut self, courier_id: Uuid, places: Vec<StoragePlaceRow>) {
        self.storage_places
            .retain(|place| place.courier_id != courier_id);
        self.storage_places.extend(places);
    }

    /// 把事务副本中的脏行合并回共享表（按行 upsert）
    pub(crate) fn merge(&mut self, working: &Tables, dirty: &DirtyRows) {
        for row in working.orders.iter().filter(|r| dirty.orders.contains(&r.id)) {
            match self.order_index(row.id) {
                Some(index) => self.orders[index] = row.clone(),
                None => self.orders.push(row.clone()),
            }
        }

        for row in working
            .couriers
            .iter()
            .filter(|r| dirty.couriers.contains(&r.id))
        {
            let places = working
                .storage_places
                .iter()
                .filter(|place| place.courier_id == row.id)
                .cloned()
                .collect();
            self.replace_places(row.id, places);
            match self.courier_index(row.id) {
                Some(index) => self.couriers[index] = row.clone(),
                None => self.couriers.push(row.clone()),
            }
        }
    }
}

/// 进程内共享存储
///
/// `tables` 保存已提交数据；`gate` 串行化事务：开启事务时获取、提交/回滚/丢弃时释放。
/// 克隆得到的是同一份存储的句柄。
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    pub(crate) tables: Arc<Mutex<Tables>>,
    pub(crate) gate: Arc<Mutex<()>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}
