//! 读用例：直接读取已提交数据，不开启事务
//!
mod get_couriers;
mod get_incomplete_orders;

pub use get_couriers::{GetCouriers, GetCouriersHandler};
pub use get_incomplete_orders::{GetIncompleteOrders, GetIncompleteOrdersHandler};
