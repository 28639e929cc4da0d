//! 配送应用层（delivery-application）
//!
//! 在领域层之上编排用例：
//! - 命令/查询协议与进程内总线（`command*`、`query*`、`inmemory_*`）；
//! - 写用例 `commands`：下单、登记骑手、追加存储位、分配、移动；
//! - 读用例 `queries`：骑手列表、未完成订单；
//! - 地址解析端口 `geo`；
//! - 周期调度器 `scheduler`（特性 `scheduler`）。
//!
pub mod command;
pub mod command_bus;
pub mod command_handler;
pub mod commands;
pub mod context;
pub mod dto;
pub mod error;
pub mod geo;
pub mod inmemory_command_bus;
pub mod inmemory_query_bus;
pub mod queries;
pub mod query;
pub mod query_bus;
pub mod query_handler;
#[cfg(feature = "scheduler")]
pub mod scheduler;
mod transaction;
mod wiring;

pub use inmemory_command_bus::InMemoryCommandBus;
pub use inmemory_query_bus::InMemoryQueryBus;
pub use wiring::register_delivery_handlers;
