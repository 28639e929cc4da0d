//! 配送持久化适配器（delivery-infra）
//!
//! 为 `delivery-domain` 的仓储与工作单元协议提供实现：
//! - `inmemory`：带事务语义的内存存储，测试与演示使用；
//! - `postgres`（特性 `postgres`）：基于 sqlx 的 PostgreSQL 实现。
//!
pub mod inmemory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod rows;
pub mod tracker;

pub use inmemory::{InMemoryStore, InMemoryUnitOfWork, InMemoryUnitOfWorkFactory};
#[cfg(feature = "postgres")]
pub use postgres::{PgUnitOfWork, PgUnitOfWorkFactory};
