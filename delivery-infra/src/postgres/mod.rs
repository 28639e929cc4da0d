//! PostgreSQL 持久化（sqlx）
//!
//! 工作单元持有一个可选的 `Transaction<'static, Postgres>`，仓储句柄在调用时绑定：
//! 有活动事务就在该事务上执行，否则使用一次性事务（单次调用原子生效）。
//! 表结构见 `schema.sql`，由 [`PgUnitOfWorkFactory::ensure_schema`] 创建。
//!
mod queries;
mod repository;
mod unit_of_work;

pub use repository::{PgCourierRepository, PgOrderRepository};
pub use unit_of_work::{PgUnitOfWork, PgUnitOfWorkFactory};
