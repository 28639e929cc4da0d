//! 内存持久化
//!
//! 语义与数据库实现保持一致：
//! - 事务开启时获取写闸门并对三张表做快照，事务内读写都落在快照上；
//! - 提交时只把本事务写过的行 upsert 回共享表，回滚或丢弃工作单元则直接舍弃快照；
//! - 没有活动事务时，仓储调用直接作用于共享表并立即生效。
//!
mod repository;
mod store;
mod unit_of_work;

pub use repository::{InMemoryCourierRepository, InMemoryOrderRepository};
pub use store::InMemoryStore;
pub use unit_of_work::{InMemoryUnitOfWork, InMemoryUnitOfWorkFactory};
