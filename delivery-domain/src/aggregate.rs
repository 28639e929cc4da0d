//! 聚合（Aggregate）抽象
//!
//! 聚合根是一致性边界：跨聚合只通过标识引用，不持有对方对象。
//!
use crate::entity::Entity;

/// 聚合根接口
pub trait Aggregate: Entity + Clone {
    /// 聚合类型名，用于错误信息、追踪与日志
    const TYPE: &'static str;
}
