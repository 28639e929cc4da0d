//! 聚合写入跟踪
//!
//! 工作单元与其仓储句柄共享同一个跟踪列表，仓储每次写入成功后追加一份快照。
//!
use delivery_domain::unit_of_work::TrackedAggregate;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Default)]
pub struct AggregateTracker {
    inner: Arc<Mutex<Vec<TrackedAggregate>>>,
}

impl AggregateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&self, aggregate: impl Into<TrackedAggregate>) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(aggregate.into());
    }

    /// 按写入顺序返回快照副本
    pub fn snapshot(&self) -> Vec<TrackedAggregate> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
