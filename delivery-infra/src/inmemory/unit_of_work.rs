use super::repository::{InMemoryCourierRepository, InMemoryOrderRepository};
use super::store::{DirtyRows, InMemoryStore, Tables};
use crate::tracker::AggregateTracker;
use async_trait::async_trait;
use delivery_domain::error::{DomainError, DomainResult};
use delivery_domain::unit_of_work::{TrackedAggregate, UnitOfWork, UnitOfWorkFactory};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// 活动事务：持有写闸门，读写都作用于开启时的快照副本
pub(crate) struct Transaction {
    _gate: OwnedMutexGuard<()>,
    pub(crate) working: Tables,
    pub(crate) dirty: DirtyRows,
}

/// 一个工作单元与其仓储句柄共享的会话
pub(crate) struct Session {
    pub(crate) store: InMemoryStore,
    pub(crate) tx: Mutex<Option<Transaction>>,
    active: AtomicBool,
    pub(crate) tracker: AggregateTracker,
}

impl Session {
    /// 读：事务内读快照，事务外读已提交数据
    pub(crate) async fn read<T>(
        &self,
        f: impl FnOnce(&Tables) -> DomainResult<T>,
    ) -> DomainResult<T> {
        let tx = self.tx.lock().await;
        match tx.as_ref() {
            Some(tx) => f(&tx.working),
            None => f(&*self.store.tables.lock().await),
        }
    }

    /// 写：事务内写快照并标记脏行，事务外立即生效
    pub(crate) async fn write<T>(
        &self,
        f: impl FnOnce(&mut Tables, &mut DirtyRows) -> DomainResult<T>,
    ) -> DomainResult<T> {
        let mut tx = self.tx.lock().await;
        match tx.as_mut() {
            Some(tx) => f(&mut tx.working, &mut tx.dirty),
            None => {
                let mut tables = self.store.tables.lock().await;
                f(&mut *tables, &mut DirtyRows::default())
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryUnitOfWorkFactory {
    store: InMemoryStore,
}

impl InMemoryUnitOfWorkFactory {
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }
}

impl UnitOfWorkFactory for InMemoryUnitOfWorkFactory {
    type UnitOfWork = InMemoryUnitOfWork;

    fn create(&self) -> Self::UnitOfWork {
        InMemoryUnitOfWork::new(self.store.clone())
    }
}

pub struct InMemoryUnitOfWork {
    session: Arc<Session>,
}

impl InMemoryUnitOfWork {
    pub fn new(store: InMemoryStore) -> Self {
        Self {
            session: Arc::new(Session {
                store,
                tx: Mutex::new(None),
                active: AtomicBool::new(false),
                tracker: AggregateTracker::new(),
            }),
        }
    }

    async fn finish(&mut self, action: &'static str) -> DomainResult<Transaction> {
        let tx = self.session.tx.lock().await.take();
        let Some(tx) = tx else {
            return Err(DomainError::InvalidTransaction {
                reason: format!("no active transaction to {action}"),
            });
        };
        self.session.active.store(false, Ordering::Release);
        Ok(tx)
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    type Orders = InMemoryOrderRepository;
    type Couriers = InMemoryCourierRepository;

    async fn begin(&mut self) -> DomainResult<()> {
        let mut slot = self.session.tx.lock().await;
        if slot.is_some() {
            return Ok(());
        }

        let gate = Arc::clone(&self.session.store.gate).lock_owned().await;
        let working = self.session.store.tables.lock().await.clone();
        *slot = Some(Transaction {
            _gate: gate,
            working,
            dirty: DirtyRows::default(),
        });
        self.session.active.store(true, Ordering::Release);
        tracing::debug!("in-memory transaction started");
        Ok(())
    }

    async fn commit(&mut self) -> DomainResult<()> {
        let tx = self.finish("commit").await?;
        self.session
            .store
            .tables
            .lock()
            .await
            .merge(&tx.working, &tx.dirty);
        tracing::debug!("in-memory transaction committed");
        Ok(())
    }

    async fn rollback(&mut self) -> DomainResult<()> {
        self.finish("rollback").await?;
        tracing::debug!("in-memory transaction rolled back");
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.session.active.load(Ordering::Acquire)
    }

    fn orders(&self) -> Self::Orders {
        InMemoryOrderRepository::new(Arc::clone(&self.session))
    }

    fn couriers(&self) -> Self::Couriers {
        InMemoryCourierRepository::new(Arc::clone(&self.session))
    }

    fn tracked_aggregates(&self) -> Vec<TrackedAggregate> {
        self.session.tracker.snapshot()
    }
}

impl Drop for InMemoryUnitOfWork {
    // 未提交的事务随工作单元一起丢弃，并释放写闸门
    fn drop(&mut self) {
        if let Ok(mut slot) = self.session.tx.try_lock() {
            if slot.take().is_some() {
                self.session.active.store(false, Ordering::Release);
                tracing::debug!("in-memory transaction discarded on drop");
            }
        }
    }
}
