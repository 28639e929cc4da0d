use super::repository::{PgCourierRepository, PgOrderRepository};
use crate::tracker::AggregateTracker;
use async_trait::async_trait;
use delivery_domain::error::{DomainError, DomainResult};
use delivery_domain::unit_of_work::{TrackedAggregate, UnitOfWork, UnitOfWorkFactory};
use futures_util::future::BoxFuture;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

const SCHEMA: &str = include_str!("schema.sql");

/// 工作单元与仓储句柄共享的数据库会话
pub(crate) struct PgSession {
    pool: PgPool,
    tx: Mutex<Option<Transaction<'static, Postgres>>>,
    active: AtomicBool,
    pub(crate) tracker: AggregateTracker,
}

impl PgSession {
    /// 在当前事务上执行；没有活动事务时使用一次性事务，成功即提交
    pub(crate) async fn run<T, F>(&self, op: F) -> DomainResult<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, DomainResult<T>> + Send,
    {
        let mut slot = self.tx.lock().await;
        match slot.as_mut() {
            Some(tx) => op(&mut **tx).await,
            None => {
                let mut tx = self.pool.begin().await?;
                let value = op(&mut *tx).await?;
                tx.commit().await?;
                Ok(value)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgUnitOfWorkFactory {
    pool: PgPool,
}

impl PgUnitOfWorkFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> DomainResult<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 建表（幂等）
    pub async fn ensure_schema(&self) -> DomainResult<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        tracing::info!("delivery schema ensured");
        Ok(())
    }
}

impl UnitOfWorkFactory for PgUnitOfWorkFactory {
    type UnitOfWork = PgUnitOfWork;

    fn create(&self) -> Self::UnitOfWork {
        PgUnitOfWork {
            session: Arc::new(PgSession {
                pool: self.pool.clone(),
                tx: Mutex::new(None),
                active: AtomicBool::new(false),
                tracker: AggregateTracker::new(),
            }),
        }
    }
}

pub struct PgUnitOfWork {
    session: Arc<PgSession>,
}

impl PgUnitOfWork {
    async fn finish(
        &mut self,
        action: &'static str,
    ) -> DomainResult<Transaction<'static, Postgres>> {
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
impl UnitOfWork for PgUnitOfWork {
    type Orders = PgOrderRepository;
    type Couriers = PgCourierRepository;

    async fn begin(&mut self) -> DomainResult<()> {
        let mut slot = self.session.tx.lock().await;
        if slot.is_some() {
            return Ok(());
        }
        *slot = Some(self.session.pool.begin().await?);
        self.session.active.store(true, Ordering::Release);
        tracing::debug!("postgres transaction started");
        Ok(())
    }

    async fn commit(&mut self) -> DomainResult<()> {
        self.finish("commit").await?.commit().await?;
        tracing::debug!("postgres transaction committed");
        Ok(())
    }

    async fn rollback(&mut self) -> DomainResult<()> {
        self.finish("rollback").await?.rollback().await?;
        tracing::debug!("postgres transaction rolled back");
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.session.active.load(Ordering::Acquire)
    }

    fn orders(&self) -> Self::Orders {
        PgOrderRepository::new(Arc::clone(&self.session))
    }

    fn couriers(&self) -> Self::Couriers {
        PgCourierRepository::new(Arc::clone(&self.session))
    }

    fn tracked_aggregates(&self) -> Vec<TrackedAggregate> {
        self.session.tracker.snapshot()
    }
}

impl Drop for PgUnitOfWork {
    // 归还连接时 sqlx 会回滚未提交的事务
    fn drop(&mut self) {
        if let Ok(mut slot) = self.session.tx.try_lock() {
            if slot.take().is_some() {
                self.session.active.store(false, Ordering::Release);
                tracing::debug!("postgres transaction discarded on drop");
            }
        }
    }
}
