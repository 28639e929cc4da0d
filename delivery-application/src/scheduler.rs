//! 周期调度器（DeliveryScheduler）
//!
//! 两个长驻周期任务，通过命令总线分别触发：
//! - `AssignCourier`：为最早的待分配订单挑选骑手；
//! - `MoveCouriers`：推动所有配送中的骑手前进一个节拍。
//!
//! 两个任务互不等待，可能同时运行，隔离由存储事务保证。
//! “暂无订单/暂无骑手”记 debug，其余失败记 error，均不终止任务。
//!
use crate::command::Command;
use crate::command_bus::CommandBus;
use crate::commands::{AssignCourier, MoveCouriers};
use crate::context::AppContext;
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// 调度器配置
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// 分配任务的触发间隔（毫秒）
    pub assign_interval_ms: u64,
    /// 移动任务的触发间隔（毫秒）
    pub move_interval_ms: u64,
}

impl SchedulerConfig {
    pub fn assign_interval(&self) -> Duration {
        Duration::from_millis(self.assign_interval_ms.max(1))
    }

    pub fn move_interval(&self) -> Duration {
        Duration::from_millis(self.move_interval_ms.max(1))
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            assign_interval_ms: 1000,
            move_interval_ms: 1000,
        }
    }
}

#[derive(Builder)]
pub struct DeliveryScheduler<B> {
    bus: Arc<B>,
    #[builder(default)]
    config: SchedulerConfig,
    #[builder(default = AppContext::system("scheduler"))]
    context: AppContext,
}

impl<B> DeliveryScheduler<B>
where
    B: CommandBus + 'static,
{
    /// 启动两个周期任务，返回可用于关闭/等待的句柄
    pub fn start(self) -> SchedulerHandle {
        let token = CancellationToken::new();
        let mut tasks: Vec<JoinHandle<()>> = Vec::with_capacity(2);

        tracing::info!(
            assign_interval_ms = self.config.assign_interval_ms,
            move_interval_ms = self.config.move_interval_ms,
            "delivery scheduler started"
        );

        {
            let bus = self.bus.clone();
            let ctx = self.context.clone();
            tasks.push(spawn_periodic(
                token.clone(),
                self.config.assign_interval(),
                move || trigger(bus.clone(), ctx.clone(), AssignCourier),
            ));
        }

        {
            let bus = self.bus.clone();
            let ctx = self.context.clone();
            tasks.push(spawn_periodic(
                token.clone(),
                self.config.move_interval(),
                move || trigger(bus.clone(), ctx.clone(), MoveCouriers),
            ));
        }

        SchedulerHandle { token, tasks }
    }
}

fn spawn_periodic<F, Fut>(token: CancellationToken, interval: Duration, mut f: F) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => f().await,
            }
        }
    })
}

async fn trigger<B, C>(bus: Arc<B>, ctx: AppContext, cmd: C)
where
    B: CommandBus,
    C: Command,
    C::Output: Debug,
{
    match bus.dispatch(&ctx, cmd).await {
        Ok(output) => tracing::debug!(command = C::NAME, ?output, "scheduled command done"),
        Err(err) if err.is_idle() => {
            tracing::debug!(command = C::NAME, reason = %err, "nothing to do")
        }
        Err(err) => tracing::error!(command = C::NAME, error = %err, "scheduled command failed"),
    }
}

/// 调度器运行句柄：用于优雅关闭与等待任务结束
pub struct SchedulerHandle {
    token: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// 通知两个任务退出（正在执行的命令会先完成）
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    /// 等待任务结束
    pub async fn join(mut self) {
        let tasks = std::mem::take(&mut self.tasks);

        for t in tasks {
            let _ = t.await;
        }
        tracing::info!("delivery scheduler stopped");
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
