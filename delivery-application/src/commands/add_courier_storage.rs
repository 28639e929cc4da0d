use crate::command::Command;
use crate::command_handler::CommandHandler;
use crate::context::AppContext;
use crate::error::AppError;
use crate::transaction::release;
use async_trait::async_trait;
use delivery_domain::error::Violations;
use delivery_domain::ids::{CourierId, StoragePlaceId};
use delivery_domain::repository::CourierRepository;
use delivery_domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use std::sync::Arc;

/// 为骑手追加一个空存储位，返回存储位标识
#[derive(Debug, Clone)]
pub struct AddCourierStorage {
    pub courier_id: CourierId,
    pub name: String,
    pub total_volume: i32,
}

impl Command for AddCourierStorage {
    const NAME: &'static str = "delivery.add_courier_storage";
    type Output = StoragePlaceId;

    fn validate(&self) -> Result<(), AppError> {
        let mut violations = Violations::new();
        violations.check(!self.name.trim().is_empty(), "name", "must not be empty");
        violations.check(
            self.total_volume > 0,
            "total_volume",
            format!("must be positive, got {}", self.total_volume),
        );
        if !violations.is_empty() {
            return Err(violations.into());
        }
        Ok(())
    }
}

pub struct AddCourierStorageHandler<F> {
    factory: Arc<F>,
}

impl<F: UnitOfWorkFactory> AddCourierStorageHandler<F> {
    pub fn new(factory: Arc<F>) -> Self {
        Self { factory }
    }

    async fn execute(
        &self,
        uow: &mut F::UnitOfWork,
        cmd: AddCourierStorage,
    ) -> Result<StoragePlaceId, AppError> {
        uow.begin().await?;

        let mut courier = uow.couriers().get(cmd.courier_id).await?;
        let place_id = courier.add_storage_place(cmd.name, cmd.total_volume)?;
        uow.couriers().update(&courier).await?;
        uow.commit().await?;

        tracing::info!(
            courier_id = %cmd.courier_id,
            storage_place_id = %place_id,
            total_volume = cmd.total_volume,
            "storage place added"
        );
        Ok(place_id)
    }
}

#[async_trait]
impl<F> CommandHandler<AddCourierStorage> for AddCourierStorageHandler<F>
where
    F: UnitOfWorkFactory + 'static,
{
    async fn handle(
        &self,
        _ctx: &AppContext,
        cmd: AddCourierStorage,
    ) -> Result<StoragePlaceId, AppError> {
        cmd.validate()?;
        let mut uow = self.factory.create();
        let result = self.execute(&mut uow, cmd).await;
        release(&mut uow).await;
        result
    }
}
