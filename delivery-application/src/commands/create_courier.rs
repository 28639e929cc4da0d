use crate::command::Command;
use crate::command_handler::CommandHandler;
use crate::context::AppContext;
use crate::error::AppError;
use crate::transaction::release;
use async_trait::async_trait;
use delivery_domain::courier::Courier;
use delivery_domain::entity::Entity;
use delivery_domain::error::Violations;
use delivery_domain::ids::CourierId;
use delivery_domain::location::Location;
use delivery_domain::repository::CourierRepository;
use delivery_domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use std::sync::Arc;

/// 登记骑手（附带默认存储位），返回新骑手标识
#[derive(Debug, Clone)]
pub struct CreateCourier {
    pub name: String,
    pub speed: i32,
    pub location: Location,
}

impl Command for CreateCourier {
    const NAME: &'static str = "delivery.create_courier";
    type Output = CourierId;

    fn validate(&self) -> Result<(), AppError> {
        let mut violations = Violations::new();
        violations.check(!self.name.trim().is_empty(), "name", "must not be empty");
        violations.check(
            self.speed > 0,
            "speed",
            format!("must be positive, got {}", self.speed),
        );
        if !violations.is_empty() {
            return Err(violations.into());
        }
        Ok(())
    }
}

pub struct CreateCourierHandler<F> {
    factory: Arc<F>,
}

impl<F: UnitOfWorkFactory> CreateCourierHandler<F> {
    pub fn new(factory: Arc<F>) -> Self {
        Self { factory }
    }

    async fn execute(
        &self,
        uow: &mut F::UnitOfWork,
        cmd: CreateCourier,
    ) -> Result<CourierId, AppError> {
        uow.begin().await?;

        let courier = Courier::new(CourierId::new(), cmd.name, cmd.speed, cmd.location)?;
        uow.couriers().add(&courier).await?;
        uow.commit().await?;

        tracing::info!(
            courier_id = %courier.id(),
            name = courier.name(),
            speed = courier.speed(),
            location = %courier.location(),
            "courier created"
        );
        Ok(*courier.id())
    }
}

#[async_trait]
impl<F> CommandHandler<CreateCourier> for CreateCourierHandler<F>
where
    F: UnitOfWorkFactory + 'static,
{
    async fn handle(&self, _ctx: &AppContext, cmd: CreateCourier) -> Result<CourierId, AppError> {
        cmd.validate()?;
        let mut uow = self.factory.create();
        let result = self.execute(&mut uow, cmd).await;
        release(&mut uow).await;
        result
    }
}
