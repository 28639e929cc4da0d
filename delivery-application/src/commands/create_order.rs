use crate::command::Command;
use crate::command_handler::CommandHandler;
use crate::context::AppContext;
use crate::error::AppError;
use crate::geo::GeoLocator;
use crate::transaction::release;
use async_trait::async_trait;
use delivery_domain::error::Violations;
use delivery_domain::ids::OrderId;
use delivery_domain::order::Order;
use delivery_domain::repository::OrderRepository;
use delivery_domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use std::sync::Arc;

/// 下单：解析地址并创建 `Created` 状态的订单
///
/// 订单标识由调用方给出；同一标识重复投递视为成功且不做任何修改。
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub order_id: OrderId,
    pub street: String,
    pub volume: i32,
}

impl Command for CreateOrder {
    const NAME: &'static str = "delivery.create_order";
    type Output = ();

    fn validate(&self) -> Result<(), AppError> {
        let mut violations = Violations::new();
        violations.check(!self.street.trim().is_empty(), "street", "must not be empty");
        violations.check(
            self.volume > 0,
            "volume",
            format!("must be positive, got {}", self.volume),
        );
        if !violations.is_empty() {
            return Err(violations.into());
        }
        Ok(())
    }
}

pub struct CreateOrderHandler<F> {
    factory: Arc<F>,
    geo: Arc<dyn GeoLocator>,
}

impl<F: UnitOfWorkFactory> CreateOrderHandler<F> {
    pub fn new(factory: Arc<F>, geo: Arc<dyn GeoLocator>) -> Self {
        Self { factory, geo }
    }

    async fn execute(&self, uow: &mut F::UnitOfWork, cmd: CreateOrder) -> Result<(), AppError> {
        uow.begin().await?;

        match uow.orders().get(cmd.order_id).await {
            Ok(_) => {
                tracing::debug!(order_id = %cmd.order_id, "order already exists, skipping");
                uow.commit().await?;
                return Ok(());
            }
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err.into()),
        }

        let location = self.geo.locate(&cmd.street).await?;
        let order = Order::new(cmd.order_id, location, cmd.volume)?;
        uow.orders().add(&order).await?;
        uow.commit().await?;

        tracing::info!(order_id = %cmd.order_id, %location, volume = cmd.volume, "order created");
        Ok(())
    }
}

#[async_trait]
impl<F> CommandHandler<CreateOrder> for CreateOrderHandler<F>
where
    F: UnitOfWorkFactory + 'static,
{
    async fn handle(&self, _ctx: &AppContext, cmd: CreateOrder) -> Result<(), AppError> {
        cmd.validate()?;
        let mut uow = self.factory.create();
        let result = self.execute(&mut uow, cmd).await;
        release(&mut uow).await;
        result
    }
}
