use crate::context::AppContext;
use crate::dto::CourierDto;
use crate::error::AppError;
use crate::query::Query;
use crate::query_handler::QueryHandler;
use async_trait::async_trait;
use delivery_domain::repository::CourierRepository;
use delivery_domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use std::sync::Arc;

/// 全部骑手（含存储位占用情况），按登记顺序
#[derive(Debug, Clone, Copy, Default)]
pub struct GetCouriers;

impl Query for GetCouriers {
    const NAME: &'static str = "delivery.get_couriers";
    type Dto = Vec<CourierDto>;
}

pub struct GetCouriersHandler<F> {
    factory: Arc<F>,
}

impl<F: UnitOfWorkFactory> GetCouriersHandler<F> {
    pub fn new(factory: Arc<F>) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl<F> QueryHandler<GetCouriers> for GetCouriersHandler<F>
where
    F: UnitOfWorkFactory + 'static,
{
    async fn handle(&self, _ctx: &AppContext, _q: GetCouriers) -> Result<Vec<CourierDto>, AppError> {
        let couriers = self.factory.create().couriers().get_all().await?;
        Ok(couriers.iter().map(CourierDto::from).collect())
    }
}
