use crate::context::AppContext;
use crate::dto::OrderDto;
use crate::error::AppError;
use crate::query::Query;
use crate::query_handler::QueryHandler;
use async_trait::async_trait;
use delivery_domain::repository::OrderRepository;
use delivery_domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use std::sync::Arc;

/// 未完成（待分配或配送中）的订单，按创建顺序
#[derive(Debug, Clone, Copy, Default)]
pub struct GetIncompleteOrders;

impl Query for GetIncompleteOrders {
    const NAME: &'static str = "delivery.get_incomplete_orders";
    type Dto = Vec<OrderDto>;
}

pub struct GetIncompleteOrdersHandler<F> {
    factory: Arc<F>,
}

impl<F: UnitOfWorkFactory> GetIncompleteOrdersHandler<F> {
    pub fn new(factory: Arc<F>) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl<F> QueryHandler<GetIncompleteOrders> for GetIncompleteOrdersHandler<F>
where
    F: UnitOfWorkFactory + 'static,
{
    async fn handle(
        &self,
        _ctx: &AppContext,
        _q: GetIncompleteOrders,
    ) -> Result<Vec<OrderDto>, AppError> {
        let orders = self.factory.create().orders().get_all_incomplete().await?;
        Ok(orders.iter().map(OrderDto::from).collect())
    }
}
