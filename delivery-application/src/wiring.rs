use crate::commands::{
    AddCourierStorage, AddCourierStorageHandler, AssignCourier, AssignCourierHandler,
    CreateCourier, CreateCourierHandler, CreateOrder, CreateOrderHandler, MoveCouriers,
    MoveCouriersHandler,
};
use crate::error::AppError;
use crate::geo::GeoLocator;
use crate::queries::{
    GetCouriers, GetCouriersHandler, GetIncompleteOrders, GetIncompleteOrdersHandler,
};
use crate::{InMemoryCommandBus, InMemoryQueryBus};
use delivery_domain::unit_of_work::UnitOfWorkFactory;
use std::sync::Arc;

/// 把全部配送命令与查询处理器注册到进程内总线
pub fn register_delivery_handlers<F>(
    commands: &InMemoryCommandBus,
    queries: &InMemoryQueryBus,
    factory: Arc<F>,
    geo: Arc<dyn GeoLocator>,
) -> Result<(), AppError>
where
    F: UnitOfWorkFactory + 'static,
{
    commands.register::<CreateOrder, _>(Arc::new(CreateOrderHandler::new(factory.clone(), geo)))?;
    commands.register::<CreateCourier, _>(Arc::new(CreateCourierHandler::new(factory.clone())))?;
    commands.register::<AddCourierStorage, _>(Arc::new(AddCourierStorageHandler::new(
        factory.clone(),
    )))?;
    commands.register::<AssignCourier, _>(Arc::new(AssignCourierHandler::new(factory.clone())))?;
    commands.register::<MoveCouriers, _>(Arc::new(MoveCouriersHandler::new(factory.clone())))?;

    queries.register::<GetCouriers, _>(Arc::new(GetCouriersHandler::new(factory.clone())))?;
    queries.register::<GetIncompleteOrders, _>(Arc::new(GetIncompleteOrdersHandler::new(factory)))?;

    tracing::debug!(
        commands = ?commands.registered_commands(),
        queries = ?queries.registered_queries(),
        "delivery handlers registered"
    );
    Ok(())
}
