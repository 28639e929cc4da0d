//! 写用例
//!
//! 所有处理器遵循同一流程：校验命令 → 创建工作单元 → begin / 读取 / 领域操作 / 写入 / commit
//! → 无条件回滚收尾（吞掉回滚错误）→ 返回主体结果。
//!
mod add_courier_storage;
mod assign_courier;
mod create_courier;
mod create_order;
mod move_couriers;

pub use add_courier_storage::{AddCourierStorage, AddCourierStorageHandler};
pub use assign_courier::{AssignCourier, AssignCourierHandler, Assignment};
pub use create_courier::{CreateCourier, CreateCourierHandler};
pub use create_order::{CreateOrder, CreateOrderHandler};
pub use move_couriers::{MoveCouriers, MoveCouriersHandler, MoveReport};
