use crate::error::AppError;

/// 应用层命令（Command）
///
/// 表达“意图”的写操作请求，通常会修改领域状态。
/// - 建议保持语义化的“动宾结构”命名，如 `CreateOrder`、`AssignCourier`；
/// - `Output` 为执行成功后的结果（如新建实体的标识），无结果时使用 `()`；
/// - `validate` 只做与存储无关的输入校验，处理器在开启工作单元前调用。
///
/// 关联常量：
/// - `NAME`：命令的稳定名称，用于日志、追踪与路由。避免依赖 `type_name::<T>()`。
pub trait Command: Send + Sync + 'static {
    /// 命令的稳定名称（建议常量字符串，不随重构变化）
    const NAME: &'static str;

    /// 执行结果
    type Output: Send + 'static;

    /// 输入校验，失败时应汇总全部问题字段
    fn validate(&self) -> Result<(), AppError> {
        Ok(())
    }
}
