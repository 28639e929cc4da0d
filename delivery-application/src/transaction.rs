use delivery_domain::unit_of_work::UnitOfWork;

/// 命令结束后的收尾：无条件尝试回滚，吞掉回滚错误
///
/// 成功路径上事务已提交，此时回滚必然返回 `InvalidTransaction`，不记录；
/// 事务仍处于活动状态（处理中途失败）时回滚失败只记 warn，不覆盖原始错误。
pub(crate) async fn release<U: UnitOfWork>(uow: &mut U) {
    let was_active = uow.is_active();
    match uow.rollback().await {
        Ok(()) => tracing::debug!("unit of work rolled back"),
        Err(err) if was_active => tracing::warn!(error = %err, "rollback failed"),
        Err(_) => {}
    }
}
