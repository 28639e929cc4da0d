use delivery_domain::error::{DomainError, ErrorKind, Violations};

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// 领域/持久化错误原样透传
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// 命令输入校验失败（汇总全部字段）
    #[error("validation: {0}")]
    Validation(Violations),

    #[error("handler not found: {0}")]
    HandlerNotFound(&'static str),

    #[error("handler already registered: command={command}")]
    AlreadyRegisteredCommand { command: &'static str },

    #[error("handler already registered: query={query}")]
    AlreadyRegisteredQuery { query: &'static str },

    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl AppError {
    /// 单字段输入校验失败
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        let mut violations = Violations::new();
        violations.push(field, reason);
        AppError::Validation(violations)
    }

    /// 接口层映射用的错误分组；总线自身的错误视为基础设施错误
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Domain(err) => err.kind(),
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::HandlerNotFound(_)
            | AppError::AlreadyRegisteredCommand { .. }
            | AppError::AlreadyRegisteredQuery { .. }
            | AppError::TypeMismatch { .. } => ErrorKind::Infrastructure,
        }
    }

    /// 周期触发时的“空转”结果：暂无待分配订单、暂无可用骑手
    pub fn is_idle(&self) -> bool {
        matches!(self, AppError::Domain(err) if err.is_idle())
    }
}

impl From<Violations> for AppError {
    fn from(violations: Violations) -> Self {
        AppError::Validation(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_are_transparent() {
        let err: AppError = DomainError::not_found("order", "no order in created status").into();
        assert_eq!(
            err.to_string(),
            "not found: order (no order in created status)"
        );
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn idle_outcomes_are_recognized() {
        let no_order: AppError = DomainError::NoPendingOrder.into();
        let no_courier: AppError = DomainError::CourierNotFound {
            order_id: "o-1".into(),
        }
        .into();
        let broken: AppError = DomainError::Database {
            reason: "down".into(),
        }
        .into();

        let dangling: AppError = DomainError::not_found("courier", "id 1").into();

        assert!(no_order.is_idle());
        assert!(!dangling.is_idle());
        assert!(no_courier.is_idle());
        assert!(!broken.is_idle());
        assert!(!AppError::invalid("name", "empty").is_idle());
        assert_eq!(broken.kind(), ErrorKind::Infrastructure);
    }
}
