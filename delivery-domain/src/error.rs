//! 领域层统一错误定义
//!
//! 按语义分组：构造校验、状态流转、查找、容量、基础设施。
//! 各组通过 [`ErrorKind`] 对外暴露，便于接口层映射为客户端错误/未找到/服务端错误，
//! 也便于周期触发器区分“暂无待分配订单/暂无空闲骑手”这类预期结果。
//!
use std::fmt;
use thiserror::Error;

/// 单个字段的校验失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub reason: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// 校验错误累加器
///
/// 构造聚合/值对象时逐字段收集失败项，而不是遇到第一个错误就返回，
/// 以便调用方一次看到全部问题。
///
/// ```
/// use delivery_domain::error::{DomainError, Violations};
///
/// let mut violations = Violations::new();
/// violations.check(false, "name", "must not be empty");
/// violations.check(false, "speed", "must be positive");
///
/// match violations.into_result() {
///     Err(DomainError::Validation(v)) => assert_eq!(v.len(), 2),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, reason: impl Into<String>) {
        self.0.push(Violation {
            field,
            reason: reason.into(),
        });
    }

    /// 条件不成立时记录一条失败
    pub fn check(&mut self, ok: bool, field: &'static str, reason: impl Into<String>) {
        if !ok {
            self.push(field, reason);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    /// 是否包含指定字段的失败项
    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }

    /// 有失败项时转换为 `DomainError::Validation`
    pub fn into_result(self) -> DomainResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self))
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// 错误分组
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Transition,
    NotFound,
    Capacity,
    Infrastructure,
}

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 构造/校验 ---
    #[error("validation failed: {0}")]
    Validation(Violations),
    #[error("parse error: {reason}")]
    Parse { reason: String },
    #[error("already exists: {entity} {id}")]
    AlreadyExists { entity: &'static str, id: String },

    // --- 状态流转 ---
    #[error("invalid transition: cannot {action} {aggregate} in status {from}")]
    InvalidTransition {
        aggregate: &'static str,
        from: String,
        action: &'static str,
    },
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },

    // --- 查找 ---
    #[error("not found: {entity} ({reason})")]
    NotFound { entity: &'static str, reason: String },
    /// 没有处于 `Created` 的订单，周期分配的预期结果
    #[error("no pending order: no order in created status")]
    NoPendingOrder,

    // --- 容量 ---
    #[error("storage place not found: {reason}")]
    StoragePlaceNotFound { reason: String },
    #[error("courier not found: no courier can take order {order_id}")]
    CourierNotFound { order_id: String },

    // --- 基础设施 ---
    #[error("invalid transaction: {reason}")]
    InvalidTransaction { reason: String },
    #[error("database error: {reason}")]
    Database { reason: String },
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// 单字段校验失败
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        let mut violations = Violations::new();
        violations.push(field, reason);
        DomainError::Validation(violations)
    }

    pub fn not_found(entity: &'static str, reason: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation(_)
            | DomainError::Parse { .. }
            | DomainError::AlreadyExists { .. } => ErrorKind::Validation,
            DomainError::InvalidTransition { .. } | DomainError::InvalidState { .. } => {
                ErrorKind::Transition
            }
            DomainError::NotFound { .. } | DomainError::NoPendingOrder => ErrorKind::NotFound,
            DomainError::StoragePlaceNotFound { .. } | DomainError::CourierNotFound { .. } => {
                ErrorKind::Capacity
            }
            DomainError::InvalidTransaction { .. }
            | DomainError::Database { .. } => ErrorKind::Infrastructure,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound { .. })
    }

    pub fn is_courier_not_found(&self) -> bool {
        matches!(self, DomainError::CourierNotFound { .. })
    }

    /// 暂无待分配订单或暂无可接单骑手；其余查找失败都不算
    pub fn is_idle(&self) -> bool {
        matches!(
            self,
            DomainError::NoPendingOrder | DomainError::CourierNotFound { .. }
        )
    }
}

// ---- Cross-crate conversions for infrastructure convenience ----

#[cfg(feature = "infra-sqlx")]
impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DomainError::NotFound {
                entity: "row",
                reason: "row not found".to_string(),
            },
            other => DomainError::Database {
                reason: other.to_string(),
            },
        }
    }
}

impl From<uuid::Error> for DomainError {
    fn from(err: uuid::Error) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}
