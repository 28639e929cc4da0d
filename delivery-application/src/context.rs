use bon::Builder;

/// 应用层上下文（Application Context）
///
/// 承载一次应用层调用（命令/查询）所需的横切信息：
/// - 关联追踪 `correlation_id`：串联一次请求在各层的日志；
/// - 调用方 `actor`：例如 `user:42`、`scheduler`。
///
/// 命令总线会把这两个字段记录到 `command` span 上。
///
/// 典型用法：
/// ```rust
/// use delivery_application::context::AppContext;
///
/// let ctx = AppContext::builder()
///     .correlation_id("cor-123".into())
///     .actor("user:42".into())
///     .build();
/// assert_eq!(ctx.correlation_id(), Some("cor-123"));
/// assert_eq!(AppContext::system("scheduler").actor(), Some("scheduler"));
/// ```
#[derive(Builder, Clone, Debug, Default)]
pub struct AppContext {
    /// 关联 ID
    correlation_id: Option<String>,
    /// 调用方
    actor: Option<String>,
}

impl AppContext {
    /// 系统内部触发（无关联 ID）
    pub fn system(actor: &str) -> Self {
        Self {
            correlation_id: None,
            actor: Some(actor.to_string()),
        }
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }
}
