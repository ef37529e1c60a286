//! 通知领域统一错误定义
//!
//! 仅生产方的校验辅助函数与外部能力（策略匹配、钩子投递）会返回这些错误；
//! 事件追加、绑定与注册表查询不返回任何错误类型。
//!
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },

    // --- 生产方校验 ---
    #[error("unsupported event type: {event_type}")]
    UnsupportedEventType { event_type: String },
    #[error("unsupported notify type: {notify_type}")]
    UnsupportedNotifyType { notify_type: String },
    #[error("empty payload: event_type={event_type}")]
    EmptyPayload { event_type: String },

    // --- 外部能力 ---
    #[error("policy lookup error: event_type={event_type}, reason={reason}")]
    PolicyLookup { event_type: String, reason: String },
}

/// 统一 Result 类型别名
pub type NotifyResult<T> = Result<T, NotifyError>;

impl NotifyError {
    pub fn policy_lookup(event_type: impl Into<String>, reason: impl Into<String>) -> Self {
        NotifyError::PolicyLookup {
            event_type: event_type.into(),
            reason: reason.into(),
        }
    }
}
