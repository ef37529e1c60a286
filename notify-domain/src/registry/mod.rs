//! 支持类型注册表（Type Registry）
//!
//! 进程级目录，记录系统认可的事件类型与通知渠道类型。内容来自编译期固定列表，
//! 在进程启动时通过 `init()` 一次性写入不可变快照，此后只读且读取不加锁：
//! - 未初始化前查询返回空序列（降级但安全，不是错误）；
//! - 重复调用 `init()` 不改变快照，效果与首次相同；
//! - 列表顺序即声明顺序，多次调用保持稳定。
//!
//! 注册表只约束生产方能构造什么事件，`EventCtx` 追加时不做类型校验。

mod kinds;

pub use kinds::{EventType, NotifyType};

use std::sync::OnceLock;

use crate::error::{NotifyError, NotifyResult};

/// 推送制品
pub const TOPIC_PUSH_ARTIFACT: &str = "PUSH_ARTIFACT";
/// 拉取制品
pub const TOPIC_PULL_ARTIFACT: &str = "PULL_ARTIFACT";
/// 删除制品
pub const TOPIC_DELETE_ARTIFACT: &str = "DELETE_ARTIFACT";
/// 配额超限
pub const TOPIC_QUOTA_EXCEED: &str = "QUOTA_EXCEED";
/// 配额预警
pub const TOPIC_QUOTA_WARNING: &str = "QUOTA_WARNING";
/// 扫描失败
pub const TOPIC_SCANNING_FAILED: &str = "SCANNING_FAILED";
/// 扫描中止
pub const TOPIC_SCANNING_STOPPED: &str = "SCANNING_STOPPED";
/// 扫描完成
pub const TOPIC_SCANNING_COMPLETED: &str = "SCANNING_COMPLETED";
/// 复制
pub const TOPIC_REPLICATION: &str = "REPLICATION";
/// 标签保留
pub const TOPIC_TAG_RETENTION: &str = "TAG_RETENTION";

/// HTTP 回调
pub const NOTIFY_TYPE_HTTP: &str = "http";
/// Slack 消息
pub const NOTIFY_TYPE_SLACK: &str = "slack";

const SUPPORTED_EVENT_TYPES: [&str; 10] = [
    TOPIC_PUSH_ARTIFACT,
    TOPIC_PULL_ARTIFACT,
    TOPIC_DELETE_ARTIFACT,
    TOPIC_QUOTA_EXCEED,
    TOPIC_QUOTA_WARNING,
    TOPIC_SCANNING_FAILED,
    TOPIC_SCANNING_STOPPED,
    TOPIC_SCANNING_COMPLETED,
    TOPIC_REPLICATION,
    TOPIC_TAG_RETENTION,
];

const SUPPORTED_NOTIFY_TYPES: [&str; 2] = [NOTIFY_TYPE_HTTP, NOTIFY_TYPE_SLACK];

/// 注册表快照（不可变）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRegistry {
    event_types: Vec<EventType>,
    notify_types: Vec<NotifyType>,
}

impl TypeRegistry {
    /// 编译期固定列表构成的快照
    pub fn builtin() -> Self {
        Self {
            event_types: SUPPORTED_EVENT_TYPES.iter().map(|t| EventType::new(*t)).collect(),
            notify_types: SUPPORTED_NOTIFY_TYPES
                .iter()
                .map(|t| NotifyType::new(*t))
                .collect(),
        }
    }

    pub fn event_types(&self) -> &[EventType] {
        &self.event_types
    }

    pub fn notify_types(&self) -> &[NotifyType] {
        &self.notify_types
    }

    pub fn supports_event_type(&self, event_type: &str) -> bool {
        self.event_types.iter().any(|t| t.as_str() == event_type)
    }

    pub fn supports_notify_type(&self, notify_type: &str) -> bool {
        self.notify_types.iter().any(|t| t.as_str() == notify_type)
    }
}

static REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();

/// 初始化注册表；只在进程启动、处理请求之前调用
pub fn init() {
    let registry = REGISTRY.get_or_init(TypeRegistry::builtin);

    tracing::info!(
        event_types = registry.event_types.len(),
        notify_types = registry.notify_types.len(),
        "notification initialization completed"
    );
}

/// 当前快照；未初始化时为 `None`
pub fn snapshot() -> Option<&'static TypeRegistry> {
    REGISTRY.get()
}

pub fn is_initialized() -> bool {
    REGISTRY.get().is_some()
}

/// 支持的事件类型，未初始化时为空
pub fn supported_event_types() -> Vec<EventType> {
    snapshot()
        .map(|r| r.event_types().to_vec())
        .unwrap_or_default()
}

/// 支持的通知渠道类型，未初始化时为空
pub fn supported_notify_types() -> Vec<NotifyType> {
    snapshot()
        .map(|r| r.notify_types().to_vec())
        .unwrap_or_default()
}

pub fn is_supported_event_type(event_type: &str) -> bool {
    snapshot().is_some_and(|r| r.supports_event_type(event_type))
}

pub fn is_supported_notify_type(notify_type: &str) -> bool {
    snapshot().is_some_and(|r| r.supports_notify_type(notify_type))
}

/// 校验事件类型，供生产方或管理接口在构造前调用
pub fn ensure_event_type(value: &str) -> NotifyResult<EventType> {
    if is_supported_event_type(value) {
        Ok(EventType::new(value))
    } else {
        Err(NotifyError::UnsupportedEventType {
            event_type: value.to_string(),
        })
    }
}

/// 校验通知渠道类型
pub fn ensure_notify_type(value: &str) -> NotifyResult<NotifyType> {
    if is_supported_notify_type(value) {
        Ok(NotifyType::new(value))
    } else {
        Err(NotifyError::UnsupportedNotifyType {
            notify_type: value.to_string(),
        })
    }
}
