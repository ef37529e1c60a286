use serde::Serialize;

use crate::error::NotifyResult;
use crate::registry::EventType;

/// 事件生产方的强类型元数据
///
/// 每类事件由生产方定义自己的结构体，解析为 `EventEnvelope` 的载荷；
/// 默认实现直接做 JSON 序列化。
pub trait EventMetadata: Serialize {
    /// 事件类型，应为注册表中的一项
    fn event_type(&self) -> EventType;

    /// 解析为信封载荷
    fn resolve(&self) -> NotifyResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
