//! 钩子投递（Hook Dispatcher）协议
//!
//! 对匹配到的策略执行实际的外部投递（HTTP 回调、Slack 消息等）。
//! 重试、渠道协议与成功判定都属于实现方，本层不关心。
//!
use crate::event::EventEnvelope;
use async_trait::async_trait;

/// 钩子投递器：把事件投递给某条策略
#[async_trait]
pub trait HookDispatcher<P>: Send + Sync {
    /// 投递器名称（用于日志）
    fn dispatcher_name(&self) -> &str;

    /// 投递事件
    async fn deliver(&self, policy: &P, event: &EventEnvelope) -> anyhow::Result<()>;
}
