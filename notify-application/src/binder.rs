//! 上下文绑定（Context Binder）
//!
//! 把请求级 `EventCtx` 挂到 `RequestContext` 上，并为调用链上任意位置的业务代码
//! 提供追加事件的入口。绑定使用本模块私有的键类型，其他组件无法通过可猜测的键
//! 读取或覆盖这一关联。
//!
//! 这里的所有操作都不返回错误：通知是尽力而为的旁路，记录失败只降级为
//! “未记录通知”，绝不影响调用方的主流程。
//!
use notify_domain::event::{EventCtx, EventEnvelope, EventMetadata};
use std::sync::Arc;

use crate::context::RequestContext;

// 私有键：只有本模块能命名这个类型
struct EventCtxSlot(Arc<EventCtx>);

/// 派生携带 `event_ctx` 的请求上下文；`ctx` 缺失时以新的根上下文代替
pub fn bind(ctx: Option<&RequestContext>, event_ctx: Arc<EventCtx>) -> RequestContext {
    match ctx {
        Some(ctx) => ctx.with_extension(EventCtxSlot(event_ctx)),
        None => RequestContext::background().with_extension(EventCtxSlot(event_ctx)),
    }
}

/// 取回绑定的事件容器
pub fn event_ctx(ctx: &RequestContext) -> Option<Arc<EventCtx>> {
    ctx.extension::<EventCtxSlot>().map(|slot| slot.0.clone())
}

/// 向请求上下文追加事件，事件最终由排空阶段发送
///
/// - `envelope` 为 `None` 或载荷缺失时不做任何事；
/// - 未绑定事件容器（例如不是由请求派生的后台任务）时只记录 debug 日志；
/// - `must_notify` 显式给出时覆盖容器的强制通知标记。
pub fn add_event(
    ctx: &RequestContext,
    envelope: impl Into<Option<EventEnvelope>>,
    must_notify: Option<bool>,
) {
    let Some(envelope) = envelope.into() else {
        return;
    };
    if envelope.is_empty() {
        return;
    }

    let Some(slot) = ctx.extension::<EventCtxSlot>() else {
        tracing::debug!(
            request_id = ctx.request_id.as_deref(),
            event_type = %envelope.event_type(),
            "request has no event context, cannot add event"
        );
        return;
    };

    slot.0.append(envelope, must_notify);
}

/// 解析生产方元数据后追加；解析失败只记录 debug 日志
pub fn add_metadata<M>(ctx: &RequestContext, metadata: &M, must_notify: Option<bool>)
where
    M: EventMetadata,
{
    match EventEnvelope::from_metadata(metadata) {
        Ok(envelope) => add_event(ctx, envelope, must_notify),
        Err(err) => {
            tracing::debug!(
                request_id = ctx.request_id.as_deref(),
                error = %err,
                "failed to resolve event metadata, event dropped"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bind_without_parent_creates_root() {
        let ec = Arc::new(EventCtx::new());
        let ctx = bind(None, ec.clone());

        assert!(ctx.request_id.is_none());
        assert!(Arc::ptr_eq(&event_ctx(&ctx).unwrap(), &ec));
    }

    #[test]
    fn bind_keeps_parent_identity() {
        let parent = RequestContext::new("req-7").with_actor("admin");
        let ctx = bind(Some(&parent), Arc::new(EventCtx::new()));

        assert_eq!(ctx.request_id.as_deref(), Some("req-7"));
        assert_eq!(ctx.actor_id.as_deref(), Some("admin"));
        assert!(event_ctx(&parent).is_none());
    }

    #[test]
    fn unbound_context_is_a_no_op() {
        let ctx = RequestContext::new("req-1");
        add_event(
            &ctx,
            EventEnvelope::new("PUSH_ARTIFACT", json!({"digest": "sha256:abc"})),
            Some(true),
        );
        assert!(event_ctx(&ctx).is_none());
    }

    #[test]
    fn none_and_null_payload_are_dropped() {
        let ec = Arc::new(EventCtx::new());
        let ctx = bind(None, ec.clone());

        add_event(&ctx, None, Some(true));
        add_event(
            &ctx,
            EventEnvelope::new("PUSH_ARTIFACT", serde_json::Value::Null),
            Some(true),
        );

        assert!(ec.is_empty());
        assert!(!ec.must_notify());
    }

    #[test]
    fn rebinding_shadows_previous_context() {
        let first = Arc::new(EventCtx::new());
        let second = Arc::new(EventCtx::new());
        let ctx = bind(Some(&bind(None, first.clone())), second.clone());

        add_event(&ctx, EventEnvelope::new("REPLICATION", json!({"id": 1})), None);

        assert!(first.is_empty());
        assert_eq!(second.len(), 1);
    }
}
