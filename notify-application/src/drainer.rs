//! 排空阶段（EventDrainer）
//!
//! 请求结束后读取请求级事件容器，按到达顺序逐个事件：
//! - 交给 `PolicyManager` 查找匹配的策略；
//! - 对每条策略调用 `HookDispatcher` 投递（同一事件内有限并发）。
//!
//! 查找与投递的失败只记录日志并计入 `DrainReport`，不会返回给调用方。
//! 请求失败且未设置强制通知时，事件被丢弃而不投递。
//!
use bon::Builder;
use futures_util::{StreamExt, stream};
use notify_domain::event::{EventCtx, EventEnvelope};
use notify_domain::hook::HookDispatcher;
use notify_domain::policy::PolicyManager;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::binder;
use crate::config::DrainConfig;
use crate::context::RequestContext;

/// 请求结果
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    Succeeded,
    Failed,
}

impl RequestOutcome {
    /// 按 HTTP 状态码判定：2xx 视为成功
    pub fn from_status(status: u16) -> Self {
        if (200..300).contains(&status) {
            Self::Succeeded
        } else {
            Self::Failed
        }
    }
}

impl<T, E> From<&Result<T, E>> for RequestOutcome {
    fn from(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            Self::Succeeded
        } else {
            Self::Failed
        }
    }
}

/// 一次排空的统计
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// 参与匹配的事件数
    pub events: usize,
    /// 未投递而被丢弃的事件数
    pub discarded: usize,
    /// 投递成功次数
    pub delivered: usize,
    /// 投递失败次数
    pub failed: usize,
    /// 策略查找失败的事件数
    pub lookup_failures: usize,
}

/// 排空器：连接请求级事件容器与外部的策略匹配、钩子投递能力
#[derive(Builder)]
pub struct EventDrainer<P> {
    policy_manager: Arc<dyn PolicyManager<P>>,
    hook_dispatcher: Arc<dyn HookDispatcher<P>>,
    #[builder(default)]
    config: DrainConfig,
}

impl<P> EventDrainer<P>
where
    P: fmt::Debug + Send + Sync + 'static,
{
    pub fn config(&self) -> &DrainConfig {
        &self.config
    }

    fn should_notify(&self, event_ctx: &EventCtx, outcome: RequestOutcome) -> bool {
        outcome == RequestOutcome::Succeeded
            || event_ctx.must_notify()
            || self.config.notify_on_failure
    }

    /// 排空事件容器；只读取事件，每个容器只会被实际投递一次
    pub async fn drain(&self, event_ctx: &EventCtx, outcome: RequestOutcome) -> DrainReport {
        let mut report = DrainReport::default();

        if event_ctx.mark_drained() {
            tracing::debug!("event context already drained, skipping");
            return report;
        }

        if !self.should_notify(event_ctx, outcome) {
            report.discarded = event_ctx.len();
            if report.discarded > 0 {
                tracing::debug!(
                    discarded = report.discarded,
                    "request failed without must_notify, events discarded"
                );
            }
            return report;
        }

        for event in event_ctx.events() {
            report.events += 1;

            let policies = match self.policy_manager.matching(&event).await {
                Ok(policies) => policies,
                Err(err) => {
                    report.lookup_failures += 1;
                    tracing::warn!(
                        event_id = %event.event_id(),
                        event_type = %event.event_type(),
                        error = %err,
                        "failed to look up notification policies"
                    );
                    continue;
                }
            };
            if policies.is_empty() {
                continue;
            }

            tracing::debug!(
                event_id = %event.event_id(),
                event_type = %event.event_type(),
                policies = policies.len(),
                "dispatching event"
            );

            let concurrency = self.config.dispatch_concurrency.max(1);
            let outcomes: Vec<bool> = stream::iter(policies)
                .map(|policy| self.deliver(policy, &event))
                .buffer_unordered(concurrency)
                .collect()
                .await;

            let delivered = outcomes.iter().filter(|ok| **ok).count();
            report.delivered += delivered;
            report.failed += outcomes.len() - delivered;
        }

        report
    }

    async fn deliver(&self, policy: P, event: &EventEnvelope) -> bool {
        match self.hook_dispatcher.deliver(&policy, event).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(
                    dispatcher = self.hook_dispatcher.dispatcher_name(),
                    policy = ?policy,
                    event_id = %event.event_id(),
                    event_type = %event.event_type(),
                    error = %err,
                    "failed to deliver event"
                );
                false
            }
        }
    }

    /// 以新的事件容器包裹一次请求处理：绑定、执行、再按结果排空
    pub async fn scope<F, Fut, T, E>(
        &self,
        parent: Option<&RequestContext>,
        handler: F,
    ) -> (Result<T, E>, DrainReport)
    where
        F: FnOnce(RequestContext) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let event_ctx = Arc::new(EventCtx::new());
        let ctx = binder::bind(parent, event_ctx.clone());

        let result = handler(ctx).await;
        let report = self.drain(&event_ctx, RequestOutcome::from(&result)).await;

        (result, report)
    }
}
