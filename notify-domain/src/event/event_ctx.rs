use parking_lot::Mutex;

use super::envelope::EventEnvelope;

/// 请求级事件容器
///
/// 每个请求创建一次，由该请求的执行域独占；只支持追加，不支持删除或清空。
/// 请求内部扇出的并发子任务可以共享同一实例，追加通过内部互斥锁串行化。
///
/// 状态：`Created` → (零次或多次) `Appended` → `Drained`（由排空阶段读取，终态）。
/// 未被排空的容器随请求上下文一起被丢弃即可，无需显式清理。
#[derive(Debug, Default)]
pub struct EventCtx {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    events: Vec<EventEnvelope>,
    must_notify: bool,
    drained: bool,
}

impl EventCtx {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加事件
    ///
    /// - 载荷缺失的信封被静默丢弃；
    /// - `must_notify` 显式给出时覆盖当前标记（后写者生效）；
    /// - 排空之后仍可追加，但这些事件不会再被投递。
    pub fn append(&self, envelope: EventEnvelope, must_notify: Option<bool>) {
        if envelope.is_empty() {
            return;
        }

        let mut inner = self.inner.lock();
        if inner.drained {
            tracing::debug!(
                event_type = %envelope.event_type(),
                "event context already drained, event recorded but not dispatched"
            );
        }
        if let Some(flag) = must_notify {
            inner.must_notify = flag;
        }
        inner.events.push(envelope);
    }

    /// 是否强制通知（忽略请求结果）
    pub fn must_notify(&self) -> bool {
        self.inner.lock().must_notify
    }

    pub fn len(&self) -> usize {
        self.inner.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().events.is_empty()
    }

    pub fn is_drained(&self) -> bool {
        self.inner.lock().drained
    }

    /// 当前事件的快照（按追加顺序），不改变状态
    pub fn events(&self) -> Vec<EventEnvelope> {
        self.inner.lock().events.clone()
    }

    /// 标记进入 `Drained` 状态，返回之前是否已被排空
    ///
    /// 排空阶段只在返回 `false` 时读取并投递事件，由此保证只投递一次；
    /// 事件序列本身保持不变。
    pub fn mark_drained(&self) -> bool {
        std::mem::replace(&mut self.inner.lock().drained, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn env(ty: &str, n: usize) -> EventEnvelope {
        EventEnvelope::new(ty, json!({ "n": n }))
    }

    #[test]
    fn new_context_is_empty_and_not_forced() {
        let ec = EventCtx::new();
        assert!(ec.is_empty());
        assert!(!ec.must_notify());
        assert!(!ec.is_drained());
    }

    #[test]
    fn appends_preserve_call_order() {
        let ec = EventCtx::new();
        for n in 0..20 {
            ec.append(env("PUSH_ARTIFACT", n), None);
        }

        let events = ec.events();
        assert_eq!(events.len(), 20);
        for (i, e) in events.iter().enumerate() {
            assert_eq!(e.payload()["n"], i);
        }
    }

    #[test]
    fn null_payload_is_dropped() {
        let ec = EventCtx::new();
        ec.append(env("PUSH_ARTIFACT", 0), None);
        ec.append(EventEnvelope::new("PUSH_ARTIFACT", serde_json::Value::Null), Some(true));

        assert_eq!(ec.len(), 1);
        assert!(!ec.must_notify());
    }

    #[test]
    fn must_notify_last_write_wins() {
        let ec = EventCtx::new();
        ec.append(env("QUOTA_EXCEED", 0), Some(true));
        assert!(ec.must_notify());

        ec.append(env("QUOTA_EXCEED", 1), None);
        assert!(ec.must_notify());

        ec.append(env("QUOTA_EXCEED", 2), Some(false));
        assert!(!ec.must_notify());
    }

    #[test]
    fn mark_drained_reports_prior_state_and_keeps_events() {
        let ec = EventCtx::new();
        ec.append(env("PUSH_ARTIFACT", 0), None);
        ec.append(env("PULL_ARTIFACT", 1), None);

        assert!(!ec.mark_drained());
        assert!(ec.is_drained());
        assert!(ec.mark_drained());
        assert_eq!(ec.len(), 2);

        ec.append(env("DELETE_ARTIFACT", 2), None);
        let events = ec.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2].event_type().as_str(), "DELETE_ARTIFACT");
    }

    #[test]
    fn concurrent_appends_are_not_lost() {
        let ec = Arc::new(EventCtx::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let ec = ec.clone();
                std::thread::spawn(move || {
                    for n in 0..100 {
                        ec.append(env("SCANNING_COMPLETED", t * 100 + n), None);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let events = ec.events();
        assert_eq!(events.len(), 800);

        // 同一线程内的顺序保持不变
        for t in 0..8usize {
            let seq: Vec<u64> = events
                .iter()
                .map(|e| e.payload()["n"].as_u64().unwrap())
                .filter(|n| (*n as usize) / 100 == t)
                .collect();
            assert!(seq.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
