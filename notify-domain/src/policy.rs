//! 策略匹配（Policy Manager）协议
//!
//! 给定一个事件，返回关心该事件的订阅策略集合。策略的结构由实现方决定，
//! 这里只以泛型 `P` 透传给钩子投递方。
//!
//! `InMemoryPolicyManager` 按事件类型索引策略，适用于测试与本地装配。
//!
use crate::error::NotifyResult;
use crate::event::EventEnvelope;
use crate::registry::EventType;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;

/// 策略管理器：为事件查找匹配的订阅策略
#[async_trait]
pub trait PolicyManager<P>: Send + Sync {
    /// 返回匹配该事件的策略（可能为空）
    async fn matching(&self, event: &EventEnvelope) -> NotifyResult<Vec<P>>;
}

/// 策略订阅的事件类型
#[derive(Clone, Debug)]
pub enum SubscribedEventType {
    One(EventType),
    Many(Vec<EventType>),
    All,
}

/// 基于内存的策略索引
pub struct InMemoryPolicyManager<P> {
    by_type: DashMap<EventType, Vec<P>>,
    all: RwLock<Vec<P>>,
}

impl<P> Default for InMemoryPolicyManager<P> {
    fn default() -> Self {
        Self {
            by_type: DashMap::new(),
            all: RwLock::new(Vec::new()),
        }
    }
}

impl<P> InMemoryPolicyManager<P>
where
    P: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册策略
    pub fn register(&self, subscribed: SubscribedEventType, policy: P) {
        match subscribed {
            SubscribedEventType::All => self.all.write().push(policy),
            SubscribedEventType::One(t) => {
                self.by_type.entry(t).or_default().push(policy);
            }
            SubscribedEventType::Many(ts) => {
                for t in ts {
                    self.by_type.entry(t).or_default().push(policy.clone());
                }
            }
        }
    }

    fn lookup(&self, event_type: &EventType) -> Vec<P> {
        let mut merged: Vec<P> = Vec::new();
        if let Some(list) = self.by_type.get(event_type) {
            merged.extend(list.iter().cloned());
        }
        merged.extend(self.all.read().iter().cloned());
        merged
    }
}

#[async_trait]
impl<P> PolicyManager<P> for InMemoryPolicyManager<P>
where
    P: Clone + Send + Sync + 'static,
{
    async fn matching(&self, event: &EventEnvelope) -> NotifyResult<Vec<P>> {
        Ok(self.lookup(event.event_type()))
    }
}
