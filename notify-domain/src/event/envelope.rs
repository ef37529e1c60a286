use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{NotifyError, NotifyResult};
use crate::registry::{self, EventType};

use super::metadata::EventMetadata;

/// 事件信封：一次事件发生的类型与载荷，构造后不可变
///
/// 载荷结构由各事件生产方决定，本层只把它当作不透明的 JSON 值；
/// `null` 视为缺失载荷，追加时会被静默丢弃。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    event_id: Uuid,
    event_type: EventType,
    payload: serde_json::Value,
    occurred_at: DateTime<Utc>,
}

impl EventEnvelope {
    /// 直接构造，不做任何校验
    pub fn new(event_type: impl Into<EventType>, payload: serde_json::Value) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: event_type.into(),
            payload,
            occurred_at: Utc::now(),
        }
    }

    /// 生产方校验：事件类型必须已注册，载荷不能为空
    pub fn try_new(
        event_type: impl Into<EventType>,
        payload: serde_json::Value,
    ) -> NotifyResult<Self> {
        let event_type = event_type.into();

        if !registry::is_supported_event_type(event_type.as_str()) {
            return Err(NotifyError::UnsupportedEventType {
                event_type: event_type.to_string(),
            });
        }
        if payload.is_null() {
            return Err(NotifyError::EmptyPayload {
                event_type: event_type.to_string(),
            });
        }

        Ok(Self::new(event_type, payload))
    }

    /// 由生产方的强类型元数据解析出信封
    pub fn from_metadata<M>(metadata: &M) -> NotifyResult<Self>
    where
        M: EventMetadata,
    {
        let payload = metadata.resolve()?;
        Self::try_new(metadata.event_type(), payload)
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    pub fn occurred_at(&self) -> &DateTime<Utc> {
        &self.occurred_at
    }

    /// 载荷是否缺失
    pub fn is_empty(&self) -> bool {
        self.payload.is_null()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{TOPIC_PUSH_ARTIFACT, init};
    use serde::Serialize;
    use serde_json::json;

    #[derive(Serialize)]
    struct PushArtifact {
        repository: String,
        digest: String,
    }

    impl EventMetadata for PushArtifact {
        fn event_type(&self) -> EventType {
            EventType::new(TOPIC_PUSH_ARTIFACT)
        }
    }

    #[test]
    fn new_keeps_payload_verbatim() {
        let env = EventEnvelope::new("anything", json!({"digest": "sha256:abc"}));
        assert_eq!(env.event_type().as_str(), "anything");
        assert_eq!(env.payload()["digest"], "sha256:abc");
        assert!(!env.is_empty());
        assert!(EventEnvelope::new("anything", serde_json::Value::Null).is_empty());
    }

    #[test]
    fn try_new_rejects_unknown_type_and_null_payload() {
        init();

        let err = EventEnvelope::try_new("push artifact", json!({})).unwrap_err();
        assert!(matches!(err, NotifyError::UnsupportedEventType { .. }));

        let err = EventEnvelope::try_new(TOPIC_PUSH_ARTIFACT, serde_json::Value::Null).unwrap_err();
        assert!(matches!(err, NotifyError::EmptyPayload { .. }));

        assert!(EventEnvelope::try_new(TOPIC_PUSH_ARTIFACT, json!({"tag": "v1"})).is_ok());
    }

    #[test]
    fn from_metadata_serializes_producer_struct() {
        init();

        let env = EventEnvelope::from_metadata(&PushArtifact {
            repository: "library/nginx".into(),
            digest: "sha256:abc".into(),
        })
        .unwrap();

        assert_eq!(env.event_type().as_str(), TOPIC_PUSH_ARTIFACT);
        assert_eq!(
            env.payload(),
            &json!({"repository": "library/nginx", "digest": "sha256:abc"})
        );
    }
}
