use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 请求上下文（Request Context）
///
/// 承载一次请求处理过程中需要沿调用链隐式传递的横切信息：
/// - 请求标识 `request_id` 与执行者 `actor_id`（日志与审计）；
/// - 按类型索引的扩展值（例如请求级事件容器），只能通过值类型本身取回，
///   类型不公开的扩展其他组件无法读取或覆盖。
///
/// 克隆成本很低；派生新上下文时写时复制，不会修改父上下文。
///
/// 典型用法：
/// ```rust
/// use notify_application::context::RequestContext;
///
/// #[derive(Debug, PartialEq)]
/// struct Tenant(&'static str);
///
/// let root = RequestContext::new("req-1");
/// let derived = root.with_extension(Tenant("acme"));
///
/// assert_eq!(derived.extension::<Tenant>(), Some(&Tenant("acme")));
/// assert!(root.extension::<Tenant>().is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    /// 请求标识（可选）
    pub request_id: Option<String>,
    /// 执行者标识（可选）
    pub actor_id: Option<String>,
    extensions: Extensions,
}

impl RequestContext {
    /// 创建带请求标识的根上下文
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: Some(request_id.into()),
            ..Self::default()
        }
    }

    /// 不属于任何请求的根上下文（后台任务等）
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    /// 派生一个携带扩展值的新上下文；同类型的已有值被遮蔽
    pub fn with_extension<T>(&self, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        let mut derived = self.clone();
        derived.extensions.insert(value);
        derived
    }

    /// 按类型取回扩展值
    pub fn extension<T>(&self) -> Option<&T>
    where
        T: Any + Send + Sync,
    {
        self.extensions.get::<T>()
    }
}

#[derive(Clone, Default)]
struct Extensions {
    map: Option<Arc<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>>,
}

impl Extensions {
    fn insert<T>(&mut self, value: T)
    where
        T: Any + Send + Sync,
    {
        let mut map = self.map.as_deref().cloned().unwrap_or_default();
        map.insert(TypeId::of::<T>(), Arc::new(value));
        self.map = Some(Arc::new(map));
    }

    fn get<T>(&self) -> Option<&T>
    where
        T: Any + Send + Sync,
    {
        self.map
            .as_ref()?
            .get(&TypeId::of::<T>())?
            .downcast_ref::<T>()
    }

    fn len(&self) -> usize {
        self.map.as_ref().map_or(0, |m| m.len())
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions").field("len", &self.len()).finish()
    }
}
