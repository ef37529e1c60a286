//! 通知领域层基础库（notify-domain）
//!
//! 负责把一次请求处理过程中产生的领域事件收集起来，按到达顺序交给后续的
//! 通知阶段，由其决定是否以及如何通知外部订阅方：
//! - 支持类型注册表（`registry`）：进程级、初始化后只读的事件类型与通知渠道类型目录
//! - 事件（`event`）：事件信封 `EventEnvelope`、生产方元数据 `EventMetadata`
//!   以及请求级事件容器 `EventCtx`
//! - 外部能力（`policy`、`hook`）：策略匹配与钩子投递的协议，仅定义契约
//!
//! 本 crate 不做网络 I/O，也不持久化策略或事件；事件的追加永远不会向调用方
//! 返回错误，失败一律降级为“未记录通知”。
//!
//! 典型用法：
//! 1. 进程启动时调用 `registry::init()`；
//! 2. 每个请求创建一个 `EventCtx`，由应用层绑定到请求上下文；
//! 3. 业务代码在任意调用层追加 `EventEnvelope`；
//! 4. 请求结束后由排空阶段读取事件，交给 `PolicyManager` 与 `HookDispatcher`。
//!
pub mod error;
pub mod event;
pub mod hook;
pub mod policy;
pub mod registry;
