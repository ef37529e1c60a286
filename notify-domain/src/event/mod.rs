//! 事件（Event）与请求级事件容器
//!
//! 定义在管道中流转的 `EventEnvelope`、生产方实现的 `EventMetadata`，
//! 以及每个请求独占、只追加的事件容器 `EventCtx`。

mod envelope;
mod event_ctx;
mod metadata;

pub use envelope::EventEnvelope;
pub use event_ctx::EventCtx;
pub use metadata::EventMetadata;
