pub mod binder;
pub mod config;
pub mod context;
pub mod drainer;

pub use binder::{add_event, add_metadata, bind, event_ctx};
pub use config::DrainConfig;
pub use context::RequestContext;
pub use drainer::{DrainReport, EventDrainer, RequestOutcome};
