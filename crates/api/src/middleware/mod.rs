//! HTTP middleware components.

pub mod capture;
pub mod logging;
pub mod metrics;
pub mod remember_me;
pub mod session;
pub mod trace_id;

pub use capture::capture_errors;
pub use metrics::{init_metrics, metrics_handler, metrics_middleware};
pub use remember_me::{remember_me_middleware, CurrentUser};
pub use session::{session_middleware, Session};
pub use trace_id::{trace_id, RequestId};
