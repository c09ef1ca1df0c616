//! Background job scheduler and job implementations.

mod cleanup_editor_images;
mod pool_metrics;
mod scheduler;

pub use cleanup_editor_images::CleanupEditorImagesJob;
pub use pool_metrics::PoolMetricsJob;
pub use scheduler::{Job, JobScheduler};
