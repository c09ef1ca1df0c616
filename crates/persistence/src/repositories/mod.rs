//! Repository implementations.

mod editor_image;
mod quiz;
mod stats;
mod user;

pub use editor_image::EditorImageRepository;
pub use quiz::QuizRepository;
pub use stats::{PlatformCounts, StatsRepository};
pub use user::UserRepository;
