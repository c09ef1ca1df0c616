//! Database row mappings.

mod editor_image;
mod quiz;
mod user;

pub use editor_image::EditorImageEntity;
pub use quiz::QuizEntity;
pub use user::UserEntity;
