//! Editor image entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the editor_images table.
///
/// An image is uploaded before the quiz that references it is saved, so
/// `quiz_id` stays NULL until the editor attaches it. Rows that are never
/// attached are collected by the cleanup job.
#[derive(Debug, Clone, FromRow)]
pub struct EditorImageEntity {
    pub id: Uuid,
    pub uploader_id: Uuid,
    pub storage_key: String,
    pub quiz_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl EditorImageEntity {
    /// Whether the image has been attached to a saved quiz.
    pub fn is_attached(&self) -> bool {
        self.quiz_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_attached() {
        let mut entity = EditorImageEntity {
            id: Uuid::new_v4(),
            uploader_id: Uuid::new_v4(),
            storage_key: "editor/abc.png".to_string(),
            quiz_id: None,
            created_at: Utc::now(),
        };
        assert!(!entity.is_attached());
        entity.quiz_id = Some(Uuid::new_v4());
        assert!(entity.is_attached());
    }
}
