//! Quiz content model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Visibility of a quiz in listings, search, and the sitemap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizVisibility {
    Public,
    Private,
}

impl QuizVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizVisibility::Public => "public",
            QuizVisibility::Private => "private",
        }
    }
}

/// One selectable answer on a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAnswer {
    pub text: String,
    pub correct: bool,
}

/// A single question with its answers and time limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub text: String,
    /// Optional image shown alongside the question.
    pub image: Option<String>,
    /// Seconds the question stays open during a live game.
    pub time_secs: u32,
    pub answers: Vec<QuizAnswer>,
}

/// A quiz document as authored in the editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub visibility: QuizVisibility,
    pub cover_image: Option<String>,
    pub questions: Vec<QuizQuestion>,
    pub play_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quiz {
    /// Whether the quiz can appear in public listings and search.
    pub fn is_public(&self) -> bool {
        self.visibility == QuizVisibility::Public
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_serde() {
        assert_eq!(
            serde_json::to_string(&QuizVisibility::Public).unwrap(),
            "\"public\""
        );
        let parsed: QuizVisibility = serde_json::from_str("\"private\"").unwrap();
        assert_eq!(parsed, QuizVisibility::Private);
    }

    #[test]
    fn test_visibility_as_str() {
        assert_eq!(QuizVisibility::Public.as_str(), "public");
        assert_eq!(QuizVisibility::Private.as_str(), "private");
    }

    #[test]
    fn test_quiz_is_public() {
        let quiz = Quiz {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Capitals".to_string(),
            description: String::new(),
            visibility: QuizVisibility::Public,
            cover_image: None,
            questions: vec![],
            play_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(quiz.is_public());
    }

    #[test]
    fn test_question_round_trip() {
        let question = QuizQuestion {
            text: "Capital of France?".to_string(),
            image: None,
            time_secs: 20,
            answers: vec![
                QuizAnswer {
                    text: "Paris".to_string(),
                    correct: true,
                },
                QuizAnswer {
                    text: "Lyon".to_string(),
                    correct: false,
                },
            ],
        };
        let json = serde_json::to_string(&question).unwrap();
        let back: QuizQuestion = serde_json::from_str(&json).unwrap();
        assert_eq!(back.answers.len(), 2);
        assert!(back.answers[0].correct);
    }
}
