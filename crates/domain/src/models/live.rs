//! Live game boundary types.
//!
//! The live-quiz message protocol is owned by the socket layer; these types
//! only describe what the HTTP surface exposes about a running game.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Summary of an active live game, as returned by the live route group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveGameSummary {
    pub game_pin: String,
    pub quiz_id: Uuid,
    pub player_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_serialization() {
        let summary = LiveGameSummary {
            game_pin: "123456".to_string(),
            quiz_id: Uuid::new_v4(),
            player_count: 12,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"game_pin\":\"123456\""));
        assert!(json.contains("\"player_count\":12"));
    }
}
