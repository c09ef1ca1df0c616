//! Root-mounted WebSocket transport for live games.
//!
//! The HTTP side of a live game only registers a pin and looks it up; the
//! actual quiz flow (questions, answers, scoring) is spoken over this
//! transport by the host and the players. This module carries the boundary:
//! connect, join a pin, relay envelopes, disconnect.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use domain::models::LiveGameSummary;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::app::AppState;

const GAME_CHANNEL_CAPACITY: usize = 256;

/// Message envelope spoken over the transport.
///
/// The payload of `Message` is opaque to this layer; the live-game protocol
/// defines its contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsEnvelope {
    /// First frame a client must send: join a running game.
    Join { game_pin: String },
    /// Relayed to every participant of the joined game.
    Message { payload: serde_json::Value },
    /// Server-side rejection or failure notice.
    Error { message: String },
}

struct LiveGame {
    quiz_id: Uuid,
    sender: broadcast::Sender<String>,
    players: usize,
}

/// Registry of running live games, shared between the HTTP surface and the
/// socket transport.
#[derive(Clone, Default)]
pub struct LiveHub {
    games: Arc<RwLock<HashMap<String, LiveGame>>>,
}

impl LiveHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new game under `pin`. Returns false when the pin is
    /// already taken.
    pub async fn register_game(&self, pin: &str, quiz_id: Uuid) -> bool {
        let mut games = self.games.write().await;
        if games.contains_key(pin) {
            return false;
        }
        let (sender, _) = broadcast::channel(GAME_CHANNEL_CAPACITY);
        games.insert(
            pin.to_string(),
            LiveGame {
                quiz_id,
                sender,
                players: 0,
            },
        );
        true
    }

    /// Removes a game, disconnecting nothing; participants observe the
    /// closed channel on their next receive.
    pub async fn unregister_game(&self, pin: &str) -> bool {
        self.games.write().await.remove(pin).is_some()
    }

    /// Summary of a running game, if any.
    pub async fn lookup(&self, pin: &str) -> Option<LiveGameSummary> {
        self.games.read().await.get(pin).map(|game| LiveGameSummary {
            game_pin: pin.to_string(),
            quiz_id: game.quiz_id,
            player_count: game.players,
        })
    }

    async fn join(&self, pin: &str) -> Option<broadcast::Receiver<String>> {
        let mut games = self.games.write().await;
        let game = games.get_mut(pin)?;
        game.players += 1;
        Some(game.sender.subscribe())
    }

    async fn leave(&self, pin: &str) {
        if let Some(game) = self.games.write().await.get_mut(pin) {
            game.players = game.players.saturating_sub(1);
        }
    }

    async fn publish(&self, pin: &str, text: String) {
        if let Some(game) = self.games.read().await.get(pin) {
            // Send only fails when every receiver is gone; nothing to do then.
            let _ = game.sender.send(text);
        }
    }
}

/// Upgrade handler mounted at the root path.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state.live))
}

async fn handle_socket(socket: WebSocket, hub: LiveHub) {
    let (mut sender, mut receiver) = socket.split();

    // The first frame must join a game.
    let pin = loop {
        match receiver.next().await {
            Some(Ok(Message::Text(text))) => match serde_json::from_str::<WsEnvelope>(&text) {
                Ok(WsEnvelope::Join { game_pin }) => break game_pin,
                _ => {
                    send_error(&mut sender, "Expected a join message").await;
                    return;
                }
            },
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
            _ => return,
        }
    };

    let Some(mut rx) = hub.join(&pin).await else {
        send_error(&mut sender, "Unknown game pin").await;
        return;
    };
    debug!(game_pin = %pin, "Socket joined game");

    loop {
        tokio::select! {
            broadcasted = rx.recv() => {
                match broadcasted {
                    Ok(text) => {
                        if sender.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                    // Game unregistered or this receiver lagged too far.
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(game_pin = %pin, skipped, "Socket receiver lagged");
                    }
                }
            }
            inbound = receiver.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<WsEnvelope>(&text) {
                            Ok(WsEnvelope::Message { .. }) => hub.publish(&pin, text).await,
                            Ok(_) => send_error(&mut sender, "Unexpected envelope").await,
                            Err(_) => send_error(&mut sender, "Malformed envelope").await,
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        debug!(game_pin = %pin, error = %e, "Socket receive error");
                        break;
                    }
                }
            }
        }
    }

    hub.leave(&pin).await;
    debug!(game_pin = %pin, "Socket left game");
}

async fn send_error<S>(sender: &mut S, message: &str)
where
    S: SinkExt<Message> + Unpin,
{
    let envelope = WsEnvelope::Error {
        message: message.to_string(),
    };
    if let Ok(text) = serde_json::to_string(&envelope) {
        let _ = sender.send(Message::Text(text)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_and_lookup() {
        let hub = LiveHub::new();
        let quiz_id = Uuid::new_v4();
        assert!(hub.register_game("123456", quiz_id).await);

        let summary = hub.lookup("123456").await.unwrap();
        assert_eq!(summary.quiz_id, quiz_id);
        assert_eq!(summary.player_count, 0);
    }

    #[tokio::test]
    async fn test_duplicate_pin_rejected() {
        let hub = LiveHub::new();
        assert!(hub.register_game("123456", Uuid::new_v4()).await);
        assert!(!hub.register_game("123456", Uuid::new_v4()).await);
    }

    #[tokio::test]
    async fn test_lookup_unknown_pin() {
        let hub = LiveHub::new();
        assert!(hub.lookup("999999").await.is_none());
    }

    #[tokio::test]
    async fn test_join_updates_player_count() {
        let hub = LiveHub::new();
        hub.register_game("123456", Uuid::new_v4()).await;

        let _rx = hub.join("123456").await.unwrap();
        assert_eq!(hub.lookup("123456").await.unwrap().player_count, 1);

        hub.leave("123456").await;
        assert_eq!(hub.lookup("123456").await.unwrap().player_count, 0);
    }

    #[tokio::test]
    async fn test_join_unknown_pin() {
        let hub = LiveHub::new();
        assert!(hub.join("999999").await.is_none());
    }

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let hub = LiveHub::new();
        hub.register_game("123456", Uuid::new_v4()).await;
        let mut rx = hub.join("123456").await.unwrap();

        hub.publish("123456", "hello".to_string()).await;
        assert_eq!(rx.recv().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_unregister_closes_channel() {
        let hub = LiveHub::new();
        hub.register_game("123456", Uuid::new_v4()).await;
        let mut rx = hub.join("123456").await.unwrap();

        assert!(hub.unregister_game("123456").await);
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }

    #[test]
    fn test_envelope_serde() {
        let join: WsEnvelope = serde_json::from_str(r#"{"type":"join","game_pin":"123456"}"#).unwrap();
        assert!(matches!(join, WsEnvelope::Join { game_pin } if game_pin == "123456"));

        let error = WsEnvelope::Error {
            message: "nope".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"error\""));
    }
}
