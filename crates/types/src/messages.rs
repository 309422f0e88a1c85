//! WebSocket wire protocol.
//!
//! Every frame is a JSON object tagged by `type`:
//!
//! ```text
//! client → server                                  server → client
//! {"type":"observation","botId","obs"}       ──▶  {"type":"action","botId","action"}
//! {"type":"reward","botId","reward","nextObs"} ──▶ (no reply)
//! {"type":"persist"}                         ──▶  {"type":"persisted","ok","states"}
//! {"type":"heartbeat"}                       ──▶  {"type":"heartbeatEcho"}
//! ```
//!
//! Any other `type` decodes to [`ClientMessage::Unknown`]; frames that are not
//! valid JSON or miss required fields fail to decode and are dropped by the
//! caller.

use serde::{Deserialize, Serialize};

use crate::{BotId, Observation};

/// Requests a game client can send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// A bot needs a decision for what it currently sees.
    Observation {
        bot_id: BotId,
        #[serde(default)]
        obs: Observation,
    },
    /// Outcome of the bot's last decision.
    Reward {
        bot_id: BotId,
        reward: f64,
        #[serde(default)]
        next_obs: Observation,
    },
    /// Write the value table to disk now.
    Persist,
    /// Keep-alive.
    Heartbeat,
    /// Any other message type.
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    /// Decode a text frame. `None` for anything that is not a well-formed message.
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }
}

/// Responses sent back to a game client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// The action chosen for a bot.
    Action { bot_id: BotId, action: String },
    /// Acknowledges a persist request.
    Persisted { ok: bool, states: usize },
    /// Reply to a heartbeat.
    HeartbeatEcho,
}
