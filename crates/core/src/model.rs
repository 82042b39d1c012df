//! Snapshot types delivered by `GET /api/stats`.
//!
//! Every field is optional on the client side: a field the server leaves out
//! means "no update" for whatever display or state it would have fed.

use serde::{Deserialize, Deserializer, Serialize};

use crate::fmt::fmt_number_plain;

/// A display scalar exactly as the server sent it.
///
/// Counters arrive as integers, throughput as a float, and some profile fields
/// (`high_score`, `total_keys`) are pre-formatted text such as `"12,500"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Text shown in the page, without any grouping applied.
    pub fn display(&self) -> String {
        match self {
            Scalar::Int(v) => v.to_string(),
            Scalar::Float(v) => fmt_number_plain(*v),
            Scalar::Text(s) => s.clone(),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Achievement,
    /// Anything else the server tags a message with (`"chat"` today).
    #[default]
    #[serde(other)]
    Normal,
}

/// Absolute instant attached to a chat/event message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Epoch seconds (or milliseconds for values past 1e11).
    Epoch(f64),
    /// ISO-8601; offset-less values are already local wall-clock time.
    Iso(String),
    /// Any other JSON value; renders as `Invalid Date`.
    Other(serde_json::Value),
}

/// One entry of `recent_messages`. Missing or `null` fields decode to
/// defaults; an absent timestamp renders as `Invalid Date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub player: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    #[serde(rename = "type", default, deserialize_with = "kind_or_normal")]
    pub kind: MessageKind,
}

fn string_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

/// Only the string `"achievement"` is special; `null`, numbers and unknown
/// tags are normal messages.
fn kind_or_normal<'de, D: Deserializer<'de>>(d: D) -> Result<MessageKind, D::Error> {
    Ok(match serde_json::Value::deserialize(d)? {
        serde_json::Value::String(s) if s == "achievement" => MessageKind::Achievement,
        _ => MessageKind::Normal,
    })
}

impl ChatMessage {
    pub fn is_achievement(&self) -> bool {
        self.kind == MessageKind::Achievement
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileStats {
    #[serde(default)]
    pub total_players: Option<Scalar>,
    #[serde(default)]
    pub active_games: Option<Scalar>,
    #[serde(default)]
    pub high_score: Option<Scalar>,
    #[serde(default)]
    pub server_status: Option<String>,
    #[serde(default)]
    pub total_keys: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default)]
    pub online_count: Option<Scalar>,
    #[serde(default)]
    pub ops_per_second: Option<Scalar>,
    #[serde(default)]
    pub demo_counter: Option<Scalar>,
    #[serde(default)]
    pub leaderboard: Option<Vec<LeaderboardEntry>>,
    #[serde(default)]
    pub recent_messages: Option<Vec<ChatMessage>>,
    #[serde(default)]
    pub profile_stats: Option<ProfileStats>,
    #[serde(default)]
    pub simulation_running: Option<bool>,
    #[serde(default)]
    pub data_loaded: Option<bool>,
}

/// The two control flags as reported by one snapshot; `None` = not reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportedFlags {
    pub simulation_running: Option<bool>,
    pub data_loaded: Option<bool>,
}

impl StatsSnapshot {
    pub fn reported_flags(&self) -> ReportedFlags {
        ReportedFlags {
            simulation_running: self.simulation_running,
            data_loaded: self.data_loaded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_decodes_server_shapes() {
        let raw = r#"{
            "online_count": 12,
            "ops_per_second": 1520.5,
            "demo_counter": 7,
            "leaderboard": [{"player": "Ann", "score": 500}],
            "recent_messages": [
                {"player": "Bo", "message": "gg", "timestamp": "2024-05-01T15:04:05.123456", "type": "chat"},
                {"player": "Cy", "message": "Cy unlocked Speedrun!", "timestamp": 1714575845, "type": "achievement"}
            ],
            "profile_stats": {"total_players": 40, "active_games": 3, "high_score": "12,500", "server_status": "Running"},
            "simulation_running": true,
            "data_loaded": true
        }"#;
        let snap: StatsSnapshot = serde_json::from_str(raw).unwrap();

        assert_eq!(snap.online_count, Some(Scalar::Int(12)));
        assert_eq!(snap.ops_per_second, Some(Scalar::Float(1520.5)));
        let messages = snap.recent_messages.as_deref().unwrap();
        assert_eq!(messages[0].kind, MessageKind::Normal);
        assert!(messages[1].is_achievement());
        assert!(matches!(messages[1].timestamp, Some(Timestamp::Epoch(_))));
        let profile = snap.profile_stats.unwrap();
        assert_eq!(profile.high_score, Some(Scalar::Text("12,500".into())));
        assert_eq!(profile.total_keys, None);
    }

    #[test]
    fn missing_fields_are_not_reported() {
        let snap: StatsSnapshot = serde_json::from_str(r#"{"leaderboard": []}"#).unwrap();
        assert_eq!(snap.reported_flags(), ReportedFlags::default());
        assert_eq!(snap.leaderboard.as_deref(), Some(&[][..]));
        assert!(snap.recent_messages.is_none());
        assert!(snap.online_count.is_none());
    }

    #[test]
    fn message_type_defaults_to_normal() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"player":"A","message":"hi","timestamp":"x"}"#).unwrap();
        assert_eq!(msg.kind, MessageKind::Normal);
    }

    #[test]
    fn malformed_message_fields_decode_to_defaults() {
        let raw = r#"[
            {"player": "A", "message": "hi", "type": "chat"},
            {"player": "B", "message": "x", "timestamp": null, "type": null},
            {"player": null, "message": "y", "timestamp": true, "type": 7}
        ]"#;
        let messages: Vec<ChatMessage> = serde_json::from_str(raw).unwrap();
        assert_eq!(messages[0].timestamp, None);
        assert_eq!(messages[1].timestamp, None);
        assert_eq!(messages[1].kind, MessageKind::Normal);
        assert_eq!(messages[2].player, "");
        assert_eq!(
            messages[2].timestamp,
            Some(Timestamp::Other(serde_json::Value::Bool(true)))
        );
        assert_eq!(messages[2].kind, MessageKind::Normal);
    }
}
