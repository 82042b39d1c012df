//! HTTP contract with the arena server and the `Backend` seam over it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::StatsSnapshot;

pub const STATS_PATH: &str = "/api/stats";

/// One of the three user-triggered control actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Load,
    Start,
    Stop,
}

impl Action {
    pub fn path(self) -> &'static str {
        match self {
            Action::Load => "/api/load-data",
            Action::Start => "/api/start-simulation",
            Action::Stop => "/api/stop-simulation",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::Load => "load",
            Action::Start => "start",
            Action::Stop => "stop",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "load" | "load-data" => Some(Action::Load),
            "start" => Some(Action::Start),
            "stop" => Some(Action::Stop),
            _ => None,
        }
    }

    pub fn all() -> &'static [Action] {
        &[Action::Load, Action::Start, Action::Stop]
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Action::Load => 0,
            Action::Start => 1,
            Action::Stop => 2,
        }
    }
}

/// Body of `GET /api/stats`. On `success: false` only `error` is present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub snapshot: StatsSnapshot,
}

/// Body of the three `POST` action endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ActionResponse {
    /// `error`, else `message`, else a generic fallback.
    pub fn failure_reason(&self) -> &str {
        self.error
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.message.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("unknown error")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server responded with HTTP {0}")]
    Status(u16),
    #[error("invalid response body: {0}")]
    Decode(String),
}

pub fn decode_stats(body: &str) -> Result<StatsResponse, BackendError> {
    serde_json::from_str(body).map_err(|e| BackendError::Decode(e.to_string()))
}

pub fn decode_action(body: &str) -> Result<ActionResponse, BackendError> {
    serde_json::from_str(body).map_err(|e| BackendError::Decode(e.to_string()))
}

/// Network access to the arena server.
///
/// Implementations run on a single-threaded executor, so the returned futures
/// need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn fetch_stats(&self) -> Result<StatsResponse, BackendError>;

    async fn post_action(&self, action: Action) -> Result<ActionResponse, BackendError>;
}
