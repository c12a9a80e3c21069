//! Best-effort user behavior telemetry.
//!
//! Events are recorded only for signed-in users and are delivered by a
//! background worker draining a bounded queue:
//!
//! ```text
//! record() ──try_send──▶ [ bounded queue ] ──recv──▶ worker ──POST──▶ /user/behavior
//!    │                          │                        │
//!    └─ logged out: no-op       └─ full: drop + warn     └─ failure: drop + warn
//! ```
//!
//! Nothing on this path ever fails the caller and nothing is retried.

mod recorder;

pub use recorder::{BehaviorRecorder, BehaviorStats};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Kind of user action being reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum BehaviorType {
    /// Content viewed (`details.content_type` names what).
    View,
    /// Search performed (`details.query`).
    Search,
    /// Element clicked.
    Click,
    /// The embedded AI assistant window was opened.
    AiAssistantOpened,
    /// Any other tag, sent verbatim.
    Custom(String),
}

impl BehaviorType {
    /// Wire tag.
    pub fn as_str(&self) -> &str {
        match self {
            BehaviorType::View => "view",
            BehaviorType::Search => "search",
            BehaviorType::Click => "click",
            BehaviorType::AiAssistantOpened => "ai_assistant_opened",
            BehaviorType::Custom(tag) => tag,
        }
    }
}

impl std::fmt::Display for BehaviorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for BehaviorType {
    fn from(tag: &str) -> Self {
        match tag {
            "view" => BehaviorType::View,
            "search" => BehaviorType::Search,
            "click" => BehaviorType::Click,
            "ai_assistant_opened" => BehaviorType::AiAssistantOpened,
            other => BehaviorType::Custom(other.to_string()),
        }
    }
}

impl From<String> for BehaviorType {
    fn from(tag: String) -> Self {
        BehaviorType::from(tag.as_str())
    }
}

impl From<BehaviorType> for String {
    fn from(t: BehaviorType) -> Self {
        t.as_str().to_string()
    }
}

/// One telemetry record. Only `behavior_type` and `details` go on the wire;
/// `id` and `created_at` exist for local log correlation.
#[derive(Debug, Clone, Serialize)]
pub struct BehaviorEvent {
    /// Local correlation id.
    #[serde(skip)]
    pub id: Uuid,
    /// What the user did.
    pub behavior_type: BehaviorType,
    /// Free-form context.
    pub details: serde_json::Value,
    /// When the event was recorded.
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

impl BehaviorEvent {
    /// Create an event stamped with a fresh id and the current time.
    pub fn new(behavior_type: impl Into<BehaviorType>, details: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            behavior_type: behavior_type.into(),
            details,
            created_at: Utc::now(),
        }
    }
}
