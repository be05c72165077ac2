use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MoodCategory {
    pub key: String,
    pub label: String,
    pub emoji: String,
    pub color: String,
    pub group_name: String,
    pub icon: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub current_mood: Option<String>,
    #[serde(default)]
    pub initial_mood: Option<String>,
}

/// The three message shapes a transcript may hold. Anything else found in
/// the store is dropped on read instead of trusted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageKind {
    System,
    User,
    Voice { audio: String, duration_secs: u32 },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Uuid,
    /// None for synthetic system messages.
    pub author_id: Option<String>,
    pub author_name: String,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub sent_at: OffsetDateTime,
    #[serde(flatten)]
    pub kind: MessageKind,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MoodMovement {
    pub user_id: String,
    pub user_name: String,
    pub from_mood: String,
    pub to_mood: String,
    #[serde(with = "time::serde::rfc3339")]
    pub occurred_at: OffsetDateTime,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GroupData {
    pub member_count: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub last_activity: OffsetDateTime,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Report {
    pub id: Uuid,
    pub reporter_id: String,
    pub reason: String,
    /// Group the message was found in when reported.
    pub mood: String,
    pub message: ChatMessage,
    #[serde(with = "time::serde::rfc3339")]
    pub reported_at: OffsetDateTime,
}

/// Result of assigning a user to a mood group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAssignment {
    pub category: MoodCategory,
    pub transcript: Vec<ChatMessage>,
    pub roster: Vec<User>,
}

/// Category plus its aggregate, the data behind a group card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub category: MoodCategory,
    pub data: Option<GroupData>,
}
