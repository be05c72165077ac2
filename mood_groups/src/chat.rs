use crate::clock::Clock;
use crate::error::DirectoryError;
use crate::keys;
use crate::model::{ChatMessage, GroupData, MessageKind, User};
use mindstore::{read_or_default, write_json, Store};
use serde_json::Value;
use time::Duration;
use uuid::Uuid;

/// How much of a transcript a clear operation removes. Irreversible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearScope {
    All,
    /// Messages authored by the given user id.
    OwnMessages(String),
    OlderThan(Duration),
}

/// Load a transcript, dropping records that no longer parse.
pub fn load_transcript(store: &dyn Store, mood: &str) -> Vec<ChatMessage> {
    let raw: Vec<Value> = read_or_default(store, &keys::group_chat_key(mood));
    let total = raw.len();
    let messages: Vec<ChatMessage> = raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();
    if messages.len() < total {
        tracing::warn!(
            "dropped {} malformed messages from the {mood} transcript",
            total - messages.len()
        );
    }
    messages
}

/// Load a transcript for display, seeding the welcome system message when
/// the group has no history yet.
pub fn open_transcript(
    store: &dyn Store,
    clock: &dyn Clock,
    mood: &str,
    group_name: &str,
) -> Result<Vec<ChatMessage>, DirectoryError> {
    let mut messages = load_transcript(store, mood);
    if messages.is_empty() {
        messages.push(welcome_message(clock, group_name));
        save_transcript(store, mood, &messages)?;
    }
    Ok(messages)
}

fn welcome_message(clock: &dyn Clock, group_name: &str) -> ChatMessage {
    ChatMessage {
        id: Uuid::new_v4(),
        author_id: None,
        author_name: "MindSpace".to_string(),
        text: format!("Welcome to {group_name}. Be kind, this is a shared space."),
        sent_at: clock.now(),
        kind: MessageKind::System,
    }
}

fn save_transcript(
    store: &dyn Store,
    mood: &str,
    messages: &[ChatMessage],
) -> Result<(), DirectoryError> {
    Ok(write_json(store, &keys::group_chat_key(mood), &messages)?)
}

/// Refresh a group's last-activity stamp, keeping its member count.
pub(crate) fn touch_group(
    store: &dyn Store,
    clock: &dyn Clock,
    mood: &str,
) -> Result<(), DirectoryError> {
    let member_count = read_or_default::<Option<GroupData>>(store, &keys::group_data_key(mood))
        .map(|data| data.member_count)
        .unwrap_or(0);
    let data = GroupData {
        member_count,
        last_activity: clock.now(),
    };
    Ok(write_json(store, &keys::group_data_key(mood), &data)?)
}

/// Append a text message to a group transcript.
pub fn send_message(
    store: &dyn Store,
    clock: &dyn Clock,
    mood: &str,
    author: &User,
    text: &str,
) -> Result<ChatMessage, DirectoryError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DirectoryError::EmptyMessage);
    }
    append(store, clock, mood, author, text.to_string(), MessageKind::User)
}

/// Append a voice message. The audio itself lives outside the store; the
/// transcript only carries a reference and a duration.
pub fn send_voice_message(
    store: &dyn Store,
    clock: &dyn Clock,
    mood: &str,
    author: &User,
    audio: &str,
    duration_secs: u32,
) -> Result<ChatMessage, DirectoryError> {
    append(
        store,
        clock,
        mood,
        author,
        "Voice message".to_string(),
        MessageKind::Voice {
            audio: audio.to_string(),
            duration_secs,
        },
    )
}

fn append(
    store: &dyn Store,
    clock: &dyn Clock,
    mood: &str,
    author: &User,
    text: String,
    kind: MessageKind,
) -> Result<ChatMessage, DirectoryError> {
    let message = ChatMessage {
        id: Uuid::new_v4(),
        author_id: Some(author.id.clone()),
        author_name: author.name.clone(),
        text,
        sent_at: clock.now(),
        kind,
    };
    let mut messages = load_transcript(store, mood);
    messages.push(message.clone());
    save_transcript(store, mood, &messages)?;
    touch_group(store, clock, mood)?;
    Ok(message)
}

/// Remove messages from a transcript according to scope. Returns how many
/// were removed.
pub fn clear_chat(
    store: &dyn Store,
    clock: &dyn Clock,
    mood: &str,
    scope: ClearScope,
) -> Result<usize, DirectoryError> {
    let messages = load_transcript(store, mood);
    let before = messages.len();
    let now = clock.now();
    let kept: Vec<ChatMessage> = messages
        .into_iter()
        .filter(|m| match &scope {
            ClearScope::All => false,
            ClearScope::OwnMessages(user_id) => m.author_id.as_deref() != Some(user_id.as_str()),
            ClearScope::OlderThan(age) => m.sent_at >= now - *age,
        })
        .collect();
    let removed = before - kept.len();
    if removed > 0 {
        save_transcript(store, mood, &kept)?;
        touch_group(store, clock, mood)?;
    }
    Ok(removed)
}
