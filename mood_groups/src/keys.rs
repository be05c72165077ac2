//! Builders for the shared store's key namespace.

/// Per-group transcript key prefix.
const GROUP_CHAT_PREFIX: &str = "group_chat_";

/// Per-group roster key prefix.
const GROUP_MEMBERS_PREFIX: &str = "group_members_";

/// Per-group aggregate key prefix.
const GROUP_DATA_PREFIX: &str = "group_data_";

/// Global movement log, shared across all groups.
pub const USER_MOVEMENTS: &str = "user_movements";

/// Moderation log of soft-flagged messages.
pub const REPORTED_MESSAGES: &str = "reported_messages";

/// Session-scoped snapshot of the active user.
pub const CURRENT_USER: &str = "campusMindspace_currentUser";

/// All known user snapshots.
pub const USERS: &str = "campusMindspace_users";

/// Key holding a group's chat transcript.
pub fn group_chat_key(mood: &str) -> String {
    format!("{}{}", GROUP_CHAT_PREFIX, mood)
}

/// Key holding a group's member roster.
pub fn group_members_key(mood: &str) -> String {
    format!("{}{}", GROUP_MEMBERS_PREFIX, mood)
}

/// Key holding a group's aggregate data.
pub fn group_data_key(mood: &str) -> String {
    format!("{}{}", GROUP_DATA_PREFIX, mood)
}
