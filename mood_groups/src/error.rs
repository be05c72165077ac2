use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("unknown mood category: {0}")]
    UnknownMood(String),

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("user is not a member of the {0} group")]
    NotGroupMember(String),

    #[error("message text is empty")]
    EmptyMessage,

    #[error("message not found: {0}")]
    MessageNotFound(Uuid),

    #[error("mood category already exists: {0}")]
    CategoryExists(String),

    #[error("mood category {key} still has {members} assigned members")]
    CategoryNotEmpty { key: String, members: usize },

    #[error("invalid mood category key: {0}")]
    InvalidCategoryKey(String),

    #[error("storage error: {0}")]
    Store(#[from] anyhow::Error),
}
