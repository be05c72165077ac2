use crate::chat::ClearScope;
use crate::directory::Directory;
use crate::error::DirectoryError;
use time::Duration;

/// Drop messages older than `retention` from every group transcript.
/// Returns the total number of messages removed.
pub fn sweep(directory: &Directory, retention: Duration) -> Result<usize, DirectoryError> {
    let mut removed = 0;
    for category in directory.categories() {
        let count = directory.clear_chat(&category.key, ClearScope::OlderThan(retention))?;
        if count > 0 {
            tracing::info!(group = %category.key, removed = count, "expired messages cleared");
        }
        removed += count;
    }
    Ok(removed)
}
