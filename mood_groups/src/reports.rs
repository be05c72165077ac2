use crate::chat;
use crate::clock::Clock;
use crate::error::DirectoryError;
use crate::keys;
use crate::model::Report;
use mindstore::{read_or_default, write_json, Store};
use uuid::Uuid;

/// Soft-flag a message: snapshot it into the moderation log without touching
/// the transcript it lives in. Searches the given groups in order.
pub fn file_report<'a>(
    store: &dyn Store,
    clock: &dyn Clock,
    moods: impl IntoIterator<Item = &'a str>,
    reporter_id: &str,
    message_id: Uuid,
    reason: &str,
) -> Result<Report, DirectoryError> {
    for mood in moods {
        let hit = chat::load_transcript(store, mood)
            .into_iter()
            .find(|m| m.id == message_id);
        if let Some(message) = hit {
            let report = Report {
                id: Uuid::new_v4(),
                reporter_id: reporter_id.to_string(),
                reason: reason.to_string(),
                mood: mood.to_string(),
                message,
                reported_at: clock.now(),
            };
            let mut log: Vec<Report> = read_or_default(store, keys::REPORTED_MESSAGES);
            log.push(report.clone());
            write_json(store, keys::REPORTED_MESSAGES, &log)?;
            return Ok(report);
        }
    }
    Err(DirectoryError::MessageNotFound(message_id))
}

/// The moderation log, oldest first.
pub fn list(store: &dyn Store) -> Vec<Report> {
    read_or_default(store, keys::REPORTED_MESSAGES)
}
