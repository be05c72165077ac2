use crate::categories::CategoryRegistry;
use crate::chat::{self, ClearScope};
use crate::clock::Clock;
use crate::error::DirectoryError;
use crate::keys;
use crate::model::{
    ChatMessage, GroupAssignment, GroupData, GroupSummary, MoodCategory, MoodMovement, Report,
    User,
};
use crate::movements::{self, MovementFilter, MovementStats};
use crate::reports;
use mindstore::{read_or_default, write_json, Store};
use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

/// The mood-group directory: owns the mood→group mapping and every
/// operation on assignments, transcripts, movements and reports.
///
/// Constructed once with injected storage and clock. All operations run to
/// completion synchronously; concurrent writers to the same store are
/// last-write-wins, which is the documented scope of this prototype.
pub struct Directory {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    categories: RwLock<CategoryRegistry>,
}

impl Directory {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            categories: RwLock::new(CategoryRegistry::with_defaults()),
        }
    }

    /// Ordered category list. Identical across calls unless an admin edits.
    pub fn categories(&self) -> Vec<MoodCategory> {
        self.categories.read().list().to_vec()
    }

    fn category(&self, key: &str) -> Result<MoodCategory, DirectoryError> {
        self.categories
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| DirectoryError::UnknownMood(key.to_string()))
    }

    /// All known user snapshots.
    pub fn users(&self) -> Vec<User> {
        read_or_default(self.store.as_ref(), keys::USERS)
    }

    fn user(&self, user_id: &str) -> Result<User, DirectoryError> {
        self.users()
            .into_iter()
            .find(|u| u.id == user_id)
            .ok_or_else(|| DirectoryError::UnknownUser(user_id.to_string()))
    }

    /// Create or reuse a user by name and make them the session user.
    /// Stands in for the registration flow this service treats as external.
    pub fn login(&self, name: &str, avatar: Option<String>) -> Result<User, DirectoryError> {
        let mut users = self.users();
        let user = match users.iter().find(|u| u.name == name) {
            Some(existing) => existing.clone(),
            None => {
                let user = User {
                    id: Uuid::new_v4().to_string(),
                    name: name.to_string(),
                    avatar,
                    current_mood: None,
                    initial_mood: None,
                };
                users.push(user.clone());
                write_json(self.store.as_ref(), keys::USERS, &users)?;
                user
            }
        };
        write_json(self.store.as_ref(), keys::CURRENT_USER, &user)?;
        Ok(user)
    }

    /// The session user snapshot, if one has logged in.
    pub fn current_user(&self) -> Option<User> {
        read_or_default(self.store.as_ref(), keys::CURRENT_USER)
    }

    /// Assign a user to the group matching `mood`.
    ///
    /// Updates the user's current mood, records a movement iff a previous
    /// mood existed and differs, recomputes the affected rosters and
    /// aggregates, and returns the new group's transcript and roster.
    pub fn select_mood(
        &self,
        user_id: &str,
        mood: &str,
    ) -> Result<GroupAssignment, DirectoryError> {
        let category = self.category(mood)?;
        let mut users = self.users();
        let slot = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| DirectoryError::UnknownUser(user_id.to_string()))?;
        let previous = slot.current_mood.clone();
        slot.current_mood = Some(mood.to_string());
        if slot.initial_mood.is_none() {
            slot.initial_mood = Some(mood.to_string());
        }
        let snapshot = slot.clone();
        write_json(self.store.as_ref(), keys::USERS, &users)?;
        if self.current_user().is_some_and(|u| u.id == user_id) {
            write_json(self.store.as_ref(), keys::CURRENT_USER, &snapshot)?;
        }
        if let Some(from) = previous.as_deref().filter(|&from| from != mood) {
            movements::record(
                self.store.as_ref(),
                MoodMovement {
                    user_id: snapshot.id.clone(),
                    user_name: snapshot.name.clone(),
                    from_mood: from.to_string(),
                    to_mood: mood.to_string(),
                    occurred_at: self.clock.now(),
                },
            )?;
            self.refresh_group(from, &users)?;
        }
        let roster = self.refresh_group(mood, &users)?;
        let transcript = chat::open_transcript(
            self.store.as_ref(),
            self.clock.as_ref(),
            mood,
            &category.group_name,
        )?;
        tracing::info!(user = %snapshot.name, mood, "group assignment updated");
        Ok(GroupAssignment {
            category,
            transcript,
            roster,
        })
    }

    /// Recompute a group's roster and aggregate after membership changed.
    fn refresh_group(&self, mood: &str, users: &[User]) -> Result<Vec<User>, DirectoryError> {
        let roster: Vec<User> = users
            .iter()
            .filter(|u| u.current_mood.as_deref() == Some(mood))
            .cloned()
            .collect();
        write_json(self.store.as_ref(), &keys::group_members_key(mood), &roster)?;
        let data = GroupData {
            member_count: roster.len(),
            last_activity: self.clock.now(),
        };
        write_json(self.store.as_ref(), &keys::group_data_key(mood), &data)?;
        Ok(roster)
    }

    fn member(&self, user_id: &str, mood: &str) -> Result<User, DirectoryError> {
        let user = self.user(user_id)?;
        if user.current_mood.as_deref() != Some(mood) {
            return Err(DirectoryError::NotGroupMember(mood.to_string()));
        }
        Ok(user)
    }

    /// Append a text message to a group the user is assigned to.
    pub fn send_message(
        &self,
        user_id: &str,
        mood: &str,
        text: &str,
    ) -> Result<ChatMessage, DirectoryError> {
        self.category(mood)?;
        let author = self.member(user_id, mood)?;
        chat::send_message(self.store.as_ref(), self.clock.as_ref(), mood, &author, text)
    }

    /// Append a voice message reference, same membership rules as text.
    pub fn send_voice_message(
        &self,
        user_id: &str,
        mood: &str,
        audio: &str,
        duration_secs: u32,
    ) -> Result<ChatMessage, DirectoryError> {
        self.category(mood)?;
        let author = self.member(user_id, mood)?;
        chat::send_voice_message(
            self.store.as_ref(),
            self.clock.as_ref(),
            mood,
            &author,
            audio,
            duration_secs,
        )
    }

    /// Transcript for display; seeds the welcome message on first load.
    pub fn transcript(&self, mood: &str) -> Result<Vec<ChatMessage>, DirectoryError> {
        let category = self.category(mood)?;
        chat::open_transcript(
            self.store.as_ref(),
            self.clock.as_ref(),
            mood,
            &category.group_name,
        )
    }

    /// Current roster snapshots for a group.
    pub fn roster(&self, mood: &str) -> Result<Vec<User>, DirectoryError> {
        self.category(mood)?;
        Ok(read_or_default(
            self.store.as_ref(),
            &keys::group_members_key(mood),
        ))
    }

    /// Per-group aggregates, the data behind the group cards.
    pub fn group_overview(&self) -> Vec<GroupSummary> {
        self.categories()
            .into_iter()
            .map(|category| {
                let data = read_or_default(
                    self.store.as_ref(),
                    &keys::group_data_key(&category.key),
                );
                GroupSummary { category, data }
            })
            .collect()
    }

    /// Remove messages from a group's transcript. Irreversible.
    pub fn clear_chat(&self, mood: &str, scope: ClearScope) -> Result<usize, DirectoryError> {
        self.category(mood)?;
        if let ClearScope::OwnMessages(user_id) = &scope {
            self.user(user_id)?;
        }
        chat::clear_chat(self.store.as_ref(), self.clock.as_ref(), mood, scope)
    }

    /// Soft-flag a message for moderators; the transcript is untouched.
    pub fn report_message(
        &self,
        reporter_id: &str,
        message_id: Uuid,
        reason: &str,
    ) -> Result<Report, DirectoryError> {
        self.user(reporter_id)?;
        let moods: Vec<String> = self.categories().into_iter().map(|c| c.key).collect();
        reports::file_report(
            self.store.as_ref(),
            self.clock.as_ref(),
            moods.iter().map(String::as_str),
            reporter_id,
            message_id,
            reason,
        )
    }

    /// The moderation log, oldest first.
    pub fn reports(&self) -> Vec<Report> {
        reports::list(self.store.as_ref())
    }

    /// Filtered movement history, oldest first. Display only.
    pub fn movements(&self, filter: MovementFilter) -> impl Iterator<Item = MoodMovement> {
        movements::filtered(self.store.as_ref(), filter)
    }

    /// Aggregate movement counts for the analytics view.
    pub fn movement_stats(&self, filter: MovementFilter) -> MovementStats {
        movements::stats(self.store.as_ref(), filter)
    }

    /// Admin: add a category at runtime. Held in memory only.
    pub fn add_category(&self, category: MoodCategory) -> Result<(), DirectoryError> {
        self.categories.write().add(category)
    }

    /// Admin: replace the presentation fields of a category.
    pub fn update_category(&self, category: MoodCategory) -> Result<(), DirectoryError> {
        self.categories.write().update(category)
    }

    /// Admin: remove an empty category along with its group keys. Removing
    /// a category that still has assigned members is refused.
    pub fn remove_category(&self, key: &str) -> Result<MoodCategory, DirectoryError> {
        let members = self
            .users()
            .into_iter()
            .filter(|u| u.current_mood.as_deref() == Some(key))
            .count();
        if members > 0 {
            return Err(DirectoryError::CategoryNotEmpty {
                key: key.to_string(),
                members,
            });
        }
        let removed = self.categories.write().remove(key)?;
        self.store.remove(&keys::group_chat_key(key))?;
        self.store.remove(&keys::group_members_key(key))?;
        self.store.remove(&keys::group_data_key(key))?;
        Ok(removed)
    }
}
