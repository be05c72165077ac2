use crate::error::DirectoryError;
use crate::model::MoodCategory;
use once_cell::sync::Lazy;
use regex::Regex;

static KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").unwrap());

/// Turn a display label into a storage-safe category key.
pub fn sanitize_key(input: &str) -> String {
    let mut key = String::new();
    let mut prev_sep = false;
    for c in input.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            key.push(c);
            prev_sep = false;
        } else if !prev_sep && !key.is_empty() {
            key.push('_');
            prev_sep = true;
        }
    }
    key.trim_matches('_').to_string()
}

/// Ordered set of mood categories. Admin edits mutate it in memory only;
/// the seeded set comes back on every restart.
pub struct CategoryRegistry {
    categories: Vec<MoodCategory>,
}

impl CategoryRegistry {
    pub fn with_defaults() -> Self {
        Self {
            categories: default_categories(),
        }
    }

    pub fn list(&self) -> &[MoodCategory] {
        &self.categories
    }

    pub fn get(&self, key: &str) -> Option<&MoodCategory> {
        self.categories.iter().find(|c| c.key == key)
    }

    /// Add a category, rejecting malformed and duplicate keys.
    pub fn add(&mut self, category: MoodCategory) -> Result<(), DirectoryError> {
        if !KEY_RE.is_match(&category.key) {
            return Err(DirectoryError::InvalidCategoryKey(category.key));
        }
        if self.get(&category.key).is_some() {
            return Err(DirectoryError::CategoryExists(category.key));
        }
        self.categories.push(category);
        Ok(())
    }

    /// Replace the presentation fields of an existing category.
    pub fn update(&mut self, category: MoodCategory) -> Result<(), DirectoryError> {
        match self.categories.iter_mut().find(|c| c.key == category.key) {
            Some(slot) => {
                *slot = category;
                Ok(())
            }
            None => Err(DirectoryError::UnknownMood(category.key)),
        }
    }

    /// Drop a category from the set. Membership checks are the caller's job.
    pub fn remove(&mut self, key: &str) -> Result<MoodCategory, DirectoryError> {
        match self.categories.iter().position(|c| c.key == key) {
            Some(idx) => Ok(self.categories.remove(idx)),
            None => Err(DirectoryError::UnknownMood(key.to_string())),
        }
    }
}

fn category(
    key: &str,
    label: &str,
    emoji: &str,
    color: &str,
    group_name: &str,
    icon: &str,
) -> MoodCategory {
    MoodCategory {
        key: key.to_string(),
        label: label.to_string(),
        emoji: emoji.to_string(),
        color: color.to_string(),
        group_name: group_name.to_string(),
        icon: icon.to_string(),
    }
}

fn default_categories() -> Vec<MoodCategory> {
    vec![
        category("happy", "Happy", "😊", "#f7c948", "Good Vibes Lounge", "sun"),
        category("anxious", "Anxious", "😟", "#74c0fc", "Calm Corner", "wind"),
        category("stressed", "Stressed", "😫", "#ff8787", "Pressure Valve", "gauge"),
        category("excited", "Excited", "🤩", "#ffa94d", "Spark Room", "zap"),
        category("sad", "Sad", "😢", "#748ffc", "Rainy Day Club", "cloud-rain"),
        category("motivated", "Motivated", "💪", "#69db7c", "Momentum Hub", "trending-up"),
        category("overwhelmed", "Overwhelmed", "😵", "#b197fc", "Breathing Room", "layers"),
        category("lonely", "Lonely", "😔", "#9aa5b1", "Open Door", "coffee"),
    ]
}
