use crate::error::DirectoryError;
use crate::keys;
use crate::model::MoodMovement;
use mindstore::{read_or_default, write_json, Store};
use serde::Serialize;
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Filter over the global movement log. An empty filter matches everything.
#[derive(Debug, Default, Clone)]
pub struct MovementFilter {
    /// Matches either endpoint of the transition.
    pub mood: Option<String>,
    pub since: Option<OffsetDateTime>,
    pub until: Option<OffsetDateTime>,
}

impl MovementFilter {
    fn matches(&self, movement: &MoodMovement) -> bool {
        if let Some(mood) = &self.mood {
            if movement.to_mood != *mood && movement.from_mood != *mood {
                return false;
            }
        }
        if let Some(since) = self.since {
            if movement.occurred_at < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if movement.occurred_at > until {
                return false;
            }
        }
        true
    }
}

/// Append a movement record. Called once per actual mood change.
pub(crate) fn record(store: &dyn Store, movement: MoodMovement) -> Result<(), DirectoryError> {
    let mut log: Vec<MoodMovement> = read_or_default(store, keys::USER_MOVEMENTS);
    log.push(movement);
    Ok(write_json(store, keys::USER_MOVEMENTS, &log)?)
}

/// Filtered view of the movement log, oldest first.
pub fn filtered(store: &dyn Store, filter: MovementFilter) -> impl Iterator<Item = MoodMovement> {
    let log: Vec<MoodMovement> = read_or_default(store, keys::USER_MOVEMENTS);
    log.into_iter().filter(move |m| filter.matches(m))
}

/// Aggregate counts behind the analytics panel.
#[derive(Debug, Default, Clone, Serialize, PartialEq, Eq)]
pub struct MovementStats {
    pub total: usize,
    pub by_destination: BTreeMap<String, usize>,
}

pub fn stats(store: &dyn Store, filter: MovementFilter) -> MovementStats {
    let mut stats = MovementStats::default();
    for movement in filtered(store, filter) {
        stats.total += 1;
        *stats.by_destination.entry(movement.to_mood).or_insert(0) += 1;
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindstore::MemoryStore;
    use time::macros::datetime;

    fn movement(user: &str, from: &str, to: &str, at: OffsetDateTime) -> MoodMovement {
        MoodMovement {
            user_id: user.to_string(),
            user_name: user.to_string(),
            from_mood: from.to_string(),
            to_mood: to.to_string(),
            occurred_at: at,
        }
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        record(&store, movement("u1", "happy", "anxious", datetime!(2026-01-01 8:00 UTC))).unwrap();
        record(&store, movement("u2", "sad", "happy", datetime!(2026-01-02 8:00 UTC))).unwrap();
        record(&store, movement("u1", "anxious", "sad", datetime!(2026-01-03 8:00 UTC))).unwrap();
        store
    }

    #[test]
    fn mood_filter_matches_either_endpoint() {
        let store = seeded();
        let hits: Vec<MoodMovement> = filtered(
            &store,
            MovementFilter {
                mood: Some("happy".to_string()),
                ..Default::default()
            },
        )
        .collect();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn date_window() {
        let store = seeded();
        let hits: Vec<MoodMovement> = filtered(
            &store,
            MovementFilter {
                since: Some(datetime!(2026-01-02 0:00 UTC)),
                until: Some(datetime!(2026-01-02 23:59 UTC)),
                ..Default::default()
            },
        )
        .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].user_id, "u2");
    }

    #[test]
    fn stats_count_destinations() {
        let store = seeded();
        let stats = stats(&store, MovementFilter::default());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_destination.get("happy"), Some(&1));
        assert_eq!(stats.by_destination.get("sad"), Some(&1));
        assert_eq!(stats.by_destination.get("anxious"), Some(&1));
    }
}
