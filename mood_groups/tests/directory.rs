use mindstore::{JsonFileStore, MemoryStore};
use mood_groups::{
    chat::ClearScope, clock::Clock, clock::ManualClock, model::MessageKind, movements::MovementFilter,
    Directory, DirectoryError,
};
use std::sync::Arc;
use time::{macros::datetime, Duration};

fn setup() -> (Directory, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(datetime!(2026-06-01 9:00 UTC)));
    let directory = Directory::new(Arc::new(MemoryStore::new()), clock.clone());
    (directory, clock)
}

#[test]
fn first_join_assigns_without_movement() {
    let (directory, _clock) = setup();
    let sarah = directory.login("Sarah", None).unwrap();
    let assignment = directory.select_mood(&sarah.id, "happy").unwrap();

    assert_eq!(assignment.category.key, "happy");
    assert!(assignment.roster.iter().any(|u| u.id == sarah.id));
    assert_eq!(assignment.transcript.len(), 1);
    assert_eq!(assignment.transcript[0].kind, MessageKind::System);
    assert_eq!(directory.movements(MovementFilter::default()).count(), 0);
    assert_eq!(
        directory.current_user().unwrap().current_mood.as_deref(),
        Some("happy")
    );
}

#[test]
fn mood_change_moves_roster_and_logs_once() {
    let (directory, _clock) = setup();
    let sarah = directory.login("Sarah", None).unwrap();
    directory.select_mood(&sarah.id, "happy").unwrap();
    directory.select_mood(&sarah.id, "anxious").unwrap();

    assert!(directory.roster("happy").unwrap().is_empty());
    assert!(directory
        .roster("anxious")
        .unwrap()
        .iter()
        .any(|u| u.id == sarah.id));

    let movements: Vec<_> = directory.movements(MovementFilter::default()).collect();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].from_mood, "happy");
    assert_eq!(movements[0].to_mood, "anxious");
}

#[test]
fn whitespace_message_leaves_transcript_unchanged() {
    let (directory, _clock) = setup();
    let sarah = directory.login("Sarah", None).unwrap();
    directory.select_mood(&sarah.id, "happy").unwrap();

    let err = directory.send_message(&sarah.id, "happy", "   ").unwrap_err();
    assert!(matches!(err, DirectoryError::EmptyMessage));
    assert_eq!(directory.transcript("happy").unwrap().len(), 1);
}

#[test]
fn send_appends_and_updates_last_activity() {
    let (directory, clock) = setup();
    let sarah = directory.login("Sarah", None).unwrap();
    directory.select_mood(&sarah.id, "happy").unwrap();

    clock.advance(Duration::minutes(10));
    directory
        .send_message(&sarah.id, "happy", "Hello everyone")
        .unwrap();

    let transcript = directory.transcript("happy").unwrap();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[1].author_name, "Sarah");

    let overview = directory.group_overview();
    let happy = overview
        .iter()
        .find(|s| s.category.key == "happy")
        .unwrap();
    assert_eq!(happy.data.as_ref().unwrap().last_activity, clock.now());
    assert_eq!(happy.data.as_ref().unwrap().member_count, 1);
}

#[test]
fn clear_all_then_send_does_not_reseed_welcome() {
    let (directory, _clock) = setup();
    let sarah = directory.login("Sarah", None).unwrap();
    directory.select_mood(&sarah.id, "happy").unwrap();
    directory.send_message(&sarah.id, "happy", "hello").unwrap();

    let removed = directory.clear_chat("happy", ClearScope::All).unwrap();
    assert_eq!(removed, 2);

    directory
        .send_message(&sarah.id, "happy", "fresh start")
        .unwrap();
    let transcript = directory.transcript("happy").unwrap();
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript[0].kind, MessageKind::User);
    assert_eq!(transcript[0].text, "fresh start");
}

#[test]
fn voice_messages_carry_audio_reference() {
    let (directory, _clock) = setup();
    let sarah = directory.login("Sarah", None).unwrap();
    directory.select_mood(&sarah.id, "excited").unwrap();

    let message = directory
        .send_voice_message(&sarah.id, "excited", "rec-42.ogg", 12)
        .unwrap();
    assert_eq!(
        message.kind,
        MessageKind::Voice {
            audio: "rec-42.ogg".to_string(),
            duration_secs: 12
        }
    );
    let transcript = directory.transcript("excited").unwrap();
    assert_eq!(transcript.last().unwrap(), &message);
}

#[test]
fn movement_filters_by_window() {
    let (directory, clock) = setup();
    let sarah = directory.login("Sarah", None).unwrap();
    directory.select_mood(&sarah.id, "happy").unwrap();
    directory.select_mood(&sarah.id, "anxious").unwrap();
    clock.advance(Duration::days(2));
    directory.select_mood(&sarah.id, "motivated").unwrap();

    let recent: Vec<_> = directory
        .movements(MovementFilter {
            since: Some(clock.now() - Duration::days(1)),
            ..Default::default()
        })
        .collect();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].to_mood, "motivated");

    let stats = directory.movement_stats(MovementFilter::default());
    assert_eq!(stats.total, 2);
    assert_eq!(stats.by_destination.get("anxious"), Some(&1));
    assert_eq!(stats.by_destination.get("motivated"), Some(&1));
}

#[test]
fn transcript_survives_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    let clock = Arc::new(ManualClock::new(datetime!(2026-06-01 9:00 UTC)));

    let before = {
        let store = Arc::new(JsonFileStore::open(&path).unwrap());
        let directory = Directory::new(store, clock.clone());
        let sarah = directory.login("Sarah", None).unwrap();
        directory.select_mood(&sarah.id, "happy").unwrap();
        directory.send_message(&sarah.id, "happy", "one").unwrap();
        directory.send_message(&sarah.id, "happy", "two").unwrap();
        directory.transcript("happy").unwrap()
    };

    let store = Arc::new(JsonFileStore::open(&path).unwrap());
    let directory = Directory::new(store, clock);
    assert_eq!(directory.transcript("happy").unwrap(), before);
}
