//! End-to-end setlist scenarios driven through the public API.

use pretty_assertions::assert_eq;

use setlist_sequence::engine::{BANK_CONTAINER, SETLIST_CONTAINER};
use setlist_sequence::export::{export_session, ExportError, JsonExporter};
use setlist_sequence::models::SongDuration;
use setlist_sequence::{
    load_show, Catalog, CatalogError, DragGesture, DropOutcome, SetlistEngine, Song, SongId,
};

fn song(id: &str, secs: u32) -> Song {
    Song {
        id: SongId::from(id),
        title: format!("Song {id}"),
        artist: "Test Band".into(),
        duration: SongDuration::from_secs(secs),
    }
}

fn ids(engine: &SetlistEngine) -> Vec<&str> {
    engine.setlist().iter().map(SongId::as_str).collect()
}

fn bank_ids(engine: &SetlistEngine) -> Vec<&str> {
    engine.bank_items().iter().map(|s| s.id.as_str()).collect()
}

#[test]
fn three_slot_show_fills_and_then_rejects() {
    let catalog: Vec<Song> = ["S1", "S2", "S3", "S4"]
        .iter()
        .map(|id| song(id, 180))
        .collect();
    let mut engine = SetlistEngine::new(catalog, 3);

    assert!(engine.add(&SongId::from("S2")));
    assert!(engine.add(&SongId::from("S4")));
    assert!(engine.add(&SongId::from("S1")));
    assert_eq!(ids(&engine), vec!["S2", "S4", "S1"]);
    assert!(engine.is_complete());
    assert_eq!(bank_ids(&engine), vec!["S3"]);

    let before = engine.clone();
    assert!(!engine.add(&SongId::from("S3")));
    assert_eq!(engine, before);

    let outcome = engine.handle_drop("S3", Some(SETLIST_CONTAINER));
    assert_eq!(outcome, DropOutcome::RejectedFull);
    assert_eq!(engine, before);
}

#[test]
fn drag_gestures_build_and_reorder() {
    let catalog: Vec<Song> = ["A", "B", "C", "D", "X"]
        .iter()
        .map(|id| song(id, 200))
        .collect();
    let mut engine = SetlistEngine::new(catalog, 5);

    for id in ["A", "B", "C", "D"] {
        let mut gesture = DragGesture::start(SongId::from(id));
        gesture.set_hover(Some(SETLIST_CONTAINER.to_string()));
        assert!(gesture.finish(&mut engine).changed());
    }
    assert_eq!(ids(&engine), vec!["A", "B", "C", "D"]);

    let mut gesture = DragGesture::start(SongId::from("A"));
    gesture.set_hover(Some("C".to_string()));
    assert_eq!(
        gesture.finish(&mut engine),
        DropOutcome::Reordered { from: 0, to: 2 }
    );
    assert_eq!(ids(&engine), vec!["B", "C", "A", "D"]);

    let mut gesture = DragGesture::start(SongId::from("X"));
    gesture.set_hover(Some("C".to_string()));
    assert_eq!(gesture.finish(&mut engine), DropOutcome::Placed { position: 1 });
    assert_eq!(ids(&engine), vec!["B", "X", "C", "A", "D"]);

    let mut gesture = DragGesture::start(SongId::from("D"));
    gesture.set_hover(Some(BANK_CONTAINER.to_string()));
    assert_eq!(gesture.finish(&mut engine), DropOutcome::Removed);
    assert_eq!(ids(&engine), vec!["B", "X", "C", "A"]);
    assert_eq!(bank_ids(&engine), vec!["D"]);
}

#[test]
fn cancelled_gesture_is_invisible() {
    let catalog: Vec<Song> = ["A", "B"].iter().map(|id| song(id, 60)).collect();
    let mut engine = SetlistEngine::new(catalog, 2);
    engine.add(&SongId::from("A"));
    let before = engine.clone();

    let mut gesture = DragGesture::start(SongId::from("A"));
    gesture.set_hover(Some(BANK_CONTAINER.to_string()));
    gesture.set_hover(None);
    assert_eq!(gesture.finish(&mut engine), DropOutcome::Cancelled);
    assert_eq!(engine, before);
}

#[test]
fn bundled_show_exports_once_complete() {
    let catalog = Catalog::bundled().unwrap();
    let mut session = load_show(&catalog, Some("harbor-lights"), Some("portland-2025")).unwrap();
    assert_eq!(session.engine.max_songs(), 7);
    let dir = tempfile::tempdir().unwrap();

    let err = export_session(&session, &JsonExporter, dir.path(), None).unwrap_err();
    assert!(matches!(err, ExportError::Incomplete { placed: 0, max_songs: 7 }));

    let picks: Vec<SongId> = session
        .engine
        .bank_items()
        .iter()
        .rev()
        .take(7)
        .map(|s| s.id.clone())
        .collect();
    for id in &picks {
        assert!(session.engine.add(id));
    }
    assert!(session.engine.is_complete());

    let path = export_session(&session, &JsonExporter, dir.path(), None).unwrap();
    assert_eq!(path, dir.path().join("harbor-lights-setlist.json"));

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let exported: Vec<&str> = written["songs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    let expected: Vec<&str> = picks.iter().map(SongId::as_str).collect();
    assert_eq!(exported, expected);
    assert_eq!(written["tourName"], "Tides Tour");
}

#[test]
fn loading_another_show_starts_empty() {
    let catalog = Catalog::bundled().unwrap();
    let mut session = load_show(&catalog, None, None).unwrap();
    let first = session.engine.bank_items()[0].id.clone();
    session.engine.add(&first);

    let session = load_show(&catalog, Some("ember-avenue"), Some("austin-2025")).unwrap();
    assert!(session.engine.setlist().is_empty());
    assert_eq!(session.engine.catalog().len(), 9);
}

#[test]
fn catalog_song_named_like_a_container_is_refused() {
    let json = r#"{
        "artists": [{
            "id": "band",
            "name": "Band",
            "shows": [{
                "id": "one",
                "date": "Jan 1",
                "venue": "Hall",
                "maxSongs": 3,
                "songs": [
                    {"id": "setlist-container", "title": "Intro", "artist": "Band", "duration": 60},
                    {"id": "A", "title": "A", "artist": "Band", "duration": 60},
                    {"id": "X", "title": "X", "artist": "Band", "duration": 60}
                ]
            }]
        }]
    }"#;
    let err = Catalog::from_json(json).unwrap_err();
    assert!(matches!(err, CatalogError::ReservedSongId { .. }));

    // With ordinary ids the same drop places the song before its target.
    let mut engine = SetlistEngine::new(vec![song("I", 60), song("A", 60), song("X", 60)], 3);
    engine.add(&SongId::from("I"));
    engine.add(&SongId::from("A"));
    assert_eq!(engine.handle_drop("X", Some("I")), DropOutcome::Placed { position: 0 });
    assert_eq!(ids(&engine), vec!["X", "I", "A"]);
}
