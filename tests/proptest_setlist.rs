//! Property tests: the setlist invariants hold after any sequence of
//! operations, whatever ids are thrown at the engine.

use std::collections::HashSet;

use proptest::prelude::*;

use setlist_sequence::engine::{BANK_CONTAINER, SETLIST_CONTAINER};
use setlist_sequence::models::SongDuration;
use setlist_sequence::{DragGesture, SetlistEngine, Song, SongId};

const CATALOG_SIZE: usize = 8;

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Remove(usize),
    MoveTo(usize, Option<usize>),
    Reorder(usize, usize),
    Transfer(usize, usize),
    Drop(usize, Option<Target>),
}

#[derive(Debug, Clone)]
enum Target {
    Song(usize),
    SetlistContainer,
    BankContainer,
}

/// Indices past the catalog size produce ids the engine does not know.
fn id(index: usize) -> SongId {
    SongId::new(format!("s{index}"))
}

fn engine(max_songs: usize) -> SetlistEngine {
    let catalog = (0..CATALOG_SIZE)
        .map(|i| Song {
            id: id(i),
            title: format!("Song {i}"),
            artist: "Band".into(),
            duration: SongDuration::from_secs(120 + i as u32),
        })
        .collect();
    SetlistEngine::new(catalog, max_songs)
}

fn target() -> impl Strategy<Value = Target> {
    prop_oneof![
        (0..CATALOG_SIZE + 2).prop_map(Target::Song),
        Just(Target::SetlistContainer),
        Just(Target::BankContainer),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    let song = 0..CATALOG_SIZE + 2;
    prop_oneof![
        song.clone().prop_map(Op::Add),
        song.clone().prop_map(Op::Remove),
        (song.clone(), proptest::option::of(0..12usize)).prop_map(|(s, i)| Op::MoveTo(s, i)),
        (song.clone(), song.clone()).prop_map(|(a, b)| Op::Reorder(a, b)),
        (song.clone(), song.clone()).prop_map(|(a, b)| Op::Transfer(a, b)),
        (song, proptest::option::of(target())).prop_map(|(a, t)| Op::Drop(a, t)),
    ]
}

fn apply(engine: &mut SetlistEngine, op: &Op) {
    match op {
        Op::Add(s) => {
            engine.add(&id(*s));
        }
        Op::Remove(s) => {
            engine.remove(&id(*s));
        }
        Op::MoveTo(s, index) => {
            engine.move_to_setlist(&id(*s), *index);
        }
        Op::Reorder(a, b) => {
            engine.reorder(&id(*a), &id(*b));
        }
        Op::Transfer(a, b) => {
            engine.transfer_and_place(&id(*a), &id(*b));
        }
        Op::Drop(a, over) => {
            let mut gesture = DragGesture::start(id(*a));
            let hover = over.as_ref().map(|t| match t {
                Target::Song(s) => id(*s).as_str().to_string(),
                Target::SetlistContainer => SETLIST_CONTAINER.to_string(),
                Target::BankContainer => BANK_CONTAINER.to_string(),
            });
            gesture.set_hover(hover);
            gesture.finish(engine);
        }
    }
}

fn check_invariants(engine: &SetlistEngine) -> Result<(), TestCaseError> {
    let setlist = engine.setlist();
    prop_assert!(setlist.len() <= engine.max_songs());

    let unique: HashSet<&SongId> = setlist.iter().collect();
    prop_assert_eq!(unique.len(), setlist.len());

    for member in setlist {
        prop_assert!(engine.in_catalog(member));
    }

    let bank = engine.bank_items();
    prop_assert!(bank.iter().all(|song| !engine.contains(&song.id)));
    prop_assert_eq!(bank.len() + setlist.len(), CATALOG_SIZE);
    prop_assert_eq!(engine.is_complete(), setlist.len() == engine.max_songs());
    Ok(())
}

proptest! {
    /// Bounded length, no duplicates, and a disjoint bank after every step.
    #[test]
    fn invariants_hold_for_any_operation_sequence(
        max_songs in 0..=CATALOG_SIZE,
        ops in prop::collection::vec(op(), 0..60)
    ) {
        let mut engine = engine(max_songs);
        for op in &ops {
            apply(&mut engine, op);
            check_invariants(&engine)?;
        }
    }

    /// A gesture that ends without a target never changes anything.
    #[test]
    fn targetless_drops_are_identity(
        ops in prop::collection::vec(op(), 0..30),
        active in 0..CATALOG_SIZE + 2
    ) {
        let mut engine = engine(5);
        for op in &ops {
            apply(&mut engine, op);
        }
        let before = engine.clone();
        DragGesture::start(id(active)).finish(&mut engine);
        prop_assert_eq!(engine, before);
    }

    /// Removing twice is the same as removing once.
    #[test]
    fn removal_is_idempotent(
        ops in prop::collection::vec(op(), 0..30),
        victim in 0..CATALOG_SIZE
    ) {
        let mut engine = engine(6);
        for op in &ops {
            apply(&mut engine, op);
        }
        engine.remove(&id(victim));
        let once = engine.clone();
        engine.remove(&id(victim));
        prop_assert_eq!(engine, once);
    }
}
