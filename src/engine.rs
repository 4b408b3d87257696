//! Setlist assembly state machine.
//!
//! The engine owns the ordered setlist for one loaded show and derives the
//! bank from the catalog on demand. Every mutating operation either keeps the
//! invariants (no duplicates, length bounded by the show capacity, members
//! drawn from the catalog) or leaves the state untouched. Nothing here returns
//! an error: a request that cannot be fulfilled simply has no effect, and the
//! drop dispatcher reports which branch it took through [`DropOutcome`].

use tracing::debug;

use crate::models::{Song, SongDuration, SongId};

/// Drop-zone identifier for the setlist pane as a whole.
pub const SETLIST_CONTAINER: &str = "setlist-container";
/// Drop-zone identifier for the bank pane as a whole.
pub const BANK_CONTAINER: &str = "bank-container";

/// What a completed drag gesture did to the setlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// A bank song was appended at `position`.
    Appended { position: usize },
    /// A bank song was inserted in front of the hovered setlist song.
    Placed { position: usize },
    /// A setlist song moved from one slot to another.
    Reordered { from: usize, to: usize },
    /// A setlist song went back to the bank.
    Removed,
    /// A bank song was refused because the setlist is full.
    RejectedFull,
    /// The drop matched a combination with no effect.
    Unchanged,
    /// The gesture ended without a drop target.
    Cancelled,
}

impl DropOutcome {
    pub fn changed(&self) -> bool {
        matches!(
            self,
            DropOutcome::Appended { .. }
                | DropOutcome::Placed { .. }
                | DropOutcome::Reordered { .. }
                | DropOutcome::Removed
        )
    }
}

/// Where the dragged item currently lives.
enum ActiveSlot {
    Setlist(usize),
    Bank,
    Foreign,
}

/// What the gesture ended over.
enum OverSlot {
    SetlistContainer,
    BankContainer,
    Setlist(usize),
    /// A bank song or any other identifier that is not part of the setlist.
    Elsewhere,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetlistEngine {
    catalog: Vec<Song>,
    setlist: Vec<SongId>,
    max_songs: usize,
}

impl SetlistEngine {
    /// Start with an empty setlist over `catalog`. Duplicate catalog ids are
    /// the catalog loader's concern; the engine keeps the first occurrence
    /// when resolving records.
    pub fn new(catalog: Vec<Song>, max_songs: usize) -> Self {
        Self {
            catalog,
            setlist: Vec::with_capacity(max_songs),
            max_songs,
        }
    }

    pub fn catalog(&self) -> &[Song] {
        &self.catalog
    }

    pub fn setlist(&self) -> &[SongId] {
        &self.setlist
    }

    pub fn max_songs(&self) -> usize {
        self.max_songs
    }

    pub fn song(&self, id: &SongId) -> Option<&Song> {
        self.catalog.iter().find(|song| &song.id == id)
    }

    pub fn in_catalog(&self, id: &SongId) -> bool {
        self.song(id).is_some()
    }

    pub fn contains(&self, id: &SongId) -> bool {
        self.setlist.contains(id)
    }

    /// Zero-based performance slot of `id`, if it is in the setlist.
    pub fn position(&self, id: &SongId) -> Option<usize> {
        self.setlist.iter().position(|member| member == id)
    }

    pub fn is_full(&self) -> bool {
        self.setlist.len() == self.max_songs
    }

    /// Gate for the export flow. Identical to [`is_full`](Self::is_full), so a
    /// zero-capacity show is complete while empty.
    pub fn is_complete(&self) -> bool {
        self.setlist.len() == self.max_songs
    }

    pub fn remaining_slots(&self) -> usize {
        self.max_songs.saturating_sub(self.setlist.len())
    }

    /// Catalog songs not in the setlist, in catalog order. Computed fresh on
    /// every call.
    pub fn bank_items(&self) -> Vec<&Song> {
        self.catalog
            .iter()
            .filter(|song| !self.setlist.contains(&song.id))
            .collect()
    }

    /// Setlist resolved to full records, in performance order.
    pub fn setlist_songs(&self) -> Vec<&Song> {
        self.setlist.iter().filter_map(|id| self.song(id)).collect()
    }

    pub fn total_duration(&self) -> SongDuration {
        self.setlist_songs().iter().map(|song| song.duration).sum()
    }

    /// Move a bank song into the setlist at `target_index`, or append when
    /// the index is absent or past the end. Refused when the song is unknown,
    /// already placed, or the setlist is full.
    pub fn move_to_setlist(&mut self, id: &SongId, target_index: Option<usize>) -> bool {
        if !self.in_catalog(id) || self.contains(id) || self.setlist.len() >= self.max_songs {
            return false;
        }
        match target_index {
            Some(index) if index <= self.setlist.len() => self.setlist.insert(index, id.clone()),
            _ => self.setlist.push(id.clone()),
        }
        true
    }

    /// Send a setlist song back to the bank. Absent ids are ignored.
    pub fn move_to_bank(&mut self, id: &SongId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.setlist.remove(index);
                true
            }
            None => false,
        }
    }

    /// Single-element array move: `id` leaves its slot and lands on the slot
    /// `target` occupied, shifting everything in between by one.
    pub fn reorder(&mut self, id: &SongId, target: &SongId) -> bool {
        match (self.position(id), self.position(target)) {
            (Some(from), Some(to)) => self.move_slot(from, to),
            _ => false,
        }
    }

    /// Insert a bank song directly in front of a setlist song, pushing the
    /// target and everything after it back by one.
    pub fn transfer_and_place(&mut self, id: &SongId, target: &SongId) -> bool {
        if self.contains(id) {
            return false;
        }
        match self.position(target) {
            Some(index) => self.move_to_setlist(id, Some(index)),
            None => false,
        }
    }

    /// Direct add, used by tap/keyboard shortcuts instead of a drag.
    pub fn add(&mut self, id: &SongId) -> bool {
        self.move_to_setlist(id, None)
    }

    /// Direct remove; unconditional.
    pub fn remove(&mut self, id: &SongId) -> bool {
        self.move_to_bank(id)
    }

    /// Resolve one completed drag gesture. `active_id` is the dragged song,
    /// `over_id` the song or container it was released over (`None` when the
    /// gesture was cancelled). Exactly one branch runs.
    pub fn handle_drop(&mut self, active_id: &str, over_id: Option<&str>) -> DropOutcome {
        let Some(over_id) = over_id else {
            debug!(active = active_id, "drag ended without a target");
            return DropOutcome::Cancelled;
        };

        let active = SongId::from(active_id);
        let outcome = match (self.classify_active(&active), self.classify_over(over_id)) {
            (ActiveSlot::Foreign, _) => DropOutcome::Unchanged,

            (ActiveSlot::Setlist(_), OverSlot::SetlistContainer) => DropOutcome::Unchanged,
            (ActiveSlot::Setlist(index), OverSlot::BankContainer | OverSlot::Elsewhere) => {
                self.setlist.remove(index);
                DropOutcome::Removed
            }
            (ActiveSlot::Setlist(from), OverSlot::Setlist(to)) => {
                if self.move_slot(from, to) {
                    DropOutcome::Reordered { from, to }
                } else {
                    DropOutcome::Unchanged
                }
            }

            (ActiveSlot::Bank, OverSlot::SetlistContainer) => {
                if self.move_to_setlist(&active, None) {
                    DropOutcome::Appended {
                        position: self.setlist.len() - 1,
                    }
                } else {
                    DropOutcome::RejectedFull
                }
            }
            (ActiveSlot::Bank, OverSlot::Setlist(index)) => {
                if self.move_to_setlist(&active, Some(index)) {
                    DropOutcome::Placed { position: index }
                } else {
                    DropOutcome::RejectedFull
                }
            }
            (ActiveSlot::Bank, OverSlot::BankContainer | OverSlot::Elsewhere) => {
                DropOutcome::Unchanged
            }
        };

        debug!(active = active_id, over = over_id, ?outcome, "drop resolved");
        outcome
    }

    fn classify_active(&self, id: &SongId) -> ActiveSlot {
        if let Some(index) = self.position(id) {
            ActiveSlot::Setlist(index)
        } else if self.in_catalog(id) {
            ActiveSlot::Bank
        } else {
            ActiveSlot::Foreign
        }
    }

    fn classify_over(&self, over_id: &str) -> OverSlot {
        match over_id {
            SETLIST_CONTAINER => OverSlot::SetlistContainer,
            BANK_CONTAINER => OverSlot::BankContainer,
            other => match self.setlist.iter().position(|id| id.as_str() == other) {
                Some(index) => OverSlot::Setlist(index),
                None => OverSlot::Elsewhere,
            },
        }
    }

    fn move_slot(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.setlist.len() || to >= self.setlist.len() {
            return false;
        }
        let id = self.setlist.remove(from);
        self.setlist.insert(to, id);
        true
    }
}
