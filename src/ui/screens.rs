use crate::catalog::Catalog;
use crate::engine::{DropOutcome, BANK_CONTAINER, SETLIST_CONTAINER};
use crate::gesture::DragGesture;
use crate::models::{Song, SongId};
use crate::session::SessionState;

/// Clamped cursor over a list whose length changes underneath it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ListCursor {
    pub(crate) selected: usize,
}

impl ListCursor {
    pub(crate) fn move_selection(&mut self, offset: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len as isize {
            new = len as isize - 1;
        }
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    pub(crate) fn ensure_in_bounds(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

/// The two drop zones of the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pane {
    Bank,
    Setlist,
}

impl Pane {
    pub(crate) fn other(self) -> Self {
        match self {
            Pane::Bank => Pane::Setlist,
            Pane::Setlist => Pane::Bank,
        }
    }

    pub(crate) fn container_id(self) -> &'static str {
        match self {
            Pane::Bank => BANK_CONTAINER,
            Pane::Setlist => SETLIST_CONTAINER,
        }
    }
}

/// Where a carried song would land. Row 0 is the pane header, which stands
/// for the pane's container; rows from 1 are the pane's songs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DropTarget {
    pub(crate) pane: Pane,
    pub(crate) row: usize,
}

/// A song currently being carried plus the target it hovers over.
pub(crate) struct Carry {
    pub(crate) gesture: DragGesture,
    pub(crate) target: DropTarget,
}

/// Backing state for the bank/setlist builder.
pub(crate) struct BuilderScreen {
    pub(crate) session: SessionState,
    pub(crate) focus: Pane,
    pub(crate) bank: ListCursor,
    pub(crate) setlist: ListCursor,
    pub(crate) carry: Option<Carry>,
}

impl BuilderScreen {
    pub(crate) fn new(session: SessionState) -> Self {
        Self {
            session,
            focus: Pane::Bank,
            bank: ListCursor::default(),
            setlist: ListCursor::default(),
            carry: None,
        }
    }

    pub(crate) fn bank_songs(&self) -> Vec<&Song> {
        self.session.engine.bank_items()
    }

    pub(crate) fn setlist_songs(&self) -> Vec<&Song> {
        self.session.engine.setlist_songs()
    }

    fn pane_len(&self, pane: Pane) -> usize {
        match pane {
            Pane::Bank => self.bank_songs().len(),
            Pane::Setlist => self.session.engine.setlist().len(),
        }
    }

    fn song_id_at(&self, pane: Pane, index: usize) -> Option<SongId> {
        match pane {
            Pane::Bank => self.bank_songs().get(index).map(|song| song.id.clone()),
            Pane::Setlist => self.session.engine.setlist().get(index).cloned(),
        }
    }

    fn cursor_mut(&mut self, pane: Pane) -> &mut ListCursor {
        match pane {
            Pane::Bank => &mut self.bank,
            Pane::Setlist => &mut self.setlist,
        }
    }

    pub(crate) fn cursor(&self, pane: Pane) -> ListCursor {
        match pane {
            Pane::Bank => self.bank,
            Pane::Setlist => self.setlist,
        }
    }

    pub(crate) fn selected_song(&self) -> Option<SongId> {
        self.song_id_at(self.focus, self.cursor(self.focus).selected)
    }

    pub(crate) fn is_carrying(&self) -> bool {
        self.carry.is_some()
    }

    pub(crate) fn carried(&self) -> Option<&SongId> {
        self.carry.as_ref().map(|carry| carry.gesture.active())
    }

    pub(crate) fn drop_target(&self) -> Option<DropTarget> {
        self.carry.as_ref().map(|carry| carry.target)
    }

    /// Id the hover target maps to: a container sentinel for a header row,
    /// otherwise the song at that row.
    fn target_id(&self, target: DropTarget) -> Option<String> {
        if target.row == 0 {
            return Some(target.pane.container_id().to_string());
        }
        self.song_id_at(target.pane, target.row - 1)
            .map(|id| id.as_str().to_string())
    }

    pub(crate) fn move_cursor(&mut self, offset: isize) {
        if let Some(mut target) = self.drop_target() {
            // Header row plus one row per song.
            let rows = self.pane_len(target.pane) + 1;
            let mut cursor = ListCursor {
                selected: target.row,
            };
            cursor.move_selection(offset, rows);
            target.row = cursor.selected;
            self.set_target(target);
            return;
        }
        let pane = self.focus;
        let len = self.pane_len(pane);
        self.cursor_mut(pane).move_selection(offset, len);
    }

    pub(crate) fn cursor_to_start(&mut self) {
        if let Some(mut target) = self.drop_target() {
            target.row = 0;
            self.set_target(target);
            return;
        }
        let pane = self.focus;
        self.cursor_mut(pane).select_first();
    }

    pub(crate) fn cursor_to_end(&mut self) {
        if let Some(mut target) = self.drop_target() {
            target.row = self.pane_len(target.pane);
            self.set_target(target);
            return;
        }
        let pane = self.focus;
        let len = self.pane_len(pane);
        self.cursor_mut(pane).select_last(len);
    }

    pub(crate) fn focus_pane(&mut self, pane: Pane) {
        self.focus = pane;
        if let Some(mut target) = self.drop_target() {
            if target.pane != pane {
                target.pane = pane;
                target.row = 0;
                self.set_target(target);
            }
        }
    }

    fn set_target(&mut self, target: DropTarget) {
        let hover = self.target_id(target);
        if let Some(carry) = self.carry.as_mut() {
            carry.target = target;
            carry.gesture.set_hover(hover);
        }
    }

    /// Start carrying the selected song. The hover starts on the song itself.
    pub(crate) fn pick_up(&mut self) -> Option<SongId> {
        if self.carry.is_some() {
            return None;
        }
        let active = self.selected_song()?;
        let target = DropTarget {
            pane: self.focus,
            row: self.cursor(self.focus).selected + 1,
        };
        self.carry = Some(Carry {
            gesture: DragGesture::start(active.clone()),
            target,
        });
        self.set_target(target);
        Some(active)
    }

    /// Drop the carried song on the hover target.
    pub(crate) fn drop_carried(&mut self) -> Option<(SongId, DropOutcome)> {
        let carry = self.carry.take()?;
        let active = carry.gesture.active().clone();
        let outcome = carry.gesture.finish(&mut self.session.engine);
        self.follow(&active, &outcome);
        Some((active, outcome))
    }

    pub(crate) fn cancel_carry(&mut self) -> Option<SongId> {
        let carry = self.carry.take()?;
        let active = carry.gesture.active().clone();
        carry.gesture.cancel(&mut self.session.engine);
        self.sync_cursors();
        Some(active)
    }

    pub(crate) fn add_selected(&mut self) -> Option<(SongId, bool)> {
        if self.focus != Pane::Bank {
            return None;
        }
        let id = self.selected_song()?;
        let added = self.session.engine.add(&id);
        self.sync_cursors();
        Some((id, added))
    }

    pub(crate) fn remove_selected(&mut self) -> Option<SongId> {
        if self.focus != Pane::Setlist {
            return None;
        }
        let id = self.selected_song()?;
        self.session.engine.remove(&id);
        self.sync_cursors();
        Some(id)
    }

    /// Keep the cursor on the moved song after a drop.
    fn follow(&mut self, active: &SongId, outcome: &DropOutcome) {
        match outcome {
            DropOutcome::Appended { position } | DropOutcome::Placed { position } => {
                self.focus = Pane::Setlist;
                self.setlist.selected = *position;
            }
            DropOutcome::Reordered { to, .. } => {
                self.focus = Pane::Setlist;
                self.setlist.selected = *to;
            }
            DropOutcome::Removed => {
                self.focus = Pane::Bank;
                let index = self.bank_songs().iter().position(|s| &s.id == active);
                if let Some(index) = index {
                    self.bank.selected = index;
                }
            }
            _ => {}
        }
        self.sync_cursors();
    }

    pub(crate) fn sync_cursors(&mut self) {
        let bank_len = self.pane_len(Pane::Bank);
        let setlist_len = self.pane_len(Pane::Setlist);
        self.bank.ensure_in_bounds(bank_len);
        self.setlist.ensure_in_bounds(setlist_len);
    }
}

/// One selectable artist/show pair in the picker.
pub(crate) struct ShowEntry {
    pub(crate) artist_id: String,
    pub(crate) show_id: String,
    pub(crate) artist_name: String,
    pub(crate) label: String,
}

/// Backing state for the show picker.
pub(crate) struct ShowPickerScreen {
    pub(crate) entries: Vec<ShowEntry>,
    pub(crate) cursor: ListCursor,
}

impl ShowPickerScreen {
    /// List every show, with the cursor on the one currently loaded.
    pub(crate) fn new(catalog: &Catalog, current: (&str, &str)) -> Self {
        let mut entries = Vec::new();
        for artist in catalog.artists() {
            for show in &artist.shows {
                let mut label = format!("{} · {}", show.date, show.venue);
                if let Some(tour) = show.tour_name.as_deref().filter(|t| !t.is_empty()) {
                    label.push_str(&format!(" · {tour}"));
                }
                entries.push(ShowEntry {
                    artist_id: artist.id.clone(),
                    show_id: show.id.clone(),
                    artist_name: artist.name.clone(),
                    label,
                });
            }
        }
        let selected = entries
            .iter()
            .position(|entry| entry.artist_id == current.0 && entry.show_id == current.1)
            .unwrap_or(0);
        Self {
            entries,
            cursor: ListCursor { selected },
        }
    }

    pub(crate) fn current(&self) -> Option<&ShowEntry> {
        self.entries.get(self.cursor.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        self.cursor.move_selection(offset, self.entries.len());
    }

    pub(crate) fn select_first(&mut self) {
        self.cursor.select_first();
    }

    pub(crate) fn select_last(&mut self) {
        self.cursor.select_last(self.entries.len());
    }
}
