use std::io;
use std::mem;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::config::AppPaths;
use crate::db::{has_seen_drag_helper, mark_drag_helper_seen};
use crate::engine::DropOutcome;
use crate::export::{export_session, CardExporter, ExportPayload};
use crate::models::SongId;
use crate::session::{load_show, SessionState};

use super::forms::{ConfirmShowSwitch, ShareDialog, ShareFormat, ShareState};
use super::helpers::{centered_rect, slots_label, surface_error, term_color};
use super::screens::{BuilderScreen, Pane, ShowPickerScreen};
use super::terminal::copy_to_clipboard;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Show header: artist line plus date/venue line inside a border.
const HEADER_HEIGHT: u16 = 4;
/// How long the first-run helper stays up without a key press.
const HELPER_TIMEOUT: Duration = Duration::from_secs(5);

/// High-level navigation states.
enum Screen {
    Builder,
    Picker(ShowPickerScreen),
}

/// Fine-grained modes scoped to the current screen.
enum Mode {
    Normal,
    /// One-time drag helper, shown since the given instant.
    HelperHint(Instant),
    Sharing(ShareDialog),
    ConfirmShowSwitch(ConfirmShowSwitch),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    catalog: Catalog,
    paths: AppPaths,
    builder: BuilderScreen,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Build the app around an already loaded session. The drag helper is
    /// shown (and recorded as seen) the first time the app runs.
    pub fn new(
        prefs: &Connection,
        catalog: Catalog,
        session: SessionState,
        paths: AppPaths,
    ) -> Result<Self> {
        let seen = has_seen_drag_helper(prefs)?;
        let mode = if seen {
            Mode::Normal
        } else {
            mark_drag_helper_seen(prefs)?;
            Mode::HelperHint(Instant::now())
        };

        let fell_back = session.fell_back;
        let mut app = Self {
            catalog,
            paths,
            builder: BuilderScreen::new(session),
            screen: Screen::Builder,
            mode,
            status: None,
        };
        if fell_back {
            let info = &app.builder.session.info;
            let text = format!(
                "Requested show not found; showing {} · {}.",
                info.artist_name, info.date
            );
            app.set_status(text, StatusKind::Error);
        }
        Ok(app)
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            // Any key dismisses the helper and still does its usual job.
            Mode::HelperHint(_) => self.handle_normal_key(code, &mut exit)?,
            Mode::Sharing(dialog) => self.handle_share(code, dialog)?,
            Mode::ConfirmShowSwitch(confirm) => self.handle_confirm_show_switch(code, confirm)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    /// Periodic housekeeping between input events.
    pub(crate) fn tick(&mut self) {
        if let Mode::HelperHint(since) = self.mode {
            if since.elapsed() >= HELPER_TIMEOUT {
                self.mode = Mode::Normal;
            }
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::Builder => self.handle_builder_key(code, exit),
            Screen::Picker(_) => self.handle_picker_key(code, exit),
        }
    }

    fn handle_builder_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        let carrying = self.builder.is_carrying();
        match code {
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Esc => {
                if let Some(id) = self.builder.cancel_carry() {
                    let title = self.song_title(&id);
                    self.set_status(format!("Put {title} back."), StatusKind::Info);
                } else {
                    self.clear_status();
                }
            }
            KeyCode::Left => self.builder.focus_pane(Pane::Bank),
            KeyCode::Right => self.builder.focus_pane(Pane::Setlist),
            KeyCode::Tab | KeyCode::BackTab => {
                let pane = self.builder.focus.other();
                self.builder.focus_pane(pane);
            }
            KeyCode::Up => self.builder.move_cursor(-1),
            KeyCode::Down => self.builder.move_cursor(1),
            KeyCode::PageUp => self.builder.move_cursor(-5),
            KeyCode::PageDown => self.builder.move_cursor(5),
            KeyCode::Home => self.builder.cursor_to_start(),
            KeyCode::End => self.builder.cursor_to_end(),
            KeyCode::Char(' ') => {
                if carrying {
                    self.drop_carried();
                } else {
                    self.pick_up();
                }
            }
            KeyCode::Enter => {
                if carrying {
                    self.drop_carried();
                } else {
                    match self.builder.focus {
                        Pane::Bank => self.add_selected(),
                        Pane::Setlist => self.remove_selected(),
                    }
                }
            }
            KeyCode::Char('+' | 'a' | '-' | 'd' | 'x' | 'o') if carrying => {
                self.set_status(
                    "Drop the song with Space or put it back with Esc first.",
                    StatusKind::Error,
                );
            }
            KeyCode::Char('+') | KeyCode::Char('a') => self.add_selected(),
            KeyCode::Char('-') | KeyCode::Char('d') => self.remove_selected(),
            KeyCode::Char('x') | KeyCode::Char('X') => return Ok(self.open_share()),
            KeyCode::Char('o') | KeyCode::Char('O') => {
                self.clear_status();
                let info = &self.builder.session.info;
                let current = (info.artist_id.as_str(), info.show_id.as_str());
                let picker = ShowPickerScreen::new(&self.catalog, current);
                self.screen = Screen::Picker(picker);
            }
            KeyCode::Char('?') | KeyCode::Char('h') => {
                return Ok(Mode::HelperHint(Instant::now()));
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_picker_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        let Screen::Picker(ref mut picker) = self.screen else {
            return Ok(Mode::Normal);
        };
        match code {
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Esc | KeyCode::Char('o') => {
                self.screen = Screen::Builder;
            }
            KeyCode::Up => picker.move_selection(-1),
            KeyCode::Down => picker.move_selection(1),
            KeyCode::PageUp => picker.move_selection(-5),
            KeyCode::PageDown => picker.move_selection(5),
            KeyCode::Home => picker.select_first(),
            KeyCode::End => picker.select_last(),
            KeyCode::Enter => {
                let Some(entry) = picker.current() else {
                    self.set_status("No show selected.", StatusKind::Error);
                    return Ok(Mode::Normal);
                };
                let placed = self.builder.session.engine.setlist().len();
                if placed > 0 {
                    return Ok(Mode::ConfirmShowSwitch(ConfirmShowSwitch {
                        artist_id: entry.artist_id.clone(),
                        show_id: entry.show_id.clone(),
                        label: format!("{} · {}", entry.artist_name, entry.label),
                        placed,
                    }));
                }
                let (artist_id, show_id) = (entry.artist_id.clone(), entry.show_id.clone());
                self.switch_show(&artist_id, &show_id);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_confirm_show_switch(
        &mut self,
        code: KeyCode,
        confirm: ConfirmShowSwitch,
    ) -> Result<Mode> {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.switch_show(&confirm.artist_id, &confirm.show_id);
                Ok(Mode::Normal)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Ok(Mode::Normal),
            _ => Ok(Mode::ConfirmShowSwitch(confirm)),
        }
    }

    fn handle_share(&mut self, code: KeyCode, mut dialog: ShareDialog) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => return Ok(Mode::Normal),
            KeyCode::Tab | KeyCode::Down => dialog.select_format(dialog.format.next()),
            KeyCode::BackTab | KeyCode::Up => dialog.select_format(dialog.format.previous()),
            KeyCode::Enter | KeyCode::Char('e') => {
                if dialog.can_export() {
                    self.run_export(&mut dialog);
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if dialog.can_retry() {
                    self.run_export(&mut dialog);
                }
            }
            KeyCode::Char('c') | KeyCode::Char('C') => self.copy_card(),
            KeyCode::Char('o') | KeyCode::Char('O') => {
                if let Some(path) = dialog.exported_path() {
                    if let Err(err) = open_link(path) {
                        self.set_status(format!("Failed to open export: {err}"), StatusKind::Error);
                    } else {
                        self.set_status(format!("Opened {}.", path.display()), StatusKind::Info);
                    }
                }
            }
            _ => {}
        }
        Ok(Mode::Sharing(dialog))
    }

    fn pick_up(&mut self) {
        match self.builder.pick_up() {
            Some(id) => {
                let title = self.song_title(&id);
                self.set_status(
                    format!("Carrying {title}. Move to a spot and press Space to drop."),
                    StatusKind::Info,
                );
            }
            None => self.set_status("No song selected.", StatusKind::Error),
        }
    }

    fn drop_carried(&mut self) {
        let Some((id, outcome)) = self.builder.drop_carried() else {
            return;
        };
        let title = self.song_title(&id);
        let (text, kind) = match outcome {
            DropOutcome::Appended { position } => (
                format!("Added {title} as song {}.", position + 1),
                StatusKind::Info,
            ),
            DropOutcome::Placed { position } => (
                format!("Placed {title} at position {}.", position + 1),
                StatusKind::Info,
            ),
            DropOutcome::Reordered { to, .. } => (
                format!("Moved {title} to position {}.", to + 1),
                StatusKind::Info,
            ),
            DropOutcome::Removed => (
                format!("Returned {title} to the bank."),
                StatusKind::Info,
            ),
            DropOutcome::RejectedFull => (self.full_message(), StatusKind::Error),
            DropOutcome::Unchanged => (format!("{title} stays where it was."), StatusKind::Info),
            DropOutcome::Cancelled => (format!("Put {title} back."), StatusKind::Info),
        };
        if outcome.changed() {
            self.announce(text);
        } else {
            self.set_status(text, kind);
        }
    }

    fn add_selected(&mut self) {
        if self.builder.focus != Pane::Bank {
            self.set_status("Select a song in the bank to add it.", StatusKind::Error);
            return;
        }
        match self.builder.add_selected() {
            Some((id, true)) => {
                let title = self.song_title(&id);
                self.announce(format!("Added {title}."));
            }
            Some((_, false)) => {
                let text = self.full_message();
                self.set_status(text, StatusKind::Error);
            }
            None => self.set_status("No song selected.", StatusKind::Error),
        }
    }

    fn remove_selected(&mut self) {
        if self.builder.focus != Pane::Setlist {
            self.set_status(
                "Select a song in your setlist to remove it.",
                StatusKind::Error,
            );
            return;
        }
        match self.builder.remove_selected() {
            Some(id) => {
                let title = self.song_title(&id);
                self.set_status(format!("Returned {title} to the bank."), StatusKind::Info);
            }
            None => self.set_status("Your setlist is empty.", StatusKind::Error),
        }
    }

    /// Status after a successful change, pointing at the share dialog once the
    /// last slot is filled.
    fn announce(&mut self, text: String) {
        if self.builder.session.engine.is_complete() {
            self.set_status(
                format!("{text} Setlist complete! Press x to share."),
                StatusKind::Info,
            );
        } else {
            self.set_status(text, StatusKind::Info);
        }
    }

    fn full_message(&self) -> String {
        format!(
            "Setlist is full ({} songs). Remove a song first.",
            self.builder.session.engine.max_songs()
        )
    }

    fn open_share(&mut self) -> Mode {
        let engine = &self.builder.session.engine;
        if !engine.is_complete() {
            let remaining = engine.remaining_slots();
            let noun = if remaining == 1 { "song" } else { "songs" };
            self.set_status(
                format!("Add {remaining} more {noun} to share your setlist."),
                StatusKind::Error,
            );
            return Mode::Normal;
        }
        self.clear_status();
        Mode::Sharing(ShareDialog::default())
    }

    /// Session payload with any artwork found under the asset folder.
    fn share_payload(&self) -> ExportPayload {
        let payload = self.builder.session.export_payload();
        match &self.paths.asset_dir {
            Some(root) => payload.with_assets(root),
            None => payload,
        }
    }

    fn copy_card(&mut self) {
        let card = CardExporter.card_text(&self.share_payload());
        match copy_to_clipboard(&mut io::stdout(), &card) {
            Ok(()) => {
                self.set_status("Copied the share card to the clipboard.", StatusKind::Info)
            }
            Err(err) => self.set_status(format!("Copy failed: {err}"), StatusKind::Error),
        }
    }

    fn run_export(&mut self, dialog: &mut ShareDialog) {
        let exporter = dialog.format.exporter();
        let result = export_session(
            &self.builder.session,
            exporter,
            &self.paths.export_dir,
            self.paths.asset_dir.as_deref(),
        );
        match result {
            Ok(path) => {
                self.set_status(format!("Saved {}.", path.display()), StatusKind::Info);
                dialog.state = ShareState::Exported(path);
            }
            Err(err) => {
                let message = err.to_string();
                let err = anyhow::Error::new(err).context("export failed");
                self.set_status(
                    format!("Export failed: {}", surface_error(&err)),
                    StatusKind::Error,
                );
                dialog.state = ShareState::Failed(message);
            }
        }
    }

    /// Replace the session with a freshly loaded show. The old setlist is
    /// discarded.
    fn switch_show(&mut self, artist_id: &str, show_id: &str) {
        let loaded = load_show(&self.catalog, Some(artist_id), Some(show_id))
            .with_context(|| format!("failed to load {artist_id}/{show_id}"));
        match loaded {
            Ok(session) => {
                info!(artist = artist_id, show = show_id, "switched show");
                let text = format!(
                    "Loaded {} · {}.",
                    session.info.artist_name, session.info.date
                );
                self.builder = BuilderScreen::new(session);
                self.screen = Screen::Builder;
                self.set_status(text, StatusKind::Info);
            }
            Err(err) => {
                warn!(error = %err, "show switch failed");
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }

    fn song_title(&self, id: &SongId) -> String {
        self.builder
            .session
            .engine
            .song(id)
            .map(|song| song.title.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Builder => self.draw_builder(frame, content_area),
            Screen::Picker(picker) => self.draw_picker(frame, content_area, picker),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::HelperHint(_) => self.draw_helper(frame, area),
            Mode::Sharing(dialog) => self.draw_share(frame, area, dialog),
            Mode::ConfirmShowSwitch(confirm) => self.draw_confirm_switch(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_builder(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(HEADER_HEIGHT), Constraint::Min(0)])
            .split(area);
        self.draw_header(frame, chunks[0]);

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        self.draw_pane(frame, panes[0], Pane::Bank);
        self.draw_pane(frame, panes[1], Pane::Setlist);
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let session = &self.builder.session;
        let palette = session.palette;
        let info = &session.info;

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(term_color(palette.gradient_to)));
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let mut title = vec![Span::styled(
            info.artist_name.clone(),
            Style::default()
                .fg(term_color(palette.gradient_from))
                .add_modifier(Modifier::BOLD),
        )];
        if !info.tour_name.is_empty() {
            title.push(Span::raw("  "));
            title.push(Span::styled(
                info.tour_name.clone(),
                Style::default().fg(term_color(palette.secondary)),
            ));
        }

        let mut details = info.date.clone();
        if !info.is_date_range && !info.venue.is_empty() {
            details.push_str(" · ");
            details.push_str(&info.venue);
        }

        let lines = vec![
            Line::from(title),
            Line::from(Span::styled(details, Style::default().fg(Color::Gray))),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }

    fn draw_pane(&self, frame: &mut Frame, area: Rect, pane: Pane) {
        let engine = &self.builder.session.engine;
        let songs = match pane {
            Pane::Bank => self.builder.bank_songs(),
            Pane::Setlist => self.builder.setlist_songs(),
        };
        let focused = self.builder.focus == pane;
        let carried = self.builder.carried();
        let target = self.builder.drop_target();

        let title = match pane {
            Pane::Bank => format!(" Song Bank ({}) ", songs.len()),
            Pane::Setlist => format!(
                " Your Setlist {}/{} · {} ",
                engine.setlist().len(),
                engine.max_songs(),
                engine.total_duration().summary()
            ),
        };
        let footnote = match pane {
            Pane::Bank if engine.is_full() => Span::styled(
                format!(" Setlist is full (max {}) ", engine.max_songs()),
                Style::default().fg(Color::Red),
            ),
            Pane::Bank => Span::raw(""),
            Pane::Setlist if engine.is_complete() => Span::styled(
                " Setlist complete! Press [x] to share ",
                Style::default().fg(Color::Green),
            ),
            Pane::Setlist => Span::styled(
                format!(" {} ", slots_label(engine.remaining_slots())),
                Style::default().fg(Color::Gray),
            ),
        };
        let border_style = if focused {
            Style::default().fg(term_color(self.builder.session.palette.secondary))
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .title(title)
            .title_bottom(Line::from(footnote))
            .borders(Borders::ALL)
            .border_style(border_style);

        let mut items = Vec::new();
        if target.is_some() {
            let drop_zone = match pane {
                Pane::Bank => "↩ Return to bank",
                Pane::Setlist => "⤓ Add to end of setlist",
            };
            items.push(ListItem::new(drop_zone).style(Style::default().fg(Color::DarkGray)));
        }
        for (idx, song) in songs.iter().enumerate() {
            let number = match pane {
                Pane::Setlist => format!("{:>2}. ", idx + 1),
                Pane::Bank => String::new(),
            };
            let text = format!("{number}{}  {}", song.display_title(), song.duration);
            let style = if carried == Some(&song.id) {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::ITALIC)
            } else {
                Style::default()
            };
            items.push(ListItem::new(text).style(style));
        }

        if items.is_empty() {
            let placeholder = match pane {
                Pane::Bank => "Every song is in your setlist.",
                Pane::Setlist => "Pick up a song with Space, or press + to add it.",
            };
            let paragraph = Paragraph::new(Span::styled(
                placeholder,
                Style::default().fg(Color::DarkGray),
            ))
            .block(block)
            .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }

        let selected = match target {
            Some(target) if target.pane == pane => Some(target.row),
            Some(_) => None,
            None if focused => Some(self.builder.cursor(pane).selected),
            None => None,
        };
        let symbol = if target.is_some() { "⤷ " } else { "▶ " };
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol(symbol);

        let mut list_state = ListState::default();
        list_state.select(selected);
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_picker(&self, frame: &mut Frame, area: Rect, picker: &ShowPickerScreen) {
        let block = Block::default().title(" Choose a Show ").borders(Borders::ALL);
        if picker.entries.is_empty() {
            let paragraph = Paragraph::new("The catalog has no shows.").block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let current = &self.builder.session.info;
        let items: Vec<ListItem> = picker
            .entries
            .iter()
            .map(|entry| {
                let marker = if entry.artist_id == current.artist_id
                    && entry.show_id == current.show_id
                {
                    "● "
                } else {
                    "  "
                };
                ListItem::new(Line::from(vec![
                    Span::raw(marker),
                    Span::styled(
                        entry.artist_name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(entry.label.clone(), Style::default().fg(Color::Gray)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(picker.cursor.selected));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_helper(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("How to build your setlist")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from("Select a song and press Space to pick it up."),
            Line::from("Move with the arrow keys (← → switch panes) and press Space to drop."),
            Line::from("Drop on a pane's top row to append a song or send it back."),
            Line::from("Or press + and - to add and remove songs directly."),
            Line::from(""),
            Line::from(Span::styled(
                "Press any key to continue.",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_share(&self, frame: &mut Frame, area: Rect, dialog: &ShareDialog) {
        let popup_area = centered_rect(70, 85, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Share Your Setlist")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(9), Constraint::Min(0)])
            .split(block.inner(popup_area));
        let inner = chunks[0];

        let engine = &self.builder.session.engine;
        let mut lines = vec![
            Line::from(format!(
                "{} songs · {}",
                engine.setlist().len(),
                engine.total_duration().summary()
            )),
            Line::from(""),
        ];
        lines.extend(
            ShareFormat::ALL
                .iter()
                .map(|format| dialog.format_line(*format)),
        );
        lines.push(Line::from(""));
        match &dialog.state {
            ShareState::Ready => {
                lines.push(Line::from(format!(
                    "Exports go to {}",
                    self.paths.export_dir.display()
                )));
                lines.push(Line::from(Span::styled(
                    "Press Enter to export.",
                    Style::default().fg(Color::Gray),
                )));
            }
            ShareState::Exported(path) => {
                lines.push(Line::from(Span::styled(
                    format!("Saved to {}", path.display()),
                    Style::default().fg(Color::Green),
                )));
                lines.push(Line::from(Span::styled(
                    "Press o to open it.",
                    Style::default().fg(Color::Gray),
                )));
            }
            ShareState::Failed(message) => {
                lines.push(Line::from(Span::styled(
                    message.clone(),
                    Style::default().fg(Color::Red),
                )));
                lines.push(Line::from(Span::styled(
                    "Press r to retry.",
                    Style::default().fg(Color::Gray),
                )));
            }
        }

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let card = CardExporter.card_text(&self.share_payload());
        let preview = Paragraph::new(card.lines().map(Line::from).collect::<Vec<_>>())
            .alignment(Alignment::Center)
            .block(Block::default().title("Preview").borders(Borders::TOP));
        frame.render_widget(preview, chunks[1]);
    }

    fn draw_confirm_switch(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmShowSwitch) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Switch Show")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let noun = if confirm.placed == 1 { "song" } else { "songs" };
        let lines = vec![
            Line::from(format!("Load {}?", confirm.label)),
            Line::from(format!(
                "This clears the {} {noun} in your current setlist.",
                confirm.placed
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.screen, &self.mode) {
            (_, Mode::Sharing(dialog)) => {
                let mut spans = vec![
                    Span::styled("[Tab]", key_style),
                    Span::raw(" Format   "),
                ];
                match dialog.state {
                    ShareState::Ready => {
                        spans.push(Span::styled("[Enter]", key_style));
                        spans.push(Span::raw(" Export   "));
                    }
                    ShareState::Exported(_) => {
                        spans.push(Span::styled("[o]", key_style));
                        spans.push(Span::raw(" Open   "));
                    }
                    ShareState::Failed(_) => {
                        spans.push(Span::styled("[r]", key_style));
                        spans.push(Span::raw(" Retry   "));
                    }
                }
                spans.push(Span::styled("[c]", key_style));
                spans.push(Span::raw(" Copy Card   "));
                spans.push(Span::styled("[Esc]", key_style));
                spans.push(Span::raw(" Close"));
                Line::from(spans)
            }
            (_, Mode::ConfirmShowSwitch(_)) => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" Load   "),
                Span::styled("[N/Esc]", key_style),
                Span::raw(" Keep Current Setlist"),
            ]),
            (Screen::Picker(_), _) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Load Show   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            (Screen::Builder, _) if self.builder.is_carrying() => Line::from(vec![
                Span::styled("[↑↓←→]", key_style),
                Span::raw(" Move Target   "),
                Span::styled("[Space/Enter]", key_style),
                Span::raw(" Drop   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (Screen::Builder, _) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[←→]", key_style),
                Span::raw(" Pane   "),
                Span::styled("[Space]", key_style),
                Span::raw(" Pick Up   "),
                Span::styled("[+/-]", key_style),
                Span::raw(" Add/Remove   "),
                Span::styled("[x]", key_style),
                Span::raw(" Share   "),
                Span::styled("[o]", key_style),
                Span::raw(" Shows   "),
                Span::styled("[?]", key_style),
                Span::raw(" Help   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema_at;
    use std::path::{Path, PathBuf};

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app_in(dir: &Path, artist: &str, show: &str) -> App {
        let prefs = ensure_schema_at(&dir.join("prefs.sqlite")).unwrap();
        let catalog = Catalog::bundled().unwrap();
        let session = load_show(&catalog, Some(artist), Some(show)).unwrap();
        let paths = AppPaths {
            export_dir: dir.join("exports"),
            asset_dir: None,
            log_file: dir.join("test.log"),
        };
        App::new(&prefs, catalog, session, paths).unwrap()
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            assert!(!app.handle_key(*key).unwrap());
        }
    }

    #[test]
    fn helper_is_shown_once() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(dir.path(), "the-night-owls", "chicago-2025");
        assert!(matches!(app.mode, Mode::HelperHint(_)));
        drop(app);

        let app = app_in(dir.path(), "the-night-owls", "chicago-2025");
        assert!(matches!(app.mode, Mode::Normal));
    }

    fn fill_by_dragging(app: &mut App) {
        // Five appends onto the setlist header.
        for _ in 0..5 {
            press(
                app,
                &[KeyCode::Left, KeyCode::Home, KeyCode::Char(' '), KeyCode::Right, KeyCode::Enter],
            );
        }
        assert!(app.builder.session.engine.is_complete());
    }

    fn exported_path(app: &App) -> PathBuf {
        let Mode::Sharing(dialog) = &app.mode else {
            panic!("share dialog closed");
        };
        dialog.exported_path().unwrap().clone()
    }

    #[test]
    fn keyboard_drag_fills_and_exports_setlist() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), "the-night-owls", "chicago-2025");
        fill_by_dragging(&mut app);

        press(&mut app, &[KeyCode::Char('x')]);
        assert!(matches!(app.mode, Mode::Sharing(_)));
        press(&mut app, &[KeyCode::Enter]);

        let path = exported_path(&app);
        assert!(path.ends_with("the-night-owls-setlist.png"));
        assert!(path.exists());
    }

    #[test]
    fn tab_switches_to_the_text_card() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), "the-night-owls", "chicago-2025");
        fill_by_dragging(&mut app);

        press(&mut app, &[KeyCode::Char('x'), KeyCode::Tab, KeyCode::Enter]);
        let path = exported_path(&app);
        assert!(path.ends_with("the-night-owls-setlist.txt"));

        // Back-tab twice lands on JSON and clears the shown result.
        press(&mut app, &[KeyCode::BackTab, KeyCode::BackTab]);
        let Mode::Sharing(dialog) = &app.mode else {
            panic!("share dialog closed");
        };
        assert_eq!(dialog.format, ShareFormat::Json);
        assert!(dialog.can_export());
    }

    #[test]
    fn share_dialog_previews_the_card() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), "the-night-owls", "chicago-2025");
        fill_by_dragging(&mut app);
        press(&mut app, &[KeyCode::Char('x')]);

        let mut terminal = Terminal::new(TestBackend::new(120, 60)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("MY SETLIST"));
        assert!(screen.contains("THE NIGHT OWLS"));
        assert!(screen.contains("story image (PNG)"));
    }

    #[test]
    fn share_is_refused_until_complete() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), "the-night-owls", "chicago-2025");
        press(&mut app, &[KeyCode::Char('+'), KeyCode::Char('x')]);
        assert!(matches!(app.mode, Mode::Normal));
        let status = app.status.as_ref().unwrap();
        assert_eq!(status.text, "Add 4 more songs to share your setlist.");
    }

    #[test]
    fn switching_show_asks_before_clearing() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), "the-night-owls", "chicago-2025");
        press(&mut app, &[KeyCode::Char('+'), KeyCode::Char('o'), KeyCode::Home, KeyCode::Enter]);
        assert!(matches!(app.mode, Mode::ConfirmShowSwitch(_)));

        press(&mut app, &[KeyCode::Char('y')]);
        assert_eq!(app.builder.session.info.artist_id, "harbor-lights");
        assert!(app.builder.session.engine.setlist().is_empty());
        assert!(matches!(app.screen, Screen::Builder));
    }

    #[test]
    fn quit_key_exits() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), "ember-avenue", "austin-2025");
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }
}
