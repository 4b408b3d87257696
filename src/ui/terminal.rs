use std::io::{self, Stdout, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::clipboard::CopyToClipboard;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use tracing::debug;

use super::app::App;

/// Longest wait for input before the app gets a tick.
const TICK: Duration = Duration::from_millis(250);

/// Spin up the terminal backend, enter the draw loop, and keep processing input
/// until the user quits. The terminal is restored before any error from the
/// loop is returned.
pub fn run_app(app: &mut App) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    debug!("terminal ready");

    let result = drive(&mut terminal, app, next_event);

    cleanup_terminal(&mut terminal)?;
    result
}

fn next_event() -> Result<Option<Event>> {
    if event::poll(TICK).context("event polling failed")? {
        let event = event::read().context("failed to read event")?;
        Ok(Some(event))
    } else {
        Ok(None)
    }
}

/// Draw, wait for input, dispatch. Returns when the app asks to exit, on
/// Ctrl+C, or with the first draw/input/handler failure.
fn drive<B, F>(terminal: &mut Terminal<B>, app: &mut App, mut events: F) -> Result<()>
where
    B: Backend,
    F: FnMut() -> Result<Option<Event>>,
{
    loop {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        if let Some(Event::Key(key_event)) = events()? {
            if key_event.kind == KeyEventKind::Press {
                if key_event.modifiers.contains(KeyModifiers::CONTROL)
                    && key_event.code == KeyCode::Char('c')
                {
                    return Ok(());
                }
                if app.handle_key(key_event.code)? {
                    return Ok(());
                }
            }
        }
        app.tick();
    }
}

/// Ask the terminal to put `text` on the system clipboard (OSC 52).
pub(crate) fn copy_to_clipboard<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    execute!(out, CopyToClipboard::to_clipboard_from(text))
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal
        .show_cursor()
        .context("failed to restore cursor visibility")
}
