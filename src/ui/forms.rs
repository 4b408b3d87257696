use std::path::PathBuf;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::export::{CardExporter, Exporter, JsonExporter, PngExporter};

/// Share formats offered by the dialog.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum ShareFormat {
    #[default]
    Image,
    Card,
    Json,
}

impl ShareFormat {
    /// Display order.
    pub(crate) const ALL: [ShareFormat; 3] =
        [ShareFormat::Image, ShareFormat::Card, ShareFormat::Json];

    pub(crate) fn next(self) -> Self {
        match self {
            ShareFormat::Image => ShareFormat::Card,
            ShareFormat::Card => ShareFormat::Json,
            ShareFormat::Json => ShareFormat::Image,
        }
    }

    pub(crate) fn previous(self) -> Self {
        self.next().next()
    }

    pub(crate) fn exporter(self) -> &'static dyn Exporter {
        match self {
            ShareFormat::Image => &PngExporter,
            ShareFormat::Card => &CardExporter,
            ShareFormat::Json => &JsonExporter,
        }
    }
}

/// Progress of the share export shown in the dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum ShareState {
    #[default]
    Ready,
    Exported(PathBuf),
    Failed(String),
}

/// Modal state for exporting a finished setlist.
#[derive(Clone, Debug, Default)]
pub(crate) struct ShareDialog {
    pub(crate) format: ShareFormat,
    pub(crate) state: ShareState,
}

impl ShareDialog {
    /// Whether Enter should run the export. A finished export is shown until
    /// the dialog closes or the format changes.
    pub(crate) fn can_export(&self) -> bool {
        matches!(self.state, ShareState::Ready)
    }

    pub(crate) fn can_retry(&self) -> bool {
        matches!(self.state, ShareState::Failed(_))
    }

    pub(crate) fn exported_path(&self) -> Option<&PathBuf> {
        match &self.state {
            ShareState::Exported(path) => Some(path),
            _ => None,
        }
    }

    /// Pick another format; a shown result belongs to the old one.
    pub(crate) fn select_format(&mut self, format: ShareFormat) {
        self.format = format;
        self.state = ShareState::Ready;
    }

    /// Radio-style row for one format option.
    pub(crate) fn format_line(&self, format: ShareFormat) -> Line<'static> {
        let label = format.exporter().label();
        let marker = if self.format == format { "(•)" } else { "( )" };
        let style = if self.format == format {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(marker.to_string(), style),
            Span::raw(" "),
            Span::styled(label.to_string(), style),
        ])
    }
}

/// Confirmation before loading another show over a non-empty setlist.
pub(crate) struct ConfirmShowSwitch {
    pub(crate) artist_id: String,
    pub(crate) show_id: String,
    pub(crate) label: String,
    pub(crate) placed: usize,
}
