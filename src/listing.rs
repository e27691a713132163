//! Column-aligned listing fed to the picker.

use crossterm::style::{style, Color, Stylize};

use crate::probe::{ProjectStatus, Tone};
use crate::registry::ProjectEntry;

/// Separator between columns. Display names must not contain a run this long.
pub const GUTTER: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    /// Color hint; `None` renders unstyled
    pub tone: Option<Tone>,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: None,
        }
    }

    fn toned(text: &str, tone: Tone) -> Self {
        Self {
            text: text.to_string(),
            tone: Some(tone),
        }
    }
}

/// One listing row: padded cells followed by the raw stored path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<Cell>,
    pub path: String,
}

/// Build the row for an entry.
///
/// `live` supplies probed facets; without it, structured entries show their
/// stored snapshot strings.
pub fn row(entry: &ProjectEntry, live: Option<&ProjectStatus>) -> Row {
    let mut cells = vec![Cell::plain(entry.display_name())];

    let snapshot = match entry {
        ProjectEntry::Plain(_) => None,
        ProjectEntry::Structured(record) => {
            cells.push(Cell::plain(record.language.clone().unwrap_or_default()));
            cells.push(Cell::plain(record.framework.clone().unwrap_or_default()));
            Some(record)
        }
    };

    match (live, snapshot) {
        (Some(status), _) => {
            cells.push(Cell::toned(status.session.glyph(), status.session.tone()));
            cells.push(Cell::toned(status.vcs.glyph(), status.vcs.tone()));
            cells.push(Cell::toned(status.remote.glyph(), status.remote.tone()));
        }
        (None, Some(record)) => {
            for field in [&record.tmux_status, &record.git_status, &record.github_status] {
                cells.push(Cell::plain(field.clone().unwrap_or_default()));
            }
        }
        (None, None) => {}
    }

    Row {
        cells,
        path: entry.raw_path().to_string(),
    }
}

/// Render rows into display lines.
///
/// Column widths are measured over every row before any line is built, on the
/// unstyled text. The path column is never padded.
pub fn format(rows: &[Row], color: bool) -> Vec<String> {
    let widths = column_widths(rows);

    rows.iter()
        .map(|row| {
            let mut line = String::new();
            for (cell, width) in row.cells.iter().zip(&widths) {
                let padded = format!("{:<width$}", cell.text, width = *width);
                match cell.tone {
                    Some(tone) if color => {
                        line.push_str(&style(padded).with(tone_color(tone)).to_string())
                    }
                    _ => line.push_str(&padded),
                }
                line.push_str(GUTTER);
            }
            line.push_str(&row.path);
            line
        })
        .collect()
}

fn column_widths(rows: &[Row]) -> Vec<usize> {
    let columns = rows.iter().map(|row| row.cells.len()).max().unwrap_or(0);
    (0..columns)
        .map(|i| {
            rows.iter()
                .filter_map(|row| row.cells.get(i))
                .map(|cell| cell.text.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect()
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Good => Color::Green,
        Tone::Info => Color::Blue,
        Tone::Warning => Color::Yellow,
        Tone::Alert => Color::Red,
    }
}
