use std::io::IsTerminal;

use anyhow::Result;
use api_client::utils::TagPalette;
use colored::{Color, Colorize};
use serde::Serialize;

/// Colours for the ten tag slots
const TAG_COLOURS: [Color; 10] = [
    Color::Red,
    Color::Blue,
    Color::Green,
    Color::BrightCyan,
    Color::Magenta,
    Color::BrightMagenta,
    Color::BrightBlue,
    Color::Cyan,
    Color::Yellow,
    Color::BrightYellow,
];

/// One table cell. Column widths are taken from the plain text; the styled
/// form, when present, is what gets printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    plain: String,
    styled: Option<String>,
}

impl Cell {
    fn width(&self) -> usize {
        self.plain.chars().count()
    }

    fn render(&self, width: usize) -> String {
        let fill = width.saturating_sub(self.width());
        let text = self.styled.as_deref().unwrap_or(&self.plain);
        format!("{}{}", text, " ".repeat(fill))
    }
}

impl From<String> for Cell {
    fn from(plain: String) -> Self {
        Self {
            plain,
            styled: None,
        }
    }
}

/// Renders command results as tables or JSON
pub struct Output {
    json: bool,
    colour: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            colour: std::io::stdout().is_terminal(),
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print rows with every column padded to its widest cell
    pub fn table<C: Into<Cell>>(&self, headers: &[&str], rows: Vec<Vec<C>>) {
        if rows.is_empty() {
            println!("(none)");
            return;
        }

        let rows: Vec<Vec<Cell>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();

        let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(cell.width());
                }
            }
        }

        let header: Vec<String> = headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{:<w$}", h, w = *w))
            .collect();
        println!("{}", header.join("  ").trim_end());

        for row in &rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, w)| cell.render(*w))
                .collect();
            println!("{}", cells.join("  ").trim_end());
        }
    }

    /// Tags joined by commas, each in the colour of its palette slot
    pub fn tags(&self, palette: &mut TagPalette, tags: &[String]) -> Cell {
        let plain = tags.join(", ");
        let slots: Vec<usize> = tags.iter().map(|tag| palette.slot(tag)).collect();

        if !self.colour || tags.is_empty() {
            return Cell::from(plain);
        }

        let styled = tags
            .iter()
            .zip(slots)
            .map(|(tag, slot)| tag.color(TAG_COLOURS[slot % TAG_COLOURS.len()]).to_string())
            .collect::<Vec<_>>()
            .join(", ");

        Cell {
            plain,
            styled: Some(styled),
        }
    }
}
