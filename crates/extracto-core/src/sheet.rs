use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ExtractoError;
use crate::layout::assign::is_date_cell;
use crate::schema::CanonicalLabel;

/// One cell of a reviewed sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(Decimal),
    Text(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Text(t) if t.trim().is_empty())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(d) => write!(f, "{}", d),
            Cell::Text(t) => f.write_str(t),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<Decimal> for Cell {
    fn from(d: Decimal) -> Self {
        Cell::Number(d)
    }
}

/// An immutable grid of combined statement rows.
///
/// Edits return a new sheet and leave the original untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }

    /// Copy of the sheet with one data cell replaced.
    pub fn with_cell(
        &self,
        row: usize,
        column: usize,
        value: impl Into<Cell>,
    ) -> Result<Sheet, ExtractoError> {
        if row >= self.rows.len() || column >= self.headers.len() {
            return Err(ExtractoError::CellOutOfRange { row, column });
        }
        let mut next = self.clone();
        // Rows built outside combine may be ragged.
        if next.rows[row].len() <= column {
            next.rows[row].resize(column + 1, Cell::Text(String::new()));
        }
        next.rows[row][column] = value.into();
        Ok(next)
    }

    /// Copy of the sheet with amounts parsed as numbers and dates reformatted.
    ///
    /// Amount cells drop thousands separators and whitespace before parsing;
    /// empty cells and `-` stay text, as does anything that fails to parse.
    /// `DD-DD` dates become `DD/DD`. Every other text cell is trimmed.
    pub fn auto_format(&self) -> Sheet {
        let kinds: Vec<ColumnKind> = self.headers.iter().map(|h| ColumnKind::of(h)).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(i, cell)| format_cell(cell, kinds.get(i).copied()))
                    .collect()
            })
            .collect();
        Sheet {
            headers: self.headers.clone(),
            rows,
        }
    }

    /// Header row followed by every data row, as display strings.
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        std::iter::once(self.headers.clone())
            .chain(
                self.rows
                    .iter()
                    .map(|row| row.iter().map(Cell::to_string).collect()),
            )
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnKind {
    Amount,
    Date,
    Other,
}

impl ColumnKind {
    fn of(header: &str) -> ColumnKind {
        match CanonicalLabel::from_canonical(header) {
            Some(label) if label.is_amount() => ColumnKind::Amount,
            Some(label) if label.is_date() => ColumnKind::Date,
            _ => ColumnKind::Other,
        }
    }
}

fn format_cell(cell: &Cell, kind: Option<ColumnKind>) -> Cell {
    let Cell::Text(text) = cell else {
        return cell.clone();
    };
    let text = text.trim();
    match kind {
        Some(ColumnKind::Amount) => {
            let compact: String = text
                .chars()
                .filter(|c| *c != ',' && !c.is_whitespace())
                .collect();
            if compact.is_empty() || compact == "-" {
                return Cell::Text(text.to_string());
            }
            match Decimal::from_str(&compact) {
                Ok(d) => Cell::Number(d),
                Err(_) => Cell::Text(text.to_string()),
            }
        }
        Some(ColumnKind::Date) => Cell::Text(reformat_date(text)),
        _ => Cell::Text(text.to_string()),
    }
}

fn reformat_date(text: &str) -> String {
    if is_date_cell(text) {
        text.replacen('-', "/", 1)
    } else {
        text.to_string()
    }
}
