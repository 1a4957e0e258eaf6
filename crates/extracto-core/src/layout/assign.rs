use std::sync::LazyLock;

use regex::Regex;

use crate::layout::columns::MasterLayout;
use crate::model::Fragment;
use crate::schema::CanonicalLabel;

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}-[0-9]{2}$").expect("date regex"));

static GAP_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").expect("gap regex"));

/// Strict `DD-DD` statement date, as printed in both date columns.
pub fn is_date_cell(text: &str) -> bool {
    DATE_PATTERN.is_match(text.trim())
}

/// Split fragments whose text holds two or more consecutive spaces.
///
/// Such fragments are several cells the text layer merged into one run. The
/// pieces get an estimated position of `char_width` units per character of
/// the preceding pieces, since their real geometry is unknown.
pub fn split_fragments(fragments: &[Fragment], char_width: f32) -> Vec<Fragment> {
    let mut out = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        if !fragment.text.contains("  ") {
            out.push(fragment.clone());
            continue;
        }

        let mut offset = 0.0;
        for part in GAP_PATTERN.split(&fragment.text) {
            let chars = part.chars().count() as f32;
            if !part.trim().is_empty() {
                out.push(Fragment {
                    text: part.to_string(),
                    x: fragment.x + offset,
                    y: fragment.y,
                    width: chars * char_width,
                    height: fragment.height,
                });
            }
            offset += chars * char_width;
        }
    }
    out
}

/// Append `text` to a cell with a single separating space.
pub(crate) fn push_text(cell: &mut String, text: &str) {
    let joined = format!("{cell} {text}");
    *cell = joined.trim().to_string();
}

/// Maps the fragments of a body row onto the columns of a [`MasterLayout`].
#[derive(Debug, Clone, Copy)]
pub struct RowAssigner<'a> {
    layout: &'a MasterLayout,
    description: Option<usize>,
}

impl<'a> RowAssigner<'a> {
    pub fn new(layout: &'a MasterLayout) -> Self {
        Self {
            layout,
            description: layout.index_of(CanonicalLabel::Descripcion),
        }
    }

    /// Column index for one fragment.
    ///
    /// `dates_seen` is the number of date fragments already placed in the row.
    pub fn slot(&self, fragment: &Fragment, dates_seen: usize) -> usize {
        let is_date = is_date_cell(&fragment.text);

        // The first and second dates of a row are the operation and value
        // dates, even when they straddle a boundary.
        if is_date {
            if dates_seen == 0 && self.is_date_column(0) {
                return 0;
            }
            if dates_seen == 1 && self.is_date_column(1) {
                return 1;
            }
        }

        let slot = self
            .layout
            .boundaries()
            .iter()
            .take_while(|boundary| fragment.x >= **boundary)
            .count();

        // Text under a date header that is not a date overflows from the description.
        if !is_date && slot < 2 {
            if let Some(description) = self.description {
                return description;
            }
        }

        slot.min(self.layout.len().saturating_sub(1))
    }

    /// Assign every fragment of a row and join the texts that share a column.
    pub fn map_row(&self, fragments: &[Fragment]) -> Vec<String> {
        let mut cells = vec![String::new(); self.layout.len()];
        if cells.is_empty() {
            return cells;
        }

        let mut dates_seen = 0;
        for fragment in fragments {
            let slot = self.slot(fragment, dates_seen);
            if is_date_cell(&fragment.text) {
                dates_seen += 1;
            }
            push_text(&mut cells[slot], &fragment.text);
        }
        cells
    }

    fn is_date_column(&self, index: usize) -> bool {
        self.layout.label(index).is_some_and(CanonicalLabel::is_date)
    }
}
