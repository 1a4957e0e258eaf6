use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::config::LayoutConfig;
use crate::layout::assign::{is_date_cell, push_text, split_fragments, RowAssigner};
use crate::layout::columns::MasterLayout;
use crate::layout::header::is_header_row;
use crate::model::{ExtractedTable, Fragment, Row};
use crate::schema::{normalize_label, CanonicalLabel};

/// Lines of the closing boilerplate; nothing below them is a transaction.
pub const FOOTER_MARKERS: [&str; 4] = [
    "codigo cuenta interbancaria",
    "saldo a nuestro favor",
    "rogamos verifique la informacion",
    "totales por itf",
];

/// Page numbering and statement title lines repeated on every page.
const NOISE_MARKERS: [&str; 2] = ["pagina", "estado de cuenta"];

/// Prefix of the opening balance line ("saldo anterior", "saldo ant.").
const OPENING_BALANCE_MARKER: &str = "saldo ant";

static BALANCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9,.]+$").expect("balance regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    SeekingHeader,
    InBody,
    Stopped,
}

/// What a row seen after the header turns out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Footer,
    RepeatedHeader,
    /// Second line of a header wrapped over two physical lines.
    HeaderContinuation,
    /// Page numbers, statement title, stray single fragments.
    Noise,
    OpeningBalance,
    Transaction,
}

/// Builds the table of one page, row by row.
pub struct PageAssembler<'a> {
    page: usize,
    layout: &'a MasterLayout,
    assigner: RowAssigner<'a>,
    config: &'a LayoutConfig,
    state: AssemblerState,
    just_entered_body: bool,
    rows: Vec<Vec<String>>,
}

impl<'a> PageAssembler<'a> {
    pub fn new(page: usize, layout: &'a MasterLayout, config: &'a LayoutConfig) -> Self {
        Self {
            page,
            layout,
            assigner: RowAssigner::new(layout),
            config,
            state: AssemblerState::SeekingHeader,
            just_entered_body: false,
            rows: vec![layout.header_row()],
        }
    }

    pub fn state(&self) -> AssemblerState {
        self.state
    }

    pub fn feed(&mut self, row: &Row) {
        match self.state {
            AssemblerState::SeekingHeader => {
                if is_header_row(row, self.config) {
                    self.state = AssemblerState::InBody;
                    self.just_entered_body = true;
                }
            }
            AssemblerState::InBody => self.feed_body(row),
            AssemblerState::Stopped => {}
        }
    }

    fn feed_body(&mut self, row: &Row) {
        let first_body_row = std::mem::take(&mut self.just_entered_body);
        let items = split_fragments(&row.fragments, self.config.split_char_width);

        match classify_body_row(row, &items, first_body_row, self.config) {
            RowKind::Footer => {
                debug!(page = self.page, y = row.y, "footer reached, page stopped");
                self.state = AssemblerState::Stopped;
            }
            // A repeated header can wrap onto a second line too.
            RowKind::RepeatedHeader => self.just_entered_body = true,
            RowKind::HeaderContinuation | RowKind::Noise => {}
            RowKind::OpeningBalance => {
                let cells = self.opening_balance_row(&items);
                self.rows.push(cells);
            }
            RowKind::Transaction => {
                let cells = self.assigner.map_row(&items);
                if cells.iter().all(String::is_empty) {
                    return;
                }
                if self.is_dated(&cells) || self.rows.len() == 1 {
                    self.rows.push(cells);
                } else {
                    self.merge_continuation(&cells);
                }
            }
        }
    }

    /// Amount-looking fragments go to the balance, the rest to the description.
    fn opening_balance_row(&self, items: &[Fragment]) -> Vec<String> {
        let mut cells = vec![String::new(); self.layout.len()];
        let balance = self.layout.index_of(CanonicalLabel::SaldoContable);
        let description = self.layout.index_of(CanonicalLabel::Descripcion);

        for item in items {
            let text = item.text.trim();
            let is_amount = BALANCE_PATTERN.is_match(text) && text.contains('.');
            match (is_amount, balance, description) {
                (true, Some(b), _) => cells[b] = text.to_string(),
                (_, _, Some(d)) => push_text(&mut cells[d], text),
                _ => {}
            }
        }
        cells
    }

    fn is_dated(&self, cells: &[String]) -> bool {
        [CanonicalLabel::FechaOper, CanonicalLabel::FechaValor]
            .into_iter()
            .filter_map(|label| self.layout.index_of(label))
            .any(|i| is_date_cell(&cells[i]))
    }

    /// An undated row continues the description of the previous operation.
    fn merge_continuation(&mut self, cells: &[String]) {
        let Some(description) = self.layout.index_of(CanonicalLabel::Descripcion) else {
            return;
        };
        let text = cells
            .iter()
            .filter(|c| !c.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if let Some(previous) = self.rows.last_mut() {
            let cell = &mut previous[description];
            if cell.is_empty() {
                *cell = text.to_string();
            } else {
                cell.push(' ');
                cell.push_str(text);
            }
        }
    }

    /// The page table, if it holds enough data rows.
    pub fn finish(self) -> Option<ExtractedTable> {
        let data_rows = self.rows.len() - 1;
        if data_rows < self.config.min_data_rows {
            debug!(page = self.page, data_rows, "page table too short, dropped");
            return None;
        }
        Some(ExtractedTable {
            page: self.page,
            rows: self.rows,
        })
    }
}

/// Decide how a body row is handled. Checks run in priority order.
pub fn classify_body_row(
    row: &Row,
    items: &[Fragment],
    first_body_row: bool,
    config: &LayoutConfig,
) -> RowKind {
    let texts: Vec<String> = items
        .iter()
        .map(|f| fold_accents(&f.text.to_lowercase()))
        .collect();
    let mentions = |needle: &str| texts.iter().any(|t| t.contains(needle));

    if FOOTER_MARKERS.iter().any(|m| mentions(m)) {
        return RowKind::Footer;
    }
    if is_header_row(row, config) {
        return RowKind::RepeatedHeader;
    }
    if first_body_row && is_header_vocabulary(items) {
        return RowKind::HeaderContinuation;
    }
    if NOISE_MARKERS.iter().any(|m| mentions(m)) {
        return RowKind::Noise;
    }
    // A lone balance figure is still a legitimate row.
    if items.len() < 2 && !mentions("saldo") {
        return RowKind::Noise;
    }
    if mentions(OPENING_BALANCE_MARKER) {
        return RowKind::OpeningBalance;
    }
    RowKind::Transaction
}

fn is_header_vocabulary(items: &[Fragment]) -> bool {
    !items.is_empty()
        && items
            .iter()
            .all(|f| !is_date_cell(&f.text) && normalize_label(&f.text).canonical().is_some())
}

/// Strip diacritics, whether the text layer emitted them precomposed or as combining marks.
fn fold_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Run one page through the assembler until its rows or its footer end it.
pub fn assemble_page(
    page: usize,
    rows: &[Row],
    layout: &MasterLayout,
    config: &LayoutConfig,
) -> Option<ExtractedTable> {
    let mut assembler = PageAssembler::new(page, layout, config);
    for row in rows {
        assembler.feed(row);
        if assembler.state() == AssemblerState::Stopped {
            break;
        }
    }
    assembler.finish()
}
