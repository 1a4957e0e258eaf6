use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::LayoutConfig;
use crate::layout::header::is_header_row;
use crate::model::Row;
use crate::schema::{normalize_label, CanonicalLabel};

/// Representative horizontal position of one schema column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MasterColumn {
    pub label: CanonicalLabel,
    pub x: f32,
}

/// x positions of header fragments, collected per canonical label.
///
/// One accumulator covers a whole document; second-line de-duplication looks
/// at everything recorded so far, on any page.
#[derive(Debug, Clone, Default)]
pub struct HeaderObservations {
    xs: BTreeMap<CanonicalLabel, Vec<f32>>,
}

impl HeaderObservations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan the first rows of a page for header rows and record their columns.
    pub fn observe_page(&mut self, rows: &[Row], config: &LayoutConfig) {
        for (i, row) in rows.iter().enumerate().take(config.header_scan_rows) {
            if !is_header_row(row, config) {
                continue;
            }
            let next = rows.get(i + 1).map(|r| r.fragments.as_slice()).unwrap_or(&[]);

            for fragment in &row.fragments {
                let center = fragment.center_x();
                // A fragment right below the header center is its wrapped second line.
                let wrapped = next
                    .iter()
                    .find(|n| (n.center_x() - center).abs() < config.header_wrap_radius);
                let text = match wrapped {
                    Some(second) => format!("{} {}", fragment.text, second.text),
                    None => fragment.text.clone(),
                };
                if let Some(label) = normalize_label(&text).canonical() {
                    self.record(label, fragment.x);
                }
            }

            for fragment in next {
                if let Some(label) = normalize_label(&fragment.text).canonical() {
                    if !self.has_near(label, fragment.x, config.header_dedup_radius) {
                        self.record(label, fragment.x);
                    }
                }
            }
        }
    }

    pub fn record(&mut self, label: CanonicalLabel, x: f32) {
        self.xs.entry(label).or_default().push(x);
    }

    pub fn observations(&self, label: CanonicalLabel) -> &[f32] {
        self.xs.get(&label).map(Vec::as_slice).unwrap_or(&[])
    }

    fn has_near(&self, label: CanonicalLabel, x: f32, radius: f32) -> bool {
        self.observations(label)
            .iter()
            .any(|seen| (seen - x).abs() < radius)
    }

    /// One column per observed label at the median of its observations,
    /// in schema order (not yet sorted by position).
    fn median_columns(&self) -> Vec<MasterColumn> {
        CanonicalLabel::ALL
            .into_iter()
            .filter_map(|label| {
                let mut xs = self.xs.get(&label)?.clone();
                median(&mut xs).map(|x| MasterColumn { label, x })
            })
            .collect()
    }
}

/// Upper median: the middle element, or the upper of the two middle ones.
fn median(xs: &mut [f32]) -> Option<f32> {
    if xs.is_empty() {
        return None;
    }
    xs.sort_by(f32::total_cmp);
    Some(xs[xs.len() / 2])
}

/// Column order and slot boundaries shared by every page of a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasterLayout {
    columns: Vec<MasterColumn>,
    boundaries: Vec<f32>,
}

impl MasterLayout {
    /// Build the layout of a whole document from its grouped rows, one entry per page.
    ///
    /// Returns `None` when too few columns could be resolved.
    pub fn build(pages: &[Vec<Row>], config: &LayoutConfig) -> Option<MasterLayout> {
        let mut observations = HeaderObservations::new();
        for rows in pages {
            observations.observe_page(rows, config);
        }
        MasterLayout::from_observations(&observations, config)
    }

    pub fn from_observations(
        observations: &HeaderObservations,
        config: &LayoutConfig,
    ) -> Option<MasterLayout> {
        MasterLayout::from_columns(observations.median_columns(), config)
    }

    /// Order columns by position, repair a duplicated operation date and
    /// compute slot boundaries.
    pub fn from_columns(
        mut columns: Vec<MasterColumn>,
        config: &LayoutConfig,
    ) -> Option<MasterLayout> {
        columns.sort_by(|a, b| a.x.total_cmp(&b.x));
        relabel_second_operation_date(&mut columns);

        if columns.len() < config.min_master_columns {
            warn!(
                resolved = columns.len(),
                required = config.min_master_columns,
                "no reliable table layout detected"
            );
            return None;
        }

        let boundaries = columns
            .windows(2)
            .map(|pair| {
                let (left, right) = (pair[0], pair[1]);
                let mid = (left.x + right.x) / 2.0;
                if left.label.is_date() {
                    mid.min(left.x + config.date_column_width)
                } else {
                    mid
                }
            })
            .collect::<Vec<_>>();

        let summary = columns
            .iter()
            .map(|c| format!("{}@{:.1}", c.label, c.x))
            .collect::<Vec<_>>()
            .join(", ");
        info!(columns = %summary, "master layout resolved");
        debug!(?boundaries, "column boundaries");

        Some(MasterLayout {
            columns,
            boundaries,
        })
    }

    pub fn columns(&self) -> &[MasterColumn] {
        &self.columns
    }

    pub fn boundaries(&self) -> &[f32] {
        &self.boundaries
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn label(&self, index: usize) -> Option<CanonicalLabel> {
        self.columns.get(index).map(|c| c.label)
    }

    pub fn index_of(&self, label: CanonicalLabel) -> Option<usize> {
        self.columns.iter().position(|c| c.label == label)
    }

    /// Header row of every table built with this layout.
    pub fn header_row(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.label.as_str().to_string())
            .collect()
    }
}

/// Both date headers can fall back to `FECHA OPER.`; the second one is the value date.
fn relabel_second_operation_date(columns: &mut [MasterColumn]) {
    let mut seen = 0;
    for column in columns.iter_mut() {
        if column.label == CanonicalLabel::FechaOper {
            seen += 1;
            if seen == 2 {
                column.label = CanonicalLabel::FechaValor;
            }
        }
    }
}
