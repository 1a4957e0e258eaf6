pub mod combine;
pub mod config;
pub mod error;
pub mod export;
pub mod extraction;
pub mod layout;
pub mod model;
pub mod schema;
pub mod sheet;

use config::LayoutConfig;
use error::ExtractoError;
use extraction::FragmentSource;
use layout::assemble::assemble_page;
use layout::columns::MasterLayout;
use layout::rows::group_rows;
use model::{ExtractedTable, PageFragments, Row};
use tracing::debug;

/// Main API entry point: reconstruct the statement tables of a document.
///
/// Returns one table per page that yielded enough rows. When no master
/// column layout can be inferred the result is empty: a guessed layout would
/// put values under the wrong headers.
pub fn extract_tables(pages: &[PageFragments], config: &LayoutConfig) -> Vec<ExtractedTable> {
    let grouped: Vec<Vec<Row>> = pages
        .iter()
        .map(|p| group_rows(&p.fragments, config.row_tolerance))
        .collect();

    let Some(layout) = MasterLayout::build(&grouped, config) else {
        return Vec::new();
    };

    let tables: Vec<ExtractedTable> = pages
        .iter()
        .zip(&grouped)
        .filter_map(|(page, rows)| assemble_page(page.page_number, rows, &layout, config))
        .collect();

    debug!(pages = pages.len(), tables = tables.len(), "tables assembled");
    tables
}

/// Extract fragments with `source`, then reconstruct the tables.
pub fn extract_pdf(
    pdf_bytes: &[u8],
    source: &dyn FragmentSource,
    config: &LayoutConfig,
) -> Result<Vec<ExtractedTable>, ExtractoError> {
    let pages = source.extract_fragments(pdf_bytes)?;
    debug!(backend = source.backend_name(), pages = pages.len(), "fragments extracted");
    Ok(extract_tables(&pages, config))
}
