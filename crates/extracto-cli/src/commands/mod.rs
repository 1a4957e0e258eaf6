pub mod config;
pub mod export;
pub mod extract;

use std::path::Path;
use std::process::ExitCode;

use extracto_core::config::{load_config, LayoutConfig};
use extracto_core::error::ExtractoError;
use extracto_core::extraction::fragments_json::JsonFragmentSource;
use extracto_core::extraction::pdftotext::PdftotextSource;
use extracto_core::extraction::FragmentSource;
use extracto_core::model::ExtractedTable;

/// Exit code when the document has no recognizable statement table.
pub const NO_TABLES: u8 = 2;

pub fn layout_config(path: Option<&Path>) -> Result<LayoutConfig, ExtractoError> {
    match path {
        Some(p) => load_config(p),
        None => Ok(LayoutConfig::default()),
    }
}

/// Read `input` with the backend its extension calls for and extract its tables.
///
/// `word_gap` only applies to PDFs; fragment dumps are already joined.
pub fn read_tables(
    input: &Path,
    config: &LayoutConfig,
    word_gap: f32,
) -> Result<Vec<ExtractedTable>, ExtractoError> {
    let bytes = std::fs::read(input)?;
    let is_json = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let source: Box<dyn FragmentSource> = if is_json {
        Box::new(JsonFragmentSource)
    } else {
        Box::new(PdftotextSource::with_word_gap(word_gap))
    };
    extracto_core::extract_pdf(&bytes, source.as_ref(), config)
}

pub fn no_tables() -> ExitCode {
    eprintln!("no reliable table structure found");
    ExitCode::from(NO_TABLES)
}
