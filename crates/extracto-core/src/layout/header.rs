use crate::config::LayoutConfig;
use crate::model::Row;

/// Keywords that statement column headers contain, lower-cased.
pub const HEADER_SIGNATURES: [&str; 5] = ["fecha", "descr", "saldo", "cargo", "oficina"];

/// Detect if a row looks like the statement's column header row.
pub fn is_header_row(row: &Row, config: &LayoutConfig) -> bool {
    let texts = row.lowercase_texts();
    let matches = HEADER_SIGNATURES
        .iter()
        .filter(|sig| texts.iter().any(|t| t.contains(*sig)))
        .count();
    matches >= config.header_min_signatures && row.len() >= config.header_min_fragments
}
