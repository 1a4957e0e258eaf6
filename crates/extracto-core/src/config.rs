use crate::error::ExtractoError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable thresholds of the layout engine.
///
/// The defaults were tuned on real statements; distances are in layout units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Max y distance between consecutive fragments of one row.
    pub row_tolerance: f32,
    /// Rows per page inspected when looking for header rows.
    pub header_scan_rows: usize,
    /// Signature keywords a header row must contain.
    pub header_min_signatures: usize,
    /// Fragments a header row must have.
    pub header_min_fragments: usize,
    /// Max center distance between a header fragment and its wrapped second line.
    pub header_wrap_radius: f32,
    /// Second-line observations closer than this to a recorded one are ignored.
    pub header_dedup_radius: f32,
    /// Cap on the boundary that follows a date column.
    pub date_column_width: f32,
    /// Estimated width of one character when a merged fragment is split.
    pub split_char_width: f32,
    /// Below this many resolved columns the document has no usable layout.
    pub min_master_columns: usize,
    /// A page table is kept only with at least this many data rows.
    pub min_data_rows: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            row_tolerance: 6.0,
            header_scan_rows: 30,
            header_min_signatures: 3,
            header_min_fragments: 5,
            header_wrap_radius: 35.0,
            header_dedup_radius: 20.0,
            date_column_width: 48.0,
            split_char_width: 6.0,
            min_master_columns: 5,
            min_data_rows: 2,
        }
    }
}

/// Load a layout config from a JSON file.
pub fn load_config(path: &Path) -> Result<LayoutConfig, ExtractoError> {
    let content = std::fs::read_to_string(path).map_err(|e| ExtractoError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: LayoutConfig =
        serde_json::from_str(&content).map_err(|e| ExtractoError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a layout config from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<LayoutConfig, ExtractoError> {
    let config: LayoutConfig = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that a config is usable.
pub fn validate_config(config: &LayoutConfig) -> Result<(), ExtractoError> {
    let distances = [
        ("row_tolerance", config.row_tolerance),
        ("header_wrap_radius", config.header_wrap_radius),
        ("header_dedup_radius", config.header_dedup_radius),
        ("date_column_width", config.date_column_width),
        ("split_char_width", config.split_char_width),
    ];
    for (name, value) in distances {
        if !value.is_finite() || value < 0.0 {
            return Err(ExtractoError::ConfigInvalid(format!(
                "{name} must be a finite, non-negative distance (got {value})"
            )));
        }
    }

    if config.min_master_columns == 0 || config.min_master_columns > 9 {
        return Err(ExtractoError::ConfigInvalid(format!(
            "min_master_columns must be between 1 and 9 (got {})",
            config.min_master_columns
        )));
    }

    if config.header_min_signatures > 5 {
        return Err(ExtractoError::ConfigInvalid(format!(
            "header_min_signatures cannot exceed the 5 signature keywords (got {})",
            config.header_min_signatures
        )));
    }

    if config.header_scan_rows == 0 {
        return Err(ExtractoError::ConfigInvalid(
            "header_scan_rows must be at least 1".into(),
        ));
    }

    Ok(())
}
