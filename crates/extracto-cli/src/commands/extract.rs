use std::path::PathBuf;
use std::process::ExitCode;

use extracto_core::error::ExtractoError;

use crate::commands::{layout_config, no_tables, read_tables};
use crate::output;

pub fn run(
    input_file: PathBuf,
    config_file: Option<PathBuf>,
    output_format: &str,
    output_file: Option<PathBuf>,
    word_gap: f32,
) -> Result<ExitCode, ExtractoError> {
    let config = layout_config(config_file.as_deref())?;
    let tables = read_tables(&input_file, &config, word_gap)?;

    if tables.is_empty() {
        return Ok(no_tables());
    }

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = serde_json::to_string_pretty(&tables)?;
            std::fs::write(&path, json)?;
            let rows: usize = tables.iter().map(|t| t.data_rows().len()).sum();
            eprintln!(
                "Extracted {} table(s), {} row(s), written to {}",
                tables.len(),
                rows,
                path.display()
            );
        }
        None => match output_format {
            "json" => output::json::print(&tables)?,
            _ => output::table::print(&tables),
        },
    }

    Ok(ExitCode::SUCCESS)
}
