use std::path::PathBuf;
use std::process::ExitCode;

use extracto_core::combine::{available_headers, combine_tables, parse_columns};
use extracto_core::error::ExtractoError;
use extracto_core::export::{export_file_name, write_csv};

use crate::commands::{layout_config, no_tables, read_tables};

pub struct ExportArgs {
    pub input_file: PathBuf,
    pub config: Option<PathBuf>,
    /// 1-based table numbers; empty selects every table.
    pub tables: Vec<usize>,
    pub columns: Vec<String>,
    pub auto_format: bool,
    pub delimiter: u8,
    pub out: Option<PathBuf>,
    pub word_gap: f32,
}

pub fn run(args: ExportArgs) -> Result<ExitCode, ExtractoError> {
    let config = layout_config(args.config.as_deref())?;
    let tables = read_tables(&args.input_file, &config, args.word_gap)?;

    if tables.is_empty() {
        return Ok(no_tables());
    }

    let selected: Vec<usize> = if args.tables.is_empty() {
        (0..tables.len()).collect()
    } else {
        args.tables
            .iter()
            .map(|n| {
                n.checked_sub(1).ok_or_else(|| {
                    ExtractoError::TableSelection("tables are numbered from 1".into())
                })
            })
            .collect::<Result<_, _>>()?
    };

    let columns = if args.columns.is_empty() {
        available_headers(&tables, &selected)
    } else {
        parse_columns(&args.columns)?
    };

    let mut sheet = combine_tables(&tables, &selected, &columns)?;
    if args.auto_format {
        sheet = sheet.auto_format();
    }

    let path = args
        .out
        .unwrap_or_else(|| export_file_name(&args.input_file));
    write_csv(&path, &sheet, args.delimiter)?;
    eprintln!(
        "Wrote {} row(s) x {} column(s) to {}",
        sheet.rows.len(),
        sheet.headers.len(),
        path.display()
    );

    Ok(ExitCode::SUCCESS)
}
