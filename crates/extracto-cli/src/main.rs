mod commands;
mod output;

use clap::{Parser, Subcommand};
use extracto_core::extraction::pdftotext::DEFAULT_WORD_GAP;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "extracto",
    version,
    about = "Rebuild transaction tables from bank-statement PDFs"
)]
struct Cli {
    /// Log layout decisions (column positions, dropped pages) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the statement tables of a PDF (or a fragments JSON dump)
    Extract {
        /// Path to PDF, or to a fragments file ending in .json
        input_file: PathBuf,

        /// Layout config JSON overriding the default thresholds
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the extracted tables to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Largest gap, in points, between words joined into one text run (PDF input)
        #[arg(long, default_value_t = DEFAULT_WORD_GAP, value_name = "POINTS")]
        word_gap: f32,
    },
    /// Combine selected tables and columns into a CSV file
    Export {
        /// Path to PDF, or to a fragments file ending in .json
        input_file: PathBuf,

        /// Layout config JSON overriding the default thresholds
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Tables to include, numbered from 1 (default: all)
        #[arg(short, long, value_delimiter = ',', value_name = "N")]
        tables: Vec<usize>,

        /// Columns to include, e.g. "FECHA OPER.,SALDO CONTABLE" (default: all found)
        #[arg(long, value_delimiter = ',', value_name = "NAME")]
        columns: Vec<String>,

        /// Parse amounts as numbers and write dates as DD/MM
        #[arg(long)]
        auto_format: bool,

        /// Field delimiter (a single ASCII character)
        #[arg(short, long, default_value = ",", value_parser = parse_delimiter)]
        delimiter: u8,

        /// CSV file to write (default: input name with .csv)
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Largest gap, in points, between words joined into one text run (PDF input)
        #[arg(long, default_value_t = DEFAULT_WORD_GAP, value_name = "POINTS")]
        word_gap: f32,
    },
    /// Inspect and check layout configs
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the default layout config as JSON
    Show,
    /// Validate a layout config file
    Validate {
        /// Path to JSON config file
        file: PathBuf,
    },
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(format!("delimiter must be one ASCII character, got '{s}'")),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "extracto_core=info"
    } else {
        "extracto_core=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let result = match cli.command {
        Commands::Extract {
            input_file,
            config,
            output,
            out,
            word_gap,
        } => commands::extract::run(input_file, config, &output, out, word_gap),
        Commands::Export {
            input_file,
            config,
            tables,
            columns,
            auto_format,
            delimiter,
            out,
            word_gap,
        } => commands::export::run(commands::export::ExportArgs {
            input_file,
            config,
            tables,
            columns,
            auto_format,
            delimiter,
            out,
            word_gap,
        }),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(),
            ConfigAction::Validate { file } => commands::config::validate(&file),
        },
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
