//! sheetkit CLI - compose declarative JSON payloads into xlsx workbooks

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sheetkit_compose::{
    C_FILE_NAME_FALLBACK, CellReference, EnumMemoryCell, EnumValueInferMode, MemoryDocument,
    SpecComposeOptions, SpecWorkbookInput, compose_document, compose_xlsx_file, format_cell_name,
    parse_workbook_input,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "sheetkit")]
#[command(author, version, about = "Compose xlsx workbooks from JSON descriptions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a JSON payload into an xlsx file
    Compose {
        /// Input JSON payload
        input: PathBuf,

        /// Output xlsx file (default: the payload's fileName)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Store table values as text instead of inferring numbers
        #[arg(long)]
        text_values: bool,

        /// Prefix for auto-named sheets
        #[arg(long, default_value = "Sheet")]
        sheet_prefix: String,

        /// Print composed cells instead of writing a file
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Compose {
            input,
            output,
            text_values,
            sheet_prefix,
            dry_run,
        } => {
            let options = SpecComposeOptions {
                sheet_name_prefix: sheet_prefix,
                value_infer_mode: if text_values {
                    EnumValueInferMode::Text
                } else {
                    EnumValueInferMode::Infer
                },
            };
            let workbook_input = load_input(&input)?;
            if dry_run {
                print_dry_run(&workbook_input, &options)
            } else {
                let path_out = output.unwrap_or_else(|| derive_output_path(&workbook_input));
                compose_to_file(&workbook_input, &path_out, &options)
            }
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_input(path: &Path) -> Result<SpecWorkbookInput> {
    let payload = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    parse_workbook_input(&payload)
        .with_context(|| format!("Failed to decode payload '{}'", path.display()))
}

/// Output path from the payload's `fileName`, kept inside the working directory.
fn derive_output_path(input: &SpecWorkbookInput) -> PathBuf {
    Path::new(&input.file_name)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(C_FILE_NAME_FALLBACK))
}

fn compose_to_file(
    input: &SpecWorkbookInput,
    path_out: &Path,
    options: &SpecComposeOptions,
) -> Result<()> {
    let report = compose_xlsx_file(input, path_out, options)
        .with_context(|| format!("Failed to compose '{}'", path_out.display()))?;

    for c_warning in &report.warnings {
        eprintln!("Warning: {c_warning}");
    }
    info!(output = %path_out.display(), "{report}");
    Ok(())
}

fn print_dry_run(input: &SpecWorkbookInput, options: &SpecComposeOptions) -> Result<()> {
    let (document, report) = compose_document(MemoryDocument::new(), input, options)
        .context("Failed to compose workbook")?;

    for sheet in document.sheets() {
        println!("[{}]", sheet.name);
        for (top_left, bottom_right) in &sheet.merges {
            println!("  merge {}:{}", format_cell_name(*top_left), format_cell_name(*bottom_right));
        }
        for ((n_row, n_col), cell) in &sheet.cells {
            let c_kind = match cell {
                EnumMemoryCell::RichText(_) => "rich",
                EnumMemoryCell::Value(_) => "value",
            };
            println!(
                "  {} {c_kind} {:?}",
                format_cell_name(CellReference::new(*n_col, *n_row)),
                cell.text()
            );
        }
    }
    println!("{report}");
    Ok(())
}
