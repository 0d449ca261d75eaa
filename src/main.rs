//! # Invoice Forme CLI
//!
//! Usage:
//!   invoice-forme invoice.toml
//!   invoice-forme invoice.toml -o out.pdf
//!   invoice-forme --example > invoice.toml

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use invoice_forme::model::{default_output_path, load_table};
use invoice_forme::{render_to_path, InvoiceError, EXAMPLE_INVOICE};

/// Generate a PDF invoice from a TOML file.
#[derive(Parser, Debug)]
#[command(name = "invoice-forme", version, about)]
struct Cli {
    /// Path to the input TOML invoice
    input: Option<PathBuf>,

    /// Output PDF path. Defaults to Invoice-<ClientName>-<IssueDate>.pdf
    /// in the current directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print a sample invoice TOML to stdout and exit
    #[arg(long)]
    example: bool,

    /// Print the computed layout and totals as JSON after rendering
    #[arg(long)]
    dump_layout: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    init_tracing();

    if cli.example {
        print!("{}", EXAMPLE_INVOICE);
        return ExitCode::SUCCESS;
    }

    let Some(input) = cli.input.as_deref() else {
        eprintln!("{}", Cli::command().render_help());
        return ExitCode::FAILURE;
    };

    match run(input, cli.output, cli.dump_layout) {
        Ok(path) => {
            println!("Successfully generated invoice at: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(
    input: &std::path::Path,
    output: Option<PathBuf>,
    dump_layout: bool,
) -> Result<PathBuf, InvoiceError> {
    let table = load_table(input)?;
    let output = output.unwrap_or_else(|| default_output_path(&table));
    debug!(input = %input.display(), output = %output.display(), "rendering");

    let outcome = render_to_path(&table, &output)?;

    if dump_layout {
        let json = serde_json::to_string_pretty(&outcome)
            .map_err(|e| InvoiceError::Render(format!("could not serialize layout: {}", e)))?;
        println!("{}", json);
    }
    Ok(output)
}
