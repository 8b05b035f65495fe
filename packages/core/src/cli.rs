//! Command-line interface for rendering deals without the HTTP service.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;

use crate::archive::build_zip;
use crate::assembler::DocumentAssembler;
use crate::config::{ARCHIVE_FILE_NAME, DEFAULT_OUTPUTS_DIR, DEFAULT_TEMPLATES_DIR};
use crate::error::Result;
use crate::types::{DealValues, DocumentKind};
use crate::workspace::{clear_output_dir, ClearOutcome};

/// Deal documents - fill Word templates with deal data.
#[derive(Parser)]
#[command(name = "dealdocs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render every template for the deal in a JSON values file.
    Render {
        /// JSON file with the deal values
        #[arg(short, long)]
        values: PathBuf,

        /// Template directory (default: templates/)
        #[arg(short, long)]
        templates: Option<PathBuf>,

        /// Output directory, cleared before rendering (default: outputs/)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Zip the documents of an output directory.
    Zip {
        /// Directory with rendered documents (default: outputs/)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Archive to write (default: documents.zip)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            values,
            templates,
            output,
        } => render_command(
            &values,
            templates.as_deref().unwrap_or(Path::new(DEFAULT_TEMPLATES_DIR)),
            output.as_deref().unwrap_or(Path::new(DEFAULT_OUTPUTS_DIR)),
        ),
        Commands::Zip { input, output } => zip_command(
            input.as_deref().unwrap_or(Path::new(DEFAULT_OUTPUTS_DIR)),
            output.as_deref().unwrap_or(Path::new(ARCHIVE_FILE_NAME)),
        ),
    }
}

/// Read deal values from a JSON file.
pub fn load_values(path: &Path) -> Result<DealValues> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn render_command(values_path: &Path, templates: &Path, output: &Path) -> Result<()> {
    let values = load_values(values_path)?;

    if clear_output_dir(output)? == ClearOutcome::Removed {
        tracing::info!(path = %output.display(), "removed previous output");
    }
    fs::create_dir_all(output)?;

    println!(
        "{} {} into {}",
        style("Rendering").bold(),
        style(&values.address).cyan(),
        style(output.display()).green()
    );

    let report = DocumentAssembler::new(templates).assemble(&values, output)?;

    for document in &report.documents {
        let label = match &document.kind {
            DocumentKind::Primary { .. } => style("primary").dim(),
            DocumentKind::Overflow { role, .. } => style(role.as_str()).yellow(),
        };
        println!("  {label} {}", document.path.display());
    }
    println!();
    println!(
        "{} {} documents",
        style("Done:").green().bold(),
        report.len()
    );

    Ok(())
}

fn zip_command(input: &Path, output: &Path) -> Result<()> {
    let bytes = build_zip(input)?;
    fs::write(output, &bytes)?;
    println!(
        "{} {} ({} bytes)",
        style("Saved to:").green().bold(),
        output.display(),
        bytes.len()
    );
    Ok(())
}
