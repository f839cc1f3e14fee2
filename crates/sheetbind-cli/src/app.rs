//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use sheetbind::{
    open_source, unmarshal_dynamic, BindReport, CellValue, DataSource, DynElement, Grid, Schema,
    Sheet,
};

use crate::layout::{Layout, Overrides};

/// Output format for bound records
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON array
    #[default]
    Json,
    /// One JSON object per line
    Ndjson,
}

#[derive(Parser)]
#[command(name = "sheetbind")]
#[command(author, version, about = "Bind spreadsheet rows to records", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bind the rows of a sheet using a layout file and print them as JSON
    Bind {
        /// Input workbook or CSV file
        input: PathBuf,

        /// Layout file (TOML)
        #[arg(short, long)]
        layout: PathBuf,

        /// Sheet name (defaults to the first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Zero-based header row (overrides the layout)
        #[arg(long)]
        header_row: Option<usize>,

        /// Keep rows with unconvertible cells, using zero values
        #[arg(long)]
        tolerant: bool,

        /// Tag key to read from the layout fields (overrides the layout)
        #[arg(long)]
        tag: Option<String>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Print the header schema of a sheet
    Headers {
        /// Input workbook or CSV file
        input: PathBuf,

        /// Sheet name (defaults to the first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Zero-based header row
        #[arg(long, default_value_t = 0)]
        header_row: usize,
    },

    /// List the sheets of a workbook
    Sheets {
        /// Input workbook or CSV file
        input: PathBuf,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Bind {
            input,
            layout,
            sheet,
            header_row,
            tolerant,
            tag,
            output,
            format,
        } => {
            let overrides = Overrides {
                header_row,
                tolerant,
                tag,
            };
            bind_command(
                &input,
                &layout,
                sheet.as_deref(),
                &overrides,
                output.as_deref(),
                format,
            )?;
        }
        Commands::Headers {
            input,
            sheet,
            header_row,
        } => {
            headers_command(&input, sheet.as_deref(), header_row)?;
        }
        Commands::Sheets { input } => {
            sheets_command(&input)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

/// Open `input` and load `sheet` (or the first sheet)
pub fn load_sheet(input: &Path, sheet: Option<&str>) -> Result<Grid<CellValue>> {
    // Check input file exists
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let source = open_source(input)
        .with_context(|| format!("Failed to open input: {}", input.display()))?;

    let sheet_name = match sheet {
        Some(s) => s.to_string(),
        None => source
            .default_sheet()
            .with_context(|| format!("No sheets in workbook: {}", input.display()))?,
    };

    source
        .load_sheet(&sheet_name)
        .with_context(|| format!("Failed to load sheet '{}' from {}", sheet_name, input.display()))
}

/// Bind a loaded sheet with a layout
pub fn bind_sheet(
    grid: &Grid<CellValue>,
    layout: &Layout,
    overrides: &Overrides,
) -> Result<(Vec<DynElement>, BindReport)> {
    let shape = layout.shape()?;
    let options = overrides.apply(layout.bind.clone());

    let mut records = Vec::new();
    let report = unmarshal_dynamic(&shape, &mut records, grid, &options)
        .with_context(|| format!("Failed to bind sheet '{}'", grid.name()))?;

    Ok((records, report))
}

/// Render bound records in the requested format
pub fn render_records(records: &[DynElement], format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(records)?;
            json.push('\n');
            json
        }
        OutputFormat::Ndjson => {
            let mut lines = String::new();
            for record in records {
                lines.push_str(&serde_json::to_string(record)?);
                lines.push('\n');
            }
            lines
        }
    };
    Ok(rendered)
}

/// Execute the bind command
pub fn bind_command(
    input: &Path,
    layout_path: &Path,
    sheet: Option<&str>,
    overrides: &Overrides,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let layout = Layout::load(layout_path)?;
    let grid = load_sheet(input, sheet)?;

    let (records, report) = bind_sheet(&grid, &layout, overrides)?;
    info!(
        sheet = grid.name(),
        appended = report.appended,
        dropped = report.dropped,
        substituted = report.substituted,
        "bound rows"
    );

    let rendered = render_records(&records, format)?;
    match output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            info!(path = %path.display(), "wrote records");
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Header names of a sheet with their column index, ordered by column
pub fn sheet_headers(grid: &Grid<CellValue>, header_row: usize) -> Result<Vec<(String, usize)>> {
    let header = grid.row(header_row).with_context(|| {
        format!(
            "Header row {} out of bounds (sheet '{}' has {} rows)",
            header_row,
            grid.name(),
            grid.len()
        )
    })?;
    let schema = Schema::from_header(header);
    Ok(schema
        .entries()
        .into_iter()
        .map(|(name, index)| (name.to_string(), index))
        .collect())
}

/// Execute the headers command
pub fn headers_command(input: &Path, sheet: Option<&str>, header_row: usize) -> Result<()> {
    let grid = load_sheet(input, sheet)?;

    for (name, index) in sheet_headers(&grid, header_row)? {
        println!("{}\t{}", index, name);
    }

    Ok(())
}

/// Execute the sheets command
pub fn sheets_command(input: &Path) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let source = open_source(input)
        .with_context(|| format!("Failed to open input: {}", input.display()))?;
    for name in source.list_sheets()? {
        println!("{}", name);
    }

    Ok(())
}
