mod output;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use viewlineage_catalog::{CatalogAdapter, CatalogSnapshot, InMemoryCatalog};
use viewlineage_core::{ColumnFilter, Config, Diagnostic, LineageReport, OutputFormat, Strictness, ViewFilter};
use viewlineage_engine::{resolve, run, LineageOptions};
use viewlineage_xml::{parse_with_options, NodeTable, ParseOptions};

/// Environment variable overriding the configured catalog snapshot
const CATALOG_ENV: &str = "VIEWLINEAGE_CATALOG";

/// ViewLineage - Column lineage for analytic, attribute and calculation views
#[derive(Parser)]
#[command(name = "viewlineage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: viewlineage.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// View selection shared by `lineage` and `views`
#[derive(Args, Debug, Clone)]
struct ViewSelection {
    /// Package pattern (`*`/`%` any run, `?` one character)
    #[arg(short, long, default_value = "*")]
    package: String,

    /// Object name pattern
    #[arg(short, long, default_value = "*")]
    object: String,

    /// Object suffix pattern
    #[arg(short, long, default_value = "*")]
    suffix: String,

    /// Also analyze views one dependency hop away
    #[arg(short, long)]
    recursive: bool,
}

impl ViewSelection {
    fn filter(&self) -> ViewFilter {
        ViewFilter::new(self.package.as_str(), self.object.as_str(), self.suffix.as_str())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract base column lineage for matching views
    Lineage {
        #[command(flatten)]
        selection: ViewSelection,

        /// Keep only columns in schemas matching this pattern
        #[arg(long, default_value = "*")]
        schema: String,

        /// Keep only columns in tables matching this pattern
        #[arg(long, default_value = "*")]
        table: String,

        /// Keep only columns matching this pattern
        #[arg(long, default_value = "*")]
        column: String,

        /// Output format (table, json, markdown)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Write output to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Abort on the first view that fails to parse
        #[arg(long)]
        strict: bool,
    },

    /// List the views a lineage run would analyze
    Views {
        #[command(flatten)]
        selection: ViewSelection,
    },

    /// Parse a view definition file and dump its node table
    Parse {
        /// XML file to parse
        file: PathBuf,

        /// Keep whitespace-only text nodes
        #[arg(long)]
        keep_whitespace: bool,

        /// Print nodes as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    init_tracing(cli.verbose);

    // Load config if specified
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new("viewlineage.toml").exists() {
        Config::from_file(Path::new("viewlineage.toml"))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    match cli.command {
        Commands::Lineage {
            selection,
            schema,
            table,
            column,
            format,
            output,
            strict,
        } => {
            let columns = ColumnFilter::new(schema, table, column);
            let format = format.unwrap_or(config.output.format);
            lineage_command(&config, &selection, &columns, format, output.as_deref(), strict, cli.verbose).await
        }
        Commands::Views { selection } => views_command(&config, &selection, cli.verbose).await,
        Commands::Parse {
            file,
            keep_whitespace,
            json,
        } => parse_command(&config, &file, keep_whitespace, json),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Catalog snapshot path: environment override first, then config
fn catalog_path(config: &Config) -> Option<PathBuf> {
    std::env::var_os(CATALOG_ENV)
        .map(PathBuf::from)
        .or_else(|| config.snapshot_path())
}

async fn load_catalog(config: &Config, verbose: bool) -> Result<InMemoryCatalog> {
    let path = catalog_path(config).ok_or_else(|| {
        anyhow::anyhow!(
            "No catalog configured. Set [catalog] snapshot in viewlineage.toml or {}.",
            CATALOG_ENV
        )
    })?;

    if verbose {
        eprintln!("{} {}", "Loading catalog from:".cyan(), path.display());
    }

    let catalog = match CatalogSnapshot::from_file(&path) {
        Ok(snapshot) => snapshot.into_catalog(),
        Err(e) => abort(&e.to_diagnostic()),
    };
    if let Err(e) = catalog.test_connection().await {
        abort(&e.to_diagnostic());
    }

    if verbose {
        eprintln!("{} {} objects", "Loaded".cyan(), catalog.view_count().await);
    }

    Ok(catalog)
}

/// Lineage command - resolve views, extract and aggregate base columns
async fn lineage_command(
    config: &Config,
    selection: &ViewSelection,
    columns: &ColumnFilter,
    format: OutputFormat,
    output: Option<&Path>,
    strict: bool,
    verbose: bool,
) -> Result<()> {
    let catalog = load_catalog(config, verbose).await?;

    let mut options = LineageOptions::from(&config.extraction);
    options.recursive |= selection.recursive;
    if strict {
        options.strictness = Strictness::Strict;
    }

    if verbose {
        eprintln!(
            "{} {} ({}, {:?})",
            "Extracting lineage for".cyan(),
            selection.filter(),
            if options.recursive { "one hop" } else { "top-level only" },
            options.strictness
        );
    }

    let result = match run(&catalog, &selection.filter(), &options).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "Lineage run aborted");
            abort(&e.to_diagnostic());
        }
    };

    let failed = result.has_failures();
    let report = result.into_report(columns);

    match (format, output) {
        (OutputFormat::Json, Some(path)) => report
            .save_to_file(path)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        (format, path) => {
            let rendered = match format {
                OutputFormat::Table => output::render_table(&report.rows),
                OutputFormat::Json => report.to_json()?,
                OutputFormat::Markdown => output::render_markdown(&report),
            };
            match path {
                Some(path) => std::fs::write(path, &rendered)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => print!("{}", rendered),
            }
        }
    }

    if let (Some(path), true) = (output, verbose) {
        eprintln!("{} {}", "Output saved to:".green(), path.display());
    }

    print_run_summary(&report);

    // Exit with error code if any view failed
    if failed {
        std::process::exit(1);
    }

    Ok(())
}

/// Views command - list resolved views
async fn views_command(config: &Config, selection: &ViewSelection, verbose: bool) -> Result<()> {
    let catalog = load_catalog(config, verbose).await?;
    let recursive = selection.recursive || config.extraction.recursive;

    let views = match resolve(&catalog, &selection.filter(), recursive).await {
        Ok(views) => views,
        Err(e) => abort(&e.to_diagnostic()),
    };

    if views.is_empty() {
        println!("{}", "No matching views".yellow());
        return Ok(());
    }

    for view in views.iter() {
        let kind = view
            .record
            .kind()
            .map(|k| k.to_string())
            .unwrap_or_default();
        println!(
            "{}  {}  {}",
            view.record.id.qualified_name().green(),
            kind,
            format!("({})", view.origin).dimmed()
        );
    }

    eprintln!();
    eprintln!("{} views", views.len());

    Ok(())
}

/// Parse command - dump the node table of a definition file
fn parse_command(config: &Config, file: &Path, keep_whitespace: bool, json: bool) -> Result<()> {
    let xml = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let options = ParseOptions {
        strip_whitespace_text: config.extraction.strip_whitespace_text && !keep_whitespace,
    };

    let nodes = match parse_with_options(&xml, options) {
        Ok(nodes) => nodes,
        Err(e) => abort(&e.to_diagnostic(&file.display().to_string(), &xml)),
    };

    let table = NodeTable::new(nodes);
    if let Err(e) = table.validate() {
        tracing::warn!(error = %e, "Node table violates structural invariants");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(table.nodes())?);
    } else {
        print!("{}", output::render_nodes(table.nodes()));
    }

    Ok(())
}

/// Print a diagnostic to stderr and exit with status 1
fn abort(diag: &Diagnostic) -> ! {
    eprint!("{}", output::render_diagnostic(diag));
    std::process::exit(1);
}

/// Print run summary to stderr
fn print_run_summary(report: &LineageReport) {
    eprintln!("\n{}", "=".repeat(60).bright_blue());
    eprintln!("{}", "View Lineage Report".bold().bright_blue());
    eprintln!("{}", "=".repeat(60).bright_blue());

    eprintln!("  Views analyzed: {}", report.summary.views_analyzed);
    if report.summary.views_failed > 0 {
        eprintln!("  Views failed:   {}", report.summary.views_failed.to_string().red().bold());
    } else {
        eprintln!("  Views failed:   {}", report.summary.views_failed.to_string().green());
    }
    eprintln!("  Base columns:   {}", report.summary.columns);

    for diag in &report.diagnostics {
        eprint!("{}", output::render_diagnostic(diag));
    }

    eprintln!("{}", "=".repeat(60).bright_blue());
}
