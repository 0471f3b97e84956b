//! Action Path CLI - inspect recorded action logs from the terminal
//!
//! Summaries, validation, the aggregated node path and dated exports,
//! without opening the viewer.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::{style, Emoji};
use std::path::{Path, PathBuf};

use action_path::path::{aggregate, count_nodes, details, AggregatedNode};
use action_path::records::{
    filter_by_type, filter_by_url, load_records_from_file, summarize_records, validate_records,
    write_export, ActionRecord, ActionType, LocalStore, RecordRelay,
};
use action_path::ViewerConfig;

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "+ ");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "x ");
static ARROW: Emoji<'_, '_> = Emoji("→ ", "-> ");
static TABLE: Emoji<'_, '_> = Emoji("▦ ", "# ");

#[derive(Parser)]
#[command(name = "path-cli")]
#[command(author = "e421")]
#[command(version)]
#[command(about = "Inspect recorded browser action logs")]
#[command(long_about = r#"
Reads an exported action records file (or the local record store) and
reports on it.

Examples:
  path-cli summary records.json           # Counts per type, URLs, time range
  path-cli validate records.json          # Records missing URL/selector/XPath
  path-cli aggregate records.json         # Aggregated node path
  path-cli aggregate --type click         # Only clicks from the local store
  path-cli export records.json --out ./   # Dated, indented JSON export
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Counts per action type, pages and time range
    Summary {
        /// Records file (default: local record store)
        file: Option<PathBuf>,
    },

    /// Report records missing a URL, selector or XPath
    Validate {
        file: Option<PathBuf>,
    },

    /// Print the aggregated node path
    Aggregate {
        file: Option<PathBuf>,

        /// Keep only these action types (click, input, change, submit)
        #[arg(short = 't', long = "type")]
        types: Vec<String>,

        /// Keep only records whose URL contains this text
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Write a dated export of the records
    Export {
        file: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Summary { file } => cmd_summary(file.as_deref()),
        Commands::Validate { file } => cmd_validate(file.as_deref()),
        Commands::Aggregate { file, types, url } => {
            cmd_aggregate(file.as_deref(), &types, url.as_deref())
        }
        Commands::Export { file, out } => cmd_export(file.as_deref(), &out),
    }
}

/// Records from `file`, or from the configured local store
fn load(file: Option<&Path>) -> Result<Vec<ActionRecord>> {
    match file {
        Some(path) => load_records_from_file(path)
            .with_context(|| format!("Failed to load records from {}", path.display())),
        None => {
            let path = ViewerConfig::load().storage_path();
            let store = LocalStore::open(&path)
                .with_context(|| format!("Failed to open record store {}", path.display()))?;
            Ok(store.records())
        }
    }
}

fn cmd_summary(file: Option<&Path>) -> Result<()> {
    let records = load(file)?;
    let summary = summarize_records(&records);

    println!("\n{}", style("Action Records").bold().underlined());
    println!("  Total:   {}", style(summary.total).cyan());
    for (kind, count) in &summary.by_type {
        println!("  {:<8} {}", format!("{}:", kind), count);
    }

    if let Some((start, end)) = summary.time_range {
        println!(
            "  Time:    {} {}{}",
            start.format("%Y-%m-%d %H:%M:%S"),
            ARROW,
            end.format("%H:%M:%S")
        );
        println!("  Span:    {}", details::format_span(start, end));
    }

    if !summary.urls.is_empty() {
        println!("\n{}", style("Pages").bold());
        for url in &summary.urls {
            println!("  {}", style(url).dim());
        }
    }

    let counts = count_nodes(&aggregate(&records));
    println!(
        "\n  {} nodes ({} table groups, {} single actions)",
        style(counts.nodes).cyan(),
        counts.table_groups,
        counts.singles
    );
    Ok(())
}

fn cmd_validate(file: Option<&Path>) -> Result<()> {
    let records = load(file)?;
    let report = validate_records(&records);

    if report.is_clean() {
        println!(
            "{}{} records valid",
            style(CHECK).green(),
            report.valid_records
        );
        return Ok(());
    }

    println!(
        "{}{} of {} records incomplete",
        style(CROSS).red(),
        report.invalid_records,
        report.total_records
    );
    println!(
        "  missing URL: {}, selector: {}, XPath: {}",
        report.missing_urls, report.missing_selectors, report.missing_xpaths
    );
    for error in &report.errors {
        println!("  {}", style(error).yellow());
    }
    anyhow::bail!("{} invalid records", report.invalid_records)
}

fn cmd_aggregate(file: Option<&Path>, types: &[String], url: Option<&str>) -> Result<()> {
    let mut records = load(file)?;

    if !types.is_empty() {
        let wanted = types
            .iter()
            .map(|t| ActionType::parse(t).with_context(|| format!("Unknown action type '{}'", t)))
            .collect::<Result<Vec<_>>>()?;
        records = filter_by_type(&records, &wanted);
    }
    if let Some(pattern) = url {
        records = filter_by_url(&records, pattern);
    }

    let nodes = aggregate(&records);
    if nodes.is_empty() {
        println!("{}", style("No recorded actions").dim());
        return Ok(());
    }

    for (i, node) in nodes.iter().enumerate() {
        match node {
            AggregatedNode::Single(record) => println!(
                "{:>3}. {:<7} {}",
                i + 1,
                style(record.action.label()).cyan(),
                record.description
            ),
            AggregatedNode::TableGroup(group) => println!(
                "{:>3}. {}{} {}",
                i + 1,
                TABLE,
                style(group.table.display_name()).magenta(),
                style(format!("({} actions)", group.count())).dim()
            ),
        }
    }

    let counts = count_nodes(&nodes);
    println!(
        "\n{} actions {}{} nodes",
        counts.actions,
        ARROW,
        counts.nodes
    );
    Ok(())
}

fn cmd_export(file: Option<&Path>, out: &Path) -> Result<()> {
    let records = load(file)?;
    if records.is_empty() {
        anyhow::bail!("No recorded actions to export");
    }
    let path = write_export(out, &records)
        .with_context(|| format!("Failed to export to {}", out.display()))?;
    println!(
        "{}Exported {} records to {}",
        style(CHECK).green(),
        records.len(),
        path.display()
    );
    Ok(())
}
