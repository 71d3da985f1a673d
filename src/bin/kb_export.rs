//! Export the document list of a saved knowledge-base page as a ZIP vault.
//!
//! A saved page never reacts to clicks, so documents are read from the list
//! itself unless `--open` is given or the options file sets `open_documents`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use kb_exporter::{export_page, CollisionPolicy, Options, StaticPage};
use tracing::error;

#[derive(Parser)]
#[command(name = "kb-export", about = "Export a knowledge-base document list as markdown files")]
struct Cli {
    /// Saved HTML page with the document list
    input: PathBuf,

    /// URL the page was saved from (defaults to the file:// URL of the input)
    #[arg(long)]
    url: Option<String>,

    /// Directory the bundle is written to
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Label used for the index heading and the bundle name
    #[arg(short, long)]
    label: Option<String>,

    /// JSON options file; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the export report as JSON
    #[arg(long)]
    json: bool,

    /// Rename duplicate filenames instead of keeping only the last one
    #[arg(long)]
    suffix_duplicates: bool,

    /// Click every document and wait for the page to settle
    #[arg(long)]
    open: bool,
}

fn load_options(cli: &Cli) -> kb_exporter::Result<Options> {
    let config = cli
        .config
        .as_ref()
        .map(std::fs::read_to_string)
        .transpose()?;
    options_from(cli, config.as_deref())
}

/// Options from an optional JSON config plus the command line.
///
/// Documents are opened when `--open` is given or the config sets
/// `open_documents`; otherwise they are read from the list.
fn options_from(cli: &Cli, config: Option<&str>) -> kb_exporter::Result<Options> {
    let mut options = match config {
        Some(json) => {
            let mut options = Options::from_json(json)?;
            if !sets_field(json, "open_documents") {
                options.open_documents = false;
            }
            options
        }
        None => Options {
            open_documents: false,
            ..Options::default()
        },
    };
    if cli.open {
        options.open_documents = true;
    }
    if let Some(label) = &cli.label {
        options.archive_label.clone_from(label);
    }
    if cli.suffix_duplicates {
        options.collision_policy = CollisionPolicy::Suffix;
    }
    Ok(options)
}

fn sets_field(json: &str, field: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(json)
        .is_ok_and(|value| value.get(field).is_some())
}

async fn run(cli: Cli) -> kb_exporter::Result<()> {
    let options = load_options(&cli)?;
    let page = StaticPage::open(&cli.input, cli.url.clone())?;
    let report = export_page(page, options, &cli.out).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for name in &report.artifacts {
            println!("  {name}");
        }
        for skipped in &report.skipped {
            println!("  skipped #{}: {}", skipped.position, skipped.reason);
        }
        if let Some(path) = &report.destination {
            println!(
                "Exported {} of {} documents to {}",
                report.artifacts.len(),
                report.located,
                path.display()
            );
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "export failed");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
