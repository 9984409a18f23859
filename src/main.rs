// Command-line entry point for Metricraft.

use anyhow::{bail, Result};
use clap::Parser;
use metricraft::application::AnalyzeUsecase;
use metricraft::domain::store::{DiskRecordStore, RecordStore};
use metricraft::domain::unit::parse_units;
use metricraft::infrastructure::{
    concurrency, AnalysisConfig, CsvExporter, DotExporter, JsonExporter, MetricsEngine,
    ProjectLoader, ReportCache,
};
use metricraft::ports::OutputExporter;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input source file path (can specify multiple)
    #[arg(short, long, required = false)]
    input: Vec<String>,

    /// Input source folder(s)
    #[arg(short = 'd', long, required = false)]
    folder: Vec<String>,

    /// Workspace Cargo.toml
    #[arg(long, required = false)]
    workspace: Option<String>,

    /// Output file path
    #[arg(short, long, default_value = "metricraft-report.csv")]
    output: String,

    /// Output format (csv, json, dot)
    #[arg(short, long)]
    format: Option<String>,

    /// Worker threads (0 = auto)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Config file (defaults to metricraft.toml under the analyzed root)
    #[arg(long)]
    config: Option<String>,

    /// Reuse the cached report when sources are unchanged
    #[arg(long, default_value_t = false)]
    cache: bool,

    /// Persist records into a sled store at this path
    #[arg(long)]
    store: Option<String>,

    /// Also measure types declared in #[cfg(test)] modules
    #[arg(long, default_value_t = false)]
    include_tests: bool,

    /// Run as a TCP API daemon on this port instead of analyzing
    #[arg(long)]
    serve: Option<u16>,
}

/// Directory the cache and config discovery anchor to.
fn analysis_root(cli: &Cli) -> PathBuf {
    if let Some(folder) = cli.folder.first() {
        return PathBuf::from(folder);
    }
    if let Some(workspace) = &cli.workspace {
        if let Some(parent) = Path::new(workspace).parent() {
            return parent.to_path_buf();
        }
    }
    PathBuf::from(".")
}

fn select_exporter(format: &str) -> Result<&'static dyn OutputExporter> {
    match format {
        "csv" => Ok(&CsvExporter),
        "json" => Ok(&JsonExporter),
        "dot" => Ok(&DotExporter),
        other => bail!("Unknown output format: {} (expected csv, json, dot)", other),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(port) = cli.serve {
        return metricraft::api::server::start_server(port);
    }

    let root = analysis_root(&cli);
    let config = match &cli.config {
        Some(path) => AnalysisConfig::load(Path::new(path))?,
        None => AnalysisConfig::discover(&root)?,
    };

    let threads = if cli.threads > 0 {
        cli.threads
    } else {
        config.threads.unwrap_or(0)
    };
    concurrency::init_thread_pool(threads)?;

    let format = cli
        .format
        .clone()
        .or_else(|| config.format.clone())
        .unwrap_or_else(|| "csv".to_string());
    let exporter = select_exporter(&format)?;

    // Gather sources from all requested origins.
    let loader = ProjectLoader::with_excludes(&config.exclude_dirs);
    let mut all_sources: Vec<(String, String, String)> = Vec::new();

    if !cli.input.is_empty() {
        all_sources.extend(loader.load_files(&cli.input)?);
    }
    for folder in &cli.folder {
        all_sources.extend(loader.load_folder(folder)?);
    }
    if let Some(manifest) = &cli.workspace {
        let ws_sources = loader.load_workspace(manifest)?;
        println!(
            "[metricraft] Workspace collected {} .rs files",
            ws_sources.len()
        );
        all_sources.extend(ws_sources);
    }

    if all_sources.is_empty() {
        bail!("Please provide at least one --input <file>, --folder <dir>, or --workspace <Cargo.toml>");
    }

    let source_paths: Vec<String> = all_sources.iter().map(|(_, path, _)| path.clone()).collect();

    // A valid cached report skips parsing and measuring entirely.
    let cache = ReportCache::new(&root);
    if cli.cache {
        if let Some(report) = cache.get_valid_report() {
            exporter.export(&report, &cli.output)?;
            println!(
                "Analysis completed from cache! {} types written to {} (format: {})",
                report.len(),
                cli.output,
                format
            );
            return Ok(());
        }
    }

    let units = parse_units(&all_sources);
    println!(
        "[metricraft] Parsed {} of {} source files",
        units.len(),
        all_sources.len()
    );

    let engine = MetricsEngine::new(cli.include_tests || config.include_tests);

    let disk_store: Option<DiskRecordStore> = match &cli.store {
        Some(path) => Some(DiskRecordStore::new(path)?),
        None => None,
    };
    let store_ref: Option<&dyn RecordStore> =
        disk_store.as_ref().map(|s| s as &dyn RecordStore);

    let usecase = AnalyzeUsecase {
        builder: &engine,
        exporter,
        store: store_ref,
    };

    let report = usecase.run(&units, &cli.output)?;

    if cli.cache {
        if let Err(e) = cache.store_report(&report, &source_paths) {
            eprintln!("[cache] Warning: failed to store report: {}", e);
        }
    }

    println!(
        "Analysis completed! {} types written to {} (format: {})",
        report.len(),
        cli.output,
        format
    );

    Ok(())
}
