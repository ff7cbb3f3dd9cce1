//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::Context;
use fundtrace_common::network_config::{load_catalog, load_template};
use fundtrace_common::{Dataset, NetworkTemplate, SummaryRow};
use fundtrace_db::{build_sinks, DatasetSink, JsonSink, OutputFormat, SqliteStore};
use fundtrace_kg::{check_dataset, check_network, retheme_network, SeedMode, Synthesizer};
use tracing::{info, warn};

use crate::config::Config;

pub struct GenerateArgs {
    pub seed: Option<u64>,
    pub out: Option<PathBuf>,
    pub formats: Vec<OutputFormat>,
    pub catalog: Option<PathBuf>,
    pub independent: bool,
    pub parallel: bool,
}

pub async fn generate(config: &Config, args: GenerateArgs) -> anyhow::Result<()> {
    let mut settings = config.generator.clone();
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    let specs = match &args.catalog {
        Some(path) => load_catalog(path)
            .with_context(|| format!("failed to load catalog {}", path.display()))?,
        None => config.networks.clone(),
    };

    let mode = if args.independent || args.parallel {
        SeedMode::Independent { parallel: args.parallel }
    } else {
        SeedMode::Shared
    };

    let catalog = Synthesizer::new(settings)?.generate(&specs, mode)?;
    for graph in &catalog.networks {
        for violation in check_network(graph) {
            warn!(network = graph.network_id(), %violation, "Generated network violates an invariant");
        }
    }
    let dataset = catalog.to_dataset()?;

    let dir = args.out.as_deref().unwrap_or(&config.output.dir);
    let formats = if args.formats.is_empty() { &config.output.formats } else { &args.formats };
    for sink in build_sinks(formats, dir, &config.output.file_prefix) {
        let report = sink
            .write(&dataset)
            .await
            .with_context(|| format!("{} sink failed", sink.name()))?;
        for location in &report.locations {
            println!("wrote {}", location.display());
        }
    }

    if let Some(seed) = catalog.seed {
        info!(seed, "Run can be replayed with --seed");
    }
    print_summary(&dataset.summary);
    Ok(())
}

pub async fn validate(db: &Path, min_chains: usize) -> anyhow::Result<()> {
    let dataset = load_dataset(db).await?;
    let violations = check_dataset(&dataset, min_chains);
    if violations.is_empty() {
        println!(
            "{}: {} networks, {} nodes, {} edges, no violations",
            db.display(),
            dataset.summary.len(),
            dataset.nodes.len(),
            dataset.edges.len()
        );
        return Ok(());
    }

    for violation in &violations {
        println!("{violation}");
    }
    anyhow::bail!("{} violations in {}", violations.len(), db.display())
}

pub async fn summary(db: &Path, json: bool) -> anyhow::Result<()> {
    let dataset = load_dataset(db).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&dataset.summary)?);
    } else {
        print_summary(&dataset.summary);
    }
    Ok(())
}

pub async fn retheme(db: &Path, network_id: u32, template: &Path) -> anyhow::Result<()> {
    let spec = load_template(template)
        .with_context(|| format!("failed to load template {}", template.display()))?;
    let template = NetworkTemplate::try_from(spec)?;

    let dataset = load_dataset(db).await?;
    let rethemed = retheme_network(&dataset, network_id, &template)?;
    let report = store_for(db).write(&rethemed).await?;
    for location in &report.locations {
        println!("rewrote network {network_id} in {}", location.display());
    }
    print_summary(&rethemed.summary);
    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

fn store_for(path: &Path) -> Box<dyn DatasetSink> {
    if is_json(path) {
        Box::new(JsonSink::new(path))
    } else {
        Box::new(SqliteStore::new(path))
    }
}

async fn load_dataset(path: &Path) -> anyhow::Result<Dataset> {
    if !path.exists() {
        anyhow::bail!("dataset not found: {}", path.display());
    }
    let dataset = if is_json(path) {
        JsonSink::new(path).load().await
    } else {
        SqliteStore::new(path).load().await
    };
    dataset.with_context(|| format!("failed to read {}", path.display()))
}

fn print_summary(rows: &[SummaryRow]) {
    println!(
        "{:>3}  {:<24} {:<24} {:>5} {:>5} {:>12} {:>5} {:>6}",
        "id", "disease", "treatment", "grant", "appr", "funding", "pubs", "chains"
    );
    for row in rows {
        println!(
            "{:>3}  {:<24} {:<24} {:>5} {:>5} {:>12} {:>5} {:>6}",
            row.network_id,
            row.disease,
            row.treatment_name,
            row.grant_year,
            row.approval_year,
            row.funding_amount,
            row.total_publications,
            row.realized_chains
        );
    }
}
