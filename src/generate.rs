//! ComputeClass generation pipeline
//!
//! Wires the stages together: fetch (or load cached) pricing line items,
//! normalize per family, rank by total cost for the requested shape,
//! optionally validate against the live machine-type catalog, apply the
//! category and budget filters, and render the result.
//!
//! "Nothing matched" is not an error: the run logs a warning, writes no
//! output, and exits zero.

use crate::billing::BillingClient;
use crate::cache;
use crate::compute::ComputeClient;
use crate::costs::{self, CostOption};
use crate::error::Result;
use crate::families::Arch;
use crate::output::{self, DocumentMeta};
use crate::pricing::{self, PriceLineItem};
use crate::validate::{self, MachineTypeCatalog};
use crate::{auth, labels};
use clap::ValueEnum;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Table,
}

/// All knobs for one generation run, threaded explicitly instead of living in
/// process-wide state.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub region: String,
    pub vcpus: u32,
    pub ram_gb: f64,
    pub arch: Arch,
    /// Category tags to keep; empty keeps everything.
    pub categories: Vec<String>,
    pub max_daily_cost: Option<f64>,
    pub node_labels: Vec<String>,
    /// Explicit metadata.name override.
    pub name: Option<String>,
    /// Ignore any same-day cache and fetch fresh pricing.
    pub refresh: bool,
    /// `Some(project)` enables machine-type validation.
    pub project: Option<String>,
    pub format: OutputFormat,
    /// Output file; `None` writes to stdout.
    pub output: Option<PathBuf>,
}

/// Run the full pipeline.
pub async fn generate(opts: &GenerateOptions) -> Result<()> {
    let node_labels = labels::parse_node_labels(&opts.node_labels)?;

    let skus = fetch_line_items(opts.refresh).await?;
    let pricing = pricing::normalize(&skus, &opts.region, opts.arch);

    if pricing.is_empty() {
        warn!(
            "no pricing data found for {} ({})",
            opts.region, opts.arch
        );
        return Ok(());
    }
    info!(
        "{} machine families with complete pricing in {}",
        pricing.len(),
        opts.region
    );

    let mut options = costs::rank(&pricing, opts.vcpus, opts.ram_gb);

    if let Some(project) = &opts.project {
        let client = ComputeClient::new(auth::access_token()?);
        options = retain_compatible(&client, project, opts, options).await?;
    }

    options = costs::filter_by_category(options, &opts.categories);
    options = costs::filter_by_max_cost(options, opts.max_daily_cost);

    if options.is_empty() {
        warn!("no machine family survived filtering; nothing to emit");
        return Ok(());
    }

    let meta = DocumentMeta {
        region: opts.region.clone(),
        arch: opts.arch,
        categories: opts.categories.clone(),
        max_daily_cost: opts.max_daily_cost,
        node_labels,
        name: opts.name.clone(),
        vcpus: opts.vcpus,
        ram_gb: opts.ram_gb,
    };
    let rendered = match opts.format {
        OutputFormat::Yaml => output::render_yaml(&meta, &options),
        OutputFormat::Table => output::render_table(&options, opts.vcpus, opts.ram_gb),
    };

    match &opts.output {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            info!("wrote {} to {}", output_kind(opts.format), path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn output_kind(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Yaml => "ComputeClass spec",
        OutputFormat::Table => "cost table",
    }
}

/// Same-day cached SKUs if allowed, otherwise a fresh catalog fetch followed
/// by a best-effort cache write.
async fn fetch_line_items(refresh: bool) -> Result<Vec<PriceLineItem>> {
    let cache_dir = cache::default_cache_dir();

    if !refresh {
        if let Some(skus) = cache::load_from(&cache_dir) {
            info!("using {} cached SKUs from today", skus.len());
            return Ok(skus);
        }
    }

    let client = BillingClient::new(auth::access_token()?);
    let service = client.find_compute_service().await?;
    let skus = client.list_skus(&service).await?;
    cache::save_to(&cache_dir, &skus);
    Ok(skus)
}

/// Drop options whose family the platform cannot provision for this shape.
async fn retain_compatible<C: MachineTypeCatalog + ?Sized>(
    catalog: &C,
    project: &str,
    opts: &GenerateOptions,
    options: Vec<CostOption>,
) -> Result<Vec<CostOption>> {
    let candidates: BTreeSet<String> = options.iter().map(|o| o.family.clone()).collect();
    let compatible = validate::validate_compatibility(
        catalog,
        project,
        &opts.region,
        opts.vcpus,
        opts.ram_gb,
        &candidates,
    )
    .await?;

    for family in candidates.difference(&compatible) {
        warn!(
            "dropping {}: no {}vCPU+{}GB shape available",
            family, opts.vcpus, opts.ram_gb
        );
    }

    Ok(options
        .into_iter()
        .filter(|o| compatible.contains(&o.family))
        .collect())
}

/// Rank, filter, and render without touching the network or the cache.
/// Used by the integration tests; `generate` goes through the same stages.
pub fn assemble_document(
    opts: &GenerateOptions,
    pricing: &BTreeMap<String, crate::pricing::FamilyPricing>,
) -> Result<Option<String>> {
    let node_labels = labels::parse_node_labels(&opts.node_labels)?;

    let options = costs::rank(pricing, opts.vcpus, opts.ram_gb);
    let options = costs::filter_by_category(options, &opts.categories);
    let options = costs::filter_by_max_cost(options, opts.max_daily_cost);
    if options.is_empty() {
        return Ok(None);
    }

    let meta = DocumentMeta {
        region: opts.region.clone(),
        arch: opts.arch,
        categories: opts.categories.clone(),
        max_daily_cost: opts.max_daily_cost,
        node_labels,
        name: opts.name.clone(),
        vcpus: opts.vcpus,
        ram_gb: opts.ram_gb,
    };
    Ok(Some(match opts.format {
        OutputFormat::Yaml => output::render_yaml(&meta, &options),
        OutputFormat::Table => output::render_table(&options, opts.vcpus, opts.ram_gb),
    }))
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            region: "europe-north1".to_string(),
            vcpus: 4,
            ram_gb: 16.0,
            arch: Arch::Amd64,
            categories: Vec::new(),
            max_daily_cost: None,
            node_labels: Vec::new(),
            name: None,
            refresh: false,
            project: None,
            format: OutputFormat::Yaml,
            output: None,
        }
    }
}
