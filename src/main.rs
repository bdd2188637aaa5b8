use clap::Parser;
use gkecc::error::GkeccError;
use gkecc::generate::{self, GenerateOptions, OutputFormat};
use gkecc::Arch;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gkecc")]
#[command(version)]
#[command(
    about = "Generate a GKE ComputeClass spec with cost-optimised machine priorities",
    long_about = "gkecc queries the GCP Cloud Billing catalog for compute pricing, ranks machine\nfamilies by total cost (cores + RAM) for a target shape, interleaving spot and\non-demand, and emits a ComputeClass manifest ordered cheapest-first.\n\nRequires the Cloud Billing API to be enabled and gcloud application-default\ncredentials (gcloud auth application-default login).",
    after_help = "Examples:\n  gkecc --region europe-north1 > computeclass.yaml\n  gkecc --region europe-north1 --max-cost 5 -o computeclass.yaml\n  gkecc --region europe-north1 --arch arm --max-cost 3\n  gkecc --region us-central1 --vcpus 8 --ram 32 --all\n  gkecc --region europe-north1 --format table --skip-validation"
)]
struct Cli {
    /// GCP region to price against
    #[arg(long, default_value = "europe-north1")]
    region: String,

    /// Number of vCPUs for cost calculation
    #[arg(long, default_value_t = 4)]
    vcpus: u32,

    /// RAM in GB for cost calculation
    #[arg(long, default_value_t = 16.0)]
    ram: f64,

    /// CPU architecture to include
    #[arg(long, value_enum, default_value_t = Arch::Amd64)]
    arch: Arch,

    /// Include general-purpose families (default when no category is given)
    #[arg(long)]
    general_purpose: bool,

    /// Include compute-optimised families
    #[arg(long)]
    compute_optimised: bool,

    /// Include memory-optimised families
    #[arg(long)]
    memory_optimised: bool,

    /// Include storage-optimised families
    #[arg(long)]
    storage_optimised: bool,

    /// Include GPU families
    #[arg(long)]
    gpu: bool,

    /// Include every machine family category
    #[arg(long)]
    all: bool,

    /// Maximum daily cost in USD for a single instance
    #[arg(long, value_name = "DOLLARS")]
    max_cost: Option<f64>,

    /// Ignore the SKU cache and fetch fresh pricing
    #[arg(long)]
    refresh: bool,

    /// Skip machine-type compatibility validation
    #[arg(long)]
    skip_validation: bool,

    /// GCP project ID used for validation
    #[arg(long, env = "GOOGLE_CLOUD_PROJECT")]
    project: Option<String>,

    /// Override the generated metadata.name
    #[arg(long)]
    name: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Node labels as key=value, comma-separated or repeated
    #[arg(long = "node-label", value_name = "KEY=VALUE")]
    node_labels: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn categories(&self) -> Vec<String> {
        if self.all {
            return gkecc::families::ALL_CATEGORIES
                .iter()
                .map(|c| c.to_string())
                .collect();
        }
        let mut categories = Vec::new();
        for (enabled, tag) in [
            (self.general_purpose, "general-purpose"),
            (self.compute_optimised, "compute-optimised"),
            (self.memory_optimised, "memory-optimised"),
            (self.storage_optimised, "storage-optimised"),
            (self.gpu, "gpu"),
        ] {
            if enabled {
                categories.push(tag.to_string());
            }
        }
        if categories.is_empty() {
            categories.push("general-purpose".to_string());
        }
        categories
    }

    /// Project ID for validation: flag (or GOOGLE_CLOUD_PROJECT via clap),
    /// falling back to the legacy GCLOUD_PROJECT variable.
    fn resolve_project(&self) -> Result<Option<String>, GkeccError> {
        if self.skip_validation {
            return Ok(None);
        }
        let project = self
            .project
            .clone()
            .or_else(|| std::env::var("GCLOUD_PROJECT").ok().filter(|p| !p.is_empty()));
        match project {
            Some(p) => Ok(Some(p)),
            None => Err(GkeccError::InvalidInput {
                field: "project".to_string(),
                reason: "validation requires a GCP project ID; pass --project, set \
                         GOOGLE_CLOUD_PROJECT, or use --skip-validation"
                    .to_string(),
            }),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for the YAML document.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        // anyhow renders the full cause chain for the diagnostic trace.
        eprintln!("Error: {:#}", anyhow::Error::from(e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), GkeccError> {
    let opts = GenerateOptions {
        region: cli.region.clone(),
        vcpus: cli.vcpus,
        ram_gb: cli.ram,
        arch: cli.arch,
        categories: cli.categories(),
        max_daily_cost: cli.max_cost,
        node_labels: cli.node_labels.clone(),
        name: cli.name.clone(),
        refresh: cli.refresh,
        project: cli.resolve_project()?,
        format: cli.format,
        output: cli.output.clone(),
    };

    generate::generate(&opts).await
}
