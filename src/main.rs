use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use costctl::catalog::CatalogStore;
use costctl::config::Config;
use costctl::request::ResourceRequest;
use costctl::selector::{CostQuote, InstanceSelector};
use costctl::spot::{RedisPriceStore, SpotPriceResolver};

#[derive(Parser)]
#[command(name = "costctl")]
#[command(
    about = "Cloud instance selection and workload cost estimation",
    long_about = "costctl quotes the cheapest cloud instance for a workload's resource ask.\n\nSupports:\n  - Fixed per-region instance catalogs (AWS, Azure, GCE)\n  - GCE-style custom machine shapes priced per cpu/GiB\n  - AWS burstable (T-unlimited) surcharge pricing\n  - Best-effort live spot prices from a key/value price store"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    output: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote the cheapest instance for a resource ask
    Quote {
        /// Requested CPU cores (fractional allowed, 0 = unconstrained)
        #[arg(long, default_value_t = 0.0)]
        cpu: f64,
        /// Requested memory in GiB (0 = unconstrained)
        #[arg(long, default_value_t = 0.0)]
        memory: f64,
        /// GPU requirement, "<count> <type>" (type optional)
        #[arg(long, default_value = "")]
        gpu: String,
    },
    /// Show the catalog spec and price of a known instance type
    Spec {
        /// Instance type, e.g. m5.large or n1-custom-2-3840
        instance_type: String,
    },
    /// Price a JSON file of workload resource requests
    Batch {
        /// JSON array of {workload, cpu, memory, gpu_spec} objects
        requests: PathBuf,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let json_output = cli.output == "json";

    match cli.command {
        Commands::Quote { cpu, memory, gpu } => {
            let config = Config::load(cli.config.as_deref())?;
            let selector = build_selector(&config)?;
            let request = ResourceRequest {
                workload: "cli".to_string(),
                cpu,
                memory,
                gpu_spec: gpu,
            };
            request.validate()?;
            let quote = selector
                .select_cheapest(request.cpu, request.memory, &request.gpu_spec)
                .await;
            print_quote(quote.as_ref(), json_output)?;
        }
        Commands::Spec { instance_type } => {
            let config = Config::load(cli.config.as_deref())?;
            let selector = build_selector(&config)?;
            match selector.spec_for_instance_type(&instance_type) {
                Some(record) if json_output => {
                    println!("{}", serde_json::to_string_pretty(&record)?)
                }
                Some(record) => {
                    println!("Instance:  {}", record.instance_type);
                    println!("Price:     ${:.4}/h", record.price);
                    println!("CPU:       {} cores", record.cpu);
                    println!("Memory:    {} GiB", record.memory);
                    println!("GPUs:      {}", record.gpu);
                    if record.burstable {
                        println!("Burstable: yes (baseline {} cores)", record.baseline);
                    }
                }
                None => anyhow::bail!("unknown instance type: {}", instance_type),
            }
        }
        Commands::Batch { requests } => {
            let config = Config::load(cli.config.as_deref())?;
            let selector = build_selector(&config)?;
            let content = std::fs::read_to_string(&requests)
                .with_context(|| format!("Failed to read requests: {}", requests.display()))?;
            let requests: Vec<ResourceRequest> = serde_json::from_str(&content)
                .context("Requests file must be a JSON array of resource requests")?;
            let report = price_batch(&selector, &config, &requests).await?;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(Config::default_path);
            if path.exists() && !force {
                anyhow::bail!(
                    "Config already exists: {} (use --force to overwrite)",
                    path.display()
                );
            }
            Config::default().save(&path)?;
            println!("Wrote default config to {}", path.display());
        }
    }

    Ok(())
}

fn build_selector(config: &Config) -> Result<InstanceSelector> {
    let catalog = CatalogStore::load(&config.data_dir, config.provider, &config.region)
        .context("Failed to load instance catalog")?;
    match &config.price_store {
        Some(store_config) => {
            let store = RedisPriceStore::connect(&store_config.url)
                .context("Failed to configure price store")?;
            let resolver = SpotPriceResolver::new(Box::new(store), config.provider)
                .with_namespace(&store_config.namespace)
                .with_timeout(std::time::Duration::from_millis(
                    store_config.lookup_timeout_ms,
                ));
            Ok(InstanceSelector::with_resolver(catalog, resolver))
        }
        None => Ok(InstanceSelector::new(catalog)),
    }
}

fn print_quote(quote: Option<&CostQuote>, json_output: bool) -> Result<()> {
    match quote {
        Some(quote) if json_output => println!("{}", serde_json::to_string_pretty(quote)?),
        Some(quote) => {
            println!("Instance:  {}", quote.instance_type);
            println!("On-demand: ${:.4}/h", quote.on_demand_price);
            println!("Spot:      ${:.4}/h", quote.spot_price);
            if quote.burst_surcharge {
                println!("Note:      includes burst (unlimited-mode) surcharge");
            }
        }
        None if json_output => println!("null"),
        None => println!("No instance satisfies the request"),
    }
    Ok(())
}

/// Per-workload cost line in a batch report. `instance_type` is empty and
/// `uncosted` set when nothing satisfied the ask.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WorkloadCost {
    workload: String,
    instance_type: String,
    hourly_cost: f64,
    spot_hourly_cost: f64,
    no_resource_spec: bool,
    uncosted: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchReport {
    provider: String,
    region: String,
    generated_at: DateTime<Utc>,
    workloads: Vec<WorkloadCost>,
    total_hourly_cost: f64,
    total_spot_hourly_cost: f64,
}

async fn price_batch(
    selector: &InstanceSelector,
    config: &Config,
    requests: &[ResourceRequest],
) -> Result<BatchReport> {
    let mut workloads = Vec::with_capacity(requests.len());
    let mut total = 0.0;
    let mut total_spot = 0.0;
    for request in requests {
        request.validate()?;
        let quote = selector
            .select_cheapest(request.cpu, request.memory, &request.gpu_spec)
            .await;
        let line = match quote {
            Some(quote) => {
                total += quote.on_demand_price;
                total_spot += quote.spot_price;
                WorkloadCost {
                    workload: request.workload.clone(),
                    instance_type: quote.instance_type,
                    hourly_cost: quote.on_demand_price,
                    spot_hourly_cost: quote.spot_price,
                    no_resource_spec: !request.has_resource_spec(),
                    uncosted: false,
                }
            }
            None => WorkloadCost {
                workload: request.workload.clone(),
                instance_type: String::new(),
                hourly_cost: 0.0,
                spot_hourly_cost: 0.0,
                no_resource_spec: !request.has_resource_spec(),
                uncosted: true,
            },
        };
        workloads.push(line);
    }
    Ok(BatchReport {
        provider: config.provider.to_string(),
        region: config.region.clone(),
        generated_at: Utc::now(),
        workloads,
        total_hourly_cost: total,
        total_spot_hourly_cost: total_spot,
    })
}

fn print_report(report: &BatchReport) {
    println!(
        "Cost summary for {} {} ({})",
        report.provider, report.region, report.generated_at
    );
    println!();
    println!(
        "{:<40} {:<28} {:>12} {:>12}",
        "WORKLOAD", "INSTANCE", "ON-DEMAND/H", "SPOT/H"
    );
    for line in &report.workloads {
        let mut flags = String::new();
        if line.uncosted {
            flags.push_str(" [uncosted]");
        }
        if line.no_resource_spec {
            flags.push_str(" [no resource spec]");
        }
        let instance = if line.instance_type.is_empty() {
            "-"
        } else {
            &line.instance_type
        };
        println!(
            "{:<40} {:<28} {:>12.4} {:>12.4}{}",
            line.workload, instance, line.hourly_cost, line.spot_hourly_cost, flags
        );
    }
    println!();
    println!(
        "Total: ${:.4}/h on-demand, ${:.4}/h with spot",
        report.total_hourly_cost, report.total_spot_hourly_cost
    );
}
