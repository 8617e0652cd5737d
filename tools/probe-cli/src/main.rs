use clap::{Parser, Subcommand, ValueEnum};
use probe_core::config::{
    DEFAULT_BASE_URL, DEFAULT_STATUS_ID, DEFAULT_TIMEOUT_SECS, ENV_BASE_URL, ENV_STATUS_ID,
    ENV_TIMEOUT_SECS,
};
use probe_core::{
    find_endpoint, merge_endpoints, EndpointProber, EndpointSpec, ProbeConfig, ProbeReport,
    ProbeResult,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "probe")]
#[command(about = "Probe CLI - HTTP endpoint existence checks")]
#[command(version = probe_core::VERSION)]
struct Cli {
    /// Base URL of the server under test
    #[arg(long, global = true, env = ENV_BASE_URL, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Substituted for {id} in endpoint paths
    #[arg(long, global = true, env = ENV_STATUS_ID, default_value = DEFAULT_STATUS_ID)]
    status_id: String,

    /// Request timeout in seconds
    #[arg(long, global = true, env = ENV_TIMEOUT_SECS, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe endpoints and report a verdict for each
    Run {
        /// Only probe the named endpoint (repeatable)
        #[arg(short, long = "endpoint", value_name = "NAME")]
        endpoints: Vec<String>,
        /// Additional endpoint as name=/path:codes (repeatable)
        #[arg(long, value_name = "SPEC")]
        extra: Vec<EndpointSpec>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List the endpoint table
    List {
        /// Additional endpoint as name=/path:codes (repeatable)
        #[arg(long, value_name = "SPEC")]
        extra: Vec<EndpointSpec>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ProbeConfig::default()
        .with_base_url(cli.base_url)
        .with_status_id(cli.status_id)
        .with_timeout_secs(cli.timeout);
    config.validate()?;
    debug!("Using configuration {:?}", config);

    match cli.command {
        Commands::Run {
            endpoints,
            extra,
            format,
        } => handle_run(config, endpoints, extra, format).await,
        Commands::List { extra, format } => handle_list(config, extra, format),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// The fixed table plus any extras, narrowed to `names` when given
fn select_endpoints(
    table: Vec<EndpointSpec>,
    extra: Vec<EndpointSpec>,
    names: &[String],
) -> anyhow::Result<Vec<EndpointSpec>> {
    let all = merge_endpoints(table, extra)?;
    if names.is_empty() {
        return Ok(all);
    }
    names
        .iter()
        .map(|name| -> anyhow::Result<EndpointSpec> { Ok(find_endpoint(&all, name)?.clone()) })
        .collect()
}

async fn handle_run(
    config: ProbeConfig,
    names: Vec<String>,
    extra: Vec<EndpointSpec>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let specs = select_endpoints(config.endpoints.clone(), extra, &names)?;
    let prober = EndpointProber::from_config(&config)?;
    let report = prober.probe_all(&specs).await?;

    match format {
        OutputFormat::Text => print_report(&report),
        OutputFormat::Json => println!("{}", report.to_json_pretty()?),
    }

    if !report.all_passed() {
        anyhow::bail!(
            "{} of {} endpoint probes failed",
            report.failed(),
            report.results.len()
        );
    }
    Ok(())
}

fn print_report(report: &ProbeReport) {
    println!("🔎 Probing {}", report.base_url);
    for result in &report.results {
        println!("  {}", format_result(result));
    }
    println!(
        "📊 {} endpoints: {} passed, {} failed",
        report.results.len(),
        report.passed(),
        report.failed()
    );
}

fn format_result(result: &ProbeResult) -> String {
    let outcome = match (result.observed_status, &result.diagnostic) {
        (Some(status), None) => format!("{} ({}ms)", status, result.elapsed_ms),
        (_, Some(diagnostic)) => diagnostic.clone(),
        (None, None) => "no response".to_string(),
    };
    format!(
        "{:<12} {:<10} OPTIONS {} -> {}",
        result.verdict().to_string(),
        result.endpoint.name,
        result.url,
        outcome
    )
}

fn handle_list(
    config: ProbeConfig,
    extra: Vec<EndpointSpec>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let specs = select_endpoints(config.endpoints, extra, &[])?;
    match format {
        OutputFormat::Text => {
            println!("📋 Endpoints:");
            for spec in &specs {
                println!(
                    "  {:<10} {:<20} {:?}",
                    spec.name,
                    spec.path,
                    spec.allowed()
                );
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&specs)?),
    }
    Ok(())
}
