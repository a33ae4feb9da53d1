//! Marquee command-line entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::info;

use marquee::Engine;
use marquee_cli::config::{build_config, Overrides};
use marquee_cli::export::export;

#[derive(Parser)]
#[command(
    name = "marquee",
    about = "Harvest a ranked list and enrich every entry from its detail page",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct SourceArgs {
    /// Index page to harvest. Also reads MARQUEE_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Host detail references resolve against. Also reads MARQUEE_HOST.
    #[arg(long, global = true)]
    host: Option<String>,

    /// User-Agent header. Also reads MARQUEE_USER_AGENT.
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Extra request header as "Name: value". Can be repeated.
    #[arg(long = "header", global = true)]
    headers: Vec<String>,

    /// Per-request timeout in seconds.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Maximum detail pages fetched at once.
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    /// Lower bound of the random pre-request delay.
    #[arg(long, global = true)]
    min_delay_ms: Option<u64>,

    /// Upper bound of the random pre-request delay.
    #[arg(long, global = true)]
    max_delay_ms: Option<u64>,
}

impl SourceArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            host: self.host.clone(),
            user_agent: self.user_agent.clone(),
            headers: self.headers.clone(),
            timeout_secs: self.timeout_secs,
            concurrency: self.concurrency,
            min_delay_ms: self.min_delay_ms,
            max_delay_ms: self.max_delay_ms,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Harvest, enrich and write JSON + CSV (default).
    Run {
        /// Directory for output files.
        #[arg(long, default_value = "data")]
        out_dir: PathBuf,

        /// Output filename prefix.
        #[arg(long, default_value = "top_250")]
        prefix: String,

        /// Only enrich the first N entries.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Harvest the list only and print the stubs as JSON.
    List {
        /// Only print the first N entries.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let command = cli.command.unwrap_or(Commands::Run {
        out_dir: PathBuf::from("data"),
        prefix: "top_250".to_string(),
        limit: None,
    });

    match command {
        Commands::Run {
            out_dir,
            prefix,
            limit,
        } => {
            let engine = build_engine(&cli.source)?;
            let mut stubs = engine.harvest().await.context("failed to harvest list")?;
            if let Some(limit) = limit {
                stubs.truncate(limit);
            }

            let records = engine.acquire_all(stubs).await;
            let paths = export(&out_dir, &prefix, &records, &chrono::Local::now())
                .with_context(|| format!("failed to write output to {}", out_dir.display()))?;

            info!(
                json = %paths.json.display(),
                csv = %paths.csv.display(),
                "saved {} records",
                records.len()
            );
        }

        Commands::List { limit } => {
            let engine = build_engine(&cli.source)?;
            let mut stubs = engine.harvest().await.context("failed to harvest list")?;
            if let Some(limit) = limit {
                stubs.truncate(limit);
            }
            println!("{}", serde_json::to_string_pretty(&stubs)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "marquee", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn build_engine(source: &SourceArgs) -> anyhow::Result<Engine> {
    let config = build_config(&source.overrides())?;
    let engine = Engine::new(config).context("invalid engine configuration")?;
    info!(
        base_url = %engine.config().base_url,
        concurrency = engine.config().concurrency,
        "starting marquee v{}",
        env!("CARGO_PKG_VERSION")
    );
    Ok(engine)
}
