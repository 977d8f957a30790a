use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tacmeta::api::{build_router, state::AppState};
use tacmeta::config::AppConfig;
use tacmeta::dataset::{load_dataset, Dataset};
use tacmeta::ingest;
use tacmeta::models::Role;
use tacmeta::recommend::best_agents_for_map;
use tacmeta::tree::{best_buy_for_map, best_side_for_map};

#[derive(Parser)]
#[command(name = "tacmeta")]
#[command(about = "Valorant tournament meta analyzer")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the raw exports and write flat derived CSVs
    Clean {
        /// Directory to write the cleaned files into
        #[arg(long, default_value = "./data/derived")]
        out_dir: PathBuf,
    },

    /// Recommend agents for a map
    Recommend {
        /// Map to recommend for
        map: String,

        /// Restrict to one role
        #[arg(long)]
        role: Option<String>,

        /// Agents already picked by teammates (comma-separated)
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,
    },

    /// Show side and buy-type verdicts for a map
    Analyze {
        /// Map to analyze
        map: String,
    },

    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if cli.config.is_file() {
        AppConfig::from_file(&cli.config)
            .with_context(|| format!("loading config from {}", cli.config.display()))?
    } else {
        AppConfig::default()
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting tacmeta v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Clean { out_dir } => {
            let pool = config.pool_set();
            clean(&config.data_dir, &out_dir, &pool)?;
        }
        Commands::Recommend { map, role, exclude } => {
            let role: Option<Role> = role.as_deref().map(str::parse).transpose()?;
            let excluded: HashSet<String> = exclude.into_iter().collect();

            let dataset = load_data(&config)?;
            let ranked = best_agents_for_map(&dataset.graph, &map, &excluded, role)?;

            if ranked.is_empty() {
                println!("No agents to recommend for {}.", map);
            } else {
                println!("=== Best agents for {} ===", map);
                for (rank, agent) in ranked.iter().enumerate() {
                    println!("  {}. {} ({:.2})", rank + 1, agent.agent, agent.score);
                }
            }
        }
        Commands::Analyze { map } => {
            let dataset = load_data(&config)?;

            let side = best_side_for_map(&dataset.side_tree, &map)?;
            let buy = best_buy_for_map(&dataset.buy_tree, &map)?;

            println!("=== {} ===", map);
            println!("Side: {}", side);
            println!("Buy:  {}", buy.verdict());
        }
        Commands::Serve { host, port } => {
            let dataset = load_data(&config)?;
            let state = AppState::new(dataset);
            let app = build_router(state);

            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

fn load_data(config: &AppConfig) -> Result<Dataset> {
    let pool = config.pool_set();
    load_dataset(&config.data_dir, &pool)
        .with_context(|| format!("loading dataset from {}", config.data_dir.display()))
}

/// Clean the raw exports into flat derived CSVs.
fn clean(data_dir: &PathBuf, out_dir: &PathBuf, pool: &HashSet<String>) -> Result<()> {
    let pick_rate_files = ingest::discover_files(data_dir, "agents_pick_rates")?;
    let outcome_files = ingest::discover_files(data_dir, "teams_picked_agents")?;
    let pick_rates = ingest::load_pick_rates(&pick_rate_files, pool)?;
    let outcomes = ingest::load_outcomes(&outcome_files, pool)?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    ingest::write_pick_rates(&pick_rates, &out_dir.join("pick_rates.csv"))?;
    ingest::write_outcomes(&outcomes, &out_dir.join("outcomes.csv"))?;

    println!("=== Clean Results ===");
    println!("Pick rate records: {}", pick_rates.len());
    println!("Outcome records:   {}", outcomes.len());
    println!("Written to:        {}", out_dir.display());
    Ok(())
}
