use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use voxtube_core::config::{Config, LoggingConfig};
use voxtube_core::types::SkillReply;
use voxtube_gateway::GatewayState;
use voxtube_skill::{Skill, SkillResponse};

#[derive(Parser)]
#[command(
    name = "voxtube",
    about = "Voice skill backend that finds and plays YouTube audio",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the skill endpoint
    Serve {
        /// Port to listen on (default: 18790)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run one search through the pipeline and print the response
    Search {
        /// Search terms
        #[arg(required = true)]
        terms: Vec<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show configuration summary
    Status,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Check configuration for problems
    Validate,
}

fn init_logging(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose {
        "debug".to_string()
    } else {
        logging.level.clone().unwrap_or_else(|| "info".to_string())
    };
    let mut directives = vec![level];
    directives.extend(logging.filters.iter().cloned());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives.join(",")));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match (logging.format.as_str(), logging.output.as_str()) {
        ("json", "stdout") => builder.json().with_writer(std::io::stdout).init(),
        ("json", _) => builder.json().with_writer(std::io::stderr).init(),
        (_, "stdout") => builder.with_writer(std::io::stdout).init(),
        _ => builder.with_writer(std::io::stderr).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)?;

    init_logging(&config.logging.clone().unwrap_or_default(), cli.verbose);

    match cli.command {
        Commands::Serve { port } => {
            let (warnings, errors) = config.validate();
            for warning in &warnings {
                tracing::warn!("{warning}");
            }
            if !errors.is_empty() {
                anyhow::bail!("Invalid configuration: {}", errors.join("; "));
            }

            let port = port.unwrap_or_else(|| config.gateway_port());
            let state = GatewayState::from_config(Arc::new(config))?;

            #[cfg(feature = "metrics")]
            let state = state.with_metrics(voxtube_gateway::metrics::install_prometheus_recorder()?);

            tracing::info!("Starting Voxtube on port {port}");
            voxtube_gateway::start_gateway(Arc::new(state), port).await?;
        }
        Commands::Search { terms } => {
            let terms = terms.join(" ");
            let skill = Skill::from_config(&config)?;
            let reply: SkillReply = skill.pipeline().fulfill_search(&terms).await.into();
            let json = serde_json::to_string_pretty(&SkillResponse::from(&reply))?;
            println!("{json}");
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let json = serde_json::to_string_pretty(&config.redacted())?;
                println!("{json}");
            }
            ConfigAction::Validate => {
                let (warnings, errors) = config.validate();
                for warning in &warnings {
                    println!("warning: {warning}");
                }
                for error in &errors {
                    println!("error: {error}");
                }
                if !errors.is_empty() {
                    anyhow::bail!("{} configuration error(s)", errors.len());
                }
                println!("Configuration OK");
            }
        },
        Commands::Status => {
            let search = config.search();
            println!("Voxtube v{}", env!("CARGO_PKG_VERSION"));
            println!("Config: {}", config_path.display());
            println!("Search API: {}", search.base_url);
            println!(
                "Search API key: {}",
                if search.resolve_api_key().is_some() { "configured" } else { "missing" }
            );
            println!("Resolver: {}", config.resolver().url);
            println!("Listen: {}:{}", config.gateway_bind(), config.gateway_port());
        }
    }

    Ok(())
}
