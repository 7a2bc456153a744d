//! Nalu Link - Main entrypoint.
//!
//! Loads configuration, initializes logging and runs one link operation (or
//! keeps the link service resident) against the configured store.

use clap::{Parser, Subcommand};
use nalu_link_lib::config::{ConfigLoader, LogConfig, NaluConfig, ENV_PREFIX};
use nalu_link_lib::data_structures::collision_resolver::ResolutionStrategy;
use nalu_link_lib::error::{NaluError, NaluResult};
use nalu_link_lib::service::{LinkService, MemoryLinkStore};
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Command line arguments for Nalu Link.
#[derive(Parser, Debug)]
#[clap(name = "Nalu Link", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Load the link store and keep the service resident until interrupted
    Start,

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },

    /// Shorten a URL
    Shorten {
        /// The URL to shorten
        url: String,

        /// Collision strategy: linear, regenerate or append
        #[clap(short, long)]
        strategy: Option<ResolutionStrategy>,
    },

    /// Resolve a short code and count the click
    Resolve {
        /// The short code
        code: String,
    },

    /// Search stored URLs by prefix
    Search {
        /// URL prefix
        prefix: String,

        /// Maximum number of results
        #[clap(short = 'n', long)]
        max_results: Option<usize>,
    },

    /// Show the most clicked links
    Top,

    /// Show data structure statistics
    Stats,

    /// Delete a short link
    Delete {
        /// The short code
        code: String,
    },
}

/// Initialize the logging system.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(log: &LogConfig) -> NaluResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(ErrorLayer::default());

    let result = if log.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_file(log.source_location)
                    .with_line_number(log.source_location),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr)
                    .with_file(log.source_location)
                    .with_line_number(log.source_location)
                    .with_thread_names(true),
            )
            .try_init()
    };

    result.map_err(|e| NaluError::Custom(format!("Failed to set global tracing subscriber: {e}")))
}

/// Opens the configured store and loads it into a fresh service.
async fn open_service(config: &NaluConfig) -> NaluResult<LinkService<MemoryLinkStore>> {
    let store = match &config.service.snapshot_path {
        Some(path) => MemoryLinkStore::open(path).await?,
        None => MemoryLinkStore::new(),
    };

    let service = LinkService::new(store, config);
    service.rehydrate().await?;
    Ok(service)
}

fn print_json<T: Serialize>(value: &T) -> NaluResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Main entry point for the application.
#[tokio::main]
async fn main() -> NaluResult<()> {
    let args = Args::parse();

    // An explicit --config must exist; the default location is optional.
    let loaded = match args.config.as_deref() {
        Some(path) => ConfigLoader::new(Some(path), ENV_PREFIX).load(),
        None => ConfigLoader::default().load_or_default(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            // Logging is not up yet; the configuration decides how it looks.
            eprintln!("Configuration error: {e}");
            process::exit(1);
        }
    };

    init_logging(&config.log)?;
    nalu_link_lib::init();

    match args.command.unwrap_or(Command::Start) {
        Command::Start => {
            info!(version = nalu_link_lib::VERSION, "Starting Nalu Link");
            let service = open_service(&config).await?;
            info!(
                base_url = %config.service.base_url,
                links = service.state().codes.lock().len(),
                "Link service ready, press Ctrl-C to stop"
            );

            tokio::signal::ctrl_c().await?;
            info!("Shutting down");
            service.store().save().await?;
            Ok(())
        }
        Command::Validate => {
            info!("Configuration validated successfully");
            Ok(())
        }
        Command::GenConfig { output } => {
            info!("Generating default configuration");

            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output, NaluConfig::default().to_toml()?)?;

            info!("Default configuration written to {:?}", output);
            Ok(())
        }
        Command::Shorten { url, strategy } => {
            let service = open_service(&config).await?;
            let outcome = service.shorten(&url, strategy).await?;
            service.store().save().await?;
            print_json(&outcome)
        }
        Command::Resolve { code } => {
            let service = open_service(&config).await?;
            match service.resolve_redirect(&code).await {
                Ok(url) => {
                    service.store().save().await?;
                    println!("{url}");
                    Ok(())
                }
                Err(e) if e.is_client_error() => {
                    tracing::error!("{e}");
                    process::exit(2);
                }
                Err(e) => Err(e),
            }
        }
        Command::Search {
            prefix,
            max_results,
        } => {
            let service = open_service(&config).await?;
            print_json(&service.search(&prefix, max_results))
        }
        Command::Top => {
            let service = open_service(&config).await?;
            print_json(&service.top_links())
        }
        Command::Stats => {
            let service = open_service(&config).await?;
            print_json(&service.stats())
        }
        Command::Delete { code } => {
            let service = open_service(&config).await?;
            let deleted = service.delete_link(&code).await?;
            service.store().save().await?;
            print_json(&serde_json::json!({ "code": code, "deleted": deleted }))
        }
    }
}
