use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use feed_core::Preset;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agentic_feed::config::FeedConfig;
use agentic_feed::feed_cli::{self, ShowArgs};
use agentic_feed::version;

#[derive(Parser)]
#[command(name = "agentic-feed")]
#[command(about = "Read-only viewer for the curated agentic social feed")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the ranked feed
    Show(ShowArgs),
    /// List the presets, tags, imprints, and personas available for filtering
    Facets {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Open the interactive feed dashboard
    Browse {
        /// Starting weight preset
        #[arg(short, long, default_value_t = Preset::Balanced)]
        preset: Preset,
        /// Drop the random serendipity term
        #[arg(long)]
        no_serendipity: bool,
    },
    /// Show version
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = FeedConfig::resolve(cli.config.as_deref())
        .with_context(|| "Failed to load configuration")?;

    let command = cli.command.unwrap_or(Commands::Show(ShowArgs::default()));

    // The dashboard owns the terminal, so fetch warnings go to its footer
    let level = match command {
        _ if cli.verbose => "debug",
        Commands::Browse { .. } => "error",
        _ => config.logging.level.as_str(),
    };
    init_logging(level)?;

    config
        .validate()
        .with_context(|| "Configuration validation failed")?;

    match command {
        Commands::Show(args) => feed_cli::handle_show(&config, &args),
        Commands::Facets { json } => feed_cli::handle_facets(&config, json),
        Commands::Browse {
            preset,
            no_serendipity,
        } => feed_cli::handle_browse(&config, preset, no_serendipity),
        Commands::Version => {
            println!("agentic-feed {}", version::current());
            if cli.verbose {
                println!("release tag: {}", version::current_tag());
            }
            Ok(())
        }
    }
}

fn init_logging(level: &str) -> Result<()> {
    let filter = match level.to_lowercase().as_str() {
        "error" => tracing::Level::ERROR,
        "warn" => tracing::Level::WARN,
        "info" => tracing::Level::INFO,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter.to_string())),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .init();

    Ok(())
}
