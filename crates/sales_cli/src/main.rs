mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "salesops")]
#[command(version, about = "NYC rolling-sales data-quality pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging and per-violation diagnostics
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a raw CSV export and write the cleaned dataset
    Clean {
        /// Raw CSV file (overrides the config file)
        #[arg(env = "SALES_SOURCE")]
        source: Option<String>,

        /// Destination of the cleaned CSV (overrides the config file)
        #[arg(short, long, env = "SALES_DESTINATION")]
        output: Option<String>,

        /// Pipeline configuration file (YAML or TOML)
        #[arg(short, long)]
        config: Option<String>,

        /// Rule set file (YAML or TOML); the built-in NYC rules are used otherwise
        #[arg(long)]
        rules: Option<String>,

        /// Retries after a failed attempt (overrides the config file)
        #[arg(long)]
        retries: Option<u32>,

        /// Seconds between attempts (overrides the config file)
        #[arg(long)]
        retry_delay: Option<u64>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Check a pipeline configuration file without running it
    Check {
        /// Path to the configuration file (YAML or TOML)
        config: String,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List the ordered validity rules
    Rules {
        /// Rule set file (YAML or TOML); the built-in NYC rules are listed otherwise
        #[arg(long)]
        rules: Option<String>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    // Execute command
    match cli.command {
        Commands::Clean {
            source,
            output,
            config,
            rules,
            retries,
            retry_delay,
            format,
        } => {
            let options = commands::clean::CleanOptions {
                source,
                destination: output,
                config,
                rules,
                retries,
                retry_delay,
                verbose: cli.verbose,
            };
            commands::clean::execute(options, &format).await
        }

        Commands::Check { config, format } => commands::check::execute(&config, &format).await,

        Commands::Rules { rules, format } => {
            commands::rules::execute(rules.as_deref(), &format).await
        }
    }
}
