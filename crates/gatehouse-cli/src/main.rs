use anyhow::Context;
use clap::{Parser, Subcommand};
use gatehouse_core::GatehouseConfig;
use gatehouse_token::UMA_PROTECTION_SCOPE;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod audit;
mod commands;

#[derive(Parser, Debug)]
#[command(name = "gatehouse", version, about = "Gatehouse authentication decision engine")]
struct Cli {
    /// Path to gatehouse.yaml
    #[arg(long, short, env = "GATEHOUSE_CONFIG", default_value = "gatehouse.yaml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the configuration (ids, patterns, provider references).
    Check,

    /// Decide whether a principal must pass multifactor authentication for a service.
    Resolve {
        /// Registered service id
        #[arg(long)]
        service: u64,

        /// Principal id
        #[arg(long)]
        principal: String,

        /// Principal attribute as name=value; repeat for multiple values
        #[arg(long = "attr", value_parser = commands::resolve::parse_attribute)]
        attributes: Vec<(String, String)>,
    },

    /// Validate a bearer access token and print the caller profile.
    Validate {
        /// Raw bearer token value
        #[arg(long)]
        token: String,

        /// Scope the token must carry
        #[arg(long, default_value = UMA_PROTECTION_SCOPE)]
        scope: String,
    },
}

fn load_config(path: &Path) -> anyhow::Result<GatehouseConfig> {
    GatehouseConfig::load_with_context(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Check => commands::check::run_check(&cli.config)?,

        Command::Resolve {
            service,
            principal,
            attributes,
        } => {
            let config = load_config(&cli.config)?;
            let sink = audit::sink_for(&config.audit);
            let resolution =
                commands::resolve::run_resolve(&config, service, &principal, &attributes, sink.as_ref())?;
            println!("{}", serde_json::to_string_pretty(&resolution)?);
        }

        Command::Validate { token, scope } => {
            let config = load_config(&cli.config)?;
            let sink = audit::sink_for(&config.audit);
            let profile = commands::validate::run_validate(&config, &token, &scope, sink.as_ref())?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
    }

    Ok(())
}
