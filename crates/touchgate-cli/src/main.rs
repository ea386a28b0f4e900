//! touchgate - probe the biometric sensor and run one authentication attempt

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use touchgate_core::{
    config::CONFIG_ENV, Advisory, AuthController, BiometricProvider, CapabilityProber,
    CommandProvider, GateConfig, UnsupportedProvider,
};

/// touchgate - device-local biometric authentication gate
#[derive(Parser)]
#[command(name = "touchgate")]
#[command(about = "Check biometric capabilities and authenticate with the device sensor")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file
    #[arg(long, global = true, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Biometric backend to use
    #[arg(long, global = true, value_enum, default_value_t = Backend::Command)]
    backend: Backend,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// External helper commands from the config file
    Command,
    /// No biometric support
    Unsupported,
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether a sensor is present and a credential is enrolled
    Probe {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a single authentication attempt
    Auth {
        /// Override the prompt message
        #[arg(long)]
        prompt: Option<String>,

        /// Allow the device to fall back to its passcode
        #[arg(long)]
        allow_fallback: bool,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration file commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "touchgate=info,touchgate_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(GateConfig::default_path);

    match cli.command {
        Commands::Probe { json } => {
            let config = load_config(&config_path)?;
            let provider = build_provider(cli.backend, &config);
            let capabilities = CapabilityProber::new(provider).probe().await;

            if json {
                println!("{}", serde_json::to_string_pretty(&capabilities)?);
            } else {
                println!(
                    "Biometric hardware: {}",
                    yes_no(capabilities.hardware_supported())
                );
                println!("Credential enrolled: {}", yes_no(capabilities.enrolled()));
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Auth {
            prompt,
            allow_fallback,
            json,
        } => {
            let mut config = load_config(&config_path)?;
            if let Some(prompt) = prompt {
                config.prompt_message = prompt;
            }
            if allow_fallback {
                config.allow_device_fallback = true;
            }
            config.validate()?;

            let provider = build_provider(cli.backend, &config);
            let controller = AuthController::start(provider, config.challenge_request()).await;
            let session = controller.handle();

            let outcome = controller.authenticate().await;
            let advisory = Advisory::from_outcome(&outcome);

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{}", advisory);
                if session.is_authenticated().await {
                    println!("Signed in");
                } else {
                    println!("Not signed in");
                }
            }

            Ok(if advisory.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Commands::Config(ConfigCommands::Init { force }) => {
            if config_path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    config_path.display()
                );
            }
            GateConfig::default()
                .save(&config_path)
                .with_context(|| format!("writing {}", config_path.display()))?;
            info!("Wrote default config to {}", config_path.display());
            Ok(ExitCode::SUCCESS)
        }

        Commands::Config(ConfigCommands::Show) => {
            let config = load_config(&config_path)?;
            println!("# {}", config_path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(path: &Path) -> Result<GateConfig> {
    GateConfig::load_or_default(path).with_context(|| format!("loading {}", path.display()))
}

fn build_provider(backend: Backend, config: &GateConfig) -> Arc<dyn BiometricProvider> {
    match backend {
        Backend::Command => Arc::new(CommandProvider::new(config.provider.clone())),
        Backend::Unsupported => Arc::new(UnsupportedProvider),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
