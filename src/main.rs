//! grapheus - CLI entry point.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use grapheus::config::Config;
use grapheus::pipeline::{self, RunOptions};

/// Generate a commit message for staged changes using an AI provider.
#[derive(Parser, Debug)]
#[command(name = "grapheus")]
#[command(about = "Generate commit messages for staged changes using an AI provider")]
#[command(version)]
struct Cli {
    /// Skip confirmation: accept the generated message and commit (no push)
    #[arg(short = 'y', long)]
    yes: bool,

    /// Print the generated message without committing
    #[arg(long)]
    dry_run: bool,

    /// Push after committing without asking
    #[arg(long)]
    push: bool,

    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(short = 'v', long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Show the commit message rules for the active style
    Rules,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Set a configuration key
    Set { key: String, value: String },
    /// Show the current configuration
    Show,
    /// Reset configuration to defaults
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();

    match cli.command {
        Some(Commands::Config { action }) => run_config(action, config),
        Some(Commands::Rules) => {
            println!("{}", config.style.rules());
            Ok(())
        }
        None => {
            let opts = RunOptions {
                yes: cli.yes,
                dry_run: cli.dry_run,
                push: cli.push,
            };
            pipeline::run(&config, opts).await
        }
    }
}

/// Log filter: an explicit `RUST_LOG` wins; otherwise `--verbose` selects
/// debug output for this crate and the default stays at warnings.
fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "grapheus=debug" } else { "warn" }))
}

fn run_config(action: ConfigAction, mut config: Config) -> Result<()> {
    match action {
        ConfigAction::Set { key, value } => {
            config.set(&key, &value)?;
            config.save()?;
            println!("Set {key} = {value}");
        }
        ConfigAction::Show => {
            println!("provider:     {}", config.provider);
            println!("model:        {}", config.model);
            println!("style:        {}", config.style);
            println!("max_tokens:   {}", config.max_tokens);
            println!("auto_push:    {}", config.auto_push);
            println!(
                "custom_rules: {}",
                config.custom_rules.as_deref().unwrap_or("(none)")
            );
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("Configuration reset to defaults");
        }
    }
    Ok(())
}
