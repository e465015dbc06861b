//! Intern Rewards CLI
//!
//! Terminal client for the Intern Rewards dashboard.

mod commands;
mod style;
mod wizard;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use intern_rewards::{Config, Dashboard, MemoryAuthGateway, MemoryStore, RestAuthGateway, RestStore};
use style::*;

const BANNER: &str = r#"
  ██╗███╗   ██╗████████╗███████╗██████╗ ███╗   ██╗
  ██║████╗  ██║╚══██╔══╝██╔════╝██╔══██╗████╗  ██║
  ██║██╔██╗ ██║   ██║   █████╗  ██████╔╝██╔██╗ ██║
  ██║██║╚██╗██║   ██║   ██╔══╝  ██╔══██╗██║╚██╗██║
  ██║██║ ╚████║   ██║   ███████╗██║  ██║██║ ╚████║
  ╚═╝╚═╝  ╚═══╝   ╚═╝   ╚══════╝╚═╝  ╚═╝╚═╝  ╚═══╝
"#;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "intern")]
#[command(version)]
#[command(about = "Intern Rewards - track your fundraising and unlock rewards", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Run against an in-process store with a demo rewards catalog
    #[arg(long, global = true)]
    local: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive sign-in and dashboard (default)
    #[command(visible_aliases = ["w"])]
    Wizard,

    /// Show your dashboard once and exit
    #[command(visible_alias = "d")]
    Dashboard,

    /// View the leaderboard
    #[command(visible_alias = "lb")]
    Leaderboard {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Rename your profile (the public leaderboard entry follows)
    Rename {
        /// New display name
        name: String,
    },

    /// Show resolved configuration
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt().with_env_filter("info").init();
    }

    // Default to the interactive wizard if no command specified
    let command = cli.command.unwrap_or(Commands::Wizard);

    if let Err(e) = run(command, cli.local).await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(command: Commands, local: bool) -> Result<()> {
    let config = Config::load()?;

    if let Commands::Config = command {
        return commands::config::run(&config, local);
    }

    let dashboard = build_dashboard(&config, local).await?;

    match command {
        Commands::Wizard => {
            print_banner();
            wizard::run_login_wizard(&dashboard, &config).await
        }
        Commands::Dashboard => {
            require_session(&dashboard, &config).await?;
            commands::dashboard::render(&dashboard).await
        }
        Commands::Leaderboard { limit } => {
            require_session(&dashboard, &config).await?;
            commands::leaderboard::render(&dashboard, limit).await
        }
        Commands::Rename { name } => {
            require_session(&dashboard, &config).await?;
            commands::rename::run(&dashboard, &name).await
        }
        Commands::Config => unreachable!("handled above"),
    }
}

/// One dashboard per invocation; gateway and store handles are constructed
/// here and injected, never held as globals.
async fn build_dashboard(config: &Config, local: bool) -> Result<Dashboard> {
    let tenant = config.tenant_id();

    if local {
        let store = MemoryStore::new();
        store
            .seed_demo_catalog(&tenant)
            .await
            .context("Failed to seed demo catalog")?;
        Ok(Dashboard::new(
            Arc::new(MemoryAuthGateway::new()),
            Arc::new(store),
            tenant,
        ))
    } else {
        let gateway = RestAuthGateway::new(&config.auth_url(), &config.auth_api_key());
        let store = RestStore::new(&config.store_url(), config.store_refresh());
        Ok(Dashboard::new(Arc::new(gateway), Arc::new(store), tenant))
    }
}

/// Non-interactive commands sign in with the pre-provisioned session token.
async fn require_session(dashboard: &Dashboard, config: &Config) -> Result<()> {
    let token = config.session_token().context(
        "No session token. Run `intern` for interactive sign-in, or set INTERN_SESSION_TOKEN",
    )?;
    if !dashboard.restore(&token).await {
        anyhow::bail!("Session restoration failed: the auth gateway rejected the token");
    }
    Ok(())
}

pub fn print_banner() {
    println!("{}", cyan(BANNER));
    println!(
        "  {} {}",
        dim("Intern Rewards"),
        dim(&format!("v{}", VERSION))
    );
    println!();
}
