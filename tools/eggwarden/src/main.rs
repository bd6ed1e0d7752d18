//! Eggwarden - repair tool for Pterodactyl panel databases
//!
//! Finds servers whose startup command drifted from their egg's and
//! transfers that never recorded an outcome, and fixes them one operator
//! confirmation at a time.

mod config;
mod menu;
mod render;
mod terminal;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use panel_reconcile::{EggId, SqlPanelStore};
use tracing::info;

use crate::config::{AppConfig, DatabaseOverrides};
use crate::render::Output;
use crate::terminal::TerminalChannel;

const SHUTDOWN_MESSAGE: &str = "Terminating the application...";

#[derive(Parser)]
#[command(name = "eggwarden")]
#[command(about = "Eggwarden - Pterodactyl panel repair tool")]
#[command(long_about = "Eggwarden - Pterodactyl panel repair tool

Commands:
  startup     Compare every server of an egg against the egg's startup command
  transfers   Find and delete transfers that never completed
  menu        Interactive menu (default)

Connection settings come from eggwarden.toml, EGGWARDEN_DATABASE__* variables
and the flags below; anything missing is asked for before connecting.

Examples:
  eggwarden                              # Interactive menu
  eggwarden startup 7                    # Check servers of egg 7
  eggwarden --host db.internal transfers # Repair stuck transfers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Print the final report as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Configuration file, TOML or YAML (default: ./eggwarden.toml if present)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// MySQL host
    #[arg(long, global = true)]
    host: Option<String>,

    /// MySQL port
    #[arg(long, global = true)]
    port: Option<u16>,

    /// MySQL username
    #[arg(short = 'u', long = "user", global = true)]
    user: Option<String>,

    /// Panel database name
    #[arg(long, global = true)]
    database: Option<String>,

    /// Never prompt for connection settings; use defaults for anything unset
    #[arg(long, global = true)]
    no_prompt: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check servers of one egg against the egg's startup command
    Startup {
        /// Egg ID
        egg_id: EggId,
    },

    /// Find and delete stuck server transfers
    Transfers,

    /// Interactive menu
    Menu,
}

impl Cli {
    fn connection_flags(&self) -> DatabaseOverrides {
        DatabaseOverrides {
            host: self.host.clone(),
            port: self.port,
            username: self.user.clone(),
            password: None,
            database: self.database.clone(),
        }
    }
}

fn print_banner() {
    println!();
    println!(
        "{}",
        "╔════════════════════════════════════════════════════╗".bright_blue()
    );
    println!(
        "{}",
        "║                                                    ║".bright_blue()
    );
    println!(
        "{}",
        "║                     EGGWARDEN                      ║".bright_blue()
    );
    println!(
        "{}",
        "║                                                    ║".bright_blue()
    );
    println!(
        "{}",
        "║   Startup and transfer repair for Pterodactyl      ║".bright_blue()
    );
    println!(
        "{}",
        "║                                                    ║".bright_blue()
    );
    println!(
        "{}",
        "╚════════════════════════════════════════════════════╝".bright_blue()
    );
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configure colored output
    if cli.no_color {
        colored::control::set_override(false);
    }
    let output = Output {
        json: cli.json,
        color: !cli.no_color,
    };

    common::logging::init_cli_logging(cli.verbose, output.color)?;

    // Signals end the process right away, mid-prompt included
    common::shutdown::exit_on_signal(SHUTDOWN_MESSAGE, 0);

    if output.color && !output.json {
        print_banner();
    }

    let theme: Box<dyn Theme> = if output.color {
        Box::new(ColorfulTheme::default())
    } else {
        Box::new(SimpleTheme)
    };

    let app_config = AppConfig::load(cli.config.as_deref(), cli.connection_flags())?;
    let db_config = if cli.no_prompt {
        app_config.database.with_defaults()
    } else {
        app_config.database.prompt_missing(theme.as_ref())?
    };

    info!("Connecting to {}", db_config.target());
    let store = SqlPanelStore::connect(&db_config.connection_url()?)
        .await
        .with_context(|| format!("Failed to connect to {}", db_config.target()))?;
    output.line("Connected to MySQL server successfully!".green());

    let mut channel = TerminalChannel::new(output);
    let outcome = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Startup { egg_id } => {
            menu::check_startup(&store, &mut channel, egg_id, output).await
        },
        Commands::Transfers => menu::repair_transfers(&store, &mut channel, output).await,
        Commands::Menu => menu::run(&store, &mut channel, theme.as_ref(), output).await,
    };

    store.close().await;
    outcome
}
