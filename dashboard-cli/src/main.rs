mod commands;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use api_client::{ClientConfig, FileDeckClient};
use clap::{Parser, Subcommand};
use shared::observability::{init_logging, LogConfig, LogFormat, LogLevel};
use tracing::debug;

use crate::commands::{dashboard::DashboardCmd, files::FilesCmd, projects::ProjectsCmd, users::UsersCmd};
use crate::output::Output;

#[derive(Parser, Debug)]
#[command(name = "filedeck", version, about = "FileDeck dashboard from the terminal")]
struct Args {
    /// Config file (defaults to ~/.config/filedeck/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Sign in with an emailed one-time password
    Login {
        email: String,
        /// Code already received; skips requesting a new one
        #[arg(long)]
        otp: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    Files {
        #[command(subcommand)]
        cmd: FilesCmd,
    },
    Projects {
        #[command(subcommand)]
        cmd: ProjectsCmd,
    },
    Users {
        #[command(subcommand)]
        cmd: UsersCmd,
    },
    Dashboard {
        #[command(subcommand)]
        cmd: DashboardCmd,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ClientConfig::load(args.config.as_deref()).context("load configuration")?;
    init_logging(log_config(&config, args.verbose)?).context("initialize logging")?;
    debug!("Using API at {}", config.api.base_url);

    let client = FileDeckClient::with_file_session(&config).context("create API client")?;
    let out = Output::new(args.json);

    match args.cmd {
        Cmd::Login { email, otp } => commands::auth::login(&client, &email, otp).await,
        Cmd::Logout => commands::auth::logout(&client),
        Cmd::Whoami => commands::auth::whoami(&client, &out),
        Cmd::Files { cmd } => commands::files::run(&client, cmd, &out).await,
        Cmd::Projects { cmd } => commands::projects::run(&client, cmd, &out).await,
        Cmd::Users { cmd } => commands::users::run(&client, cmd, &out).await,
        Cmd::Dashboard { cmd } => commands::dashboard::run(&client, cmd, &out).await,
    }
}

fn log_config(config: &ClientConfig, verbose: bool) -> Result<LogConfig> {
    let level = if verbose {
        LogLevel::Debug
    } else {
        config.logging.level.parse::<LogLevel>()?
    };
    let format = config.logging.format.parse::<LogFormat>()?;

    Ok(LogConfig {
        level,
        format,
        ..LogConfig::default()
    })
}
