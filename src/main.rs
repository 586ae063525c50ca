use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod app;

use app::App;
use stepwise::config::Config;
use stepwise::logging;
use stepwise::ui::terminal_guard::install_panic_hook;

#[derive(Parser)]
#[command(name = "stepwise")]
#[command(about = "Multi-step wizard for the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Keep the current step in the application instead of the wizard
    #[arg(long)]
    controlled: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the configured steps
    Steps,

    /// Write the effective configuration to .stepwise/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let is_tui_mode = cli.command.is_none();
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        Some(Commands::Steps) => cmd_steps(&config),
        Some(Commands::Init { force }) => cmd_init(&config, force),
        None => run_tui(config, cli.controlled, logging_handle.log_file_path).await,
    }
}

async fn run_tui(config: Config, controlled: bool, log_file_path: Option<PathBuf>) -> Result<()> {
    install_panic_hook();

    // Navigation hooks are !Send and run as local tasks
    let local = tokio::task::LocalSet::new();
    let result = local
        .run_until(async move {
            let mut app = App::new(config, controlled);
            app.run().await
        })
        .await;

    // Print log file path on exit if logs were written
    if let Some(log_path) = log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }

    result
}

fn cmd_steps(config: &Config) -> Result<()> {
    if config.steps.is_empty() {
        println!("No steps configured");
        return Ok(());
    }

    println!("Wizard steps ({})", config.steps.len());
    println!("{}", "─".repeat(40));
    for (index, step) in config.steps.iter().enumerate() {
        let marker = step
            .icon
            .clone()
            .unwrap_or_else(|| (index + 1).to_string());
        match &step.description {
            Some(description) => println!("{marker:>3}  {}  {description}", step.title),
            None => println!("{marker:>3}  {}", step.title),
        }
    }

    Ok(())
}

fn cmd_init(config: &Config, force: bool) -> Result<()> {
    let path = Config::project_config_path();
    if path.exists() && !force {
        println!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
        return Ok(());
    }

    config.save()?;
    println!("Wrote {}", path.display());
    Ok(())
}
