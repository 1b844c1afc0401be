use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Select, Text};
use skycast_core::{
    Config, MemoryTarget, RenderPolicy, RenderTarget, ViewController, with_target,
    clock::{self, CLOCK_PERIOD},
};

use crate::terminal::TerminalTarget;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Current weather and 7-day forecast")]
pub struct Cli {
    /// Log pipeline steps to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the weather for a place once.
    Show {
        /// Place name; defaults to the configured default query.
        query: Option<String>,

        /// Print the display model as JSON instead of the widget.
        #[arg(long)]
        json: bool,
    },

    /// Show the default place, then keep prompting for new places.
    Watch,

    /// Interactively edit the configuration.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Show { query, json } => {
                let query = query.unwrap_or_else(|| config.default_query.clone());
                if json {
                    show_json(&config, &query).await
                } else {
                    show(&config, &query).await
                }
            }
            Command::Watch => watch(&config).await,
            Command::Configure => configure(config),
        }
    }
}

async fn show(config: &Config, query: &str) -> anyhow::Result<()> {
    let target = Arc::new(Mutex::new(TerminalTarget::stdout()));
    let controller = ViewController::from_config(config, target)?;

    stamp_clock(&controller);
    controller.start(query).await;
    Ok(())
}

async fn show_json(config: &Config, query: &str) -> anyhow::Result<()> {
    let target = Arc::new(Mutex::new(MemoryTarget::default()));
    let controller = ViewController::from_config(config, target)?;

    let report = controller.search(query).await;
    let json = serde_json::to_string_pretty(&report.view)
        .context("Failed to serialize forecast to JSON")?;
    println!("{json}");
    Ok(())
}

async fn watch(config: &Config) -> anyhow::Result<()> {
    let target = Arc::new(Mutex::new(TerminalTarget::stdout()));
    let controller = ViewController::from_config(config, target.clone())?;

    let ticker = tokio::spawn(clock::run_clock(target, CLOCK_PERIOD));

    controller.start(&config.default_query).await;
    let mut last = config.default_query.clone();

    loop {
        let default = last.clone();
        let answer = tokio::task::spawn_blocking(move || {
            Text::new("Search:").with_default(&default).prompt()
        })
        .await
        .context("Prompt task failed")?;

        match answer {
            Ok(query) => {
                controller.search(&query).await;
                last = query;
            }
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => {
                ticker.abort();
                return Err(e).context("Failed to read search query");
            }
        }
    }

    ticker.abort();
    Ok(())
}

fn stamp_clock<T: RenderTarget + 'static>(controller: &ViewController<T>) {
    let time = clock::now();
    with_target(controller.target(), |t| t.set_clock(&time));
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    config.default_query = Text::new("Default place:")
        .with_default(&config.default_query)
        .prompt()
        .context("Failed to read default place")?;

    let policies = RenderPolicy::all();
    let start = policies.iter().position(|p| *p == config.render_policy).unwrap_or(0);
    config.render_policy =
        Select::new("Render policy for overlapping searches:", policies.to_vec())
            .with_starting_cursor(start)
            .with_help_message(
                "latest-request: newest search wins; last-completed: last to finish wins",
            )
            .prompt()
            .context("Failed to read render policy")?;

    let timeout = Text::new("Request timeout in seconds (empty for none):")
        .with_default(&config.timeout_secs.map(|s| s.to_string()).unwrap_or_default())
        .prompt()
        .context("Failed to read timeout")?;
    config.timeout_secs = match timeout.trim() {
        "" => None,
        secs => Some(
            secs.parse::<u64>().with_context(|| format!("Invalid timeout '{secs}'"))?,
        ),
    };

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
