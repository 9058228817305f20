use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, Text};
use teloxide::Bot;
use tracing::info;
use weather_core::{Config, MessageRouter, OpenWeatherClient, TextFormat, WeatherProvider, render};

use crate::{logging, telegram};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-bot", version, about = "Telegram weather bot")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start polling Telegram (the default).
    Run,

    /// Store the bot token and weather API key in the config file.
    Configure,

    /// Look up a city once and print the report.
    Show {
        /// City name; several words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Run) {
            Command::Run => {
                let config = load_config(self.config.as_deref())?;
                run_bot(config).await
            }
            Command::Configure => configure(self.config),
            Command::Show { city } => {
                let config = load_config(self.config.as_deref())?;
                let client = OpenWeatherClient::new(config.weather_context()?);
                let result = client.fetch(&city.join(" ")).await;
                println!("{}", render(&result, TextFormat::Plain));
                Ok(())
            }
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply_env();
    Ok(config)
}

async fn run_bot(config: Config) -> anyhow::Result<()> {
    let log_file = config.log_file();
    logging::init_tracing(&log_file)?;

    let token = config.bot_token()?.to_string();
    let client = OpenWeatherClient::new(config.weather_context()?);
    info!(
        start_time = %chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        log_file = %log_file.display(),
        base_url = %client.context().base_url,
        "Starting weather bot"
    );

    let router = MessageRouter::new(Arc::new(client));
    telegram::run(Bot::new(token), router).await;

    Ok(())
}

fn configure(path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = match &path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let token = Password::new("Telegram bot token:")
        .without_confirmation()
        .prompt()
        .context("Failed to read bot token")?;
    let api_key = Text::new("OpenWeather API key:")
        .prompt()
        .context("Failed to read API key")?;

    config.set_bot_token(token.trim().to_string());
    config.upsert_provider_api_key(api_key.trim().to_string());

    let saved_to = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };
    println!("Configuration saved to {}", saved_to.display());

    Ok(())
}
