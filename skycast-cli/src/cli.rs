use anyhow::Context;
use chrono::{Local, Timelike};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{InquireError, Password, Text};
use log::debug;
use skycast_core::{
    Config, OpenWeatherProvider, Theme, WeatherScreen, fetch_weather_report,
    provider::openweather::DEFAULT_LANGUAGE, provider_from_config, screen::INVALID_CITY_MESSAGE,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "City weather in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and screen defaults.
    Configure,

    /// Show current conditions and the hourly forecast for a city.
    Show {
        /// City name; the configured default city if absent.
        city: Option<String>,

        /// Print the report as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Number of forecast entries to print.
        #[arg(long, default_value_t = 8)]
        hours: usize,

        /// Force a theme instead of picking one from the clock.
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,
    },

    /// Keep a screen open and search cities one after another.
    Interactive {
        /// Number of forecast entries to print.
        #[arg(long, default_value_t = 8)]
        hours: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeArg {
    Day,
    Night,
}

impl From<ThemeArg> for Theme {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Day => Theme::Day,
            ThemeArg::Night => Theme::Night,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, json, hours, theme } => show(city, json, hours, theme).await,
            Command::Interactive { hours } => interactive(hours).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("API key prompt aborted")?;
    cfg.set_api_key(&api_key);

    let city = Text::new("Default city:").with_default(cfg.default_city()).prompt()?;
    cfg.default_city = Some(city.trim().to_string()).filter(|c| !c.is_empty());

    let language = cfg.language.clone().unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    let language = Text::new("Description language:").with_default(&language).prompt()?;
    cfg.language = Some(language.trim().to_string()).filter(|l| !l.is_empty());

    cfg.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn show(
    city: Option<String>,
    json: bool,
    hours: usize,
    theme: Option<ThemeArg>,
) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let provider = load_provider(&cfg)?;
    let city = city.unwrap_or_else(|| cfg.default_city().to_string());

    let report = fetch_weather_report(&provider, &city)
        .await
        .map_err(|e| anyhow::Error::new(e).context(INVALID_CITY_MESSAGE))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let theme = theme.map(Theme::from).unwrap_or_else(|| Theme::for_hour(Local::now().hour()));
    print!("{}", render::render_report(&report, theme, hours));

    Ok(())
}

async fn interactive(hours: usize) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let provider = load_provider(&cfg)?;

    let mut screen = WeatherScreen::with_city(provider, cfg.default_city());
    screen.mount(Local::now().naive_local()).await;
    show_screen(&mut screen, hours);

    loop {
        let input = Text::new("City:")
            .with_help_message(":theme toggles day/night, :quit exits")
            .prompt();

        match input {
            Ok(input) => match input.trim() {
                ":quit" | ":q" => break,
                ":theme" => screen.toggle_theme(),
                city => {
                    screen.search(city).await;
                }
            },
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        }

        show_screen(&mut screen, hours);
    }

    Ok(())
}

fn load_provider(cfg: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let provider = provider_from_config(cfg)?;
    debug!("Using {provider:?}");
    Ok(provider)
}

fn show_screen(screen: &mut WeatherScreen<OpenWeatherProvider>, hours: usize) {
    if screen.state().error_visible {
        if let Some(error) = &screen.state().error {
            eprintln!("{}", render::render_error(error));
        }
        screen.dismiss_error();
    }

    print!("{}", render::render_screen(screen.state(), hours));
}
