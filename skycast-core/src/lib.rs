//! Core library for the `skycast` weather screen.
//!
//! This crate defines:
//! - The data access layer over the OpenWeather HTTP API
//! - Normalized models (current conditions, hourly forecast)
//! - The headless screen state driven by that layer
//! - Configuration & credentials handling
//!
//! It is used by `skycast-cli`, but can also back other front ends.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod screen;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use error::{Endpoint, WeatherFetchError};
pub use model::{CurrentConditions, HourlyForecastEntry, WeatherReport};
pub use provider::{
    WeatherProvider, fetch_weather_report, openweather::OpenWeatherProvider, provider_from_config,
};
pub use screen::{RefreshOutcome, ScreenState, Theme, WeatherScreen};
