use crate::{
    Config, CurrentConditions, HourlyForecastEntry, WeatherFetchError, WeatherReport,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

pub mod openweather;

/// Read-only access to a weather provider, keyed by free-text city name.
///
/// Each call is one independent round trip: nothing is cached and nothing
/// is retried.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current_conditions(
        &self,
        city: &str,
    ) -> Result<CurrentConditions, WeatherFetchError>;

    /// Forecast entries in the order the provider returned them.
    async fn fetch_hourly_forecast(
        &self,
        city: &str,
    ) -> Result<Vec<HourlyForecastEntry>, WeatherFetchError>;
}

/// Fetch current conditions and forecast concurrently.
///
/// Fails as a whole if either request fails.
pub async fn fetch_weather_report<P>(
    provider: &P,
    city: &str,
) -> Result<WeatherReport, WeatherFetchError>
where
    P: WeatherProvider + ?Sized,
{
    let (current, hourly) = tokio::try_join!(
        provider.fetch_current_conditions(city),
        provider.fetch_hourly_forecast(city),
    )?;

    Ok(WeatherReport { current, hourly })
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    provider_with_key(config.api_key(), config)
}

/// Like `provider_from_config`, with the API key already resolved.
pub fn provider_with_key(
    api_key: Option<String>,
    config: &Config,
) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = api_key.ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `skycast configure` or set the {} environment variable.",
            crate::config::API_KEY_ENV
        )
    })?;

    let mut provider = OpenWeatherProvider::new(api_key).with_label_offset(config.label_offset()?);

    if let Some(base_url) = &config.base_url {
        provider = provider.with_base_url(base_url);
    }
    if let Some(language) = &config.language {
        provider = provider.with_language(language);
    }
    if let Some(secs) = config.timeout_secs {
        provider = provider.with_timeout(Duration::from_secs(secs));
    }

    Ok(provider)
}
