use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::{fmt, time::Duration};

use crate::{
    error::{Endpoint, WeatherFetchError},
    model::{CurrentConditions, HourlyForecastEntry},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";
pub const DEFAULT_LANGUAGE: &str = "tr";
/// Offset used for forecast time labels (Europe/Istanbul, no DST).
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 180;

#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
    base_url: String,
    icon_base_url: String,
    language: String,
    label_offset: FixedOffset,
    timeout: Option<Duration>,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            icon_base_url: DEFAULT_ICON_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            label_offset: offset_from_minutes(DEFAULT_UTC_OFFSET_MINUTES)
                .unwrap_or_else(|| Utc.fix()),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_label_offset(mut self, offset: FixedOffset) -> Self {
        self.label_offset = offset;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        city: &str,
    ) -> Result<T, WeatherFetchError> {
        let fail = |source: anyhow::Error| WeatherFetchError::new(city, endpoint, source);

        if city.trim().is_empty() {
            return Err(fail(anyhow!("City name must not be empty")));
        }

        let url = format!("{}/{}", self.base_url, endpoint_path(endpoint));
        debug!("GET {url} (q={city}, lang={})", self.language);

        let mut req = self.http.get(&url).query(&[
            ("q", city),
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
            ("lang", self.language.as_str()),
        ]);
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        let res = req
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({endpoint})"))
            .map_err(fail)?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {endpoint} response body"))
            .map_err(|e| fail(e).with_status(status.as_u16()))?;

        debug!("OpenWeather {endpoint} answered {status} ({} bytes)", body.len());

        if !status.is_success() {
            return Err(fail(anyhow!(
                "OpenWeather {endpoint} request failed with status {status}: {}",
                describe_error_body(&body),
            ))
            .with_status(status.as_u16()));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse OpenWeather {endpoint} JSON"))
            .map_err(|e| fail(e).with_status(status.as_u16()))
    }

    fn hourly_from_response(&self, parsed: OwForecastResponse) -> Result<Vec<HourlyForecastEntry>> {
        parsed
            .list
            .into_iter()
            .map(|entry| -> Result<HourlyForecastEntry> {
                let time_label = time_label(entry.dt, self.label_offset)
                    .ok_or_else(|| anyhow!("Forecast timestamp {} is out of range", entry.dt))?;
                let icon = entry
                    .weather
                    .first()
                    .map(|w| w.icon.as_str())
                    .ok_or_else(|| anyhow!("Forecast entry at {time_label} has no weather condition"))?;

                Ok(HourlyForecastEntry {
                    time_label,
                    temperature_c: round_temperature(entry.main.temp),
                    icon_url: self.icon_url(icon),
                })
            })
            .collect()
    }

    fn icon_url(&self, icon: &str) -> String {
        format!("{}/{icon}@2x.png", self.icon_base_url)
    }
}

impl fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .field("label_offset", &self.label_offset)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_current_conditions(
        &self,
        city: &str,
    ) -> Result<CurrentConditions, WeatherFetchError> {
        let parsed: OwCurrentResponse = self.get_json(Endpoint::Current, city).await?;
        current_from_response(city, parsed)
            .map_err(|e| WeatherFetchError::new(city, Endpoint::Current, e))
    }

    async fn fetch_hourly_forecast(
        &self,
        city: &str,
    ) -> Result<Vec<HourlyForecastEntry>, WeatherFetchError> {
        let parsed: OwForecastResponse = self.get_json(Endpoint::Forecast, city).await?;
        self.hourly_from_response(parsed)
            .map_err(|e| WeatherFetchError::new(city, Endpoint::Forecast, e))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: Option<i64>,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

/// Body OpenWeather sends with 4xx answers, e.g. `{"cod":"404","message":"city not found"}`.
#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

fn endpoint_path(endpoint: Endpoint) -> &'static str {
    match endpoint {
        Endpoint::Current => "weather",
        Endpoint::Forecast => "forecast",
    }
}

fn current_from_response(city: &str, parsed: OwCurrentResponse) -> Result<CurrentConditions> {
    let weather = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("OpenWeather current response contained no weather condition"))?;

    Ok(CurrentConditions {
        city_queried: city.to_string(),
        location_name: parsed.name,
        temperature_c: parsed.main.temp,
        feels_like_c: parsed.main.feels_like,
        humidity_pct: parsed.main.humidity,
        pressure_hpa: parsed.main.pressure,
        wind_speed_mps: parsed.wind.speed,
        condition: weather.description,
        icon_id: weather.icon,
        observation_time: parsed.dt.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
    })
}

/// `HH:MM` (24-hour) for a Unix timestamp seen from `offset`.
pub fn time_label(ts: i64, offset: FixedOffset) -> Option<String> {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.with_timezone(&offset).format("%H:%M").to_string())
}

/// Nearest integer, halves rounded up (-2.5 becomes -2).
pub fn round_temperature(temp: f64) -> i32 {
    (temp + 0.5).floor() as i32
}

pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes.checked_mul(60).and_then(FixedOffset::east_opt)
}

fn describe_error_body(body: &str) -> String {
    match serde_json::from_str::<OwErrorBody>(body) {
        Ok(err) => err.message,
        Err(_) => truncate_body(body),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
