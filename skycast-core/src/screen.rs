//! Headless state of the weather screen.
//!
//! `WeatherScreen` owns a `ScreenState` and only changes it in response to
//! the outcome of a refresh or an explicit user action.

use chrono::{Datelike, NaiveDateTime, Timelike};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    model::WeatherReport,
    provider::{WeatherProvider, fetch_weather_report},
};

pub const DEFAULT_CITY: &str = "Istanbul";
pub const INVALID_CITY_MESSAGE: &str = "Geçersiz şehir adı girdiniz.";

/// Local hour from which the screen starts in night mode.
const NIGHT_FROM_HOUR: u32 = 18;

/// tr-TR weekday names, Monday first.
const WEEKDAYS_TR: [&str; 7] =
    ["Pazartesi", "Salı", "Çarşamba", "Perşembe", "Cuma", "Cumartesi", "Pazar"];

/// Header such as "Salı, 14.11.2023".
pub fn date_label(now: NaiveDateTime) -> String {
    let weekday = WEEKDAYS_TR[now.weekday().num_days_from_monday() as usize];
    format!("{weekday}, {}", now.format("%d.%m.%Y"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Day,
    Night,
}

impl Theme {
    pub fn for_hour(hour: u32) -> Self {
        if hour >= NIGHT_FROM_HOUR { Theme::Night } else { Theme::Day }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Day => Theme::Night,
            Theme::Night => Theme::Day,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenState {
    /// City of the report on display (or the one to load on mount).
    pub city: String,
    pub report: Option<WeatherReport>,
    pub error: Option<String>,
    pub error_visible: bool,
    pub theme: Theme,
    /// e.g. "Salı, 14.11.2023"; empty until mounted.
    pub date_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Updated,
    Failed,
    /// Blank search input; nothing was requested.
    Skipped,
}

#[derive(Debug)]
pub struct WeatherScreen<P> {
    provider: P,
    state: ScreenState,
}

impl<P: WeatherProvider> WeatherScreen<P> {
    pub fn new(provider: P) -> Self {
        Self::with_city(provider, DEFAULT_CITY)
    }

    pub fn with_city(provider: P, city: &str) -> Self {
        Self {
            provider,
            state: ScreenState {
                city: city.to_string(),
                report: None,
                error: None,
                error_visible: false,
                theme: Theme::Day,
                date_label: String::new(),
            },
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    /// Initial load: date header, theme from the local hour, then the start city.
    pub async fn mount(&mut self, now: NaiveDateTime) -> RefreshOutcome {
        self.state.date_label = date_label(now);
        self.state.theme = Theme::for_hour(now.hour());

        let city = self.state.city.clone();
        self.refresh(&city).await
    }

    pub async fn search(&mut self, input: &str) -> RefreshOutcome {
        let city = input.trim();
        if city.is_empty() {
            return RefreshOutcome::Skipped;
        }
        self.refresh(city).await
    }

    pub fn toggle_theme(&mut self) {
        self.state.theme = self.state.theme.toggled();
    }

    pub fn dismiss_error(&mut self) {
        self.state.error_visible = false;
    }

    async fn refresh(&mut self, city: &str) -> RefreshOutcome {
        match fetch_weather_report(&self.provider, city).await {
            Ok(report) => {
                info!("Loaded weather for '{city}' ({} forecast entries)", report.hourly.len());
                self.state.city = city.to_string();
                self.state.report = Some(report);
                self.state.error = None;
                self.state.error_visible = false;
                RefreshOutcome::Updated
            }
            Err(err) => {
                warn!("{err}: {:#}", err.cause());
                self.state.error = Some(INVALID_CITY_MESSAGE.to_string());
                self.state.error_visible = true;
                RefreshOutcome::Failed
            }
        }
    }
}
