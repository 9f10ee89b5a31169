use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the weather in one city at the time of the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// City name exactly as it was passed to the provider.
    pub city_queried: String,
    /// Canonical name the provider resolved the query to.
    pub location_name: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed_mps: f64,
    /// Localized description, e.g. "parçalı bulutlu".
    pub condition: String,
    /// Provider icon id, e.g. "04d".
    pub icon_id: String,
    pub observation_time: Option<DateTime<Utc>>,
}

/// One point of the forecast sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyForecastEntry {
    /// 24-hour `HH:MM` label in the provider's fixed offset.
    pub time_label: String,
    pub temperature_c: i32,
    pub icon_url: String,
}

/// Result of one refresh: both operations succeeded for the same city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyForecastEntry>,
}
