use std::fmt;

use thiserror::Error;

/// Which provider endpoint a request went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Current,
    Forecast,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Current => "current conditions",
            Endpoint::Forecast => "hourly forecast",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The only error the data access layer returns.
///
/// Transport failures, non-success statuses, unknown cities and malformed
/// bodies all end up here; the original cause is kept as the error source.
#[derive(Debug, Error)]
#[error("Failed to fetch {endpoint} for '{city}'")]
pub struct WeatherFetchError {
    city: String,
    endpoint: Endpoint,
    status: Option<u16>,
    #[source]
    source: anyhow::Error,
}

impl WeatherFetchError {
    pub fn new(city: &str, endpoint: Endpoint, source: anyhow::Error) -> Self {
        Self {
            city: city.to_string(),
            endpoint,
            status: None,
            source,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// HTTP status of the provider response, if one was received.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn cause(&self) -> &anyhow::Error {
        &self.source
    }
}
