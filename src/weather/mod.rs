use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod openweather;
pub use openweather::OpenWeather;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("weather API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Current conditions for one city, normalized to the fixed feature set the
/// risk classifier consumes. Never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub pressure_hpa: f64,
    pub wind_speed_mps: f64,
    pub rainfall_1h_mm: f64,
    pub description: String,
    pub icon: String,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError>;
}
