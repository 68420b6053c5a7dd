use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{WeatherError, WeatherProvider, WeatherSnapshot};

const OWM_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

/// OpenWeatherMap client. Responses regularly omit the `rain` object and
/// sometimes individual `main`/`wind` fields, so every nested field defaults
/// instead of failing deserialization.
pub struct OpenWeather {
    client: Client,
    api_key: String,
}

#[derive(Debug, Default, Deserialize)]
struct OwmMain {
    #[serde(default)]
    temp: f64,
    #[serde(default)]
    humidity: f64,
    #[serde(default)]
    pressure: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwmWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwmRain {
    #[serde(rename = "1h", default)]
    one_hour: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwmCondition {
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    #[serde(default)]
    main: OwmMain,
    #[serde(default)]
    wind: OwmWind,
    rain: Option<OwmRain>,
    #[serde(default)]
    weather: Vec<OwmCondition>,
}

fn snapshot_from(data: OwmResponse) -> WeatherSnapshot {
    let condition = data.weather.into_iter().next().unwrap_or_default();
    WeatherSnapshot {
        temperature_c: data.main.temp,
        humidity_pct: data.main.humidity,
        pressure_hpa: data.main.pressure,
        wind_speed_mps: data.wind.speed,
        rainfall_1h_mm: data.rain.map(|r| r.one_hour).unwrap_or(0.0),
        description: condition.description,
        icon: condition.icon,
    }
}

impl OpenWeather {
    pub fn new(api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeather {
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        let response = self
            .client
            .get(OWM_ENDPOINT)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let data: OwmResponse = response.json().await?;
        let snapshot = snapshot_from(data);
        debug!(city, rainfall_1h_mm = snapshot.rainfall_1h_mm, "weather fetched");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_payload_maps_to_snapshot() {
        let raw = r#"{
            "main": {"temp": 28.4, "humidity": 88, "pressure": 1002},
            "wind": {"speed": 6.2},
            "rain": {"1h": 62.5},
            "weather": [{"description": "heavy intensity rain", "icon": "10d"}]
        }"#;
        let data: OwmResponse = serde_json::from_str(raw).unwrap();
        let snapshot = snapshot_from(data);
        assert_eq!(snapshot.temperature_c, 28.4);
        assert_eq!(snapshot.humidity_pct, 88.0);
        assert_eq!(snapshot.pressure_hpa, 1002.0);
        assert_eq!(snapshot.wind_speed_mps, 6.2);
        assert_eq!(snapshot.rainfall_1h_mm, 62.5);
        assert_eq!(snapshot.description, "heavy intensity rain");
        assert_eq!(snapshot.icon, "10d");
    }

    #[test]
    fn missing_rain_defaults_to_zero() {
        let raw = r#"{
            "main": {"temp": 31.0, "humidity": 40, "pressure": 1012},
            "wind": {"speed": 2.1},
            "weather": [{"description": "clear sky", "icon": "01d"}]
        }"#;
        let data: OwmResponse = serde_json::from_str(raw).unwrap();
        let snapshot = snapshot_from(data);
        assert_eq!(snapshot.rainfall_1h_mm, 0.0);
    }

    #[test]
    fn bare_payload_still_parses() {
        let data: OwmResponse = serde_json::from_str("{}").unwrap();
        let snapshot = snapshot_from(data);
        assert_eq!(snapshot, WeatherSnapshot::default());
    }
}
