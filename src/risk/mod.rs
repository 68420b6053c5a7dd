use serde::{Deserialize, Serialize};

use crate::weather::WeatherSnapshot;

pub mod model;
pub use model::FloodModel;

/// Rainfall over the last hour above this triggers an alert on its own.
pub const RAINFALL_THRESHOLD_MM: f64 = 50.0;

/// Outcome of one flood decision, as recorded in the alert history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloodStatus {
    Alert,
    Safe,
    Unknown,
}

impl FloodStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FloodStatus::Alert => "alert",
            FloodStatus::Safe => "safe",
            FloodStatus::Unknown => "unknown",
        }
    }
}

/// The two independent signals and their combination. The decision is a
/// plain OR: either signal alone raises the alert, and the assessment is
/// stateless across calls.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RiskAssessment {
    pub flood_risk: bool,
    pub model_signal: bool,
    pub threshold_signal: bool,
}

impl RiskAssessment {
    pub fn status(&self) -> FloodStatus {
        if self.flood_risk {
            FloodStatus::Alert
        } else {
            FloodStatus::Safe
        }
    }
}

pub fn assess(snapshot: &WeatherSnapshot, model: Option<&FloodModel>) -> RiskAssessment {
    let threshold_signal = snapshot.rainfall_1h_mm > RAINFALL_THRESHOLD_MM;

    // An absent model, or one that cannot score these inputs, contributes
    // nothing rather than an error.
    let features = [
        snapshot.temperature_c,
        snapshot.humidity_pct,
        snapshot.pressure_hpa,
        snapshot.rainfall_1h_mm,
        snapshot.wind_speed_mps,
    ];
    let model_signal = model
        .and_then(|m| m.predict(&features))
        .map(|label| label == 1)
        .unwrap_or(false);

    RiskAssessment {
        flood_risk: model_signal || threshold_signal,
        model_signal,
        threshold_signal,
    }
}

/// Base alert text, before translation.
pub fn base_alert_message(city: &str, snapshot: &WeatherSnapshot, flood_risk: bool) -> String {
    if flood_risk {
        format!(
            "URGENT: Flood alert for {city}. Heavy rainfall ({:.1}mm) detected. \
             Move to safer location immediately. Avoid river areas.",
            snapshot.rainfall_1h_mm
        )
    } else {
        format!(
            "Weather update for {city}: No flood risk currently. Rainfall: {:.1}mm. Stay vigilant.",
            snapshot.rainfall_1h_mm
        )
    }
}
