use serde::{Deserialize, Serialize};

use crate::risk::{FloodStatus, RiskAssessment};
use crate::weather::WeatherSnapshot;

/// Weather lookup response: the snapshot, the decision, and the alert text
/// that would be broadcast.
#[derive(Debug, Serialize)]
pub struct WeatherReport {
    pub city: String,
    pub snapshot: WeatherSnapshot,
    pub assessment: RiskAssessment,
    pub status: FloodStatus,
    pub message: String,
}

/// Individual alert request. `city` defaults to the administrator's own
/// city; at least one of `phone` / `email` must be present.
#[derive(Debug, Deserialize)]
pub struct SendAlertRequest {
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendAlertResponse {
    pub city: String,
    pub status: FloodStatus,
    pub language: String,
    pub sms_sent: Option<bool>,
    pub email_sent: Option<bool>,
    pub history_recorded: bool,
}

#[derive(Debug, Serialize)]
pub struct BulkAlertResponse {
    pub city: String,
    pub status: FloodStatus,
    pub language: String,
    pub recipients: usize,
    pub sent: usize,
    pub failed: usize,
    pub history_recorded: bool,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TranslatePreviewRequest {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranslatePreviewResponse {
    pub language: String,
    pub original: String,
    pub translated: String,
}
