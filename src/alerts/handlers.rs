use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    alerts::{
        dto::{
            BulkAlertResponse, HistoryQuery, SendAlertRequest, SendAlertResponse,
            TranslatePreviewRequest, TranslatePreviewResponse, WeatherReport,
        },
        history,
        service::dispatch_individual,
    },
    auth::session::{AdminUser, SessionUser},
    notify::{recipients::parse_recipients, send_bulk_emails},
    risk,
    state::AppState,
    translate::translate_message,
    weather::WeatherError,
};

const DEFAULT_HISTORY_LIMIT: i64 = 20;
const MAX_HISTORY_LIMIT: i64 = 100;

const PREVIEW_SAMPLE: &str =
    "Flood alert! Heavy rainfall detected. Please move to safer location.";

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/weather/:city", get(get_weather))
        .route("/alerts/history", get(get_history))
}

pub fn dispatch_routes() -> Router<AppState> {
    Router::new()
        .route("/alerts/send", post(send_alert))
        .route("/alerts/bulk", post(bulk_alert))
        .route("/translate/preview", post(translate_preview))
}

fn weather_failure(e: WeatherError) -> (StatusCode, String) {
    warn!(error = %e, "weather lookup failed");
    (
        StatusCode::BAD_GATEWAY,
        format!("Failed to fetch weather data: {e}"),
    )
}

#[instrument(skip(state, _ctx))]
pub async fn get_weather(
    State(state): State<AppState>,
    _ctx: SessionUser,
    Path(city): Path<String>,
) -> Result<Json<WeatherReport>, (StatusCode, String)> {
    let city = city.trim().to_string();
    if city.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "City is required".into()));
    }

    let snapshot = state
        .weather
        .current(&city)
        .await
        .map_err(weather_failure)?;
    let assessment = risk::assess(&snapshot, state.model.as_deref());
    let message = risk::base_alert_message(&city, &snapshot, assessment.flood_risk);

    Ok(Json(WeatherReport {
        status: assessment.status(),
        city,
        snapshot,
        assessment,
        message,
    }))
}

#[instrument(skip(state, admin, payload))]
pub async fn send_alert(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<SendAlertRequest>,
) -> Result<Json<SendAlertResponse>, (StatusCode, String)> {
    let ctx = admin.0;
    let city = payload
        .city
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(&ctx.user.city)
        .to_string();

    let phone = payload
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());
    if phone.is_none() && email.is_none() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Please provide at least one contact method".into(),
        ));
    }

    let snapshot = state
        .weather
        .current(&city)
        .await
        .map_err(weather_failure)?;
    let assessment = risk::assess(&snapshot, state.model.as_deref());
    let status = assessment.status();
    let base_message = risk::base_alert_message(&city, &snapshot, assessment.flood_risk);

    let language = ctx.session.language();
    let message = translate_message(state.translator.as_ref(), &base_message, language).await;

    let outcome = dispatch_individual(
        state.mailer.as_ref(),
        state.sms.as_ref(),
        &city,
        &snapshot,
        assessment.flood_risk,
        &message,
        phone,
        email,
    )
    .await;

    let mut history_recorded = false;
    if outcome.any_success() {
        match history::append(
            &state.db,
            &city,
            status,
            &outcome.alert_type_label(),
            language,
        )
        .await
        {
            Ok(_) => history_recorded = true,
            Err(e) => error!(error = %e, "history append failed"),
        }
    }

    info!(
        city = %city,
        status = status.as_str(),
        sms_sent = ?outcome.sms_sent,
        email_sent = ?outcome.email_sent,
        "individual alert processed"
    );
    Ok(Json(SendAlertResponse {
        city,
        status,
        language: language.code().to_string(),
        sms_sent: outcome.sms_sent,
        email_sent: outcome.email_sent,
        history_recorded,
    }))
}

#[instrument(skip(state, admin, multipart))]
pub async fn bulk_alert(
    State(state): State<AppState>,
    admin: AdminUser,
    mut multipart: Multipart,
) -> Result<Json<BulkAlertResponse>, (StatusCode, String)> {
    let ctx = admin.0;
    let mut file: Option<bytes::Bytes> = None;
    let mut city: Option<String> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("file") => {
                let data = field.bytes().await.map_err(|e| {
                    (StatusCode::BAD_REQUEST, format!("unreadable upload: {e}"))
                })?;
                file = Some(data);
            }
            Some("city") => {
                let value = field.text().await.map_err(|e| {
                    (StatusCode::BAD_REQUEST, format!("unreadable city field: {e}"))
                })?;
                city = Some(value);
            }
            _ => {}
        }
    }

    let file = file.ok_or((
        StatusCode::BAD_REQUEST,
        "CSV file field is required".to_string(),
    ))?;
    let city = city
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(&ctx.user.city)
        .to_string();

    let recipients = parse_recipients(&file).map_err(|e| {
        warn!(error = %e, "recipient CSV rejected");
        (StatusCode::BAD_REQUEST, e.to_string())
    })?;
    info!(count = recipients.len(), city = %city, "recipient list loaded");

    let snapshot = state
        .weather
        .current(&city)
        .await
        .map_err(weather_failure)?;
    let assessment = risk::assess(&snapshot, state.model.as_deref());
    let status = assessment.status();
    let base_message = risk::base_alert_message(&city, &snapshot, assessment.flood_risk);

    let language = ctx.session.language();
    let message = translate_message(state.translator.as_ref(), &base_message, language).await;

    let outcome = send_bulk_emails(state.mailer.as_ref(), &recipients, &city, &message).await;

    let mut history_recorded = false;
    if outcome.sent > 0 {
        let alert_type = format!("BulkEmail({})", outcome.sent);
        match history::append(&state.db, &city, status, &alert_type, language).await {
            Ok(_) => history_recorded = true,
            Err(e) => error!(error = %e, "history append failed"),
        }
    }

    info!(
        city = %city,
        sent = outcome.sent,
        failed = outcome.failed,
        "bulk alert processed"
    );
    Ok(Json(BulkAlertResponse {
        city,
        status,
        language: language.code().to_string(),
        recipients: recipients.len(),
        sent: outcome.sent,
        failed: outcome.failed,
        history_recorded,
    }))
}

#[instrument(skip(state, _ctx))]
pub async fn get_history(
    State(state): State<AppState>,
    _ctx: SessionUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<history::HistoryEntry>>, (StatusCode, String)> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    let entries = history::recent(&state.db, limit).await.map_err(|e| {
        error!(error = %e, "history read failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok(Json(entries))
}

/// Lets the administrator see what a broadcast would look like in the
/// session language before sending anything.
#[instrument(skip(state, admin, payload))]
pub async fn translate_preview(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<TranslatePreviewRequest>,
) -> Json<TranslatePreviewResponse> {
    let original = payload
        .text
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| PREVIEW_SAMPLE.to_string());
    let language = admin.0.session.language();
    let translated = translate_message(state.translator.as_ref(), &original, language).await;
    Json(TranslatePreviewResponse {
        language: language.code().to_string(),
        original,
        translated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::{FloodStatus, RiskAssessment};
    use crate::weather::WeatherSnapshot;

    #[test]
    fn weather_report_serialization() {
        let report = WeatherReport {
            city: "Chennai".into(),
            snapshot: WeatherSnapshot {
                rainfall_1h_mm: 80.0,
                ..WeatherSnapshot::default()
            },
            assessment: RiskAssessment {
                flood_risk: true,
                model_signal: false,
                threshold_signal: true,
            },
            status: FloodStatus::Alert,
            message: "URGENT: Flood alert for Chennai.".into(),
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""status":"alert""#));
        assert!(json.contains(r#""flood_risk":true"#));
        assert!(json.contains("Chennai"));
    }

    #[test]
    fn send_alert_request_accepts_partial_bodies() {
        let parsed: SendAlertRequest =
            serde_json::from_str(r#"{"email": "user@test.com"}"#).unwrap();
        assert!(parsed.city.is_none());
        assert!(parsed.phone.is_none());
        assert_eq!(parsed.email.as_deref(), Some("user@test.com"));
    }
}
