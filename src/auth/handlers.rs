use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AlertPreferenceRequest, ChangePasswordRequest, LanguageRequest, LoginRequest,
            PublicUser, RegisterRequest, RegisterResponse, SessionResponse,
        },
        password::{hash_password, validate_new_password, verify_password},
        repo::User,
        session::{AdminUser, Session, SessionUser},
    },
    notify::templates,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/admin/login", post(admin_login))
        .route("/auth/logout", post(logout))
}

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/me/password", put(change_password))
        .route("/me/alerts", put(set_alert_preference))
        .route("/session/language", put(set_language))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, (StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();
    payload.city = payload.city.trim().to_string();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }
    if payload.city.is_empty() {
        warn!("missing city");
        return Err((StatusCode::BAD_REQUEST, "City is required".into()));
    }
    if let Err(msg) = validate_new_password(&payload.password, &payload.confirm_password) {
        warn!(email = %payload.email, "password rejected");
        return Err((StatusCode::BAD_REQUEST, msg.into()));
    }

    if let Ok(Some(_)) = User::find_by_email(&state.db, &payload.email).await {
        warn!(email = %payload.email, "email already registered");
        return Err((StatusCode::CONFLICT, "Email already registered".into()));
    }

    let hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "hash_password failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let user = match User::create(&state.db, &payload.email, &payload.city, &hash).await {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    // The welcome email is best-effort: registration stands even when the
    // mail submission fails.
    let (subject, html) = templates::welcome_email(&user.email, &user.city);
    let welcome_email_sent = match state.mailer.send_html(&user.email, &subject, &html).await {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, email = %user.email, "welcome email failed");
            false
        }
    };

    info!(user_id = %user.id, email = %user.email, city = %user.city, "resident registered");
    Ok(Json(RegisterResponse {
        user: user.into(),
        welcome_email_sent,
    }))
}

async fn login_with(
    state: &AppState,
    mut payload: LoginRequest,
    want_admin: bool,
) -> Result<Json<SessionResponse>, (StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();

    let user = match User::find_by_email(&state.db, &payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "login unknown email");
            return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let ok = match verify_password(&payload.password, &user.password_hash) {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, "verify_password failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    // The admin path requires the flag; the resident path refuses admin
    // accounts, mirroring the two separate sign-in forms.
    if !ok || user.is_admin != want_admin {
        warn!(email = %payload.email, want_admin, "login rejected");
        return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
    }

    let session = match Session::create(&state.db, user.id, state.config.session_ttl_minutes).await
    {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "session create failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    info!(user_id = %user.id, email = %user.email, want_admin, "signed in");
    Ok(Json(SessionResponse {
        token: session.token,
        expires_at: session.expires_at,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, (StatusCode, String)> {
    login_with(&state, payload, false).await
}

#[instrument(skip(state, payload))]
pub async fn admin_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, (StatusCode, String)> {
    login_with(&state, payload, true).await
}

#[instrument(skip(state, ctx))]
pub async fn logout(
    State(state): State<AppState>,
    ctx: SessionUser,
) -> Result<StatusCode, (StatusCode, String)> {
    Session::delete(&state.db, &ctx.session.token)
        .await
        .map_err(|e| {
            error!(error = %e, "logout failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    info!(user_id = %ctx.user.id, "signed out");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(ctx))]
pub async fn get_me(ctx: SessionUser) -> Json<PublicUser> {
    Json(ctx.user.into())
}

#[instrument(skip(state, ctx, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    ctx: SessionUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    let current_ok = verify_password(&payload.current_password, &ctx.user.password_hash)
        .map_err(|e| {
            error!(error = %e, "verify_password failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    if !current_ok {
        warn!(user_id = %ctx.user.id, "change password: wrong current password");
        return Err((StatusCode::UNAUTHORIZED, "Incorrect current password".into()));
    }
    if let Err(msg) = validate_new_password(&payload.new_password, &payload.confirm_password) {
        return Err((StatusCode::BAD_REQUEST, msg.into()));
    }

    let hash = hash_password(&payload.new_password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    User::update_password(&state.db, ctx.user.id, &hash)
        .await
        .map_err(|e| {
            error!(error = %e, "update_password failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    info!(user_id = %ctx.user.id, "password updated");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, ctx, payload))]
pub async fn set_alert_preference(
    State(state): State<AppState>,
    ctx: SessionUser,
    Json(payload): Json<AlertPreferenceRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    User::set_alerts_enabled(&state.db, ctx.user.id, payload.alerts_enabled)
        .await
        .map_err(|e| {
            error!(error = %e, "set_alerts_enabled failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    info!(user_id = %ctx.user.id, enabled = payload.alerts_enabled, "alert preference updated");
    Ok(StatusCode::NO_CONTENT)
}

/// Admin-only: the broadcast language is carried by the session, not the
/// account, so two admin sessions can broadcast in different languages.
#[instrument(skip(state, admin, payload))]
pub async fn set_language(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<LanguageRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    Session::set_language(&state.db, &admin.0.session.token, payload.language)
        .await
        .map_err(|e| {
            error!(error = %e, "set_language failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    info!(language = payload.language.code(), "broadcast language updated");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("user@test.com"));
        assert!(is_valid_email("first.last+tag@example.co.in"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("spaces in@example.com"));
    }

    #[test]
    fn session_response_serialization_hides_hash() {
        let user = crate::auth::repo::User {
            id: uuid::Uuid::new_v4(),
            email: "user@test.com".into(),
            city: "Pune".into(),
            password_hash: "secret".into(),
            alerts_enabled: true,
            is_admin: false,
            created_at: time::OffsetDateTime::UNIX_EPOCH,
        };
        let response = SessionResponse {
            token: "abc123".into(),
            expires_at: time::OffsetDateTime::UNIX_EPOCH,
            user: user.into(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("user@test.com"));
        assert!(json.contains("abc123"));
        assert!(!json.contains("secret"));
    }
}
