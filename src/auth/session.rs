use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use rand::RngCore;
use sqlx::{FromRow, PgPool};
use time::{Duration, OffsetDateTime};
use tracing::warn;
use uuid::Uuid;

use crate::auth::repo::User;
use crate::state::AppState;
use crate::translate::Language;

/// Server-side session row, keyed by an opaque bearer token.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub language: String,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

impl Session {
    pub async fn create(db: &PgPool, user_id: Uuid, ttl_minutes: i64) -> anyhow::Result<Session> {
        let token = generate_token();
        let expires_at = OffsetDateTime::now_utc() + Duration::minutes(ttl_minutes);
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (token, user_id, language, expires_at)
            VALUES ($1, $2, 'en', $3)
            RETURNING token, user_id, language, created_at, expires_at
            "#,
        )
        .bind(&token)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(db)
        .await?;
        Ok(session)
    }

    pub async fn find_valid(db: &PgPool, token: &str) -> anyhow::Result<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT token, user_id, language, created_at, expires_at
            FROM sessions
            WHERE token = $1 AND expires_at > now()
            "#,
        )
        .bind(token)
        .fetch_optional(db)
        .await?;
        Ok(session)
    }

    pub async fn delete(db: &PgPool, token: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn set_language(db: &PgPool, token: &str, language: Language) -> anyhow::Result<()> {
        sqlx::query("UPDATE sessions SET language = $2 WHERE token = $1")
            .bind(token)
            .bind(language.code())
            .execute(db)
            .await?;
        Ok(())
    }

    /// Broadcast language for this session. Rows hold the bare ISO code;
    /// anything unrecognized falls back to English.
    pub fn language(&self) -> Language {
        Language::from_code(&self.language).unwrap_or(Language::English)
    }
}

/// Per-request context: the session row plus the user it belongs to.
pub struct SessionUser {
    pub user: User,
    pub session: Session,
}

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "missing Authorization header".to_string(),
            ))?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or((StatusCode::UNAUTHORIZED, "invalid auth scheme".to_string()))?;

        let session = match Session::find_valid(&state.db, token).await {
            Ok(Some(s)) => s,
            Ok(None) => {
                warn!("unknown or expired session token");
                return Err((
                    StatusCode::UNAUTHORIZED,
                    "invalid or expired session".to_string(),
                ));
            }
            Err(e) => {
                tracing::error!(error = %e, "session lookup failed");
                return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
            }
        };

        let user = match User::find_by_id(&state.db, session.user_id).await {
            Ok(Some(u)) => u,
            Ok(None) => {
                warn!(user_id = %session.user_id, "session user no longer exists");
                return Err((StatusCode::UNAUTHORIZED, "user not found".to_string()));
            }
            Err(e) => {
                tracing::error!(error = %e, "session user lookup failed");
                return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
            }
        };

        Ok(SessionUser { user, session })
    }
}

/// Rejects any session that does not belong to an administrator.
pub struct AdminUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session_user = SessionUser::from_request_parts(parts, state).await?;
        if !session_user.user.is_admin {
            warn!(email = %session_user.user.email, "admin-only endpoint refused");
            return Err((StatusCode::FORBIDDEN, "administrator access required".to_string()));
        }
        Ok(AdminUser(session_user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_hex_and_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn session_language_falls_back_to_english() {
        let session = Session {
            token: "t".into(),
            user_id: Uuid::new_v4(),
            language: "xx".into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            expires_at: OffsetDateTime::UNIX_EPOCH,
        };
        assert_eq!(session.language(), Language::English);

        let session = Session {
            language: "ta".into(),
            ..session
        };
        assert_eq!(session.language(), Language::Tamil);
    }
}
