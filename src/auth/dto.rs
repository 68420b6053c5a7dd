use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::translate::Language;

/// Request body for resident registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub city: String,
    pub password: String,
    pub confirm_password: String,
}

/// Request body for login (resident or administrator path).
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct AlertPreferenceRequest {
    pub alerts_enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct LanguageRequest {
    pub language: Language,
}

/// Public part of a user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub city: String,
    pub alerts_enabled: bool,
    pub is_admin: bool,
}

impl From<crate::auth::repo::User> for PublicUser {
    fn from(user: crate::auth::repo::User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            city: user.city,
            alerts_enabled: user.alerts_enabled,
            is_admin: user.is_admin,
        }
    }
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: OffsetDateTime,
    pub user: PublicUser,
}

/// Response returned after registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: PublicUser,
    pub welcome_email_sent: bool,
}
