use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::password::hash_password;

/// Resident (or administrator) record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub city: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub alerts_enabled: bool,
    pub is_admin: bool,
    pub created_at: OffsetDateTime,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, city, password_hash, alerts_enabled, is_admin, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, city, password_hash, alerts_enabled, is_admin, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a resident account. Residents are opted into alerts by default
    /// and never created as administrators.
    pub async fn create(
        db: &PgPool,
        email: &str,
        city: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, city, password_hash, alerts_enabled, is_admin)
            VALUES ($1, $2, $3, TRUE, FALSE)
            RETURNING id, email, city, password_hash, alerts_enabled, is_admin, created_at
            "#,
        )
        .bind(email)
        .bind(city)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn update_password(db: &PgPool, id: Uuid, password_hash: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn set_alerts_enabled(db: &PgPool, id: Uuid, enabled: bool) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET alerts_enabled = $2 WHERE id = $1")
            .bind(id)
            .bind(enabled)
            .execute(db)
            .await?;
        Ok(())
    }
}

/// Upserts the configured administrator. A fresh database ends up with
/// exactly this record; an existing record keeps its password (it may have
/// been changed through the API) but is always promoted back to admin.
pub async fn ensure_admin(db: &PgPool, email: &str, password: &str) -> anyhow::Result<()> {
    let hash = hash_password(password)?;
    sqlx::query(
        r#"
        INSERT INTO users (email, city, password_hash, alerts_enabled, is_admin)
        VALUES ($1, 'Admin Headquarters', $2, TRUE, TRUE)
        ON CONFLICT (email) DO UPDATE SET is_admin = TRUE
        "#,
    )
    .bind(email)
    .bind(&hash)
    .execute(db)
    .await?;
    tracing::info!(email, "administrator account ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "resident@example.com".into(),
            city: "Pune".into(),
            password_hash: "argon2-secret".into(),
            alerts_enabled: true,
            is_admin: false,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2-secret"));
        assert!(json.contains("Pune"));
    }
}
