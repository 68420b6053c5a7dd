use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::risk::FloodStatus;
use crate::translate::Language;

/// One immutable record of a past alert decision and what was dispatched.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub city: String,
    pub status: String,
    pub alert_type: String,
    pub language: String,
    pub created_at: OffsetDateTime,
}

/// Appends one entry with a server-side timestamp. Entries are never
/// updated or deleted afterwards.
pub async fn append(
    db: &PgPool,
    city: &str,
    status: FloodStatus,
    alert_type: &str,
    language: Language,
) -> anyhow::Result<HistoryEntry> {
    let entry = sqlx::query_as::<_, HistoryEntry>(
        r#"
        INSERT INTO alert_history (city, status, alert_type, language)
        VALUES ($1, $2, $3, $4)
        RETURNING id, city, status, alert_type, language, created_at
        "#,
    )
    .bind(city)
    .bind(status.as_str())
    .bind(alert_type)
    .bind(language.code())
    .fetch_one(db)
    .await?;
    Ok(entry)
}

/// Most recent entries, newest first.
pub async fn recent(db: &PgPool, limit: i64) -> anyhow::Result<Vec<HistoryEntry>> {
    let rows = sqlx::query_as::<_, HistoryEntry>(
        r#"
        SELECT id, city, status, alert_type, language, created_at
        FROM alert_history
        ORDER BY created_at DESC, id DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
