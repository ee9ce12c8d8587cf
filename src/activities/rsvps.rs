use chrono::NaiveDateTime;
use metrics::counter;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::{database::Database, errors::AppError, log_and_wrap_custom_internal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RsvpResponse {
    Yes,
    No,
}

impl RsvpResponse {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

#[derive(Debug, FromRow)]
pub struct RsvpWithName {
    pub user_pk: i64,
    pub name: String,
    pub response: RsvpResponse,
    pub created_at: NaiveDateTime,
}

/// Upsert keyed on (activity, user): last write wins, no history.
pub async fn record_response(
    database: &Database,
    activity_pk: i64,
    user_pk: i64,
    response: RsvpResponse,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO activity_rsvps (activity_pk, user_pk, response) VALUES ($1, $2, $3)
            ON CONFLICT (activity_pk, user_pk)
            DO UPDATE SET response = excluded.response, updated_at = CURRENT_TIMESTAMP;",
    )
    .bind(activity_pk)
    .bind(user_pk)
    .bind(response.as_str())
    .execute(database.get_connection())
    .await
    .map_err(|e| log_and_wrap_custom_internal!(e))?;

    counter!("kudu_rsvps_recorded_total").increment(1);
    Ok(())
}

/// Idempotent: removing an absent response is not an error.
pub async fn remove_response(
    database: &Database,
    activity_pk: i64,
    user_pk: i64,
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM activity_rsvps WHERE activity_pk = $1 AND user_pk = $2;")
        .bind(activity_pk)
        .bind(user_pk)
        .execute(database.get_connection())
        .await
        .map_err(|e| log_and_wrap_custom_internal!(e))?;
    Ok(())
}

/// All responses for an activity joined with display names, oldest first.
pub async fn list_responses(
    database: &Database,
    activity_pk: i64,
) -> Result<Vec<RsvpWithName>, AppError> {
    sqlx::query_as(
        "SELECT r.user_pk, p.name, r.response, r.created_at
            FROM activity_rsvps r
            INNER JOIN profiles p ON p.pk = r.user_pk
            WHERE r.activity_pk = $1
            ORDER BY r.created_at ASC, r.pk ASC;",
    )
    .bind(activity_pk)
    .fetch_all(database.get_connection())
    .await
    .map_err(|e| log_and_wrap_custom_internal!(e))
}
