use chrono::{NaiveDate, NaiveDateTime};
use sqlx::prelude::FromRow;

use crate::{database::Database, errors::AppError, log_and_wrap_custom_internal};

#[derive(Debug, Clone, FromRow)]
pub struct Activity {
    pub pk: i64,
    pub group_pk: i64,
    pub title: String,
    pub description: String,
    pub event_date: Option<NaiveDate>,
    pub created_by: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Activity {
    pub async fn insert(
        database: &Database,
        group_pk: i64,
        title: &str,
        description: &str,
        event_date: Option<NaiveDate>,
        created_by: i64,
    ) -> Result<i64, AppError> {
        sqlx::query(
            "INSERT INTO activities (group_pk, title, description, event_date, created_by)
                VALUES ($1, $2, $3, $4, $5);",
        )
        .bind(group_pk)
        .bind(title)
        .bind(description)
        .bind(event_date)
        .bind(created_by)
        .execute(database.get_connection())
        .await
        .map_err(|e| log_and_wrap_custom_internal!(e))
        .map(|q| q.last_insert_rowid())
    }

    pub async fn find_in_group(
        database: &Database,
        pk: i64,
        group_pk: i64,
    ) -> Result<Option<Self>, AppError> {
        sqlx::query_as("SELECT * FROM activities WHERE pk = $1 AND group_pk = $2;")
            .bind(pk)
            .bind(group_pk)
            .fetch_optional(database.get_connection())
            .await
            .map_err(|e| log_and_wrap_custom_internal!(e))
    }

    pub async fn update(
        database: &Database,
        pk: i64,
        title: &str,
        description: &str,
        event_date: Option<NaiveDate>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE activities
                SET title = $1, description = $2, event_date = $3, updated_at = CURRENT_TIMESTAMP
                WHERE pk = $4;",
        )
        .bind(title)
        .bind(description)
        .bind(event_date)
        .bind(pk)
        .execute(database.get_connection())
        .await
        .map_err(|e| log_and_wrap_custom_internal!(e))?;
        Ok(())
    }

    pub async fn delete(database: &Database, pk: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM activities WHERE pk = $1;")
            .bind(pk)
            .execute(database.get_connection())
            .await
            .map_err(|e| log_and_wrap_custom_internal!(e))?;
        Ok(())
    }
}

/// An activity as the list and detail endpoints render it: author name and
/// RSVP aggregates resolved in one query instead of per-row lookups.
#[derive(Debug, FromRow)]
pub struct ActivityRow {
    pub pk: i64,
    pub title: String,
    pub description: String,
    pub event_date: Option<NaiveDate>,
    pub created_by: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub author: String,
    pub yes_count: i64,
    pub no_count: i64,
    pub caller_response: Option<String>,
}

const ACTIVITY_ROW_COLUMNS: &str = "
    a.pk, a.title, a.description, a.event_date, a.created_by, a.created_at, a.updated_at,
    p.name AS author,
    (SELECT COUNT(*) FROM activity_rsvps r WHERE r.activity_pk = a.pk AND r.response = 'yes') AS yes_count,
    (SELECT COUNT(*) FROM activity_rsvps r WHERE r.activity_pk = a.pk AND r.response = 'no') AS no_count,
    (SELECT r.response FROM activity_rsvps r WHERE r.activity_pk = a.pk AND r.user_pk = $2) AS caller_response";

impl ActivityRow {
    pub async fn for_group(
        database: &Database,
        group_pk: i64,
        caller: i64,
    ) -> Result<Vec<Self>, AppError> {
        sqlx::query_as(&format!(
            "SELECT {ACTIVITY_ROW_COLUMNS}
                FROM activities a
                INNER JOIN profiles p ON p.pk = a.created_by
                WHERE a.group_pk = $1
                ORDER BY a.created_at DESC, a.pk DESC;"
        ))
        .bind(group_pk)
        .bind(caller)
        .fetch_all(database.get_connection())
        .await
        .map_err(|e| log_and_wrap_custom_internal!(e))
    }

    pub async fn fetch(
        database: &Database,
        activity_pk: i64,
        caller: i64,
    ) -> Result<Self, AppError> {
        sqlx::query_as(&format!(
            "SELECT {ACTIVITY_ROW_COLUMNS}
                FROM activities a
                INNER JOIN profiles p ON p.pk = a.created_by
                WHERE a.pk = $1;"
        ))
        .bind(activity_pk)
        .bind(caller)
        .fetch_one(database.get_connection())
        .await
        .map_err(|e| log_and_wrap_custom_internal!(e))
    }
}
