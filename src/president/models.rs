use std::collections::HashSet;

use chrono::NaiveDate;
use sqlx::prelude::FromRow;

use crate::{database::Database, errors::AppError, log_and_wrap_custom_internal};

/// One row per (group, week). Rows are written once and kept forever; the
/// history is what the fairness window reads.
#[derive(Debug, Clone, FromRow)]
pub struct PresidentTerm {
    pub group_pk: i64,
    pub user_pk: i64,
    pub week_start_date: NaiveDate,
    pub week_end_date: NaiveDate,
}

impl PresidentTerm {
    pub async fn find(
        database: &Database,
        group_pk: i64,
        week_start: NaiveDate,
    ) -> Result<Option<Self>, AppError> {
        sqlx::query_as(
            "SELECT group_pk, user_pk, week_start_date, week_end_date
                FROM group_presidents
                WHERE group_pk = $1 AND week_start_date = $2;",
        )
        .bind(group_pk)
        .bind(week_start)
        .fetch_optional(database.get_connection())
        .await
        .map_err(|e| log_and_wrap_custom_internal!(e))
    }

    /// Holders of a term in `[since, before)`, the fairness exclusion set.
    pub async fn recent_holders(
        database: &Database,
        group_pk: i64,
        since: NaiveDate,
        before: NaiveDate,
    ) -> Result<HashSet<i64>, AppError> {
        sqlx::query_scalar(
            "SELECT user_pk FROM group_presidents
                WHERE group_pk = $1 AND week_start_date >= $2 AND week_start_date < $3;",
        )
        .bind(group_pk)
        .bind(since)
        .bind(before)
        .fetch_all(database.get_connection())
        .await
        .map(|pks: Vec<i64>| pks.into_iter().collect())
        .map_err(|e| log_and_wrap_custom_internal!(e))
    }

    /// Raw insert. The caller inspects the error: a unique violation on
    /// (group_pk, week_start_date) means another request won the election.
    pub async fn insert(
        database: &Database,
        group_pk: i64,
        user_pk: i64,
        week_start: NaiveDate,
        week_end: NaiveDate,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query(
            "INSERT INTO group_presidents (group_pk, user_pk, week_start_date, week_end_date)
                VALUES ($1, $2, $3, $4);",
        )
        .bind(group_pk)
        .bind(user_pk)
        .bind(week_start)
        .bind(week_end)
        .execute(database.get_connection())
        .await?;

        Ok(Self {
            group_pk,
            user_pk,
            week_start_date: week_start,
            week_end_date: week_end,
        })
    }
}
