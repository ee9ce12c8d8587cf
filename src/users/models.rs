use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::{database::Database, errors::AppError, log_and_wrap_custom_internal};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Profile {
    pub pk: i64,
    pub auth_id: String,
    pub name: String,
    pub created_at: NaiveDateTime,
}

impl Profile {
    pub async fn create(database: &Database, auth_id: &str, name: &str) -> Result<Self, AppError> {
        sqlx::query("INSERT INTO profiles (auth_id, name) VALUES ($1, $2);")
            .bind(auth_id)
            .bind(name)
            .execute(database.get_connection())
            .await
            .map_err(|e| log_and_wrap_custom_internal!(e))?;

        Self::find_by_auth_id(database, auth_id)
            .await?
            .ok_or_else(|| AppError::custom_internal("profile vanished after insert"))
    }

    pub async fn find_by_auth_id(
        database: &Database,
        auth_id: &str,
    ) -> Result<Option<Self>, AppError> {
        sqlx::query_as("SELECT * FROM profiles WHERE auth_id = $1;")
            .bind(auth_id)
            .fetch_optional(database.get_connection())
            .await
            .map_err(|e| log_and_wrap_custom_internal!(e))
    }

    pub async fn name_of(database: &Database, pk: i64) -> Result<Option<String>, AppError> {
        sqlx::query_scalar("SELECT name FROM profiles WHERE pk = $1;")
            .bind(pk)
            .fetch_optional(database.get_connection())
            .await
            .map_err(|e| log_and_wrap_custom_internal!(e))
    }

    pub async fn all(database: &Database) -> Result<Vec<Self>, AppError> {
        sqlx::query_as("SELECT * FROM profiles ORDER BY created_at DESC;")
            .fetch_all(database.get_connection())
            .await
            .map_err(|e| log_and_wrap_custom_internal!(e))
    }

    pub async fn rename(database: &Database, pk: i64, name: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE profiles SET name = $1 WHERE pk = $2;")
            .bind(name)
            .bind(pk)
            .execute(database.get_connection())
            .await
            .map_err(|e| log_and_wrap_custom_internal!(e))?;
        Ok(())
    }
}
