use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::{database::Database, errors::AppError, log_and_wrap_custom_internal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Member => "member",
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Group {
    pub pk: i64,
    pub name: String,
    pub description: String,
    pub invite_token: String,
    pub created_by: i64,
    pub created_at: NaiveDateTime,
}

impl Group {
    pub async fn insert(
        database: &Database,
        name: &str,
        description: &str,
        invite_token: &str,
        created_by: i64,
    ) -> Result<i64, AppError> {
        sqlx::query(
            "INSERT INTO groups (name, description, invite_token, created_by) VALUES ($1, $2, $3, $4);",
        )
        .bind(name)
        .bind(description)
        .bind(invite_token)
        .bind(created_by)
        .execute(database.get_connection())
        .await
        .map_err(|e| log_and_wrap_custom_internal!(e))
        .map(|q| q.last_insert_rowid())
    }

    pub async fn find(database: &Database, pk: i64) -> Result<Option<Self>, AppError> {
        sqlx::query_as("SELECT * FROM groups WHERE pk = $1;")
            .bind(pk)
            .fetch_optional(database.get_connection())
            .await
            .map_err(|e| log_and_wrap_custom_internal!(e))
    }

    pub async fn find_by_invite_token(
        database: &Database,
        invite_token: &str,
    ) -> Result<Option<Self>, AppError> {
        sqlx::query_as("SELECT * FROM groups WHERE invite_token = $1;")
            .bind(invite_token)
            .fetch_optional(database.get_connection())
            .await
            .map_err(|e| log_and_wrap_custom_internal!(e))
    }

    /// Compensation step for a failed owner-membership insert.
    pub async fn delete(database: &Database, pk: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM groups WHERE pk = $1;")
            .bind(pk)
            .execute(database.get_connection())
            .await
            .map_err(|e| log_and_wrap_custom_internal!(e))?;
        Ok(())
    }

    pub async fn for_user(database: &Database, user_pk: i64) -> Result<Vec<GroupWithRole>, AppError> {
        sqlx::query_as(
            "SELECT g.pk, g.name, g.description, g.invite_token, g.created_by, g.created_at, m.role
                FROM group_members m
                INNER JOIN groups g ON g.pk = m.group_pk
                WHERE m.user_pk = $1
                ORDER BY g.created_at DESC;",
        )
        .bind(user_pk)
        .fetch_all(database.get_connection())
        .await
        .map_err(|e| log_and_wrap_custom_internal!(e))
    }
}

#[derive(Debug, FromRow)]
pub struct GroupWithRole {
    #[sqlx(flatten)]
    pub group: Group,
    pub role: Role,
}

#[derive(Debug, Clone, FromRow)]
pub struct Membership {
    pub pk: i64,
    pub group_pk: i64,
    pub user_pk: i64,
    pub role: Role,
    pub joined_at: NaiveDateTime,
}

impl Membership {
    pub async fn insert(
        database: &Database,
        group_pk: i64,
        user_pk: i64,
        role: Role,
    ) -> Result<i64, AppError> {
        sqlx::query("INSERT INTO group_members (group_pk, user_pk, role) VALUES ($1, $2, $3);")
            .bind(group_pk)
            .bind(user_pk)
            .bind(role.as_str())
            .execute(database.get_connection())
            .await
            .map_err(|e| log_and_wrap_custom_internal!(e))
            .map(|q| q.last_insert_rowid())
    }

    pub async fn find(
        database: &Database,
        group_pk: i64,
        user_pk: i64,
    ) -> Result<Option<Self>, AppError> {
        sqlx::query_as("SELECT * FROM group_members WHERE group_pk = $1 AND user_pk = $2;")
            .bind(group_pk)
            .bind(user_pk)
            .fetch_optional(database.get_connection())
            .await
            .map_err(|e| log_and_wrap_custom_internal!(e))
    }

    /// The authorization perimeter: every group-scoped operation starts here.
    pub async fn require(
        database: &Database,
        group_pk: i64,
        user_pk: i64,
    ) -> Result<Self, AppError> {
        Self::find(database, group_pk, user_pk)
            .await?
            .ok_or(AppError::AccessDenied)
    }

    pub async fn member_pks(database: &Database, group_pk: i64) -> Result<Vec<i64>, AppError> {
        sqlx::query_scalar("SELECT user_pk FROM group_members WHERE group_pk = $1;")
            .bind(group_pk)
            .fetch_all(database.get_connection())
            .await
            .map_err(|e| log_and_wrap_custom_internal!(e))
    }

    pub async fn delete(database: &Database, group_pk: i64, user_pk: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM group_members WHERE group_pk = $1 AND user_pk = $2;")
            .bind(group_pk)
            .bind(user_pk)
            .execute(database.get_connection())
            .await
            .map_err(|e| log_and_wrap_custom_internal!(e))?;
        Ok(())
    }
}

#[derive(Debug, FromRow)]
pub struct MemberWithName {
    pub user_pk: i64,
    pub name: String,
    pub role: Role,
    pub joined_at: NaiveDateTime,
}

impl MemberWithName {
    pub async fn for_group(database: &Database, group_pk: i64) -> Result<Vec<Self>, AppError> {
        sqlx::query_as(
            "SELECT m.user_pk, p.name, m.role, m.joined_at
                FROM group_members m
                INNER JOIN profiles p ON p.pk = m.user_pk
                WHERE m.group_pk = $1
                ORDER BY m.joined_at ASC;",
        )
        .bind(group_pk)
        .fetch_all(database.get_connection())
        .await
        .map_err(|e| log_and_wrap_custom_internal!(e))
    }
}
