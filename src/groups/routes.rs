use axum::{
    extract::Path,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{
    auth::CurrentUser,
    responses::{AppJson, AppResult},
    state::AppState,
};

use super::models::{Group, MemberWithName, Role};
use super::services;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/groups", get(list_groups).post(post_group))
        .route("/groups/{group_id}", get(group_detail))
        .route(
            "/groups/join/{invite_token}",
            get(preview_group).post(join_group),
        )
        .route("/groups/{group_id}/leave", post(leave_group))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGroupForm {
    #[validate(custom(function = validate_group_name))]
    pub name: String,
    pub description: Option<String>,
}

fn validate_group_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("name_required")
            .with_message("Group name is required".into()));
    }
    if name.len() > 100 {
        return Err(ValidationError::new("name_too_long")
            .with_message("Group name must be 100 characters or less".into()));
    }
    Ok(())
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub invite_token: String,
    pub created_by: i64,
    pub created_at: NaiveDateTime,
    pub user_role: Role,
}

impl GroupView {
    pub fn from_group(group: Group, role: Role) -> Self {
        Self {
            id: group.pk,
            name: group.name,
            description: group.description,
            invite_token: group.invite_token,
            created_by: group.created_by,
            created_at: group.created_at,
            user_role: role,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberView {
    pub user_id: i64,
    pub name: String,
    pub role: Role,
    pub joined_at: NaiveDateTime,
}

impl From<MemberWithName> for MemberView {
    fn from(member: MemberWithName) -> Self {
        Self {
            user_id: member.user_pk,
            name: member.name,
            role: member.role,
            joined_at: member.joined_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupDetail {
    #[serde(flatten)]
    pub view: GroupView,
    pub members: Vec<MemberView>,
}

#[derive(Debug, Serialize)]
pub struct LeaveResponse {
    pub message: String,
}

async fn post_group(
    state: AppState,
    Extension(user): Extension<CurrentUser>,
    AppJson(input): AppJson<CreateGroupForm>,
) -> AppResult<GroupView> {
    services::create_group(&state.primary_database, user.pk, &input)
        .await
        .map(Json)
}

async fn list_groups(
    state: AppState,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Vec<GroupView>> {
    services::list_groups(&state, &user).await.map(Json)
}

async fn group_detail(
    state: AppState,
    Extension(user): Extension<CurrentUser>,
    Path(group_id): Path<i64>,
) -> AppResult<GroupDetail> {
    services::group_detail(&state, &user, group_id).await.map(Json)
}

async fn preview_group(
    state: AppState,
    Path(invite_token): Path<String>,
) -> AppResult<GroupView> {
    services::preview_by_invite_token(&state, &invite_token)
        .await
        .map(Json)
}

async fn join_group(
    state: AppState,
    Extension(user): Extension<CurrentUser>,
    Path(invite_token): Path<String>,
) -> AppResult<GroupView> {
    services::join_by_invite_token(&state, &user, &invite_token)
        .await
        .map(Json)
}

async fn leave_group(
    state: AppState,
    Extension(user): Extension<CurrentUser>,
    Path(group_id): Path<i64>,
) -> AppResult<LeaveResponse> {
    services::leave_group(&state, &user, group_id).await?;
    Ok(Json(LeaveResponse {
        message: "You have left the group".to_owned(),
    }))
}
