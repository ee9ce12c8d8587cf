use axum::{
    extract::Path,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{NaiveDate, NaiveDateTime};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{
    auth::CurrentUser,
    responses::{AppJson, AppResult},
    state::AppState,
};

use super::models::ActivityRow;
use super::rsvps::{RsvpResponse, RsvpWithName};
use super::services;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/groups/{group_id}/activities",
            get(list_activities).post(post_activity),
        )
        .route(
            "/groups/{group_id}/activities/{activity_id}",
            put(put_activity).delete(delete_activity),
        )
        .route(
            "/groups/{group_id}/activities/{activity_id}/rsvp",
            post(post_rsvp).delete(delete_rsvp),
        )
        .route(
            "/groups/{group_id}/activities/{activity_id}/rsvps",
            get(list_rsvps),
        )
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActivityForm {
    #[validate(custom(function = validate_title))]
    pub title: String,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new("title_required")
            .with_message("Activity title is required".into()));
    }
    Ok(())
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub event_date: Option<NaiveDate>,
    pub author: String,
    pub timestamp: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub created_by: i64,
    pub is_owner: bool,
    pub rsvp_yes_count: i64,
    pub rsvp_no_count: i64,
    pub total_rsvp_count: i64,
    pub user_rsvp: Option<String>,
}

impl ActivityView {
    pub fn from_row(row: ActivityRow, caller: i64) -> Self {
        Self {
            id: row.pk,
            title: row.title,
            description: row.description,
            event_date: row.event_date,
            author: row.author,
            timestamp: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by,
            is_owner: row.created_by == caller,
            rsvp_yes_count: row.yes_count,
            rsvp_no_count: row.no_count,
            total_rsvp_count: row.yes_count + row.no_count,
            user_rsvp: row.caller_response,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RsvpForm {
    pub response: RsvpResponse,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RsvpView {
    pub user_id: i64,
    pub user_name: String,
    pub response: RsvpResponse,
    pub created_at: NaiveDateTime,
}

impl From<RsvpWithName> for RsvpView {
    fn from(rsvp: RsvpWithName) -> Self {
        Self {
            user_id: rsvp.user_pk,
            user_name: rsvp.name,
            response: rsvp.response,
            created_at: rsvp.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RsvpListResponse {
    pub yes: Vec<RsvpView>,
    pub no: Vec<RsvpView>,
    pub total_yes: usize,
    pub total_no: usize,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

async fn list_activities(
    state: AppState,
    Extension(user): Extension<CurrentUser>,
    Path(group_id): Path<i64>,
) -> AppResult<Vec<ActivityView>> {
    services::list_activities(&state, &user, group_id)
        .await
        .map(Json)
}

async fn post_activity(
    state: AppState,
    Extension(user): Extension<CurrentUser>,
    Path(group_id): Path<i64>,
    AppJson(input): AppJson<ActivityForm>,
) -> AppResult<ActivityView> {
    let mut rng = StdRng::from_entropy();
    services::create_activity(&state, &user, group_id, &input, &mut rng)
        .await
        .map(Json)
}

async fn put_activity(
    state: AppState,
    Extension(user): Extension<CurrentUser>,
    Path((group_id, activity_id)): Path<(i64, i64)>,
    AppJson(input): AppJson<ActivityForm>,
) -> AppResult<ActivityView> {
    services::update_activity(&state, &user, group_id, activity_id, &input)
        .await
        .map(Json)
}

async fn delete_activity(
    state: AppState,
    Extension(user): Extension<CurrentUser>,
    Path((group_id, activity_id)): Path<(i64, i64)>,
) -> AppResult<MessageResponse> {
    services::delete_activity(&state, &user, group_id, activity_id).await?;
    Ok(Json(MessageResponse {
        message: "Activity deleted successfully".to_owned(),
    }))
}

async fn post_rsvp(
    state: AppState,
    Extension(user): Extension<CurrentUser>,
    Path((group_id, activity_id)): Path<(i64, i64)>,
    AppJson(input): AppJson<RsvpForm>,
) -> AppResult<MessageResponse> {
    services::record_rsvp(&state, &user, group_id, activity_id, &input).await?;
    Ok(Json(MessageResponse {
        message: "RSVP saved successfully".to_owned(),
    }))
}

async fn delete_rsvp(
    state: AppState,
    Extension(user): Extension<CurrentUser>,
    Path((group_id, activity_id)): Path<(i64, i64)>,
) -> AppResult<MessageResponse> {
    services::remove_rsvp(&state, &user, group_id, activity_id).await?;
    Ok(Json(MessageResponse {
        message: "RSVP removed successfully".to_owned(),
    }))
}

async fn list_rsvps(
    state: AppState,
    Extension(user): Extension<CurrentUser>,
    Path((group_id, activity_id)): Path<(i64, i64)>,
) -> AppResult<RsvpListResponse> {
    services::list_rsvps(&state, &user, group_id, activity_id)
        .await
        .map(Json)
}
