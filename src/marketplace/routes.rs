use axum::{
    extract::Path,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::CurrentUser,
    errors::AppError,
    responses::{AppJson, AppResult},
    state::AppState,
};

use super::models::{Bundle, HireRequest, Organizer};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/marketplace/organizers", get(list_organizers))
        .route("/marketplace/organizers/{id}", get(get_organizer))
        .route("/marketplace/organizers/{id}/bundles", get(list_bundles))
        .route("/marketplace/hire", post(hire_organizer))
}

async fn list_organizers(state: AppState) -> AppResult<Vec<Organizer>> {
    Ok(Json(state.marketplace.list().await))
}

async fn get_organizer(state: AppState, Path(id): Path<String>) -> AppResult<Organizer> {
    state
        .marketplace
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Organizer not found".to_owned()))
}

async fn list_bundles(state: AppState, Path(id): Path<String>) -> AppResult<Vec<Bundle>> {
    state
        .marketplace
        .get(&id)
        .await
        .map(|organizer| Json(organizer.bundles))
        .ok_or_else(|| AppError::NotFound("Organizer not found".to_owned()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HireForm {
    pub organizer_id: String,
    pub group_id: i64,
    pub message: Option<String>,
}

async fn hire_organizer(
    state: AppState,
    Extension(user): Extension<CurrentUser>,
    AppJson(input): AppJson<HireForm>,
) -> AppResult<HireRequest> {
    state
        .marketplace
        .get(&input.organizer_id)
        .await
        .ok_or_else(|| AppError::NotFound("Organizer not found".to_owned()))?;

    let hire = state
        .marketplace
        .record_hire(HireRequest {
            id: format!("hire_{}", Uuid::new_v4().simple()),
            organizer_id: input.organizer_id,
            group_id: input.group_id,
            user_id: user.pk,
            message: input.message,
            status: "pending".to_owned(),
            created_at: Utc::now().naive_utc(),
        })
        .await;

    Ok(Json(hire))
}
