use axum::{
    routing::{get, put},
    Extension, Json, Router,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::CurrentUser,
    errors::AppError,
    responses::{AppJson, AppResult},
    state::AppState,
};

use super::models::Profile;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/me", put(rename_me))
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: i64,
    pub name: String,
    pub created_at: NaiveDateTime,
}

impl From<Profile> for ProfileView {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.pk,
            name: profile.name,
            created_at: profile.created_at,
        }
    }
}

async fn list_users(state: AppState) -> AppResult<Vec<ProfileView>> {
    let profiles = Profile::all(&state.primary_database).await?;
    Ok(Json(profiles.into_iter().map(ProfileView::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct RenameForm {
    name: String,
}

async fn rename_me(
    state: AppState,
    Extension(user): Extension<CurrentUser>,
    AppJson(input): AppJson<RenameForm>,
) -> AppResult<ProfileView> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_owned()));
    }

    Profile::rename(&state.primary_database, user.pk, name).await?;
    let profile = Profile::find_by_auth_id(&state.primary_database, &user.auth_id)
        .await?
        .ok_or_else(|| AppError::custom_internal("profile vanished after rename"))?;
    Ok(Json(profile.into()))
}
