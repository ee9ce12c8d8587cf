use axum::{extract::Path, routing::get, Extension, Json, Router};
use chrono::NaiveDate;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    auth::CurrentUser, groups::Membership, responses::AppResult, state::AppState, users::Profile,
};

use super::services::{resolve_president, WeekWindow};

pub fn routes() -> Router<AppState> {
    Router::new().route("/groups/{group_id}/president", get(current_president))
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresidentView {
    pub user_id: i64,
    pub name: String,
    pub week_start_date: NaiveDate,
    pub week_end_date: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresidentResponse {
    pub president: Option<PresidentView>,
    pub is_current_user_president: bool,
}

async fn current_president(
    state: AppState,
    Extension(user): Extension<CurrentUser>,
    Path(group_id): Path<i64>,
) -> AppResult<PresidentResponse> {
    let database = &state.primary_database;
    Membership::require(database, group_id, user.pk).await?;

    let week = WeekWindow::current();
    let mut rng = StdRng::from_entropy();
    let term = resolve_president(database, group_id, &week, &mut rng).await?;

    let name = Profile::name_of(database, term.user_pk)
        .await?
        .unwrap_or_else(|| "Unknown User".to_owned());

    Ok(Json(PresidentResponse {
        is_current_user_president: term.user_pk == user.pk,
        president: Some(PresidentView {
            user_id: term.user_pk,
            name,
            week_start_date: term.week_start_date,
            week_end_date: term.week_end_date,
        }),
    }))
}
