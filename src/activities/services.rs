use rand::Rng;
use tracing::info;
use validator::Validate;

use crate::{
    auth::CurrentUser,
    errors::AppError,
    groups::Membership,
    president::{resolve_president, WeekWindow},
    state::AppState,
};

use super::models::{Activity, ActivityRow};
use super::routes::{ActivityForm, ActivityView, RsvpForm, RsvpListResponse, RsvpView};
use super::rsvps;

pub async fn list_activities(
    state: &AppState,
    caller: &CurrentUser,
    group_pk: i64,
) -> Result<Vec<ActivityView>, AppError> {
    let database = &state.primary_database;
    Membership::require(database, group_pk, caller.pk).await?;

    let rows = ActivityRow::for_group(database, group_pk, caller.pk).await?;
    Ok(rows
        .into_iter()
        .map(|row| ActivityView::from_row(row, caller.pk))
        .collect())
}

/// Only the week's president proposes activities. The election runs here if
/// the week has no term yet, so the first create of the week settles it.
pub async fn create_activity<R: Rng>(
    state: &AppState,
    caller: &CurrentUser,
    group_pk: i64,
    input: &ActivityForm,
    rng: &mut R,
) -> Result<ActivityView, AppError> {
    let database = &state.primary_database;
    Membership::require(database, group_pk, caller.pk).await?;

    let week = WeekWindow::current();
    let term = resolve_president(database, group_pk, &week, rng).await?;
    if term.user_pk != caller.pk {
        return Err(AppError::Forbidden(
            "Only this week's president can propose activities.".to_owned(),
        ));
    }

    input
        .validate()
        .map_err(|e| AppError::Validation(crate::groups::validation_message(&e)))?;

    let activity_pk = Activity::insert(
        database,
        group_pk,
        input.title.trim(),
        input.description.as_deref().unwrap_or("").trim(),
        input.event_date,
        caller.pk,
    )
    .await?;

    info!(group = group_pk, activity = activity_pk, "activity created");

    let row = ActivityRow::fetch(database, activity_pk, caller.pk).await?;
    Ok(ActivityView::from_row(row, caller.pk))
}

pub async fn update_activity(
    state: &AppState,
    caller: &CurrentUser,
    group_pk: i64,
    activity_pk: i64,
    input: &ActivityForm,
) -> Result<ActivityView, AppError> {
    let database = &state.primary_database;
    Membership::require(database, group_pk, caller.pk).await?;

    let activity = Activity::find_in_group(database, activity_pk, group_pk)
        .await?
        .ok_or_else(|| AppError::NotFound("Activity not found".to_owned()))?;

    // Edit rights belong to the creator forever, not to the sitting president.
    if activity.created_by != caller.pk {
        return Err(AppError::Forbidden(
            "Access denied. You can only edit activities you created.".to_owned(),
        ));
    }

    input
        .validate()
        .map_err(|e| AppError::Validation(crate::groups::validation_message(&e)))?;

    Activity::update(
        database,
        activity_pk,
        input.title.trim(),
        input.description.as_deref().unwrap_or("").trim(),
        input.event_date,
    )
    .await?;

    let row = ActivityRow::fetch(database, activity_pk, caller.pk).await?;
    Ok(ActivityView::from_row(row, caller.pk))
}

pub async fn delete_activity(
    state: &AppState,
    caller: &CurrentUser,
    group_pk: i64,
    activity_pk: i64,
) -> Result<(), AppError> {
    let database = &state.primary_database;
    Membership::require(database, group_pk, caller.pk).await?;

    let activity = Activity::find_in_group(database, activity_pk, group_pk)
        .await?
        .ok_or_else(|| AppError::NotFound("Activity not found".to_owned()))?;

    if activity.created_by != caller.pk {
        return Err(AppError::Forbidden(
            "Access denied. You can only delete activities you created.".to_owned(),
        ));
    }

    Activity::delete(database, activity_pk).await?;
    info!(group = group_pk, activity = activity_pk, "activity deleted");
    Ok(())
}

pub async fn record_rsvp(
    state: &AppState,
    caller: &CurrentUser,
    group_pk: i64,
    activity_pk: i64,
    input: &RsvpForm,
) -> Result<(), AppError> {
    let database = &state.primary_database;
    Membership::require(database, group_pk, caller.pk).await?;

    Activity::find_in_group(database, activity_pk, group_pk)
        .await?
        .ok_or_else(|| AppError::NotFound("Activity not found".to_owned()))?;

    rsvps::record_response(database, activity_pk, caller.pk, input.response).await
}

pub async fn remove_rsvp(
    state: &AppState,
    caller: &CurrentUser,
    group_pk: i64,
    activity_pk: i64,
) -> Result<(), AppError> {
    let database = &state.primary_database;
    Membership::require(database, group_pk, caller.pk).await?;

    rsvps::remove_response(database, activity_pk, caller.pk).await
}

pub async fn list_rsvps(
    state: &AppState,
    caller: &CurrentUser,
    group_pk: i64,
    activity_pk: i64,
) -> Result<RsvpListResponse, AppError> {
    let database = &state.primary_database;
    Membership::require(database, group_pk, caller.pk).await?;

    Activity::find_in_group(database, activity_pk, group_pk)
        .await?
        .ok_or_else(|| AppError::NotFound("Activity not found".to_owned()))?;

    let responses = rsvps::list_responses(database, activity_pk).await?;
    let (yes, no): (Vec<_>, Vec<_>) = responses
        .into_iter()
        .map(RsvpView::from)
        .partition(|r| r.response == rsvps::RsvpResponse::Yes);

    Ok(RsvpListResponse {
        total_yes: yes.len(),
        total_no: no.len(),
        yes,
        no,
    })
}
