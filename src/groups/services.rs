use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{auth::CurrentUser, database::Database, errors::AppError, state::AppState};

use super::models::{Group, GroupWithRole, MemberWithName, Membership, Role};
use super::routes::{CreateGroupForm, GroupDetail, GroupView, MemberView};

/// Two inserts with no cross-table transaction: if the owner membership
/// cannot be written, the group row is compensated away.
pub async fn create_group(
    database: &Database,
    caller: i64,
    input: &CreateGroupForm,
) -> Result<GroupView, AppError> {
    input
        .validate()
        .map_err(|e| AppError::Validation(validation_message(&e)))?;

    let name = input.name.trim();
    let description = input.description.as_deref().unwrap_or("").trim();
    let invite_token = Uuid::new_v4().simple().to_string();

    let group_pk = Group::insert(database, name, description, &invite_token, caller).await?;

    if let Err(e) = Membership::insert(database, group_pk, caller, Role::Owner).await {
        Group::delete(database, group_pk).await?;
        return Err(e);
    }

    info!(group = group_pk, owner = caller, "group created");

    let group = Group::find(database, group_pk)
        .await?
        .ok_or_else(|| AppError::custom_internal("group vanished after insert"))?;
    Ok(GroupView::from_group(group, Role::Owner))
}

pub async fn list_groups(state: &AppState, caller: &CurrentUser) -> Result<Vec<GroupView>, AppError> {
    let groups = Group::for_user(&state.primary_database, caller.pk).await?;
    Ok(groups
        .into_iter()
        .map(|GroupWithRole { group, role }| GroupView::from_group(group, role))
        .collect())
}

pub async fn group_detail(
    state: &AppState,
    caller: &CurrentUser,
    group_pk: i64,
) -> Result<GroupDetail, AppError> {
    let membership = Membership::require(&state.primary_database, group_pk, caller.pk).await?;

    let group = Group::find(&state.primary_database, group_pk)
        .await?
        .ok_or_else(|| AppError::NotFound("Group not found".to_owned()))?;
    let members = MemberWithName::for_group(&state.primary_database, group_pk).await?;

    Ok(GroupDetail {
        view: GroupView::from_group(group, membership.role),
        members: members.into_iter().map(MemberView::from).collect(),
    })
}

pub async fn preview_by_invite_token(
    state: &AppState,
    invite_token: &str,
) -> Result<GroupView, AppError> {
    Group::find_by_invite_token(&state.primary_database, invite_token)
        .await?
        .map(|group| GroupView::from_group(group, Role::Member))
        .ok_or_else(|| AppError::NotFound("Invalid or expired invite link".to_owned()))
}

pub async fn join_by_invite_token(
    state: &AppState,
    caller: &CurrentUser,
    invite_token: &str,
) -> Result<GroupView, AppError> {
    let group = Group::find_by_invite_token(&state.primary_database, invite_token)
        .await?
        .ok_or_else(|| AppError::NotFound("Invalid or expired invite link".to_owned()))?;

    if Membership::find(&state.primary_database, group.pk, caller.pk)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "You are already a member of this group".to_owned(),
        ));
    }

    Membership::insert(&state.primary_database, group.pk, caller.pk, Role::Member).await?;
    info!(group = group.pk, user = caller.pk, "member joined");
    Ok(GroupView::from_group(group, Role::Member))
}

pub async fn leave_group(
    state: &AppState,
    caller: &CurrentUser,
    group_pk: i64,
) -> Result<(), AppError> {
    let membership = Membership::find(&state.primary_database, group_pk, caller.pk)
        .await?
        .ok_or_else(|| AppError::NotFound("You are not a member of this group".to_owned()))?;

    // No ownership-transfer path exists.
    if membership.role == Role::Owner {
        return Err(AppError::Forbidden(
            "Group owners cannot leave the group. Please transfer ownership first or delete the group."
                .to_owned(),
        ));
    }

    Membership::delete(&state.primary_database, group_pk, caller.pk).await?;
    info!(group = group_pk, user = caller.pk, "member left");
    Ok(())
}

pub fn validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field| field.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid input".to_owned())
}
