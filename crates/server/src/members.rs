//! Member API endpoints

use api_types::member::{MemberNew, MemberView, MembersResponse};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use engine::MemberBalance;
use uuid::Uuid;

use crate::{
    ServerError,
    server::{ServerState, json_body, path_params},
};

fn member_view(member: MemberBalance) -> MemberView {
    MemberView {
        id: member.id,
        name: member.name,
        balance_minor: member.balance.cents(),
    }
}

pub async fn list(
    State(state): State<ServerState>,
    group_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MembersResponse>, ServerError> {
    let group_id = path_params(group_id)?;
    let members = state.engine.get_group_members(group_id).await?;

    Ok(Json(MembersResponse {
        members: members.into_iter().map(member_view).collect(),
    }))
}

pub async fn add(
    State(state): State<ServerState>,
    group_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<MemberNew>, JsonRejection>,
) -> Result<(StatusCode, Json<MemberView>), ServerError> {
    let group_id = path_params(group_id)?;
    let payload = json_body(payload)?;
    let member = state.engine.add_member(group_id, &payload.name).await?;

    Ok((StatusCode::CREATED, Json(member_view(member))))
}

/// Handle requests for removing a member. Fails with 409 while the member
/// still owes or is owed money.
pub async fn remove(
    State(state): State<ServerState>,
    ids: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<StatusCode, ServerError> {
    let (group_id, member_id) = path_params(ids)?;
    state.engine.remove_member(group_id, member_id).await?;
    tracing::info!(%group_id, %member_id, "member removed");

    Ok(StatusCode::NO_CONTENT)
}
