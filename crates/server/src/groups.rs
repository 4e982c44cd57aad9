//! Group API endpoints

use api_types::group::{GroupNew, GroupSummaryView, GroupView, GroupsResponse};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{ServerState, json_body, path_params},
};

/// Handle requests for listing every group with its balance.
pub async fn list(State(state): State<ServerState>) -> Result<Json<GroupsResponse>, ServerError> {
    let groups = state.engine.list_groups_with_balance().await?;

    Ok(Json(GroupsResponse {
        groups: groups
            .into_iter()
            .map(|group| GroupSummaryView {
                id: group.id,
                title: group.title,
                balance_minor: group.balance.cents(),
            })
            .collect(),
    }))
}

/// Handle requests for creating a new group
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<GroupNew>, JsonRejection>,
) -> Result<(StatusCode, Json<GroupView>), ServerError> {
    let payload = json_body(payload)?;
    let group = state.engine.create_group(&payload.title).await?;

    Ok((
        StatusCode::CREATED,
        Json(GroupView {
            id: group.id,
            title: group.title,
        }),
    ))
}

pub async fn get(
    State(state): State<ServerState>,
    group_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<GroupView>, ServerError> {
    let group_id = path_params(group_id)?;
    let group = state.engine.get_group(group_id).await?;

    Ok(Json(GroupView {
        id: group.id,
        title: group.title,
    }))
}

pub async fn delete(
    State(state): State<ServerState>,
    group_id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ServerError> {
    let group_id = path_params(group_id)?;
    state.engine.delete_group(group_id).await?;
    tracing::info!(%group_id, "group deleted");

    Ok(StatusCode::NO_CONTENT)
}
