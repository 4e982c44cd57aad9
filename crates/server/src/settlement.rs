//! Settlement API endpoint

use api_types::settlement::{SettleResponse, SettleStatus};
use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use engine::SettleOutcome;
use uuid::Uuid;

use crate::{
    ServerError,
    server::{ServerState, path_params},
    transactions::detail_view,
};

/// Handle requests for settling a member against the rest of the group.
///
/// Settling an already settled member is a no-op answered with
/// `already_settled`.
pub async fn settle(
    State(state): State<ServerState>,
    ids: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<Json<SettleResponse>, ServerError> {
    let (group_id, member_id) = path_params(ids)?;

    let response = match state.engine.settle(group_id, member_id).await? {
        SettleOutcome::AlreadySettled => SettleResponse {
            status: SettleStatus::AlreadySettled,
            transactions: Vec::new(),
        },
        SettleOutcome::Settled(created) => {
            tracing::info!(
                %group_id,
                %member_id,
                transfers = created.len(),
                "member settled"
            );
            SettleResponse {
                status: SettleStatus::Settled,
                transactions: created.into_iter().map(detail_view).collect(),
            }
        }
    };

    Ok(Json(response))
}
