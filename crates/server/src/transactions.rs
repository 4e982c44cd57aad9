//! Transactions API endpoints

use api_types::transaction::{
    SplitPolicy as ApiPolicy, SplitView, TransactionCreated, TransactionDetail,
    TransactionListResponse, TransactionNew, TransactionView,
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use engine::{CreateTransactionCmd, MoneyCents, Percent, SplitPolicy, Transaction};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{ServerState, json_body, path_params},
};

fn map_policy(payload: &TransactionNew) -> SplitPolicy {
    let shares = payload.splits.iter();
    match payload.split_policy {
        ApiPolicy::Equal => SplitPolicy::Equal,
        ApiPolicy::Percentage => SplitPolicy::Percentage(
            shares
                .map(|s| (s.member_id, Percent::new(s.value)))
                .collect(),
        ),
        ApiPolicy::Custom => SplitPolicy::Custom(
            shares
                .map(|s| (s.member_id, MoneyCents::new(s.value)))
                .collect(),
        ),
    }
}

pub(crate) fn detail_view(tx: Transaction) -> TransactionDetail {
    let is_settlement = tx.is_settlement();
    TransactionDetail {
        id: tx.id,
        description: tx.description,
        amount_minor: tx.amount.cents(),
        payer_id: tx.payer_id,
        occurred_at: tx.occurred_at,
        is_settlement,
        splits: tx
            .splits
            .into_iter()
            .map(|split| SplitView {
                id: split.id,
                member_id: split.member_id,
                amount_minor: split.amount.cents(),
            })
            .collect(),
    }
}

pub async fn list(
    State(state): State<ServerState>,
    group_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let group_id = path_params(group_id)?;
    let transactions = state.engine.get_group_transactions(group_id).await?;

    Ok(Json(TransactionListResponse {
        transactions: transactions
            .into_iter()
            .map(|tx| TransactionView {
                id: tx.id,
                description: tx.description,
                amount_minor: tx.amount.cents(),
                payer_id: tx.payer_id,
                payer_name: tx.payer_name,
                occurred_at: tx.occurred_at,
                is_settlement: tx.is_settlement,
            })
            .collect(),
    }))
}

/// Handle requests for recording a new expense
pub async fn create(
    State(state): State<ServerState>,
    group_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<TransactionNew>, JsonRejection>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let group_id = path_params(group_id)?;
    let payload = json_body(payload)?;

    let policy = map_policy(&payload);
    let policy_name = policy.as_str();
    let cmd = CreateTransactionCmd::new(
        group_id,
        payload.description,
        MoneyCents::new(payload.amount_minor),
        payload.payer_id,
    )
    .policy(policy);

    let created = state.engine.create_transaction(cmd).await?;
    tracing::info!(
        %group_id,
        transaction_id = %created.id,
        policy = policy_name,
        "transaction recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(TransactionCreated {
            id: created.id,
            description: created.description,
            amount_minor: created.amount.cents(),
            payer_id: created.payer_id,
            payer_name: created.payer_name,
            occurred_at: created.occurred_at,
            split_count: created.split_count,
        }),
    ))
}

pub async fn get_detail(
    State(state): State<ServerState>,
    ids: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<Json<TransactionDetail>, ServerError> {
    let (group_id, transaction_id) = path_params(ids)?;
    let tx = state.engine.get_transaction(group_id, transaction_id).await?;

    Ok(Json(detail_view(tx)))
}
