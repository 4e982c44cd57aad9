use chrono::{DateTime, Utc};
use sea_orm::TransactionTrait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    CreateTransactionCmd, EngineError, MoneyCents, ResultEngine, SETTLEMENT_TAG, Transaction,
};

use super::{Engine, normalize_required_text, with_tx};

/// Result of recording an expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionCreated {
    pub id: Uuid,
    pub description: String,
    pub amount: MoneyCents,
    pub payer_id: Uuid,
    pub payer_name: String,
    pub occurred_at: DateTime<Utc>,
    pub split_count: usize,
}

/// A transaction as shown in a group's history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub id: Uuid,
    pub description: String,
    pub amount: MoneyCents,
    pub payer_id: Uuid,
    pub payer_name: String,
    pub occurred_at: DateTime<Utc>,
    pub is_settlement: bool,
}

impl Engine {
    /// Records an expense, allocating it with the command's split policy.
    ///
    /// The payer must be a member of the group, and every member named by a
    /// percentage or custom split as well. Descriptions starting with
    /// [`SETTLEMENT_TAG`] are reserved for settlements.
    pub async fn create_transaction(
        &self,
        cmd: CreateTransactionCmd,
    ) -> ResultEngine<TransactionCreated> {
        let description = normalize_required_text(&cmd.description, "description")?;
        if description.starts_with(SETTLEMENT_TAG) {
            return Err(EngineError::InvalidInput(format!(
                "description must not start with {SETTLEMENT_TAG:?}"
            )));
        }
        let _guard = self.lock_group(cmd.group_id).await;

        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, cmd.group_id).await?;
            let members = self.group_members(&db_tx, cmd.group_id).await?;
            let payer = members
                .iter()
                .find(|m| m.id == cmd.payer_id)
                .ok_or(EngineError::PayerNotInGroup(cmd.payer_id))?;

            let mut tx = Transaction::new(
                cmd.group_id,
                description,
                cmd.amount,
                payer.id,
            )?;
            tx.splits = cmd.policy.build_splits(tx.id, tx.amount, &members)?;

            self.insert_transaction(&db_tx, &tx).await?;

            Ok(TransactionCreated {
                id: tx.id,
                description: tx.description,
                amount: tx.amount,
                payer_id: tx.payer_id,
                payer_name: payer.name.clone(),
                occurred_at: tx.occurred_at,
                split_count: tx.splits.len(),
            })
        })
    }

    /// Lists the transactions of a group, oldest first.
    pub async fn get_group_transactions(
        &self,
        group_id: Uuid,
    ) -> ResultEngine<Vec<TransactionSummary>> {
        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, group_id).await?;
            let members = self.group_members(&db_tx, group_id).await?;
            let ledger = self.group_ledger(&db_tx, group_id).await?;

            Ok(ledger
                .into_iter()
                .map(|tx| {
                    let payer_name = members
                        .iter()
                        .find(|m| m.id == tx.payer_id)
                        .map(|m| m.name.clone())
                        .unwrap_or_default();
                    let is_settlement = tx.is_settlement();
                    TransactionSummary {
                        id: tx.id,
                        description: tx.description,
                        amount: tx.amount,
                        payer_id: tx.payer_id,
                        payer_name,
                        occurred_at: tx.occurred_at,
                        is_settlement,
                    }
                })
                .collect())
        })
    }

    /// Returns one transaction of a group with its splits.
    pub async fn get_transaction(
        &self,
        group_id: Uuid,
        transaction_id: Uuid,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, group_id).await?;
            let ledger = self.group_ledger(&db_tx, group_id).await?;
            ledger
                .into_iter()
                .find(|tx| tx.id == transaction_id)
                .ok_or(EngineError::TransactionNotFound(transaction_id))
        })
    }
}
