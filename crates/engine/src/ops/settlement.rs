use sea_orm::TransactionTrait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ResultEngine, SettlementPlan, Transaction, settlement};

use super::{Engine, access::find_member, with_tx};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "transactions", rename_all = "snake_case")]
pub enum SettleOutcome {
    /// No pairwise balance needed a transfer; nothing was written.
    AlreadySettled,
    /// The settlement transactions that were stored, one per counterpart.
    Settled(Vec<Transaction>),
}

impl Engine {
    /// Settles `member_id` against every other member of the group.
    ///
    /// All settlement transactions are stored in one DB transaction: either
    /// all of them are committed or none is. Calling it again right after is a
    /// no-op returning [`SettleOutcome::AlreadySettled`].
    pub async fn settle(&self, group_id: Uuid, member_id: Uuid) -> ResultEngine<SettleOutcome> {
        let _guard = self.lock_group(group_id).await;

        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, group_id).await?;
            let members = self.group_members(&db_tx, group_id).await?;
            let member = find_member(&members, member_id)?;
            let ledger = self.group_ledger(&db_tx, group_id).await?;

            let ids: Vec<Uuid> = members.iter().map(|m| m.id).collect();
            let transfers = match settlement::plan_settlement(&ledger, member_id, &ids) {
                SettlementPlan::AlreadySettled => return Ok(SettleOutcome::AlreadySettled),
                SettlementPlan::Transfers(transfers) => transfers,
            };

            let mut created = Vec::with_capacity(transfers.len());
            for transfer in transfers {
                let other_id = if transfer.payer_id == member_id {
                    transfer.recipient_id
                } else {
                    transfer.payer_id
                };
                let other = find_member(&members, other_id)?;
                let tx = Transaction::settlement(
                    group_id,
                    (&member.name, &other.name),
                    transfer.payer_id,
                    transfer.recipient_id,
                    transfer.amount,
                )?;
                self.insert_transaction(&db_tx, &tx).await?;
                created.push(tx);
            }

            Ok(SettleOutcome::Settled(created))
        })
    }
}
