//! Settlement planning.
//!
//! Settling a member means emitting, for every other member they hold a
//! non-negligible net balance with, one transfer that cancels it. The plan is
//! computed here without touching storage; `Engine::settle` turns it into
//! settlement transactions and stores them in one batch.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{MoneyCents, Transaction, balances};

/// One transfer: `payer_id` pays `amount` to `recipient_id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub payer_id: Uuid,
    pub recipient_id: Uuid,
    pub amount: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "transfers", rename_all = "snake_case")]
pub enum SettlementPlan {
    /// Nothing to do: every pairwise balance is within one cent of zero.
    AlreadySettled,
    /// Transfers to apply, in the group's member order.
    Transfers(Vec<Transfer>),
}

impl SettlementPlan {
    pub fn transfers(&self) -> &[Transfer] {
        match self {
            Self::AlreadySettled => &[],
            Self::Transfers(transfers) => transfers,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Self::AlreadySettled)
    }
}

/// Plans the transfers that bring every pairwise balance of `member_id` to
/// zero. `members` lists the group's members in insertion order; the member
/// being settled may appear in it and is skipped.
///
/// A positive net (the member owes `other`) becomes a transfer paid by the
/// member to `other`; a negative one is paid by `other` to the member.
pub fn plan_settlement(
    transactions: &[Transaction],
    member_id: Uuid,
    members: &[Uuid],
) -> SettlementPlan {
    let transfers: Vec<Transfer> = balances::pairwise_balances(transactions, member_id, members)
        .into_iter()
        .filter(|(_, net)| !balances::is_settled(*net))
        .map(|(other, net)| {
            if net.is_positive() {
                Transfer {
                    payer_id: member_id,
                    recipient_id: other,
                    amount: net.abs(),
                }
            } else {
                Transfer {
                    payer_id: other,
                    recipient_id: member_id,
                    amount: net.abs(),
                }
            }
        })
        .collect();

    if transfers.is_empty() {
        SettlementPlan::AlreadySettled
    } else {
        SettlementPlan::Transfers(transfers)
    }
}
