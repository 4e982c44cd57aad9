//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use uuid::Uuid;

use crate::{MoneyCents, Percent, SplitPolicy};

/// Record an expense in a group.
#[derive(Clone, Debug)]
pub struct CreateTransactionCmd {
    pub group_id: Uuid,
    pub description: String,
    pub amount: MoneyCents,
    pub payer_id: Uuid,
    pub policy: SplitPolicy,
}

impl CreateTransactionCmd {
    /// An equally split expense.
    #[must_use]
    pub fn new(
        group_id: Uuid,
        description: impl Into<String>,
        amount: MoneyCents,
        payer_id: Uuid,
    ) -> Self {
        Self {
            group_id,
            description: description.into(),
            amount,
            payer_id,
            policy: SplitPolicy::Equal,
        }
    }

    #[must_use]
    pub fn policy(mut self, policy: SplitPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn percentages(self, shares: impl IntoIterator<Item = (Uuid, Percent)>) -> Self {
        self.policy(SplitPolicy::Percentage(shares.into_iter().collect()))
    }

    #[must_use]
    pub fn custom(self, shares: impl IntoIterator<Item = (Uuid, MoneyCents)>) -> Self {
        self.policy(SplitPolicy::Custom(shares.into_iter().collect()))
    }
}
