//! JSON bodies exchanged with the HTTP server.
//!
//! Amounts travel as integer minor units (`*_minor`), never as floats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod group {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub title: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupView {
        pub id: Uuid,
        pub title: String,
    }

    /// A group in the overview, with the balance of its first member.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupSummaryView {
        pub id: Uuid,
        pub title: String,
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupsResponse {
        pub groups: Vec<GroupSummaryView>,
    }
}

pub mod member {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberNew {
        pub name: String,
    }

    /// A member with their balance: positive owes the group, negative is
    /// owed by it.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberView {
        pub id: Uuid,
        pub name: String,
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MembersResponse {
        pub members: Vec<MemberView>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SplitPolicy {
        #[default]
        Equal,
        Percentage,
        Custom,
    }

    /// One member's share of a new expense.
    ///
    /// `value` is in hundredths: cents for `custom`, hundredths of a percent
    /// for `percentage` (`2500` is 25%).
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SplitInput {
        pub member_id: Uuid,
        pub value: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub description: String,
        pub amount_minor: i64,
        pub payer_id: Uuid,
        #[serde(default)]
        pub split_policy: SplitPolicy,
        /// Required for `percentage` and `custom`, ignored for `equal`.
        #[serde(default)]
        pub splits: Vec<SplitInput>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: Uuid,
        pub description: String,
        pub amount_minor: i64,
        pub payer_id: Uuid,
        pub payer_name: String,
        pub occurred_at: DateTime<Utc>,
        pub split_count: usize,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub description: String,
        pub amount_minor: i64,
        pub payer_id: Uuid,
        pub payer_name: String,
        pub occurred_at: DateTime<Utc>,
        pub is_settlement: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitView {
        pub id: Uuid,
        pub member_id: Uuid,
        pub amount_minor: i64,
    }

    /// A transaction with its splits.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionDetail {
        pub id: Uuid,
        pub description: String,
        pub amount_minor: i64,
        pub payer_id: Uuid,
        pub occurred_at: DateTime<Utc>,
        pub is_settlement: bool,
        pub splits: Vec<SplitView>,
    }
}

pub mod settlement {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SettleStatus {
        AlreadySettled,
        Settled,
    }

    /// Outcome of settling a member. `transactions` is empty when the member
    /// was already settled.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettleResponse {
        pub status: SettleStatus,
        pub transactions: Vec<transaction::TransactionDetail>,
    }
}
