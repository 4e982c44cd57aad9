//! Shared-expense ledger engine.
//!
//! Groups own members and transactions; each transaction is paid by one
//! member and allocated to members through splits. Balances are never
//! stored: [`balances`] derives them from the log, [`settlement`] plans the
//! transfers that zero a member out, and [`Engine`] runs every operation
//! against the database inside one transaction.

pub use commands::CreateTransactionCmd;
pub use error::EngineError;
pub use groups::{Group, GroupSummary};
pub use members::{Member, MemberBalance};
pub use money::{MoneyCents, Percent};
pub use ops::{Engine, EngineBuilder, SettleOutcome, TransactionCreated, TransactionSummary};
pub use settlement::{SettlementPlan, Transfer};
pub use split_policy::SplitPolicy;
pub use splits::Split;
pub use transactions::{SETTLEMENT_TAG, Transaction};

pub mod balances;
mod commands;
mod error;
pub mod groups;
pub mod members;
mod money;
mod ops;
pub mod settlement;
mod split_policy;
pub mod splits;
pub mod transactions;

type ResultEngine<T> = Result<T, EngineError>;
