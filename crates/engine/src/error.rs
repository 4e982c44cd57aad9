//! The module contains the error the engine can throw.
//!
//! The errors fall in four families:
//!
//! - not found: [`GroupNotFound`], [`MemberNotFound`], [`TransactionNotFound`]
//!   and [`PayerNotInGroup`].
//! - validation: [`InvalidInput`] and [`InvalidAmount`], always correctable by
//!   the caller.
//! - state conflict: [`MemberNotSettled`], carrying the balance that blocked
//!   the operation.
//! - persistence: [`Database`], the whole mutation has been rolled back.
//!
//!  [`GroupNotFound`]: EngineError::GroupNotFound
//!  [`MemberNotFound`]: EngineError::MemberNotFound
//!  [`TransactionNotFound`]: EngineError::TransactionNotFound
//!  [`PayerNotInGroup`]: EngineError::PayerNotInGroup
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`MemberNotSettled`]: EngineError::MemberNotSettled
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::MoneyCents;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("group \"{0}\" not found")]
    GroupNotFound(Uuid),
    #[error("member \"{0}\" not found")]
    MemberNotFound(Uuid),
    #[error("transaction \"{0}\" not found")]
    TransactionNotFound(Uuid),
    #[error("payer \"{0}\" is not a member of the group")]
    PayerNotInGroup(Uuid),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("member must be settled first. Balance: {balance}")]
    MemberNotSettled { member_id: Uuid, balance: MoneyCents },
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::GroupNotFound(a), Self::GroupNotFound(b)) => a == b,
            (Self::MemberNotFound(a), Self::MemberNotFound(b)) => a == b,
            (Self::TransactionNotFound(a), Self::TransactionNotFound(b)) => a == b,
            (Self::PayerNotInGroup(a), Self::PayerNotInGroup(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (
                Self::MemberNotSettled {
                    member_id: a,
                    balance: x,
                },
                Self::MemberNotSettled {
                    member_id: b,
                    balance: y,
                },
            ) => a == b && x == y,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_settled_reports_balance() {
        let err = EngineError::MemberNotSettled {
            member_id: Uuid::nil(),
            balance: MoneyCents::new(-1050),
        };
        assert_eq!(err.to_string(), "member must be settled first. Balance: -10.50");
    }
}
