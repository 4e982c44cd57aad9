//! Transaction primitives.
//!
//! A `Transaction` is an expense paid by one member and allocated to one or
//! more members through its [`Split`]s. Settlements are ordinary transactions
//! with a single split and a description starting with [`SETTLEMENT_TAG`].

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine, Split, splits};

/// Description prefix marking a settlement transaction.
pub const SETTLEMENT_TAG: &str = "Settlement:";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub group_id: Uuid,
    pub description: String,
    pub amount: MoneyCents,
    pub payer_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub splits: Vec<Split>,
}

impl Transaction {
    /// Creates a transaction stamped with the current time.
    pub fn new(
        group_id: Uuid,
        description: String,
        amount: MoneyCents,
        payer_id: Uuid,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        if !amount.is_within_limit() {
            return Err(EngineError::InvalidAmount(format!(
                "amount_minor must not exceed {}",
                MoneyCents::MAX.cents()
            )));
        }
        Ok(Self {
            id: Uuid::now_v7(),
            group_id,
            description,
            amount,
            payer_id,
            occurred_at: Utc::now(),
            splits: Vec::new(),
        })
    }

    /// Builds a settlement: `payer_id` hands `amount` over to `recipient_id`.
    ///
    /// The description names the member being settled first, then the
    /// counterpart.
    pub fn settlement(
        group_id: Uuid,
        (settled_name, other_name): (&str, &str),
        payer_id: Uuid,
        recipient_id: Uuid,
        amount: MoneyCents,
    ) -> ResultEngine<Self> {
        let mut tx = Self::new(
            group_id,
            format!("{SETTLEMENT_TAG} {settled_name} & {other_name}"),
            amount,
            payer_id,
        )?;
        tx.splits.push(Split::new(tx.id, recipient_id, amount));
        Ok(tx)
    }

    pub fn is_settlement(&self) -> bool {
        self.splits.len() == 1 && self.description.starts_with(SETTLEMENT_TAG)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub group_id: Uuid,
    pub description: String,
    pub amount_minor: i64,
    pub payer_id: Uuid,
    pub occurred_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Groups,
    #[sea_orm(
        belongs_to = "super::members::Entity",
        from = "Column::PayerId",
        to = "super::members::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Payer,
    #[sea_orm(has_many = "super::splits::Entity")]
    Splits,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl Related<super::members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payer.def()
    }
}

impl Related<super::splits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Splits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id),
            group_id: ActiveValue::Set(tx.group_id),
            description: ActiveValue::Set(tx.description.clone()),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            payer_id: ActiveValue::Set(tx.payer_id),
            occurred_at: ActiveValue::Set(tx.occurred_at),
        }
    }
}

impl From<(Model, Vec<splits::Model>)> for Transaction {
    fn from((model, split_models): (Model, Vec<splits::Model>)) -> Self {
        Self {
            id: model.id,
            group_id: model.group_id,
            description: model.description,
            amount: MoneyCents::new(model.amount_minor),
            payer_id: model.payer_id,
            occurred_at: model.occurred_at,
            splits: split_models.into_iter().map(Split::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_amount() {
        let err = Transaction::new(
            Uuid::now_v7(),
            "Dinner".to_string(),
            MoneyCents::ZERO,
            Uuid::now_v7(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidAmount("amount_minor must be > 0".to_string())
        );
    }

    #[test]
    fn settlement_has_single_split_and_tag() {
        let (payer, recipient) = (Uuid::now_v7(), Uuid::now_v7());
        let tx = Transaction::settlement(
            Uuid::now_v7(),
            ("Alice", "Bob"),
            payer,
            recipient,
            MoneyCents::new(1000),
        )
        .unwrap();

        assert!(tx.is_settlement());
        assert_eq!(tx.description, "Settlement: Alice & Bob");
        assert_eq!(tx.payer_id, payer);
        assert_eq!(tx.splits.len(), 1);
        assert_eq!(tx.splits[0].member_id, recipient);
        assert_eq!(tx.splits[0].transaction_id, tx.id);
        assert_eq!(tx.splits[0].amount, MoneyCents::new(1000));
    }

    #[test]
    fn rejects_amount_above_limit() {
        let err = Transaction::new(
            Uuid::now_v7(),
            "Yacht".to_string(),
            MoneyCents::new(MoneyCents::MAX.cents() + 1),
            Uuid::now_v7(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));

        let tx = Transaction::new(
            Uuid::now_v7(),
            "Yacht".to_string(),
            MoneyCents::MAX,
            Uuid::now_v7(),
        )
        .unwrap();
        assert_eq!(tx.amount, MoneyCents::MAX);
    }
}
