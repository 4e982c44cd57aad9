//! Transaction splits.
//!
//! A [`Split`] is one member's allocated share of a
//! [`Transaction`](crate::Transaction) total. Amounts are stored as integer
//! **minor units** (cents).

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::MoneyCents;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub member_id: Uuid,
    pub amount: MoneyCents,
}

impl Split {
    pub fn new(transaction_id: Uuid, member_id: Uuid, amount: MoneyCents) -> Self {
        Self {
            id: Uuid::now_v7(),
            transaction_id,
            member_id,
            amount,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "splits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub member_id: Uuid,
    pub amount_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::TransactionId",
        to = "super::transactions::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Transactions,
    #[sea_orm(
        belongs_to = "super::members::Entity",
        from = "Column::MemberId",
        to = "super::members::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Members,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Split> for ActiveModel {
    fn from(split: &Split) -> Self {
        Self {
            id: ActiveValue::Set(split.id),
            transaction_id: ActiveValue::Set(split.transaction_id),
            member_id: ActiveValue::Set(split.member_id),
            amount_minor: ActiveValue::Set(split.amount.cents()),
        }
    }
}

impl From<Model> for Split {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            transaction_id: model.transaction_id,
            member_id: model.member_id,
            amount: MoneyCents::new(model.amount_minor),
        }
    }
}
