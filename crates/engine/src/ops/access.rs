use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Member, ResultEngine, Transaction, groups, members, splits, transactions,
};

use super::Engine;

impl Engine {
    pub(super) async fn require_group(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
    ) -> ResultEngine<groups::Model> {
        groups::Entity::find_by_id(group_id)
            .one(db)
            .await?
            .ok_or(EngineError::GroupNotFound(group_id))
    }

    /// Members of a group in insertion order.
    pub(super) async fn group_members(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
    ) -> ResultEngine<Vec<Member>> {
        let rows = members::Entity::find()
            .filter(members::Column::GroupId.eq(group_id))
            .order_by_asc(members::Column::Id)
            .all(db)
            .await?;
        Ok(rows.into_iter().map(Member::from).collect())
    }

    /// The full transaction log of a group, with splits, ordered by
    /// occurrence.
    pub(super) async fn group_ledger(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
    ) -> ResultEngine<Vec<Transaction>> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::GroupId.eq(group_id))
            .order_by_asc(transactions::Column::OccurredAt)
            .order_by_asc(transactions::Column::Id)
            .find_with_related(splits::Entity)
            .all(db)
            .await?;

        let mut ledger: Vec<Transaction> = rows.into_iter().map(Transaction::from).collect();
        ledger.sort_by_key(|tx| (tx.occurred_at, tx.id));
        for tx in &mut ledger {
            tx.splits.sort_by_key(|split| split.id);
        }
        Ok(ledger)
    }

    pub(super) async fn insert_transaction(
        &self,
        db: &DatabaseTransaction,
        tx: &Transaction,
    ) -> ResultEngine<()> {
        transactions::ActiveModel::from(tx).insert(db).await?;
        for split in &tx.splits {
            splits::ActiveModel::from(split).insert(db).await?;
        }
        Ok(())
    }
}

pub(super) fn find_member(members: &[Member], member_id: Uuid) -> ResultEngine<&Member> {
    members
        .iter()
        .find(|m| m.id == member_id)
        .ok_or(EngineError::MemberNotFound(member_id))
}
