use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Query};
use uuid::Uuid;

use crate::{
    Group, GroupSummary, MoneyCents, ResultEngine, balances, groups, members, splits, transactions,
};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Creates an empty group.
    pub async fn create_group(&self, title: &str) -> ResultEngine<Group> {
        let title = normalize_required_text(title, "group title")?;
        let group = Group::new(title);

        with_tx!(self, |db_tx| {
            groups::ActiveModel::from(&group).insert(&db_tx).await?;
            Ok(group)
        })
    }

    pub async fn get_group(&self, group_id: Uuid) -> ResultEngine<Group> {
        with_tx!(self, |db_tx| {
            let model = self.require_group(&db_tx, group_id).await?;
            Ok(Group::from(model))
        })
    }

    /// Lists every group with the balance of its first member.
    ///
    /// There is no notion of a signed-in user, so the first member in
    /// insertion order stands for the viewer. Groups without members report a
    /// zero balance.
    pub async fn list_groups_with_balance(&self) -> ResultEngine<Vec<GroupSummary>> {
        with_tx!(self, |db_tx| {
            let group_models = groups::Entity::find()
                .order_by_asc(groups::Column::Id)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(group_models.len());
            for model in group_models {
                let members = self.group_members(&db_tx, model.id).await?;
                let balance = match members.first() {
                    Some(first) => {
                        let ledger = self.group_ledger(&db_tx, model.id).await?;
                        balances::balance_of(&ledger, first.id)
                    }
                    None => MoneyCents::ZERO,
                };
                out.push(GroupSummary {
                    id: model.id,
                    title: model.title,
                    balance,
                });
            }
            Ok(out)
        })
    }

    /// Deletes a group with all of its members, transactions and splits.
    ///
    /// Dependants are removed explicitly, children first, inside the same DB
    /// transaction.
    pub async fn delete_group(&self, group_id: Uuid) -> ResultEngine<()> {
        let _guard = self.lock_group(group_id).await;

        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, group_id).await?;

            let group_transactions = Query::select()
                .column(transactions::Column::Id)
                .from(transactions::Entity)
                .and_where(transactions::Column::GroupId.eq(group_id))
                .to_owned();

            splits::Entity::delete_many()
                .filter(splits::Column::TransactionId.in_subquery(group_transactions))
                .exec(&db_tx)
                .await?;
            transactions::Entity::delete_many()
                .filter(transactions::Column::GroupId.eq(group_id))
                .exec(&db_tx)
                .await?;
            members::Entity::delete_many()
                .filter(members::Column::GroupId.eq(group_id))
                .exec(&db_tx)
                .await?;
            groups::Entity::delete_by_id(group_id).exec(&db_tx).await?;

            Ok(())
        })
    }
}
