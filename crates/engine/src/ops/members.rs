use sea_orm::{QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Member, MemberBalance, MoneyCents, ResultEngine, balances, members, splits,
    transactions,
};

use super::{Engine, access::find_member, normalize_required_text, with_tx};

impl Engine {
    /// Adds a member to a group. New members start with a zero balance.
    pub async fn add_member(&self, group_id: Uuid, name: &str) -> ResultEngine<MemberBalance> {
        let name = normalize_required_text(name, "member name")?;
        let _guard = self.lock_group(group_id).await;

        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, group_id).await?;

            let member = Member::new(group_id, name);
            members::ActiveModel::from(&member).insert(&db_tx).await?;

            Ok(MemberBalance {
                id: member.id,
                name: member.name,
                balance: MoneyCents::ZERO,
            })
        })
    }

    /// Lists the members of a group, in insertion order, with their current
    /// balance.
    pub async fn get_group_members(&self, group_id: Uuid) -> ResultEngine<Vec<MemberBalance>> {
        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, group_id).await?;
            let members = self.group_members(&db_tx, group_id).await?;
            let ledger = self.group_ledger(&db_tx, group_id).await?;

            let ids: Vec<Uuid> = members.iter().map(|m| m.id).collect();
            let balances = balances::balances(&ledger, &ids);

            Ok(members
                .into_iter()
                .zip(balances)
                .map(|(member, (_, balance))| MemberBalance {
                    id: member.id,
                    name: member.name,
                    balance,
                })
                .collect())
        })
    }

    /// Removes a settled member from a group.
    ///
    /// Fails with [`EngineError::MemberNotSettled`] while the member's balance
    /// is more than one cent away from zero. Otherwise deletes, in one DB
    /// transaction:
    /// - every split allocated to the member
    /// - every transaction the member paid, with its splits
    /// - the member
    pub async fn remove_member(&self, group_id: Uuid, member_id: Uuid) -> ResultEngine<()> {
        let _guard = self.lock_group(group_id).await;

        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, group_id).await?;
            let members = self.group_members(&db_tx, group_id).await?;
            find_member(&members, member_id)?;

            let ledger = self.group_ledger(&db_tx, group_id).await?;
            let balance = balances::balance_of(&ledger, member_id);
            if !balances::is_settled(balance) {
                return Err(EngineError::MemberNotSettled { member_id, balance });
            }

            let paid: Vec<Uuid> = ledger
                .iter()
                .filter(|tx| tx.payer_id == member_id)
                .map(|tx| tx.id)
                .collect();

            splits::Entity::delete_many()
                .filter(splits::Column::MemberId.eq(member_id))
                .exec(&db_tx)
                .await?;
            if !paid.is_empty() {
                splits::Entity::delete_many()
                    .filter(splits::Column::TransactionId.is_in(paid.clone()))
                    .exec(&db_tx)
                    .await?;
                transactions::Entity::delete_many()
                    .filter(transactions::Column::Id.is_in(paid))
                    .exec(&db_tx)
                    .await?;
            }
            members::Entity::delete_by_id(member_id).exec(&db_tx).await?;

            Ok(())
        })
    }
}
