//! Balance computations over a group's transaction log.
//!
//! Every function here is pure: balances are derived on read and never
//! stored, so they cannot drift from the log.
//!
//! Sign convention: a positive balance means the member owes, a negative one
//! means the member is owed. A split held by the payer of its own transaction
//! is skipped entirely.

use uuid::Uuid;

use crate::{MoneyCents, Transaction};

/// Net balance of `member_id` against the whole group.
pub fn balance_of(transactions: &[Transaction], member_id: Uuid) -> MoneyCents {
    let mut balance = MoneyCents::ZERO;
    for tx in transactions {
        for split in &tx.splits {
            if split.member_id == tx.payer_id {
                continue;
            }
            if split.member_id == member_id {
                balance += split.amount;
            } else if tx.payer_id == member_id {
                balance -= split.amount;
            }
        }
    }
    balance
}

/// Net amount `a` owes `b` (negative when `b` owes `a`).
pub fn net_between(transactions: &[Transaction], a: Uuid, b: Uuid) -> MoneyCents {
    if a == b {
        return MoneyCents::ZERO;
    }
    let mut net = MoneyCents::ZERO;
    for tx in transactions {
        for split in &tx.splits {
            if split.member_id == a && tx.payer_id == b {
                net += split.amount;
            } else if split.member_id == b && tx.payer_id == a {
                net -= split.amount;
            }
        }
    }
    net
}

/// Balances of every member in `member_ids`, in the same order, computed in a
/// single pass over the log.
pub fn balances(transactions: &[Transaction], member_ids: &[Uuid]) -> Vec<(Uuid, MoneyCents)> {
    let mut out: Vec<(Uuid, MoneyCents)> =
        member_ids.iter().map(|id| (*id, MoneyCents::ZERO)).collect();
    let slot = |id: Uuid| member_ids.iter().position(|m| *m == id);

    for tx in transactions {
        let payer_slot = slot(tx.payer_id);
        for split in &tx.splits {
            if split.member_id == tx.payer_id {
                continue;
            }
            if let Some(i) = slot(split.member_id) {
                out[i].1 += split.amount;
            }
            if let Some(i) = payer_slot {
                out[i].1 -= split.amount;
            }
        }
    }
    out
}

/// What `member_id` owes each of `others` (the member's derived balance
/// mapping), in the order of `others`. The member itself is skipped.
pub fn pairwise_balances(
    transactions: &[Transaction],
    member_id: Uuid,
    others: &[Uuid],
) -> Vec<(Uuid, MoneyCents)> {
    others
        .iter()
        .filter(|other| **other != member_id)
        .map(|other| (*other, net_between(transactions, member_id, *other)))
        .collect()
}

/// Returns `true` if `balance` is zero within one cent.
pub fn is_settled(balance: MoneyCents) -> bool {
    balance.is_negligible()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Split;

    fn expense(payer: Uuid, shares: &[(Uuid, i64)]) -> Transaction {
        let mut tx = Transaction::new(
            Uuid::now_v7(),
            "expense".to_string(),
            MoneyCents::new(shares.iter().map(|(_, a)| a).sum()),
            payer,
        )
        .unwrap();
        tx.splits = shares
            .iter()
            .map(|(member, amount)| Split::new(tx.id, *member, MoneyCents::new(*amount)))
            .collect();
        tx
    }

    fn ids<const N: usize>() -> [Uuid; N] {
        std::array::from_fn(|_| Uuid::now_v7())
    }

    #[test]
    fn empty_log_is_zero_for_everyone() {
        let [a, b] = ids();
        assert_eq!(balance_of(&[], a), MoneyCents::ZERO);
        assert_eq!(net_between(&[], a, b), MoneyCents::ZERO);
        assert_eq!(
            balances(&[], &[a, b]),
            vec![(a, MoneyCents::ZERO), (b, MoneyCents::ZERO)]
        );
    }

    #[test]
    fn equal_split_of_ninety() {
        let [a, b, c] = ids();
        let log = vec![expense(a, &[(a, 30_00), (b, 30_00), (c, 30_00)])];

        assert_eq!(net_between(&log, b, a), MoneyCents::new(30_00));
        assert_eq!(net_between(&log, c, a), MoneyCents::new(30_00));
        assert_eq!(net_between(&log, a, b), MoneyCents::new(-30_00));
        assert_eq!(balance_of(&log, a), MoneyCents::new(-60_00));
        assert_eq!(balance_of(&log, b), MoneyCents::new(30_00));
    }

    #[test]
    fn payer_own_split_is_ignored() {
        let [a, b] = ids();
        let with_self = vec![expense(a, &[(a, 70_00), (b, 30_00)])];
        let without_self = vec![expense(a, &[(b, 30_00)])];

        assert_eq!(balance_of(&with_self, a), balance_of(&without_self, a));
        assert_eq!(balance_of(&with_self, a), MoneyCents::new(-30_00));
        assert_eq!(net_between(&with_self, a, a), MoneyCents::ZERO);
    }

    #[test]
    fn group_balances_sum_to_zero() {
        let [a, b, c] = ids();
        let log = vec![
            expense(a, &[(a, 10_00), (b, 10_00), (c, 10_00)]),
            expense(b, &[(a, 20_00), (b, 20_00), (c, 20_00)]),
            expense(c, &[(a, 7_33), (b, 0), (c, 12_67)]),
        ];
        let all = balances(&log, &[a, b, c]);
        let total: MoneyCents = all.iter().map(|(_, b)| *b).sum();
        assert_eq!(total, MoneyCents::ZERO);

        for (id, balance) in all {
            assert_eq!(balance, balance_of(&log, id));
        }
    }

    #[test]
    fn pairwise_balances_add_up_to_balance() {
        let [a, b, c] = ids();
        let log = vec![
            expense(a, &[(a, 10_00), (b, 10_00), (c, 10_00)]),
            expense(b, &[(a, 20_00), (b, 20_00), (c, 20_00)]),
        ];
        let pairs = pairwise_balances(&log, a, &[a, b, c]);
        assert_eq!(
            pairs,
            vec![(b, MoneyCents::new(10_00)), (c, MoneyCents::new(-10_00))]
        );
        let sum: MoneyCents = pairs.iter().map(|(_, n)| *n).sum();
        assert_eq!(sum, balance_of(&log, a));
        assert!(is_settled(sum));
    }
}
