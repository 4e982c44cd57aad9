//! Split policies.
//!
//! A [`SplitPolicy`] turns a transaction total into the set of [`Split`]s
//! allocated to group members:
//!
//! - [`SplitPolicy::Equal`]: every member of the group gets the same share;
//!   leftover cents go one each to the first members in insertion order.
//! - [`SplitPolicy::Percentage`]: shares proportional to the given
//!   percentages, which must add up to 100% (±0.01).
//! - [`SplitPolicy::Custom`]: explicit amounts, which must add up to the total
//!   (±0.01).
//!
//! Equal and percentage splits always add up to the total exactly.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Member, MoneyCents, Percent, ResultEngine, Split};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", content = "shares", rename_all = "snake_case")]
pub enum SplitPolicy {
    Equal,
    Percentage(Vec<(Uuid, Percent)>),
    Custom(Vec<(Uuid, MoneyCents)>),
}

impl SplitPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Percentage(_) => "percentage",
            Self::Custom(_) => "custom",
        }
    }

    /// Builds the splits of `transaction_id` for `total`.
    ///
    /// `members` are the current members of the group, in insertion order.
    pub fn build_splits(
        &self,
        transaction_id: Uuid,
        total: MoneyCents,
        members: &[Member],
    ) -> ResultEngine<Vec<Split>> {
        if !total.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        if !total.is_within_limit() {
            return Err(EngineError::InvalidAmount(format!(
                "amount_minor must not exceed {}",
                MoneyCents::MAX.cents()
            )));
        }

        let shares: Vec<(Uuid, MoneyCents)> = match self {
            Self::Equal => {
                if members.is_empty() {
                    return Err(EngineError::InvalidInput(
                        "group has no members".to_string(),
                    ));
                }
                let weights = vec![1; members.len()];
                members
                    .iter()
                    .map(|m| m.id)
                    .zip(apportion(total, &weights))
                    .collect()
            }
            Self::Percentage(entries) => {
                let ids = entries.iter().map(|(id, _)| *id);
                ensure_shares(self.as_str(), ids, members)?;

                if let Some((_, percent)) = entries
                    .iter()
                    .find(|(_, p)| *p < Percent::ZERO || *p > Percent::HUNDRED)
                {
                    return Err(EngineError::InvalidInput(format!(
                        "percentage must be between 0% and 100%, got {percent}"
                    )));
                }
                let sum: Percent = entries.iter().map(|(_, p)| *p).sum();
                if (sum.hundredths() - Percent::HUNDRED.hundredths()).abs()
                    > Percent::TOLERANCE.hundredths()
                {
                    return Err(EngineError::InvalidInput(format!(
                        "percentages must add up to 100%, got {sum}"
                    )));
                }

                let weights: Vec<i64> = entries.iter().map(|(_, p)| p.hundredths()).collect();
                entries
                    .iter()
                    .map(|(id, _)| *id)
                    .zip(apportion(total, &weights))
                    .collect()
            }
            Self::Custom(entries) => {
                let ids = entries.iter().map(|(id, _)| *id);
                ensure_shares(self.as_str(), ids, members)?;

                if let Some((_, amount)) = entries.iter().find(|(_, a)| a.is_negative()) {
                    return Err(EngineError::InvalidInput(format!(
                        "split amount must not be negative, got {amount}"
                    )));
                }
                if let Some((_, amount)) = entries.iter().find(|(_, a)| !a.is_within_limit()) {
                    return Err(EngineError::InvalidAmount(format!(
                        "split amount must not exceed {}, got {}",
                        MoneyCents::MAX.cents(),
                        amount.cents()
                    )));
                }
                let sum = entries
                    .iter()
                    .try_fold(MoneyCents::ZERO, |acc, (_, a)| acc.checked_add(*a))
                    .ok_or_else(|| {
                        EngineError::InvalidAmount("split amounts are too large".to_string())
                    })?;
                if !(sum - total).is_negligible() {
                    return Err(EngineError::InvalidInput(format!(
                        "split amounts must add up to {total}, got {sum}"
                    )));
                }
                entries.clone()
            }
        };

        Ok(shares
            .into_iter()
            .map(|(member_id, amount)| Split::new(transaction_id, member_id, amount))
            .collect())
    }
}

/// Checks the explicit share list: not empty, no duplicated member, every
/// member belongs to the group.
fn ensure_shares(
    policy: &str,
    ids: impl Iterator<Item = Uuid>,
    members: &[Member],
) -> ResultEngine<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(EngineError::InvalidInput(format!(
                "member {id} appears more than once in the splits"
            )));
        }
        if !members.iter().any(|m| m.id == id) {
            return Err(EngineError::MemberNotFound(id));
        }
    }
    if seen.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "splits are required for {policy} split"
        )));
    }
    Ok(())
}

/// Divides `total` proportionally to `weights`, flooring each share and
/// handing the leftover cents one by one to the first entries with a
/// non-zero weight. The result always adds up to `total`.
fn apportion(total: MoneyCents, weights: &[i64]) -> Vec<MoneyCents> {
    let weight_sum: i128 = weights.iter().map(|w| i128::from(*w)).sum();
    if weight_sum <= 0 {
        return vec![MoneyCents::ZERO; weights.len()];
    }

    let total_cents = i128::from(total.cents());
    let mut shares: Vec<i64> = weights
        .iter()
        .map(|w| (total_cents * i128::from(*w) / weight_sum) as i64)
        .collect();

    let mut leftover = total.cents() - shares.iter().sum::<i64>();
    for (share, weight) in shares.iter_mut().zip(weights) {
        if leftover == 0 {
            break;
        }
        if *weight > 0 {
            *share += 1;
            leftover -= 1;
        }
    }

    shares.into_iter().map(MoneyCents::new).collect()
}
