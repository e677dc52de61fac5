//! Net balances derived from a set of expenses.
//!
//! [`compute_balances`] folds expenses into a [`BalanceMap`]: a positive
//! balance means the person is owed money, a negative one that they owe it.

use std::collections::HashMap;

use crate::{EngineError, Expense, MoneyCents, ResultEngine};

/// Person to signed net balance.
///
/// Entries iterate in the order each person was first touched, which keeps
/// the settlement schedule derived from the map deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BalanceMap {
    entries: Vec<(String, MoneyCents)>,
    index: HashMap<String, usize>,
}

impl BalanceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `amount` to `person`, who starts at 0 if unseen.
    pub fn credit(&mut self, person: &str, amount: MoneyCents) -> ResultEngine<()> {
        self.update(person, |balance| balance.checked_add(amount))
    }

    /// Debits `amount` from `person`, who starts at 0 if unseen.
    pub fn debit(&mut self, person: &str, amount: MoneyCents) -> ResultEngine<()> {
        self.update(person, |balance| balance.checked_sub(amount))
    }

    fn update(
        &mut self,
        person: &str,
        step: impl FnOnce(MoneyCents) -> Option<MoneyCents>,
    ) -> ResultEngine<()> {
        let current = self.get(person).unwrap_or_default();
        // Every balance must stay negatable so a debt can be planned as a
        // positive transfer.
        let next = step(current)
            .filter(|balance| balance.checked_neg().is_some())
            .ok_or_else(|| EngineError::InvalidExpense(format!("balance of {person} overflows")))?;
        match self.index.get(person) {
            Some(&position) => self.entries[position].1 = next,
            None => {
                self.index.insert(person.to_string(), self.entries.len());
                self.entries.push((person.to_string(), next));
            }
        }
        Ok(())
    }

    pub fn get(&self, person: &str) -> Option<MoneyCents> {
        self.index
            .get(person)
            .map(|&position| self.entries[position].1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, MoneyCents)> {
        self.entries
            .iter()
            .map(|(person, balance)| (person.as_str(), *balance))
    }

    /// Sum of every balance, or `None` if it leaves the `i64` cent range.
    ///
    /// Zero when every expense is internally consistent; equal-split rounding
    /// can leave a few cents of drift.
    pub fn total(&self) -> Option<MoneyCents> {
        self.entries
            .iter()
            .try_fold(MoneyCents::ZERO, |sum, (_, balance)| sum.checked_add(*balance))
    }
}

impl IntoIterator for BalanceMap {
    type Item = (String, MoneyCents);
    type IntoIter = std::vec::IntoIter<(String, MoneyCents)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Folds `expenses`, in order, into net balances.
///
/// - With explicit shares every listed person is debited their share and the
///   payer is credited the full amount once. A payer who also appears in the
///   shares therefore nets `amount - own share`.
/// - Otherwise the amount is split equally between `shared_with`, each slice
///   rounded to the cent (ties to even), and the payer is credited the full
///   amount. The rounding remainder is not redistributed, so the map may not
///   sum to exactly zero.
///
/// Fails with [`EngineError::InvalidExpense`] when an equal split has no
/// participants or a balance leaves the `i64` cent range.
pub fn compute_balances(expenses: &[Expense]) -> ResultEngine<BalanceMap> {
    let mut balances = BalanceMap::new();

    for expense in expenses {
        match expense.explicit_shares() {
            Some(shares) => {
                for share in shares {
                    balances.debit(&share.person, share.amount)?;
                }
            }
            None => {
                let split = i64::try_from(expense.shared_with.len())
                    .ok()
                    .and_then(|participants| expense.amount.div_round_half_even(participants))
                    .ok_or_else(|| {
                        EngineError::InvalidExpense(format!(
                            "expense {} is shared with nobody",
                            expense.id
                        ))
                    })?;
                for person in &expense.shared_with {
                    balances.debit(person, split)?;
                }
            }
        }
        balances.credit(&expense.paid_by, expense.amount)?;
    }

    Ok(balances)
}
