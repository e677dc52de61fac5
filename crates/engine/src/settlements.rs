//! Greedy settlement schedule for a [`BalanceMap`].

use serde::{Deserialize, Serialize};

use crate::{BalanceMap, MoneyCents};

/// A single transfer from a debtor to a creditor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: String,
    pub to: String,
    pub amount: MoneyCents,
}

/// Plans the transfers that bring every balance back to zero.
///
/// Creditors (positive balances) and debtors (negative balances) keep the map
/// order; zero balances are skipped. The two lists are walked with one cursor
/// each, every step moving the smaller of the two outstanding amounts. A cursor
/// advances once its person is exactly settled, so a step can advance both.
///
/// The walk stops as soon as either side runs out. Whatever is still
/// outstanding on the other side (only rounding drift from equal splits) is
/// left unsettled.
pub fn compute_settlements(balances: &BalanceMap) -> Vec<Settlement> {
    let mut creditors: Vec<(&str, MoneyCents)> = balances
        .iter()
        .filter(|(_, balance)| balance.is_positive())
        .collect();
    let mut debtors: Vec<(&str, MoneyCents)> = balances
        .iter()
        .filter(|(_, balance)| balance.is_negative())
        // A BalanceMap never holds a balance that cannot be negated.
        .map(|(person, balance)| (person, -balance))
        .collect();

    let mut settlements = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < debtors.len() && j < creditors.len() {
        let (debtor, owed) = debtors[i];
        let (creditor, due) = creditors[j];
        let amount = owed.min(due);

        settlements.push(Settlement {
            from: debtor.to_string(),
            to: creditor.to_string(),
            amount,
        });

        debtors[i].1 -= amount;
        creditors[j].1 -= amount;
        if debtors[i].1.is_zero() {
            i += 1;
        }
        if creditors[j].1.is_zero() {
            j += 1;
        }
    }

    settlements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balances(entries: &[(&str, i64)]) -> BalanceMap {
        let mut balances = BalanceMap::new();
        for (person, cents) in entries {
            balances.credit(person, MoneyCents::new(*cents)).unwrap();
        }
        balances
    }

    fn settlement(from: &str, to: &str, cents: i64) -> Settlement {
        Settlement {
            from: from.to_string(),
            to: to.to_string(),
            amount: MoneyCents::new(cents),
        }
    }

    #[test]
    fn single_debtor_pays_single_creditor() {
        let plan = compute_settlements(&balances(&[("Alice", 5_000), ("Bob", -5_000)]));
        assert_eq!(plan, vec![settlement("Bob", "Alice", 5_000)]);
    }

    #[test]
    fn empty_map_needs_no_transfers() {
        assert!(compute_settlements(&BalanceMap::new()).is_empty());
    }

    #[test]
    fn zero_balances_are_ignored() {
        let plan = compute_settlements(&balances(&[("Alice", 0), ("Bob", 0)]));
        assert!(plan.is_empty());
    }

    #[test]
    fn one_creditor_collects_from_many() {
        let plan = compute_settlements(&balances(&[
            ("Bob", -3_000),
            ("Carol", -2_000),
            ("Alice", 5_000),
        ]));
        assert_eq!(
            plan,
            vec![
                settlement("Bob", "Alice", 3_000),
                settlement("Carol", "Alice", 2_000),
            ]
        );
    }

    #[test]
    fn debtor_split_across_creditors() {
        let plan = compute_settlements(&balances(&[
            ("Alice", 2_000),
            ("Bob", 1_000),
            ("Carol", -3_000),
        ]));
        assert_eq!(
            plan,
            vec![
                settlement("Carol", "Alice", 2_000),
                settlement("Carol", "Bob", 1_000),
            ]
        );
    }

    #[test]
    fn simultaneous_zero_advances_both_cursors() {
        let plan = compute_settlements(&balances(&[
            ("A", 1_000),
            ("B", -1_000),
            ("C", 500),
            ("D", -500),
        ]));
        assert_eq!(
            plan,
            vec![settlement("B", "A", 1_000), settlement("D", "C", 500)]
        );
    }

    #[test]
    fn rounding_drift_is_left_unsettled() {
        let plan = compute_settlements(&balances(&[("A", 667), ("B", -333), ("C", -333)]));
        assert_eq!(
            plan,
            vec![settlement("B", "A", 333), settlement("C", "A", 333)]
        );
        let collected: i64 = plan.iter().map(|s| s.amount.cents()).sum();
        assert_eq!(collected, 666);
    }

    #[test]
    fn largest_debt_is_planned_without_overflow() {
        let plan = compute_settlements(&balances(&[("A", i64::MAX), ("B", -i64::MAX)]));
        assert_eq!(plan, vec![settlement("B", "A", i64::MAX)]);
    }

    #[test]
    fn leftover_debt_is_dropped() {
        let plan = compute_settlements(&balances(&[("A", 500), ("B", -700)]));
        assert_eq!(plan, vec![settlement("B", "A", 500)]);
    }
}
