//! People appearing in a set of expenses.

use std::collections::HashSet;

use crate::Expense;

/// Everyone who paid for or shares an expense, each listed once in the order
/// first seen.
///
/// People named only in explicit shares are not listed.
pub fn list_people(expenses: &[Expense]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut people = Vec::new();
    for expense in expenses {
        let names = std::iter::once(&expense.paid_by).chain(&expense.shared_with);
        for person in names {
            if seen.insert(person.as_str()) {
                people.push(person.clone());
            }
        }
    }
    people
}
