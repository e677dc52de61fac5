//! The module contains the `Expense` record and its persistence model.
//!
//! An expense is paid by one person and owed, either in equal slices or by
//! explicit per-person shares, by the people it is shared with.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

/// An explicit amount owed by one person for an expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub person: String,
    pub amount: MoneyCents,
}

impl Share {
    pub fn new(person: impl Into<String>, amount: MoneyCents) -> Self {
        Self {
            person: person.into(),
            amount,
        }
    }
}

/// The writable part of an expense, used both for creation and for updates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub amount: MoneyCents,
    pub description: String,
    pub paid_by: String,
    pub shared_with: Vec<String>,
    /// Explicit shares, in the order they were given.
    ///
    /// When present and non-empty they replace the equal split. The sum is
    /// expected to match `amount` but it is not enforced.
    pub shares: Option<Vec<Share>>,
}

impl ExpenseDraft {
    /// Validates the draft and returns it with trimmed person identifiers.
    ///
    /// A person named more than once in `shares` keeps the position of the
    /// first entry and the amount of the last one. An empty `shared_with` is
    /// accepted here: it is only rejected when the expense is folded into
    /// balances.
    pub(crate) fn normalized(self) -> ResultEngine<Self> {
        if !self.amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }
        let paid_by = normalize_person(&self.paid_by, "paid_by")?;
        let shared_with = self
            .shared_with
            .iter()
            .map(|person| normalize_person(person, "shared_with"))
            .collect::<ResultEngine<Vec<_>>>()?;
        let shares = self
            .shares
            .map(|shares| {
                shares
                    .into_iter()
                    .map(|share| {
                        Ok(Share {
                            person: normalize_person(&share.person, "shares")?,
                            amount: share.amount,
                        })
                    })
                    .collect::<ResultEngine<Vec<_>>>()
                    .map(collapse_shares)
            })
            .transpose()?;

        Ok(Self {
            amount: self.amount,
            description: self.description,
            paid_by,
            shared_with,
            shares,
        })
    }
}

fn collapse_shares(shares: Vec<Share>) -> Vec<Share> {
    let mut collapsed: Vec<Share> = Vec::with_capacity(shares.len());
    let mut index: HashMap<String, usize> = HashMap::new();
    for share in shares {
        match index.get(&share.person) {
            Some(&position) => collapsed[position].amount = share.amount,
            None => {
                index.insert(share.person.clone(), collapsed.len());
                collapsed.push(share);
            }
        }
    }
    collapsed
}

fn normalize_person(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must not contain blank names"
        )));
    }
    Ok(trimmed.to_string())
}

/// A stored expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Stable identifier, generated once on creation.
    pub id: Uuid,
    pub amount: MoneyCents,
    pub description: String,
    pub paid_by: String,
    pub shared_with: Vec<String>,
    pub shares: Option<Vec<Share>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Expense {
    pub fn new(draft: ExpenseDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount: draft.amount,
            description: draft.description,
            paid_by: draft.paid_by,
            shared_with: draft.shared_with,
            shares: draft.shares,
            created_at,
            updated_at: None,
        }
    }

    /// Returns the explicit shares when they override the equal split.
    ///
    /// An empty share list behaves as if no shares were given.
    pub fn explicit_shares(&self) -> Option<&[Share]> {
        self.shares.as_deref().filter(|shares| !shares.is_empty())
    }

    /// Replaces every writable field with the draft's and stamps `updated_at`.
    pub(crate) fn apply(&mut self, draft: ExpenseDraft, updated_at: DateTime<Utc>) {
        self.amount = draft.amount;
        self.description = draft.description;
        self.paid_by = draft.paid_by;
        self.shared_with = draft.shared_with;
        self.shares = draft.shares;
        self.updated_at = Some(updated_at);
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Insertion sequence, assigned on create and never rewritten.
    pub seq: i64,
    pub amount_minor: i64,
    pub description: String,
    pub paid_by: String,
    /// JSON array of person identifiers.
    pub shared_with: String,
    /// JSON array of `[person, amount_minor]` pairs.
    pub shares: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&Expense> for ActiveModel {
    type Error = EngineError;

    fn try_from(expense: &Expense) -> Result<Self, Self::Error> {
        let shared_with = serde_json::to_string(&expense.shared_with)
            .map_err(|err| EngineError::InvalidExpense(err.to_string()))?;
        let shares = expense
            .shares
            .as_ref()
            .map(|shares| {
                let pairs: Vec<(&str, i64)> = shares
                    .iter()
                    .map(|share| (share.person.as_str(), share.amount.cents()))
                    .collect();
                serde_json::to_string(&pairs)
            })
            .transpose()
            .map_err(|err| EngineError::InvalidExpense(err.to_string()))?;

        Ok(Self {
            id: ActiveValue::Set(expense.id.to_string()),
            seq: ActiveValue::NotSet,
            amount_minor: ActiveValue::Set(expense.amount.cents()),
            description: ActiveValue::Set(expense.description.clone()),
            paid_by: ActiveValue::Set(expense.paid_by.clone()),
            shared_with: ActiveValue::Set(shared_with),
            shares: ActiveValue::Set(shares),
            created_at: ActiveValue::Set(expense.created_at),
            updated_at: ActiveValue::Set(expense.updated_at),
        })
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let corrupted = |what: &str| {
            EngineError::InvalidExpense(format!("expense {} has unreadable {what}", model.id))
        };

        let id = Uuid::parse_str(&model.id).map_err(|_| corrupted("id"))?;
        let shared_with: Vec<String> =
            serde_json::from_str(&model.shared_with).map_err(|_| corrupted("shared_with"))?;
        let shares = match model.shares.as_deref() {
            Some(raw) => {
                let pairs: Vec<(String, i64)> =
                    serde_json::from_str(raw).map_err(|_| corrupted("shares"))?;
                Some(
                    pairs
                        .into_iter()
                        .map(|(person, cents)| Share::new(person, MoneyCents::new(cents)))
                        .collect(),
                )
            }
            None => None,
        };

        Ok(Self {
            id,
            amount: MoneyCents::new(model.amount_minor),
            description: model.description,
            paid_by: model.paid_by,
            shared_with,
            shares,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ExpenseDraft {
        ExpenseDraft {
            amount: MoneyCents::new(5_000),
            description: "dinner".to_string(),
            paid_by: " Alice ".to_string(),
            shared_with: vec!["Bob ".to_string(), "Carol".to_string()],
            shares: Some(vec![
                Share::new("Bob", MoneyCents::new(3_000)),
                Share::new(" Carol", MoneyCents::new(2_000)),
            ]),
        }
    }

    #[test]
    fn normalized_trims_people() {
        let draft = draft().normalized().unwrap();
        assert_eq!(draft.paid_by, "Alice");
        assert_eq!(draft.shared_with, vec!["Bob", "Carol"]);
        let shares = draft.shares.unwrap();
        assert_eq!(shares[1].person, "Carol");
    }

    #[test]
    fn repeated_share_keeps_first_position_and_last_amount() {
        let mut repeated = draft();
        repeated.shares = Some(vec![
            Share::new("Bob", MoneyCents::new(3_000)),
            Share::new("Carol", MoneyCents::new(1_000)),
            Share::new("Bob", MoneyCents::new(2_000)),
        ]);
        let shares = repeated.normalized().unwrap().shares.unwrap();
        assert_eq!(
            shares,
            vec![
                Share::new("Bob", MoneyCents::new(2_000)),
                Share::new("Carol", MoneyCents::new(1_000)),
            ]
        );
    }

    #[test]
    fn names_equal_after_trim_are_one_share() {
        let mut padded = draft();
        padded.shares = Some(vec![
            Share::new("Bob", MoneyCents::new(3_000)),
            Share::new(" Bob ", MoneyCents::new(2_000)),
        ]);
        let shares = padded.normalized().unwrap().shares.unwrap();
        assert_eq!(shares, vec![Share::new("Bob", MoneyCents::new(2_000))]);
    }

    #[test]
    fn normalized_rejects_non_positive_amount() {
        let mut zero = draft();
        zero.amount = MoneyCents::ZERO;
        assert!(matches!(
            zero.normalized(),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn normalized_rejects_blank_payer() {
        let mut blank = draft();
        blank.paid_by = "   ".to_string();
        assert!(matches!(
            blank.normalized(),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn normalized_accepts_empty_participants() {
        let mut nobody = draft();
        nobody.shared_with.clear();
        nobody.shares = None;
        assert!(nobody.normalized().is_ok());
    }

    #[test]
    fn model_keeps_share_order() {
        let expense = Expense::new(draft().normalized().unwrap(), Utc::now());
        let active = ActiveModel::try_from(&expense).unwrap();
        let model = Model {
            id: active.id.unwrap(),
            seq: 1,
            amount_minor: active.amount_minor.unwrap(),
            description: active.description.unwrap(),
            paid_by: active.paid_by.unwrap(),
            shared_with: active.shared_with.unwrap(),
            shares: active.shares.unwrap(),
            created_at: active.created_at.unwrap(),
            updated_at: active.updated_at.unwrap(),
        };
        assert_eq!(model.shares.as_deref(), Some(r#"[["Bob",3000],["Carol",2000]]"#));
        assert_eq!(Expense::try_from(model).unwrap(), expense);
    }

    #[test]
    fn unreadable_model_is_invalid_expense() {
        let model = Model {
            id: Uuid::new_v4().to_string(),
            seq: 1,
            amount_minor: 100,
            description: String::new(),
            paid_by: "Alice".to_string(),
            shared_with: "not json".to_string(),
            shares: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        assert!(matches!(
            Expense::try_from(model),
            Err(EngineError::InvalidExpense(_))
        ));
    }

    #[test]
    fn empty_shares_fall_back_to_equal_split() {
        let mut draft = draft();
        draft.shares = Some(Vec::new());
        let expense = Expense::new(draft, Utc::now());
        assert!(expense.explicit_shares().is_none());
    }
}
