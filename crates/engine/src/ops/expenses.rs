use chrono::Utc;
use sea_orm::{ActiveValue, QueryOrder, QuerySelect, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Expense, ExpenseDraft, ResultEngine, expenses};

use super::{EXPENSE_FETCH_CAP, Engine, with_tx};

fn not_found(id: Uuid) -> EngineError {
    EngineError::KeyNotFound(format!("expense {id}"))
}

impl Engine {
    /// Stores a new expense and returns it with its generated id.
    ///
    /// The expense gets the next insertion sequence number, which is what
    /// [`Engine::list_expenses`] orders by.
    pub async fn create_expense(&self, draft: ExpenseDraft) -> ResultEngine<Expense> {
        let expense = Expense::new(draft.normalized()?, Utc::now());
        with_tx!(self, |db_tx| {
            let seq = expenses::Entity::find()
                .order_by_desc(expenses::Column::Seq)
                .one(&db_tx)
                .await?
                .map_or(1, |last| last.seq + 1);

            let mut model = expenses::ActiveModel::try_from(&expense)?;
            model.seq = ActiveValue::Set(seq);
            model.insert(&db_tx).await?;

            tracing::debug!(id = %expense.id, seq, paid_by = %expense.paid_by, "expense created");
            Ok(expense)
        })
    }

    /// Return all stored expenses in insertion order, up to
    /// [`EXPENSE_FETCH_CAP`].
    pub async fn list_expenses(&self) -> ResultEngine<Vec<Expense>> {
        let mut models = expenses::Entity::find()
            .order_by_asc(expenses::Column::Seq)
            .limit(EXPENSE_FETCH_CAP + 1)
            .all(&self.database)
            .await?;

        if models.len() as u64 > EXPENSE_FETCH_CAP {
            tracing::warn!(
                cap = EXPENSE_FETCH_CAP,
                "more expenses stored than the fetch cap, the newest are ignored"
            );
            models.truncate(EXPENSE_FETCH_CAP as usize);
        }

        models.into_iter().map(Expense::try_from).collect()
    }

    /// Return a single expense.
    pub async fn expense(&self, id: Uuid) -> ResultEngine<Expense> {
        let model = expenses::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| not_found(id))?;
        Expense::try_from(model)
    }

    /// Replaces every writable field of an expense.
    ///
    /// `created_at` is kept and `updated_at` is set to now.
    pub async fn update_expense(&self, id: Uuid, draft: ExpenseDraft) -> ResultEngine<Expense> {
        let draft = draft.normalized()?;
        with_tx!(self, |db_tx| {
            let model = expenses::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| not_found(id))?;

            let mut expense = Expense::try_from(model)?;
            expense.apply(draft, Utc::now());
            expenses::ActiveModel::try_from(&expense)?
                .update(&db_tx)
                .await?;

            tracing::debug!(id = %expense.id, "expense updated");
            Ok(expense)
        })
    }

    /// Deletes an expense.
    pub async fn delete_expense(&self, id: Uuid) -> ResultEngine<()> {
        let result = expenses::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(not_found(id));
        }
        tracing::debug!(%id, "expense deleted");
        Ok(())
    }
}
