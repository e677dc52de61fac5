//! Expenses API endpoints.

use api_types::{
    AmountMap,
    expense::{Expense, ExpenseDeleted, ExpenseNew},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{EngineError, ExpenseDraft, MoneyCents, Share};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

/// Parse a path id; ids that are not UUIDs cannot exist, so they are reported
/// as missing.
fn parse_id(id: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(id)
        .map_err(|_| ServerError::Engine(EngineError::KeyNotFound(format!("expense {id}"))))
}

fn draft_from(payload: ExpenseNew) -> Result<ExpenseDraft, ServerError> {
    let shares = payload
        .shares
        .map(|shares| {
            shares
                .0
                .into_iter()
                .map(|(person, amount)| {
                    MoneyCents::try_from_major(amount).map(|amount| Share::new(person, amount))
                })
                .collect::<Result<Vec<_>, EngineError>>()
        })
        .transpose()?;

    Ok(ExpenseDraft {
        amount: MoneyCents::try_from_major(payload.amount)?,
        description: payload.description,
        paid_by: payload.paid_by,
        shared_with: payload.shared_with,
        shares,
    })
}

fn to_view(expense: engine::Expense) -> Expense {
    Expense {
        id: expense.id,
        amount: expense.amount.to_major(),
        description: expense.description,
        paid_by: expense.paid_by,
        shared_with: expense.shared_with,
        shares: expense.shares.map(|shares| {
            AmountMap(
                shares
                    .into_iter()
                    .map(|share| (share.person, share.amount.to_major()))
                    .collect(),
            )
        }),
        created_at: expense.created_at,
        updated_at: expense.updated_at,
    }
}

/// Handle requests for recording a new expense
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<Expense>), ServerError> {
    let expense = state.engine.create_expense(draft_from(payload)?).await?;
    Ok((StatusCode::CREATED, Json(to_view(expense))))
}

/// Handle requests for listing expenses, oldest first
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Expense>>, ServerError> {
    let expenses = state.engine.list_expenses().await?;
    Ok(Json(expenses.into_iter().map(to_view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Expense>, ServerError> {
    let expense = state.engine.expense(parse_id(&id)?).await?;
    Ok(Json(to_view(expense)))
}

/// Handle requests for replacing an expense
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ExpenseNew>,
) -> Result<Json<Expense>, ServerError> {
    let id = parse_id(&id)?;
    let expense = state
        .engine
        .update_expense(id, draft_from(payload)?)
        .await?;
    Ok(Json(to_view(expense)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ExpenseDeleted>, ServerError> {
    state.engine.delete_expense(parse_id(&id)?).await?;
    Ok(Json(ExpenseDeleted {
        message: "Expense deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(amount: f64, shares: Option<Vec<(&str, f64)>>) -> ExpenseNew {
        ExpenseNew {
            amount,
            description: "pizza".to_string(),
            paid_by: "Alice".to_string(),
            shared_with: vec!["Alice".to_string(), "Bob".to_string()],
            shares: shares.map(|shares| {
                AmountMap(
                    shares
                        .into_iter()
                        .map(|(person, amount)| (person.to_string(), amount))
                        .collect(),
                )
            }),
        }
    }

    #[test]
    fn draft_converts_amounts_to_cents() {
        let draft = draft_from(payload(12.5, Some(vec![("Bob", 7.25), ("Alice", 5.25)])))
            .ok()
            .unwrap();
        assert_eq!(draft.amount, MoneyCents::new(1_250));
        let shares = draft.shares.unwrap();
        assert_eq!(shares[0], Share::new("Bob", MoneyCents::new(725)));
        assert_eq!(shares[1], Share::new("Alice", MoneyCents::new(525)));
    }

    #[test]
    fn draft_rejects_sub_cent_amounts() {
        assert!(draft_from(payload(1.005, None)).is_err());
        assert!(draft_from(payload(1.0, Some(vec![("Bob", 0.333)]))).is_err());
    }

    #[test]
    fn non_uuid_id_is_not_found() {
        assert!(matches!(
            parse_id("nope"),
            Err(ServerError::Engine(EngineError::KeyNotFound(_)))
        ));
    }
}
