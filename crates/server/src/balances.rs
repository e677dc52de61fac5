//! Balances, settlements and people API endpoints.
//!
//! Every request recomputes from the stored expenses.

use api_types::{AmountMap, settlement::Settlement};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

/// Handle requests for the net balance of every person
pub async fn balances(State(state): State<ServerState>) -> Result<Json<AmountMap>, ServerError> {
    let balances = state.engine.balances().await?;
    Ok(Json(AmountMap(
        balances
            .into_iter()
            .map(|(person, balance)| (person, balance.to_major()))
            .collect(),
    )))
}

/// Handle requests for the transfers that settle every balance
pub async fn settlements(
    State(state): State<ServerState>,
) -> Result<Json<Vec<Settlement>>, ServerError> {
    let settlements = state.engine.settlements().await?;
    Ok(Json(
        settlements
            .into_iter()
            .map(|settlement| Settlement {
                from: settlement.from,
                to: settlement.to,
                amount: settlement.amount.to_major(),
            })
            .collect(),
    ))
}

/// Handle requests for listing everyone involved in an expense
pub async fn people(State(state): State<ServerState>) -> Result<Json<Vec<String>>, ServerError> {
    Ok(Json(state.engine.people().await?))
}
