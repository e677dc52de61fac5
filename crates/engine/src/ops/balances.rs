use crate::{
    BalanceMap, ResultEngine, Settlement, compute_balances, compute_settlements, list_people,
};

use super::Engine;

impl Engine {
    /// Net balance of every person, recomputed from the stored expenses.
    pub async fn balances(&self) -> ResultEngine<BalanceMap> {
        let expenses = self.list_expenses().await?;
        let balances = compute_balances(&expenses)?;
        if let Some(drift) = balances.total().filter(|total| !total.is_zero()) {
            tracing::debug!(%drift, "balances do not net to zero");
        }
        Ok(balances)
    }

    /// Transfers that settle the current balances.
    pub async fn settlements(&self) -> ResultEngine<Vec<Settlement>> {
        let balances = self.balances().await?;
        Ok(compute_settlements(&balances))
    }

    /// Everyone who paid for or shares a stored expense.
    pub async fn people(&self) -> ResultEngine<Vec<String>> {
        let expenses = self.list_expenses().await?;
        Ok(list_people(&expenses))
    }
}
