//! Expense splitting engine.
//!
//! The pure core is [`compute_balances`] and [`compute_settlements`]; the
//! [`Engine`] stores expenses in the database and runs the core over them on
//! every query.

pub use balances::{BalanceMap, compute_balances};
pub use error::EngineError;
pub use expenses::{Expense, ExpenseDraft, Share};
pub use money::MoneyCents;
pub use ops::{EXPENSE_FETCH_CAP, Engine, EngineBuilder};
pub use people::list_people;
pub use settlements::{Settlement, compute_settlements};

mod balances;
mod error;
mod expenses;
mod money;
mod ops;
mod people;
mod settlements;

type ResultEngine<T> = Result<T, EngineError>;
