use std::{
    fmt,
    ops::{Neg, SubAssign},
};

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Largest distance (in cents) a JSON number may sit from a whole cent before
/// it is treated as having more than two decimals.
const CENT_TOLERANCE: f64 = 1e-6;

/// Signed money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine (expense amounts,
/// shares, balances, settlements) to avoid floating-point drift. Rounding to
/// two decimals is the identity on this type: the only rounding the engine
/// performs is [`MoneyCents::div_round_half_even`].
///
/// The value is signed:
/// - positive = the person is owed money
/// - negative = the person owes money
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Amounts from JSON arrive in major units:
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!(MoneyCents::try_from_major(10.5).unwrap().cents(), 1050);
/// assert!(MoneyCents::try_from_major(12.345).is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Converts a JSON-style number of major units (e.g. `10.5`) into cents.
    ///
    /// Rejects non-finite numbers, numbers with more than two decimals and
    /// numbers that do not fit in `i64` cents.
    pub fn try_from_major(value: f64) -> ResultEngine<Self> {
        if !value.is_finite() {
            return Err(EngineError::InvalidAmount(
                "amount must be a finite number".to_string(),
            ));
        }
        let scaled = value * 100.0;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > CENT_TOLERANCE {
            return Err(EngineError::InvalidAmount(format!(
                "{value} has more than two decimals, round it to cents"
            )));
        }
        if rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
            return Err(EngineError::InvalidAmount("amount too large".to_string()));
        }
        Ok(Self(rounded as i64))
    }

    /// Returns the amount in major units, for JSON output.
    #[must_use]
    pub fn to_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Divides into `parts` equal slices rounded to the nearest cent, ties to
    /// even.
    ///
    /// Returns `None` when `parts` is not positive.
    ///
    /// ```rust
    /// use engine::MoneyCents;
    ///
    /// assert_eq!(MoneyCents::new(1000).div_round_half_even(3), Some(MoneyCents::new(333)));
    /// assert_eq!(MoneyCents::new(10).div_round_half_even(4), Some(MoneyCents::new(2)));
    /// assert_eq!(MoneyCents::new(30).div_round_half_even(4), Some(MoneyCents::new(8)));
    /// assert_eq!(MoneyCents::new(100).div_round_half_even(0), None);
    /// ```
    #[must_use]
    pub fn div_round_half_even(self, parts: i64) -> Option<MoneyCents> {
        if parts <= 0 {
            return None;
        }
        let quotient = self.0.div_euclid(parts);
        let remainder = self.0.rem_euclid(parts);
        // Widened so doubling the remainder cannot overflow.
        let twice = i128::from(remainder) * 2;
        let parts_wide = i128::from(parts);
        let round_up = twice > parts_wide || (twice == parts_wide && quotient % 2 != 0);
        Some(MoneyCents(if round_up { quotient + 1 } else { quotient }))
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_sub(rhs.0).map(MoneyCents)
    }

    /// Checked negation (returns `None` for `i64::MIN` cents).
    #[must_use]
    pub fn checked_neg(self) -> Option<MoneyCents> {
        self.0.checked_neg().map(MoneyCents)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl SubAssign for MoneyCents {
    fn sub_assign(&mut self, rhs: MoneyCents) {
        self.0 -= rhs.0;
    }
}

impl Neg for MoneyCents {
    type Output = MoneyCents;

    fn neg(self) -> Self::Output {
        MoneyCents(-self.0)
    }
}
