//! Declared pay rate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{ExactNumber, Term};

/// A monetary amount declared at a [`Term`].
///
/// # Example
///
/// ```
/// use earnings_engine::models::{Rate, Term};
/// use rust_decimal::Decimal;
///
/// let rate = Rate::new(Term::Hourly, "28.50".parse().unwrap());
/// assert_eq!(rate.amount_decimal().unwrap(), Decimal::new(2850, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// The period the amount is paid per.
    pub term: Term,
    /// The amount paid per term.
    pub amount: ExactNumber,
}

impl Rate {
    /// Creates a new rate.
    pub fn new(term: Term, amount: ExactNumber) -> Self {
        Self { term, amount }
    }

    /// Returns the amount as a decimal, checking that it can be paid.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRate` when the amount is zero or negative and
    /// `InvalidNumber` when the amount is malformed.
    pub fn amount_decimal(&self) -> EngineResult<Decimal> {
        let amount = self.amount.to_decimal()?;
        if amount <= Decimal::ZERO {
            return Err(EngineError::InvalidRate {
                message: format!("amount must be positive, got {}", amount),
            });
        }
        Ok(amount)
    }
}
