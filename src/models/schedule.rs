//! Work schedule model.
//!
//! A [`WorkSchedule`] describes how much a person works and how much leave
//! they take. It resolves the conversion factor between a year and every
//! smaller term.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::Term;

/// Nominal weeks in a year.
pub const WEEKS_PER_YEAR: u32 = 52;

/// Months in a year.
pub const MONTHS_PER_YEAR: u32 = 12;

/// The most working days a week can hold.
pub const MAX_DAYS_PER_WEEK: u8 = 7;

/// Hours per day, days per week and annual leave.
///
/// # Example
///
/// ```
/// use earnings_engine::models::{Term, WorkSchedule};
/// use rust_decimal::Decimal;
///
/// let schedule = WorkSchedule::new(Decimal::from(8), 5, Decimal::from(25));
/// schedule.validate().unwrap();
/// assert_eq!(schedule.worked_weeks(), Decimal::from(47));
/// assert_eq!(schedule.periods_per_year(Term::Hourly).unwrap(), Decimal::from(1880));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSchedule {
    /// Hours worked on a working day.
    pub hours_per_day: Decimal,
    /// Working days in a week.
    pub days_per_week: u8,
    /// Days of paid leave taken per year.
    #[serde(default)]
    pub annual_leave_days: Decimal,
}

impl WorkSchedule {
    /// Creates a new schedule. Call [`WorkSchedule::validate`] before use.
    pub fn new(hours_per_day: Decimal, days_per_week: u8, annual_leave_days: Decimal) -> Self {
        Self {
            hours_per_day,
            days_per_week,
            annual_leave_days,
        }
    }

    /// Checks the schedule invariants.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchedule` when hours per day is not positive, days per
    /// week is outside 1..=7, leave is negative, or leave covers every working
    /// day of the year.
    pub fn validate(&self) -> EngineResult<()> {
        if self.hours_per_day <= Decimal::ZERO {
            return Err(EngineError::InvalidSchedule {
                field: "hours_per_day".to_string(),
                message: format!("must be positive, got {}", self.hours_per_day),
            });
        }

        if self.days_per_week == 0 || self.days_per_week > MAX_DAYS_PER_WEEK {
            return Err(EngineError::InvalidSchedule {
                field: "days_per_week".to_string(),
                message: format!(
                    "must be between 1 and {}, got {}",
                    MAX_DAYS_PER_WEEK, self.days_per_week
                ),
            });
        }

        if self.annual_leave_days < Decimal::ZERO {
            return Err(EngineError::InvalidSchedule {
                field: "annual_leave_days".to_string(),
                message: format!("cannot be negative, got {}", self.annual_leave_days),
            });
        }

        let working_days = self.nominal_days_per_year();
        if self.annual_leave_days >= working_days {
            return Err(EngineError::InvalidSchedule {
                field: "annual_leave_days".to_string(),
                message: format!(
                    "must be fewer than the {} working days in a year, got {}",
                    working_days, self.annual_leave_days
                ),
            });
        }

        Ok(())
    }

    /// Working days in a year before leave.
    pub fn nominal_days_per_year(&self) -> Decimal {
        Decimal::from(self.days_per_week) * Decimal::from(WEEKS_PER_YEAR)
    }

    /// Annual leave expressed in weeks. Zero when the schedule has no working days.
    pub fn leave_weeks(&self) -> Decimal {
        self.annual_leave_days
            .checked_div(Decimal::from(self.days_per_week))
            .unwrap_or(Decimal::ZERO)
    }

    /// Weeks actually worked in a year.
    pub fn worked_weeks(&self) -> Decimal {
        Decimal::from(WEEKS_PER_YEAR) - self.leave_weeks()
    }

    /// How many periods of `term` make up a year.
    ///
    /// This is both the factor that annualizes a rate and the divisor that
    /// projects annual figures down to `term`. Weeks, days and hours count
    /// only the time actually worked after leave.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` when the hours worked in a year leave the decimal
    /// range.
    pub fn periods_per_year(&self, term: Term) -> EngineResult<Decimal> {
        let days = Decimal::from(self.days_per_week);
        let periods = match term {
            Term::Yearly => Some(Decimal::ONE),
            Term::Monthly => Some(Decimal::from(MONTHS_PER_YEAR)),
            Term::Weekly => Some(self.worked_weeks()),
            Term::Daily => self.worked_weeks().checked_mul(days),
            Term::Hourly => self
                .worked_weeks()
                .checked_mul(days)
                .and_then(|worked_days| worked_days.checked_mul(self.hours_per_day)),
        };

        periods.ok_or_else(|| EngineError::Overflow {
            value: format!(
                "{} worked weeks x {} days x {} hours",
                self.worked_weeks(),
                self.days_per_week,
                self.hours_per_day
            ),
        })
    }
}
