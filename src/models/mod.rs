//! Core data models for the Earnings Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calculation_input;
mod calculation_result;
mod exact_number;
mod rate;
mod schedule;
mod term;

pub use calculation_input::CalculationInput;
pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, CalculationResult, Leave, LeaveUnit, PeriodBreakdown,
    TaxLine, WorkUnit, WorkUnits,
};
pub use exact_number::{
    ExactNumber, MAX_FRACTIONAL_DIGITS, MONEY_DIGITS, UNIT_DIGITS, round_half_away,
};
pub use rate::Rate;
pub use schedule::{MAX_DAYS_PER_WEEK, MONTHS_PER_YEAR, WEEKS_PER_YEAR, WorkSchedule};
pub use term::Term;
