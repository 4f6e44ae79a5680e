//! Calculation result models for the Earnings Engine.
//!
//! This module contains the [`CalculationResult`] type and its associated
//! structures: one [`PeriodBreakdown`] per [`Term`], itemized tax lines, work
//! units, leave, and the audit trace recording how the figures were derived.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ExactNumber, Term};

/// One itemized deduction.
///
/// # Example
///
/// ```
/// use earnings_engine::models::{ExactNumber, TaxLine};
///
/// let line = TaxLine {
///     label: "Income Tax".to_string(),
///     amount: "12000.00".parse::<ExactNumber>().unwrap(),
/// };
/// assert_eq!(line.amount.to_string(), "12000.00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxLine {
    /// The rule label, e.g. "Income Tax".
    pub label: String,
    /// The amount deducted for the period.
    pub amount: ExactNumber,
}

/// The unit a work-unit count is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkUnit {
    /// Work months in a year.
    Months,
    /// Work weeks in a month.
    Weeks,
    /// Work days in a week.
    Days,
    /// Work hours in a day.
    Hours,
}

impl WorkUnit {
    /// The work unit counted inside `term`, if `term` has a smaller term.
    pub fn within(term: Term) -> Option<WorkUnit> {
        term.smaller().map(|smaller| match smaller {
            Term::Monthly => WorkUnit::Months,
            Term::Weekly => WorkUnit::Weeks,
            Term::Daily => WorkUnit::Days,
            _ => WorkUnit::Hours,
        })
    }
}

/// The count of next-smaller periods inside a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkUnits {
    /// The unit being counted.
    pub unit: WorkUnit,
    /// How many units, after leave.
    pub count: ExactNumber,
}

/// The unit leave is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveUnit {
    /// Leave days.
    Days,
    /// Leave hours.
    Hours,
    /// Leave minutes.
    Minutes,
}

/// Leave accrued per period, for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leave {
    /// The amount of leave.
    pub amount: ExactNumber,
    /// The unit of `amount`.
    pub unit: LeaveUnit,
}

/// The full breakdown for one term.
///
/// `gross == net + taxed` and `taxed == sum(taxes)` hold exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBreakdown {
    /// The term this breakdown is expressed in.
    pub term: Term,
    /// Pay before deductions.
    pub gross: ExactNumber,
    /// Pay after deductions. May be negative.
    pub net: ExactNumber,
    /// Itemized deductions in rule order.
    pub taxes: Vec<TaxLine>,
    /// Sum of all deductions.
    pub taxed: ExactNumber,
    /// Leave accrued per period.
    pub leave: Leave,
    /// Count of next-smaller periods, absent for the smallest term.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_units: Option<WorkUnits>,
}

impl PeriodBreakdown {
    /// Looks up a tax line by label.
    pub fn tax(&self, label: &str) -> Option<&ExactNumber> {
        self.taxes
            .iter()
            .find(|line| line.label == label)
            .map(|line| &line.amount)
    }
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for one stage or rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag results the caller should surface but that are not errors,
/// such as deductions exceeding gross pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use earnings_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
/// };
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The complete result of an earnings calculation.
///
/// Holds one [`PeriodBreakdown`] per [`Term`], keyed largest first, plus the
/// audit trace. The value carries no ids or timestamps, so the same input
/// always produces an equal result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Breakdown per term.
    pub periods: BTreeMap<Term, PeriodBreakdown>,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl CalculationResult {
    /// Returns the breakdown for `term`.
    pub fn period(&self, term: Term) -> Option<&PeriodBreakdown> {
        self.periods.get(&term)
    }

    /// Returns true when net pay is negative at any term.
    pub fn has_negative_net(&self) -> bool {
        self.periods.values().any(|period| period.net.negative)
    }
}
