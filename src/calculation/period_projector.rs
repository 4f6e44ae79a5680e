//! Period projection functionality.
//!
//! This module scales annual figures down to every [`Term`], attaching work
//! unit counts and leave to each breakdown.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, ExactNumber, Leave, LeaveUnit, MONEY_DIGITS, MONTHS_PER_YEAR, PeriodBreakdown,
    TaxLine, Term, UNIT_DIGITS, WEEKS_PER_YEAR, WorkSchedule, WorkUnit, WorkUnits,
    round_half_away,
};

use super::tax_engine::AnnualFigures;

const MINUTES_PER_HOUR: u32 = 60;

/// The result of projecting annual figures, including every breakdown and audit step.
#[derive(Debug, Clone)]
pub struct ProjectionResult {
    /// One breakdown per term.
    pub periods: BTreeMap<Term, PeriodBreakdown>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Projects `annual` figures onto every term.
///
/// Each term divides gross and every tax by the same divisor,
/// [`WorkSchedule::periods_per_year`], rounding each to cents. Taxed is the
/// sum of the rounded taxes and net is the rounded gross minus taxed, so
/// `gross == net + taxed` holds exactly at every term.
///
/// # Arguments
///
/// * `annual` - The annual gross, deductions and net
/// * `schedule` - The work schedule supplying the divisors
/// * `step_number` - The step number for audit trail sequencing
///
/// # Errors
///
/// Returns `InvalidSchedule` if the schedule violates its invariants and
/// `Overflow` if a figure cannot be split for display.
///
/// # Examples
///
/// ```
/// use earnings_engine::calculation::{apply_taxes, project_periods};
/// use earnings_engine::models::{Term, WorkSchedule};
/// use rust_decimal::Decimal;
///
/// let schedule = WorkSchedule::new(Decimal::from(8), 5, Decimal::from(25));
/// let annual = apply_taxes(Decimal::from(60000), &[], 1).unwrap().annual;
///
/// let result = project_periods(&annual, &schedule, 2).unwrap();
/// let monthly = &result.periods[&Term::Monthly];
/// assert_eq!(monthly.gross.to_string(), "5000.00");
/// ```
pub fn project_periods(
    annual: &AnnualFigures,
    schedule: &WorkSchedule,
    step_number: u32,
) -> EngineResult<ProjectionResult> {
    schedule.validate()?;

    let mut periods = BTreeMap::new();
    let mut divisors = serde_json::Map::new();

    for term in Term::ALL {
        let divisor = schedule.periods_per_year(term)?;
        divisors.insert(
            term.as_str().to_string(),
            serde_json::Value::String(divisor.normalize().to_string()),
        );
        periods.insert(term, project_term(annual, schedule, term, divisor)?);
    }

    let yearly_months = periods
        .get(&Term::Yearly)
        .and_then(|period: &PeriodBreakdown| period.work_units.as_ref())
        .map(|units| units.count.to_string())
        .unwrap_or_default();

    let audit_step = AuditStep {
        step_number,
        rule_id: "period_projection".to_string(),
        rule_name: "Period Projection".to_string(),
        input: serde_json::json!({
            "annual_gross": annual.gross.normalize().to_string(),
            "annual_net": annual.net.normalize().to_string(),
            "worked_weeks": schedule.worked_weeks().normalize().to_string()
        }),
        output: serde_json::json!({
            "divisors": divisors,
            "work_months": yearly_months
        }),
        reasoning: format!(
            "Annual figures divided across {} worked weeks; {} work months per year",
            schedule.worked_weeks().normalize(),
            yearly_months
        ),
    };

    Ok(ProjectionResult {
        periods,
        audit_step,
    })
}

fn project_term(
    annual: &AnnualFigures,
    schedule: &WorkSchedule,
    term: Term,
    divisor: Decimal,
) -> EngineResult<PeriodBreakdown> {
    let gross = round_half_away(divide(annual.gross, divisor)?, MONEY_DIGITS);

    let mut taxes = Vec::with_capacity(annual.taxes.len());
    let mut taxed = Decimal::ZERO;
    for tax in &annual.taxes {
        let amount = round_half_away(divide(tax.amount, divisor)?, MONEY_DIGITS);
        taxed = add(taxed, amount)?;
        taxes.push(TaxLine {
            label: tax.label.clone(),
            amount: ExactNumber::split(amount, MONEY_DIGITS)?,
        });
    }

    let net = gross
        .checked_sub(taxed)
        .ok_or_else(|| EngineError::Overflow {
            value: format!("{} - {}", gross, taxed),
        })?;

    Ok(PeriodBreakdown {
        term,
        gross: ExactNumber::split(gross, MONEY_DIGITS)?,
        net: ExactNumber::split(net, MONEY_DIGITS)?,
        taxes,
        taxed: ExactNumber::split(taxed, MONEY_DIGITS)?,
        leave: leave_for(schedule, term)?,
        work_units: work_units_for(schedule, term)?,
    })
}

/// Counts the next-smaller periods inside `term` after leave.
fn work_units_for(schedule: &WorkSchedule, term: Term) -> EngineResult<Option<WorkUnits>> {
    let Some(unit) = WorkUnit::within(term) else {
        return Ok(None);
    };

    let worked_weeks = schedule.worked_weeks();
    let count = match unit {
        WorkUnit::Months => divide(
            multiply(Decimal::from(MONTHS_PER_YEAR), worked_weeks)?,
            Decimal::from(WEEKS_PER_YEAR),
        )?,
        WorkUnit::Weeks => divide(worked_weeks, Decimal::from(MONTHS_PER_YEAR))?,
        WorkUnit::Days => Decimal::from(schedule.days_per_week),
        WorkUnit::Hours => schedule.hours_per_day,
    };

    Ok(Some(WorkUnits {
        unit,
        count: ExactNumber::split(count, UNIT_DIGITS)?,
    }))
}

/// Converts annual leave into the natural leave unit of `term`.
fn leave_for(schedule: &WorkSchedule, term: Term) -> EngineResult<Leave> {
    let days = schedule.annual_leave_days;
    let nominal_days = schedule.nominal_days_per_year();

    let (amount, unit) = match term {
        Term::Yearly => (days, LeaveUnit::Days),
        Term::Monthly => (divide(days, Decimal::from(MONTHS_PER_YEAR))?, LeaveUnit::Days),
        Term::Weekly => (divide(days, Decimal::from(WEEKS_PER_YEAR))?, LeaveUnit::Days),
        Term::Daily => (
            divide(multiply(days, schedule.hours_per_day)?, nominal_days)?,
            LeaveUnit::Hours,
        ),
        Term::Hourly => (
            divide(multiply(days, Decimal::from(MINUTES_PER_HOUR))?, nominal_days)?,
            LeaveUnit::Minutes,
        ),
    };

    Ok(Leave {
        amount: ExactNumber::split(amount, UNIT_DIGITS)?,
        unit,
    })
}

fn add(value: Decimal, other: Decimal) -> EngineResult<Decimal> {
    value
        .checked_add(other)
        .ok_or_else(|| EngineError::Overflow {
            value: format!("{} + {}", value, other),
        })
}

fn multiply(value: Decimal, factor: Decimal) -> EngineResult<Decimal> {
    value
        .checked_mul(factor)
        .ok_or_else(|| EngineError::Overflow {
            value: format!("{} x {}", value, factor),
        })
}

fn divide(value: Decimal, divisor: Decimal) -> EngineResult<Decimal> {
    value
        .checked_div(divisor)
        .ok_or_else(|| EngineError::Overflow {
            value: format!("{} / {}", value, divisor),
        })
}
