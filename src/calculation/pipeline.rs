//! End-to-end earnings calculation.
//!
//! Runs rate normalization, the tax engine and period projection in order,
//! collecting their audit steps into one trace.

use tracing::{debug, warn};

use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::models::{
    AuditTrace, AuditWarning, CalculationInput, CalculationResult, Rate, WorkSchedule,
};

use super::period_projector::project_periods;
use super::rate_normalizer::normalize_rate;
use super::tax_engine::apply_taxes;
use super::tax_rules::TaxRule;

/// Warning code recorded when deductions exceed gross pay.
pub const NEGATIVE_NET_WARNING: &str = "NEGATIVE_NET";

/// Calculates the full five-term breakdown for a rate, schedule and rule set.
///
/// Audit steps are numbered sequentially: normalization first, one step per
/// tax rule, then projection. Net pay is never clamped; when any term's
/// rounded net is negative the trace carries a `NEGATIVE_NET` warning.
///
/// The result carries no ids or timestamps; calling this twice with equal
/// arguments yields equal results.
///
/// # Errors
///
/// Propagates `InvalidSchedule`, `InvalidRate`, `InvalidTaxRule` and
/// `Overflow` from the individual stages.
///
/// # Examples
///
/// ```
/// use earnings_engine::calculation::{calculate_earnings, FlatRate, TaxBase, TaxRule};
/// use earnings_engine::models::{Rate, Term, WorkSchedule};
/// use rust_decimal::Decimal;
///
/// let rate = Rate::new(Term::Yearly, "60000".parse().unwrap());
/// let schedule = WorkSchedule::new(Decimal::from(8), 5, Decimal::from(25));
/// let rules = vec![TaxRule::Flat(FlatRate {
///     label: "Income Tax".to_string(),
///     rate: Decimal::new(20, 2),
///     base: TaxBase::Gross,
/// })];
///
/// let result = calculate_earnings(&rate, &schedule, &rules).unwrap();
/// let yearly = result.period(Term::Yearly).unwrap();
/// assert_eq!(yearly.net.to_string(), "48000.00");
/// ```
pub fn calculate_earnings(
    rate: &Rate,
    schedule: &WorkSchedule,
    rules: &[TaxRule],
) -> EngineResult<CalculationResult> {
    let mut trace = AuditTrace::default();

    let normalized = normalize_rate(rate, schedule, 1)?;
    debug!(
        term = rate.term.as_str(),
        annual_gross = %normalized.annual_gross,
        "Rate normalized"
    );
    trace.steps.push(normalized.audit_step);

    let taxed = apply_taxes(normalized.annual_gross, rules, 2)?;
    debug!(
        rules = rules.len(),
        total_taxed = %taxed.annual.total_taxed,
        annual_net = %taxed.annual.net,
        "Taxes applied"
    );
    let projection_step = 2 + taxed.audit_steps.len() as u32;
    trace.steps.extend(taxed.audit_steps);

    let projection = project_periods(&taxed.annual, schedule, projection_step)?;
    debug!(periods = projection.periods.len(), "Periods projected");
    trace.steps.push(projection.audit_step);

    let mut result = CalculationResult {
        periods: projection.periods,
        audit_trace: trace,
    };

    let negative = result
        .periods
        .values()
        .find(|period| period.net.negative)
        .map(|period| {
            format!(
                "Deductions of {} exceed gross pay of {}; {} net pay is {}",
                period.taxed, period.gross, period.term, period.net
            )
        });
    if let Some(message) = negative {
        warn!(
            annual_gross = %taxed.annual.gross,
            total_taxed = %taxed.annual.total_taxed,
            "Deductions exceed gross pay"
        );
        result.audit_trace.warnings.push(AuditWarning {
            code: NEGATIVE_NET_WARNING.to_string(),
            message,
            severity: "high".to_string(),
        });
    }

    Ok(result)
}

/// Resolves the rule set named by `input` and calculates its breakdown.
///
/// # Errors
///
/// Returns `CountryNotFound` or `VariantNotFound` when the rule set cannot be
/// resolved, plus any error from [`calculate_earnings`].
pub fn calculate_input(
    input: &CalculationInput,
    config: &ConfigLoader,
) -> EngineResult<CalculationResult> {
    let variant = config.get_variant(&input.country, &input.variant)?;
    calculate_earnings(&input.rate, &input.schedule, &variant.rules)
}
