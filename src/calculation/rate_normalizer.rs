//! Rate normalization functionality.
//!
//! This module converts a declared rate at any [`Term`] into the annualized
//! gross every later stage derives its figures from.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Rate, Term, WorkSchedule};

/// The result of normalizing a rate, including the annual gross and audit step.
#[derive(Debug, Clone)]
pub struct RateNormalizationResult {
    /// The annualized gross pay, unrounded.
    pub annual_gross: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Converts `rate` to an annual gross using factors derived from `schedule`.
///
/// The factor for a term is [`WorkSchedule::periods_per_year`]: a yearly rate
/// is taken as total annual compensation, while weekly, daily and hourly rates
/// are multiplied only by the time actually worked after leave. All arithmetic
/// is exact; nothing is rounded here.
///
/// # Arguments
///
/// * `rate` - The declared rate and its term
/// * `schedule` - The work schedule supplying the conversion factors
/// * `step_number` - The step number for audit trail sequencing
///
/// # Errors
///
/// Returns `InvalidSchedule` if the schedule violates its invariants,
/// `InvalidRate` if the amount is not positive, and `Overflow` if the annual
/// figure leaves the decimal range.
///
/// # Examples
///
/// ```
/// use earnings_engine::calculation::normalize_rate;
/// use earnings_engine::models::{Rate, Term, WorkSchedule};
/// use rust_decimal::Decimal;
///
/// let schedule = WorkSchedule::new(Decimal::from(8), 5, Decimal::from(25));
/// let rate = Rate::new(Term::Hourly, "20".parse().unwrap());
///
/// let result = normalize_rate(&rate, &schedule, 1).unwrap();
/// assert_eq!(result.annual_gross, Decimal::from(37600));
/// ```
pub fn normalize_rate(
    rate: &Rate,
    schedule: &WorkSchedule,
    step_number: u32,
) -> EngineResult<RateNormalizationResult> {
    schedule.validate()?;
    let amount = rate.amount_decimal()?;
    let factor = schedule.periods_per_year(rate.term)?;

    let annual_gross = amount
        .checked_mul(factor)
        .ok_or_else(|| EngineError::Overflow {
            value: format!("{} x {}", amount, factor),
        })?;

    let reasoning = match rate.term {
        Term::Yearly => format!(
            "Yearly rate {} is total annual compensation; leave does not reduce it",
            amount.normalize()
        ),
        Term::Monthly => format!(
            "{} per month x 12 months = {}",
            amount.normalize(),
            annual_gross.normalize()
        ),
        term => format!(
            "{} per {} x {} {}s worked after {} leave days = {}",
            amount.normalize(),
            term.unit(),
            factor.normalize(),
            term.unit(),
            schedule.annual_leave_days.normalize(),
            annual_gross.normalize()
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "rate_normalization".to_string(),
        rule_name: "Rate Normalization".to_string(),
        input: serde_json::json!({
            "amount": amount.normalize().to_string(),
            "term": rate.term.as_str(),
            "hours_per_day": schedule.hours_per_day.normalize().to_string(),
            "days_per_week": schedule.days_per_week,
            "annual_leave_days": schedule.annual_leave_days.normalize().to_string()
        }),
        output: serde_json::json!({
            "annual_gross": annual_gross.normalize().to_string(),
            "factor": factor.normalize().to_string()
        }),
        reasoning,
    };

    Ok(RateNormalizationResult {
        annual_gross,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExactNumber;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn standard_schedule() -> WorkSchedule {
        WorkSchedule::new(dec("8"), 5, dec("25"))
    }

    fn rate(term: Term, amount: &str) -> Rate {
        Rate::new(term, amount.parse::<ExactNumber>().unwrap())
    }

    /// RN-001: yearly rate is not reduced by leave
    #[test]
    fn test_yearly_rate_unchanged_by_leave() {
        let result = normalize_rate(&rate(Term::Yearly, "60000"), &standard_schedule(), 1).unwrap();
        assert_eq!(result.annual_gross, dec("60000"));
        assert!(result.audit_step.reasoning.contains("leave does not reduce it"));
    }

    /// RN-002: monthly rate times twelve
    #[test]
    fn test_monthly_rate() {
        let result = normalize_rate(&rate(Term::Monthly, "5000"), &standard_schedule(), 1).unwrap();
        assert_eq!(result.annual_gross, dec("60000"));
    }

    /// RN-003: weekly rate times worked weeks
    #[test]
    fn test_weekly_rate_uses_worked_weeks() {
        let result = normalize_rate(&rate(Term::Weekly, "1000"), &standard_schedule(), 1).unwrap();
        assert_eq!(result.annual_gross, dec("47000"));
    }

    /// RN-004: daily rate times worked days
    #[test]
    fn test_daily_rate() {
        let result = normalize_rate(&rate(Term::Daily, "200"), &standard_schedule(), 1).unwrap();
        assert_eq!(result.annual_gross, dec("47000"));
    }

    /// RN-005: hourly rate times worked hours
    #[test]
    fn test_hourly_rate() {
        let result = normalize_rate(&rate(Term::Hourly, "20"), &standard_schedule(), 1).unwrap();
        assert_eq!(result.annual_gross, dec("37600"));
    }

    #[test]
    fn test_hourly_rate_without_leave() {
        let schedule = WorkSchedule::new(dec("7.5"), 5, dec("0"));
        let result = normalize_rate(&rate(Term::Hourly, "28.54"), &schedule, 1).unwrap();
        assert_eq!(result.annual_gross, dec("28.54") * dec("1950"));
    }

    #[test]
    fn test_fractional_leave_is_not_rounded() {
        let schedule = WorkSchedule::new(dec("8"), 3, dec("10"));
        let result = normalize_rate(&rate(Term::Weekly, "300"), &schedule, 1).unwrap();
        let expected = dec("300") * (dec("52") - dec("10") / dec("3"));
        assert_eq!(result.annual_gross, expected);
    }

    #[test]
    fn test_invalid_schedule_rejected() {
        let schedule = WorkSchedule::new(dec("8"), 8, dec("0"));
        match normalize_rate(&rate(Term::Yearly, "60000"), &schedule, 1) {
            Err(EngineError::InvalidSchedule { field, .. }) => assert_eq!(field, "days_per_week"),
            other => panic!("Expected InvalidSchedule, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_rate_rejected() {
        assert!(matches!(
            normalize_rate(&rate(Term::Hourly, "0"), &standard_schedule(), 1),
            Err(EngineError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_negative_rate_rejected() {
        assert!(matches!(
            normalize_rate(&rate(Term::Monthly, "-100"), &standard_schedule(), 1),
            Err(EngineError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_audit_step_contents() {
        let result = normalize_rate(&rate(Term::Hourly, "20"), &standard_schedule(), 7).unwrap();
        let step = &result.audit_step;

        assert_eq!(step.step_number, 7);
        assert_eq!(step.rule_id, "rate_normalization");
        assert_eq!(step.input["term"].as_str().unwrap(), "hourly");
        assert_eq!(step.input["days_per_week"].as_u64().unwrap(), 5);
        assert_eq!(step.output["annual_gross"].as_str().unwrap(), "37600");
        assert_eq!(step.output["factor"].as_str().unwrap(), "1880");
        assert!(step.reasoning.contains("1880 hours worked"));
    }
}
