//! Tax engine.
//!
//! Applies an ordered rule set to the annual gross, producing the itemized
//! deductions, their total and the annual net.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

use super::tax_rules::{AppliedTax, Deduction, TaxContext, TaxRule, validate_rules};

/// Annual figures after every rule has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnualFigures {
    /// The annualized gross.
    pub gross: Decimal,
    /// Deductions in rule order.
    pub taxes: Vec<AppliedTax>,
    /// Sum of all deductions.
    pub total_taxed: Decimal,
    /// Gross minus deductions. Not clamped; may be negative.
    pub net: Decimal,
}

/// The result of applying a rule set, including one audit step per rule.
#[derive(Debug, Clone)]
pub struct TaxEngineResult {
    /// The annual figures.
    pub annual: AnnualFigures,
    /// The audit steps recording each rule, in order.
    pub audit_steps: Vec<AuditStep>,
}

/// Applies `rules` in declared order to `annual_gross`.
///
/// Each rule sees the gross and every deduction made before it, so rules
/// taxing the remainder or surcharging an earlier deduction resolve against
/// the right figures. The net is `annual_gross - total_taxed`, computed
/// faithfully even when deductions exceed gross.
///
/// # Arguments
///
/// * `annual_gross` - The annualized gross pay
/// * `rules` - The rule set, in evaluation order
/// * `step_number` - The step number of the first rule for audit sequencing
///
/// # Errors
///
/// Returns `InvalidTaxRule` if the rule set fails validation and `Overflow`
/// if a deduction leaves the decimal range.
///
/// # Examples
///
/// ```
/// use earnings_engine::calculation::{apply_taxes, FlatRate, TaxBase, TaxRule};
/// use rust_decimal::Decimal;
///
/// let rules = vec![TaxRule::Flat(FlatRate {
///     label: "Income Tax".to_string(),
///     rate: Decimal::new(20, 2),
///     base: TaxBase::Gross,
/// })];
///
/// let result = apply_taxes(Decimal::from(60000), &rules, 1).unwrap();
/// assert_eq!(result.annual.total_taxed, Decimal::from(12000));
/// assert_eq!(result.annual.net, Decimal::from(48000));
/// ```
pub fn apply_taxes(
    annual_gross: Decimal,
    rules: &[TaxRule],
    step_number: u32,
) -> EngineResult<TaxEngineResult> {
    validate_rules(rules)?;

    let mut taxes: Vec<AppliedTax> = Vec::with_capacity(rules.len());
    let mut audit_steps = Vec::with_capacity(rules.len());

    for (offset, rule) in rules.iter().enumerate() {
        let ctx = TaxContext::new(annual_gross, &taxes);
        let base = rule.base().resolve(&ctx)?;
        let deducted_before = ctx.deducted()?;
        let amount = rule.apply(&ctx)?;

        audit_steps.push(AuditStep {
            step_number: step_number + offset as u32,
            rule_id: format!("tax_{}", rule.kind()),
            rule_name: rule.label().to_string(),
            input: serde_json::json!({
                "gross": annual_gross.normalize().to_string(),
                "base": rule.base().to_string(),
                "base_amount": base.normalize().to_string(),
                "deducted_before": deducted_before.normalize().to_string()
            }),
            output: serde_json::json!({
                "amount": amount.normalize().to_string()
            }),
            reasoning: format!(
                "{} ({}) on {} {} = {}",
                rule.label(),
                rule.kind(),
                rule.base(),
                base.normalize(),
                amount.normalize()
            ),
        });

        taxes.push(AppliedTax {
            label: rule.label().to_string(),
            amount,
        });
    }

    let total_taxed = taxes
        .iter()
        .try_fold(Decimal::ZERO, |sum, tax| sum.checked_add(tax.amount))
        .ok_or_else(|| EngineError::Overflow {
            value: "total deductions".to_string(),
        })?;

    let net = annual_gross
        .checked_sub(total_taxed)
        .ok_or_else(|| EngineError::Overflow {
            value: format!("{} - {}", annual_gross, total_taxed),
        })?;

    Ok(TaxEngineResult {
        annual: AnnualFigures {
            gross: annual_gross,
            taxes,
            total_taxed,
            net,
        },
        audit_steps,
    })
}
