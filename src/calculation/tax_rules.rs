//! Tax rule definitions.
//!
//! A rule set is an ordered list of [`TaxRule`]s, selected from configuration
//! by a `type` tag. Every variant implements [`Deduction`], which computes one
//! itemized amount from a [`TaxContext`] holding the annual gross and the
//! deductions applied before it.

use std::collections::HashSet;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A deduction already applied by an earlier rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedTax {
    /// The label of the rule that produced it.
    pub label: String,
    /// The annual amount deducted.
    pub amount: Decimal,
}

/// What a rule can see when it is evaluated.
#[derive(Debug, Clone, Copy)]
pub struct TaxContext<'a> {
    gross: Decimal,
    applied: &'a [AppliedTax],
}

impl<'a> TaxContext<'a> {
    /// Creates a context over the annual gross and the deductions so far.
    pub fn new(gross: Decimal, applied: &'a [AppliedTax]) -> Self {
        Self { gross, applied }
    }

    /// The annual gross.
    pub fn gross(&self) -> Decimal {
        self.gross
    }

    /// Sum of every deduction applied so far.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the sum leaves the decimal range.
    pub fn deducted(&self) -> EngineResult<Decimal> {
        self.applied.iter().try_fold(Decimal::ZERO, |total, tax| {
            total
                .checked_add(tax.amount)
                .ok_or_else(|| overflow(&tax.label))
        })
    }

    /// Gross minus every deduction applied so far.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the deductions or the difference leave the
    /// decimal range.
    pub fn remaining(&self) -> EngineResult<Decimal> {
        let deducted = self.deducted()?;
        self.gross
            .checked_sub(deducted)
            .ok_or_else(|| EngineError::Overflow {
                value: format!("{} - {}", self.gross, deducted),
            })
    }

    /// The amount an earlier rule deducted, if it has run.
    pub fn amount_of(&self, label: &str) -> Option<Decimal> {
        self.applied
            .iter()
            .find(|tax| tax.label == label)
            .map(|tax| tax.amount)
    }
}

/// The figure a rule's rate is applied to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaxBase {
    /// The annual gross.
    #[default]
    Gross,
    /// Gross minus all deductions applied before this rule.
    Remaining,
    /// The amount of an earlier deduction, e.g. a surcharge on income tax.
    Deduction {
        /// The label of the earlier rule.
        label: String,
    },
}

impl TaxBase {
    /// Resolves the base against the context. A negative base taxes nothing.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the remaining figure leaves the decimal range.
    pub fn resolve(&self, ctx: &TaxContext<'_>) -> EngineResult<Decimal> {
        let base = match self {
            TaxBase::Gross => ctx.gross(),
            TaxBase::Remaining => ctx.remaining()?,
            TaxBase::Deduction { label } => ctx.amount_of(label).unwrap_or(Decimal::ZERO),
        };
        Ok(base.max(Decimal::ZERO))
    }

    fn referenced_label(&self) -> Option<&str> {
        match self {
            TaxBase::Deduction { label } => Some(label),
            _ => None,
        }
    }
}

impl fmt::Display for TaxBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxBase::Gross => f.write_str("gross"),
            TaxBase::Remaining => f.write_str("remaining"),
            TaxBase::Deduction { label } => write!(f, "deduction '{}'", label),
        }
    }
}

/// When a conditional rule applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// Annual gross is strictly above `amount`.
    GrossAbove {
        /// The threshold.
        amount: Decimal,
    },
    /// Annual gross is at or below `amount`.
    GrossAtMost {
        /// The threshold.
        amount: Decimal,
    },
    /// An earlier rule deducted strictly more than `amount`.
    DeductionAbove {
        /// The label of the earlier rule.
        label: String,
        /// The threshold.
        amount: Decimal,
    },
}

impl Condition {
    /// Evaluates the condition.
    pub fn holds(&self, ctx: &TaxContext<'_>) -> bool {
        match self {
            Condition::GrossAbove { amount } => ctx.gross() > *amount,
            Condition::GrossAtMost { amount } => ctx.gross() <= *amount,
            Condition::DeductionAbove { label, amount } => {
                ctx.amount_of(label).is_some_and(|deducted| deducted > *amount)
            }
        }
    }

    fn referenced_label(&self) -> Option<&str> {
        match self {
            Condition::DeductionAbove { label, .. } => Some(label),
            _ => None,
        }
    }
}

/// A labelled computation that yields one itemized deduction.
pub trait Deduction {
    /// The label shown next to the amount.
    fn label(&self) -> &str;

    /// Computes the annual amount for this deduction.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the arithmetic leaves the decimal range.
    fn apply(&self, ctx: &TaxContext<'_>) -> EngineResult<Decimal>;
}

/// A single rate applied to the whole base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRate {
    /// The deduction label.
    pub label: String,
    /// The rate as a fraction, e.g. 0.20 for 20%.
    pub rate: Decimal,
    /// The figure the rate applies to.
    #[serde(default)]
    pub base: TaxBase,
}

impl Deduction for FlatRate {
    fn label(&self) -> &str {
        &self.label
    }

    fn apply(&self, ctx: &TaxContext<'_>) -> EngineResult<Decimal> {
        checked_mul(self.base.resolve(ctx)?, self.rate)
    }
}

/// A marginal band: income from `from` up to the next band's `from` is taxed at `rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    /// Lower bound of the band.
    pub from: Decimal,
    /// The rate within the band.
    pub rate: Decimal,
}

/// Marginal brackets, ascending by `from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressiveBrackets {
    /// The deduction label.
    pub label: String,
    /// The bands, lowest first.
    pub brackets: Vec<Bracket>,
    /// The figure the bands apply to.
    #[serde(default)]
    pub base: TaxBase,
}

impl Deduction for ProgressiveBrackets {
    fn label(&self) -> &str {
        &self.label
    }

    fn apply(&self, ctx: &TaxContext<'_>) -> EngineResult<Decimal> {
        let base = self.base.resolve(ctx)?;
        let mut total = Decimal::ZERO;

        for (index, bracket) in self.brackets.iter().enumerate() {
            if base <= bracket.from {
                break;
            }
            let upper = self
                .brackets
                .get(index + 1)
                .map(|next| next.from.min(base))
                .unwrap_or(base);
            let band = checked_mul(upper - bracket.from, bracket.rate)?;
            total = total.checked_add(band).ok_or_else(|| overflow(&self.label))?;
        }

        Ok(total)
    }
}

/// A single rate that only applies when a condition holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalRate {
    /// The deduction label.
    pub label: String,
    /// When the rate applies.
    pub condition: Condition,
    /// The rate as a fraction.
    pub rate: Decimal,
    /// The figure the rate applies to.
    #[serde(default)]
    pub base: TaxBase,
}

impl Deduction for ConditionalRate {
    fn label(&self) -> &str {
        &self.label
    }

    fn apply(&self, ctx: &TaxContext<'_>) -> EngineResult<Decimal> {
        if self.condition.holds(ctx) {
            checked_mul(self.base.resolve(ctx)?, self.rate)
        } else {
            Ok(Decimal::ZERO)
        }
    }
}

/// A configured tax rule.
///
/// # Example
///
/// ```
/// use earnings_engine::calculation::{Deduction, TaxContext, TaxRule};
/// use rust_decimal::Decimal;
///
/// let rule: TaxRule = serde_json::from_str(
///     r#"{"type": "flat", "label": "Income Tax", "rate": "0.20"}"#,
/// ).unwrap();
/// let ctx = TaxContext::new(Decimal::from(60000), &[]);
/// assert_eq!(rule.apply(&ctx).unwrap(), Decimal::from(12000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaxRule {
    /// See [`FlatRate`].
    Flat(FlatRate),
    /// See [`ProgressiveBrackets`].
    Progressive(ProgressiveBrackets),
    /// See [`ConditionalRate`].
    Conditional(ConditionalRate),
}

impl TaxRule {
    /// The configuration tag of this rule.
    pub fn kind(&self) -> &'static str {
        match self {
            TaxRule::Flat(_) => "flat",
            TaxRule::Progressive(_) => "progressive",
            TaxRule::Conditional(_) => "conditional",
        }
    }

    /// The figure this rule applies to.
    pub fn base(&self) -> &TaxBase {
        match self {
            TaxRule::Flat(rule) => &rule.base,
            TaxRule::Progressive(rule) => &rule.base,
            TaxRule::Conditional(rule) => &rule.base,
        }
    }

    fn as_deduction(&self) -> &dyn Deduction {
        match self {
            TaxRule::Flat(rule) => rule as &dyn Deduction,
            TaxRule::Progressive(rule) => rule as &dyn Deduction,
            TaxRule::Conditional(rule) => rule as &dyn Deduction,
        }
    }
}

impl Deduction for TaxRule {
    fn label(&self) -> &str {
        self.as_deduction().label()
    }

    fn apply(&self, ctx: &TaxContext<'_>) -> EngineResult<Decimal> {
        self.as_deduction().apply(ctx)
    }
}

/// Checks that a rule set can be evaluated in order.
///
/// Labels must be unique and non-empty, rates non-negative, brackets
/// non-empty and strictly ascending from zero or above, and every reference
/// to another rule must point at one declared earlier.
///
/// # Errors
///
/// Returns `InvalidTaxRule` naming the first offending rule.
pub fn validate_rules(rules: &[TaxRule]) -> EngineResult<()> {
    let mut seen: HashSet<&str> = HashSet::new();

    for rule in rules {
        let label = rule.label();
        let invalid = |message: String| EngineError::InvalidTaxRule {
            label: label.to_string(),
            message,
        };

        if label.trim().is_empty() {
            return Err(invalid("label cannot be empty".to_string()));
        }
        if seen.contains(label) {
            return Err(invalid("duplicate label".to_string()));
        }

        let mut rates = Vec::new();
        let mut references = Vec::new();
        references.extend(rule.base().referenced_label());

        match rule {
            TaxRule::Flat(flat) => rates.push(flat.rate),
            TaxRule::Progressive(progressive) => {
                if progressive.brackets.is_empty() {
                    return Err(invalid("needs at least one bracket".to_string()));
                }
                for (index, bracket) in progressive.brackets.iter().enumerate() {
                    if bracket.from < Decimal::ZERO {
                        return Err(invalid(format!("bracket {} starts below zero", index + 1)));
                    }
                    if index > 0 && bracket.from <= progressive.brackets[index - 1].from {
                        return Err(invalid(format!(
                            "bracket {} does not start above bracket {}",
                            index + 1,
                            index
                        )));
                    }
                    rates.push(bracket.rate);
                }
            }
            TaxRule::Conditional(conditional) => {
                rates.push(conditional.rate);
                references.extend(conditional.condition.referenced_label());
            }
        }

        if let Some(rate) = rates.iter().find(|rate| **rate < Decimal::ZERO) {
            return Err(invalid(format!("rate cannot be negative, got {}", rate)));
        }

        for reference in references {
            if !seen.contains(reference) {
                return Err(invalid(format!(
                    "refers to '{}', which is not declared earlier",
                    reference
                )));
            }
        }

        seen.insert(label);
    }

    Ok(())
}

fn checked_mul(base: Decimal, rate: Decimal) -> EngineResult<Decimal> {
    base.checked_mul(rate).ok_or_else(|| EngineError::Overflow {
        value: format!("{} x {}", base, rate),
    })
}

fn overflow(label: &str) -> EngineError {
    EngineError::Overflow {
        value: format!("total for '{}'", label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn applied(label: &str, amount: &str) -> AppliedTax {
        AppliedTax {
            label: label.to_string(),
            amount: dec(amount),
        }
    }

    fn flat(label: &str, rate: &str, base: TaxBase) -> TaxRule {
        TaxRule::Flat(FlatRate {
            label: label.to_string(),
            rate: dec(rate),
            base,
        })
    }

    fn uk_style_income_tax() -> ProgressiveBrackets {
        ProgressiveBrackets {
            label: "Income Tax".to_string(),
            brackets: vec![
                Bracket { from: dec("0"), rate: dec("0") },
                Bracket { from: dec("12570"), rate: dec("0.20") },
                Bracket { from: dec("50270"), rate: dec("0.40") },
                Bracket { from: dec("125140"), rate: dec("0.45") },
            ],
            base: TaxBase::Gross,
        }
    }

    #[test]
    fn test_context_remaining_subtracts_applied() {
        let taxes = vec![applied("A", "1000"), applied("B", "500")];
        let ctx = TaxContext::new(dec("10000"), &taxes);
        assert_eq!(ctx.deducted().unwrap(), dec("1500"));
        assert_eq!(ctx.remaining().unwrap(), dec("8500"));
        assert_eq!(ctx.amount_of("B"), Some(dec("500")));
        assert_eq!(ctx.amount_of("C"), None);
    }

    #[test]
    fn test_flat_rate_on_gross() {
        let rule = flat("Income Tax", "0.20", TaxBase::Gross);
        let ctx = TaxContext::new(dec("60000"), &[]);
        assert_eq!(rule.apply(&ctx).unwrap(), dec("12000"));
    }

    #[test]
    fn test_flat_rate_on_remaining() {
        let taxes = vec![applied("Pension", "3000")];
        let rule = flat("Income Tax", "0.20", TaxBase::Remaining);
        let ctx = TaxContext::new(dec("60000"), &taxes);
        assert_eq!(rule.apply(&ctx).unwrap(), dec("11400"));
    }

    #[test]
    fn test_flat_rate_on_prior_deduction() {
        let taxes = vec![applied("Income Tax", "10000")];
        let rule = flat(
            "Solidarity Surcharge",
            "0.055",
            TaxBase::Deduction {
                label: "Income Tax".to_string(),
            },
        );
        let ctx = TaxContext::new(dec("60000"), &taxes);
        assert_eq!(rule.apply(&ctx).unwrap(), dec("550"));
    }

    #[test]
    fn test_negative_remaining_base_taxes_nothing() {
        let taxes = vec![applied("Everything", "70000")];
        let rule = flat("Extra", "0.10", TaxBase::Remaining);
        let ctx = TaxContext::new(dec("60000"), &taxes);
        assert_eq!(rule.apply(&ctx).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_progressive_below_first_taxed_band() {
        let ctx = TaxContext::new(dec("10000"), &[]);
        assert_eq!(uk_style_income_tax().apply(&ctx).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_progressive_spans_two_bands() {
        // (50270 - 12570) * 0.20 + (60000 - 50270) * 0.40 = 7540 + 3892
        let ctx = TaxContext::new(dec("60000"), &[]);
        assert_eq!(uk_style_income_tax().apply(&ctx).unwrap(), dec("11432"));
    }

    #[test]
    fn test_progressive_top_band_is_open_ended() {
        // 7540 + (125140 - 50270) * 0.40 + (200000 - 125140) * 0.45
        let ctx = TaxContext::new(dec("200000"), &[]);
        assert_eq!(
            uk_style_income_tax().apply(&ctx).unwrap(),
            dec("7540") + dec("29948") + dec("33687")
        );
    }

    #[test]
    fn test_progressive_first_band_above_zero() {
        let rule = ProgressiveBrackets {
            label: "Levy".to_string(),
            brackets: vec![Bracket { from: dec("1000"), rate: dec("0.10") }],
            base: TaxBase::Gross,
        };
        let ctx = TaxContext::new(dec("1500"), &[]);
        assert_eq!(rule.apply(&ctx).unwrap(), dec("50"));
    }

    #[test]
    fn test_conditional_applies_only_when_condition_holds() {
        let rule = ConditionalRate {
            label: "Medicare Levy".to_string(),
            condition: Condition::GrossAbove { amount: dec("26000") },
            rate: dec("0.02"),
            base: TaxBase::Gross,
        };
        assert_eq!(
            rule.apply(&TaxContext::new(dec("60000"), &[])).unwrap(),
            dec("1200")
        );
        assert_eq!(
            rule.apply(&TaxContext::new(dec("26000"), &[])).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_conditional_on_prior_deduction() {
        let rule = ConditionalRate {
            label: "Surcharge".to_string(),
            condition: Condition::DeductionAbove {
                label: "Income Tax".to_string(),
                amount: dec("18130"),
            },
            rate: dec("0.055"),
            base: TaxBase::Deduction {
                label: "Income Tax".to_string(),
            },
        };
        let low = vec![applied("Income Tax", "10000")];
        let high = vec![applied("Income Tax", "20000")];
        assert_eq!(rule.apply(&TaxContext::new(dec("60000"), &low)).unwrap(), Decimal::ZERO);
        assert_eq!(
            rule.apply(&TaxContext::new(dec("90000"), &high)).unwrap(),
            dec("1100")
        );
    }

    #[test]
    fn test_gross_at_most_condition() {
        let condition = Condition::GrossAtMost { amount: dec("20000") };
        assert!(condition.holds(&TaxContext::new(dec("20000"), &[])));
        assert!(!condition.holds(&TaxContext::new(dec("20000.01"), &[])));
    }

    #[test]
    fn test_deserialize_tagged_rules() {
        let json = r#"[
            {"type": "flat", "label": "Pension", "rate": "0.05"},
            {"type": "progressive", "label": "Income Tax", "base": {"kind": "remaining"},
             "brackets": [{"from": "0", "rate": "0"}, {"from": "12570", "rate": "0.2"}]},
            {"type": "conditional", "label": "Levy", "rate": "0.02",
             "condition": {"kind": "gross_above", "amount": "26000"}}
        ]"#;
        let rules: Vec<TaxRule> = serde_json::from_str(json).unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].kind(), "flat");
        assert_eq!(rules[0].base(), &TaxBase::Gross);
        assert_eq!(rules[1].kind(), "progressive");
        assert_eq!(rules[1].base(), &TaxBase::Remaining);
        assert_eq!(rules[2].label(), "Levy");
    }

    #[test]
    fn test_validate_accepts_well_formed_rules() {
        let rules = vec![
            TaxRule::Progressive(uk_style_income_tax()),
            flat(
                "Surcharge",
                "0.055",
                TaxBase::Deduction {
                    label: "Income Tax".to_string(),
                },
            ),
        ];
        assert!(validate_rules(&rules).is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_labels() {
        let rules = vec![
            flat("Income Tax", "0.1", TaxBase::Gross),
            flat("Income Tax", "0.2", TaxBase::Gross),
        ];
        match validate_rules(&rules) {
            Err(EngineError::InvalidTaxRule { label, message }) => {
                assert_eq!(label, "Income Tax");
                assert!(message.contains("duplicate"));
            }
            other => panic!("Expected InvalidTaxRule, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_forward_reference() {
        let rules = vec![
            flat(
                "Surcharge",
                "0.055",
                TaxBase::Deduction {
                    label: "Income Tax".to_string(),
                },
            ),
            flat("Income Tax", "0.2", TaxBase::Gross),
        ];
        match validate_rules(&rules) {
            Err(EngineError::InvalidTaxRule { label, message }) => {
                assert_eq!(label, "Surcharge");
                assert!(message.contains("Income Tax"));
            }
            other => panic!("Expected InvalidTaxRule, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_unsorted_brackets() {
        let rule = TaxRule::Progressive(ProgressiveBrackets {
            label: "Income Tax".to_string(),
            brackets: vec![
                Bracket { from: dec("10000"), rate: dec("0.2") },
                Bracket { from: dec("5000"), rate: dec("0.1") },
            ],
            base: TaxBase::Gross,
        });
        assert!(matches!(
            validate_rules(&[rule]),
            Err(EngineError::InvalidTaxRule { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_negative_rate_and_empty_label() {
        assert!(validate_rules(&[flat("Credit", "-0.1", TaxBase::Gross)]).is_err());
        assert!(validate_rules(&[flat("  ", "0.1", TaxBase::Gross)]).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_brackets() {
        let rule = TaxRule::Progressive(ProgressiveBrackets {
            label: "Income Tax".to_string(),
            brackets: vec![],
            base: TaxBase::Gross,
        });
        assert!(validate_rules(&[rule]).is_err());
    }
}
