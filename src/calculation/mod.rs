//! Calculation logic for the Earnings Engine.
//!
//! This module contains the stages that turn a declared rate into a full
//! breakdown: rate normalization to an annual gross, ordered tax rule
//! application, and projection onto every term. [`calculate_earnings`] runs
//! all three.

mod period_projector;
mod pipeline;
mod rate_normalizer;
mod tax_engine;
mod tax_rules;

pub use period_projector::{ProjectionResult, project_periods};
pub use pipeline::{NEGATIVE_NET_WARNING, calculate_earnings, calculate_input};
pub use rate_normalizer::{RateNormalizationResult, normalize_rate};
pub use tax_engine::{AnnualFigures, TaxEngineResult, apply_taxes};
pub use tax_rules::{
    AppliedTax, Bracket, Condition, ConditionalRate, Deduction, FlatRate, ProgressiveBrackets,
    TaxBase, TaxContext, TaxRule, validate_rules,
};
