//! Error types for the Earnings Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while normalizing a rate,
//! applying tax rules, projecting periods or loading configuration.

use thiserror::Error;

/// The main error type for the Earnings Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use earnings_engine::error::EngineError;
///
/// let error = EngineError::CountryNotFound {
///     id: "xx".to_string(),
/// };
/// assert_eq!(error.to_string(), "Country not found: xx");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The work schedule violates one of its invariants.
    #[error("Invalid schedule field '{field}': {message}")]
    InvalidSchedule {
        /// The schedule field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The declared rate cannot be used for a calculation.
    #[error("Invalid rate: {message}")]
    InvalidRate {
        /// A description of what made the rate invalid.
        message: String,
    },

    /// A value left the decimal range or is too large to split into an
    /// exact display number.
    #[error("Value {value} overflows the exact number range")]
    Overflow {
        /// The value that could not be represented.
        value: String,
    },

    /// Text does not name a term.
    #[error("Unknown term '{value}': expected yearly, monthly, weekly, daily or hourly")]
    InvalidTerm {
        /// The text that failed to parse.
        value: String,
    },

    /// Text could not be read as an exact number.
    #[error("Invalid number '{value}': {message}")]
    InvalidNumber {
        /// The text that failed to parse.
        value: String,
        /// A description of the parse failure.
        message: String,
    },

    /// A tax rule set failed validation.
    #[error("Invalid tax rule '{label}': {message}")]
    InvalidTaxRule {
        /// The label of the offending rule.
        label: String,
        /// A description of what made the rule invalid.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Country id was not found in the configuration.
    #[error("Country not found: {id}")]
    CountryNotFound {
        /// The country id that was not found.
        id: String,
    },

    /// Variant slug was not found for the country.
    #[error("Variant '{variant}' not found for country '{country}'")]
    VariantNotFound {
        /// The country id.
        country: String,
        /// The variant slug that was not found.
        variant: String,
    },

    /// A share query string could not be decoded.
    #[error("Invalid share link: {message}")]
    InvalidShareLink {
        /// A description of the decoding failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
