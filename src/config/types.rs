//! Configuration types for countries and their tax rule sets.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::Deserialize;

use crate::calculation::TaxRule;

/// Application-wide settings.
///
/// Loaded from `app.yaml` at the root of the configuration directory.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// The application name, used in share messages.
    pub name: String,
    /// The URI share queries are appended to, e.g. "https://example.com/calculate".
    pub share_uri_prefix: String,
}

/// One named tax rule set within a country.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantConfig {
    /// The human-readable variant name, e.g. "Student Loan Plan 2".
    pub name: String,
    /// The ordered rules applied to annual gross.
    #[serde(default)]
    pub rules: Vec<TaxRule>,
}

impl VariantConfig {
    /// The slug this variant is addressed by.
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

/// A country and the variants it offers.
///
/// Each country lives in its own file under `countries/`.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryConfig {
    /// The country id used in requests and share links, e.g. "gb".
    pub id: String,
    /// The display name.
    pub name: String,
    /// The flag emoji shown before the name.
    pub flag: String,
    /// Text placed before every amount, e.g. "£".
    #[serde(default)]
    pub prefix: String,
    /// Text placed after every amount, e.g. " €".
    #[serde(default)]
    pub suffix: String,
    /// The available rule sets, in display order.
    pub variants: Vec<VariantConfig>,
}

impl CountryConfig {
    /// Finds a variant by its slug.
    pub fn variant(&self, slug: &str) -> Option<&VariantConfig> {
        self.variants.iter().find(|variant| variant.slug() == slug)
    }

    /// Formats an amount with the country's currency prefix and suffix.
    pub fn currency(&self, amount: impl std::fmt::Display) -> String {
        format!("{}{}{}", self.prefix, amount, self.suffix)
    }
}

/// Converts a display name into a URL-safe slug.
///
/// Non-ASCII letters are transliterated first. ASCII letters and digits are
/// lowercased and kept; every run of anything else becomes a single `-`, and
/// leading or trailing dashes are dropped.
///
/// # Example
///
/// ```
/// use earnings_engine::config::slugify;
///
/// assert_eq!(slugify("Student Loan Plan 2"), "student-loan-plan-2");
/// assert_eq!(slugify("  Church Tax (9%) "), "church-tax-9");
/// assert_eq!(slugify("Über Tax"), "uber-tax");
/// ```
pub fn slugify(name: &str) -> String {
    slug::slugify(name)
}
