//! Pay-period granularities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One of the five supported pay-period granularities.
///
/// Terms are ordered from largest to smallest, so a `BTreeMap<Term, _>`
/// iterates year, month, week, day, hour.
///
/// # Example
///
/// ```
/// use earnings_engine::models::Term;
///
/// let term: Term = "weekly".parse().unwrap();
/// assert_eq!(term, Term::Weekly);
/// assert_eq!(term.smaller(), Some(Term::Daily));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    /// Per year.
    Yearly,
    /// Per month.
    Monthly,
    /// Per worked week.
    Weekly,
    /// Per worked day.
    Daily,
    /// Per worked hour.
    Hourly,
}

impl Term {
    /// Every term, largest first.
    pub const ALL: [Term; 5] = [
        Term::Yearly,
        Term::Monthly,
        Term::Weekly,
        Term::Daily,
        Term::Hourly,
    ];

    /// The wire name used in JSON and share links.
    pub fn as_str(self) -> &'static str {
        match self {
            Term::Yearly => "yearly",
            Term::Monthly => "monthly",
            Term::Weekly => "weekly",
            Term::Daily => "daily",
            Term::Hourly => "hourly",
        }
    }

    /// The singular period name, as in "per year".
    pub fn unit(self) -> &'static str {
        match self {
            Term::Yearly => "year",
            Term::Monthly => "month",
            Term::Weekly => "week",
            Term::Daily => "day",
            Term::Hourly => "hour",
        }
    }

    /// The next-smaller term, if any.
    pub fn smaller(self) -> Option<Term> {
        match self {
            Term::Yearly => Some(Term::Monthly),
            Term::Monthly => Some(Term::Weekly),
            Term::Weekly => Some(Term::Daily),
            Term::Daily => Some(Term::Hourly),
            Term::Hourly => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Term {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yearly" => Ok(Term::Yearly),
            "monthly" => Ok(Term::Monthly),
            "weekly" => Ok(Term::Weekly),
            "daily" => Ok(Term::Daily),
            "hourly" => Ok(Term::Hourly),
            _ => Err(EngineError::InvalidTerm {
                value: s.to_string(),
            }),
        }
    }
}
