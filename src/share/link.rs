//! Share-link query encoding.
//!
//! A [`CalculationInput`] is encoded as
//! `c=<country>&v=<variant>&t=<term>&r=<rate>&h=<hours>&d=<days>&l=<leave>` and
//! decoded back to an equal input, so a shared link recomputes the same result.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{CalculationInput, ExactNumber, Rate, Term, WorkSchedule};

const COUNTRY: &str = "c";
const VARIANT: &str = "v";
const TERM: &str = "t";
const RATE: &str = "r";
const HOURS_PER_DAY: &str = "h";
const DAYS_PER_WEEK: &str = "d";
const ANNUAL_LEAVE: &str = "l";

/// Encodes `input` as a share query string, without a leading `?`.
///
/// # Example
///
/// ```
/// use earnings_engine::models::{CalculationInput, Rate, Term, WorkSchedule};
/// use earnings_engine::share::encode_query;
/// use rust_decimal::Decimal;
///
/// let input = CalculationInput {
///     country: "gb".to_string(),
///     variant: "standard".to_string(),
///     rate: Rate::new(Term::Yearly, "60000.50".parse().unwrap()),
///     schedule: WorkSchedule::new(Decimal::from(8), 5, Decimal::from(25)),
/// };
/// assert_eq!(
///     encode_query(&input),
///     "c=gb&v=standard&t=yearly&r=60000.50&h=8&d=5&l=25"
/// );
/// ```
pub fn encode_query(input: &CalculationInput) -> String {
    let pairs = [
        (COUNTRY, input.country.clone()),
        (VARIANT, input.variant.clone()),
        (TERM, input.rate.term.as_str().to_string()),
        (RATE, input.rate.amount.to_string()),
        (HOURS_PER_DAY, input.schedule.hours_per_day.to_string()),
        (DAYS_PER_WEEK, input.schedule.days_per_week.to_string()),
        (ANNUAL_LEAVE, input.schedule.annual_leave_days.to_string()),
    ];

    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Builds a full share link by appending the encoded query to `prefix`.
pub fn share_link(prefix: &str, input: &CalculationInput) -> String {
    let separator = if prefix.contains('?') { '&' } else { '?' };
    format!("{}{}{}", prefix, separator, encode_query(input))
}

/// Decodes a share query, or a full link containing one, back to an input.
///
/// Unknown keys are ignored. A repeated key keeps its last value.
///
/// # Errors
///
/// Returns `InvalidShareLink` when a required key is missing or a value
/// cannot be parsed.
///
/// # Example
///
/// ```
/// use earnings_engine::models::Term;
/// use earnings_engine::share::decode_query;
///
/// let input = decode_query("https://example.com/?c=gb&v=standard&t=hourly&r=20&h=8&d=5&l=25").unwrap();
/// assert_eq!(input.country, "gb");
/// assert_eq!(input.rate.term, Term::Hourly);
/// assert_eq!(input.schedule.days_per_week, 5);
/// ```
pub fn decode_query(query: &str) -> EngineResult<CalculationInput> {
    let query = query.split_once('?').map_or(query, |(_, rest)| rest);
    let query = query.split_once('#').map_or(query, |(rest, _)| rest);

    let mut values = HashMap::new();
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        values.insert(decode_component(key)?, decode_component(value)?);
    }

    let term = Term::from_str(required(&values, TERM)?)
        .map_err(|e| invalid(format!("'{}': {}", TERM, e)))?;
    let amount = ExactNumber::from_str(required(&values, RATE)?)
        .map_err(|e| invalid(format!("'{}': {}", RATE, e)))?;
    let days_per_week = required(&values, DAYS_PER_WEEK)?
        .parse::<u8>()
        .map_err(|e| invalid(format!("'{}': {}", DAYS_PER_WEEK, e)))?;

    Ok(CalculationInput {
        country: required(&values, COUNTRY)?.to_string(),
        variant: required(&values, VARIANT)?.to_string(),
        rate: Rate::new(term, amount),
        schedule: WorkSchedule::new(
            decimal(&values, HOURS_PER_DAY)?,
            days_per_week,
            decimal(&values, ANNUAL_LEAVE)?,
        ),
    })
}

fn decode_component(text: &str) -> EngineResult<String> {
    urlencoding::decode(text)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| invalid(format!("bad encoding in '{}': {}", text, e)))
}

fn required<'a>(values: &'a HashMap<String, String>, key: &str) -> EngineResult<&'a str> {
    match values.get(key) {
        Some(value) if !value.is_empty() => Ok(value.as_str()),
        _ => Err(invalid(format!("missing '{}'", key))),
    }
}

fn decimal(values: &HashMap<String, String>, key: &str) -> EngineResult<Decimal> {
    let text = required(values, key)?;
    Decimal::from_str_exact(text).map_err(|e| invalid(format!("'{}': {}", key, e)))
}

fn invalid(message: String) -> EngineError {
    EngineError::InvalidShareLink { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_input() -> CalculationInput {
        CalculationInput {
            country: "gb".to_string(),
            variant: "student-loan-plan-2".to_string(),
            rate: Rate::new(Term::Hourly, "28.05".parse().unwrap()),
            schedule: WorkSchedule::new(dec("7.5"), 4, dec("22.5")),
        }
    }

    #[test]
    fn test_encode_query_layout() {
        assert_eq!(
            encode_query(&sample_input()),
            "c=gb&v=student-loan-plan-2&t=hourly&r=28.05&h=7.5&d=4&l=22.5"
        );
    }

    #[test]
    fn test_rate_without_fraction_has_no_dot() {
        let mut input = sample_input();
        input.rate = Rate::new(Term::Yearly, "60000".parse().unwrap());
        assert!(encode_query(&input).contains("&r=60000&"));
    }

    #[test]
    fn test_decode_reverses_encode() {
        let input = sample_input();
        assert_eq!(decode_query(&encode_query(&input)).unwrap(), input);
    }

    #[test]
    fn test_values_needing_escapes_survive() {
        let mut input = sample_input();
        input.country = "a&b=c d".to_string();
        let query = encode_query(&input);
        assert!(query.starts_with("c=a%26b%3Dc%20d&"));
        assert_eq!(decode_query(&query).unwrap(), input);
    }

    #[test]
    fn test_decode_full_link_and_leading_question_mark() {
        let query = encode_query(&sample_input());
        let link = share_link("https://example.com/calculate", &sample_input());
        assert_eq!(link, format!("https://example.com/calculate?{}", query));

        assert_eq!(decode_query(&link).unwrap(), sample_input());
        assert_eq!(decode_query(&format!("?{}", query)).unwrap(), sample_input());
    }

    #[test]
    fn test_share_link_appends_to_existing_query() {
        let link = share_link("https://example.com/?ref=app", &sample_input());
        assert!(link.starts_with("https://example.com/?ref=app&c=gb&"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let query = format!("utm=x&{}&z=1", encode_query(&sample_input()));
        assert_eq!(decode_query(&query).unwrap(), sample_input());
    }

    #[test]
    fn test_missing_key_rejected() {
        let query = "c=gb&v=standard&t=yearly&r=60000&h=8&d=5";
        match decode_query(query) {
            Err(EngineError::InvalidShareLink { message }) => assert!(message.contains("'l'")),
            other => panic!("Expected InvalidShareLink, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_values_rejected() {
        for query in [
            "c=gb&v=standard&t=fortnightly&r=60000&h=8&d=5&l=25",
            "c=gb&v=standard&t=yearly&r=6x&h=8&d=5&l=25",
            "c=gb&v=standard&t=yearly&r=60000&h=eight&d=5&l=25",
            "c=gb&v=standard&t=yearly&r=60000&h=8&d=300&l=25",
            "c=gb&v=standard&t=yearly&r=60000&h=8&d=5&l=",
        ] {
            assert!(
                matches!(decode_query(query), Err(EngineError::InvalidShareLink { .. })),
                "accepted {}",
                query
            );
        }
    }

    #[test]
    fn test_decode_does_not_validate_schedule() {
        let input = decode_query("c=gb&v=standard&t=yearly&r=60000&h=8&d=8&l=0").unwrap();
        assert_eq!(input.schedule.days_per_week, 8);
    }
}
