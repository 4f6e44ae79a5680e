//! Plain-text share summaries.

use crate::config::{AppConfig, CountryConfig};
use crate::models::{CalculationResult, Rate, Term};

/// Builds the text shared alongside a link.
///
/// The summary shows the declared rate, its yearly gross when the rate is not
/// already yearly, each yearly deduction in rule order, and the yearly net.
/// Amounts carry the country's currency prefix and suffix.
///
/// ```text
/// https://example.com/calculate?c=gb&...
/// 🇬🇧 United Kingdom
/// Salary: £20/hour = £37600
/// - Income Tax: £5006.00
/// Real salary: £32594.00
/// For more info download ITCH
/// ```
pub fn share_message(
    app: &AppConfig,
    country: &CountryConfig,
    rate: &Rate,
    result: &CalculationResult,
    link: Option<&str>,
) -> String {
    let mut lines = Vec::new();

    if let Some(link) = link.filter(|link| !link.is_empty()) {
        lines.push(link.to_string());
    }
    lines.push(format!("{} {}", country.flag, country.name));

    let yearly = result.period(Term::Yearly);

    let mut salary = format!(
        "Salary: {}/{}",
        country.currency(&rate.amount),
        rate.term.unit()
    );
    if rate.term != Term::Yearly {
        if let Some(yearly) = yearly {
            salary.push_str(&format!(" = {}", country.currency(yearly.gross.int)));
        }
    }
    lines.push(salary);

    if let Some(yearly) = yearly {
        for line in &yearly.taxes {
            lines.push(format!("- {}: {}", line.label, country.currency(&line.amount)));
        }
        lines.push(format!("Real salary: {}", country.currency(&yearly.net)));
    }

    lines.push(format!("For more info download {}", app.name));
    lines.join("\n")
}
