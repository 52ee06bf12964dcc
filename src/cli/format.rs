use chrono::NaiveDate;

use crate::domain::AggregateKind;

const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y";

pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Two decimals with thousands separators; USD values get a `$` prefix,
/// other currencies a trailing code.
pub fn money(value: f64, currency: &str) -> String {
    let grouped = group_thousands(value.abs());
    let sign = if value < 0.0 { "-" } else { "" };
    if currency.eq_ignore_ascii_case("USD") {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}{grouped} {currency}")
    }
}

fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{grouped}.{fraction}")
}

/// Counts are whole numbers; other kinds follow the column's own formatting.
pub fn aggregate_body(kind: AggregateKind, value: f64, is_money: bool, currency: &str) -> String {
    match kind {
        AggregateKind::Count => format!("{value:.0}"),
        _ if is_money => money(value, currency),
        _ => format!("{value:.2}"),
    }
}

/// Footer text for one aggregate, prefixed with the kind's label.
pub fn aggregate_value(kind: AggregateKind, value: f64, is_money: bool, currency: &str) -> String {
    format!(
        "{}: {}",
        kind.label(),
        aggregate_body(kind, value, is_money, currency)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_money_with_grouping() {
        assert_eq!(money(1_234_567.891, "USD"), "$1,234,567.89");
        assert_eq!(money(-5.0, "usd"), "-$5.00");
        assert_eq!(money(999.999, "EUR"), "1,000.00 EUR");
        assert_eq!(money(0.0, "USD"), "$0.00");
    }

    #[test]
    fn formats_aggregates_by_kind() {
        assert_eq!(aggregate_value(AggregateKind::Count, 3.0, true, "USD"), "Count: 3");
        assert_eq!(aggregate_value(AggregateKind::Average, 2.5, false, "USD"), "Avg: 2.50");
        assert_eq!(aggregate_value(AggregateKind::Sum, 1500.0, true, "USD"), "Sum: $1,500.00");
    }

    #[test]
    fn formats_dates_for_tables() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(display_date(date), "Jan 5, 2024");
    }
}
