//! Display formatting for template values.

use chrono::{DateTime, NaiveDate, Utc};

/// Placeholder for values that are missing from a record.
pub const NOT_AVAILABLE: &str = "N/A";

/// Format a date as `Mon D, YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Format a timestamp's UTC date as `Mon D, YYYY`.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    format_date(ts.date_naive())
}

/// Format an optional date, falling back to `N/A`.
pub fn format_opt_date(date: Option<NaiveDate>) -> String {
    date.map(format_date)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Format an amount as US dollars: `$1,234.56`, `-$5.00`.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{sign}${}.{:02}", group_thousands(cents / 100), cents % 100)
}

/// Format an optional amount, falling back to `N/A`.
pub fn format_opt_currency(amount: Option<f64>) -> String {
    amount
        .map(format_currency)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Format a quantity without a trailing `.0` for whole numbers.
pub fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{}", quantity as i64)
    } else {
        format!("{quantity:.2}")
    }
}

/// Whole days between `due` and `today`, floored at zero.
pub fn days_overdue(due: NaiveDate, today: NaiveDate) -> i64 {
    (today - due).num_days().max(0)
}

/// Turn a snake_case key into a title: `task_overdue` → `Task Overdue`.
pub fn humanize(key: &str) -> String {
    key.split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Return the trimmed value, or `N/A` when empty or missing.
pub fn or_na(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

/// Return the trimmed value, or an empty string when missing.
pub fn or_empty(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

fn group_thousands(mut value: u64) -> String {
    let mut groups = Vec::new();
    loop {
        if value < 1000 {
            groups.push(value.to_string());
            break;
        }
        groups.push(format!("{:03}", value % 1000));
        value /= 1000;
    }
    groups.reverse();
    groups.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.56), "$1,234.56");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_currency(-5.0), "-$5.00");
        assert_eq!(format_opt_currency(None), "N/A");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(format_date(date), "Mar 7, 2026");
        assert_eq!(format_opt_date(None), "N/A");
    }

    #[test]
    fn test_days_overdue_floors_at_zero() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let due = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(days_overdue(due, today), 3);
        assert_eq!(days_overdue(today, due), 0);
    }

    #[test]
    fn test_humanize_and_quantity() {
        assert_eq!(humanize("repair_quote_ready"), "Repair Quote Ready");
        assert_eq!(format_quantity(3.0), "3");
        assert_eq!(format_quantity(2.5), "2.50");
    }
}
