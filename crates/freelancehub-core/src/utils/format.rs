/// Format a dollar amount with thousands separators.
/// Whole amounts drop the cents: `$1,500`, otherwise `$1,234.50`.
pub fn format_money(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    if fraction == 0 {
        format!("{}${}", sign, grouped)
    } else {
        format!("{}${}.{:02}", sign, grouped, fraction)
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a backend timestamp to a more readable date
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f") {
        // The backend emits naive UTC timestamps
        dt.format("%b %d, %Y").to_string()
    } else if date.len() >= 10 {
        date.chars().take(10).collect()
    } else {
        date.to_string()
    }
}
