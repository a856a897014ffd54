/// Format a count with thousands separators: 12345 -> "12,345"
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a day count as "X years Y days", "N days" or "1 day"
pub fn format_days(days: u64) -> String {
    let years = days / 365;
    let rest = days % 365;
    let day_word = if rest == 1 { "day" } else { "days" };
    match years {
        0 => format!("{} {}", rest, day_word),
        1 => format!("1 year {} {}", rest, day_word),
        _ => format!("{} years {} {}", years, rest, day_word),
    }
}

/// Create a simple ASCII progress bar
pub fn progress_bar(filled: u64, total: u64, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}
