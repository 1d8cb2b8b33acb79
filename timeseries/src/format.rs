//! Number formatting for stat cards.

/// Fixed-point with a `K`/`M` suffix from one thousand/one million upward.
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return format!("{:.*}", decimals, 0.0);
    }
    if value >= 1_000_000.0 {
        format!("{:.*}M", decimals, value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.*}K", decimals, value / 1_000.0)
    } else {
        format!("{value:.decimals$}")
    }
}

/// Signed percentage with one decimal, e.g. `+12.5%` or `-3.0%`.
pub fn format_percentage(value: f64) -> String {
    if !value.is_finite() {
        return "0.0%".to_owned();
    }
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{value:.1}%")
}
