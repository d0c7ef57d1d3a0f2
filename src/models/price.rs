// Price parsing for raw snapshot text

use crate::models::Cost;

/// Parses scraped price text such as `"$3.49"` or `"1,299.00"` into a cost.
///
/// Whitespace, a single leading currency symbol and thousands separators are
/// accepted. Empty, non-numeric, negative and non-finite values yield `None`.
pub fn parse_price(text: &str) -> Option<Cost> {
    let trimmed = text.trim();
    let unsigned = trimmed.strip_prefix('$').unwrap_or(trimmed).trim_start();
    let cleaned: String = unsigned.chars().filter(|c| *c != ',').collect();

    if cleaned.is_empty() {
        return None;
    }

    match cleaned.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Some(price),
        _ => None,
    }
}
