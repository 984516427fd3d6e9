// Amount tokenizer - normalizes the numeric formats found in statement text
//
// The text layer renders "1,218.00" as "1 218 00": grouping and the decimal
// point both collapse to single spaces. The last group is always the cents.

use tracing::warn;

/// Convert a space-grouped digit run to a canonical decimal string.
///
/// `"1 218 00"` → `"1218.00"`, `"5 00"` → `"5.00"`. Amounts that already
/// carry a decimal point pass through with grouping separators removed
/// (`"1,218.00"` → `"1218.00"`). Never fails: input with no digit groups
/// to rebuild comes back as-is and the caller treats an unparseable result
/// as a missed extraction.
pub fn normalize_amount(raw: &str) -> String {
    let trimmed = raw.trim();
    let parts: Vec<&str> = trimmed.split_whitespace().collect();

    if parts.len() >= 2 && parts.iter().all(|p| p.bytes().all(|b| b.is_ascii_digit())) {
        if let Some((cents, dollars)) = parts.split_last() {
            return format!("{}.{}", dollars.concat(), cents);
        }
    }

    trimmed.replace([',', ' '], "")
}

/// Parse an amount string to f64, tolerating currency symbols, comma
/// grouping, and both `-` and `(...)` negative notations.
///
/// Returns `None` when the string is not numeric; the field is simply
/// omitted from the record.
pub fn parse_amount(amount_str: &str) -> Option<f64> {
    let cleaned = amount_str.trim().replace(['$', ','], "");
    if cleaned.is_empty() {
        return None;
    }

    let (negative, digits) = if cleaned.starts_with('(') && cleaned.ends_with(')') {
        (true, &cleaned[1..cleaned.len() - 1])
    } else if let Some(rest) = cleaned.strip_prefix('-') {
        (true, rest)
    } else {
        (false, cleaned.as_str())
    };

    match digits.parse::<f64>() {
        Ok(value) => Some(if negative { -value } else { value }),
        Err(_) => {
            warn!("could not parse amount: {amount_str}");
            None
        }
    }
}

/// Normalize a matched substring and parse it in one step, stripping any
/// leading minus first. Deductions are stored as positive magnitudes.
pub fn parse_magnitude(raw: &str) -> Option<f64> {
    let unsigned = raw.trim().trim_start_matches('-');
    parse_amount(&normalize_amount(unsigned)).map(f64::abs)
}
