// Paycheck classifier - decides which extraction rule set applies
//
// Filenames are the most reliable signal when present. Body detection
// relies on the template repeating each earnings line twice (current
// period, then YTD): on the first paycheck of its kind the two amounts are
// textually identical, which distinguishes a real bonus/vacation paycheck
// from a regular one that merely reports a stale bonus/vacation YTD total.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

static THREE_GROUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+ \d+ \d+").expect("three-group pattern is valid")
});

/// Paycheck variant, determined once per document. Drives which extraction
/// and validation rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaycheckVariant {
    Regular,
    Bonus,
    Vacation,
}

impl PaycheckVariant {
    /// Human-readable name for display and logging.
    pub fn name(&self) -> &'static str {
        match self {
            PaycheckVariant::Regular => "regular",
            PaycheckVariant::Bonus => "bonus",
            PaycheckVariant::Vacation => "vacation",
        }
    }
}

/// Classify a document from its filename and full text.
///
/// Priority order, first match wins: filename contains "bonus" → Bonus;
/// filename contains "vacation" → Vacation; body line with the keyword and
/// two identical 3-group amounts → that variant; otherwise Regular.
pub fn classify(text: &str, filename: &str) -> PaycheckVariant {
    let filename_lower = filename.to_lowercase();

    if filename_lower.contains("bonus") {
        debug!("filename contains 'bonus': {filename}");
        return PaycheckVariant::Bonus;
    }
    if filename_lower.contains("vacation") {
        debug!("filename contains 'vacation': {filename}");
        return PaycheckVariant::Vacation;
    }

    if body_signals(text, "bonus") {
        return PaycheckVariant::Bonus;
    }
    if body_signals(text, "vacation") {
        return PaycheckVariant::Vacation;
    }

    PaycheckVariant::Regular
}

/// A line mentioning the keyword is a signal only when its first two
/// 3-group amounts are identical (current period equals YTD).
fn body_signals(text: &str, keyword: &str) -> bool {
    for line in text.lines() {
        if !line.to_lowercase().contains(keyword) {
            continue;
        }
        let amounts: Vec<&str> = THREE_GROUP.find_iter(line).map(|m| m.as_str()).collect();
        if amounts.len() >= 2 && amounts[0] == amounts[1] {
            debug!("body contains {keyword} paycheck pattern: {line}");
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_bonus_any_case() {
        assert_eq!(classify("irrelevant", "2024-03-15-BONUS.txt"), PaycheckVariant::Bonus);
    }

    #[test]
    fn test_filename_vacation() {
        assert_eq!(
            classify("irrelevant", "2024-07-01-vacation.txt"),
            PaycheckVariant::Vacation
        );
    }

    #[test]
    fn test_filename_beats_body() {
        // A bonus filename wins even when the body shows a vacation line.
        let text = "Vacation 2 500 00 2 500 00";
        assert_eq!(classify(text, "stmt-bonus.txt"), PaycheckVariant::Bonus);
    }

    #[test]
    fn test_body_bonus_with_identical_amounts() {
        let text = "Bonus 1 477 00 1 477 00 Your federal taxable wages this period are";
        assert_eq!(classify(text, "stmt.txt"), PaycheckVariant::Bonus);
    }

    #[test]
    fn test_body_bonus_single_amount_is_regular() {
        // One amount means a YTD-only bonus figure on a regular paycheck.
        let text = "Bonus 1 477 00 Your federal taxable wages this period are";
        assert_eq!(classify(text, "stmt.txt"), PaycheckVariant::Regular);
    }

    #[test]
    fn test_body_bonus_differing_amounts_is_regular() {
        let text = "Bonus 1 477 00 4 431 00";
        assert_eq!(classify(text, "stmt.txt"), PaycheckVariant::Regular);
    }

    #[test]
    fn test_plain_document_is_regular() {
        let text = "Regular 1060 42 1 060 42\nGross Pay 1 060 42 1 060 42";
        assert_eq!(classify(text, "stmt.txt"), PaycheckVariant::Regular);
    }
}
