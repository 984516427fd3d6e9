// Net pay resolver - checking-account fallback
//
// Some statement layouts report $0.00 net pay at the top and break the
// true disbursed total out per linked bank account below. When net pay is
// absent or exactly zero, the sum of the current-period amounts on the
// "checking" lines is the net pay.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::amount::parse_magnitude;
use crate::record::{Field, PaycheckRecord};

// A checking line ending in exactly four digit groups is two plain pairs;
// anything else with three groups in a row is thousands-formatted.
static TWO_PAIR_PROBE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bchecking\d*\s+\d+\s+\d+\s+\d+\s+\d+$").expect("two-pair probe is valid")
});

static THREE_GROUP_PROBE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bchecking\d*\s+\d+\s+\d+\s+\d+").expect("three-group probe is valid")
});

static CHECKING_THREE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bchecking\d*\s+(\d+\s+\d+\s+\d+)(?:\s+(\d+\s+\d+\s+\d+))?")
        .expect("three-group checking pattern is valid")
});

static CHECKING_TWO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bchecking\d*\s+(\d+\s+\d+)(?:\s+(\d+\s+\d+))?")
        .expect("two-group checking pattern is valid")
});

/// Fill in `net_pay` from the checking-account lines when the extracted
/// value is absent or the literal zero amount. An already-set non-zero
/// net pay is left unchanged.
pub fn resolve_net_pay(record: &mut PaycheckRecord, text: &str) {
    match record.amount(Field::NetPay) {
        Some(value) if value != 0.0 => {
            debug!("net pay has value {value:.2} - using extracted value");
            return;
        }
        _ => debug!("net pay is $0 or missing, calculating from checking accounts"),
    }

    let mut total = 0.0;
    let mut accounts_found = 0usize;

    for (line_no, line) in text.lines().enumerate() {
        let line_lower = line.to_lowercase();
        if !line_lower.contains("checking") {
            continue;
        }
        debug!("found checking account line {line_no}: '{line}'");

        let pattern = if TWO_PAIR_PROBE.is_match(&line_lower) {
            &CHECKING_TWO
        } else if THREE_GROUP_PROBE.is_match(&line_lower) {
            &CHECKING_THREE
        } else {
            &CHECKING_TWO
        };

        for caps in pattern.captures_iter(&line_lower) {
            let Some(first) = caps.get(1) else {
                continue;
            };
            if caps.get(2).is_some() {
                // Current period plus YTD; keep the first.
                if let Some(amount) = parse_magnitude(first.as_str()) {
                    total += amount;
                    accounts_found += 1;
                    debug!("extracted checking amount (current period): {amount:.2}");
                }
            } else {
                // A lone amount is YTD only; the current period is $0.
                debug!(
                    "one amount found (YTD only): {} - current period amount = $0.00",
                    first.as_str()
                );
            }
        }
    }

    if total > 0.0 {
        record.set_amount(Field::NetPay, total);
        debug!("calculated net pay from {accounts_found} checking account(s): {total:.2}");
    } else {
        debug!("no valid checking account amounts found, keeping net pay as extracted");
    }
}
