// Field extraction rules - label/pattern registry for statement lines
//
// Each rule is a small object with the same job: match a line by label,
// collect candidate amounts, and pick the current-period value. Template
// lines carry the current-period amount first and the YTD amount second;
// a lone amount is a YTD-only figure unless the rule says otherwise.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::amount::parse_magnitude;
use crate::classifier::PaycheckVariant;
use crate::config::IPayConfig;
use crate::record::{Field, PaycheckRecord};

// ============================================================================
// AMOUNT PATTERNS
// ============================================================================

static TWO_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+ \d+").expect("two-group pattern is valid"));

static THREE_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+ \d+ \d+").expect("three-group pattern is valid"));

static GROUPED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-?\d{1,3}(?: \d{3})* \d{2}").expect("grouped pattern is valid")
});

static LOOSE_DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+[ .]\d{2}").expect("loose decimal pattern is valid"));

static STARRED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(-?\d+ \d+)\*").expect("starred pattern is valid"));

static TOLERANT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+ \d+(?: \d+)?").expect("tolerant pattern is valid"));

static BONUS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:bonus|performance)\s+(\d+ \d+ \d+)(?:\s+(\d+ \d+ \d+))?")
        .expect("bonus line pattern is valid")
});

static VACATION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"vacation[:\s-]*(\d+ \d+ \d+)(?:\s+(\d+ \d+ \d+))?")
        .expect("vacation line pattern is valid")
});

static LEADING_TWO_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+\s+\d+)").expect("leading two-group pattern is valid"));

static LEADING_THREE_GROUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+\s+\d+\s+\d+)").expect("leading three-group pattern is valid")
});

/// The numeric shapes that appear on statement lines. Which one a rule
/// scans with depends on the magnitude and formatting of that field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountPattern {
    /// `1060 42` - plain dollars-and-cents pair.
    TwoGroup,
    /// `1 060 42` - thousands group, dollars, cents.
    ThreeGroup,
    /// `-1 000 00` - optional sign, 1-3 leading digits, any number of
    /// 3-digit groups, 2-digit cents.
    Grouped,
    /// `-12 34` or `-12.34` - small deductions, space or point.
    LooseDecimal,
    /// `-314 58*` - current-period marker used by the HSA line.
    Starred,
    /// `1 234 56` or `1234 56` - net pay shows either shape.
    Tolerant,
}

impl AmountPattern {
    fn find_all<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self {
            AmountPattern::TwoGroup => TWO_GROUP.find_iter(line).map(|m| m.as_str()).collect(),
            AmountPattern::ThreeGroup => THREE_GROUP.find_iter(line).map(|m| m.as_str()).collect(),
            AmountPattern::Grouped => GROUPED.find_iter(line).map(|m| m.as_str()).collect(),
            AmountPattern::LooseDecimal => {
                LOOSE_DECIMAL.find_iter(line).map(|m| m.as_str()).collect()
            }
            AmountPattern::Starred => STARRED
                .captures_iter(line)
                .filter_map(|c| c.get(1).map(|m| m.as_str()))
                .collect(),
            AmountPattern::Tolerant => TOLERANT.find_iter(line).map(|m| m.as_str()).collect(),
        }
    }
}

/// What a single candidate amount on a matched line means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleAmount {
    /// The current period had no activity; the lone amount is YTD.
    YtdOnly,
    /// The lone amount is the current-period value (net pay lines never
    /// show YTD; the starred HSA amount is current by construction).
    Current,
}

// ============================================================================
// RULE TRAIT
// ============================================================================

/// One field's extraction behavior. Rules see every line of the document
/// and write into the partial record at most once per field.
pub trait ExtractionRule: Send + Sync {
    fn apply(
        &self,
        line: &str,
        line_no: usize,
        variant: PaycheckVariant,
        record: &mut PaycheckRecord,
    );
}

// ============================================================================
// GENERIC AMOUNT RULE
// ============================================================================

/// Label-keyed rule covering earnings, taxes, deductions, and net pay.
/// Patterns are tried in order; the first that yields a current/YTD pair
/// wins, otherwise the lone candidate falls under the single-amount policy.
pub struct AmountFieldRule {
    labels: Vec<&'static str>,
    field: Field,
    patterns: Vec<AmountPattern>,
    applies_to: Vec<PaycheckVariant>,
    single: SingleAmount,
}

impl AmountFieldRule {
    pub fn new(
        labels: &[&'static str],
        field: Field,
        patterns: &[AmountPattern],
        applies_to: &[PaycheckVariant],
        single: SingleAmount,
    ) -> Self {
        AmountFieldRule {
            labels: labels.to_vec(),
            field,
            patterns: patterns.to_vec(),
            applies_to: applies_to.to_vec(),
            single,
        }
    }

    fn candidates<'a>(&self, line: &'a str) -> Vec<&'a str> {
        let mut fallback: Vec<&'a str> = Vec::new();
        for pattern in &self.patterns {
            let found = pattern.find_all(line);
            if found.len() >= 2 {
                return found;
            }
            if fallback.is_empty() {
                fallback = found;
            }
        }
        fallback
    }
}

impl ExtractionRule for AmountFieldRule {
    fn apply(
        &self,
        line: &str,
        line_no: usize,
        variant: PaycheckVariant,
        record: &mut PaycheckRecord,
    ) {
        if !self.applies_to.contains(&variant) {
            return;
        }

        let line_lower = line.to_lowercase();
        if !self.labels.iter().any(|l| line_lower.contains(l)) {
            return;
        }

        if record.has(self.field) {
            debug!("skipping {} on line {line_no}: already extracted", self.field);
            return;
        }

        let matches = self.candidates(line);
        debug!("{} matches on line {line_no}: {matches:?}", self.field);

        if matches.len() >= 2 {
            if let Some(value) = parse_magnitude(matches[0]) {
                record.set_if_absent(self.field, value);
                debug!(
                    "extracted {} (current period) from line {line_no}: {value:.2} (YTD: {})",
                    self.field, matches[1]
                );
            }
        } else if matches.len() == 1 {
            match self.single {
                SingleAmount::Current => {
                    if let Some(value) = parse_magnitude(matches[0]) {
                        record.set_if_absent(self.field, value);
                        debug!(
                            "extracted {} (current period) from line {line_no}: {value:.2}",
                            self.field
                        );
                    }
                }
                SingleAmount::YtdOnly => {
                    debug!(
                        "{} YTD only on line {line_no}: {} - skipping",
                        self.field, matches[0]
                    );
                }
            }
        }
    }
}

// ============================================================================
// BONUS / VACATION EARNINGS LINES
// ============================================================================

/// Keyword-anchored earnings rule for bonus/performance and vacation
/// lines. The amount pair must follow the keyword directly, and a `$`
/// elsewhere on the line means the second amount belongs to another line
/// item, so the first amount is current-period either way.
pub struct EarningsLineRule {
    keywords: Vec<&'static str>,
    pattern: &'static Lazy<Regex>,
    field: Field,
    applies_to: PaycheckVariant,
}

impl EarningsLineRule {
    /// Bonus and performance earnings, extracted only on bonus paychecks.
    pub fn bonus() -> Self {
        EarningsLineRule {
            keywords: vec!["bonus", "performance"],
            pattern: &BONUS_LINE,
            field: Field::Bonus,
            applies_to: PaycheckVariant::Bonus,
        }
    }

    /// Vacation pay, extracted only on vacation paychecks and modeled as
    /// other income for downstream accounting.
    pub fn vacation() -> Self {
        EarningsLineRule {
            keywords: vec!["vacation"],
            pattern: &VACATION_LINE,
            field: Field::OtherIncome,
            applies_to: PaycheckVariant::Vacation,
        }
    }
}

impl ExtractionRule for EarningsLineRule {
    fn apply(
        &self,
        line: &str,
        line_no: usize,
        variant: PaycheckVariant,
        record: &mut PaycheckRecord,
    ) {
        if variant != self.applies_to {
            return;
        }

        let line_lower = line.to_lowercase();
        if !self.keywords.iter().any(|k| line_lower.contains(k)) {
            return;
        }

        let Some(caps) = self.pattern.captures(&line_lower) else {
            debug!("no {} amount after keyword on line {line_no}", self.field);
            return;
        };
        let Some(first) = caps.get(1) else {
            return;
        };

        let has_dollar_sign = line.contains('$');
        let ytd = caps.get(2).filter(|_| !has_dollar_sign);

        if let Some(value) = parse_magnitude(first.as_str()) {
            record.set_if_absent(self.field, value);
            match ytd {
                Some(y) => debug!(
                    "extracted {} (current period) from line {line_no}: {value:.2} (YTD: {})",
                    self.field,
                    y.as_str()
                ),
                None => debug!(
                    "extracted {} (current period) from line {line_no}: {value:.2}",
                    self.field
                ),
            }
        }
    }
}

// ============================================================================
// OTHER INCOME
// ============================================================================

/// Other-income categories (cola, contribution, award, ...) each occupy
/// their own line and sum into a single field. A lone amount is YTD unless
/// the trailing text carries a configured current-period marker; trailing
/// text that starts with a technical prefix (`g t l`, `checking`) never
/// promotes.
pub struct OtherIncomeRule {
    labels: Vec<String>,
    markers: Vec<String>,
    ignored_prefixes: Vec<String>,
}

impl OtherIncomeRule {
    pub fn new(config: &IPayConfig) -> Self {
        OtherIncomeRule {
            labels: config.other_income_labels.clone(),
            markers: config.current_period_markers.clone(),
            ignored_prefixes: config.ignored_trailing_prefixes.clone(),
        }
    }

    /// Current-period and YTD candidates anchored right after the label.
    /// The first amount is usually a plain pair; the second may carry a
    /// thousands group.
    fn amounts_after<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let first = LEADING_TWO_GROUP
            .captures(text)
            .or_else(|| LEADING_THREE_GROUP.captures(text));
        let Some(first) = first.and_then(|c| c.get(1)) else {
            return Vec::new();
        };

        let rest = text[first.end()..].trim_start();
        let second = LEADING_THREE_GROUP
            .captures(rest)
            .or_else(|| LEADING_TWO_GROUP.captures(rest))
            .and_then(|c| c.get(1));

        match second {
            Some(second) => vec![first.as_str(), second.as_str()],
            None => vec![first.as_str()],
        }
    }

    fn promotes(&self, trailing: &str) -> bool {
        if trailing.is_empty() {
            return false;
        }
        if self.ignored_prefixes.iter().any(|p| trailing.starts_with(p.as_str())) {
            return false;
        }
        self.markers.iter().any(|m| trailing.contains(m.as_str()))
    }
}

impl ExtractionRule for OtherIncomeRule {
    fn apply(
        &self,
        line: &str,
        line_no: usize,
        variant: PaycheckVariant,
        record: &mut PaycheckRecord,
    ) {
        // Bonus and vacation paychecks only show stale YTD figures on
        // these lines.
        if variant != PaycheckVariant::Regular {
            return;
        }

        let line_lower = line.to_lowercase();
        for label in &self.labels {
            let Some(pos) = line_lower.find(label.as_str()) else {
                continue;
            };
            debug!("found other income category '{label}' on line {line_no}");

            let after = line_lower[pos + label.len()..].trim_start();
            let matches = self.amounts_after(after);
            debug!("other income matches for {label}: {matches:?}");

            if matches.len() >= 2 {
                if let Some(value) = parse_magnitude(matches[0]) {
                    record.add_amount(Field::OtherIncome, value);
                    debug!(
                        "extracted other income ({label}) from line {line_no}: {value:.2} (YTD: {})",
                        matches[1]
                    );
                }
                return;
            }

            if matches.len() == 1 {
                let amount_end = after.find(matches[0]).map(|p| p + matches[0].len());
                let trailing = amount_end.map(|end| after[end..].trim()).unwrap_or("");

                if self.promotes(trailing) {
                    if let Some(value) = parse_magnitude(matches[0]) {
                        record.add_amount(Field::OtherIncome, value);
                        debug!(
                            "other income ({label}) single amount promoted on line {line_no}: {value:.2}"
                        );
                    }
                } else {
                    debug!(
                        "other income ({label}) YTD only on line {line_no}: {} - skipping",
                        matches[0]
                    );
                }
                return;
            }
        }
    }
}

// ============================================================================
// STANDARD REGISTRY
// ============================================================================

const ALL_VARIANTS: [PaycheckVariant; 3] = [
    PaycheckVariant::Regular,
    PaycheckVariant::Bonus,
    PaycheckVariant::Vacation,
];

/// The full rule set for the supported payslip template, in the order the
/// original statement lays the sections out: earnings, gross, statutory
/// taxes, deductions, net pay.
pub fn standard_rules(config: &IPayConfig) -> Vec<Box<dyn ExtractionRule>> {
    use AmountPattern::*;
    use PaycheckVariant::Regular;

    let regular_only = [Regular];

    let mut rules: Vec<Box<dyn ExtractionRule>> = vec![
        Box::new(AmountFieldRule::new(
            &["regular"],
            Field::RegularPay,
            &[TwoGroup],
            &regular_only,
            SingleAmount::YtdOnly,
        )),
        Box::new(OtherIncomeRule::new(config)),
        Box::new(EarningsLineRule::bonus()),
        Box::new(EarningsLineRule::vacation()),
        // Gross pay usually carries a thousands group; small paychecks fall
        // back to the plain pair.
        Box::new(AmountFieldRule::new(
            &["gross pay"],
            Field::GrossPay,
            &[ThreeGroup, TwoGroup],
            &ALL_VARIANTS,
            SingleAmount::YtdOnly,
        )),
    ];

    // Statutory taxes are withheld on every paycheck variant.
    let taxes: [(&[&'static str], Field); 5] = [
        (&["federal income tax"], Field::FederalIncomeTax),
        (&["social security tax"], Field::SocialSecurityTax),
        (&["medicare tax"], Field::MedicareTax),
        (
            &["oh state income tax", "nc state income tax"],
            Field::StateIncomeTax,
        ),
        (
            &["brooklyn income tax", "cleveland income tax"],
            Field::LocalIncomeTax,
        ),
    ];
    for (labels, field) in taxes {
        rules.push(Box::new(AmountFieldRule::new(
            labels,
            field,
            &[Grouped],
            &ALL_VARIANTS,
            SingleAmount::YtdOnly,
        )));
    }

    // The HSA line marks its current-period amount with a trailing
    // asterisk, so a single starred match is authoritative.
    rules.push(Box::new(AmountFieldRule::new(
        &["hsa plan"],
        Field::HsaPlan,
        &[Starred],
        &regular_only,
        SingleAmount::Current,
    )));

    let small_deductions: [(&[&'static str], Field); 8] = [
        (&["illness plan lo", "illness plan"], Field::IllnessPlan),
        (&["life ins", "life insurance"], Field::LifeInsurance),
        (&["pretax dental"], Field::PretaxDental),
        (&["pretax medical"], Field::PretaxMedical),
        (&["pretax vision"], Field::PretaxVision),
        (&["dep care"], Field::DepCare),
        (&["vol acc 40/20", "vol acc 20/10"], Field::VolAcc4020),
        (&["vol child life"], Field::VolChildLife),
    ];
    for (labels, field) in small_deductions {
        rules.push(Box::new(AmountFieldRule::new(
            labels,
            field,
            &[LooseDecimal],
            &regular_only,
            SingleAmount::YtdOnly,
        )));
    }
    rules.push(Box::new(AmountFieldRule::new(
        &["vol spousl life"],
        Field::VolSpousalLife,
        &[LooseDecimal],
        &regular_only,
        SingleAmount::YtdOnly,
    )));

    // Larger deductions use the thousands-grouped shape.
    rules.push(Box::new(AmountFieldRule::new(
        &["legal"],
        Field::Legal,
        &[Grouped],
        &regular_only,
        SingleAmount::YtdOnly,
    )));
    rules.push(Box::new(AmountFieldRule::new(
        &["401k pretax"],
        Field::K401Pretax,
        &[Grouped],
        &ALL_VARIANTS,
        SingleAmount::YtdOnly,
    )));
    rules.push(Box::new(AmountFieldRule::new(
        &["espp"],
        Field::Espp,
        &[TwoGroup],
        &[PaycheckVariant::Regular, PaycheckVariant::Bonus],
        SingleAmount::YtdOnly,
    )));
    rules.push(Box::new(AmountFieldRule::new(
        &["401k loan gp1"],
        Field::K401LoanGp1,
        &[Grouped],
        &regular_only,
        SingleAmount::YtdOnly,
    )));

    // Net pay lines never show YTD, so a lone amount is current-period.
    rules.push(Box::new(AmountFieldRule::new(
        &["net pay"],
        Field::NetPay,
        &[Tolerant],
        &ALL_VARIANTS,
        SingleAmount::Current,
    )));

    rules
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record() -> PaycheckRecord {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        PaycheckRecord::new("ipay", date, "stmt.txt")
    }

    fn apply_all(line: &str, variant: PaycheckVariant, record: &mut PaycheckRecord) {
        for rule in standard_rules(&IPayConfig::default()) {
            rule.apply(line, 0, variant, record);
        }
    }

    #[test]
    fn test_regular_pay_current_and_ytd() {
        let mut r = record();
        apply_all(
            "Regular 1060 42 1 060 42 1 060 42 Your federal taxable wages this period are",
            PaycheckVariant::Regular,
            &mut r,
        );
        assert_eq!(r.amount(Field::RegularPay), Some(1060.42));
    }

    #[test]
    fn test_regular_pay_skipped_on_bonus_paycheck() {
        let mut r = record();
        apply_all(
            "Regular 1060 42 1 060 42",
            PaycheckVariant::Bonus,
            &mut r,
        );
        assert_eq!(r.amount(Field::RegularPay), None);
    }

    #[test]
    fn test_regular_pay_single_amount_is_ytd() {
        let mut r = record();
        apply_all("Regular 12 720 00", PaycheckVariant::Regular, &mut r);
        assert_eq!(r.amount(Field::RegularPay), None);
    }

    #[test]
    fn test_gross_pay_grouped() {
        let mut r = record();
        apply_all(
            "Gross Pay 1 218 00 1 218 00",
            PaycheckVariant::Regular,
            &mut r,
        );
        assert_eq!(r.amount(Field::GrossPay), Some(1218.00));
    }

    #[test]
    fn test_gross_pay_plain_pair_fallback() {
        let mut r = record();
        apply_all(
            "Gross Pay 2000 00 2000 00",
            PaycheckVariant::Regular,
            &mut r,
        );
        assert_eq!(r.amount(Field::GrossPay), Some(2000.00));
    }

    #[test]
    fn test_tax_sign_stripped() {
        let mut r = record();
        apply_all(
            "Federal Income Tax -200 00 -200 00",
            PaycheckVariant::Regular,
            &mut r,
        );
        assert_eq!(r.amount(Field::FederalIncomeTax), Some(200.00));
    }

    #[test]
    fn test_state_tax_label_synonyms() {
        let mut r = record();
        apply_all(
            "OH State Income Tax -30 00 -30 00",
            PaycheckVariant::Regular,
            &mut r,
        );
        let mut r2 = record();
        apply_all(
            "NC State Income Tax -30 00 -30 00",
            PaycheckVariant::Regular,
            &mut r2,
        );
        assert_eq!(r.amount(Field::StateIncomeTax), Some(30.00));
        assert_eq!(r2.amount(Field::StateIncomeTax), Some(30.00));
    }

    #[test]
    fn test_taxes_extracted_on_vacation_paycheck() {
        let mut r = record();
        apply_all(
            "Medicare Tax -36 25 -72 50",
            PaycheckVariant::Vacation,
            &mut r,
        );
        assert_eq!(r.amount(Field::MedicareTax), Some(36.25));
    }

    #[test]
    fn test_hsa_starred_current_period() {
        let mut r = record();
        apply_all(
            "Hsa Plan -314 58* 1 887 48",
            PaycheckVariant::Regular,
            &mut r,
        );
        assert_eq!(r.amount(Field::HsaPlan), Some(314.58));
    }

    #[test]
    fn test_espp_pair_and_single() {
        let mut r = record();
        apply_all("Espp -467 80 1 403 40", PaycheckVariant::Regular, &mut r);
        assert_eq!(r.amount(Field::Espp), Some(467.80));

        let mut r2 = record();
        apply_all("Espp -55 42", PaycheckVariant::Regular, &mut r2);
        assert_eq!(r2.amount(Field::Espp), None);
    }

    #[test]
    fn test_bonus_deduction_scope() {
        // Bonus paychecks keep only ESPP and 401k pretax deductions.
        let mut r = record();
        apply_all("Espp -467 80 1 403 40", PaycheckVariant::Bonus, &mut r);
        apply_all(
            "401K Pretax -1 000 00 5 000 00",
            PaycheckVariant::Bonus,
            &mut r,
        );
        apply_all(
            "Pretax Dental -12 34 123 40",
            PaycheckVariant::Bonus,
            &mut r,
        );
        assert_eq!(r.amount(Field::Espp), Some(467.80));
        assert_eq!(r.amount(Field::K401Pretax), Some(1000.00));
        assert_eq!(r.amount(Field::PretaxDental), None);
    }

    #[test]
    fn test_vacation_deduction_scope() {
        let mut r = record();
        apply_all(
            "401K Pretax -500 00 5 000 00",
            PaycheckVariant::Vacation,
            &mut r,
        );
        apply_all("Espp -55 42 110 84", PaycheckVariant::Vacation, &mut r);
        assert_eq!(r.amount(Field::K401Pretax), Some(500.00));
        assert_eq!(r.amount(Field::Espp), None);
    }

    #[test]
    fn test_bonus_line_extracted_for_bonus_variant() {
        let mut r = record();
        apply_all(
            "Bonus 1 477 00 1 477 00 Your federal taxable wages this period are",
            PaycheckVariant::Bonus,
            &mut r,
        );
        assert_eq!(r.amount(Field::Bonus), Some(1477.00));
    }

    #[test]
    fn test_performance_line_is_bonus() {
        let mut r = record();
        apply_all(
            "Performance 2 000 00 2 000 00",
            PaycheckVariant::Bonus,
            &mut r,
        );
        assert_eq!(r.amount(Field::Bonus), Some(2000.00));
    }

    #[test]
    fn test_vacation_maps_to_other_income() {
        let mut r = record();
        apply_all(
            "Vacation 2 585 90 2 585 90",
            PaycheckVariant::Vacation,
            &mut r,
        );
        assert_eq!(r.amount(Field::OtherIncome), Some(2585.90));
        assert_eq!(r.amount(Field::Bonus), None);
    }

    #[test]
    fn test_other_income_accumulates_across_categories() {
        let mut r = record();
        apply_all("Cola 125 00 1 000 00", PaycheckVariant::Regular, &mut r);
        apply_all("Award 40 00 40 00", PaycheckVariant::Regular, &mut r);
        assert_eq!(r.amount(Field::OtherIncome), Some(165.00));
    }

    #[test]
    fn test_other_income_single_amount_needs_marker() {
        // Plain single amount is YTD, skipped.
        let mut r = record();
        apply_all("Cola 1 000 00", PaycheckVariant::Regular, &mut r);
        assert_eq!(r.amount(Field::OtherIncome), None);

        // A non-taxable note promotes the lone amount to current period.
        let mut r2 = record();
        apply_all(
            "Award 40 00 non-taxable award payment",
            PaycheckVariant::Regular,
            &mut r2,
        );
        assert_eq!(r2.amount(Field::OtherIncome), Some(40.00));
    }

    #[test]
    fn test_other_income_skipped_on_bonus_and_vacation() {
        let mut r = record();
        apply_all("Cola 125 00 1 000 00", PaycheckVariant::Bonus, &mut r);
        apply_all("Cola 125 00 1 000 00", PaycheckVariant::Vacation, &mut r);
        assert_eq!(r.amount(Field::OtherIncome), None);
    }

    #[test]
    fn test_net_pay_single_amount_is_current() {
        let mut r = record();
        apply_all("Net Pay 1800 00", PaycheckVariant::Regular, &mut r);
        assert_eq!(r.amount(Field::NetPay), Some(1800.00));
    }

    #[test]
    fn test_first_match_wins_per_field() {
        let mut r = record();
        apply_all(
            "Gross Pay 1 218 00 1 218 00",
            PaycheckVariant::Regular,
            &mut r,
        );
        apply_all(
            "Gross Pay 9 999 99 9 999 99",
            PaycheckVariant::Regular,
            &mut r,
        );
        assert_eq!(r.amount(Field::GrossPay), Some(1218.00));
    }
}
