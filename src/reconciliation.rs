// Reconciliation engine - cross-checks aggregate gross/net pay for a period
//
// Sums every monetary field independently across the period's records,
// recomputes gross and net from components, and compares against the
// stored gross/net totals. Produces a report; never mutates anything.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StatementError;
use crate::record::{Field, PaycheckRecord};

/// Tolerance for aggregate comparisons, in dollars.
pub const RECONCILE_TOLERANCE: f64 = 0.01;

// ============================================================================
// PERIOD
// ============================================================================

/// A reconciliation window: a full calendar year, or every month of a year
/// up to and including the given month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconciliationPeriod {
    Year(i32),
    ThroughMonth { month: u32, year: i32 },
}

impl ReconciliationPeriod {
    pub fn year(&self) -> i32 {
        match self {
            ReconciliationPeriod::Year(year) => *year,
            ReconciliationPeriod::ThroughMonth { year, .. } => *year,
        }
    }
}

impl FromStr for ReconciliationPeriod {
    type Err = StatementError;

    /// Accepts `YYYY` or `MM-YYYY` (e.g. `2024`, `06-2024`).
    fn from_str(s: &str) -> Result<Self, StatementError> {
        let invalid = || StatementError::InvalidPeriod(s.to_string());

        match s.split_once('-') {
            Some((month_str, year_str)) => {
                let month: u32 = month_str.parse().map_err(|_| invalid())?;
                let year: i32 = year_str.parse().map_err(|_| invalid())?;
                if !(1..=12).contains(&month) {
                    return Err(invalid());
                }
                Ok(ReconciliationPeriod::ThroughMonth { month, year })
            }
            None => {
                let year: i32 = s.parse().map_err(|_| invalid())?;
                Ok(ReconciliationPeriod::Year(year))
            }
        }
    }
}

impl fmt::Display for ReconciliationPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconciliationPeriod::Year(year) => write!(f, "{year}"),
            ReconciliationPeriod::ThroughMonth { month, year } => {
                write!(f, "{month:02}-{year}")
            }
        }
    }
}

// ============================================================================
// REPORT
// ============================================================================

/// Aggregate totals and cross-checks for one period. Consumed by a
/// presentation layer; carries no side effects of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub period: ReconciliationPeriod,
    pub record_count: usize,

    /// Per-field sums across all records in the period.
    pub totals: BTreeMap<Field, f64>,

    /// Regular pay + bonus + other income.
    pub calculated_gross_pay: f64,
    /// Sum of the gross pay column as extracted from the statements.
    pub stored_gross_pay: f64,
    pub gross_pay_matched: bool,
    /// Signed: calculated minus stored.
    pub gross_pay_difference: f64,

    pub total_statutory_deductions: f64,
    pub total_other_deductions: f64,

    /// Calculated gross minus statutory minus other deductions.
    pub calculated_net_pay: f64,
    pub stored_net_pay: f64,
    pub net_pay_matched: bool,
    pub net_pay_difference: f64,
}

impl ReconciliationReport {
    pub fn total(&self, field: Field) -> f64 {
        self.totals.get(&field).copied().unwrap_or(0.0)
    }

    pub fn is_balanced(&self) -> bool {
        self.gross_pay_matched && self.net_pay_matched
    }

    pub fn summary(&self) -> String {
        format!(
            "Reconciliation for {}: {} payslip(s), gross calculated ${:.2} vs stored ${:.2} ({}), net calculated ${:.2} vs stored ${:.2} ({})",
            self.period,
            self.record_count,
            self.calculated_gross_pay,
            self.stored_gross_pay,
            if self.gross_pay_matched { "matched" } else { "MISMATCH" },
            self.calculated_net_pay,
            self.stored_net_pay,
            if self.net_pay_matched { "matched" } else { "MISMATCH" },
        )
    }
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Sum a period's records and cross-check the aggregate gross/net pay.
/// Summation is per-field; absent fields count as zero.
pub fn reconcile(period: ReconciliationPeriod, records: &[PaycheckRecord]) -> ReconciliationReport {
    let mut totals: BTreeMap<Field, f64> = BTreeMap::new();
    for field in Field::ALL {
        let sum: f64 = records.iter().map(|r| r.amount_or_zero(field)).sum();
        totals.insert(field, sum);
    }

    let total = |field: Field| totals.get(&field).copied().unwrap_or(0.0);

    let calculated_gross_pay =
        total(Field::RegularPay) + total(Field::Bonus) + total(Field::OtherIncome);
    let stored_gross_pay = total(Field::GrossPay);

    let total_statutory_deductions: f64 = Field::STATUTORY.iter().map(|f| total(*f).abs()).sum();

    // Other deductions include taxable_off, which is never extracted but
    // may be present on manually entered rows.
    let total_other_deductions: f64 = Field::OTHER_DEDUCTIONS
        .iter()
        .map(|f| total(*f).abs())
        .sum::<f64>()
        + total(Field::TaxableOff).abs();

    let calculated_net_pay =
        calculated_gross_pay - total_statutory_deductions - total_other_deductions;
    let stored_net_pay = total(Field::NetPay);

    let gross_pay_difference = calculated_gross_pay - stored_gross_pay;
    let net_pay_difference = calculated_net_pay - stored_net_pay;

    ReconciliationReport {
        period,
        record_count: records.len(),
        totals,
        calculated_gross_pay,
        stored_gross_pay,
        gross_pay_matched: gross_pay_difference.abs() < RECONCILE_TOLERANCE,
        gross_pay_difference,
        total_statutory_deductions,
        total_other_deductions,
        calculated_net_pay,
        stored_net_pay,
        net_pay_matched: net_pay_difference.abs() < RECONCILE_TOLERANCE,
        net_pay_difference,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn paycheck(day: u32, regular: f64, federal: f64, net: f64) -> PaycheckRecord {
        let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let mut r = PaycheckRecord::new("ipay", date, &format!("2024-01-{day:02}-regular.txt"));
        r.set_amount(Field::RegularPay, regular);
        r.set_amount(Field::GrossPay, regular);
        r.set_amount(Field::FederalIncomeTax, federal);
        r.set_amount(Field::NetPay, net);
        r
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!(
            "2024".parse::<ReconciliationPeriod>().unwrap(),
            ReconciliationPeriod::Year(2024)
        );
        assert_eq!(
            "06-2024".parse::<ReconciliationPeriod>().unwrap(),
            ReconciliationPeriod::ThroughMonth {
                month: 6,
                year: 2024
            }
        );
        assert!("13-2024".parse::<ReconciliationPeriod>().is_err());
        assert!("banana".parse::<ReconciliationPeriod>().is_err());
    }

    #[test]
    fn test_period_display_round_trip() {
        for text in ["2024", "06-2024"] {
            let period: ReconciliationPeriod = text.parse().unwrap();
            assert_eq!(period.to_string(), text);
        }
    }

    #[test]
    fn test_balanced_period() {
        let records = vec![
            paycheck(15, 2000.00, 200.00, 1800.00),
            paycheck(31, 2000.00, 200.00, 1800.00),
        ];
        let report = reconcile(ReconciliationPeriod::Year(2024), &records);

        assert_eq!(report.record_count, 2);
        assert!((report.calculated_gross_pay - 4000.00).abs() < 1e-9);
        assert!((report.stored_gross_pay - 4000.00).abs() < 1e-9);
        assert!((report.calculated_net_pay - 3600.00).abs() < 1e-9);
        assert!(report.gross_pay_matched);
        assert!(report.net_pay_matched);
        assert!(report.is_balanced());
    }

    #[test]
    fn test_order_independence() {
        let a = paycheck(15, 2000.00, 200.00, 1800.00);
        let b = paycheck(31, 1500.00, 150.00, 1350.00);

        let forward = reconcile(ReconciliationPeriod::Year(2024), &[a.clone(), b.clone()]);
        let reversed = reconcile(ReconciliationPeriod::Year(2024), &[b, a]);

        assert_eq!(forward.totals, reversed.totals);
        assert_eq!(forward.gross_pay_matched, reversed.gross_pay_matched);
        assert_eq!(forward.net_pay_matched, reversed.net_pay_matched);
        assert_eq!(forward.calculated_net_pay, reversed.calculated_net_pay);
    }

    #[test]
    fn test_mismatch_reports_signed_difference() {
        let mut short = paycheck(15, 2000.00, 200.00, 1800.00);
        short.set_amount(Field::NetPay, 1700.00);

        let report = reconcile(ReconciliationPeriod::Year(2024), &[short]);
        assert!(!report.net_pay_matched);
        assert!((report.net_pay_difference - 100.00).abs() < 1e-9);
        assert!(report.gross_pay_matched);
        assert!(!report.is_balanced());
    }

    #[test]
    fn test_taxable_off_counts_as_other_deduction() {
        let mut r = paycheck(15, 2000.00, 200.00, 1750.00);
        r.set_amount(Field::TaxableOff, 50.00);

        let report = reconcile(ReconciliationPeriod::Year(2024), &[r]);
        assert!((report.total_other_deductions - 50.00).abs() < 1e-9);
        assert!(report.net_pay_matched);
    }
}
