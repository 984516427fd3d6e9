// Paycheck record - the normalized output of statement extraction
//
// Identity vs deduplication: `id` is a stable UUID assigned at creation and
// never changes; the idempotency hash exists only to detect re-inserts of
// the same paycheck.

use chrono::NaiveDate;
use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// MONETARY FIELDS
// ============================================================================

/// The fixed set of monetary fields a paycheck record can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    RegularPay,
    Bonus,
    OtherIncome,
    GrossPay,
    FederalIncomeTax,
    SocialSecurityTax,
    MedicareTax,
    StateIncomeTax,
    LocalIncomeTax,
    HsaPlan,
    IllnessPlan,
    Legal,
    LifeInsurance,
    PretaxDental,
    PretaxMedical,
    PretaxVision,
    DepCare,
    VolAcc4020,
    VolChildLife,
    VolSpousalLife,
    K401Pretax,
    Espp,
    K401LoanGp1,
    TaxableOff,
    NetPay,
}

impl Field {
    /// Every monetary field, in the column order used by the store and the
    /// CSV export.
    pub const ALL: [Field; 25] = [
        Field::RegularPay,
        Field::Bonus,
        Field::OtherIncome,
        Field::GrossPay,
        Field::FederalIncomeTax,
        Field::SocialSecurityTax,
        Field::MedicareTax,
        Field::StateIncomeTax,
        Field::LocalIncomeTax,
        Field::HsaPlan,
        Field::IllnessPlan,
        Field::Legal,
        Field::LifeInsurance,
        Field::PretaxDental,
        Field::PretaxMedical,
        Field::PretaxVision,
        Field::DepCare,
        Field::VolAcc4020,
        Field::VolChildLife,
        Field::VolSpousalLife,
        Field::K401Pretax,
        Field::Espp,
        Field::K401LoanGp1,
        Field::TaxableOff,
        Field::NetPay,
    ];

    /// Mandated tax withholdings.
    pub const STATUTORY: [Field; 5] = [
        Field::FederalIncomeTax,
        Field::SocialSecurityTax,
        Field::MedicareTax,
        Field::StateIncomeTax,
        Field::LocalIncomeTax,
    ];

    /// Voluntary/benefit withholdings checked by the paycheck validator.
    pub const OTHER_DEDUCTIONS: [Field; 14] = [
        Field::HsaPlan,
        Field::IllnessPlan,
        Field::Legal,
        Field::LifeInsurance,
        Field::PretaxDental,
        Field::PretaxMedical,
        Field::PretaxVision,
        Field::DepCare,
        Field::VolAcc4020,
        Field::VolChildLife,
        Field::VolSpousalLife,
        Field::K401Pretax,
        Field::Espp,
        Field::K401LoanGp1,
    ];

    /// Column name in the store and export layers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::RegularPay => "regular_pay",
            Field::Bonus => "bonus",
            Field::OtherIncome => "other_income",
            Field::GrossPay => "gross_pay",
            Field::FederalIncomeTax => "federal_income_tax",
            Field::SocialSecurityTax => "social_security_tax",
            Field::MedicareTax => "medicare_tax",
            Field::StateIncomeTax => "state_income_tax",
            Field::LocalIncomeTax => "local_income_tax",
            Field::HsaPlan => "hsa_plan",
            Field::IllnessPlan => "illness_plan",
            Field::Legal => "legal",
            Field::LifeInsurance => "life_insurance",
            Field::PretaxDental => "pretax_dental",
            Field::PretaxMedical => "pretax_medical",
            Field::PretaxVision => "pretax_vision",
            Field::DepCare => "dep_care",
            Field::VolAcc4020 => "vol_acc_40_20",
            Field::VolChildLife => "vol_child_life",
            Field::VolSpousalLife => "vol_spousal_life",
            Field::K401Pretax => "k401_pretax",
            Field::Espp => "espp",
            Field::K401LoanGp1 => "k401_loan_gp1",
            Field::TaxableOff => "taxable_off",
            Field::NetPay => "net_pay",
        }
    }

    pub fn from_str(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Field, D::Error> {
        struct FieldVisitor;

        impl Visitor<'_> for FieldVisitor {
            type Value = Field;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a monetary field name")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Field, E> {
                Field::from_str(value)
                    .ok_or_else(|| E::custom(format!("unknown monetary field: {value}")))
            }
        }

        deserializer.deserialize_str(FieldVisitor)
    }
}

// ============================================================================
// PAYCHECK RECORD
// ============================================================================

/// One parsed pay statement.
///
/// `institution`, `statement_date`, and `source_file` are always present;
/// monetary fields are set only when the statement showed current-period
/// activity for them. Deductions hold positive magnitudes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaycheckRecord {
    pub id: String,
    pub institution: String,
    pub statement_date: NaiveDate,
    pub source_file: String,
    amounts: BTreeMap<Field, f64>,
}

impl PaycheckRecord {
    pub fn new(institution: &str, statement_date: NaiveDate, source_file: &str) -> Self {
        PaycheckRecord {
            id: uuid::Uuid::new_v4().to_string(),
            institution: institution.to_string(),
            statement_date,
            source_file: source_file.to_string(),
            amounts: BTreeMap::new(),
        }
    }

    /// Rebuild a record from stored columns, keeping its original id.
    pub fn from_stored(
        id: String,
        institution: String,
        statement_date: NaiveDate,
        source_file: String,
        amounts: BTreeMap<Field, f64>,
    ) -> Self {
        PaycheckRecord {
            id,
            institution,
            statement_date,
            source_file,
            amounts,
        }
    }

    pub fn amount(&self, field: Field) -> Option<f64> {
        self.amounts.get(&field).copied()
    }

    /// Amount with absent treated as zero, the way the validation and
    /// reconciliation sums read the record.
    pub fn amount_or_zero(&self, field: Field) -> f64 {
        self.amount(field).unwrap_or(0.0)
    }

    pub fn has(&self, field: Field) -> bool {
        self.amounts.contains_key(&field)
    }

    pub fn set_amount(&mut self, field: Field, value: f64) {
        self.amounts.insert(field, value);
    }

    /// First match wins: returns false (and leaves the record untouched)
    /// when the field was already extracted from an earlier line.
    pub fn set_if_absent(&mut self, field: Field, value: f64) -> bool {
        if self.amounts.contains_key(&field) {
            return false;
        }
        self.amounts.insert(field, value);
        true
    }

    /// Accumulating write, used by other-income categories which sum into
    /// a single field across lines.
    pub fn add_amount(&mut self, field: Field, value: f64) {
        *self.amounts.entry(field).or_insert(0.0) += value;
    }

    /// Number of monetary fields extracted beyond the mandatory keys.
    pub fn field_count(&self) -> usize {
        self.amounts.len()
    }

    pub fn sum_statutory(&self) -> f64 {
        Field::STATUTORY
            .iter()
            .map(|f| self.amount_or_zero(*f).abs())
            .sum()
    }

    pub fn sum_other_deductions(&self) -> f64 {
        Field::OTHER_DEDUCTIONS
            .iter()
            .map(|f| self.amount_or_zero(*f).abs())
            .sum()
    }

    /// Hash over the dedupe tuple (institution, date, key amounts).
    /// Two runs over the same statement produce the same hash even when the
    /// file was renamed in between.
    pub fn idempotency_hash(&self) -> String {
        fn cell(v: Option<f64>) -> String {
            v.map(|a| format!("{a:.2}")).unwrap_or_default()
        }

        let mut hasher = Sha256::new();
        hasher.update(format!(
            "{}|{}|{}|{}|{}|{}",
            self.institution,
            self.statement_date,
            cell(self.amount(Field::RegularPay)),
            cell(self.amount(Field::Bonus)),
            cell(self.amount(Field::GrossPay)),
            cell(self.amount(Field::NetPay)),
        ));
        format!("{:x}", hasher.finalize())
    }

    pub fn dedupe_key(&self) -> DedupeKey {
        DedupeKey {
            source_file: self.source_file.clone(),
            regular_pay: self.amount(Field::RegularPay),
            bonus: self.amount(Field::Bonus),
            gross_pay: self.amount(Field::GrossPay),
            net_pay: self.amount(Field::NetPay),
        }
    }
}

// ============================================================================
// DEDUPE KEY
// ============================================================================

/// What "the same paycheck" means to the store: the same source file, or
/// the same key amounts under a different file name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DedupeKey {
    pub source_file: String,
    pub regular_pay: Option<f64>,
    pub bonus: Option<f64>,
    pub gross_pay: Option<f64>,
    pub net_pay: Option<f64>,
}

impl DedupeKey {
    pub fn matches(&self, record: &PaycheckRecord) -> bool {
        if self.source_file == record.source_file {
            return true;
        }
        self.regular_pay == record.amount(Field::RegularPay)
            && self.bonus == record.amount(Field::Bonus)
            && self.gross_pay == record.amount(Field::GrossPay)
            && self.net_pay == record.amount(Field::NetPay)
    }
}

// ============================================================================
// TESTS
// ============================================================================
