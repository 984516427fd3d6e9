// Record store - SQLite persistence behind a narrow interface
//
// The core only ever needs three operations: look up prior dedupe keys for
// an institution+date, insert-if-not-duplicate, and read a period back in
// date order. Everything else lives outside the store boundary.

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::Result;
use crate::reconciliation::ReconciliationPeriod;
use crate::record::{DedupeKey, Field, PaycheckRecord};

/// Narrow persistence interface consumed by the processor.
pub trait RecordStore {
    /// Dedupe keys of records already stored for this institution+date.
    fn find_existing(&self, institution: &str, date: NaiveDate) -> Result<Vec<DedupeKey>>;

    /// Insert unless a duplicate exists. Returns true when a row was
    /// written, false when the record was recognized as a duplicate.
    fn insert(&mut self, record: &PaycheckRecord) -> Result<bool>;

    /// Records for a period, ordered by statement date ascending.
    fn query_by_period(
        &self,
        institution: &str,
        period: &ReconciliationPeriod,
    ) -> Result<Vec<PaycheckRecord>>;

    /// Every record for an institution, ordered by statement date
    /// ascending. Used by the export surface.
    fn query_all(&self, institution: &str) -> Result<Vec<PaycheckRecord>>;
}

// ============================================================================
// SQLITE IMPLEMENTATION
// ============================================================================

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = SqliteStore { conn };
        store.setup()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = SqliteStore { conn };
        store.setup()?;
        Ok(store)
    }

    fn setup(&self) -> Result<()> {
        // WAL mode for crash recovery.
        self.conn.pragma_update(None, "journal_mode", "WAL")?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS paychecks (
                id TEXT PRIMARY KEY,
                idempotency_hash TEXT UNIQUE NOT NULL,
                institution TEXT NOT NULL,
                statement_date TEXT NOT NULL,
                source_file TEXT NOT NULL,
                regular_pay REAL,
                bonus REAL,
                other_income REAL,
                gross_pay REAL,
                federal_income_tax REAL,
                social_security_tax REAL,
                medicare_tax REAL,
                state_income_tax REAL,
                local_income_tax REAL,
                hsa_plan REAL,
                illness_plan REAL,
                legal REAL,
                life_insurance REAL,
                pretax_dental REAL,
                pretax_medical REAL,
                pretax_vision REAL,
                dep_care REAL,
                vol_acc_40_20 REAL,
                vol_child_life REAL,
                vol_spousal_life REAL,
                k401_pretax REAL,
                espp REAL,
                k401_loan_gp1 REAL,
                taxable_off REAL,
                net_pay REAL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_institution_date
             ON paychecks(institution, statement_date)",
            [],
        )?;

        Ok(())
    }

    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM paychecks", [], |row| row.get(0))?;
        Ok(count)
    }

    fn query(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<PaycheckRecord>> {
        let mut stmt = self.conn.prepare(sql)?;

        let records = stmt
            .query_map(params, |row| {
                let id: String = row.get(0)?;
                let institution: String = row.get(1)?;
                let date_str: String = row.get(2)?;
                let source_file: String = row.get(3)?;

                let statement_date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                    .map_err(|_| rusqlite::Error::InvalidQuery)?;

                let mut amounts = BTreeMap::new();
                for (i, field) in Field::ALL.iter().enumerate() {
                    let value: Option<f64> = row.get(4 + i)?;
                    if let Some(value) = value {
                        amounts.insert(*field, value);
                    }
                }

                Ok(PaycheckRecord::from_stored(
                    id,
                    institution,
                    statement_date,
                    source_file,
                    amounts,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }
}

const RECORD_COLUMNS: &str = "id, institution, statement_date, source_file, \
     regular_pay, bonus, other_income, gross_pay, federal_income_tax, \
     social_security_tax, medicare_tax, state_income_tax, local_income_tax, \
     hsa_plan, illness_plan, legal, life_insurance, pretax_dental, \
     pretax_medical, pretax_vision, dep_care, vol_acc_40_20, vol_child_life, \
     vol_spousal_life, k401_pretax, espp, k401_loan_gp1, taxable_off, net_pay";

impl RecordStore for SqliteStore {
    fn find_existing(&self, institution: &str, date: NaiveDate) -> Result<Vec<DedupeKey>> {
        let mut stmt = self.conn.prepare(
            "SELECT source_file, regular_pay, bonus, gross_pay, net_pay
             FROM paychecks
             WHERE institution = ?1 AND statement_date = ?2",
        )?;

        let keys = stmt
            .query_map(params![institution, date.to_string()], |row| {
                Ok(DedupeKey {
                    source_file: row.get(0)?,
                    regular_pay: row.get(1)?,
                    bonus: row.get(2)?,
                    gross_pay: row.get(3)?,
                    net_pay: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(keys)
    }

    fn insert(&mut self, record: &PaycheckRecord) -> Result<bool> {
        for existing in self.find_existing(&record.institution, record.statement_date)? {
            if existing.source_file == record.source_file {
                warn!(
                    "paycheck from {} already stored for {} on {}",
                    record.source_file, record.institution, record.statement_date
                );
                return Ok(false);
            }
            if existing.matches(record) {
                warn!(
                    "duplicate paycheck amounts for {} on {} (already stored from {})",
                    record.institution, record.statement_date, existing.source_file
                );
                return Ok(false);
            }
        }

        let result = self.conn.execute(
            &format!(
                "INSERT INTO paychecks ({RECORD_COLUMNS}, idempotency_hash)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                         ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28,
                         ?29, ?30)"
            ),
            params![
                record.id,
                record.institution,
                record.statement_date.to_string(),
                record.source_file,
                record.amount(Field::RegularPay),
                record.amount(Field::Bonus),
                record.amount(Field::OtherIncome),
                record.amount(Field::GrossPay),
                record.amount(Field::FederalIncomeTax),
                record.amount(Field::SocialSecurityTax),
                record.amount(Field::MedicareTax),
                record.amount(Field::StateIncomeTax),
                record.amount(Field::LocalIncomeTax),
                record.amount(Field::HsaPlan),
                record.amount(Field::IllnessPlan),
                record.amount(Field::Legal),
                record.amount(Field::LifeInsurance),
                record.amount(Field::PretaxDental),
                record.amount(Field::PretaxMedical),
                record.amount(Field::PretaxVision),
                record.amount(Field::DepCare),
                record.amount(Field::VolAcc4020),
                record.amount(Field::VolChildLife),
                record.amount(Field::VolSpousalLife),
                record.amount(Field::K401Pretax),
                record.amount(Field::Espp),
                record.amount(Field::K401LoanGp1),
                record.amount(Field::TaxableOff),
                record.amount(Field::NetPay),
                record.idempotency_hash(),
            ],
        );

        match result {
            Ok(_) => {
                debug!(
                    "stored paycheck {} for {} on {}",
                    record.source_file, record.institution, record.statement_date
                );
                Ok(true)
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                warn!(
                    "duplicate paycheck rejected by idempotency hash: {}",
                    record.source_file
                );
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn query_by_period(
        &self,
        institution: &str,
        period: &ReconciliationPeriod,
    ) -> Result<Vec<PaycheckRecord>> {
        match period {
            ReconciliationPeriod::Year(year) => self.query(
                &format!(
                    "SELECT {RECORD_COLUMNS} FROM paychecks
                     WHERE institution = ?1 AND strftime('%Y', statement_date) = ?2
                     ORDER BY statement_date ASC"
                ),
                &[&institution, &year.to_string()],
            ),
            ReconciliationPeriod::ThroughMonth { month, year } => self.query(
                &format!(
                    "SELECT {RECORD_COLUMNS} FROM paychecks
                     WHERE institution = ?1
                       AND strftime('%Y', statement_date) = ?2
                       AND strftime('%m', statement_date) <= ?3
                     ORDER BY statement_date ASC"
                ),
                &[&institution, &year.to_string(), &format!("{month:02}")],
            ),
        }
    }

    fn query_all(&self, institution: &str) -> Result<Vec<PaycheckRecord>> {
        self.query(
            &format!(
                "SELECT {RECORD_COLUMNS} FROM paychecks
                 WHERE institution = ?1
                 ORDER BY statement_date ASC"
            ),
            &[&institution],
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn paycheck(date: &str, source_file: &str, net: f64) -> PaycheckRecord {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        let mut r = PaycheckRecord::new("ipay", date, source_file);
        r.set_amount(Field::RegularPay, 2000.00);
        r.set_amount(Field::GrossPay, 2000.00);
        r.set_amount(Field::NetPay, net);
        r
    }

    #[test]
    fn test_insert_and_query_round_trip() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let record = paycheck("2024-01-15", "2024-01-15-regular.txt", 1800.00);

        assert!(store.insert(&record).unwrap());

        let period = ReconciliationPeriod::Year(2024);
        let stored = store.query_by_period("ipay", &period).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, record.id);
        assert_eq!(stored[0].statement_date, record.statement_date);
        assert_eq!(stored[0].amount(Field::RegularPay), Some(2000.00));
        assert_eq!(stored[0].amount(Field::Bonus), None);
    }

    #[test]
    fn test_same_source_file_is_duplicate() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let record = paycheck("2024-01-15", "2024-01-15-regular.txt", 1800.00);

        assert!(store.insert(&record).unwrap());
        assert!(!store.insert(&record).unwrap());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_same_amounts_different_file_is_duplicate() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let first = paycheck("2024-01-15", "first.txt", 1800.00);
        let second = paycheck("2024-01-15", "second.txt", 1800.00);

        assert!(store.insert(&first).unwrap());
        assert!(!store.insert(&second).unwrap());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_different_amounts_same_date_both_stored() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let first = paycheck("2024-01-15", "first.txt", 1800.00);
        let second = paycheck("2024-01-15", "second.txt", 1700.00);

        assert!(store.insert(&first).unwrap());
        assert!(store.insert(&second).unwrap());
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_through_month_period_window() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .insert(&paycheck("2024-01-15", "jan.txt", 1800.00))
            .unwrap();
        store
            .insert(&paycheck("2024-06-15", "jun.txt", 1700.00))
            .unwrap();
        store
            .insert(&paycheck("2024-09-15", "sep.txt", 1600.00))
            .unwrap();
        store
            .insert(&paycheck("2023-06-15", "prior-year.txt", 1500.00))
            .unwrap();

        let period = ReconciliationPeriod::ThroughMonth {
            month: 6,
            year: 2024,
        };
        let stored = store.query_by_period("ipay", &period).unwrap();
        let files: Vec<&str> = stored.iter().map(|r| r.source_file.as_str()).collect();
        assert_eq!(files, vec!["jan.txt", "jun.txt"]);
    }

    #[test]
    fn test_query_all_in_date_order() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .insert(&paycheck("2024-06-15", "jun.txt", 1700.00))
            .unwrap();
        store
            .insert(&paycheck("2024-01-15", "jan.txt", 1800.00))
            .unwrap();

        let stored = store.query_all("ipay").unwrap();
        let files: Vec<&str> = stored.iter().map(|r| r.source_file.as_str()).collect();
        assert_eq!(files, vec!["jan.txt", "jun.txt"]);
    }
}
