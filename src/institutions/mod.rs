// Institution handlers - one implementation per statement format
//
// The handler is the seam between the generic processing pipeline and an
// institution's specific extraction logic. Adding an institution means
// implementing this trait; nothing in the pipeline changes.

pub mod ipay;

pub use ipay::IPayHandler;

use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::classifier::PaycheckVariant;
use crate::config::{InstitutionsConfig, LedgerConfig};
use crate::error::{Result, StatementError};
use crate::record::PaycheckRecord;
use crate::validator::ValidationError;

/// One pre-extracted statement: the text layer of a single document plus
/// the name of the file it came from. The core never touches PDFs.
#[derive(Debug, Clone)]
pub struct StatementText {
    pub file_name: String,
    pub text: String,
}

impl StatementText {
    pub fn new(file_name: &str, text: &str) -> Self {
        StatementText {
            file_name: file_name.to_string(),
            text: text.to_string(),
        }
    }

    /// Read a statement text file from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.txt")
            .to_string();
        let text = fs::read_to_string(path)?;
        Ok(StatementText { file_name, text })
    }
}

/// Output of parsing one statement. The record is complete and final; a
/// validation mismatch rides along instead of destroying it, because the
/// caller decides whether a mismatch is fatal (batch) or a warning
/// (single document).
#[derive(Debug, Clone)]
pub struct ParsedStatement {
    pub record: PaycheckRecord,
    pub variant: PaycheckVariant,
    pub validation: Option<ValidationError>,
}

/// A financial institution's statement processing surface.
pub trait InstitutionHandler: Send + Sync {
    /// Institution identifier used as the record key and store filter.
    fn name(&self) -> &'static str;

    /// Statement date only, without full extraction.
    fn statement_date(&self, doc: &StatementText) -> Option<NaiveDate>;

    /// Classify, extract, resolve net pay, and validate one document.
    fn parse(&self, doc: &StatementText) -> Result<ParsedStatement>;

    /// Write stored records to a CSV file.
    fn export_csv(&self, records: &[PaycheckRecord], output: &Path) -> Result<()>;

    /// Push records into the external ledger application.
    fn enter_to_ledger(&self, records: &[PaycheckRecord], config: &LedgerConfig) -> Result<()>;
}

/// Look up the handler for an institution by name.
pub fn get_handler(
    name: &str,
    config: &InstitutionsConfig,
) -> Result<Box<dyn InstitutionHandler>> {
    match name {
        "ipay" => Ok(Box::new(IPayHandler::new(&config.ipay))),
        other => Err(StatementError::UnknownInstitution(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_known_institution() {
        let handler = get_handler("ipay", &InstitutionsConfig::default()).unwrap();
        assert_eq!(handler.name(), "ipay");
    }

    #[test]
    fn test_factory_unknown_institution() {
        // `unwrap_err` can't be used here because `Box<dyn InstitutionHandler>`
        // is not `Debug`; extract the error via a match instead.
        let err = match get_handler("robinhood", &InstitutionsConfig::default()) {
            Err(e) => e,
            Ok(_) => panic!("expected an error for an unknown institution"),
        };
        assert!(matches!(err, StatementError::UnknownInstitution(_)));
    }
}
