// Document scan - folds the extraction rules over a statement, line by line

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::classifier::PaycheckVariant;
use crate::error::{Result, StatementError};
use crate::fields::ExtractionRule;
use crate::record::PaycheckRecord;

static PAY_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)pay\s+date[:\s]*(\d{1,2}/\d{1,2}/\d{4})").expect("pay date pattern is valid")
});

/// Locate the pay date anywhere in the document text.
pub fn extract_pay_date(text: &str) -> Option<NaiveDate> {
    let raw = PAY_DATE.captures(text)?.get(1)?.as_str();
    match NaiveDate::parse_from_str(raw, "%m/%d/%Y") {
        Ok(date) => {
            debug!("extracted pay date: {date}");
            Some(date)
        }
        Err(_) => {
            warn!("could not parse pay date: {raw}");
            None
        }
    }
}

/// Run the rule registry over every line of a statement and build the
/// partial record.
///
/// Fails with `MissingDate` when no pay date is present (nothing can be
/// keyed without one) and with `InsufficientData` when not a single
/// monetary field was extracted beyond the mandatory keys.
pub fn extract_record(
    institution: &str,
    file_name: &str,
    text: &str,
    variant: PaycheckVariant,
    rules: &[Box<dyn ExtractionRule>],
) -> Result<PaycheckRecord> {
    let pay_date = extract_pay_date(text).ok_or_else(|| StatementError::MissingDate {
        source_file: file_name.to_string(),
    })?;

    let mut record = PaycheckRecord::new(institution, pay_date, file_name);

    for (line_no, line) in text.lines().enumerate() {
        for rule in rules {
            rule.apply(line, line_no, variant, &mut record);
        }
    }

    if record.field_count() < 1 {
        return Err(StatementError::InsufficientData {
            source_file: file_name.to_string(),
            fields_found: record.field_count(),
        });
    }

    debug!(
        "extracted {} monetary field(s) from {file_name} ({} paycheck)",
        record.field_count(),
        variant.name()
    );

    Ok(record)
}
