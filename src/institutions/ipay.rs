// ADP iPay statement handler - the fully implemented institution

use chrono::NaiveDate;
use std::path::Path;
use tracing::{debug, error, info};

use crate::classifier::classify;
use crate::config::{IPayConfig, LedgerConfig};
use crate::error::Result;
use crate::extractor::{extract_pay_date, extract_record};
use crate::fields::{standard_rules, ExtractionRule};
use crate::institutions::{InstitutionHandler, ParsedStatement, StatementText};
use crate::netpay::resolve_net_pay;
use crate::record::{Field, PaycheckRecord};
use crate::validator::{validate, ValidationStatus};

pub const INSTITUTION_NAME: &str = "ipay";

pub struct IPayHandler {
    rules: Vec<Box<dyn ExtractionRule>>,
}

impl IPayHandler {
    pub fn new(config: &IPayConfig) -> Self {
        IPayHandler {
            rules: standard_rules(config),
        }
    }
}

impl InstitutionHandler for IPayHandler {
    fn name(&self) -> &'static str {
        INSTITUTION_NAME
    }

    fn statement_date(&self, doc: &StatementText) -> Option<NaiveDate> {
        extract_pay_date(&doc.text)
    }

    fn parse(&self, doc: &StatementText) -> Result<ParsedStatement> {
        let variant = classify(&doc.text, &doc.file_name);
        debug!("paycheck type for {}: {}", doc.file_name, variant.name());

        let mut record = extract_record(
            INSTITUTION_NAME,
            &doc.file_name,
            &doc.text,
            variant,
            &self.rules,
        )?;

        resolve_net_pay(&mut record, &doc.text);

        let validation = match validate(&record, variant) {
            Ok(ValidationStatus::Passed) => {
                info!("paycheck validation PASSED for {}", doc.file_name);
                None
            }
            Ok(ValidationStatus::Skipped) => None,
            Err(e) => {
                error!("paycheck validation FAILED for {}: {e}", doc.file_name);
                Some(e)
            }
        };

        Ok(ParsedStatement {
            record,
            variant,
            validation,
        })
    }

    fn export_csv(&self, records: &[PaycheckRecord], output: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(output)?;

        let mut header = vec!["statement_date", "source_file"];
        header.extend(Field::ALL.iter().map(|f| f.as_str()));
        writer.write_record(&header)?;

        for record in records {
            let mut row = vec![
                record.statement_date.to_string(),
                record.source_file.clone(),
            ];
            for field in Field::ALL {
                row.push(
                    record
                        .amount(field)
                        .map(|v| format!("{v:.2}"))
                        .unwrap_or_default(),
                );
            }
            writer.write_record(&row)?;
        }

        writer.flush()?;
        info!("exported {} paycheck(s) to {}", records.len(), output.display());
        Ok(())
    }

    fn enter_to_ledger(&self, records: &[PaycheckRecord], config: &LedgerConfig) -> Result<()> {
        if !config.enabled {
            info!("ledger integration is not enabled in configuration");
            return Ok(());
        }
        // Placeholder until the ledger application exposes an import API.
        info!(
            "ledger integration not yet implemented; would enter {} record(s)",
            records.len()
        );
        Ok(())
    }
}
