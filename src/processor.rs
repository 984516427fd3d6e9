// Statement processor - drives extraction, storage, and reconciliation
//
// Batch semantics: each document is best-effort (a document that fails
// date or field extraction is skipped with a warning), but the first
// validation mismatch is fatal to the batch. The mismatching record is
// still persisted before the batch stops, so the failure can be inspected
// in the store.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;
use crate::db::RecordStore;
use crate::error::{Result, StatementError};
use crate::institutions::{InstitutionHandler, StatementText};
use crate::reconciliation::{reconcile, ReconciliationPeriod, ReconciliationReport};

/// Outcome counts for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Documents successfully parsed into records.
    pub processed: usize,
    /// Records actually written to the store.
    pub stored: usize,
    /// Records recognized as duplicates and not written.
    pub duplicates: usize,
    /// Documents skipped for missing dates or insufficient data.
    pub skipped: usize,
}

pub struct StatementProcessor {
    handler: Box<dyn InstitutionHandler>,
    config: Config,
}

impl StatementProcessor {
    pub fn new(handler: Box<dyn InstitutionHandler>, config: Config) -> Self {
        StatementProcessor { handler, config }
    }

    pub fn institution(&self) -> &str {
        self.handler.name()
    }

    /// Process every statement text file in a folder, in chronological
    /// order, persisting records as they parse. Stops at the first
    /// validation mismatch after persisting the offending record.
    pub fn extract_from_folder(
        &self,
        folder: &Path,
        store: &mut dyn RecordStore,
    ) -> Result<BatchSummary> {
        let documents = collect_statement_files(folder)?;
        if documents.is_empty() {
            warn!("no statement text files found in {}", folder.display());
            return Ok(BatchSummary::default());
        }

        info!(
            "found {} statement(s) to process in {}",
            documents.len(),
            folder.display()
        );

        let mut summary = BatchSummary::default();

        for path in documents {
            let doc = StatementText::from_file(&path)?;
            info!("processing {}", doc.file_name);

            let parsed = match self.handler.parse(&doc) {
                Ok(parsed) => parsed,
                Err(
                    e @ (StatementError::MissingDate { .. }
                    | StatementError::InsufficientData { .. }),
                ) => {
                    warn!("skipping {}: {e}", doc.file_name);
                    summary.skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            summary.processed += 1;
            if store.insert(&parsed.record)? {
                summary.stored += 1;
            } else {
                summary.duplicates += 1;
            }

            // Fail fast at the batch level; the record above is already
            // persisted for inspection.
            if let Some(validation) = parsed.validation {
                return Err(StatementError::Validation(validation));
            }
        }

        info!(
            "extraction completed: {} processed, {} stored, {} duplicate(s), {} skipped",
            summary.processed, summary.stored, summary.duplicates, summary.skipped
        );
        Ok(summary)
    }

    /// Process a single pre-extracted document. Best-effort: a validation
    /// mismatch is logged, the record is persisted, and the mismatch is
    /// returned alongside for the caller to surface.
    pub fn process_document(
        &self,
        doc: &StatementText,
        store: &mut dyn RecordStore,
    ) -> Result<Option<crate::validator::ValidationError>> {
        let parsed = self.handler.parse(doc)?;
        if let Some(validation) = &parsed.validation {
            warn!(
                "continuing despite validation failure for {}: {validation}",
                doc.file_name
            );
        }
        store.insert(&parsed.record)?;
        Ok(parsed.validation)
    }

    /// Sum the period's stored records and cross-check gross/net totals.
    pub fn reconcile_period(
        &self,
        period: ReconciliationPeriod,
        store: &dyn RecordStore,
    ) -> Result<ReconciliationReport> {
        let records = store.query_by_period(self.handler.name(), &period)?;
        if records.is_empty() {
            warn!("no records found for period {period}");
        }
        Ok(reconcile(period, &records))
    }

    /// Export every stored record for this institution to CSV.
    pub fn export_csv(&self, output: &Path, store: &dyn RecordStore) -> Result<usize> {
        let records = store.query_all(self.handler.name())?;
        if records.is_empty() {
            warn!("no records found in store for {}", self.handler.name());
            return Ok(0);
        }
        self.handler.export_csv(&records, output)?;
        Ok(records.len())
    }

    /// Push stored records to the external ledger (no-op unless enabled).
    pub fn enter_to_ledger(&self, store: &dyn RecordStore) -> Result<usize> {
        let records = store.query_all(self.handler.name())?;
        self.handler.enter_to_ledger(&records, &self.config.ledger)?;
        Ok(records.len())
    }
}

// ============================================================================
// FOLDER SCAN
// ============================================================================

/// Statement text files in processing order. Files named
/// `YYYY-MM-DD[-type].txt` sort chronologically; anything else sorts last.
/// Year-end summaries and manual-entry placeholders are not statements.
fn collect_statement_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();

    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_lowercase();

        if name.contains("manual_entry") {
            info!("skipping manual entry file: {name}");
            continue;
        }
        if name.ends_with("-ye-summary.txt") {
            info!("skipping year-end summary file: {name}");
            continue;
        }
        files.push(path);
    }

    files.sort_by_key(|p| {
        let name = p
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        (date_sort_key(&name), name)
    });

    Ok(files)
}

/// (year, month, day) from a `YYYY-MM-DD...` file name, or a far-future
/// key for names that do not follow the convention.
fn date_sort_key(file_name: &str) -> (u32, u32, u32) {
    let parts: Vec<&str> = file_name.splitn(4, '-').collect();
    if parts.len() >= 3 {
        let year = parts[0].parse::<u32>().ok();
        let month = parts[1].parse::<u32>().ok();
        let day = parts[2]
            .trim_end_matches(".txt")
            .parse::<u32>()
            .ok();
        if let (Some(y), Some(m), Some(d)) = (year, month, day) {
            return (y, m, d);
        }
    }
    (9999, 12, 31)
}
