// End-to-end pipeline tests: statement text through extraction,
// validation, storage, and reconciliation.

use std::fs;

use statements_parser::reconciliation::ReconciliationPeriod;
use statements_parser::record::Field;
use statements_parser::{
    get_handler, Config, PaycheckVariant, RecordStore, SqliteStore, StatementError,
    StatementProcessor, StatementText,
};

fn processor() -> StatementProcessor {
    let config = Config::default();
    let handler = get_handler("ipay", &config.institutions).expect("ipay handler exists");
    StatementProcessor::new(handler, config)
}

const REGULAR_JAN: &str = "Pay Date: 01/15/2024\n\
    Regular 2000 00 2000 00\n\
    Gross Pay 2000 00 2000 00\n\
    Federal Income Tax -200 00 -200 00\n\
    Net Pay 1800 00\n";

const REGULAR_FEB: &str = "Pay Date: 02/15/2024\n\
    Regular 2000 00 4000 00\n\
    Gross Pay 2000 00 4000 00\n\
    Federal Income Tax -200 00 -400 00\n\
    Net Pay 1800 00\n";

// Net pay disagrees with the components by $100.
const MISMATCH_MAR: &str = "Pay Date: 03/15/2024\n\
    Regular 2000 00 6000 00\n\
    Gross Pay 2000 00 6000 00\n\
    Federal Income Tax -200 00 -600 00\n\
    Net Pay 1700 00\n";

#[test]
fn end_to_end_single_statement() {
    let processor = processor();
    let mut store = SqliteStore::open_in_memory().unwrap();

    let doc = StatementText::new("stmt.pdf", REGULAR_JAN);
    let validation = processor.process_document(&doc, &mut store).unwrap();
    assert!(validation.is_none());

    let records = store.query_all("ipay").unwrap();
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.statement_date.to_string(), "2024-01-15");
    assert_eq!(record.amount(Field::RegularPay), Some(2000.00));
    assert_eq!(record.amount(Field::GrossPay), Some(2000.00));
    assert_eq!(record.amount(Field::FederalIncomeTax), Some(200.00));
    assert_eq!(record.amount(Field::NetPay), Some(1800.00));
}

#[test]
fn duplicate_documents_stored_once() {
    let processor = processor();
    let mut store = SqliteStore::open_in_memory().unwrap();

    let doc = StatementText::new("stmt.pdf", REGULAR_JAN);
    processor.process_document(&doc, &mut store).unwrap();
    processor.process_document(&doc, &mut store).unwrap();

    // Same amounts under a different name are the same paycheck too.
    let renamed = StatementText::new("stmt-copy.pdf", REGULAR_JAN);
    processor.process_document(&renamed, &mut store).unwrap();

    assert_eq!(store.query_all("ipay").unwrap().len(), 1);
}

#[test]
fn batch_stops_at_first_validation_failure_after_persisting() {
    let processor = processor();
    let mut store = SqliteStore::open_in_memory().unwrap();

    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("2024-01-15-regular.txt"), REGULAR_JAN).unwrap();
    fs::write(dir.path().join("2024-03-15-regular.txt"), MISMATCH_MAR).unwrap();
    // Later than the mismatch; must never be processed.
    fs::write(dir.path().join("2024-04-15-regular.txt"), REGULAR_FEB).unwrap();
    // Skipped inputs that are not statements.
    fs::write(dir.path().join("2024-12-31-ye-summary.txt"), "totals only").unwrap();
    fs::write(dir.path().join("manual_entry-2024.txt"), "hand-typed").unwrap();

    let err = processor
        .extract_from_folder(dir.path(), &mut store)
        .unwrap_err();

    match err {
        StatementError::Validation(validation) => {
            assert_eq!(validation.source_file, "2024-03-15-regular.txt");
            assert!((validation.difference - 100.00).abs() < 1e-9);
        }
        other => panic!("expected validation error, got: {other}"),
    }

    // January parsed clean and March was persisted before the stop;
    // April was never reached.
    let stored: Vec<String> = store
        .query_all("ipay")
        .unwrap()
        .iter()
        .map(|r| r.source_file.clone())
        .collect();
    assert_eq!(
        stored,
        vec!["2024-01-15-regular.txt", "2024-03-15-regular.txt"]
    );
}

#[test]
fn reconcile_period_over_stored_records() {
    let processor = processor();
    let mut store = SqliteStore::open_in_memory().unwrap();

    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("2024-01-15-regular.txt"), REGULAR_JAN).unwrap();
    fs::write(dir.path().join("2024-02-15-regular.txt"), REGULAR_FEB).unwrap();

    let summary = processor.extract_from_folder(dir.path(), &mut store).unwrap();
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.stored, 2);

    let report = processor
        .reconcile_period(ReconciliationPeriod::Year(2024), &store)
        .unwrap();
    assert_eq!(report.record_count, 2);
    assert!((report.calculated_gross_pay - 4000.00).abs() < 1e-9);
    assert!((report.calculated_net_pay - 3600.00).abs() < 1e-9);
    assert!(report.is_balanced());

    // A window ending in January sees only the first paycheck.
    let january = processor
        .reconcile_period(
            ReconciliationPeriod::ThroughMonth {
                month: 1,
                year: 2024,
            },
            &store,
        )
        .unwrap();
    assert_eq!(january.record_count, 1);
    assert!((january.calculated_gross_pay - 2000.00).abs() < 1e-9);
}

#[test]
fn bonus_statement_classified_and_validated() {
    let processor = processor();
    let mut store = SqliteStore::open_in_memory().unwrap();

    let text = "Pay Date: 03/29/2024\n\
        Bonus 1 477 00 1 477 00 Your federal taxable wages this period are\n\
        Regular 2000 00 24000 00\n\
        Gross Pay 1 477 00 25 477 00\n\
        Federal Income Tax -300 00 -3 900 00\n\
        Espp -100 00 1 200 00\n\
        401K Pretax -77 00 924 00\n\
        Net Pay 1000 00\n";

    let doc = StatementText::new("stmt.pdf", text);
    let config = Config::default();
    let handler = get_handler("ipay", &config.institutions).unwrap();
    let parsed = handler.parse(&doc).unwrap();

    assert_eq!(parsed.variant, PaycheckVariant::Bonus);
    assert_eq!(parsed.record.amount(Field::Bonus), Some(1477.00));
    // The regular line is stale YTD data on a bonus paycheck.
    assert_eq!(parsed.record.amount(Field::RegularPay), None);
    assert!(parsed.validation.is_none());

    let validation = processor.process_document(&doc, &mut store).unwrap();
    assert!(validation.is_none());
    assert_eq!(store.query_all("ipay").unwrap().len(), 1);
}
