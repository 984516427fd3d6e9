// Statements Parser - Core Library
// Converts pay-statement text into normalized paycheck records, validates
// each paycheck's arithmetic, and reconciles period totals.

pub mod amount;
pub mod classifier;
pub mod config;
pub mod db;
pub mod error;
pub mod extractor;
pub mod fields;
pub mod institutions;
pub mod netpay;
pub mod processor;
pub mod reconciliation;
pub mod record;
pub mod validator;

// Re-export commonly used types
pub use amount::{normalize_amount, parse_amount, parse_magnitude};
pub use classifier::{classify, PaycheckVariant};
pub use config::{Config, IPayConfig, LedgerConfig};
pub use db::{RecordStore, SqliteStore};
pub use error::{Result, StatementError};
pub use extractor::{extract_pay_date, extract_record};
pub use fields::{standard_rules, AmountPattern, ExtractionRule};
pub use institutions::{
    get_handler, InstitutionHandler, IPayHandler, ParsedStatement, StatementText,
};
pub use netpay::resolve_net_pay;
pub use processor::{BatchSummary, StatementProcessor};
pub use reconciliation::{
    reconcile, ReconciliationPeriod, ReconciliationReport, RECONCILE_TOLERANCE,
};
pub use record::{DedupeKey, Field, PaycheckRecord};
pub use validator::{validate, ValidationError, ValidationStatus, NET_PAY_TOLERANCE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
