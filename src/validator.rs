// Paycheck validator - recomputes expected net pay per variant
//
// Regular:  regular pay + other income - statutory - other deductions
// Bonus:    bonus - statutory - ESPP - 401k pretax
// Vacation: other income (vacation pay) - statutory - 401k pretax
//
// Deductions are stored as positive magnitudes; the sums below take abs()
// exactly once, which is idempotent over magnitudes.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::classifier::PaycheckVariant;
use crate::record::{Field, PaycheckRecord};

/// Tolerance for net pay comparison, in dollars.
pub const NET_PAY_TOLERANCE: f64 = 0.01;

/// A paycheck whose extracted amounts do not reconcile to within a cent.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error(
    "paycheck validation failed for {source_file}: expected net pay ${expected:.2}, \
     but got ${actual:.2} (difference ${difference:.2})"
)]
pub struct ValidationError {
    pub source_file: String,
    pub expected: f64,
    pub actual: f64,
    pub difference: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Expected and resolved net pay agree within tolerance.
    Passed,
    /// The variant's gross component is zero, so there is nothing to check.
    Skipped,
}

/// Check the arithmetic consistency of a finalized record.
pub fn validate(
    record: &PaycheckRecord,
    variant: PaycheckVariant,
) -> Result<ValidationStatus, ValidationError> {
    let expected = match variant {
        PaycheckVariant::Bonus => {
            let bonus = record.amount_or_zero(Field::Bonus);
            if bonus == 0.0 {
                warn!("bonus paycheck has no bonus amount - skipping validation");
                return Ok(ValidationStatus::Skipped);
            }
            bonus
                - record.sum_statutory()
                - record.amount_or_zero(Field::Espp).abs()
                - record.amount_or_zero(Field::K401Pretax).abs()
        }
        PaycheckVariant::Vacation => {
            let vacation = record.amount_or_zero(Field::OtherIncome);
            if vacation == 0.0 {
                warn!("vacation paycheck has no vacation amount - skipping validation");
                return Ok(ValidationStatus::Skipped);
            }
            vacation - record.sum_statutory() - record.amount_or_zero(Field::K401Pretax).abs()
        }
        PaycheckVariant::Regular => {
            let gross = record.amount_or_zero(Field::RegularPay)
                + record.amount_or_zero(Field::OtherIncome);
            if gross == 0.0 {
                warn!("regular paycheck has no gross pay - skipping validation");
                return Ok(ValidationStatus::Skipped);
            }
            gross - record.sum_statutory() - record.sum_other_deductions()
        }
    };

    let actual = record.amount_or_zero(Field::NetPay);
    let difference = (expected - actual).abs();

    debug!(
        "{} paycheck validation: expected net ${expected:.2}, actual net ${actual:.2}",
        variant.name()
    );

    if difference > NET_PAY_TOLERANCE {
        return Err(ValidationError {
            source_file: record.source_file.clone(),
            expected,
            actual,
            difference,
        });
    }

    Ok(ValidationStatus::Passed)
}
