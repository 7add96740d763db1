use rust_decimal::Decimal;

use super::error::{PainError, ValidationKind};
use super::types::*;

/// Validate the message header.
///
/// Applied once per document build, before any tree construction. Fails on
/// the first violation — no partial document is ever produced.
pub fn validate_group_header(header: &GroupHeaderInfo) -> Result<(), PainError> {
    if header.msg_id.trim().is_empty() {
        return Err(PainError::validation(
            ValidationKind::MissingField,
            "message id (MsgId) must not be empty",
        ));
    }
    if header.initiator.trim().is_empty() {
        return Err(PainError::validation(
            ValidationKind::MissingField,
            "initiating party name (InitgPty/Nm) must not be empty",
        ));
    }
    Ok(())
}

/// Validate one payment batch, its creditor, and every contained transaction.
pub fn validate_payment_info(info: &CollectorPaymentInfoPain) -> Result<(), PainError> {
    if info.payment_info_id.trim().is_empty() {
        return Err(PainError::validation(
            ValidationKind::MissingField,
            "payment info id (PmtInfId) must not be empty",
        ));
    }
    if info.transactions.is_empty() {
        return Err(PainError::validation(
            ValidationKind::General,
            format!(
                "payment info '{}' contains no transactions",
                info.payment_info_id
            ),
        ));
    }

    validate_creditor(&info.creditor)?;

    for tx in &info.transactions {
        validate_transaction(tx)?;
    }
    Ok(())
}

fn validate_creditor(creditor: &CreditorInfo) -> Result<(), PainError> {
    if creditor.name.trim().is_empty() {
        return Err(PainError::validation(
            ValidationKind::MissingField,
            "creditor name (Cdtr/Nm) must not be empty",
        ));
    }
    if creditor.creditor_id.trim().is_empty() {
        return Err(PainError::validation(
            ValidationKind::MissingField,
            "creditor scheme identifier (Gläubiger-ID) is required for direct debit",
        ));
    }
    validate_iban(&creditor.iban, "creditor IBAN")?;
    validate_bic(&creditor.bic, "creditor BIC")?;
    Ok(())
}

fn validate_transaction(tx: &PainTransaction) -> Result<(), PainError> {
    if tx.end_to_end_id.trim().is_empty() {
        return Err(PainError::validation(
            ValidationKind::MissingField,
            "end-to-end id (EndToEndId) must not be empty",
        ));
    }
    if tx.amount <= Decimal::ZERO {
        return Err(PainError::validation(
            ValidationKind::InvalidAmount,
            format!(
                "transaction '{}': amount must be positive, got {}",
                tx.end_to_end_id, tx.amount
            ),
        ));
    }
    // EUR has two minor units; a finer scale cannot be settled.
    if tx.amount.normalize().scale() > 2 {
        return Err(PainError::validation(
            ValidationKind::InvalidAmount,
            format!(
                "transaction '{}': amount {} exceeds 2 decimal places (EUR)",
                tx.end_to_end_id, tx.amount
            ),
        ));
    }
    if tx.dbtr_name.trim().is_empty() {
        return Err(PainError::validation(
            ValidationKind::MissingField,
            format!("transaction '{}': debtor name is required", tx.end_to_end_id),
        ));
    }
    if tx.mandate_id.trim().is_empty() {
        return Err(PainError::validation(
            ValidationKind::MissingField,
            format!(
                "transaction '{}': mandate id (MndtId) is required",
                tx.end_to_end_id
            ),
        ));
    }
    validate_iban(&tx.dbtr_iban, "debtor IBAN")?;
    validate_bic(&tx.dbtr_bic, "debtor BIC")?;
    Ok(())
}

/// Shape check only — two uppercase letters, two digits, 1 to 30
/// alphanumerics. Check-digit verification is out of scope.
fn validate_iban(iban: &str, field: &str) -> Result<(), PainError> {
    let bytes = iban.as_bytes();
    let shape_ok = bytes.len() >= 5
        && bytes.len() <= 34
        && bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2..4].iter().all(u8::is_ascii_digit)
        && bytes[4..].iter().all(u8::is_ascii_alphanumeric);
    if !shape_ok {
        return Err(PainError::validation(
            ValidationKind::InvalidFormat,
            format!("{field} '{iban}' is not a well-formed IBAN"),
        ));
    }
    Ok(())
}

/// BIC shape: 8 or 11 alphanumeric characters (BIC8 or BIC11).
fn validate_bic(bic: &str, field: &str) -> Result<(), PainError> {
    let shape_ok = (bic.len() == 8 || bic.len() == 11)
        && bic.bytes().all(|b| b.is_ascii_alphanumeric());
    if !shape_ok {
        return Err(PainError::validation(
            ValidationKind::InvalidFormat,
            format!("{field} '{bic}' is not a well-formed BIC"),
        ));
    }
    Ok(())
}
