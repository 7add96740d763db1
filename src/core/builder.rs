use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::PainError;
use super::types::*;

/// Builder for a single direct debit transaction.
///
/// ```
/// use chrono::NaiveDate;
/// use lastschrift::core::*;
/// use rust_decimal_macros::dec;
///
/// let tx = TransactionBuilder::new("E2E-1", dec!(10.00))
///     .debtor("J Doe", "DE02100100100006820101", "PBNKDEFF")
///     .mandate("M1", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
///     .remittance_info("Rechnung RE-2024-001")
///     .build()
///     .unwrap();
/// ```
pub struct TransactionBuilder {
    end_to_end_id: String,
    amount: Decimal,
    debtor: Option<(String, String, String)>,
    mandate: Option<(String, NaiveDate)>,
    ult_dbtr_name: Option<String>,
    remittance_info: Option<String>,
}

impl TransactionBuilder {
    pub fn new(end_to_end_id: impl Into<String>, amount: Decimal) -> Self {
        Self {
            end_to_end_id: end_to_end_id.into(),
            amount,
            debtor: None,
            mandate: None,
            ult_dbtr_name: None,
            remittance_info: None,
        }
    }

    /// Debtor name, account IBAN, and agent BIC.
    pub fn debtor(
        mut self,
        name: impl Into<String>,
        iban: impl Into<String>,
        bic: impl Into<String>,
    ) -> Self {
        self.debtor = Some((name.into(), iban.into(), bic.into()));
        self
    }

    /// Mandate reference and date of signature.
    pub fn mandate(mut self, mandate_id: impl Into<String>, signed: NaiveDate) -> Self {
        self.mandate = Some((mandate_id.into(), signed));
        self
    }

    pub fn ultimate_debtor(mut self, name: impl Into<String>) -> Self {
        self.ult_dbtr_name = Some(name.into());
        self
    }

    pub fn remittance_info(mut self, info: impl Into<String>) -> Self {
        self.remittance_info = Some(info.into());
        self
    }

    /// Assemble the transaction. Full field validation (amount, IBAN/BIC
    /// shape) runs later, at document-build time.
    pub fn build(self) -> Result<PainTransaction, PainError> {
        let (dbtr_name, dbtr_iban, dbtr_bic) = self
            .debtor
            .ok_or_else(|| PainError::Build("debtor is required".into()))?;
        let (mandate_id, date_of_signature) = self
            .mandate
            .ok_or_else(|| PainError::Build("mandate is required".into()))?;

        Ok(PainTransaction {
            end_to_end_id: self.end_to_end_id,
            amount: self.amount,
            dbtr_name,
            dbtr_iban,
            dbtr_bic,
            mandate_id,
            date_of_signature,
            ult_dbtr_name: self.ult_dbtr_name,
            remittance_info: self.remittance_info,
        })
    }
}

/// Builder for one payment batch.
///
/// Defaults: CORE local instrument, RCUR sequence type.
pub struct PaymentInfoBuilder {
    payment_info_id: String,
    collection_date: NaiveDate,
    local_instrument: LocalInstrument,
    sequence_type: SequenceType,
    creditor: Option<CreditorInfo>,
    transactions: Vec<PainTransaction>,
}

impl PaymentInfoBuilder {
    pub fn new(payment_info_id: impl Into<String>, collection_date: NaiveDate) -> Self {
        Self {
            payment_info_id: payment_info_id.into(),
            collection_date,
            local_instrument: LocalInstrument::Core,
            sequence_type: SequenceType::Rcur,
            creditor: None,
            transactions: Vec::new(),
        }
    }

    pub fn local_instrument(mut self, instrument: LocalInstrument) -> Self {
        self.local_instrument = instrument;
        self
    }

    pub fn sequence_type(mut self, sequence: SequenceType) -> Self {
        self.sequence_type = sequence;
        self
    }

    pub fn creditor(mut self, creditor: CreditorInfo) -> Self {
        self.creditor = Some(creditor);
        self
    }

    pub fn add_transaction(mut self, tx: PainTransaction) -> Self {
        self.transactions.push(tx);
        self
    }

    pub fn build(self) -> Result<CollectorPaymentInfoPain, PainError> {
        let creditor = self
            .creditor
            .ok_or_else(|| PainError::Build("creditor is required".into()))?;

        Ok(CollectorPaymentInfoPain {
            payment_info_id: self.payment_info_id,
            collection_date: self.collection_date,
            local_instrument: self.local_instrument,
            sequence_type: self.sequence_type,
            creditor,
            transactions: self.transactions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn transaction_builder_requires_debtor_and_mandate() {
        let missing_debtor = TransactionBuilder::new("E2E-1", dec!(10.00))
            .mandate("M1", date(2024, 1, 1))
            .build();
        assert!(matches!(missing_debtor, Err(PainError::Build(_))));

        let missing_mandate = TransactionBuilder::new("E2E-1", dec!(10.00))
            .debtor("J Doe", "DE02100100100006820101", "PBNKDEFF")
            .build();
        assert!(matches!(missing_mandate, Err(PainError::Build(_))));
    }

    #[test]
    fn payment_info_builder_defaults() {
        let info = PaymentInfoBuilder::new("PMT-1", date(2025, 6, 1))
            .creditor(CreditorInfo::new(
                "ACME",
                "DE89370400440532013000",
                "COBADEFFXXX",
                "DE98ZZZ09999999999",
            ))
            .build()
            .unwrap();
        assert_eq!(info.local_instrument, LocalInstrument::Core);
        assert_eq!(info.sequence_type, SequenceType::Rcur);
        assert!(info.transactions.is_empty());
    }

    #[test]
    fn total_amount_recomputes_from_transactions() {
        let info = PaymentInfoBuilder::new("PMT-1", date(2025, 6, 1))
            .creditor(CreditorInfo::new(
                "ACME",
                "DE89370400440532013000",
                "COBADEFFXXX",
                "DE98ZZZ09999999999",
            ))
            .add_transaction(
                TransactionBuilder::new("E2E-1", dec!(10.00))
                    .debtor("J Doe", "DE02100100100006820101", "PBNKDEFF")
                    .mandate("M1", date(2024, 1, 1))
                    .build()
                    .unwrap(),
            )
            .add_transaction(
                TransactionBuilder::new("E2E-2", dec!(5.5))
                    .debtor("A Schmidt", "DE02120300000000202051", "BYLADEM1001")
                    .mandate("M2", date(2024, 2, 1))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        assert_eq!(info.num_txs(), 2);
        assert_eq!(info.total_amount(), dec!(15.50));
    }
}
