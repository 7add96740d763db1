use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Message-level header of a pain.008 document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupHeaderInfo {
    /// MsgId — unique per message, assigned by the caller.
    pub msg_id: String,
    /// CreDtTm — moment the message was created.
    pub creation_date_time: NaiveDateTime,
    /// InitgPty name. Only the name is carried; the schemas allow further
    /// identification but the EPC guidelines recommend name only.
    pub initiator: String,
}

impl GroupHeaderInfo {
    pub fn new(
        msg_id: impl Into<String>,
        creation_date_time: NaiveDateTime,
        initiator: impl Into<String>,
    ) -> Self {
        Self {
            msg_id: msg_id.into(),
            creation_date_time,
            initiator: initiator.into(),
        }
    }
}

/// Creditor identity for one payment batch.
///
/// Owned by exactly one [`CollectorPaymentInfoPain`]; not shared across
/// batches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditorInfo {
    /// Legal name (Cdtr/Nm).
    pub name: String,
    /// Creditor account IBAN.
    pub iban: String,
    /// Creditor agent BIC.
    pub bic: String,
    /// SEPA creditor scheme identifier (Gläubiger-ID, e.g. "DE98ZZZ09999999999").
    pub creditor_id: String,
}

impl CreditorInfo {
    pub fn new(
        name: impl Into<String>,
        iban: impl Into<String>,
        bic: impl Into<String>,
        creditor_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            iban: iban.into(),
            bic: bic.into(),
            creditor_id: creditor_id.into(),
        }
    }
}

/// One direct debit transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PainTransaction {
    /// EndToEndId — passed unaltered through the whole clearing chain.
    pub end_to_end_id: String,
    /// Instructed amount in EUR. Must be positive with at most 2 decimal
    /// places; enforced at document-build time.
    pub amount: Decimal,
    /// Debtor name.
    pub dbtr_name: String,
    /// Debtor account IBAN.
    pub dbtr_iban: String,
    /// Debtor agent BIC.
    pub dbtr_bic: String,
    /// Mandate reference (MndtId).
    pub mandate_id: String,
    /// Date the mandate was signed (DtOfSgntr) — calendar date, no time.
    pub date_of_signature: NaiveDate,
    /// Ultimate debtor name, if different from the account holder.
    pub ult_dbtr_name: Option<String>,
    /// Unstructured remittance information (Verwendungszweck).
    pub remittance_info: Option<String>,
}

/// One payment batch — maps to one `PmtInf` payment instruction node.
///
/// Aggregates over the batch are never stored: [`total_amount`] and
/// [`num_txs`] recompute from the transaction list on every call, so a
/// stale caller-supplied total cannot leak into the output.
///
/// [`total_amount`]: CollectorPaymentInfoPain::total_amount
/// [`num_txs`]: CollectorPaymentInfoPain::num_txs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorPaymentInfoPain {
    /// PmtInfId — batch identifier.
    pub payment_info_id: String,
    /// ReqdColltnDt — requested collection date.
    pub collection_date: NaiveDate,
    /// SEPA scheme variant (CORE, COR1, B2B).
    pub local_instrument: LocalInstrument,
    /// Position within the mandate lifecycle (FRST, RCUR, FNAL, OOFF).
    pub sequence_type: SequenceType,
    /// Creditor of this batch.
    pub creditor: CreditorInfo,
    /// Transactions in submission order. Order is preserved into the XML.
    pub transactions: Vec<PainTransaction>,
}

impl CollectorPaymentInfoPain {
    /// Sum of all transaction amounts, rescaled to EUR minor units.
    pub fn total_amount(&self) -> Decimal {
        let mut sum: Decimal = self.transactions.iter().map(|t| t.amount).sum();
        sum.rescale(2);
        sum
    }

    /// Number of transactions in the batch.
    pub fn num_txs(&self) -> usize {
        self.transactions.len()
    }
}

/// ISO 20022 external local instrument codes used by SEPA direct debit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocalInstrument {
    /// CORE — core scheme (consumer debtors).
    Core,
    /// COR1 — core scheme with shortened presentation period. Withdrawn
    /// from the rulebook in 2016; only the older schema versions accept it.
    Cor1,
    /// B2B — business-to-business scheme.
    B2b,
}

impl LocalInstrument {
    /// External code list value (LclInstrm/Cd).
    pub fn code(&self) -> &'static str {
        match self {
            Self::Core => "CORE",
            Self::Cor1 => "COR1",
            Self::B2b => "B2B",
        }
    }

    /// Parse from the external code list value.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "CORE" => Some(Self::Core),
            "COR1" => Some(Self::Cor1),
            "B2B" => Some(Self::B2b),
            _ => None,
        }
    }
}

/// SEPA sequence type — position of a collection within its mandate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceType {
    /// FRST — first collection of a recurring mandate.
    Frst,
    /// RCUR — recurring collection.
    Rcur,
    /// FNAL — final collection of a recurring mandate.
    Fnal,
    /// OOFF — one-off collection.
    Ooff,
}

impl SequenceType {
    /// Schema enumeration value (SeqTp).
    pub fn code(&self) -> &'static str {
        match self {
            Self::Frst => "FRST",
            Self::Rcur => "RCUR",
            Self::Fnal => "FNAL",
            Self::Ooff => "OOFF",
        }
    }

    /// Parse from the schema enumeration value.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "FRST" => Some(Self::Frst),
            "RCUR" => Some(Self::Rcur),
            "FNAL" => Some(Self::Fnal),
            "OOFF" => Some(Self::Ooff),
            _ => None,
        }
    }
}
