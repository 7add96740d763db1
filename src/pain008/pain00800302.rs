//! pain.008.003.02 — the German Deutsche Kreditwirtschaft restriction of
//! CustomerDirectDebitInitiationV02.
//!
//! Type names carry the SDD/SEPA suffixes of the DK schema. Structurally the
//! narrowest of the three versions: the creditor scheme `Othr` and the
//! remittance `Ustrd` occur at most once instead of repeating, and the
//! amount type is restricted to EUR.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::xml::{self, XSI_NAMESPACE};
use crate::core::{
    CollectorPaymentInfoPain, GroupHeaderInfo, PainError, PainTransaction, SequenceType,
    ValidationKind, validate_group_header, validate_payment_info,
};

pub const NAMESPACE: &str = "urn:iso:std:iso:20022:tech:xsd:pain.008.003.02";

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "Document")]
pub struct Document {
    #[serde(rename = "@xmlns", default)]
    pub xmlns: String,
    #[serde(rename = "@xmlns:xsi", default)]
    pub xmlns_xsi: String,
    #[serde(rename = "@xsi:schemaLocation", default)]
    pub schema_location: String,
    #[serde(rename = "CstmrDrctDbtInitn")]
    pub cstmr_drct_dbt_initn: CustomerDirectDebitInitiationSDD,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDirectDebitInitiationSDD {
    #[serde(rename = "GrpHdr")]
    pub grp_hdr: GroupHeaderSDD,
    #[serde(rename = "PmtInf", default)]
    pub pmt_inf: Vec<PaymentInstructionInformationSDD>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupHeaderSDD {
    #[serde(rename = "MsgId")]
    pub msg_id: String,
    #[serde(rename = "CreDtTm")]
    pub cre_dt_tm: String,
    #[serde(rename = "NbOfTxs")]
    pub nb_of_txs: String,
    #[serde(
        rename = "CtrlSum",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::xml::decimal_from_text"
    )]
    pub ctrl_sum: Option<Decimal>,
    #[serde(rename = "InitgPty")]
    pub initg_pty: PartyIdentificationSEPA1,
}

/// Initiating party — name only in the DK restriction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartyIdentificationSEPA1 {
    #[serde(rename = "Nm", skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
}

/// Debtor-side party.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartyIdentificationSEPA2 {
    #[serde(rename = "Nm", skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
}

/// Creditor scheme identification carrier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyIdentificationSEPA3 {
    #[serde(rename = "Id")]
    pub id: PartySEPAChoice,
}

/// Creditor party — name required by the DK schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyIdentificationSEPA5 {
    #[serde(rename = "Nm")]
    pub nm: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartySEPAChoice {
    #[serde(rename = "PrvtId")]
    pub prvt_id: PersonIdentificationSEPA2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonIdentificationSEPA2 {
    #[serde(rename = "Othr")]
    pub othr: RestrictedPersonIdentificationSEPA,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestrictedPersonIdentificationSEPA {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "SchmeNm")]
    pub schme_nm: RestrictedPersonIdentificationSchemeNameSEPA,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestrictedPersonIdentificationSchemeNameSEPA {
    #[serde(rename = "Prtry")]
    pub prtry: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInstructionInformationSDD {
    #[serde(rename = "PmtInfId")]
    pub pmt_inf_id: String,
    #[serde(rename = "PmtMtd")]
    pub pmt_mtd: PaymentMethod2Code,
    #[serde(rename = "NbOfTxs")]
    pub nb_of_txs: String,
    #[serde(
        rename = "CtrlSum",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::xml::decimal_from_text"
    )]
    pub ctrl_sum: Option<Decimal>,
    #[serde(rename = "PmtTpInf")]
    pub pmt_tp_inf: PaymentTypeInformationSDD,
    #[serde(rename = "ReqdColltnDt")]
    pub reqd_colltn_dt: String,
    #[serde(rename = "Cdtr")]
    pub cdtr: PartyIdentificationSEPA5,
    #[serde(rename = "CdtrAcct")]
    pub cdtr_acct: CashAccountSEPA1,
    #[serde(rename = "CdtrAgt")]
    pub cdtr_agt: BranchAndFinancialInstitutionIdentificationSEPA3,
    #[serde(rename = "ChrgBr")]
    pub chrg_br: ChargeBearerTypeSEPACode,
    #[serde(rename = "CdtrSchmeId")]
    pub cdtr_schme_id: PartyIdentificationSEPA3,
    #[serde(rename = "DrctDbtTxInf", default)]
    pub drct_dbt_tx_inf: Vec<DirectDebitTransactionInformationSDD>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentTypeInformationSDD {
    #[serde(rename = "SvcLvl")]
    pub svc_lvl: ServiceLevelSEPA,
    #[serde(rename = "LclInstrm")]
    pub lcl_instrm: LocalInstrumentSEPA,
    #[serde(rename = "SeqTp")]
    pub seq_tp: SequenceType1Code,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceLevelSEPA {
    #[serde(rename = "Cd")]
    pub cd: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalInstrumentSEPA {
    #[serde(rename = "Cd")]
    pub cd: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceType1Code {
    #[serde(rename = "FRST")]
    Frst,
    #[serde(rename = "RCUR")]
    Rcur,
    #[serde(rename = "FNAL")]
    Fnal,
    #[serde(rename = "OOFF")]
    Ooff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod2Code {
    #[serde(rename = "DD")]
    Dd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeBearerTypeSEPACode {
    #[serde(rename = "SLEV")]
    Slev,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashAccountSEPA1 {
    #[serde(rename = "Id")]
    pub id: AccountIdentificationSEPA,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashAccountSEPA2 {
    #[serde(rename = "Id")]
    pub id: AccountIdentificationSEPA,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountIdentificationSEPA {
    #[serde(rename = "IBAN")]
    pub iban: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchAndFinancialInstitutionIdentificationSEPA3 {
    #[serde(rename = "FinInstnId")]
    pub fin_instn_id: FinancialInstitutionIdentificationSEPA3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialInstitutionIdentificationSEPA3 {
    #[serde(rename = "BIC")]
    pub bic: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectDebitTransactionInformationSDD {
    #[serde(rename = "PmtId")]
    pub pmt_id: PaymentIdentificationSEPA,
    #[serde(rename = "InstdAmt")]
    pub instd_amt: ActiveOrHistoricCurrencyAndAmountSEPA,
    #[serde(rename = "DrctDbtTx")]
    pub drct_dbt_tx: DirectDebitTransactionSDD,
    #[serde(rename = "DbtrAgt")]
    pub dbtr_agt: BranchAndFinancialInstitutionIdentificationSEPA3,
    #[serde(rename = "Dbtr")]
    pub dbtr: PartyIdentificationSEPA2,
    #[serde(rename = "DbtrAcct")]
    pub dbtr_acct: CashAccountSEPA2,
    #[serde(rename = "UltmtDbtr", skip_serializing_if = "Option::is_none")]
    pub ultmt_dbtr: Option<PartyIdentificationSEPA2>,
    #[serde(rename = "RmtInf", skip_serializing_if = "Option::is_none")]
    pub rmt_inf: Option<RemittanceInformationSEPA1Choice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIdentificationSEPA {
    #[serde(rename = "EndToEndId")]
    pub end_to_end_id: String,
}

/// Amount restricted to EUR in the DK schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveOrHistoricCurrencyAndAmountSEPA {
    #[serde(rename = "@Ccy")]
    pub ccy: String,
    #[serde(rename = "$text")]
    pub value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectDebitTransactionSDD {
    #[serde(rename = "MndtRltdInf")]
    pub mndt_rltd_inf: MandateRelatedInformationSDD,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MandateRelatedInformationSDD {
    #[serde(rename = "MndtId")]
    pub mndt_id: String,
    #[serde(rename = "DtOfSgntr")]
    pub dt_of_sgntr: String,
    #[serde(rename = "AmdmntInd")]
    pub amdmnt_ind: bool,
}

/// Single unstructured line — the DK schema does not repeat Ustrd.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemittanceInformationSEPA1Choice {
    #[serde(rename = "Ustrd", skip_serializing_if = "Option::is_none")]
    pub ustrd: Option<String>,
}

// ---------------------------------------------------------------------------
// Document builder
// ---------------------------------------------------------------------------

/// Build the version-specific document tree from the domain inputs.
pub fn create_document(
    header: &GroupHeaderInfo,
    payment_infos: &[CollectorPaymentInfoPain],
) -> Result<Document, PainError> {
    validate_group_header(header)?;

    let mut pmt_inf = Vec::with_capacity(payment_infos.len());
    for info in payment_infos {
        pmt_inf.push(create_payment_instruction(info)?);
    }

    let num_txs: usize = payment_infos.iter().map(CollectorPaymentInfoPain::num_txs).sum();
    if num_txs == 0 {
        return Err(PainError::validation(
            ValidationKind::General,
            "document contains no transactions",
        ));
    }
    let mut ctrl_sum: Decimal = payment_infos
        .iter()
        .map(CollectorPaymentInfoPain::total_amount)
        .sum();
    ctrl_sum.rescale(2);

    let grp_hdr = GroupHeaderSDD {
        msg_id: header.msg_id.clone(),
        cre_dt_tm: xml::format_date_time(header.creation_date_time),
        nb_of_txs: num_txs.to_string(),
        ctrl_sum: Some(ctrl_sum),
        initg_pty: PartyIdentificationSEPA1 {
            nm: Some(header.initiator.clone()),
        },
    };

    Ok(Document {
        xmlns: NAMESPACE.into(),
        xmlns_xsi: XSI_NAMESPACE.into(),
        schema_location: super::PainDocumentType::Pain00800302.schema_location(),
        cstmr_drct_dbt_initn: CustomerDirectDebitInitiationSDD { grp_hdr, pmt_inf },
    })
}

fn create_payment_instruction(
    info: &CollectorPaymentInfoPain,
) -> Result<PaymentInstructionInformationSDD, PainError> {
    validate_payment_info(info)?;

    let creditor = &info.creditor;
    let transactions: Vec<DirectDebitTransactionInformationSDD> =
        info.transactions.iter().map(create_transaction).collect();

    let pmt_tp_inf = PaymentTypeInformationSDD {
        svc_lvl: ServiceLevelSEPA { cd: "SEPA".into() },
        lcl_instrm: LocalInstrumentSEPA {
            // DK schema accepts CORE, COR1 and B2B.
            cd: info.local_instrument.code().into(),
        },
        seq_tp: map_sequence_type(info.sequence_type),
    };

    let cdtr_schme_id = PartyIdentificationSEPA3 {
        id: PartySEPAChoice {
            prvt_id: PersonIdentificationSEPA2 {
                othr: RestrictedPersonIdentificationSEPA {
                    id: creditor.creditor_id.clone(),
                    schme_nm: RestrictedPersonIdentificationSchemeNameSEPA {
                        prtry: "SEPA".into(),
                    },
                },
            },
        },
    };

    Ok(PaymentInstructionInformationSDD {
        pmt_inf_id: info.payment_info_id.clone(),
        pmt_mtd: PaymentMethod2Code::Dd,
        nb_of_txs: transactions.len().to_string(),
        ctrl_sum: Some(info.total_amount()),
        pmt_tp_inf,
        reqd_colltn_dt: xml::format_date(info.collection_date),
        cdtr: PartyIdentificationSEPA5 {
            nm: creditor.name.clone(),
        },
        cdtr_acct: CashAccountSEPA1 {
            id: AccountIdentificationSEPA {
                iban: creditor.iban.clone(),
            },
        },
        cdtr_agt: BranchAndFinancialInstitutionIdentificationSEPA3 {
            fin_instn_id: FinancialInstitutionIdentificationSEPA3 {
                bic: creditor.bic.clone(),
            },
        },
        chrg_br: ChargeBearerTypeSEPACode::Slev,
        cdtr_schme_id,
        drct_dbt_tx_inf: transactions,
    })
}

fn create_transaction(tx: &PainTransaction) -> DirectDebitTransactionInformationSDD {
    let mut amount = tx.amount;
    amount.rescale(2);

    DirectDebitTransactionInformationSDD {
        pmt_id: PaymentIdentificationSEPA {
            end_to_end_id: tx.end_to_end_id.clone(),
        },
        instd_amt: ActiveOrHistoricCurrencyAndAmountSEPA {
            ccy: "EUR".into(),
            value: amount,
        },
        drct_dbt_tx: DirectDebitTransactionSDD {
            mndt_rltd_inf: MandateRelatedInformationSDD {
                mndt_id: tx.mandate_id.clone(),
                dt_of_sgntr: xml::format_date(tx.date_of_signature),
                amdmnt_ind: false,
            },
        },
        dbtr_agt: BranchAndFinancialInstitutionIdentificationSEPA3 {
            fin_instn_id: FinancialInstitutionIdentificationSEPA3 {
                bic: tx.dbtr_bic.clone(),
            },
        },
        dbtr: PartyIdentificationSEPA2 {
            nm: Some(tx.dbtr_name.clone()),
        },
        dbtr_acct: CashAccountSEPA2 {
            id: AccountIdentificationSEPA {
                iban: tx.dbtr_iban.clone(),
            },
        },
        ultmt_dbtr: tx
            .ult_dbtr_name
            .as_ref()
            .map(|nm| PartyIdentificationSEPA2 {
                nm: Some(nm.clone()),
            }),
        rmt_inf: tx
            .remittance_info
            .as_ref()
            .map(|info| RemittanceInformationSEPA1Choice {
                ustrd: Some(info.clone()),
            }),
    }
}

fn map_sequence_type(sequence: SequenceType) -> SequenceType1Code {
    match sequence {
        SequenceType::Frst => SequenceType1Code::Frst,
        SequenceType::Rcur => SequenceType1Code::Rcur,
        SequenceType::Fnal => SequenceType1Code::Fnal,
        SequenceType::Ooff => SequenceType1Code::Ooff,
    }
}

/// Parse a pain.008.003.02 XML string into its document tree.
pub fn from_xml(xml_text: &str) -> Result<Document, PainError> {
    xml::unmarshal_str(xml_text)
}
