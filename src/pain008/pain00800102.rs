//! pain.008.001.02 — CustomerDirectDebitInitiationV02.
//!
//! Model types mirror the ISO 20022 message components of this version
//! (GroupHeader39, PaymentInstructionInformation4,
//! DirectDebitTransactionInformation9). The agent BIC element is `BIC` and
//! `SvcLvl` occurs at most once.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::xml::{self, XSI_NAMESPACE};
use crate::core::{
    CollectorPaymentInfoPain, GroupHeaderInfo, PainError, PainTransaction, SequenceType,
    ValidationKind, validate_group_header, validate_payment_info,
};

pub const NAMESPACE: &str = "urn:iso:std:iso:20022:tech:xsd:pain.008.001.02";

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
    pub cstmr_drct_dbt_initn: CustomerDirectDebitInitiationV02,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDirectDebitInitiationV02 {
    #[serde(rename = "GrpHdr")]
    pub grp_hdr: GroupHeader39,
    #[serde(rename = "PmtInf", default)]
    pub pmt_inf: Vec<PaymentInstructionInformation4>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupHeader39 {
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
    pub initg_pty: PartyIdentification32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartyIdentification32 {
    #[serde(rename = "Nm", skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    pub id: Option<Party6Choice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party6Choice {
    #[serde(rename = "PrvtId")]
    pub prvt_id: PersonIdentification5,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonIdentification5 {
    #[serde(rename = "Othr", default)]
    pub othr: Vec<GenericPersonIdentification1>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericPersonIdentification1 {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "SchmeNm")]
    pub schme_nm: PersonIdentificationSchemeName1Choice,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonIdentificationSchemeName1Choice {
    #[serde(rename = "Prtry")]
    pub prtry: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInstructionInformation4 {
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
    pub pmt_tp_inf: PaymentTypeInformation20,
    #[serde(rename = "ReqdColltnDt")]
    pub reqd_colltn_dt: String,
    #[serde(rename = "Cdtr")]
    pub cdtr: PartyIdentification32,
    #[serde(rename = "CdtrAcct")]
    pub cdtr_acct: CashAccount16,
    #[serde(rename = "CdtrAgt")]
    pub cdtr_agt: BranchAndFinancialInstitutionIdentification4,
    #[serde(rename = "ChrgBr")]
    pub chrg_br: ChargeBearerType1Code,
    #[serde(rename = "CdtrSchmeId")]
    pub cdtr_schme_id: PartyIdentification32,
    #[serde(rename = "DrctDbtTxInf", default)]
    pub drct_dbt_tx_inf: Vec<DirectDebitTransactionInformation9>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentTypeInformation20 {
    #[serde(rename = "SvcLvl")]
    pub svc_lvl: ServiceLevel8Choice,
    #[serde(rename = "LclInstrm")]
    pub lcl_instrm: LocalInstrument2Choice,
    #[serde(rename = "SeqTp")]
    pub seq_tp: SequenceType2Code,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceLevel8Choice {
    #[serde(rename = "Cd")]
    pub cd: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalInstrument2Choice {
    #[serde(rename = "Cd")]
    pub cd: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceType2Code {
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
pub enum ChargeBearerType1Code {
    #[serde(rename = "SLEV")]
    Slev,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashAccount16 {
    #[serde(rename = "Id")]
    pub id: AccountIdentification4Choice,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountIdentification4Choice {
    #[serde(rename = "IBAN")]
    pub iban: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchAndFinancialInstitutionIdentification4 {
    #[serde(rename = "FinInstnId")]
    pub fin_instn_id: FinancialInstitutionIdentification7,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialInstitutionIdentification7 {
    #[serde(rename = "BIC")]
    pub bic: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectDebitTransactionInformation9 {
    #[serde(rename = "PmtId")]
    pub pmt_id: PaymentIdentification1,
    #[serde(rename = "InstdAmt")]
    pub instd_amt: ActiveOrHistoricCurrencyAndAmount,
    #[serde(rename = "DrctDbtTx")]
    pub drct_dbt_tx: DirectDebitTransaction6,
    #[serde(rename = "DbtrAgt")]
    pub dbtr_agt: BranchAndFinancialInstitutionIdentification4,
    #[serde(rename = "Dbtr")]
    pub dbtr: PartyIdentification32,
    #[serde(rename = "DbtrAcct")]
    pub dbtr_acct: CashAccount16,
    #[serde(rename = "UltmtDbtr", skip_serializing_if = "Option::is_none")]
    pub ultmt_dbtr: Option<PartyIdentification32>,
    #[serde(rename = "RmtInf", skip_serializing_if = "Option::is_none")]
    pub rmt_inf: Option<RemittanceInformation5>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIdentification1 {
    #[serde(rename = "EndToEndId")]
    pub end_to_end_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveOrHistoricCurrencyAndAmount {
    #[serde(rename = "@Ccy")]
    pub ccy: String,
    #[serde(rename = "$text")]
    pub value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectDebitTransaction6 {
    #[serde(rename = "MndtRltdInf")]
    pub mndt_rltd_inf: MandateRelatedInformation6,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MandateRelatedInformation6 {
    #[serde(rename = "MndtId")]
    pub mndt_id: String,
    #[serde(rename = "DtOfSgntr")]
    pub dt_of_sgntr: String,
    #[serde(rename = "AmdmntInd")]
    pub amdmnt_ind: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemittanceInformation5 {
    #[serde(rename = "Ustrd", default)]
    pub ustrd: Vec<String>,
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

    let grp_hdr = GroupHeader39 {
        msg_id: header.msg_id.clone(),
        cre_dt_tm: xml::format_date_time(header.creation_date_time),
        nb_of_txs: num_txs.to_string(),
        ctrl_sum: Some(ctrl_sum),
        initg_pty: PartyIdentification32 {
            nm: Some(header.initiator.clone()),
            id: None,
        },
    };

    Ok(Document {
        xmlns: NAMESPACE.into(),
        xmlns_xsi: XSI_NAMESPACE.into(),
        schema_location: super::PainDocumentType::Pain00800102.schema_location(),
        cstmr_drct_dbt_initn: CustomerDirectDebitInitiationV02 { grp_hdr, pmt_inf },
    })
}

fn create_payment_instruction(
    info: &CollectorPaymentInfoPain,
) -> Result<PaymentInstructionInformation4, PainError> {
    validate_payment_info(info)?;

    let creditor = &info.creditor;
    let transactions: Vec<DirectDebitTransactionInformation9> =
        info.transactions.iter().map(create_transaction).collect();

    let pmt_tp_inf = PaymentTypeInformation20 {
        svc_lvl: ServiceLevel8Choice { cd: "SEPA".into() },
        lcl_instrm: LocalInstrument2Choice {
            // External code list; all SEPA DD instruments of this era map 1:1.
            cd: info.local_instrument.code().into(),
        },
        seq_tp: map_sequence_type(info.sequence_type),
    };

    let cdtr_schme_id = PartyIdentification32 {
        nm: None,
        id: Some(Party6Choice {
            prvt_id: PersonIdentification5 {
                othr: vec![GenericPersonIdentification1 {
                    id: creditor.creditor_id.clone(),
                    schme_nm: PersonIdentificationSchemeName1Choice {
                        prtry: "SEPA".into(),
                    },
                }],
            },
        }),
    };

    Ok(PaymentInstructionInformation4 {
        pmt_inf_id: info.payment_info_id.clone(),
        pmt_mtd: PaymentMethod2Code::Dd,
        nb_of_txs: transactions.len().to_string(),
        ctrl_sum: Some(info.total_amount()),
        pmt_tp_inf,
        reqd_colltn_dt: xml::format_date(info.collection_date),
        cdtr: PartyIdentification32 {
            nm: Some(creditor.name.clone()),
            id: None,
        },
        cdtr_acct: CashAccount16 {
            id: AccountIdentification4Choice {
                iban: creditor.iban.clone(),
            },
        },
        cdtr_agt: BranchAndFinancialInstitutionIdentification4 {
            fin_instn_id: FinancialInstitutionIdentification7 {
                bic: creditor.bic.clone(),
            },
        },
        chrg_br: ChargeBearerType1Code::Slev,
        cdtr_schme_id,
        drct_dbt_tx_inf: transactions,
    })
}

fn create_transaction(tx: &PainTransaction) -> DirectDebitTransactionInformation9 {
    let mut amount = tx.amount;
    amount.rescale(2);

    DirectDebitTransactionInformation9 {
        pmt_id: PaymentIdentification1 {
            end_to_end_id: tx.end_to_end_id.clone(),
        },
        instd_amt: ActiveOrHistoricCurrencyAndAmount {
            ccy: "EUR".into(),
            value: amount,
        },
        drct_dbt_tx: DirectDebitTransaction6 {
            mndt_rltd_inf: MandateRelatedInformation6 {
                mndt_id: tx.mandate_id.clone(),
                dt_of_sgntr: xml::format_date(tx.date_of_signature),
                amdmnt_ind: false,
            },
        },
        dbtr_agt: BranchAndFinancialInstitutionIdentification4 {
            fin_instn_id: FinancialInstitutionIdentification7 {
                bic: tx.dbtr_bic.clone(),
            },
        },
        dbtr: PartyIdentification32 {
            nm: Some(tx.dbtr_name.clone()),
            id: None,
        },
        dbtr_acct: CashAccount16 {
            id: AccountIdentification4Choice {
                iban: tx.dbtr_iban.clone(),
            },
        },
        ultmt_dbtr: tx.ult_dbtr_name.as_ref().map(|nm| PartyIdentification32 {
            nm: Some(nm.clone()),
            id: None,
        }),
        rmt_inf: tx.remittance_info.as_ref().map(|info| RemittanceInformation5 {
            ustrd: vec![info.clone()],
        }),
    }
}

fn map_sequence_type(sequence: SequenceType) -> SequenceType2Code {
    match sequence {
        SequenceType::Frst => SequenceType2Code::Frst,
        SequenceType::Rcur => SequenceType2Code::Rcur,
        SequenceType::Fnal => SequenceType2Code::Fnal,
        SequenceType::Ooff => SequenceType2Code::Ooff,
    }
}

/// Parse a pain.008.001.02 XML string into its document tree.
pub fn from_xml(xml_text: &str) -> Result<Document, PainError> {
    xml::unmarshal_str(xml_text)
}
