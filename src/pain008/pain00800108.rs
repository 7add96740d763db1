//! pain.008.001.08 — CustomerDirectDebitInitiationV08.
//!
//! Model types mirror the ISO 20022 message components of this version
//! (GroupHeader83, PaymentInstruction29, DirectDebitTransactionInformation23).
//! Notable differences from the older versions: the agent BIC element is
//! `BICFI`, `SvcLvl` is repeatable, and COR1 is no longer an accepted local
//! instrument.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::xml::{self, XSI_NAMESPACE};
use crate::core::{
    CollectorPaymentInfoPain, GroupHeaderInfo, LocalInstrument, PainError, PainTransaction,
    SequenceType, ValidationKind, validate_group_header, validate_payment_info,
};

pub const NAMESPACE: &str = "urn:iso:std:iso:20022:tech:xsd:pain.008.001.08";

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
    pub cstmr_drct_dbt_initn: CustomerDirectDebitInitiationV08,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDirectDebitInitiationV08 {
    #[serde(rename = "GrpHdr")]
    pub grp_hdr: GroupHeader83,
    #[serde(rename = "PmtInf", default)]
    pub pmt_inf: Vec<PaymentInstruction29>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupHeader83 {
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
    pub initg_pty: PartyIdentification135,
}

/// Party with either a name, an identification, or both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartyIdentification135 {
    #[serde(rename = "Nm", skip_serializing_if = "Option::is_none")]
    pub nm: Option<String>,
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    pub id: Option<Party38Choice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party38Choice {
    #[serde(rename = "PrvtId")]
    pub prvt_id: PersonIdentification13,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonIdentification13 {
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
pub struct PaymentInstruction29 {
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
    pub pmt_tp_inf: PaymentTypeInformation29,
    #[serde(rename = "ReqdColltnDt")]
    pub reqd_colltn_dt: String,
    #[serde(rename = "Cdtr")]
    pub cdtr: PartyIdentification135,
    #[serde(rename = "CdtrAcct")]
    pub cdtr_acct: CashAccount38,
    #[serde(rename = "CdtrAgt")]
    pub cdtr_agt: BranchAndFinancialInstitutionIdentification6,
    #[serde(rename = "ChrgBr")]
    pub chrg_br: ChargeBearerType1Code,
    #[serde(rename = "CdtrSchmeId")]
    pub cdtr_schme_id: PartyIdentification135,
    #[serde(rename = "DrctDbtTxInf", default)]
    pub drct_dbt_tx_inf: Vec<DirectDebitTransactionInformation23>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentTypeInformation29 {
    #[serde(rename = "SvcLvl", default)]
    pub svc_lvl: Vec<ServiceLevel8Choice>,
    #[serde(rename = "LclInstrm")]
    pub lcl_instrm: LocalInstrument2Choice,
    #[serde(rename = "SeqTp")]
    pub seq_tp: SequenceType3Code,
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
pub enum SequenceType3Code {
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
pub struct CashAccount38 {
    #[serde(rename = "Id")]
    pub id: AccountIdentification4Choice,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountIdentification4Choice {
    #[serde(rename = "IBAN")]
    pub iban: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchAndFinancialInstitutionIdentification6 {
    #[serde(rename = "FinInstnId")]
    pub fin_instn_id: FinancialInstitutionIdentification18,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialInstitutionIdentification18 {
    #[serde(rename = "BICFI")]
    pub bicfi: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectDebitTransactionInformation23 {
    #[serde(rename = "PmtId")]
    pub pmt_id: PaymentIdentification6,
    #[serde(rename = "InstdAmt")]
    pub instd_amt: ActiveOrHistoricCurrencyAndAmount,
    #[serde(rename = "DrctDbtTx")]
    pub drct_dbt_tx: DirectDebitTransaction10,
    #[serde(rename = "DbtrAgt")]
    pub dbtr_agt: BranchAndFinancialInstitutionIdentification6,
    #[serde(rename = "Dbtr")]
    pub dbtr: PartyIdentification135,
    #[serde(rename = "DbtrAcct")]
    pub dbtr_acct: CashAccount38,
    #[serde(rename = "UltmtDbtr", skip_serializing_if = "Option::is_none")]
    pub ultmt_dbtr: Option<PartyIdentification135>,
    #[serde(rename = "RmtInf", skip_serializing_if = "Option::is_none")]
    pub rmt_inf: Option<RemittanceInformation16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIdentification6 {
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
pub struct DirectDebitTransaction10 {
    #[serde(rename = "MndtRltdInf")]
    pub mndt_rltd_inf: MandateRelatedInformation14,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MandateRelatedInformation14 {
    #[serde(rename = "MndtId")]
    pub mndt_id: String,
    #[serde(rename = "DtOfSgntr")]
    pub dt_of_sgntr: String,
    #[serde(rename = "AmdmntInd")]
    pub amdmnt_ind: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemittanceInformation16 {
    #[serde(rename = "Ustrd", default)]
    pub ustrd: Vec<String>,
}

// ---------------------------------------------------------------------------
// Document builder
// ---------------------------------------------------------------------------

/// Build the version-specific document tree from the domain inputs.
///
/// Message-level NbOfTxs and CtrlSum are recomputed from the transaction
/// lists; caller-side aggregates are never consulted.
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

    let grp_hdr = GroupHeader83 {
        msg_id: header.msg_id.clone(),
        cre_dt_tm: xml::format_date_time(header.creation_date_time),
        nb_of_txs: num_txs.to_string(),
        ctrl_sum: Some(ctrl_sum),
        initg_pty: PartyIdentification135 {
            nm: Some(header.initiator.clone()),
            id: None,
        },
    };

    Ok(Document {
        xmlns: NAMESPACE.into(),
        xmlns_xsi: XSI_NAMESPACE.into(),
        schema_location: super::PainDocumentType::Pain00800108.schema_location(),
        cstmr_drct_dbt_initn: CustomerDirectDebitInitiationV08 { grp_hdr, pmt_inf },
    })
}

fn create_payment_instruction(
    info: &CollectorPaymentInfoPain,
) -> Result<PaymentInstruction29, PainError> {
    validate_payment_info(info)?;

    let creditor = &info.creditor;
    let transactions: Vec<DirectDebitTransactionInformation23> =
        info.transactions.iter().map(create_transaction).collect();

    let pmt_tp_inf = PaymentTypeInformation29 {
        svc_lvl: vec![ServiceLevel8Choice { cd: "SEPA".into() }],
        lcl_instrm: LocalInstrument2Choice {
            cd: map_local_instrument(info.local_instrument)?.into(),
        },
        seq_tp: map_sequence_type(info.sequence_type),
    };

    // Gläubiger-ID, wrapped as private identification with proprietary
    // scheme name "SEPA".
    let cdtr_schme_id = PartyIdentification135 {
        nm: None,
        id: Some(Party38Choice {
            prvt_id: PersonIdentification13 {
                othr: vec![GenericPersonIdentification1 {
                    id: creditor.creditor_id.clone(),
                    schme_nm: PersonIdentificationSchemeName1Choice {
                        prtry: "SEPA".into(),
                    },
                }],
            },
        }),
    };

    Ok(PaymentInstruction29 {
        pmt_inf_id: info.payment_info_id.clone(),
        pmt_mtd: PaymentMethod2Code::Dd,
        nb_of_txs: transactions.len().to_string(),
        ctrl_sum: Some(info.total_amount()),
        pmt_tp_inf,
        reqd_colltn_dt: xml::format_date(info.collection_date),
        cdtr: PartyIdentification135 {
            nm: Some(creditor.name.clone()),
            id: None,
        },
        cdtr_acct: CashAccount38 {
            id: AccountIdentification4Choice {
                iban: creditor.iban.clone(),
            },
        },
        cdtr_agt: BranchAndFinancialInstitutionIdentification6 {
            fin_instn_id: FinancialInstitutionIdentification18 {
                bicfi: creditor.bic.clone(),
            },
        },
        chrg_br: ChargeBearerType1Code::Slev,
        cdtr_schme_id,
        drct_dbt_tx_inf: transactions,
    })
}

fn create_transaction(tx: &PainTransaction) -> DirectDebitTransactionInformation23 {
    let mut amount = tx.amount;
    amount.rescale(2);

    DirectDebitTransactionInformation23 {
        pmt_id: PaymentIdentification6 {
            end_to_end_id: tx.end_to_end_id.clone(),
        },
        instd_amt: ActiveOrHistoricCurrencyAndAmount {
            ccy: "EUR".into(),
            value: amount,
        },
        drct_dbt_tx: DirectDebitTransaction10 {
            mndt_rltd_inf: MandateRelatedInformation14 {
                mndt_id: tx.mandate_id.clone(),
                dt_of_sgntr: xml::format_date(tx.date_of_signature),
                amdmnt_ind: false,
            },
        },
        dbtr_agt: BranchAndFinancialInstitutionIdentification6 {
            fin_instn_id: FinancialInstitutionIdentification18 {
                bicfi: tx.dbtr_bic.clone(),
            },
        },
        dbtr: PartyIdentification135 {
            nm: Some(tx.dbtr_name.clone()),
            id: None,
        },
        dbtr_acct: CashAccount38 {
            id: AccountIdentification4Choice {
                iban: tx.dbtr_iban.clone(),
            },
        },
        ultmt_dbtr: tx.ult_dbtr_name.as_ref().map(|nm| PartyIdentification135 {
            nm: Some(nm.clone()),
            id: None,
        }),
        rmt_inf: tx.remittance_info.as_ref().map(|info| RemittanceInformation16 {
            ustrd: vec![info.clone()],
        }),
    }
}

fn map_local_instrument(instrument: LocalInstrument) -> Result<&'static str, PainError> {
    match instrument {
        LocalInstrument::Core => Ok("CORE"),
        LocalInstrument::B2b => Ok("B2B"),
        // COR1 was folded into CORE before this message version existed.
        LocalInstrument::Cor1 => Err(PainError::Build(
            "local instrument COR1 has no mapping in pain.008.001.08".into(),
        )),
    }
}

fn map_sequence_type(sequence: SequenceType) -> SequenceType3Code {
    match sequence {
        SequenceType::Frst => SequenceType3Code::Frst,
        SequenceType::Rcur => SequenceType3Code::Rcur,
        SequenceType::Fnal => SequenceType3Code::Fnal,
        SequenceType::Ooff => SequenceType3Code::Ooff,
    }
}

/// Parse a pain.008.001.08 XML string into its document tree.
pub fn from_xml(xml_text: &str) -> Result<Document, PainError> {
    xml::unmarshal_str(xml_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn header() -> GroupHeaderInfo {
        GroupHeaderInfo::new(
            "MSG-1",
            NaiveDate::from_ymd_opt(2025, 5, 20)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            "ACME",
        )
    }

    fn batch(instrument: LocalInstrument) -> CollectorPaymentInfoPain {
        CollectorPaymentInfoPain {
            payment_info_id: "PMT-1".into(),
            collection_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            local_instrument: instrument,
            sequence_type: SequenceType::Frst,
            creditor: crate::core::CreditorInfo::new(
                "ACME",
                "DE89370400440532013000",
                "COBADEFFXXX",
                "DE98ZZZ09999999999",
            ),
            transactions: vec![PainTransaction {
                end_to_end_id: "E2E-1".into(),
                amount: dec!(10.00),
                dbtr_name: "J Doe".into(),
                dbtr_iban: "DE02100100100006820101".into(),
                dbtr_bic: "PBNKDEFF".into(),
                mandate_id: "M1".into(),
                date_of_signature: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                ult_dbtr_name: None,
                remittance_info: None,
            }],
        }
    }

    #[test]
    fn cor1_has_no_mapping() {
        let err = create_document(&header(), &[batch(LocalInstrument::Cor1)]).unwrap_err();
        assert!(matches!(err, PainError::Build(_)));
    }

    #[test]
    fn amounts_are_rescaled_to_cents() {
        let mut b = batch(LocalInstrument::Core);
        b.transactions[0].amount = dec!(10.5);
        let doc = create_document(&header(), &[b]).unwrap();
        let tx = &doc.cstmr_drct_dbt_initn.pmt_inf[0].drct_dbt_tx_inf[0];
        assert_eq!(tx.instd_amt.value.to_string(), "10.50");
    }

    #[test]
    fn mandate_date_is_calendar_only() {
        let doc = create_document(&header(), &[batch(LocalInstrument::Core)]).unwrap();
        let mndt = &doc.cstmr_drct_dbt_initn.pmt_inf[0].drct_dbt_tx_inf[0]
            .drct_dbt_tx
            .mndt_rltd_inf;
        assert_eq!(mndt.dt_of_sgntr, "2024-01-01");
        assert!(!mndt.amdmnt_ind);
    }
}
