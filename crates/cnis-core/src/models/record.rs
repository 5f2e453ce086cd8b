//! CNIS data models.
//!
//! Field names on the wire follow the Portuguese keys consumed by the
//! case-management backend (`empregador`, `data_inicio`, ...).

use serde::{Deserialize, Serialize};

/// Personal data found in the statement header.
///
/// Every field defaults to the empty string when it cannot be found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalData {
    /// Full name, title-cased.
    #[serde(rename = "nome")]
    pub name: String,

    /// CPF as printed (`ddd.ddd.ddd-dd`).
    #[serde(rename = "cpf")]
    pub national_id: String,

    /// Birth date (`dd/mm/yyyy`).
    #[serde(rename = "data_nascimento")]
    pub birth_date: String,
}

impl PersonalData {
    /// Birth date, if one was found.
    pub fn known_birth_date(&self) -> Option<&str> {
        if self.birth_date.is_empty() {
            None
        } else {
            Some(&self.birth_date)
        }
    }
}

/// One employment relationship (vínculo empregatício).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentRecord {
    /// Employer name.
    #[serde(rename = "empregador")]
    pub employer: String,

    /// CNPJ, complete or the `dd.ddd.ddd` fragment.
    #[serde(rename = "cnpj")]
    pub registration_number: String,

    /// Start date (`dd/mm/yyyy`).
    #[serde(rename = "data_inicio")]
    pub start_date: String,

    /// End date. Empty means the relationship is still open.
    #[serde(rename = "data_fim")]
    pub end_date: String,
}

impl EmploymentRecord {
    /// Whether the relationship has no end date.
    pub fn is_ongoing(&self) -> bool {
        self.end_date.is_empty()
    }
}

/// Payload of a successful extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientData {
    pub client_name: String,
    pub client_cpf: String,
    /// Records in document order.
    pub vinculos_empregaticios: Vec<EmploymentRecord>,
}

impl ClientData {
    pub fn new(personal: PersonalData, records: Vec<EmploymentRecord>) -> Self {
        Self {
            client_name: personal.name,
            client_cpf: personal.national_id,
            vinculos_empregaticios: records,
        }
    }
}

/// Outcome of one extraction pass.
///
/// Failures are data: `success == false` carries `error`, never `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ClientData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Characters of source text the pass ran over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_length: Option<usize>,
}

impl ExtractionResult {
    /// Successful result.
    pub fn success(data: ClientData, text_length: usize) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            text_length: Some(text_length),
        }
    }

    /// Failed result with an explanatory message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            text_length: None,
        }
    }

    /// Extracted records, empty on failure.
    pub fn records(&self) -> &[EmploymentRecord] {
        self.data
            .as_ref()
            .map(|d| d.vinculos_empregaticios.as_slice())
            .unwrap_or(&[])
    }
}
