//! Wire DTOs for the client/backend boundary.
//!
//! DESIGN
//! ======
//! Field names on the wire are the backend's (Portuguese) keys; the Rust side
//! uses English names through serde renames so screens read naturally while
//! payloads stay byte-compatible with the server.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::report::hours;

// =============================================================================
// PUNCH KIND
// =============================================================================

/// Direction of a punch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PunchKind {
    #[default]
    #[serde(rename = "entrada")]
    Entry,
    #[serde(rename = "saída", alias = "saida")]
    Exit,
}

impl PunchKind {
    /// Value the backend stores in `tipo`.
    #[must_use]
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Entry => "entrada",
            Self::Exit => "saída",
        }
    }

    /// English label used in notices and spreadsheets.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Exit => "exit",
        }
    }
}

impl fmt::Display for PunchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown punch kind {0:?} (expected entry or exit)")]
pub struct UnknownPunchKind(pub String);

impl FromStr for PunchKind {
    type Err = UnknownPunchKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "entry" | "in" | "entrada" => Ok(Self::Entry),
            "exit" | "out" | "saída" | "saida" => Ok(Self::Exit),
            other => Err(UnknownPunchKind(other.to_owned())),
        }
    }
}

// =============================================================================
// ENTITIES
// =============================================================================

/// An employee registered with the company.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "cargo", default)]
    pub role: String,
    #[serde(rename = "foto_url", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(rename = "empresa_id", default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(rename = "data_cadastro", default, skip_serializing_if = "Option::is_none")]
    pub registered_on: Option<String>,
}

/// One punch as returned by the records query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(rename = "registro_id")]
    pub id: String,
    #[serde(rename = "funcionario_id")]
    pub employee_id: String,
    /// Raw `data_hora`; the backend sends `DD-MM-YYYY HH:MM:SS`.
    #[serde(rename = "data_hora")]
    pub timestamp: String,
    #[serde(rename = "tipo")]
    pub kind: PunchKind,
    #[serde(rename = "funcionario_nome", default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
}

impl AttendanceRecord {
    /// Split `data_hora` into its date and time halves.
    #[must_use]
    pub fn date_and_time(&self) -> (&str, &str) {
        self.timestamp
            .split_once(' ')
            .unwrap_or((self.timestamp.as_str(), ""))
    }

    /// Date half normalized to `DD-MM-YYYY`.
    #[must_use]
    pub fn display_date(&self) -> String {
        hours::day_first(self.date_and_time().0)
    }
}

/// Per-employee worked-hours total from the consolidated query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursSummary {
    #[serde(rename = "funcionario", default)]
    pub employee_name: Option<String>,
    #[serde(rename = "funcionario_id")]
    pub employee_id: String,
    #[serde(rename = "horas_trabalhadas", default)]
    pub hours_worked: Option<String>,
}

/// A company user account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "usuario_id")]
    pub user_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "empresa_nome", default)]
    pub company_name: String,
    #[serde(rename = "empresa_id", default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
}

// =============================================================================
// REQUESTS
// =============================================================================

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub usuario_id: &'a str,
    pub senha: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AccountRegistration<'a> {
    pub usuario_id: &'a str,
    pub email: &'a str,
    pub empresa_nome: &'a str,
    pub senha: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AccountUpdate<'a> {
    pub empresa_nome: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empresa_id: Option<&'a str>,
    pub email: &'a str,
    /// Omitted when the password is left unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub senha: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct ManualPunchRequest<'a> {
    pub funcionario_id: &'a str,
    /// `YYYY-MM-DD HH:MM`
    pub data_hora: String,
    pub tipo: PunchKind,
}

/// Date bounds sent with emailed reports.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Period {
    #[serde(rename = "inicio")]
    pub start: String,
    #[serde(rename = "fim")]
    pub end: String,
}

#[derive(Debug, Serialize)]
pub struct EmailRecordsReport<'a> {
    pub funcionario: &'a str,
    pub funcionario_id: &'a str,
    pub periodo: &'a Period,
    pub registros: &'a [AttendanceRecord],
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub struct EmailHoursReport<'a> {
    pub registros: &'a [HoursSummary],
    pub email: &'a str,
    pub periodo: &'a Period,
}

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Generic acknowledgement; the backend uses several keys for its text.
#[derive(Debug, Default, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub mensagem: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Acknowledgement {
    /// Server text, if any, in the order screens prefer it.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.mensagem
            .as_deref()
            .or(self.message.as_deref())
            .or(self.error.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

/// Body of `POST /registrar_ponto`.
#[derive(Debug, Default, Deserialize)]
pub struct ClockInResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "funcionario", default)]
    pub employee_name: Option<String>,
    #[serde(rename = "hora", default)]
    pub punched_at: Option<String>,
    #[serde(rename = "tipo", default)]
    pub kind: Option<PunchKind>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /cadastrar_funcionario`.
#[derive(Debug, Default, Deserialize)]
pub struct EmployeeCreated {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
    #[serde(rename = "cargo", default)]
    pub role: Option<String>,
    #[serde(rename = "foto_url", default)]
    pub photo_url: Option<String>,
}

/// What a successful camera punch tells the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClockInReceipt {
    pub employee_name: String,
    pub punched_at: String,
    pub kind: Option<PunchKind>,
}

impl ClockInReceipt {
    /// Two-line confirmation: who, then when (`DD/MM/YYYY at HH:MM:SS`).
    #[must_use]
    pub fn notice_text(&self) -> String {
        let who = match self.kind {
            Some(kind) => format!("{} ({kind})", self.employee_name),
            None => self.employee_name.clone(),
        };
        let when = hours::parse_timestamp(&self.punched_at).map_or_else(
            || self.punched_at.clone(),
            |at| {
                format!(
                    "{:02}/{:02}/{} at {:02}:{:02}:{:02}",
                    at.day(),
                    u8::from(at.month()),
                    at.year(),
                    at.hour(),
                    at.minute(),
                    at.second()
                )
            },
        );
        format!("{who}\n{when}")
    }
}

/// Filters accepted by `GET /registros`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RecordQuery {
    #[serde(rename = "inicio", skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(rename = "fim", skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(rename = "funcionario_id", skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
