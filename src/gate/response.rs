//! Gate wire types and their normalization.
//!
//! The service answers with a loosely shaped JSON object: optional fields,
//! a free-form status, and `options` entries that are either bare strings or
//! `{id, label}` objects. [`GateResponse::from_value`] turns that into one
//! typed value so nothing downstream branches on the raw shape.

use serde::{Deserialize, Serialize};

use crate::errors::GateError;

pub const VERDICT_AMBIGUOUS_UNRESOLVED: &str = "AMBIGUOUS_UNRESOLVED";
pub const VERDICT_ADMISSIBLE: &str = "ADMISSIBLE";
pub const VERDICT_INADMISSIBLE_UNSUPPORTED: &str = "INADMISSIBLE_UNSUPPORTED";

/// Request body: `{ "context": [...], "binding": "..." | null }`.
///
/// `binding` is always serialized, so "no binding yet" is an explicit `null`.
#[derive(Debug, Serialize)]
pub struct GateRequest<'a> {
    pub context: &'a [&'a str],
    pub binding: Option<&'a str>,
}

/// The gate's decision for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateStatus {
    /// Ambiguous; the user must pick a binding.
    Stop,
    Resolved,
    /// Anything else the service sends, passed through untouched.
    Other(String),
}

impl GateStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "STOP" => GateStatus::Stop,
            "RESOLVED" => GateStatus::Resolved,
            other => GateStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            GateStatus::Stop => "STOP",
            GateStatus::Resolved => "RESOLVED",
            GateStatus::Other(s) => s,
        }
    }
}

impl std::fmt::Display for GateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict label to display: the provided one, or the per-status default.
///
/// An empty label counts as missing.
pub fn derive_verdict_label(status: &GateStatus, provided: Option<&str>) -> String {
    match provided {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => match status {
            GateStatus::Stop => VERDICT_AMBIGUOUS_UNRESOLVED,
            GateStatus::Resolved => VERDICT_ADMISSIBLE,
            GateStatus::Other(_) => VERDICT_INADMISSIBLE_UNSUPPORTED,
        }
        .to_string(),
    }
}

/// One selectable binding, normalized from either wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOption {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireOption {
    Plain(String),
    Labeled {
        id: serde_json::Value,
        #[serde(default)]
        label: Option<String>,
    },
}

impl WireOption {
    /// Bare strings label themselves; a missing or empty label falls back to the id.
    /// Non-string ids (`{"id": 1}`) are kept in their JSON text form.
    fn normalize(self) -> GateOption {
        match self {
            WireOption::Plain(id) => GateOption {
                label: id.clone(),
                id,
            },
            WireOption::Labeled { id, label } => {
                let id = match id {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                let label = label.filter(|l| !l.is_empty()).unwrap_or_else(|| id.clone());
                GateOption { id, label }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    status: String,
    #[serde(default)]
    gate_verdict: Option<String>,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    options: Option<Vec<WireOption>>,
    #[serde(default)]
    statement: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// A parsed, validated gate reply.
#[derive(Debug, Clone, PartialEq)]
pub struct GateResponse {
    pub status: GateStatus,
    /// Verdict label with defaults already applied.
    pub verdict: String,
    pub question: Option<String>,
    /// Display order equals response order.
    pub options: Vec<GateOption>,
    pub statement: Option<String>,
    /// Never `Some("")`; an empty message counts as absent.
    pub message: Option<String>,
    /// The body exactly as received, for diagnostics.
    pub raw: serde_json::Value,
}

impl GateResponse {
    pub fn from_json(body: &str) -> Result<Self, GateError> {
        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| GateError::Protocol(format!("response is not JSON: {e}")))?;
        Self::from_value(value)
    }

    pub fn from_value(raw: serde_json::Value) -> Result<Self, GateError> {
        let wire: WireResponse = serde_json::from_value(raw.clone())
            .map_err(|e| GateError::Protocol(format!("malformed gate response: {e}")))?;

        let status = GateStatus::parse(&wire.status);
        match status {
            GateStatus::Stop => {
                if wire.question.is_none() {
                    return Err(GateError::Protocol("STOP response has no question".into()));
                }
                if wire.options.is_none() {
                    return Err(GateError::Protocol("STOP response has no options".into()));
                }
            }
            GateStatus::Resolved if wire.statement.is_none() => {
                return Err(GateError::Protocol(
                    "RESOLVED response has no statement".into(),
                ));
            }
            _ => {}
        }

        let verdict = derive_verdict_label(&status, wire.gate_verdict.as_deref());
        let options = wire
            .options
            .unwrap_or_default()
            .into_iter()
            .map(WireOption::normalize)
            .collect();

        Ok(Self {
            status,
            verdict,
            question: wire.question,
            options,
            statement: wire.statement,
            message: wire.message.filter(|m| !m.is_empty()),
            raw,
        })
    }

    /// Pretty-printed raw body.
    pub fn raw_dump(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_else(|_| self.raw.to_string())
    }
}
