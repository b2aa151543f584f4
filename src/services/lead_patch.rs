use serde_json::{Map, Value};
use thiserror::Error;

use crate::database::models::{timestamp_now, Lead, LeadSource, LeadStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("Request body must be a JSON object")]
    NotAnObject,

    #[error("Invalid status value: {0}")]
    InvalidStatus(String),

    #[error("Invalid source value: {0}")]
    InvalidSource(String),

    #[error("{0} must be a string")]
    NotAString(&'static str),

    #[error("{0} cannot be blank")]
    Blank(&'static str),
}

impl PatchError {
    pub fn field(&self) -> Option<&'static str> {
        match self {
            PatchError::NotAnObject => None,
            PatchError::InvalidStatus(_) => Some("status"),
            PatchError::InvalidSource(_) => Some("source"),
            PatchError::NotAString(field) | PatchError::Blank(field) => Some(*field),
        }
    }
}

/// One typed field change on a lead.
#[derive(Debug, Clone, PartialEq)]
pub enum LeadPatch {
    CompanyName(String),
    ContactName(String),
    Email(String),
    /// `None` clears the phone number.
    Phone(Option<String>),
    Status(LeadStatus),
    Source(LeadSource),
}

impl LeadPatch {
    /// Decode a JSON object into patches. Keys match case-insensitively and
    /// unknown keys are skipped. Nothing is returned unless every recognised
    /// key decodes.
    pub fn decode(body: &Value) -> Result<Vec<LeadPatch>, PatchError> {
        let map = body.as_object().ok_or(PatchError::NotAnObject)?;
        Self::decode_map(map)
    }

    fn decode_map(map: &Map<String, Value>) -> Result<Vec<LeadPatch>, PatchError> {
        let mut patches = Vec::new();
        for (key, value) in map {
            let patch = match key.to_ascii_lowercase().as_str() {
                "companyname" => LeadPatch::CompanyName(required_text("companyName", value)?),
                "contactname" => LeadPatch::ContactName(required_text("contactName", value)?),
                "email" => LeadPatch::Email(required_text("email", value)?),
                "phone" => LeadPatch::Phone(optional_text("phone", value)?),
                "status" => LeadPatch::Status(
                    enum_literal(value)
                        .and_then(|s| s.parse().ok())
                        .ok_or_else(|| PatchError::InvalidStatus(display(value)))?,
                ),
                "source" => LeadPatch::Source(
                    enum_literal(value)
                        .and_then(|s| s.parse().ok())
                        .ok_or_else(|| PatchError::InvalidSource(display(value)))?,
                ),
                other => {
                    tracing::debug!("Ignoring unknown lead patch key '{}'", other);
                    continue;
                }
            };
            patches.push(patch);
        }
        Ok(patches)
    }

    pub fn apply(&self, lead: &mut Lead) {
        match self {
            LeadPatch::CompanyName(v) => lead.company_name = v.clone(),
            LeadPatch::ContactName(v) => lead.contact_name = v.clone(),
            LeadPatch::Email(v) => lead.email = v.clone(),
            LeadPatch::Phone(v) => lead.phone = v.clone(),
            LeadPatch::Status(v) => lead.status = *v,
            LeadPatch::Source(v) => lead.source = *v,
        }
    }

    /// Apply all patches and bump `updated_at`. No patches, no change.
    pub fn apply_all(patches: &[LeadPatch], lead: &mut Lead) {
        if patches.is_empty() {
            return;
        }
        for patch in patches {
            patch.apply(lead);
        }
        lead.updated_at = timestamp_now();
    }
}

fn required_text(field: &'static str, value: &Value) -> Result<String, PatchError> {
    let text = value.as_str().ok_or(PatchError::NotAString(field))?;
    if text.trim().is_empty() {
        return Err(PatchError::Blank(field));
    }
    Ok(text.trim().to_string())
}

fn optional_text(field: &'static str, value: &Value) -> Result<Option<String>, PatchError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.trim().to_string())),
        _ => Err(PatchError::NotAString(field)),
    }
}

fn enum_literal(value: &Value) -> Option<&str> {
    value.as_str()
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
