use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

use super::{require_text, RecordError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
    pub is_primary: bool,
    pub account_id: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimaryContactError {
    #[error("Account {account_id} has {count} contacts flagged as primary")]
    Ambiguous { account_id: i64, count: usize },
}

impl Contact {
    pub fn validate(&self) -> Result<(), RecordError> {
        require_text("First name", &self.first_name)?;
        require_text("Last name", &self.last_name)
    }

    /// The single contact flagged primary among one account's contacts.
    ///
    /// Nothing in the schema stops several contacts carrying the flag, so more
    /// than one is reported rather than resolved.
    pub fn primary_for(contacts: &[Contact]) -> Result<Option<&Contact>, PrimaryContactError> {
        let mut flagged = contacts.iter().filter(|c| c.is_primary);
        let first = flagged.next();
        let extra = flagged.count();
        match first {
            Some(contact) if extra > 0 => Err(PrimaryContactError::Ambiguous {
                account_id: contact.account_id,
                count: extra + 1,
            }),
            other => Ok(other),
        }
    }
}
