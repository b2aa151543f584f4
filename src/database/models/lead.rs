use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{require_text, RecordError};

string_enum! {
    LeadStatus ("lead status") {
        New => "NEW",
        Contacted => "CONTACTED",
        Qualified => "QUALIFIED",
        Lost => "LOST",
        Converted => "CONVERTED",
    }
}

string_enum! {
    LeadSource ("lead source") {
        Website => "WEBSITE",
        Referral => "REFERRAL",
        ColdCall => "COLD_CALL",
        Email => "EMAIL",
        TradeShow => "TRADE_SHOW",
        SocialMedia => "SOCIAL_MEDIA",
        Other => "OTHER",
    }
}

impl Default for LeadStatus {
    fn default() -> Self {
        LeadStatus::New
    }
}

impl Default for LeadSource {
    fn default() -> Self {
        LeadSource::Other
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: i64,
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: LeadStatus,
    #[sqlx(try_from = "String")]
    pub source: LeadSource,
    pub owner_id: i64,
    pub account_id: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Lead {
    pub fn validate(&self) -> Result<(), RecordError> {
        require_text("Company name", &self.company_name)?;
        require_text("Contact name", &self.contact_name)?;
        require_text("Email", &self.email)
    }
}

/// Insert payload. `id` and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLead {
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: LeadStatus,
    pub source: LeadSource,
    pub owner_id: i64,
    pub account_id: Option<i64>,
}

impl NewLead {
    pub fn validate(&self) -> Result<(), RecordError> {
        require_text("Company name", &self.company_name)?;
        require_text("Contact name", &self.contact_name)?;
        require_text("Email", &self.email)
    }
}
