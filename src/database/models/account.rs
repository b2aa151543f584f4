use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{require_text, RecordError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub employee_count: Option<i32>,
    /// NUMERIC(15,2)
    pub annual_revenue: Option<Decimal>,
    pub address: Option<String>,
    pub owner_id: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Account {
    pub fn validate(&self) -> Result<(), RecordError> {
        require_text("Account name", &self.name)
    }
}
