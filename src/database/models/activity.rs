use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use super::{require_text, RecordError};

string_enum! {
    ActivityType ("activity type") {
        Call => "CALL",
        Email => "EMAIL",
        Meeting => "MEETING",
        Task => "TASK",
        Note => "NOTE",
    }
}

string_enum! {
    ActivityStatus ("activity status") {
        Planned => "PLANNED",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

/// The one record an activity is logged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum ActivityTarget {
    Lead(i64),
    Contact(i64),
    Opportunity(i64),
}

impl ActivityTarget {
    /// Build from the three nullable foreign-key columns.
    pub fn from_columns(
        lead_id: Option<i64>,
        contact_id: Option<i64>,
        opportunity_id: Option<i64>,
    ) -> Result<Self, RecordError> {
        match (lead_id, contact_id, opportunity_id) {
            (Some(id), None, None) => Ok(ActivityTarget::Lead(id)),
            (None, Some(id), None) => Ok(ActivityTarget::Contact(id)),
            (None, None, Some(id)) => Ok(ActivityTarget::Opportunity(id)),
            (l, c, o) => Err(RecordError::ActivityTargetCount(
                [l, c, o].iter().filter(|v| v.is_some()).count(),
            )),
        }
    }

    /// `(lead_id, contact_id, opportunity_id)`
    pub fn columns(&self) -> (Option<i64>, Option<i64>, Option<i64>) {
        match *self {
            ActivityTarget::Lead(id) => (Some(id), None, None),
            ActivityTarget::Contact(id) => (None, Some(id), None),
            ActivityTarget::Opportunity(id) => (None, None, Some(id)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i64,
    pub activity_type: ActivityType,
    pub status: ActivityStatus,
    pub activity_date: NaiveDateTime,
    pub subject: String,
    pub description: Option<String>,
    pub target: ActivityTarget,
    pub user_id: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Activity {
    pub fn validate(&self) -> Result<(), RecordError> {
        require_text("Subject", &self.subject)
    }
}

impl<'r> FromRow<'r, PgRow> for Activity {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let decode = |column: &str, e: super::UnknownVariant| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        };
        let activity_type: String = row.try_get("activity_type")?;
        let status: String = row.try_get("status")?;
        let target = ActivityTarget::from_columns(
            row.try_get("lead_id")?,
            row.try_get("contact_id")?,
            row.try_get("opportunity_id")?,
        )
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: "lead_id".to_string(),
            source: Box::new(e),
        })?;

        Ok(Activity {
            id: row.try_get("id")?,
            activity_type: activity_type.parse().map_err(|e| decode("activity_type", e))?,
            status: status.parse().map_err(|e| decode("status", e))?,
            activity_date: row.try_get("activity_date")?,
            subject: row.try_get("subject")?,
            description: row.try_get("description")?,
            target,
            user_id: row.try_get("user_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
