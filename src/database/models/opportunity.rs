use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{require_text, RecordError};

string_enum! {
    OpportunityStage ("opportunity stage") {
        Prospecting => "PROSPECTING",
        Qualification => "QUALIFICATION",
        NeedsAnalysis => "NEEDS_ANALYSIS",
        ValueProposition => "VALUE_PROPOSITION",
        IdDecisionMakers => "ID_DECISION_MAKERS",
        PerceptionAnalysis => "PERCEPTION_ANALYSIS",
        Proposal => "PROPOSAL",
        NegotiationReview => "NEGOTIATION_REVIEW",
        ClosedWon => "CLOSED_WON",
        ClosedLost => "CLOSED_LOST",
    }
}

impl OpportunityStage {
    pub fn is_closed(&self) -> bool {
        matches!(self, OpportunityStage::ClosedWon | OpportunityStage::ClosedLost)
    }
}

pub const DEFAULT_PROBABILITY: i32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: i64,
    pub name: String,
    pub amount: Option<Decimal>,
    #[sqlx(try_from = "String")]
    pub stage: OpportunityStage,
    pub probability: i32,
    pub close_date: Option<NaiveDate>,
    pub account_id: i64,
    pub primary_contact_id: Option<i64>,
    pub owner_id: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Opportunity {
    pub fn validate(&self) -> Result<(), RecordError> {
        require_text("Opportunity name", &self.name)?;
        check_probability(self.probability)
    }
}

#[derive(Debug, Clone)]
pub struct NewOpportunity {
    pub name: String,
    pub amount: Option<Decimal>,
    pub stage: OpportunityStage,
    pub probability: i32,
    pub close_date: Option<NaiveDate>,
    pub account_id: i64,
    pub primary_contact_id: Option<i64>,
    pub owner_id: i64,
}

impl NewOpportunity {
    /// A prospecting opportunity at the default probability.
    pub fn new(name: impl Into<String>, account_id: i64, owner_id: i64) -> Self {
        Self {
            name: name.into(),
            amount: None,
            stage: OpportunityStage::Prospecting,
            probability: DEFAULT_PROBABILITY,
            close_date: None,
            account_id,
            primary_contact_id: None,
            owner_id,
        }
    }

    pub fn validate(&self) -> Result<(), RecordError> {
        require_text("Opportunity name", &self.name)?;
        check_probability(self.probability)
    }
}

fn check_probability(probability: i32) -> Result<(), RecordError> {
    if !(0..=100).contains(&probability) {
        return Err(RecordError::OutOfRange {
            field: "probability",
            min: 0,
            max: 100,
            value: probability as i64,
        });
    }
    Ok(())
}
