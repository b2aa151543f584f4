use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::database::models::{timestamp_now, Lead, LeadSource, LeadStatus, NewLead, RecordError};
use crate::database::{DatabaseError, LeadStore};
use crate::filter::{FilterError, FilterOrder, LeadCriteria, Page, PageRequest};
use crate::services::lead_patch::{LeadPatch, PatchError};

/// Window used for the "recent leads" statistic.
pub const RECENT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Error)]
pub enum LeadError {
    #[error("Lead not found with id: {0}")]
    NotFound(i64),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Patch(#[from] PatchError),

    #[error(transparent)]
    Invalid(#[from] RecordError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Create/replace body. Enum literals stay as text until validated so the
/// rejection can name the bad value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRequest {
    pub company_name: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
    pub source: Option<String>,
    pub account_id: Option<i64>,
}

/// Validated create/replace fields.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadFields {
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: LeadStatus,
    pub source: LeadSource,
    pub account_id: Option<i64>,
}

impl LeadRequest {
    /// Required text first (company, contact, email), then enum literals.
    /// Absent status/source take their defaults.
    pub fn validate(self) -> Result<LeadFields, LeadError> {
        let company_name = required("Company name", self.company_name)?;
        let contact_name = required("Contact name", self.contact_name)?;
        let email = required("Email", self.email)?;
        let status = match self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse().map_err(|_| FilterError::InvalidStatus(raw.to_string()))?,
            None => LeadStatus::default(),
        };
        let source = match self.source.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse().map_err(|_| FilterError::InvalidSource(raw.to_string()))?,
            None => LeadSource::default(),
        };

        Ok(LeadFields {
            company_name,
            contact_name,
            email,
            phone: self.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
            status,
            source,
            account_id: self.account_id,
        })
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, LeadError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(LeadError::MissingField(field)),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    #[serde(flatten)]
    pub page: Page<Lead>,
    pub search_term: String,
    pub total_results: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStatistics {
    pub total_leads: i64,
    pub status_breakdown: BTreeMap<LeadStatus, i64>,
    pub source_breakdown: BTreeMap<LeadSource, i64>,
    pub recent_leads: i64,
    pub generated_at: NaiveDateTime,
}

/// Lead use-cases on top of a `LeadStore`.
#[derive(Clone)]
pub struct LeadService {
    store: Arc<dyn LeadStore>,
}

impl LeadService {
    pub fn new(store: Arc<dyn LeadStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, criteria: &LeadCriteria, page: &PageRequest) -> Result<Page<Lead>, LeadError> {
        let result = self.store.find_page(criteria, page).await?;
        info!(
            "Listed leads page={} size={} filtered={} returned={} total={}",
            page.page,
            page.size,
            !criteria.is_empty(),
            result.number_of_elements,
            result.total_elements
        );
        Ok(result)
    }

    pub async fn get(&self, id: i64) -> Result<Lead, LeadError> {
        self.store.find_by_id(id).await?.ok_or_else(|| {
            warn!("Lead {} not found", id);
            LeadError::NotFound(id)
        })
    }

    pub async fn search(&self, term: Option<&str>, page: &PageRequest) -> Result<SearchResults, LeadError> {
        let term = term
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(FilterError::MissingSearchTerm)?;
        let criteria = LeadCriteria { search: Some(term.to_string()), ..LeadCriteria::default() };
        let page = self.store.find_page(&criteria, page).await?;
        info!("Search '{}' matched {} leads", term, page.total_elements);
        Ok(SearchResults {
            total_results: page.total_elements,
            search_term: term.to_string(),
            page,
        })
    }

    pub async fn by_status(&self, status: LeadStatus) -> Result<Vec<Lead>, LeadError> {
        let order = FilterOrder::validate_and_parse(&[])?;
        let leads = self.store.find_all(&LeadCriteria::with_status(status), &order).await?;
        info!("Found {} leads with status {}", leads.len(), status);
        Ok(leads)
    }

    pub async fn by_source(&self, source: LeadSource, page: &PageRequest) -> Result<Page<Lead>, LeadError> {
        Ok(self.store.find_page(&LeadCriteria::with_source(source), page).await?)
    }

    pub async fn create(&self, request: LeadRequest, owner_id: i64) -> Result<Lead, LeadError> {
        let fields = request.validate()?;
        let new_lead = NewLead {
            company_name: fields.company_name,
            contact_name: fields.contact_name,
            email: fields.email,
            phone: fields.phone,
            status: fields.status,
            source: fields.source,
            owner_id,
            account_id: fields.account_id,
        };
        new_lead.validate()?;
        let lead = self.store.insert(new_lead).await?;
        info!("Created lead {} for owner {}", lead.id, owner_id);
        Ok(lead)
    }

    /// Full replace. Identifier, owner and creation time are kept. An unknown
    /// id is a 404 before the body is looked at.
    pub async fn replace(&self, id: i64, request: LeadRequest) -> Result<Lead, LeadError> {
        let mut lead = self.get(id).await?;
        let fields = request.validate()?;
        lead.company_name = fields.company_name;
        lead.contact_name = fields.contact_name;
        lead.email = fields.email;
        lead.phone = fields.phone;
        lead.status = fields.status;
        lead.source = fields.source;
        lead.account_id = fields.account_id;
        lead.updated_at = timestamp_now();
        lead.validate()?;

        let updated = self.store.update(&lead).await?.ok_or(LeadError::NotFound(id))?;
        info!("Replaced lead {}", id);
        Ok(updated)
    }

    /// Existence is checked before the body is decoded, so an unknown id is
    /// a 404 even when the body is also invalid.
    pub async fn patch(&self, id: i64, body: &serde_json::Value) -> Result<Lead, LeadError> {
        let mut lead = self.get(id).await?;
        let patches = LeadPatch::decode(body).map_err(|e| {
            warn!("Rejected patch for lead {}: {}", id, e);
            e
        })?;
        if patches.is_empty() {
            info!("Patch for lead {} named no known fields; nothing to write", id);
            return Ok(lead);
        }
        LeadPatch::apply_all(&patches, &mut lead);
        lead.validate()?;

        let updated = self.store.update(&lead).await?.ok_or(LeadError::NotFound(id))?;
        info!("Patched lead {} ({} fields)", id, patches.len());
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), LeadError> {
        if !self.store.delete(id).await? {
            warn!("Delete of missing lead {}", id);
            return Err(LeadError::NotFound(id));
        }
        info!("Deleted lead {}", id);
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), LeadError> {
        Ok(self.store.ping().await?)
    }

    pub async fn status_counts(&self) -> Result<BTreeMap<LeadStatus, i64>, LeadError> {
        let mut counts = BTreeMap::new();
        for status in LeadStatus::ALL {
            counts.insert(*status, self.store.count(&LeadCriteria::with_status(*status)).await?);
        }
        Ok(counts)
    }

    pub async fn statistics(&self, now: NaiveDateTime) -> Result<LeadStatistics, LeadError> {
        let total_leads = self.store.count(&LeadCriteria::default()).await?;
        let status_breakdown = self.status_counts().await?;

        let mut source_breakdown = BTreeMap::new();
        for source in LeadSource::ALL {
            source_breakdown.insert(*source, self.store.count(&LeadCriteria::with_source(*source)).await?);
        }

        let since = now - Duration::days(RECENT_WINDOW_DAYS);
        let recent_leads = self.store.count(&LeadCriteria::created_between(since, now)).await?;

        Ok(LeadStatistics {
            total_leads,
            status_breakdown,
            source_breakdown,
            recent_leads,
            generated_at: now,
        })
    }
}
