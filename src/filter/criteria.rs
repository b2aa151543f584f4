use chrono::NaiveDateTime;

use super::error::FilterError;
use crate::database::models::{Lead, LeadSource, LeadStatus};

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse an ISO-8601 local date-time (`2025-08-01T00:00:00`, optional
/// fractional seconds, seconds may be omitted).
pub fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Escape `\`, `%` and `_` so the term only ever matches literally under LIKE.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Optional, conjunctive lead predicates. `None` imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadCriteria {
    pub status: Option<LeadStatus>,
    pub source: Option<LeadSource>,
    /// Trimmed, never blank.
    pub search: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl LeadCriteria {
    /// Decode the raw date and search parameters. The start date is checked
    /// first, then the end date, then the range; the first failure wins.
    pub fn parse(
        status: Option<LeadStatus>,
        source: Option<LeadSource>,
        search: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Self, FilterError> {
        let start = match non_blank(start_date) {
            Some(raw) => Some(parse_date_time(raw).ok_or_else(|| FilterError::InvalidStartDate(raw.to_string()))?),
            None => None,
        };
        let end = match non_blank(end_date) {
            Some(raw) => Some(parse_date_time(raw).ok_or_else(|| FilterError::InvalidEndDate(raw.to_string()))?),
            None => None,
        };
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(FilterError::InvalidDateRange);
            }
        }

        Ok(Self {
            status,
            source,
            search: non_blank(search).map(str::to_string),
            start,
            end,
        })
    }

    pub fn with_status(status: LeadStatus) -> Self {
        Self { status: Some(status), ..Self::default() }
    }

    pub fn with_source(source: LeadSource) -> Self {
        Self { source: Some(source), ..Self::default() }
    }

    /// Leads created inside `[start, end]`.
    pub fn created_between(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start: Some(start), end: Some(end), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.source.is_none()
            && self.search.is_none()
            && self.start.is_none()
            && self.end.is_none()
    }

    /// Evaluate the criteria against a single lead, with the same semantics
    /// as the SQL produced by `FilterWhere`.
    pub fn matches(&self, lead: &Lead) -> bool {
        if self.status.is_some_and(|s| s != lead.status) {
            return false;
        }
        if self.source.is_some_and(|s| s != lead.source) {
            return false;
        }
        if self.start.is_some_and(|start| lead.created_at < start) {
            return false;
        }
        if self.end.is_some_and(|end| lead.created_at > end) {
            return false;
        }
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            return [&lead.company_name, &lead.contact_name, &lead.email]
                .iter()
                .any(|field| field.to_lowercase().contains(&term));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_local_date_times() {
        let expected = chrono::NaiveDate::from_ymd_opt(2025, 8, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_date_time("2025-08-01T00:00:00"), Some(expected));
        assert_eq!(parse_date_time("2025-08-01T00:00"), Some(expected));
        assert_eq!(parse_date_time("2025-08-01T00:00:00.000"), Some(expected));
        assert_eq!(parse_date_time("2025-08-01"), None);
        assert_eq!(parse_date_time("01/08/2025"), None);
    }

    #[test]
    fn malformed_start_is_reported_before_end() {
        let err = LeadCriteria::parse(None, None, None, Some("yesterday"), Some("nope")).unwrap_err();
        assert_eq!(err, FilterError::InvalidStartDate("yesterday".into()));
        assert_eq!(err.field(), "startDate");

        let err = LeadCriteria::parse(None, None, None, Some("2025-08-01T00:00:00"), Some("nope")).unwrap_err();
        assert_eq!(err.field(), "endDate");
    }

    #[test]
    fn start_after_end_is_a_range_error() {
        let err = LeadCriteria::parse(
            None,
            None,
            None,
            Some("2099-01-01T00:00:00"),
            Some("2000-01-01T00:00:00"),
        )
        .unwrap_err();
        assert_eq!(err, FilterError::InvalidDateRange);
        assert_eq!(err.to_string(), "Start date cannot be after end date");
    }

    #[test]
    fn blank_inputs_are_absent() {
        let criteria = LeadCriteria::parse(None, None, Some("   "), Some(""), Some(" ")).unwrap();
        assert!(criteria.is_empty());
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("acme"), "acme");
    }
}
