use crate::config::PaginationConfig;
use crate::database::models::{LeadSource, LeadStatus};
use crate::filter::{FilterError, LeadCriteria, PageRequest};

/// Raw lead query parameters. Decoded from key/value pairs so `sort` can repeat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadQuery {
    pub status: Option<LeadStatus>,
    pub source: Option<LeadSource>,
    pub search: Option<String>,
    pub q: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort: Vec<String>,
}

impl LeadQuery {
    /// Enum literals and integers are checked here; dates are left to `criteria`.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, FilterError> {
        let mut query = LeadQuery::default();
        for (key, value) in pairs {
            match key.as_str() {
                "status" if !value.trim().is_empty() => {
                    query.status = Some(parse_status(&value)?);
                }
                "source" if !value.trim().is_empty() => {
                    query.source = Some(parse_source(&value)?);
                }
                "search" => query.search = Some(value),
                "q" => query.q = Some(value),
                "startDate" => query.start_date = Some(value),
                "endDate" => query.end_date = Some(value),
                "page" => query.page = Some(parse_integer("page", &value)?),
                "size" => query.size = Some(parse_integer("size", &value)?),
                "sort" => query.sort.push(value),
                _ => {}
            }
        }
        Ok(query)
    }

    pub fn page_request(&self, config: &PaginationConfig) -> Result<PageRequest, FilterError> {
        PageRequest::new(self.page, self.size, &self.sort, config)
    }

    pub fn criteria(&self) -> Result<LeadCriteria, FilterError> {
        LeadCriteria::parse(
            self.status,
            self.source,
            self.search.as_deref(),
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )
    }
}

pub fn parse_status(value: &str) -> Result<LeadStatus, FilterError> {
    value
        .trim()
        .parse()
        .map_err(|_| FilterError::InvalidStatus(value.to_string()))
}

pub fn parse_source(value: &str) -> Result<LeadSource, FilterError> {
    value
        .trim()
        .parse()
        .map_err(|_| FilterError::InvalidSource(value.to_string()))
}

fn parse_integer(field: &'static str, value: &str) -> Result<i64, FilterError> {
    value.trim().parse().map_err(|_| FilterError::InvalidInteger {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn decodes_repeated_sort_and_enums() {
        let query = LeadQuery::from_pairs(pairs(&[
            ("status", "NEW"),
            ("source", "REFERRAL"),
            ("sort", "companyName,desc"),
            ("sort", "createdAt"),
            ("page", "2"),
            ("unrelated", "x"),
        ]))
        .unwrap();
        assert_eq!(query.status, Some(LeadStatus::New));
        assert_eq!(query.source, Some(LeadSource::Referral));
        assert_eq!(query.sort.len(), 2);
        assert_eq!(query.page, Some(2));
    }

    #[test]
    fn rejects_bad_enums_and_integers() {
        assert_eq!(
            LeadQuery::from_pairs(pairs(&[("status", "new")])),
            Err(FilterError::InvalidStatus("new".into()))
        );
        assert_eq!(
            LeadQuery::from_pairs(pairs(&[("size", "ten")])),
            Err(FilterError::InvalidInteger { field: "size", value: "ten".into() })
        );
    }

    #[test]
    fn blank_enum_parameters_are_absent() {
        let query = LeadQuery::from_pairs(pairs(&[("status", ""), ("source", " ")])).unwrap();
        assert_eq!(query.status, None);
        assert_eq!(query.source, None);
    }
}
