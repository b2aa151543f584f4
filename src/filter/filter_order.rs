use std::cmp::Ordering;

use super::error::FilterError;
use super::types::{FilterOrderInfo, SortDirection};
use crate::database::models::Lead;

/// Sortable lead properties, by their wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadSortField {
    Id,
    CompanyName,
    ContactName,
    Email,
    Status,
    Source,
    CreatedAt,
    UpdatedAt,
}

impl LeadSortField {
    pub fn from_property(property: &str) -> Option<Self> {
        Some(match property {
            "id" => LeadSortField::Id,
            "companyName" => LeadSortField::CompanyName,
            "contactName" => LeadSortField::ContactName,
            "email" => LeadSortField::Email,
            "status" => LeadSortField::Status,
            "source" => LeadSortField::Source,
            "createdAt" => LeadSortField::CreatedAt,
            "updatedAt" => LeadSortField::UpdatedAt,
            _ => return None,
        })
    }

    pub fn property(&self) -> &'static str {
        match self {
            LeadSortField::Id => "id",
            LeadSortField::CompanyName => "companyName",
            LeadSortField::ContactName => "contactName",
            LeadSortField::Email => "email",
            LeadSortField::Status => "status",
            LeadSortField::Source => "source",
            LeadSortField::CreatedAt => "createdAt",
            LeadSortField::UpdatedAt => "updatedAt",
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            LeadSortField::Id => "id",
            LeadSortField::CompanyName => "company_name",
            LeadSortField::ContactName => "contact_name",
            LeadSortField::Email => "email",
            LeadSortField::Status => "status",
            LeadSortField::Source => "source",
            LeadSortField::CreatedAt => "created_at",
            LeadSortField::UpdatedAt => "updated_at",
        }
    }

    fn compare(&self, a: &Lead, b: &Lead) -> Ordering {
        match self {
            LeadSortField::Id => a.id.cmp(&b.id),
            LeadSortField::CompanyName => a.company_name.cmp(&b.company_name),
            LeadSortField::ContactName => a.contact_name.cmp(&b.contact_name),
            LeadSortField::Email => a.email.cmp(&b.email),
            LeadSortField::Status => a.status.as_str().cmp(b.status.as_str()),
            LeadSortField::Source => a.source.as_str().cmp(b.source.as_str()),
            LeadSortField::CreatedAt => a.created_at.cmp(&b.created_at),
            LeadSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

pub struct FilterOrder;

impl FilterOrder {
    /// Parse repeated `sort` parameters of the form `field[,field...][,asc|desc]`.
    /// No parameters means `id,asc`.
    pub fn validate_and_parse(specs: &[String]) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let mut out = Vec::new();
        for spec in specs {
            out.extend(Self::parse_order_string(spec)?);
        }
        if out.is_empty() {
            out.push(FilterOrderInfo { field: LeadSortField::Id, sort: SortDirection::Asc });
        }
        Ok(out)
    }

    fn parse_order_string(s: &str) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let mut tokens: Vec<&str> = s.split(',').map(str::trim).filter(|t| !t.is_empty()).collect();
        let sort = match tokens.last() {
            Some(dir) if dir.eq_ignore_ascii_case("desc") => {
                tokens.pop();
                SortDirection::Desc
            }
            Some(dir) if dir.eq_ignore_ascii_case("asc") => {
                tokens.pop();
                SortDirection::Asc
            }
            _ => SortDirection::Asc,
        };

        tokens
            .into_iter()
            .map(|property| {
                LeadSortField::from_property(property)
                    .map(|field| FilterOrderInfo { field, sort })
                    .ok_or_else(|| FilterError::InvalidSortField(property.to_string()))
            })
            .collect()
    }

    /// `ORDER BY` clause with a trailing `id` tiebreak unless `id` is already sorted on.
    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        let mut parts: Vec<String> = infos
            .iter()
            .map(|i| format!("\"{}\" {}", i.field.column(), i.sort.to_sql()))
            .collect();
        if !infos.iter().any(|i| i.field == LeadSortField::Id) {
            parts.push("\"id\" ASC".to_string());
        }
        format!("ORDER BY {}", parts.join(", "))
    }

    /// In-process equivalent of `generate`.
    pub fn compare(infos: &[FilterOrderInfo], a: &Lead, b: &Lead) -> Ordering {
        infos
            .iter()
            .map(|i| match i.sort {
                SortDirection::Asc => i.field.compare(a, b),
                SortDirection::Desc => i.field.compare(a, b).reverse(),
            })
            .find(|o| o.is_ne())
            .unwrap_or_else(|| a.id.cmp(&b.id))
    }
}
