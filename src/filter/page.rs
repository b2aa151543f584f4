use serde::Serialize;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::types::{FilterOrderInfo, SortDirection};
use crate::config::PaginationConfig;

/// A validated page request. `size` is already capped to the configured maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
    pub sort: Vec<FilterOrderInfo>,
}

impl PageRequest {
    pub fn new(
        page: Option<i64>,
        size: Option<i64>,
        sort: &[String],
        config: &PaginationConfig,
    ) -> Result<Self, FilterError> {
        let page = page.unwrap_or(0);
        if page < 0 {
            return Err(FilterError::InvalidPage(page));
        }
        let requested = size.unwrap_or(config.default_size);
        if requested < 1 {
            return Err(FilterError::InvalidSize(requested));
        }
        let size = if requested > config.max_size {
            tracing::debug!("Page size {} exceeds max {}, capping", requested, config.max_size);
            config.max_size
        } else {
            requested
        };
        let sort = FilterOrder::validate_and_parse(sort)?;
        Ok(Self { page, size, sort })
    }

    /// First page of `size`, ordered by id.
    pub fn first(size: i64) -> Self {
        Self {
            page: 0,
            size: size.max(1),
            sort: FilterOrder::validate_and_parse(&[]).unwrap_or_default(),
        }
    }

    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortOrder {
    pub property: &'static str,
    pub direction: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pageable {
    pub page_number: i64,
    pub page_size: i64,
    pub sort: Vec<SortOrder>,
}

/// Paginated response envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub pageable: Pageable,
    pub number: i64,
    pub size: i64,
    pub number_of_elements: usize,
    pub total_elements: i64,
    pub total_pages: i64,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: i64) -> Self {
        let size = request.size.max(1);
        let total_pages = (total_elements + size - 1) / size;
        let sort = request
            .sort
            .iter()
            .map(|info| SortOrder {
                property: info.field.property(),
                direction: match info.sort {
                    SortDirection::Asc => "ASC",
                    SortDirection::Desc => "DESC",
                },
            })
            .collect();

        Self {
            number_of_elements: content.len(),
            empty: content.is_empty(),
            content,
            pageable: Pageable {
                page_number: request.page,
                page_size: size,
                sort,
            },
            number: request.page,
            size,
            total_elements,
            total_pages,
            first: request.page == 0,
            last: request.page == total_pages - 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PaginationConfig {
        PaginationConfig { default_size: 20, max_size: 100 }
    }

    #[test]
    fn defaults_and_capping() {
        let request = PageRequest::new(None, None, &[], &config()).unwrap();
        assert_eq!((request.page, request.size), (0, 20));

        let request = PageRequest::new(Some(2), Some(5000), &[], &config()).unwrap();
        assert_eq!(request.size, 100);
        assert_eq!(request.offset(), 200);
    }

    #[test]
    fn rejects_negative_page_and_zero_size() {
        assert_eq!(
            PageRequest::new(Some(-1), None, &[], &config()),
            Err(FilterError::InvalidPage(-1))
        );
        assert_eq!(
            PageRequest::new(None, Some(0), &[], &config()),
            Err(FilterError::InvalidSize(0))
        );
    }

    #[test]
    fn envelope_flags_are_consistent() {
        let cases: &[(i64, i64, i64, usize)] = &[
            // page, size, total, content len
            (0, 10, 25, 10),
            (1, 10, 25, 10),
            (2, 10, 25, 5),
            (0, 10, 10, 10),
            (5, 10, 25, 0),
            (0, 20, 0, 0),
        ];
        for &(page, size, total, len) in cases {
            let request = PageRequest { page, size, ..PageRequest::first(size) };
            let result = Page::new(vec![0u8; len], &request, total);
            assert_eq!(result.total_pages, (total + size - 1) / size);
            assert_eq!(result.first, page == 0);
            assert_eq!(result.last, page == result.total_pages - 1);
            assert_eq!(result.empty, len == 0);
            assert_eq!(result.number_of_elements, len);
        }
    }

    #[test]
    fn serializes_camel_case() {
        let request = PageRequest::first(20);
        let json = serde_json::to_value(Page::new(vec!["a"], &request, 1)).unwrap();
        assert_eq!(json["totalElements"], 1);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["numberOfElements"], 1);
        assert_eq!(json["pageable"]["pageNumber"], 0);
        assert_eq!(json["pageable"]["sort"][0]["property"], "id");
        assert_eq!(json["last"], true);
    }
}
