use thiserror::Error;

/// Rejections raised while decoding lead query parameters, before any query runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid status value: {0}. Valid values: NEW, CONTACTED, QUALIFIED, LOST, CONVERTED")]
    InvalidStatus(String),

    #[error("Invalid source value: {0}. Valid values: WEBSITE, REFERRAL, COLD_CALL, EMAIL, TRADE_SHOW, SOCIAL_MEDIA, OTHER")]
    InvalidSource(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidInteger { field: &'static str, value: String },

    #[error("Invalid start date format. Use ISO format: 2025-08-01T00:00:00")]
    InvalidStartDate(String),

    #[error("Invalid end date format. Use ISO format: 2025-08-01T00:00:00")]
    InvalidEndDate(String),

    #[error("Start date cannot be after end date")]
    InvalidDateRange,

    #[error("Search term is required")]
    MissingSearchTerm,

    #[error("Invalid sort property: {0}")]
    InvalidSortField(String),

    #[error("Page index must not be less than zero")]
    InvalidPage(i64),

    #[error("Page size must not be less than one")]
    InvalidSize(i64),
}

impl FilterError {
    /// Request parameter the error is about.
    pub fn field(&self) -> &'static str {
        match self {
            FilterError::InvalidStatus(_) => "status",
            FilterError::InvalidSource(_) => "source",
            FilterError::InvalidInteger { field, .. } => *field,
            FilterError::InvalidStartDate(_) => "startDate",
            FilterError::InvalidEndDate(_) => "endDate",
            FilterError::InvalidDateRange => "startDate",
            FilterError::MissingSearchTerm => "q",
            FilterError::InvalidSortField(_) => "sort",
            FilterError::InvalidPage(_) => "page",
            FilterError::InvalidSize(_) => "size",
        }
    }
}
