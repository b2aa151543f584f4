//! Lead query composition: optional criteria, ordering and paging compiled
//! into one parameterised statement, plus an in-process evaluator with the
//! same semantics.

pub mod criteria;
pub mod error;
pub mod filter;
pub mod filter_order;
pub mod filter_where;
pub mod page;
pub mod types;

pub use criteria::{escape_like, parse_date_time, LeadCriteria};
pub use error::FilterError;
pub use filter::Filter;
pub use filter_order::{FilterOrder, LeadSortField};
pub use page::{Page, PageRequest, Pageable, SortOrder};
pub use types::*;
