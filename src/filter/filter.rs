use super::criteria::LeadCriteria;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::page::PageRequest;
use super::types::{FilterOrderInfo, SqlResult};

/// Columns selected for a `Lead` row, in `FromRow` field order.
pub const LEAD_COLUMNS: &str = "\"id\", \"company_name\", \"contact_name\", \"email\", \"phone\", \"status\", \"source\", \"owner_id\", \"account_id\", \"created_at\", \"updated_at\"";

/// Compiles criteria, ordering and paging into SQL against the `leads` table.
pub struct Filter {
    table_name: &'static str,
    criteria: LeadCriteria,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Filter {
    pub fn new(criteria: LeadCriteria) -> Self {
        Self {
            table_name: "leads",
            criteria,
            order_data: vec![],
            limit: None,
            offset: None,
        }
    }

    pub fn order(mut self, order: Vec<FilterOrderInfo>) -> Self {
        self.order_data = order;
        self
    }

    pub fn page(mut self, request: &PageRequest) -> Self {
        self.order_data = request.sort.clone();
        self.limit = Some(request.size);
        self.offset = Some(request.offset());
        self
    }

    pub fn to_sql(&self) -> SqlResult {
        let (where_clause, params) = FilterWhere::generate(&self.criteria, 0);
        let order_clause = FilterOrder::generate(&self.order_data);
        let limit_clause = self.build_limit_clause();

        let query = [
            format!("SELECT {}", LEAD_COLUMNS),
            format!("FROM \"{}\"", self.table_name),
            if where_clause.is_empty() { String::new() } else { format!("WHERE {}", where_clause) },
            order_clause,
            limit_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params }
    }

    pub fn to_count_sql(&self) -> SqlResult {
        let (where_clause, params) = FilterWhere::generate(&self.criteria, 0);
        let query = if where_clause.is_empty() {
            format!("SELECT COUNT(*) AS count FROM \"{}\"", self.table_name)
        } else {
            format!("SELECT COUNT(*) AS count FROM \"{}\" WHERE {}", self.table_name, where_clause)
        };
        SqlResult { query, params }
    }

    fn build_limit_clause(&self) -> String {
        match (self.limit, self.offset) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            _ => String::new(),
        }
    }
}
