use super::criteria::{escape_like, LeadCriteria};
use super::types::{FilterOp, FilterWhereInfo, SqlParam};

/// Columns searched by the free-text term.
pub const SEARCH_COLUMNS: [&str; 3] = ["company_name", "contact_name", "email"];

/// Conjunctive WHERE builder. Only supplied criteria become conditions, and
/// each condition binds exactly one parameter.
pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
    conditions: Vec<FilterWhereInfo>,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
            conditions: vec![],
        }
    }

    /// Returns the clause without the `WHERE` keyword, or an empty string when
    /// no criteria are set.
    pub fn generate(criteria: &LeadCriteria, starting_param_index: usize) -> (String, Vec<SqlParam>) {
        let mut filter_where = Self::new(starting_param_index);
        filter_where.collect(criteria);
        filter_where.build()
    }

    fn collect(&mut self, criteria: &LeadCriteria) {
        if let Some(status) = criteria.status {
            self.push(&["status"], FilterOp::Eq, SqlParam::Text(status.as_str().to_string()));
        }
        if let Some(source) = criteria.source {
            self.push(&["source"], FilterOp::Eq, SqlParam::Text(source.as_str().to_string()));
        }
        if let Some(term) = &criteria.search {
            let pattern = format!("%{}%", escape_like(term));
            self.push(&SEARCH_COLUMNS, FilterOp::ILike, SqlParam::Text(pattern));
        }
        if let Some(start) = criteria.start {
            self.push(&["created_at"], FilterOp::Gte, SqlParam::Timestamp(start));
        }
        if let Some(end) = criteria.end {
            self.push(&["created_at"], FilterOp::Lte, SqlParam::Timestamp(end));
        }
    }

    fn push(&mut self, columns: &[&'static str], operator: FilterOp, data: SqlParam) {
        self.conditions.push(FilterWhereInfo { columns: columns.to_vec(), operator, data });
    }

    fn build(mut self) -> (String, Vec<SqlParam>) {
        let conditions = std::mem::take(&mut self.conditions);
        let sql_conditions: Vec<String> = conditions
            .into_iter()
            .map(|condition| self.build_sql_condition(condition))
            .collect();
        (sql_conditions.join(" AND "), self.param_values)
    }

    fn build_sql_condition(&mut self, condition: FilterWhereInfo) -> String {
        let placeholder = self.param(condition.data);
        let comparisons: Vec<String> = condition
            .columns
            .iter()
            .map(|column| {
                let quoted_column = format!("\"{}\"", column);
                match condition.operator {
                    FilterOp::Eq => format!("{} = {}", quoted_column, placeholder),
                    FilterOp::Gte => format!("{} >= {}", quoted_column, placeholder),
                    FilterOp::Lte => format!("{} <= {}", quoted_column, placeholder),
                    FilterOp::ILike => format!("{} ILIKE {} ESCAPE '\\'", quoted_column, placeholder),
                }
            })
            .collect();

        if comparisons.len() == 1 {
            comparisons.join("")
        } else {
            format!("({})", comparisons.join(" OR "))
        }
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}
