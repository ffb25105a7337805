//! JSON filter documents compiled to parameterized PostgreSQL.
//!
//! Stores describe what they want as a small Mongo-style document
//! (`{"department": "Sales", "$or": [...]}`) plus an order string; this
//! module turns that into SQL text and an ordered parameter list. Every
//! identifier is validated and quoted, every value becomes a `$n` placeholder.

mod error;
mod order;
mod where_clause;

pub use error::FilterError;
pub use order::OrderTerm;
pub use where_clause::compile_where;

use serde_json::Value;

use crate::config::FilterConfig;

/// Compiled statement and the values for its placeholders, in order
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// A select against one table
#[derive(Debug, Clone)]
pub struct Filter {
    table: String,
    where_doc: Value,
    order: Vec<OrderTerm>,
    limit: Option<u32>,
    offset: Option<u32>,
}

impl Filter {
    pub fn new(table: &str) -> Result<Self, FilterError> {
        if !is_identifier(table) {
            return Err(FilterError::InvalidTableName(table.to_string()));
        }
        Ok(Self {
            table: table.to_string(),
            where_doc: Value::Null,
            order: Vec::new(),
            limit: None,
            offset: None,
        })
    }

    pub fn matching(mut self, where_doc: Value) -> Result<Self, FilterError> {
        if !matches!(where_doc, Value::Null | Value::Object(_)) {
            return Err(FilterError::InvalidWhereClause("where must be an object".to_string()));
        }
        self.where_doc = where_doc;
        Ok(self)
    }

    /// `"name asc, version desc"`
    pub fn order_by(mut self, order: &str) -> Result<Self, FilterError> {
        self.order = order::parse(order)?;
        Ok(self)
    }

    /// Caps `limit` at `filter_config.max_limit`
    pub fn window(mut self, limit: u32, offset: u32, filter_config: &FilterConfig) -> Self {
        let cap = filter_config
            .max_limit
            .and_then(|max| u32::try_from(max).ok())
            .unwrap_or(u32::MAX);
        if limit > cap && filter_config.debug_logging {
            tracing::warn!("Limit {} on {} exceeds {}, capping", limit, self.table, cap);
        }
        self.limit = Some(limit.min(cap));
        self.offset = Some(offset);
        self
    }

    pub fn to_sql(&self) -> Result<SqlQuery, FilterError> {
        let (predicate, params) = compile_where(&self.where_doc)?;

        let mut sql = format!("SELECT * FROM \"{}\"", self.table);
        if !predicate.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&predicate);
        }
        if !self.order.is_empty() {
            sql.push(' ');
            sql.push_str(&order::to_sql(&self.order));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = self.offset.filter(|offset| *offset > 0) {
            sql.push_str(&format!(" OFFSET {}", offset));
        }
        Ok(SqlQuery { sql, params })
    }

    /// Same predicate as `to_sql`, without order or window
    pub fn to_count_sql(&self) -> Result<SqlQuery, FilterError> {
        let (predicate, params) = compile_where(&self.where_doc)?;
        let mut sql = format!("SELECT COUNT(*) AS count FROM \"{}\"", self.table);
        if !predicate.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&predicate);
        }
        Ok(SqlQuery { sql, params })
    }
}

/// Identifier check shared by table, column and order names.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
