use super::error::FilterError;

/// One `column [asc|desc]` term of an order string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTerm {
    pub column: String,
    pub descending: bool,
}

pub(super) fn parse(order: &str) -> Result<Vec<OrderTerm>, FilterError> {
    order
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(|term| {
            let mut words = term.split_whitespace();
            let column = words.next().unwrap_or_default();
            if !super::is_identifier(column) {
                return Err(FilterError::InvalidColumn(column.to_string()));
            }
            let descending = match words.next() {
                None => false,
                Some(dir) if dir.eq_ignore_ascii_case("asc") => false,
                Some(dir) if dir.eq_ignore_ascii_case("desc") => true,
                Some(_) => return Err(FilterError::InvalidColumn(term.to_string())),
            };
            if words.next().is_some() {
                return Err(FilterError::InvalidColumn(term.to_string()));
            }
            Ok(OrderTerm { column: column.to_string(), descending })
        })
        .collect()
}

pub(super) fn to_sql(terms: &[OrderTerm]) -> String {
    let terms: Vec<String> = terms
        .iter()
        .map(|term| format!("\"{}\" {}", term.column, if term.descending { "DESC" } else { "ASC" }))
        .collect();
    format!("ORDER BY {}", terms.join(", "))
}
