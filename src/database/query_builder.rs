use serde_json::Value;
use sqlx::{
    postgres::{PgArguments, PgRow},
    Arguments, FromRow, PgPool, Row,
};

use crate::database::manager::DatabaseError;
use crate::filter::{FilterError, SqlQuery};

/// Runs a compiled filter and maps each row to `T`
pub async fn fetch_all<T>(pool: &PgPool, query: &SqlQuery) -> Result<Vec<T>, DatabaseError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let rows = sqlx::query_as_with::<_, T, _>(&query.sql, arguments(&query.params)?)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn fetch_optional<T>(pool: &PgPool, query: &SqlQuery) -> Result<Option<T>, DatabaseError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let row = sqlx::query_as_with::<_, T, _>(&query.sql, arguments(&query.params)?)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Runs a `SELECT COUNT(*) AS count` statement
pub async fn fetch_count(pool: &PgPool, query: &SqlQuery) -> Result<i64, DatabaseError> {
    let row = sqlx::query_with(&query.sql, arguments(&query.params)?)
        .fetch_one(pool)
        .await?;
    Ok(row.try_get("count")?)
}

/// Binds filter parameters in placeholder order
fn arguments(params: &[Value]) -> Result<PgArguments, DatabaseError> {
    let mut args = PgArguments::default();
    for value in params {
        match value {
            Value::Bool(b) => args.add(*b),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => args.add(i),
                (None, Some(f)) => args.add(f),
                _ => args.add(n.to_string()),
            },
            Value::String(s) => args.add(s.clone()),
            other => {
                return Err(DatabaseError::QueryError(format!("cannot bind {} as a parameter", other)));
            }
        }
    }
    Ok(args)
}

impl From<FilterError> for DatabaseError {
    fn from(err: FilterError) -> Self {
        DatabaseError::QueryError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_params_bind() {
        assert!(arguments(&[json!("Sales"), json!(3), json!(1.5), json!(true)]).is_ok());
    }

    #[test]
    fn structured_params_are_refused() {
        assert!(matches!(arguments(&[json!({ "a": 1 })]), Err(DatabaseError::QueryError(_))));
        assert!(arguments(&[json!(null)]).is_err());
    }
}
