use serde_json::{Map, Value};

use super::error::FilterError;

/// Compiles a where document into a predicate and its parameters.
///
/// Keys starting with `$` are logical groups (`$and`, `$or`, `$not`); any
/// other key is a column whose value is either a literal (equality, `null`
/// meaning IS NULL) or an operator object such as `{"$ilike": "%ann%"}`.
/// Conditions are joined with AND in the map's iteration order (sorted by
/// key, since `serde_json` is built without `preserve_order`); placeholder
/// numbers always follow the order of the returned parameters. An empty document compiles
/// to an empty predicate.
pub fn compile_where(doc: &Value) -> Result<(String, Vec<Value>), FilterError> {
    let mut compiler = WhereCompiler::default();
    let predicate = match doc {
        Value::Null => String::new(),
        Value::Object(fields) => compiler.conjunction(fields)?,
        _ => return Err(FilterError::InvalidWhereClause("where must be an object".to_string())),
    };
    Ok((predicate, compiler.params))
}

#[derive(Default)]
struct WhereCompiler {
    params: Vec<Value>,
}

impl WhereCompiler {
    fn conjunction(&mut self, fields: &Map<String, Value>) -> Result<String, FilterError> {
        let mut parts = Vec::new();
        for (key, value) in fields {
            let part = match key.strip_prefix('$') {
                Some(_) => self.logical(key, value)?,
                None => self.column(key, value)?,
            };
            if !part.is_empty() {
                parts.push(part);
            }
        }
        Ok(parts.join(" AND "))
    }

    fn nested(&mut self, doc: &Value, operator: &str) -> Result<String, FilterError> {
        match doc {
            Value::Object(fields) => self.conjunction(fields),
            _ => Err(invalid(operator, "expected an object")),
        }
    }

    fn logical(&mut self, operator: &str, value: &Value) -> Result<String, FilterError> {
        match operator {
            "$and" | "$or" => {
                let branches = value.as_array().ok_or_else(|| invalid(operator, "expected an array"))?;
                let mut parts = Vec::new();
                for branch in branches {
                    let sql = self.nested(branch, operator)?;
                    if !sql.is_empty() {
                        parts.push(format!("({})", sql));
                    }
                }
                if parts.is_empty() {
                    return Ok(String::new());
                }
                let joiner = if operator == "$and" { " AND " } else { " OR " };
                Ok(format!("({})", parts.join(joiner)))
            }
            "$not" => {
                let sql = self.nested(value, operator)?;
                Ok(if sql.is_empty() { sql } else { format!("NOT ({})", sql) })
            }
            other => Err(FilterError::UnsupportedOperator(other.to_string())),
        }
    }

    fn column(&mut self, column: &str, value: &Value) -> Result<String, FilterError> {
        if !super::is_identifier(column) {
            return Err(FilterError::InvalidColumn(column.to_string()));
        }
        let quoted = format!("\"{}\"", column);

        let Value::Object(operators) = value else {
            return self.equals(&quoted, value);
        };
        let mut parts = Vec::new();
        for (operator, operand) in operators {
            parts.push(self.condition(&quoted, operator, operand)?);
        }
        Ok(parts.join(" AND "))
    }

    fn condition(&mut self, quoted: &str, operator: &str, operand: &Value) -> Result<String, FilterError> {
        match operator {
            "$eq" => self.equals(quoted, operand),
            "$ne" => match operand {
                Value::Null => Ok(format!("{} IS NOT NULL", quoted)),
                _ => Ok(format!("{} <> {}", quoted, self.bind(scalar(operator, operand)?))),
            },
            "$gt" | "$gte" | "$lt" | "$lte" => {
                let sql_op = match operator {
                    "$gt" => ">",
                    "$gte" => ">=",
                    "$lt" => "<",
                    _ => "<=",
                };
                Ok(format!("{} {} {}", quoted, sql_op, self.bind(scalar(operator, operand)?)))
            }
            "$between" => match operand.as_array().map(Vec::as_slice) {
                Some([low, high]) => {
                    let low = self.bind(scalar(operator, low)?);
                    let high = self.bind(scalar(operator, high)?);
                    Ok(format!("{} BETWEEN {} AND {}", quoted, low, high))
                }
                _ => Err(invalid(operator, "expected [low, high]")),
            },
            "$like" => Ok(format!("{} LIKE {}", quoted, self.bind(text(operator, operand)?))),
            "$ilike" => Ok(format!("{} ILIKE {}", quoted, self.bind(text(operator, operand)?))),
            "$in" => {
                let values = list(operator, operand, |v| scalar(operator, v))?;
                Ok(self.any_of(quoted, values))
            }
            // uuid and enum columns compared against their text form
            "$teq" => Ok(format!("CAST({} AS TEXT) = {}", quoted, self.bind(text(operator, operand)?))),
            "$tin" => {
                let values = list(operator, operand, |v| text(operator, v))?;
                Ok(self.any_of(&format!("CAST({} AS TEXT)", quoted), values))
            }
            other => Err(FilterError::UnsupportedOperator(other.to_string())),
        }
    }

    fn equals(&mut self, quoted: &str, operand: &Value) -> Result<String, FilterError> {
        match operand {
            Value::Null => Ok(format!("{} IS NULL", quoted)),
            _ => Ok(format!("{} = {}", quoted, self.bind(scalar("$eq", operand)?))),
        }
    }

    fn any_of(&mut self, column_sql: &str, values: Vec<Value>) -> String {
        if values.is_empty() {
            return "1=0".to_string();
        }
        let placeholders: Vec<String> = values.into_iter().map(|v| self.bind(v)).collect();
        format!("{} IN ({})", column_sql, placeholders.join(", "))
    }

    fn bind(&mut self, value: Value) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }
}

fn invalid(operator: &str, reason: &str) -> FilterError {
    FilterError::InvalidOperand { operator: operator.to_string(), reason: reason.to_string() }
}

fn scalar(operator: &str, value: &Value) -> Result<Value, FilterError> {
    match value {
        Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(value.clone()),
        _ => Err(invalid(operator, "expected a string, number or boolean")),
    }
}

fn text(operator: &str, value: &Value) -> Result<Value, FilterError> {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        _ => Err(invalid(operator, "expected a string")),
    }
}

fn list(
    operator: &str,
    value: &Value,
    each: impl Fn(&Value) -> Result<Value, FilterError>,
) -> Result<Vec<Value>, FilterError> {
    match value {
        Value::Array(items) => items.iter().map(each).collect(),
        _ => Err(invalid(operator, "expected an array")),
    }
}
