use serde_json::Value;

use super::error::FilterError;
use super::filter::Filter;
use super::types::{Condition, FilterOp, FilterWhereInfo};

/// Compiles a `Condition` tree into a SQL predicate over the JSONB `body` column.
/// Every value is bound as a `jsonb` parameter so comparisons keep JSON typing.
pub struct FilterWhere {
    param_values: Vec<Value>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    pub fn generate(
        condition: Option<&Condition>,
        starting_param_index: usize,
    ) -> Result<(String, Vec<Value>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        let sql = match condition {
            Some(condition) => filter_where.build(condition)?,
            None => "1=1".to_string(),
        };
        Ok((sql, filter_where.param_values))
    }

    fn build(&mut self, condition: &Condition) -> Result<String, FilterError> {
        match condition {
            Condition::Field(info) => self.build_sql_condition(info),
            Condition::And(parts) => self.join(parts, " AND ", "1=1"),
            Condition::Or(parts) => self.join(parts, " OR ", "1=0"),
            Condition::Not(inner) => Ok(format!("NOT ({})", self.build(inner)?)),
        }
    }

    fn join(&mut self, parts: &[Condition], joiner: &str, empty: &str) -> Result<String, FilterError> {
        if parts.is_empty() {
            return Ok(empty.to_string());
        }
        let mut sql_parts = Vec::with_capacity(parts.len());
        for part in parts {
            sql_parts.push(format!("({})", self.build(part)?));
        }
        Ok(sql_parts.join(joiner))
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        Filter::validate_column(&condition.column)?;
        let field = format!("body -> '{}'", condition.column);

        match condition.operator {
            FilterOp::Eq => {
                if condition.data.is_null() {
                    Ok(format!("({0} IS NULL OR {0} = 'null'::jsonb)", field))
                } else {
                    Ok(format!("{} = {}", field, self.param(condition.data.clone())))
                }
            }
            FilterOp::Ne => {
                if condition.data.is_null() {
                    Ok(format!("({0} IS NOT NULL AND {0} <> 'null'::jsonb)", field))
                } else {
                    Ok(format!("{} IS DISTINCT FROM {}", field, self.param(condition.data.clone())))
                }
            }
            FilterOp::Gt => Ok(self.ordered(&field, ">", &condition.data)),
            FilterOp::Gte => Ok(self.ordered(&field, ">=", &condition.data)),
            FilterOp::Lt => Ok(self.ordered(&field, "<", &condition.data)),
            FilterOp::Lte => Ok(self.ordered(&field, "<=", &condition.data)),
            FilterOp::In => match &condition.data {
                Value::Array(values) => {
                    if values.is_empty() {
                        return Ok("1=0".to_string());
                    }
                    let params: Vec<String> = values.iter().map(|v| self.param(v.clone())).collect();
                    Ok(format!("{} IN ({})", field, params.join(", ")))
                }
                _ => Err(FilterError::InvalidOperatorData("$in requires array".to_string())),
            },
            FilterOp::NIn => match &condition.data {
                Value::Array(values) => {
                    if values.is_empty() {
                        return Ok("1=1".to_string());
                    }
                    let params: Vec<String> = values.iter().map(|v| self.param(v.clone())).collect();
                    Ok(format!("({0} IS NULL OR {0} NOT IN ({1}))", field, params.join(", ")))
                }
                _ => Err(FilterError::InvalidOperatorData("$nin requires array".to_string())),
            },
            FilterOp::Exists => {
                let wanted = condition.data.as_bool().unwrap_or(true);
                if wanted {
                    Ok(format!("({0} IS NOT NULL AND {0} <> 'null'::jsonb)", field))
                } else {
                    Ok(format!("({0} IS NULL OR {0} = 'null'::jsonb)", field))
                }
            }
        }
    }

    /// Range comparisons only hold between values of the same JSON type.
    fn ordered(&mut self, field: &str, op: &str, data: &Value) -> String {
        let p = self.param(data.clone());
        format!("(jsonb_typeof({0}) = jsonb_typeof({1}) AND {0} {2} {1})", field, p, op)
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}::jsonb", self.param_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_condition_is_tautology() {
        let (sql, params) = FilterWhere::generate(None, 1).unwrap();
        assert_eq!(sql, "1=1");
        assert!(params.is_empty());
    }

    #[test]
    fn in_expands_one_param_per_value() {
        let cond = Condition::is_in("status", ["Escalated", "Under Review", "Open"]);
        let (sql, params) = FilterWhere::generate(Some(&cond), 1).unwrap();
        assert_eq!(sql, "body -> 'status' IN ($2::jsonb, $3::jsonb, $4::jsonb)");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn ne_matches_missing_fields() {
        let cond = Condition::ne("status", "Resolved");
        let (sql, params) = FilterWhere::generate(Some(&cond), 0).unwrap();
        assert_eq!(sql, "body -> 'status' IS DISTINCT FROM $1::jsonb");
        assert_eq!(params, vec![json!("Resolved")]);
    }

    #[test]
    fn logical_operators_nest_and_keep_param_numbering() {
        let cond = Condition::Or(vec![
            Condition::eq("status", "Open"),
            Condition::Not(Box::new(Condition::eq("priority", "Low"))),
        ]);
        let (sql, params) = FilterWhere::generate(Some(&cond), 1).unwrap();
        assert_eq!(
            sql,
            "(body -> 'status' = $2::jsonb) OR (NOT (body -> 'priority' = $3::jsonb))"
        );
        assert_eq!(params, vec![json!("Open"), json!("Low")]);
    }

    #[test]
    fn range_compare_guards_json_type() {
        let cond = Condition::field("aum", FilterOp::Gte, json!(100));
        let (sql, _) = FilterWhere::generate(Some(&cond), 1).unwrap();
        assert_eq!(
            sql,
            "(jsonb_typeof(body -> 'aum') = jsonb_typeof($2::jsonb) AND body -> 'aum' >= $2::jsonb)"
        );
    }

    #[test]
    fn empty_in_matches_nothing() {
        let cond = Condition::field("status", FilterOp::In, json!([]));
        let (sql, _) = FilterWhere::generate(Some(&cond), 1).unwrap();
        assert_eq!(sql, "1=0");
    }
}
