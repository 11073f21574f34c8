use serde_json::Value;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::matcher;
use super::types::{Condition, FilterOp, FilterOrderInfo, SortDirection, SortSpec, SqlResult};
use crate::types::Document;

/// Query description shared by every store backend: an optional WHERE tree,
/// an ORDER BY list and an optional row limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    condition: Option<Condition>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<u32>,
}

impl Filter {
    /// Matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matching(condition: Condition) -> Self {
        Self { condition: Some(condition), ..Self::default() }
    }

    /// Parse a mongo-style where document, e.g. `{ "status": { "$in": ["Open"] } }`.
    pub fn parse(where_data: &Value) -> Result<Self, FilterError> {
        let condition = Self::parse_where_data(where_data)?;
        Ok(Self { condition, ..Self::default() })
    }

    pub fn order_by(mut self, column: impl Into<String>, sort: SortDirection) -> Self {
        self.order_data.push(FilterOrderInfo { column: column.into(), sort });
        self
    }

    pub fn sorted(mut self, spec: Option<SortSpec>) -> Self {
        if let Some(spec) = spec {
            self.order_data.push(spec.into());
        }
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    pub fn order(&self) -> &[FilterOrderInfo] {
        &self.order_data
    }

    pub fn limit_value(&self) -> Option<u32> {
        self.limit
    }

    /// Evaluate the WHERE tree against an in-memory document.
    pub fn matches(&self, doc: &Document) -> bool {
        match &self.condition {
            Some(condition) => matcher::matches(condition, doc),
            None => true,
        }
    }

    /// Build `WHERE ... ORDER BY ... LIMIT ...` over the JSONB `body` column.
    /// Placeholders start after `starting_param_index` so callers can bind their own first.
    pub fn to_sql(&self, starting_param_index: usize) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = FilterWhere::generate(self.condition.as_ref(), starting_param_index)?;
        let mut query = format!("({})", where_clause);
        let order_clause = FilterOrder::generate(&self.order_data)?;
        query.push(' ');
        query.push_str(&order_clause);
        if let Some(limit) = self.limit {
            query.push_str(&format!(" LIMIT {}", limit));
        }
        Ok(SqlResult { query, params })
    }

    /// WHERE fragment only, for COUNT / UPDATE / aggregate statements.
    pub fn to_where_sql(&self, starting_param_index: usize) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = FilterWhere::generate(self.condition.as_ref(), starting_param_index)?;
        Ok(SqlResult { query: format!("({})", where_clause), params })
    }

    fn parse_where_data(where_data: &Value) -> Result<Option<Condition>, FilterError> {
        match where_data {
            Value::Null => Ok(None),
            Value::Object(obj) => {
                let mut conditions = Vec::new();
                for (key, value) in obj {
                    if key.starts_with('$') {
                        conditions.push(Self::parse_logical_operator(key, value)?);
                    } else {
                        Self::validate_column(key)?;
                        conditions.extend(Self::parse_field_condition(key, value)?);
                    }
                }
                Ok(match conditions.len() {
                    0 => None,
                    1 => conditions.pop(),
                    _ => Some(Condition::And(conditions)),
                })
            }
            _ => Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        }
    }

    fn parse_logical_operator(op: &str, value: &Value) -> Result<Condition, FilterError> {
        match op {
            "$and" | "$or" => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| FilterError::InvalidOperatorData(format!("{} requires array", op)))?;
                let mut parts = Vec::with_capacity(arr.len());
                for v in arr {
                    parts.push(Self::parse_where_data(v)?.unwrap_or(Condition::And(vec![])));
                }
                Ok(if op == "$and" { Condition::And(parts) } else { Condition::Or(parts) })
            }
            "$not" => {
                let inner = Self::parse_where_data(value)?.unwrap_or(Condition::And(vec![]));
                Ok(Condition::Not(Box::new(inner)))
            }
            _ => Err(FilterError::UnsupportedOperator(op.to_string())),
        }
    }

    fn parse_field_condition(field: &str, value: &Value) -> Result<Vec<Condition>, FilterError> {
        match value {
            Value::Object(obj) if obj.keys().any(|k| k.starts_with('$')) => {
                let mut out = Vec::with_capacity(obj.len());
                for (op_key, op_val) in obj {
                    let operator = Self::map_operator(op_key)?;
                    if matches!(operator, FilterOp::In | FilterOp::NIn) && !op_val.is_array() {
                        return Err(FilterError::InvalidOperatorData(format!("{} requires array", op_key)));
                    }
                    out.push(Condition::field(field, operator, op_val.clone()));
                }
                Ok(out)
            }
            // Implicit equality: { field: value }
            _ => Ok(vec![Condition::field(field, FilterOp::Eq, value.clone())]),
        }
    }

    fn map_operator(op_key: &str) -> Result<FilterOp, FilterError> {
        Ok(match op_key {
            "$eq" => FilterOp::Eq,
            "$ne" | "$neq" => FilterOp::Ne,
            "$gt" => FilterOp::Gt,
            "$gte" => FilterOp::Gte,
            "$lt" => FilterOp::Lt,
            "$lte" => FilterOp::Lte,
            "$in" => FilterOp::In,
            "$nin" => FilterOp::NIn,
            "$exists" => FilterOp::Exists,
            other => return Err(FilterError::UnsupportedOperator(other.to_string())),
        })
    }

    /// Field names are spliced into SQL as literals, so only identifier characters pass.
    pub fn validate_column(column: &str) -> Result<(), FilterError> {
        let valid = !column.is_empty()
            && column.len() <= 64
            && column.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if valid {
            Ok(())
        } else {
            Err(FilterError::InvalidColumn(column.to_string()))
        }
    }
}
