//! Attribute filter expressions, evaluated by the storage engine.

use tokio_rusqlite::rusqlite::types::Value;

/// A filter predicate over record attributes.
///
/// Built by the query engine (substring containment on the body, equality
/// on the work id, AND-composition) and compiled to SQL by the backend so
/// the filtering happens inside the storage engine, not client-side.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    Contains { attr: &'static str, needle: String },
    Eq { attr: &'static str, value: u64 },
    And(Box<FilterExpr>, Box<FilterExpr>),
}

impl FilterExpr {
    /// Substring containment on a text attribute.
    pub fn contains(attr: &'static str, needle: impl Into<String>) -> Self {
        FilterExpr::Contains { attr, needle: needle.into() }
    }

    /// Equality on an integer attribute.
    pub fn eq(attr: &'static str, value: u64) -> Self {
        FilterExpr::Eq { attr, value }
    }

    /// Conjunction of two predicates.
    pub fn and(self, other: Self) -> Self {
        FilterExpr::And(Box::new(self), Box::new(other))
    }

    /// Compile to a SQL predicate with positional parameters.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut params = Vec::new();
        let sql = self.push_sql(&mut params);
        (sql, params)
    }

    fn push_sql(&self, params: &mut Vec<Value>) -> String {
        match self {
            // An empty needle matches everything; compile it to a
            // trivially-true clause instead of relying on instr("", ...)
            // semantics.
            FilterExpr::Contains { needle, .. } if needle.is_empty() => "1 = 1".to_string(),
            FilterExpr::Contains { attr, needle } => {
                params.push(Value::Text(needle.clone()));
                format!("instr({attr}, ?) > 0")
            }
            FilterExpr::Eq { attr, value } => {
                params.push(Value::Integer(*value as i64));
                format!("{attr} = ?")
            }
            FilterExpr::And(lhs, rhs) => {
                let lhs = lhs.push_sql(params);
                let rhs = rhs.push_sql(params);
                format!("({lhs} AND {rhs})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_sql() {
        let (sql, params) = FilterExpr::contains("body", "apple").to_sql();
        assert_eq!(sql, "instr(body, ?) > 0");
        assert_eq!(params, vec![Value::Text("apple".to_string())]);
    }

    #[test]
    fn test_empty_needle_is_trivially_true() {
        let (sql, params) = FilterExpr::contains("body", "").to_sql();
        assert_eq!(sql, "1 = 1");
        assert!(params.is_empty());
    }

    #[test]
    fn test_eq_sql() {
        let (sql, params) = FilterExpr::eq("work_id", 123).to_sql();
        assert_eq!(sql, "work_id = ?");
        assert_eq!(params, vec![Value::Integer(123)]);
    }

    #[test]
    fn test_and_parameter_order() {
        let filter = FilterExpr::contains("body", "a")
            .and(FilterExpr::contains("body", "b"))
            .and(FilterExpr::eq("work_id", 9));
        let (sql, params) = filter.to_sql();

        assert_eq!(sql, "((instr(body, ?) > 0 AND instr(body, ?) > 0) AND work_id = ?)");
        assert_eq!(
            params,
            vec![Value::Text("a".to_string()), Value::Text("b".to_string()), Value::Integer(9)]
        );
    }
}
