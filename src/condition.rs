use std::str::FromStr;

use itertools::Itertools;

use crate::comparison::{check_condition, CompareOp};
use crate::errors::{MapperError, Result};
use crate::navigator;
use crate::path::Path;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Xor,
    Nor,
}

impl LogicalOp {
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "and" | "AND" => LogicalOp::And,
            "or" | "OR" => LogicalOp::Or,
            "xor" | "XOR" => LogicalOp::Xor,
            "nor" | "NOR" => LogicalOp::Nor,
            _ => return None,
        })
    }
}

/// A single `{op: operand}` test.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub op: CompareOp,
    pub operand: Value,
}

impl Comparison {
    pub fn new(op: CompareOp, operand: impl Into<Value>) -> Self {
        Self {
            op,
            operand: operand.into(),
        }
    }

    pub fn eq(operand: impl Into<Value>) -> Self {
        Self::new(CompareOp::Eq, operand)
    }

    pub fn neq(operand: impl Into<Value>) -> Self {
        Self::new(CompareOp::Neq, operand)
    }

    pub fn lt(operand: impl Into<Value>) -> Self {
        Self::new(CompareOp::Lt, operand)
    }

    pub fn lte(operand: impl Into<Value>) -> Self {
        Self::new(CompareOp::Lte, operand)
    }

    pub fn gt(operand: impl Into<Value>) -> Self {
        Self::new(CompareOp::Gt, operand)
    }

    pub fn gte(operand: impl Into<Value>) -> Self {
        Self::new(CompareOp::Gte, operand)
    }

    pub fn evaluate(&self, value: &Value) -> Result<bool> {
        check_condition(value, self.op, &self.operand)
    }
}

/// A predicate over one leaf: either a bare comparison, or one logical
/// operator over a flat list of comparisons. Logical operators do not nest.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare(Comparison),
    Logical {
        op: LogicalOp,
        operands: Vec<Comparison>,
    },
}

impl From<Comparison> for Condition {
    fn from(c: Comparison) -> Self {
        Condition::Compare(c)
    }
}

impl Condition {
    pub fn logical(op: LogicalOp, operands: impl IntoIterator<Item = Comparison>) -> Self {
        Condition::Logical {
            op,
            operands: operands.into_iter().collect(),
        }
    }

    pub fn and(operands: impl IntoIterator<Item = Comparison>) -> Self {
        Self::logical(LogicalOp::And, operands)
    }

    pub fn or(operands: impl IntoIterator<Item = Comparison>) -> Self {
        Self::logical(LogicalOp::Or, operands)
    }

    pub fn xor(operands: impl IntoIterator<Item = Comparison>) -> Self {
        Self::logical(LogicalOp::Xor, operands)
    }

    pub fn nor(operands: impl IntoIterator<Item = Comparison>) -> Self {
        Self::logical(LogicalOp::Nor, operands)
    }

    pub fn evaluate(&self, value: &Value) -> Result<bool> {
        let (op, operands) = match self {
            Condition::Compare(c) => return c.evaluate(value),
            Condition::Logical { op, operands } => (op, operands),
        };
        match op {
            LogicalOp::And => {
                for c in operands {
                    if !c.evaluate(value)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            LogicalOp::Or => {
                for c in operands {
                    if c.evaluate(value)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            // counts every operand, no short-circuit
            LogicalOp::Xor => {
                let mut satisfied = 0;
                for c in operands {
                    if c.evaluate(value)? {
                        satisfied += 1;
                    }
                }
                Ok(satisfied == 1)
            }
            LogicalOp::Nor => {
                for c in operands {
                    if c.evaluate(value)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }
}

fn comparisons_in(item: &Value) -> Result<Vec<Comparison>> {
    let map = item.as_object().ok_or_else(|| {
        MapperError::InvalidCondition(format!(
            "logical operands must be objects, found {}",
            item.type_name()
        ))
    })?;
    map.iter()
        .map(|(name, operand)| match CompareOp::parse(name) {
            Some(op) => Ok(Comparison::new(op, operand.clone())),
            None if LogicalOp::parse(name).is_some() => Err(MapperError::InvalidCondition(format!(
                "'{name}' cannot be nested inside another logical operator"
            ))),
            None => Err(MapperError::UnsupportedOperator(name.clone())),
        })
        .collect()
}

impl TryFrom<&Value> for Condition {
    type Error = MapperError;

    fn try_from(value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            MapperError::InvalidCondition(format!("expected an object, found {}", value.type_name()))
        })?;
        let (name, operand) = map.iter().exactly_one().map_err(|_| {
            MapperError::InvalidCondition(format!(
                "expected exactly one operator, found {}",
                map.len()
            ))
        })?;

        if let Some(op) = CompareOp::parse(name) {
            return Ok(Condition::Compare(Comparison::new(op, operand.clone())));
        }
        let op = LogicalOp::parse(name)
            .ok_or_else(|| MapperError::UnsupportedOperator(name.clone()))?;
        let items = operand.as_array().ok_or_else(|| {
            MapperError::InvalidCondition(format!("'{name}' expects an array of comparisons"))
        })?;

        let mut operands = Vec::with_capacity(items.len());
        for item in items {
            operands.extend(comparisons_in(item)?);
        }
        Ok(Condition::Logical { op, operands })
    }
}

impl TryFrom<Value> for Condition {
    type Error = MapperError;

    fn try_from(value: Value) -> Result<Self> {
        Condition::try_from(&value)
    }
}

impl FromStr for Condition {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Condition::try_from(&value)
    }
}

/// Every leaf under `start` that satisfies `condition`, as paths relative to
/// `start`. Array elements come out in order; object keys in sorted order.
///
/// A nested leaf whose type the condition cannot compare (an ordering operator
/// against a string, say) simply does not match. When `start` is itself a
/// leaf, that error is returned instead.
pub fn find_all_with_condition(
    root: &Value,
    start: &Path,
    condition: &Condition,
) -> Result<Vec<String>> {
    let subtree = navigator::find(root, start)?;
    let mut results = Vec::new();
    if subtree.is_leaf() {
        if condition.evaluate(subtree)? {
            results.push(String::new());
        }
        return Ok(results);
    }
    collect_matches(subtree, String::new(), condition, &mut results)?;
    Ok(results)
}

fn leaf_matches(leaf: &Value, condition: &Condition) -> Result<bool> {
    match condition.evaluate(leaf) {
        Err(e @ (MapperError::UnsupportedComparison { .. } | MapperError::InvalidNumericType(_))) => {
            tracing::trace!(error = %e, "leaf skipped");
            Ok(false)
        }
        other => other,
    }
}

fn collect_matches(
    node: &Value,
    path: String,
    condition: &Condition,
    out: &mut Vec<String>,
) -> Result<()> {
    match node {
        Value::Object(map) => {
            for (k, v) in map {
                let child = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                collect_matches(v, child, condition, out)?;
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                collect_matches(v, format!("{path}[{i}]"), condition, out)?;
            }
        }
        leaf => {
            if leaf_matches(leaf, condition)? {
                tracing::trace!(path = %path, "leaf matched");
                out.push(path);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn cond(j: serde_json::Value) -> Result<Condition> {
        Condition::try_from(&Value::from(j))
    }

    #[test]
    fn parses_flat_comparison() {
        assert_eq!(cond(json!({"gt": 25})).unwrap(), Condition::from(Comparison::gt(25)));
    }

    #[test]
    fn parses_logical_and_flattens_multi_entry_operands() {
        let c = cond(json!({"AND": [{"gt": 1, "lt": 9}, {"neq": 5}]})).unwrap();
        let Condition::Logical { op, operands } = c else {
            panic!("expected a logical condition");
        };
        assert_eq!(op, LogicalOp::And);
        assert_eq!(operands.len(), 3);
    }

    #[test]
    fn rejects_unknown_operators() {
        assert!(matches!(cond(json!({"like": "x"})), Err(MapperError::UnsupportedOperator(o)) if o == "like"));
        assert!(matches!(cond(json!({"nand": []})), Err(MapperError::UnsupportedOperator(_))));
        assert!(matches!(
            cond(json!({"or": [{"between": [1, 2]}]})),
            Err(MapperError::UnsupportedOperator(_))
        ));
    }

    #[test]
    fn rejects_malformed_shapes() {
        assert!(matches!(cond(json!([{"eq": 1}])), Err(MapperError::InvalidCondition(_))));
        assert!(matches!(cond(json!({})), Err(MapperError::InvalidCondition(_))));
        assert!(matches!(cond(json!({"eq": 1, "gt": 0})), Err(MapperError::InvalidCondition(_))));
        assert!(matches!(cond(json!({"and": {"eq": 1}})), Err(MapperError::InvalidCondition(_))));
        assert!(matches!(
            cond(json!({"and": [{"or": [{"eq": 1}]}]})),
            Err(MapperError::InvalidCondition(_))
        ));
    }

    #[test]
    fn from_str_decodes_json_text() {
        let c: Condition = r#"{"nor": [{"eq": "a"}, {"eq": "b"}]}"#.parse().unwrap();
        assert!(c.evaluate(&Value::from("c")).unwrap());
        assert!(!c.evaluate(&Value::from("a")).unwrap());
        assert!(matches!("{not json".parse::<Condition>(), Err(MapperError::Decode(_))));
    }

    #[test]
    fn empty_operand_lists() {
        let leaf = Value::from(1);
        let none = Vec::<Comparison>::new;
        assert!(Condition::and(none()).evaluate(&leaf).unwrap());
        assert!(Condition::nor(none()).evaluate(&leaf).unwrap());
        assert!(!Condition::or(none()).evaluate(&leaf).unwrap());
        assert!(!Condition::xor(none()).evaluate(&leaf).unwrap());
    }

    #[test]
    fn xor_needs_exactly_one() {
        let leaf = Value::from(10);
        let one = Condition::xor([Comparison::gt(5), Comparison::lt(5)]);
        let two = Condition::xor([Comparison::gt(5), Comparison::lt(50)]);
        assert!(one.evaluate(&leaf).unwrap());
        assert!(!two.evaluate(&leaf).unwrap());
    }

    #[test]
    fn and_stops_before_a_failing_operand() {
        // the string comparison is never reached
        let c = Condition::and([Comparison::gt(100), Comparison::gt("x")]);
        assert!(!c.evaluate(&Value::from(1)).unwrap());
    }

    #[test]
    fn collects_paths_in_sequence_order() {
        let doc = Value::from(json!({"a": {"b": 1, "c": [20, 30, 40]}}));
        let found =
            find_all_with_condition(&doc, &Path::parse("a"), &Comparison::gt(25).into()).unwrap();
        assert_eq!(found, vec!["c[1]", "c[2]"]);
    }

    #[test]
    fn paths_from_root_use_dots_and_brackets() {
        let doc = Value::from(json!({"s": [{"id": 1}, {"id": 3}], "n": {"id": 3}}));
        let found = find_all_with_condition(&doc, &Path::default(), &Comparison::eq(3).into()).unwrap();
        assert_eq!(found, vec!["n.id", "s[1].id"]);
    }

    #[test]
    fn incomparable_nested_leaves_do_not_match() {
        let doc = Value::from(json!({"name": "x", "n": 1, "on": true, "list": ["y", 5]}));
        let found =
            find_all_with_condition(&doc, &Path::default(), &Comparison::gt(0).into()).unwrap();
        assert_eq!(found, vec!["list[1]", "n"]);
    }

    #[test]
    fn numeric_range_over_mixed_object() {
        let doc = Value::from(json!({"testData": {
            "number": 25, "string": "hello", "bool": true,
            "nested": {"number": 15, "string": "world"}
        }}));
        let range = Condition::and([Comparison::gt(20), Comparison::lt(30)]);
        let found = find_all_with_condition(&doc, &Path::parse("testData"), &range).unwrap();
        assert_eq!(found, vec!["number"]);
    }

    #[test]
    fn scalar_start_keeps_leaf_errors() {
        let doc = Value::from(json!({"name": "x"}));
        let err = find_all_with_condition(&doc, &Path::parse("name"), &Comparison::gt(0).into())
            .unwrap_err();
        assert!(matches!(err, MapperError::UnsupportedComparison { op: "gt", found: "string" }));
    }

    #[test]
    fn missing_start_path() {
        let doc = Value::from(json!({"a": 1}));
        let err = find_all_with_condition(&doc, &Path::parse("b"), &Comparison::eq(1).into())
            .unwrap_err();
        assert!(matches!(err, MapperError::KeyNotFound(_)));
    }
}
