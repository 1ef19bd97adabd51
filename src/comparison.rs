use crate::errors::{MapperError, Result};
use crate::value::{to_float64, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "eq" => CompareOp::Eq,
            "neq" => CompareOp::Neq,
            "lt" => CompareOp::Lt,
            "lte" => CompareOp::Lte,
            "gt" => CompareOp::Gt,
            "gte" => CompareOp::Gte,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Neq => "neq",
            CompareOp::Lt => "lt",
            CompareOp::Lte => "lte",
            CompareOp::Gt => "gt",
            CompareOp::Gte => "gte",
        }
    }
}

/// Compare a leaf value against an operand.
///
/// `eq` goes numeric when both sides are numbers and structural otherwise.
/// `neq` is true as soon as the two sides differ in type, so it is not always
/// the negation of `eq`. Ordering operators only accept numbers.
pub fn check_condition(value: &Value, op: CompareOp, operand: &Value) -> Result<bool> {
    match op {
        CompareOp::Eq => {
            if value.is_number() && operand.is_number() {
                Ok(to_float64(value)? == to_float64(operand)?)
            } else {
                Ok(value == operand)
            }
        }
        CompareOp::Neq => {
            if !value.same_type(operand) {
                return Ok(true);
            }
            Ok(value != operand)
        }
        CompareOp::Lt | CompareOp::Lte | CompareOp::Gt | CompareOp::Gte => {
            let non_numeric = [value, operand].into_iter().find(|v| !v.is_number());
            if let Some(v) = non_numeric {
                return Err(MapperError::UnsupportedComparison {
                    op: op.as_str(),
                    found: v.type_name(),
                });
            }
            let (a, b) = (to_float64(value)?, to_float64(operand)?);
            Ok(match op {
                CompareOp::Lt => a < b,
                CompareOp::Lte => a <= b,
                CompareOp::Gt => a > b,
                _ => a >= b,
            })
        }
    }
}
