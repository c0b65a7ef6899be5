//! Binary and unary operators over dynamic values

use super::error::{EvalResult, EvaluatorError};
use crate::config::compile_time::evaluation::{MAX_COLLECTION_SIZE, MAX_REPEAT_LENGTH};
use crate::syntax::{BinaryOp, UnaryOp};
use crate::values::Value;

#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn of(value: &Value) -> Option<Number> {
        match value {
            Value::Float(x) => Some(Number::Float(*x)),
            other => other.as_i64().map(Number::Int),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(x) => x,
        }
    }
}

fn unsupported(op: BinaryOp, left: &Value, right: &Value) -> EvaluatorError {
    EvaluatorError::type_error(format!(
        "unsupported operand type(s) for {}: '{}' and '{}'",
        op.symbol(),
        left.type_name(),
        right.type_name()
    ))
}

fn int_overflow() -> EvaluatorError {
    EvaluatorError::overflow("integer result out of range")
}

pub fn unary(op: UnaryOp, operand: &Value) -> EvalResult<Value> {
    match (op, Number::of(operand)) {
        (UnaryOp::Neg, Some(Number::Int(i))) => i.checked_neg().map(Value::Int).ok_or_else(int_overflow),
        (UnaryOp::Neg, Some(Number::Float(x))) => Ok(Value::Float(-x)),
        (UnaryOp::Pos, Some(Number::Int(i))) => Ok(Value::Int(i)),
        (UnaryOp::Pos, Some(Number::Float(x))) => Ok(Value::Float(x)),
        (op, None) => {
            let symbol = match op {
                UnaryOp::Neg => "-",
                UnaryOp::Pos => "+",
            };
            Err(EvaluatorError::type_error(format!(
                "bad operand type for unary {}: '{}'",
                symbol,
                operand.type_name()
            )))
        }
    }
}

pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Value> {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Mul => multiply(left, right),
        BinaryOp::BitOr | BinaryOp::BitAnd => bitwise(op, left, right),
        _ => match (Number::of(left), Number::of(right)) {
            (Some(a), Some(b)) => numeric(op, a, b),
            _ => Err(unsupported(op, left, right)),
        },
    }
}

fn add(left: &Value, right: &Value) -> EvalResult<Value> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => {
            check_string_length(a.len() + b.len())?;
            Ok(Value::Str(format!("{}{}", a, b)))
        }
        (Value::Str(_), other) => Err(EvaluatorError::type_error(format!(
            "can only concatenate str (not \"{}\") to str",
            other.type_name()
        ))),
        (Value::List(a), Value::List(b)) => {
            check_collection_size(a.len() + b.len())?;
            Ok(Value::List(a.iter().chain(b.iter()).cloned().collect()))
        }
        (Value::List(_), other) => Err(EvaluatorError::type_error(format!(
            "can only concatenate list (not \"{}\") to list",
            other.type_name()
        ))),
        _ => match (Number::of(left), Number::of(right)) {
            (Some(a), Some(b)) => numeric(BinaryOp::Add, a, b),
            _ => Err(unsupported(BinaryOp::Add, left, right)),
        },
    }
}

fn multiply(left: &Value, right: &Value) -> EvalResult<Value> {
    match (left, right) {
        (Value::Str(s), count) | (count, Value::Str(s)) if count.as_i64().is_some() => {
            let times = repeat_count(count);
            check_string_length(s.len().saturating_mul(times))?;
            Ok(Value::Str(s.repeat(times)))
        }
        (Value::List(items), count) | (count, Value::List(items)) if count.as_i64().is_some() => {
            let times = repeat_count(count);
            check_collection_size(items.len().saturating_mul(times))?;
            let mut repeated = Vec::with_capacity(items.len() * times);
            for _ in 0..times {
                repeated.extend(items.iter().cloned());
            }
            Ok(Value::List(repeated))
        }
        _ => match (Number::of(left), Number::of(right)) {
            (Some(a), Some(b)) => numeric(BinaryOp::Mul, a, b),
            _ => Err(unsupported(BinaryOp::Mul, left, right)),
        },
    }
}

/// Negative repeat counts produce an empty result
fn repeat_count(count: &Value) -> usize {
    count
        .as_i64()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0)
}

fn check_string_length(length: usize) -> EvalResult<()> {
    if length > MAX_REPEAT_LENGTH {
        return Err(EvaluatorError::limit_exceeded(format!(
            "string result of {} bytes exceeds limit of {}",
            length, MAX_REPEAT_LENGTH
        )));
    }
    Ok(())
}

pub(crate) fn check_collection_size(size: usize) -> EvalResult<()> {
    if size > MAX_COLLECTION_SIZE {
        return Err(EvaluatorError::limit_exceeded(format!(
            "collection of {} items exceeds limit of {}",
            size, MAX_COLLECTION_SIZE
        )));
    }
    Ok(())
}

fn bitwise(op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Value> {
    match (left, right) {
        (Value::Flags(a), Value::Flags(b)) => {
            let combined = match op {
                BinaryOp::BitOr => a.union(b)?,
                _ => a.intersection(b)?,
            };
            Ok(Value::Flags(combined))
        }
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(match op {
            BinaryOp::BitOr => a | b,
            _ => a & b,
        })),
        (Value::Bool(_) | Value::Int(_), Value::Bool(_) | Value::Int(_)) => {
            let (a, b) = (left.as_i64(), right.as_i64());
            match (a, b) {
                (Some(a), Some(b)) => Ok(Value::Int(match op {
                    BinaryOp::BitOr => a | b,
                    _ => a & b,
                })),
                _ => Err(unsupported(op, left, right)),
            }
        }
        _ => Err(unsupported(op, left, right)),
    }
}

fn numeric(op: BinaryOp, a: Number, b: Number) -> EvalResult<Value> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => integer(op, x, y),
        _ => float(op, a.as_f64(), b.as_f64()),
    }
}

fn integer(op: BinaryOp, x: i64, y: i64) -> EvalResult<Value> {
    let result = match op {
        BinaryOp::Add => x.checked_add(y),
        BinaryOp::Sub => x.checked_sub(y),
        BinaryOp::Mul => x.checked_mul(y),
        BinaryOp::Div => return float(op, x as f64, y as f64),
        BinaryOp::FloorDiv => {
            if y == 0 {
                return Err(EvaluatorError::zero_division(
                    "integer division or modulo by zero",
                ));
            }
            x.checked_div(y).map(|q| if x % y != 0 && (x < 0) != (y < 0) { q - 1 } else { q })
        }
        BinaryOp::Mod => {
            if y == 0 {
                return Err(EvaluatorError::zero_division("integer modulo by zero"));
            }
            x.checked_rem(y).map(|r| if r != 0 && (r < 0) != (y < 0) { r + y } else { r })
        }
        BinaryOp::Pow => {
            if y < 0 {
                return float(op, x as f64, y as f64);
            }
            u32::try_from(y).ok().and_then(|e| x.checked_pow(e))
        }
        BinaryOp::BitOr => Some(x | y),
        BinaryOp::BitAnd => Some(x & y),
    };
    result.map(Value::Int).ok_or_else(int_overflow)
}

fn float(op: BinaryOp, x: f64, y: f64) -> EvalResult<Value> {
    let result = match op {
        BinaryOp::Add => x + y,
        BinaryOp::Sub => x - y,
        BinaryOp::Mul => x * y,
        BinaryOp::Div => {
            if y == 0.0 {
                return Err(EvaluatorError::zero_division("division by zero"));
            }
            x / y
        }
        BinaryOp::FloorDiv => {
            if y == 0.0 {
                return Err(EvaluatorError::zero_division("float floor division by zero"));
            }
            (x / y).floor()
        }
        BinaryOp::Mod => {
            if y == 0.0 {
                return Err(EvaluatorError::zero_division("float modulo"));
            }
            let r = x % y;
            if r != 0.0 && (r < 0.0) != (y < 0.0) {
                r + y
            } else {
                r
            }
        }
        BinaryOp::Pow => {
            if x == 0.0 && y < 0.0 {
                return Err(EvaluatorError::zero_division(
                    "0.0 cannot be raised to a negative power",
                ));
            }
            if x < 0.0 && y.fract() != 0.0 {
                return Err(EvaluatorError::value_error(
                    "negative number cannot be raised to a fractional power",
                ));
            }
            let result = x.powf(y);
            if result.is_infinite() && x.is_finite() && y.is_finite() {
                return Err(EvaluatorError::overflow("numerical result out of range"));
            }
            result
        }
        BinaryOp::BitOr | BinaryOp::BitAnd => {
            return Err(EvaluatorError::type_error(format!(
                "unsupported operand type(s) for {}: 'float' and 'float'",
                op.symbol()
            )))
        }
    };
    Ok(Value::Float(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::FlagSet;
    use assert_matches::assert_matches;

    fn int(i: i64) -> Value {
        Value::Int(i)
    }

    #[test]
    fn test_floor_division_and_modulo_follow_floor_semantics() {
        assert_eq!(binary(BinaryOp::FloorDiv, &int(7), &int(2)).unwrap(), int(3));
        assert_eq!(binary(BinaryOp::FloorDiv, &int(-7), &int(2)).unwrap(), int(-4));
        assert_eq!(binary(BinaryOp::FloorDiv, &int(7), &int(-2)).unwrap(), int(-4));
        assert_eq!(binary(BinaryOp::FloorDiv, &int(-7), &int(-2)).unwrap(), int(3));
        assert_eq!(binary(BinaryOp::Mod, &int(-7), &int(2)).unwrap(), int(1));
        assert_eq!(binary(BinaryOp::Mod, &int(7), &int(-2)).unwrap(), int(-1));
        assert_eq!(
            binary(BinaryOp::Mod, &Value::Float(-7.5), &int(2)).unwrap(),
            Value::Float(0.5)
        );
    }

    #[test]
    fn test_true_division_yields_float() {
        assert_eq!(binary(BinaryOp::Div, &int(7), &int(2)).unwrap(), Value::Float(3.5));
        assert_matches!(binary(BinaryOp::Div, &int(1), &int(0)), Err(EvaluatorError::ZeroDivision { .. }));
    }

    #[test]
    fn test_power() {
        assert_eq!(binary(BinaryOp::Pow, &int(2), &int(10)).unwrap(), int(1024));
        assert_eq!(binary(BinaryOp::Pow, &int(2), &int(-1)).unwrap(), Value::Float(0.5));
        assert_matches!(binary(BinaryOp::Pow, &int(0), &int(-1)), Err(EvaluatorError::ZeroDivision { .. }));
        assert_matches!(binary(BinaryOp::Pow, &int(10), &int(40)), Err(EvaluatorError::Overflow { .. }));
    }

    #[test]
    fn test_integer_overflow_is_reported() {
        assert_matches!(binary(BinaryOp::Add, &int(i64::MAX), &int(1)), Err(EvaluatorError::Overflow { .. }));
        assert_matches!(unary(UnaryOp::Neg, &int(i64::MIN)), Err(EvaluatorError::Overflow { .. }));
    }

    #[test]
    fn test_string_and_list_operators() {
        assert_eq!(
            binary(BinaryOp::Add, &Value::str("ab"), &Value::str("cd")).unwrap(),
            Value::str("abcd")
        );
        assert_eq!(binary(BinaryOp::Mul, &Value::str("ab"), &int(3)).unwrap(), Value::str("ababab"));
        assert_eq!(binary(BinaryOp::Mul, &int(-1), &Value::str("ab")).unwrap(), Value::str(""));
        assert_eq!(
            binary(BinaryOp::Add, &Value::list([1i64]), &Value::list([2i64])).unwrap(),
            Value::list([1i64, 2])
        );
        let error = binary(BinaryOp::Add, &Value::str("a"), &int(1)).unwrap_err();
        assert_eq!(error.to_string(), "can only concatenate str (not \"int\") to str");
    }

    #[test]
    fn test_repeat_limit() {
        assert_matches!(
            binary(BinaryOp::Mul, &Value::str("ab"), &int(MAX_REPEAT_LENGTH as i64)),
            Err(EvaluatorError::LimitExceeded { .. })
        );
    }

    #[test]
    fn test_mixed_numeric_promotes_to_float() {
        assert_eq!(binary(BinaryOp::Add, &int(1), &Value::Float(0.5)).unwrap(), Value::Float(1.5));
        assert_eq!(binary(BinaryOp::Add, &Value::Bool(true), &int(1)).unwrap(), int(2));
    }

    #[test]
    fn test_bitwise_on_ints_bools_and_flags() {
        assert_eq!(binary(BinaryOp::BitOr, &int(4), &int(1)).unwrap(), int(5));
        assert_eq!(
            binary(BinaryOp::BitAnd, &Value::Bool(true), &Value::Bool(false)).unwrap(),
            Value::Bool(false)
        );

        let perms = FlagSet::new("Perm", [("R", 4), ("W", 2), ("X", 1)]);
        let read = Value::Flags(perms.member("R").unwrap());
        let write = Value::Flags(perms.member("W").unwrap());
        let combined = binary(BinaryOp::BitOr, &read, &write).unwrap();
        assert_eq!(combined.to_string(), "Perm.R|W");
        assert_eq!(binary(BinaryOp::BitAnd, &combined, &read).unwrap(), read);
    }

    #[test]
    fn test_unsupported_operands() {
        let error = binary(BinaryOp::Sub, &Value::str("a"), &int(1)).unwrap_err();
        assert_eq!(
            error.to_string(),
            "unsupported operand type(s) for -: 'str' and 'int'"
        );
        assert_matches!(unary(UnaryOp::Neg, &Value::str("a")), Err(EvaluatorError::TypeError { .. }));
    }
}
