//! Tree-walking interpreter over parsed expressions

use super::arithmetic;
use super::builtins;
use super::error::{EvalResult, EvaluatorError};
use super::Namespace;
use crate::config::compile_time::evaluation::MAX_CALL_DEPTH;
use crate::syntax::{BoolOp, CompareOp, Expr, ExprKind};
use crate::values::{OrderOp, Value};
use std::collections::BTreeMap;

pub struct Interpreter<'a> {
    namespace: &'a Namespace,
    call_depth: usize,
}

impl<'a> Interpreter<'a> {
    pub fn new(namespace: &'a Namespace) -> Self {
        Self {
            namespace,
            call_depth: 0,
        }
    }

    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::Literal(value) => Ok(value.clone()),
            ExprKind::Name(name) => {
                self.namespace
                    .get(name)
                    .cloned()
                    .ok_or_else(|| EvaluatorError::NameError { name: name.clone() })
            }
            ExprKind::List(items) | ExprKind::Tuple(items) => {
                Ok(Value::List(self.eval_all(items)?))
            }
            ExprKind::Dict(entries) => {
                let mut map = BTreeMap::new();
                for (key, value) in entries {
                    let key = match self.eval(key)? {
                        Value::Str(s) => s,
                        other => {
                            return Err(EvaluatorError::type_error(format!(
                                "dict keys must be str, not '{}'",
                                other.type_name()
                            )))
                        }
                    };
                    map.insert(key, self.eval(value)?);
                }
                Ok(Value::Dict(map))
            }
            ExprKind::Unary { op, operand } => arithmetic::unary(*op, &self.eval(operand)?),
            ExprKind::Not(operand) => Ok(Value::Bool(!self.eval(operand)?.is_truthy())),
            ExprKind::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                arithmetic::binary(*op, &left, &right)
            }
            ExprKind::Logical { op, left, right } => {
                let left = self.eval(left)?;
                // Short-circuit returns the deciding operand itself
                match (op, left.is_truthy()) {
                    (BoolOp::And, false) | (BoolOp::Or, true) => Ok(left),
                    _ => self.eval(right),
                }
            }
            ExprKind::Compare { first, rest } => {
                let mut left = self.eval(first)?;
                for (op, operand) in rest {
                    let right = self.eval(operand)?;
                    if !compare(*op, &left, &right)? {
                        return Ok(Value::Bool(false));
                    }
                    left = right;
                }
                Ok(Value::Bool(true))
            }
            ExprKind::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval(condition)?.is_truthy() {
                    self.eval(then_branch)
                } else {
                    self.eval(else_branch)
                }
            }
            ExprKind::Subscript { target, index } => {
                let target = self.eval(target)?;
                let index = self.eval(index)?;
                subscript(&target, &index)
            }
            ExprKind::Slice {
                target,
                start,
                stop,
                step,
            } => {
                let target = self.eval(target)?;
                let start = self.eval_bound(start.as_deref())?;
                let stop = self.eval_bound(stop.as_deref())?;
                let step = self.eval_bound(step.as_deref())?;
                slice(&target, start, stop, step)
            }
            ExprKind::Call { function, args } => {
                self.enter_call()?;
                let result = self
                    .eval_all(args)
                    .and_then(|args| builtins::call_function(function, args));
                self.call_depth -= 1;
                result
            }
            ExprKind::MethodCall {
                receiver,
                method,
                args,
            } => {
                self.enter_call()?;
                let result = self.eval(receiver).and_then(|receiver| {
                    let args = self.eval_all(args)?;
                    builtins::call_method(&receiver, method, args)
                });
                self.call_depth -= 1;
                result
            }
        }
    }

    fn eval_all(&mut self, exprs: &[Expr]) -> EvalResult<Vec<Value>> {
        exprs.iter().map(|e| self.eval(e)).collect()
    }

    fn eval_bound(&mut self, bound: Option<&Expr>) -> EvalResult<Option<i64>> {
        let value = match bound {
            Some(expr) => self.eval(expr)?,
            None => return Ok(None),
        };
        match value {
            Value::None => Ok(None),
            other => other.as_i64().map(Some).ok_or_else(|| {
                EvaluatorError::type_error(
                    "slice indices must be integers or None or have an __index__ method",
                )
            }),
        }
    }

    fn enter_call(&mut self) -> EvalResult<()> {
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(EvaluatorError::limit_exceeded(format!(
                "maximum call depth of {} exceeded",
                MAX_CALL_DEPTH
            )));
        }
        self.call_depth += 1;
        Ok(())
    }
}

fn compare(op: CompareOp, left: &Value, right: &Value) -> EvalResult<bool> {
    let order = |o: OrderOp| left.compare_order(o, right);
    let result = match op {
        CompareOp::Eq => left == right,
        CompareOp::NotEq => left != right,
        CompareOp::Lt => order(OrderOp::Lt)?,
        CompareOp::Gt => order(OrderOp::Gt)?,
        CompareOp::Le => order(OrderOp::Le)?,
        CompareOp::Ge => order(OrderOp::Ge)?,
        CompareOp::In => right.contains(left)?,
        CompareOp::NotIn => !right.contains(left)?,
        CompareOp::Is => identical(left, right),
        CompareOp::IsNot => !identical(left, right),
    };
    Ok(result)
}

/// Identity holds only for the singletons `None`, `True` and `False`
fn identical(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::None, Value::None) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        _ => false,
    }
}

fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let adjusted = if index < 0 { index + len } else { index };
    if (0..len).contains(&adjusted) {
        usize::try_from(adjusted).ok()
    } else {
        None
    }
}

fn subscript(target: &Value, index: &Value) -> EvalResult<Value> {
    match target {
        Value::List(items) => {
            let i = integer_index("list", index)?;
            normalize_index(i, items.len())
                .map(|i| items[i].clone())
                .ok_or_else(|| EvaluatorError::index_error("list index out of range"))
        }
        Value::Str(s) => {
            let i = integer_index("string", index)?;
            let chars: Vec<char> = s.chars().collect();
            normalize_index(i, chars.len())
                .map(|i| Value::Str(chars[i].to_string()))
                .ok_or_else(|| EvaluatorError::index_error("string index out of range"))
        }
        Value::Dict(entries) => {
            let found = match index {
                Value::Str(key) => entries.get(key),
                _ => None,
            };
            found.cloned().ok_or_else(|| EvaluatorError::KeyError { key: index.repr() })
        }
        other => Err(EvaluatorError::type_error(format!(
            "'{}' object is not subscriptable",
            other.type_name()
        ))),
    }
}

fn integer_index(kind: &str, index: &Value) -> EvalResult<i64> {
    index.as_i64().ok_or_else(|| {
        EvaluatorError::type_error(format!(
            "{} indices must be integers, not '{}'",
            kind,
            index.type_name()
        ))
    })
}

/// Positions selected by `[start:stop:step]` over a sequence of `len` items
fn slice_positions(
    len: usize,
    start: Option<i64>,
    stop: Option<i64>,
    step: Option<i64>,
) -> EvalResult<Vec<usize>> {
    let step = step.unwrap_or(1);
    if step == 0 {
        return Err(EvaluatorError::value_error("slice step cannot be zero"));
    }
    let len = i64::try_from(len).map_err(|_| EvaluatorError::overflow("sequence too long"))?;

    let clamp = |bound: i64, low: i64, high: i64| {
        let bound = if bound < 0 { bound + len } else { bound };
        bound.clamp(low, high)
    };

    let mut positions = Vec::new();
    if step > 0 {
        let mut i = start.map(|s| clamp(s, 0, len)).unwrap_or(0);
        let end = stop.map(|s| clamp(s, 0, len)).unwrap_or(len);
        while i < end {
            positions.push(i as usize);
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }
    } else {
        let mut i = start.map(|s| clamp(s, -1, len - 1)).unwrap_or(len - 1);
        let end = stop.map(|s| clamp(s, -1, len - 1)).unwrap_or(-1);
        while i > end {
            positions.push(i as usize);
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }
    }
    Ok(positions)
}

fn slice(
    target: &Value,
    start: Option<i64>,
    stop: Option<i64>,
    step: Option<i64>,
) -> EvalResult<Value> {
    match target {
        Value::List(items) => {
            let positions = slice_positions(items.len(), start, stop, step)?;
            Ok(Value::List(positions.into_iter().map(|i| items[i].clone()).collect()))
        }
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            let positions = slice_positions(chars.len(), start, stop, step)?;
            Ok(Value::Str(positions.into_iter().map(|i| chars[i]).collect()))
        }
        other => Err(EvaluatorError::type_error(format!(
            "'{}' object is not subscriptable",
            other.type_name()
        ))),
    }
}
