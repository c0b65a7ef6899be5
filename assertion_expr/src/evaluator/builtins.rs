//! Builtin functions and methods callable from expressions

use super::arithmetic::check_collection_size;
use super::error::{EvalResult, EvaluatorError};
use crate::values::{sort_values, OrderOp, Value};

fn arity(name: &str, args: &[Value], min: usize, max: usize) -> EvalResult<()> {
    let given = args.len();
    if given >= min && given <= max {
        return Ok(());
    }
    let expected = match (min, max) {
        (0, 1) => "at most 1 argument".to_string(),
        (a, b) if a == b && a == 1 => "exactly one argument".to_string(),
        (a, b) if a == b => format!("exactly {} arguments", a),
        (a, usize::MAX) => format!("at least {} argument{}", a, if a == 1 { "" } else { "s" }),
        (a, b) => format!("from {} to {} arguments", a, b),
    };
    Err(EvaluatorError::type_error(format!(
        "{}() takes {} ({} given)",
        name, expected, given
    )))
}

/// Items produced by iterating a value: list elements, string characters,
/// dict keys or the individual members of a flag set
pub fn iterate(value: &Value) -> EvalResult<Vec<Value>> {
    match value {
        Value::List(items) => Ok(items.clone()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::Str(c.to_string())).collect()),
        Value::Dict(entries) => Ok(entries.keys().cloned().map(Value::Str).collect()),
        Value::Flags(flags) => Ok(flags
            .members()
            .filter_map(|name| flags.member(name).ok())
            .filter(|member| !member.is_empty() && member.is_subset_of(flags))
            .map(Value::Flags)
            .collect()),
        other => Err(EvaluatorError::type_error(format!(
            "'{}' object is not iterable",
            other.type_name()
        ))),
    }
}

// ============================================================================
// FUNCTIONS
// ============================================================================

pub fn call_function(name: &str, args: Vec<Value>) -> EvalResult<Value> {
    match name {
        "len" => {
            arity(name, &args, 1, 1)?;
            length(&args[0])
        }
        "str" => {
            arity(name, &args, 0, 1)?;
            Ok(Value::Str(args.first().map(Value::to_string).unwrap_or_default()))
        }
        "int" => {
            arity(name, &args, 0, 1)?;
            args.first().map(to_int).unwrap_or(Ok(Value::Int(0)))
        }
        "float" => {
            arity(name, &args, 0, 1)?;
            args.first().map(to_float).unwrap_or(Ok(Value::Float(0.0)))
        }
        "bool" => {
            arity(name, &args, 0, 1)?;
            Ok(Value::Bool(args.first().map(Value::is_truthy).unwrap_or(false)))
        }
        "abs" => {
            arity(name, &args, 1, 1)?;
            absolute(&args[0])
        }
        "min" => extreme(name, args, OrderOp::Lt),
        "max" => extreme(name, args, OrderOp::Gt),
        "sorted" => {
            arity(name, &args, 1, 1)?;
            Ok(Value::List(sort_values(iterate(&args[0])?)?))
        }
        "list" => {
            arity(name, &args, 0, 1)?;
            args.first().map(iterate).unwrap_or(Ok(Vec::new())).map(Value::List)
        }
        "any" => {
            arity(name, &args, 1, 1)?;
            Ok(Value::Bool(iterate(&args[0])?.iter().any(Value::is_truthy)))
        }
        "all" => {
            arity(name, &args, 1, 1)?;
            Ok(Value::Bool(iterate(&args[0])?.iter().all(Value::is_truthy)))
        }
        other => Err(EvaluatorError::NameError {
            name: other.to_string(),
        }),
    }
}

fn length(value: &Value) -> EvalResult<Value> {
    let len = match value {
        Value::Str(s) => s.chars().count(),
        Value::List(items) => items.len(),
        Value::Dict(entries) => entries.len(),
        Value::Flags(flags) => flags.flag_names().len(),
        other => {
            return Err(EvaluatorError::type_error(format!(
                "object of type '{}' has no len()",
                other.type_name()
            )))
        }
    };
    i64::try_from(len)
        .map(Value::Int)
        .map_err(|_| EvaluatorError::overflow("length does not fit in an integer"))
}

fn to_int(value: &Value) -> EvalResult<Value> {
    match value {
        Value::Int(i) => Ok(Value::Int(*i)),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Float(x) => float_to_int(*x),
        Value::Flags(flags) => i64::try_from(flags.bits())
            .map(Value::Int)
            .map_err(|_| EvaluatorError::overflow("flag bits do not fit in an integer")),
        Value::Str(s) => s
            .trim()
            .replace('_', "")
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| {
                EvaluatorError::value_error(format!(
                    "invalid literal for int() with base 10: {}",
                    value.repr()
                ))
            }),
        other => Err(EvaluatorError::type_error(format!(
            "int() argument must be a string or a number, not '{}'",
            other.type_name()
        ))),
    }
}

fn float_to_int(x: f64) -> EvalResult<Value> {
    if x.is_nan() {
        return Err(EvaluatorError::value_error("cannot convert float NaN to integer"));
    }
    if x.is_infinite() {
        return Err(EvaluatorError::overflow("cannot convert float infinity to integer"));
    }
    let truncated = x.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(EvaluatorError::overflow("integer result out of range"));
    }
    Ok(Value::Int(truncated as i64))
}

fn to_float(value: &Value) -> EvalResult<Value> {
    match value {
        Value::Float(x) => Ok(Value::Float(*x)),
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| {
                EvaluatorError::value_error(format!(
                    "could not convert string to float: {}",
                    value.repr()
                ))
            }),
        other => other.as_f64().map(Value::Float).ok_or_else(|| {
            EvaluatorError::type_error(format!(
                "float() argument must be a string or a number, not '{}'",
                other.type_name()
            ))
        }),
    }
}

fn absolute(value: &Value) -> EvalResult<Value> {
    match value {
        Value::Float(x) => Ok(Value::Float(x.abs())),
        other => match other.as_i64() {
            Some(i) => i
                .checked_abs()
                .map(Value::Int)
                .ok_or_else(|| EvaluatorError::overflow("integer result out of range")),
            None => Err(EvaluatorError::type_error(format!(
                "bad operand type for abs(): '{}'",
                other.type_name()
            ))),
        },
    }
}

/// `min`/`max`: first item for which no later item compares `op`
fn extreme(name: &str, args: Vec<Value>, op: OrderOp) -> EvalResult<Value> {
    arity(name, &args, 1, usize::MAX)?;
    let candidates = if args.len() == 1 {
        iterate(&args[0])?
    } else {
        args
    };

    let mut iter = candidates.into_iter();
    let mut best = iter
        .next()
        .ok_or_else(|| EvaluatorError::value_error(format!("{}() arg is an empty sequence", name)))?;
    for candidate in iter {
        if candidate.compare_order(op, &best)? {
            best = candidate;
        }
    }
    Ok(best)
}

// ============================================================================
// METHODS
// ============================================================================

pub fn call_method(receiver: &Value, method: &str, args: Vec<Value>) -> EvalResult<Value> {
    match receiver {
        Value::Str(s) => string_method(s, method, args),
        Value::Dict(entries) => match method {
            "keys" => {
                arity(method, &args, 0, 0)?;
                Ok(Value::List(entries.keys().cloned().map(Value::Str).collect()))
            }
            "values" => {
                arity(method, &args, 0, 0)?;
                Ok(Value::List(entries.values().cloned().collect()))
            }
            "items" => {
                arity(method, &args, 0, 0)?;
                Ok(Value::List(
                    entries
                        .iter()
                        .map(|(k, v)| Value::List(vec![Value::Str(k.clone()), v.clone()]))
                        .collect(),
                ))
            }
            "get" => {
                arity(method, &args, 1, 2)?;
                let found = match &args[0] {
                    Value::Str(key) => entries.get(key).cloned(),
                    _ => None,
                };
                Ok(found.unwrap_or_else(|| args.get(1).cloned().unwrap_or(Value::None)))
            }
            _ => Err(no_attribute(receiver, method)),
        },
        Value::List(items) => match method {
            "count" => {
                arity(method, &args, 1, 1)?;
                let count = items.iter().filter(|item| **item == args[0]).count();
                Ok(Value::Int(count as i64))
            }
            "index" => {
                arity(method, &args, 1, 1)?;
                items
                    .iter()
                    .position(|item| *item == args[0])
                    .map(|i| Value::Int(i as i64))
                    .ok_or_else(|| {
                        EvaluatorError::value_error(format!("{} is not in list", args[0].repr()))
                    })
            }
            _ => Err(no_attribute(receiver, method)),
        },
        _ => Err(no_attribute(receiver, method)),
    }
}

fn no_attribute(receiver: &Value, method: &str) -> EvaluatorError {
    EvaluatorError::AttributeError {
        type_name: receiver.type_name(),
        name: method.to_string(),
    }
}

fn string_arg<'a>(method: &str, value: &'a Value) -> EvalResult<&'a str> {
    value.as_str().ok_or_else(|| {
        EvaluatorError::type_error(format!(
            "{}() argument must be str, not {}",
            method,
            value.type_name()
        ))
    })
}

/// Optional `chars` argument of the strip family; `None` means whitespace
fn strip_chars<'a>(method: &str, args: &'a [Value]) -> EvalResult<Option<&'a str>> {
    arity(method, args, 0, 1)?;
    match args.first() {
        None | Some(Value::None) => Ok(None),
        Some(value) => string_arg(method, value).map(Some),
    }
}

/// Prefix/suffix argument: one string or a list of alternatives
fn affixes(method: &str, value: &Value) -> EvalResult<Vec<String>> {
    match value {
        Value::Str(s) => Ok(vec![s.clone()]),
        Value::List(items) => items
            .iter()
            .map(|item| string_arg(method, item).map(str::to_string))
            .collect(),
        other => Err(EvaluatorError::type_error(format!(
            "{} first arg must be str or a tuple of str, not {}",
            method,
            other.type_name()
        ))),
    }
}

fn string_method(s: &str, method: &str, args: Vec<Value>) -> EvalResult<Value> {
    let text = |t: String| Ok(Value::Str(t));
    match method {
        "lower" => {
            arity(method, &args, 0, 0)?;
            text(s.to_lowercase())
        }
        "upper" => {
            arity(method, &args, 0, 0)?;
            text(s.to_uppercase())
        }
        "title" => {
            arity(method, &args, 0, 0)?;
            text(title_case(s))
        }
        "strip" => match strip_chars(method, &args)? {
            None => text(s.trim().to_string()),
            Some(chars) => text(s.trim_matches(|c| chars.contains(c)).to_string()),
        },
        "lstrip" => match strip_chars(method, &args)? {
            None => text(s.trim_start().to_string()),
            Some(chars) => text(s.trim_start_matches(|c| chars.contains(c)).to_string()),
        },
        "rstrip" => match strip_chars(method, &args)? {
            None => text(s.trim_end().to_string()),
            Some(chars) => text(s.trim_end_matches(|c| chars.contains(c)).to_string()),
        },
        "startswith" => {
            arity(method, &args, 1, 1)?;
            let prefixes = affixes(method, &args[0])?;
            Ok(Value::Bool(prefixes.iter().any(|p| s.starts_with(p.as_str()))))
        }
        "endswith" => {
            arity(method, &args, 1, 1)?;
            let suffixes = affixes(method, &args[0])?;
            Ok(Value::Bool(suffixes.iter().any(|p| s.ends_with(p.as_str()))))
        }
        "split" => {
            arity(method, &args, 0, 2)?;
            let limit: Option<usize> = match args.get(1) {
                None => None,
                Some(value) => value
                    .as_i64()
                    .ok_or_else(|| EvaluatorError::type_error("maxsplit must be an integer"))?
                    .try_into()
                    .ok(),
            };
            let parts: Vec<Value> = match args.first() {
                None | Some(Value::None) => split_whitespace(s, limit),
                Some(value) => {
                    let separator = string_arg(method, value)?;
                    if separator.is_empty() {
                        return Err(EvaluatorError::value_error("empty separator"));
                    }
                    match limit {
                        Some(n) => s.splitn(n + 1, separator).map(Value::str).collect(),
                        None => s.split(separator).map(Value::str).collect(),
                    }
                }
            };
            check_collection_size(parts.len())?;
            Ok(Value::List(parts))
        }
        "replace" => {
            arity(method, &args, 2, 2)?;
            let old = string_arg(method, &args[0])?;
            let new = string_arg(method, &args[1])?;
            text(s.replace(old, new))
        }
        "join" => {
            arity(method, &args, 1, 1)?;
            let parts = iterate(&args[0])?
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        EvaluatorError::type_error(format!(
                            "sequence item: expected str instance, {} found",
                            item.type_name()
                        ))
                    })
                })
                .collect::<EvalResult<Vec<String>>>()?;
            text(parts.join(s))
        }
        "count" => {
            arity(method, &args, 1, 1)?;
            let needle = string_arg(method, &args[0])?;
            let count = if needle.is_empty() {
                s.chars().count() + 1
            } else {
                s.matches(needle).count()
            };
            Ok(Value::Int(count as i64))
        }
        "find" => {
            arity(method, &args, 1, 1)?;
            let needle = string_arg(method, &args[0])?;
            let index = s
                .find(needle)
                .map(|byte| s[..byte].chars().count() as i64)
                .unwrap_or(-1);
            Ok(Value::Int(index))
        }
        "isdigit" => {
            arity(method, &args, 0, 0)?;
            Ok(Value::Bool(!s.is_empty() && s.chars().all(|c| c.is_numeric())))
        }
        _ => Err(no_attribute(&Value::str(s), method)),
    }
}

fn split_whitespace(s: &str, limit: Option<usize>) -> Vec<Value> {
    let limit = match limit {
        None => return s.split_whitespace().map(Value::str).collect(),
        Some(limit) => limit,
    };

    let mut parts = Vec::new();
    let mut rest = s.trim_start();
    while !rest.is_empty() {
        if parts.len() == limit {
            parts.push(Value::str(rest));
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                parts.push(Value::str(&rest[..end]));
                rest = rest[end..].trim_start();
            }
            None => {
                parts.push(Value::str(rest));
                break;
            }
        }
    }
    parts
}

fn title_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut previous_cased = false;
    for c in s.chars() {
        if previous_cased {
            result.extend(c.to_lowercase());
        } else {
            result.extend(c.to_uppercase());
        }
        previous_cased = c.is_alphabetic();
    }
    result
}
