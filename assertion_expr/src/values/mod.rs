//! Dynamic value model shared by the evaluator and the assertion engine
//!
//! Equality, ordering, membership and truthiness follow the loose rules
//! callers expect from a scripting host: `1 == 1.0 == True`, strings order by
//! code point, and comparing unrelated kinds is an error rather than `false`.

mod flags;

pub use flags::FlagSet;

use crate::logging::codes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ComparisonError {
    #[error("'{op}' not supported between instances of '{left}' and '{right}'")]
    Unorderable {
        op: &'static str,
        left: String,
        right: String,
    },

    #[error("{message}")]
    UnsupportedMembership { message: String },

    #[error("'{name}' is not a member of {flag_type}")]
    UnknownFlag { flag_type: String, name: String },

    #[error("cannot combine flags of type {left} and {right}")]
    FlagTypeMismatch { left: String, right: String },
}

impl ComparisonError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            ComparisonError::UnknownFlag { .. } => codes::evaluation::VALUE_ERROR,
            _ => codes::evaluation::TYPE_ERROR,
        }
    }
}

/// Ordering comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderOp {
    Lt,
    Gt,
    Le,
    Ge,
}

impl OrderOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            OrderOp::Lt => "<",
            OrderOp::Gt => ">",
            OrderOp::Le => "<=",
            OrderOp::Ge => ">=",
        }
    }

    fn holds(&self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (_, None) => false,
            (OrderOp::Lt, Some(o)) => o == Ordering::Less,
            (OrderOp::Gt, Some(o)) => o == Ordering::Greater,
            (OrderOp::Le, Some(o)) => o != Ordering::Greater,
            (OrderOp::Ge, Some(o)) => o != Ordering::Less,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Dict(BTreeMap<String, Value>),
    Flags(FlagSet),
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

impl Value {
    pub fn str(text: impl Into<String>) -> Self {
        Value::Str(text.into())
    }

    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn dict<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Dict(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Value::Dict(entries)
    }
}

impl From<FlagSet> for Value {
    fn from(flags: FlagSet) -> Self {
        Value::Flags(flags)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::None)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Dict(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Value {
    /// JSON rendering; flag sets become the list of their set member names
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::None => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Dict(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Flags(flags) => serde_json::Value::Array(
                flags
                    .flag_names()
                    .into_iter()
                    .map(serde_json::Value::String)
                    .collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

// ============================================================================
// INSPECTION
// ============================================================================

impl Value {
    /// Lowercase kind tag used in assertion messages
    pub fn type_name(&self) -> String {
        match self {
            Value::None => "nonetype".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Str(_) => "str".to_string(),
            Value::List(_) => "list".to_string(),
            Value::Dict(_) => "dict".to_string(),
            Value::Flags(flags) => flags.type_name().to_lowercase(),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Dict(entries) => !entries.is_empty(),
            Value::Flags(flags) => !flags.is_empty(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Bool(_) | Value::Int(_) | Value::Float(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view of bools and ints
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Float view of any numeric kind
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            other => other.as_i64().map(|i| i as f64),
        }
    }

    /// Quoted rendering, as used inside list and dict displays
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => repr_str(s),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// EQUALITY, ORDERING, MEMBERSHIP
// ============================================================================

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            (Value::Flags(a), Value::Flags(b)) => a.same_type(b) && a.bits() == b.bits(),
            (Value::Flags(f), Value::Int(i)) | (Value::Int(i), Value::Flags(f)) => {
                u64::try_from(*i).map(|i| i == f.bits()).unwrap_or(false)
            }
            (a, b) if a.is_numeric() && b.is_numeric() => {
                numeric_cmp(a, b) == Some(Ordering::Equal)
            }
            _ => false,
        }
    }
}

/// Exact comparison across bools, ints and floats; `None` only for NaN
fn numeric_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
        (Value::Float(x), other) => other
            .as_i64()
            .and_then(|i| cmp_int_float(i, *x))
            .map(Ordering::reverse),
        (other, Value::Float(y)) => other.as_i64().and_then(|i| cmp_int_float(i, *y)),
        _ => a.as_i64().zip(b.as_i64()).map(|(x, y)| x.cmp(&y)),
    }
}

/// Compare without rounding `i` to the nearest float
fn cmp_int_float(i: i64, f: f64) -> Option<Ordering> {
    // 2^63, exactly representable
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if f.is_nan() {
        return None;
    }
    if f >= LIMIT {
        return Some(Ordering::Less);
    }
    if f < -LIMIT {
        return Some(Ordering::Greater);
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(f - whole)),
        unequal => Some(unequal),
    }
}

impl Value {
    fn partial_order(&self, op: OrderOp, other: &Value) -> Result<Option<Ordering>, ComparisonError> {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
            (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    if x != y {
                        return x.partial_order(op, y);
                    }
                }
                Ok(Some(a.len().cmp(&b.len())))
            }
            (a, b) if a.is_numeric() && b.is_numeric() => Ok(numeric_cmp(a, b)),
            (a, b) => Err(ComparisonError::Unorderable {
                op: op.symbol(),
                left: a.type_name(),
                right: b.type_name(),
            }),
        }
    }

    /// Evaluate `self <op> other`; unrelated kinds are an error, NaN compares false
    pub fn compare_order(&self, op: OrderOp, other: &Value) -> Result<bool, ComparisonError> {
        Ok(op.holds(self.partial_order(op, other)?))
    }

    /// Membership test `item in self`
    pub fn contains(&self, item: &Value) -> Result<bool, ComparisonError> {
        match (self, item) {
            (Value::Str(haystack), Value::Str(needle)) => Ok(haystack.contains(needle.as_str())),
            (Value::Str(_), other) => Err(ComparisonError::UnsupportedMembership {
                message: format!(
                    "'in <string>' requires string as left operand, not {}",
                    other.type_name()
                ),
            }),
            (Value::List(items), needle) => Ok(items.iter().any(|v| v == needle)),
            (Value::Dict(entries), Value::Str(key)) => Ok(entries.contains_key(key)),
            (Value::Dict(_), unhashable @ (Value::List(_) | Value::Dict(_))) => {
                Err(ComparisonError::UnsupportedMembership {
                    message: format!("unhashable type: '{}'", unhashable.type_name()),
                })
            }
            (Value::Dict(_), _) => Ok(false),
            (Value::Flags(set), Value::Flags(member)) if set.same_type(member) => {
                Ok(member.is_subset_of(set))
            }
            (Value::Flags(set), other) => Err(ComparisonError::UnsupportedMembership {
                message: format!(
                    "unsupported operand type(s) for 'in': '{}' and '{}'",
                    other.type_name(),
                    set.type_name()
                ),
            }),
            (container, _) => Err(ComparisonError::UnsupportedMembership {
                message: format!(
                    "argument of type '{}' is not iterable",
                    container.type_name()
                ),
            }),
        }
    }
}

/// Stable sort using only `<`; fails on the first unorderable pair
pub fn sort_values(mut items: Vec<Value>) -> Result<Vec<Value>, ComparisonError> {
    if items.len() <= 1 {
        return Ok(items);
    }
    let right = items.split_off(items.len() / 2);
    let left = sort_values(items)?;
    let right = sort_values(right)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        let take_right = r.compare_order(OrderOp::Lt, l)?;
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }
    merged.extend(left);
    merged.extend(right);
    Ok(merged)
}

// ============================================================================
// DISPLAY
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(Value::repr).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Value::Dict(entries) => {
                let parts: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", repr_str(k), v.repr()))
                    .collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            Value::Flags(flags) => write!(f, "{}", flags),
        }
    }
}

/// Shortest round-trip float text, always with a decimal point or exponent
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = x.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let text = format!("{:e}", x);
        return match text.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => text,
        };
    }

    let text = format!("{}", x);
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}

fn repr_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_host_rendering() {
        assert_eq!(Value::None.to_string(), "None");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Float(0.1).to_string(), "0.1");
        assert_eq!(Value::Float(1e20).to_string(), "1e+20");
        assert_eq!(Value::Float(1.5e-5).to_string(), "1.5e-05");
        assert_eq!(Value::list(["a", "it's"]).to_string(), "['a', \"it's\"]");
        assert_eq!(
            Value::dict([("a", Value::Int(1)), ("b", Value::str("x"))]).to_string(),
            "{'a': 1, 'b': 'x'}"
        );
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::None.type_name(), "nonetype");
        assert_eq!(Value::Int(1).type_name(), "int");
        assert_eq!(Value::list(Vec::<Value>::new()).type_name(), "list");
        let flags = FlagSet::new("Permission", [("READ", 1)]);
        assert_eq!(Value::Flags(flags).type_name(), "permission");
    }

    #[test]
    fn test_loose_numeric_equality() {
        assert_eq!(Value::Int(1), Value::Float(1.0));
        assert_eq!(Value::Bool(true), Value::Int(1));
        assert_ne!(Value::str("1"), Value::Int(1));
        assert_ne!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_eq!(
            Value::list([Value::Int(1), Value::Float(2.0)]),
            Value::list([1.0, 2.0])
        );
    }

    #[test]
    fn test_int_float_comparison_is_exact() {
        let big = 9_007_199_254_740_993_i64;
        assert_ne!(Value::Int(big), Value::Float(9_007_199_254_740_992.0));
        assert_eq!(Value::Int(big - 1), Value::Float(9_007_199_254_740_992.0));
        assert!(Value::Int(big)
            .compare_order(OrderOp::Gt, &Value::Float(9_007_199_254_740_992.0))
            .unwrap());
        assert_ne!(Value::Int(1), Value::Float(1.5));
        assert!(Value::Int(1).compare_order(OrderOp::Lt, &Value::Float(1.5)).unwrap());
        assert!(Value::Int(-2).compare_order(OrderOp::Lt, &Value::Float(-1.5)).unwrap());
        assert!(Value::Int(i64::MAX).compare_order(OrderOp::Lt, &Value::Float(f64::INFINITY)).unwrap());
        assert!(Value::Float(-1e300).compare_order(OrderOp::Lt, &Value::Int(i64::MIN)).unwrap());
        assert_ne!(Value::Int(0), Value::Float(f64::NAN));
    }

    #[test]
    fn test_string_ordering_is_lexicographic() {
        let lt = |a: &str, b: &str| Value::str(a).compare_order(OrderOp::Lt, &Value::str(b));
        assert!(lt("abcde", "abd").unwrap());
        assert!(lt("100.000", "2").unwrap());
        assert!(lt("A", "Z").unwrap());
        assert!(lt("Z", "a").unwrap());
    }

    #[test]
    fn test_cross_kind_ordering_is_an_error() {
        let err = Value::str("1")
            .compare_order(OrderOp::Gt, &Value::Int(0))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "'>' not supported between instances of 'str' and 'int'"
        );
    }

    #[test]
    fn test_membership() {
        assert!(Value::str("Hello World").contains(&Value::str("World")).unwrap());
        assert!(Value::list([1, 2]).contains(&Value::Float(2.0)).unwrap());
        assert!(Value::dict([("a", 1)]).contains(&Value::str("a")).unwrap());
        assert!(!Value::dict([("a", 1)]).contains(&Value::Int(1)).unwrap());
        assert!(Value::str("abc").contains(&Value::Int(1)).is_err());
        assert!(Value::Int(5).contains(&Value::Int(1)).is_err());
    }

    #[test]
    fn test_sort_values() {
        let sorted = sort_values(vec![Value::Int(3), Value::Float(1.5), Value::Int(2)]).unwrap();
        assert_eq!(sorted, vec![Value::Float(1.5), Value::Int(2), Value::Int(3)]);

        assert!(sort_values(vec![Value::Int(1), Value::str("a")]).is_err());
    }

    #[test]
    fn test_json_conversion() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"a": 1, "b": [true, null, 2.5]}"#).unwrap();
        let value = Value::from(json.clone());

        assert_eq!(
            value,
            Value::dict([
                ("a", Value::Int(1)),
                (
                    "b",
                    Value::list([Value::Bool(true), Value::None, Value::Float(2.5)])
                ),
            ])
        );
        assert_eq!(value.to_json(), json);
    }
}
