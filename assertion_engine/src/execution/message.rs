//! Failure message construction

use assertion_expr::Value;

/// Single space between a non-empty prefix and the message body
pub fn filler(prefix: &str) -> &'static str {
    if prefix.is_empty() {
        ""
    } else {
        " "
    }
}

pub fn default_failure_message(
    prefix: &str,
    actual: &Value,
    phrase: &str,
    expected: &Value,
) -> String {
    format!(
        "{}{}'{}' ({}) {} '{}' ({})",
        prefix,
        filler(prefix),
        actual,
        actual.type_name(),
        phrase,
        expected,
        expected.type_name()
    )
}

pub fn invalid_operator_message(prefix: &str, operator: &str) -> String {
    format!(
        "{}{}`{}` is not a valid assertion operator",
        prefix,
        filler(prefix),
        operator
    )
}

/// Substitute `{value}`, `{value_type}`, `{expected}` and `{expected_type}`.
/// `{{` and `}}` produce literal braces; any other `{...}` is kept verbatim.
pub fn render_template(template: &str, actual: &Value, expected: &Value) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(i) = rest.find(['{', '}']) {
        out.push_str(&rest[..i]);
        let tail = &rest[i..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }

        if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
            continue;
        }

        let Some(close) = tail.find('}') else {
            out.push_str(tail);
            rest = "";
            break;
        };
        let slot = &tail[1..close];
        match slot {
            "value" => out.push_str(&actual.to_string()),
            "value_type" => out.push_str(&actual.type_name()),
            "expected" => out.push_str(&expected.to_string()),
            "expected_type" => out.push_str(&expected.type_name()),
            _ => out.push_str(&tail[..=close]),
        }
        rest = &tail[close + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_message_format() {
        let message = default_failure_message("", &Value::Int(3), "should be", &Value::Int(4));
        assert_eq!(message, "'3' (int) should be '4' (int)");

        let message = default_failure_message(
            "Title",
            &Value::str("a"),
            "should contain",
            &Value::list(["b"]),
        );
        assert_eq!(message, "Title 'a' (str) should contain '['b']' (list)");
    }

    #[test]
    fn test_invalid_operator_message() {
        assert_eq!(invalid_operator_message("", "foo"), "`foo` is not a valid assertion operator");
        assert_eq!(
            invalid_operator_message("Check", "foo"),
            "Check `foo` is not a valid assertion operator"
        );
    }

    #[test]
    fn test_template_slots() {
        let rendered = render_template(
            "{value} vs {expected} ({value_type}/{expected_type})",
            &Value::str("actual"),
            &Value::Int(2),
        );
        assert_eq!(rendered, "actual vs 2 (str/int)");
    }

    #[test]
    fn test_template_escapes_and_unknown_slots() {
        let rendered = render_template("{{value}} {other} {value} {unclosed", &Value::Bool(true), &Value::None);
        assert_eq!(rendered, "{value} {other} True {unclosed");
        assert_eq!(render_template("a } b", &Value::None, &Value::None), "a } b");
    }
}
