//! Literal syntax shared by the declaration and trace writers.

use invar_common::format_float;
use invar_model::{NONSENSICAL, Value};

/// Suffix marking a program point as a plain point (no enter/exit pairing).
pub const POINT_SUFFIX: &str = ":::POINT";

/// Modbit for a present value.
pub const MODBIT_PRESENT: u8 = 1;

/// Modbit for a missing value.
pub const MODBIT_MISSING: u8 = 2;

/// Escapes a variable or program point name.
///
/// Backslashes are doubled, spaces become `\_`, line breaks and tabs become
/// `\n`, `\r` and `\t`, and any other whitespace becomes `\u{..}`. An
/// escaped name is a single whitespace-free token.
///
/// # Examples
///
/// ```
/// use invar_output::escape_name;
///
/// assert_eq!(escape_name("unit price"), r"unit\_price");
/// assert_eq!(escape_name(r"a\b"), r"a\\b");
/// assert_eq!(escape_name("a\nb\tc"), r"a\nb\tc");
/// ```
pub fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ' ' => out.push_str("\\_"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other if other.is_whitespace() => {
                out.push_str(&format!("\\u{{{:x}}}", u32::from(other)));
            }
            other => out.push(other),
        }
    }
    out
}

/// Full program point name as written to both files.
pub fn ppt_name(name: &str) -> String {
    format!("{}{POINT_SUFFIX}", escape_name(name))
}

/// Quotes a string value, escaping backslashes, quotes and line breaks.
///
/// # Examples
///
/// ```
/// use invar_output::quote_string;
///
/// assert_eq!(quote_string(r#"say "hi""#), r#""say \"hi\"""#);
/// ```
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Renders a value as a trace literal.
pub fn value_literal(value: &Value) -> String {
    match value {
        Value::Integer(v) => v.to_string(),
        Value::Float(v) => format_float(*v),
        Value::Boolean(true) => "1".to_string(),
        Value::Boolean(false) => "0".to_string(),
        Value::String(v) => quote_string(v),
        Value::Missing => NONSENSICAL.to_string(),
    }
}

/// Modbit paired with a value in the trace.
pub fn modbit(value: &Value) -> u8 {
    if value.is_missing() {
        MODBIT_MISSING
    } else {
        MODBIT_PRESENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unquote(literal: &str) -> Option<String> {
        let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
        let mut out = String::new();
        let mut chars = inner.chars();
        while let Some(ch) = chars.next() {
            if ch != '\\' {
                out.push(ch);
                continue;
            }
            match chars.next()? {
                'n' => out.push('\n'),
                'r' => out.push('\r'),
                other => out.push(other),
            }
        }
        Some(out)
    }

    #[test]
    fn literals_by_type() {
        assert_eq!(value_literal(&Value::Integer(-4)), "-4");
        assert_eq!(value_literal(&Value::Float(2.0)), "2.0");
        assert_eq!(value_literal(&Value::Float(f64::INFINITY)), "Infinity");
        assert_eq!(value_literal(&Value::Boolean(true)), "1");
        assert_eq!(value_literal(&Value::Boolean(false)), "0");
        assert_eq!(value_literal(&Value::String("a".into())), "\"a\"");
        assert_eq!(value_literal(&Value::Missing), "nonsensical");
    }

    #[test]
    fn modbits() {
        assert_eq!(modbit(&Value::Integer(0)), 1);
        assert_eq!(modbit(&Value::Missing), 2);
    }

    #[test]
    fn string_escapes() {
        assert_eq!(quote_string("a\nb"), r#""a\nb""#);
        assert_eq!(quote_string(r"C:\tmp"), r#""C:\\tmp""#);
    }

    #[test]
    fn name_escapes() {
        assert_eq!(escape_name("a\nb"), r"a\nb");
        assert_eq!(escape_name("a\r\nb"), r"a\r\nb");
        assert_eq!(escape_name("tab\there"), r"tab\there");
        assert_eq!(escape_name("nb\u{a0}sp"), r"nb\u{a0}sp");
    }

    #[test]
    fn ppt_names_are_escaped() {
        assert_eq!(ppt_name("my data"), r"my\_data:::POINT");
    }

    proptest! {
        #[test]
        fn quoted_strings_read_back(value in "\\PC*") {
            let literal = quote_string(&value);
            prop_assert!(!literal.contains('\n'));
            prop_assert_eq!(unquote(&literal), Some(value));
        }

        #[test]
        fn escaped_names_have_no_whitespace(name in "[a-z _\\\\\n\r\t\u{a0}\u{2028}]{0,16}") {
            let escaped = escape_name(&name);
            prop_assert!(!escaped.chars().any(char::is_whitespace));
            prop_assert_eq!(escaped.lines().count(), usize::from(!name.is_empty()));
        }
    }
}
