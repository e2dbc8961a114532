//! S-expression plist helpers shared by session files, config files,
//! status output and event output.

use lexpr::Value;

/// Find the value following `:key` in a plist.
/// Walks cons pairs directly. Handles both `Value::Keyword("key")` (elisp
/// parser) and `Value::Symbol(":key")` (default parser) forms.
pub fn get_value<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let prefixed = format!(":{}", key);
    let mut current = value;
    while let Value::Cons(pair) = current {
        let is_key = match pair.car() {
            Value::Keyword(k) => k.as_ref() == key,
            Value::Symbol(s) => s.as_ref() == prefixed,
            _ => false,
        };
        if is_key {
            return match pair.cdr() {
                Value::Cons(next) => Some(next.car()),
                _ => None,
            };
        }
        current = pair.cdr();
    }
    None
}

/// Extract a keyword value from a plist as a string.
/// Keywords lose their leading colon; booleans become `t`/`nil`.
pub fn get_keyword(value: &Value, key: &str) -> Option<String> {
    let val = get_value(value, key)?;
    Some(match val {
        Value::Keyword(v) => v.to_string(),
        Value::Symbol(v) => {
            let s = v.to_string();
            s.strip_prefix(':').unwrap_or(&s).to_string()
        }
        Value::String(v) => v.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => bool_sexp(*b).to_string(),
        Value::Null => "nil".to_string(),
        _ => val.to_string(),
    })
}

/// Extract an integer value from a plist.
pub fn get_int(value: &Value, key: &str) -> Option<i64> {
    get_keyword(value, key).and_then(|s| s.parse().ok())
}

/// Extract a string value from a plist.
pub fn get_string(value: &Value, key: &str) -> Option<String> {
    get_keyword(value, key)
}

/// Extract a boolean value from a plist.
/// Treats "nil" as false and anything else as true.
pub fn get_bool(value: &Value, key: &str) -> Option<bool> {
    get_keyword(value, key).map(|s| s != "nil")
}

/// Extract a floating-point value from a plist.
pub fn get_float(value: &Value, key: &str) -> Option<f64> {
    get_keyword(value, key).and_then(|s| s.parse().ok())
}

/// Elements of a proper or dotted list, in order. Non-lists yield nothing.
pub fn list_items(value: &Value) -> Vec<&Value> {
    let mut items = Vec::new();
    let mut current = value;
    while let Value::Cons(pair) = current {
        items.push(pair.car());
        current = pair.cdr();
    }
    items
}

/// Numeric elements of a flat list. Returns None if any element is not a number.
pub fn number_list(value: &Value) -> Option<Vec<f64>> {
    list_items(value)
        .into_iter()
        .map(|v| match v {
            Value::Number(n) => n.as_f64(),
            _ => None,
        })
        .collect()
}

/// `t` or `nil`.
pub fn bool_sexp(b: bool) -> &'static str {
    if b {
        "t"
    } else {
        "nil"
    }
}

/// Escape a string for s-expression output.
pub fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// A quoted, escaped string literal.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", escape_string(s))
}

/// A list of quoted strings, or `nil` when empty.
pub fn string_list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = items.into_iter().map(quote).collect();
    if quoted.is_empty() {
        "nil".to_string()
    } else {
        format!("({})", quoted.join(" "))
    }
}

/// Format an event s-expression.
pub fn format_event(event_type: &str, fields: &[(&str, &str)]) -> String {
    let mut s = format!("(:type :event :event :{}", event_type);
    for (key, val) in fields {
        s.push_str(&format!(" :{} {}", key, val));
    }
    s.push(')');
    s
}
