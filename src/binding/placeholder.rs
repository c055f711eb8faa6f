//! `{ expr }` placeholders inside raw prop values.
//!
//! A prop like `hello { user.name } !` holds one placeholder spanning the first
//! `{` to the last `}`. The expression is handed to a [`PlaceholderEvaluator`]
//! with the scope's data; the text around the braces is kept.

use crate::reactive::{Observable, Value};

/// A raw prop value split around its placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub prefix: &'a str,
    /// Trimmed expression between the braces.
    pub expr: &'a str,
    pub suffix: &'a str,
}

impl<'a> Placeholder<'a> {
    /// Find the placeholder in `raw`, if any.
    ///
    /// Requires a `{`, a later `}`, and a non-blank expression between them.
    pub fn parse(raw: &'a str) -> Option<Self> {
        let open = raw.find('{')?;
        let close = raw.rfind('}')?;
        if close <= open {
            return None;
        }
        let expr = raw[open + 1..close].trim();
        if expr.is_empty() {
            return None;
        }
        Some(Self {
            prefix: &raw[..open],
            expr,
            suffix: &raw[close + 1..],
        })
    }

    /// Whether the placeholder is the entire value.
    pub fn is_whole(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty()
    }
}

/// Evaluates placeholder expressions against a scope's data.
///
/// Reads must go through the [`Observable`] so they are tracked.
pub trait PlaceholderEvaluator {
    fn evaluate(&self, expr: &str, data: &Observable) -> Option<Value>;
}

impl<F> PlaceholderEvaluator for F
where
    F: Fn(&str, &Observable) -> Option<Value>,
{
    fn evaluate(&self, expr: &str, data: &Observable) -> Option<Value> {
        self(expr, data)
    }
}

/// Treats the expression as a dotted property path (`user.address.city`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PathEvaluator;

impl PlaceholderEvaluator for PathEvaluator {
    fn evaluate(&self, expr: &str, data: &Observable) -> Option<Value> {
        data.path(expr)
    }
}

/// Resolved value of a raw prop.
///
/// A whole-value placeholder that yields a list stores the list itself;
/// anything else is spliced into the surrounding text. An expression that
/// does not resolve leaves the raw text in place.
pub fn substitute(
    raw: &str,
    placeholder: &Placeholder<'_>,
    evaluator: &dyn PlaceholderEvaluator,
    data: &Observable,
) -> Value {
    match evaluator.evaluate(placeholder.expr, data) {
        None => {
            tracing::warn!(expr = placeholder.expr, "placeholder did not resolve");
            Value::Text(raw.to_string())
        }
        Some(list @ Value::List(_)) if placeholder.is_whole() => list,
        Some(value) => Value::Text(format!(
            "{}{}{}",
            placeholder.prefix, value, placeholder.suffix
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Store;
    use serde_json::json;

    #[test]
    fn test_parse_spans_first_open_to_last_close() {
        let p = Placeholder::parse("hello { name } !").unwrap();
        assert_eq!(p, Placeholder { prefix: "hello ", expr: "name", suffix: " !" });
        assert!(!p.is_whole());

        let p = Placeholder::parse("{a}{b}").unwrap();
        assert_eq!(p.expr, "a}{b");
    }

    #[test]
    fn test_parse_rejects_non_placeholders() {
        assert_eq!(Placeholder::parse("plain"), None);
        assert_eq!(Placeholder::parse("{  }"), None);
        assert_eq!(Placeholder::parse("} x {"), None);
        assert_eq!(Placeholder::parse("{ open"), None);
    }

    #[test]
    fn test_whole_placeholder() {
        assert!(Placeholder::parse("{ items }").unwrap().is_whole());
    }

    #[test]
    fn test_substitute_splices_text() {
        let store = Store::new();
        let data = store.import_root(&json!({ "user": { "name": "ada" }, "n": 3 }));
        let raw = "hi { user.name }!";
        let p = Placeholder::parse(raw).unwrap();
        assert_eq!(substitute(raw, &p, &PathEvaluator, &data), Value::from("hi ada!"));

        let raw = "{ n }";
        let p = Placeholder::parse(raw).unwrap();
        assert_eq!(substitute(raw, &p, &PathEvaluator, &data), Value::from("3"));
    }

    #[test]
    fn test_substitute_keeps_raw_when_unresolved() {
        let store = Store::new();
        let data = store.import_root(&json!({}));
        let raw = "x { missing } y";
        let p = Placeholder::parse(raw).unwrap();
        assert_eq!(substitute(raw, &p, &PathEvaluator, &data), Value::from(raw));
    }

    #[test]
    fn test_substitute_whole_list() {
        let store = Store::new();
        let data = store.import_root(&json!({ "items": ["a", "b"] }));
        let p = Placeholder::parse("{ items }").unwrap();
        assert_eq!(
            substitute("{ items }", &p, &PathEvaluator, &data),
            Value::List(vec!["a".into(), "b".into()])
        );
        let p = Placeholder::parse("[{ items }]").unwrap();
        assert_eq!(substitute("[{ items }]", &p, &PathEvaluator, &data), Value::from("[a,b]"));
    }

    #[test]
    fn test_closure_evaluator() {
        let store = Store::new();
        let data = store.import_root(&json!({ "n": 2 }));
        let doubled = |expr: &str, data: &Observable| {
            data.get(expr).as_f64().map(|n| Value::Number(n * 2.0))
        };
        let p = Placeholder::parse("{n}").unwrap();
        assert_eq!(substitute("{n}", &p, &doubled, &data), Value::from("4"));
    }
}
