//! Attribute values and ordered attribute bodies.

use serde_json::Number;

/// A Terraform expression, as emitted.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Numeric literal.
    Number(Number),
    /// Quoted string. `${...}` sequences are kept as written.
    String(String),
    /// Bare expression written verbatim (`var.ENV`, `each.value`).
    Expr(String),
    /// Tuple literal.
    List(Vec<Value>),
    /// Object literal.
    Object(Body),
}

impl Value {
    /// Quoted string value.
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Bare expression value.
    pub fn expr(s: impl Into<String>) -> Self {
        Self::Expr(s.into())
    }

    /// String holding a single interpolation, `"${reference}"`.
    #[must_use]
    pub fn interpolation(reference: &str) -> Self {
        Self::String(format!("${{{reference}}}"))
    }

    /// Check if this is an empty tuple.
    #[must_use]
    pub fn is_empty_list(&self) -> bool {
        matches!(self, Self::List(items) if items.is_empty())
    }

    /// String content, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => Self::Number(n.clone()),
            serde_json::Value::String(s) => Self::String(s.clone()),
            serde_json::Value::Array(items) => Self::List(items.iter().map(Self::from).collect()),
            serde_json::Value::Object(map) => Self::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Self::from(&value)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<Body> for Value {
    fn from(body: Body) -> Self {
        Self::Object(body)
    }
}

/// Ordered `key = value` pairs.
///
/// Order is insertion order; setting an existing key replaces its value in
/// place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Body {
    attributes: Vec<(String, Value)>,
}

impl Body {
    /// Create an empty body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Set an attribute, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Look up an attribute.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Remove an attribute, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.attributes.iter().position(|(k, _)| k == key)?;
        Some(self.attributes.remove(index).1)
    }

    /// Attribute keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|(k, _)| k.as_str())
    }

    /// Attributes in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if the body has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl FromIterator<(String, Value)> for Body {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut body = Self::new();
        for (k, v) in iter {
            body.set(k, v);
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_keeps_order() {
        let raw = r#"{"zeta": 1, "alpha": {"y": true, "x": null}, "mid": ["a"]}"#;
        let json: serde_json::Value = serde_json::from_str(raw).unwrap();

        let Value::Object(body) = Value::from(&json) else {
            panic!("Expected Value::Object");
        };
        assert_eq!(body.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);

        let Some(Value::Object(nested)) = body.get("alpha") else {
            panic!("Expected nested object");
        };
        assert_eq!(nested.keys().collect::<Vec<_>>(), vec!["y", "x"]);
        assert_eq!(nested.get("x"), Some(&Value::Null));
    }

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(Value::from(&json!(true)), Value::Bool(true));
        assert_eq!(Value::from(&json!("s")), Value::string("s"));
        assert_eq!(Value::from(&json!(15)), Value::from(15_i64));
        assert_eq!(Value::from(&json!([])), Value::List(vec![]));
    }

    #[test]
    fn test_interpolation() {
        assert_eq!(
            Value::interpolation("var.WORKSPACE_ID"),
            Value::string("${var.WORKSPACE_ID}")
        );
    }

    #[test]
    fn test_is_empty_list() {
        assert!(Value::List(vec![]).is_empty_list());
        assert!(!Value::List(vec![Value::from("id")]).is_empty_list());
        assert!(!Value::Null.is_empty_list());
    }

    #[test]
    fn test_body_set_replaces_in_place() {
        let mut body = Body::new().with("a", 1_i64).with("b", 2_i64).with("c", 3_i64);
        body.set("b", "two");

        assert_eq!(body.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(body.get("b"), Some(&Value::from("two")));
    }

    #[test]
    fn test_body_remove() {
        let mut body = Body::new().with("a", 1_i64).with("b", 2_i64);

        assert_eq!(body.remove("a"), Some(Value::from(1_i64)));
        assert_eq!(body.remove("a"), None);
        assert_eq!(body.len(), 1);
        assert!(!body.is_empty());
    }
}
