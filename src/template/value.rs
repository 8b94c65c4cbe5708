//! Dynamic values bound to template variables.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A value a template variable can expand.
///
/// Bindings are heterogeneous: a scalar, a list, or an associative array
/// whose iteration order is its insertion order (RFC 6570 examples depend
/// on pair order, which is why the associative form is a pair vector and
/// not a hash map). Lists and associative arrays nest, which the
/// deep-object expansion makes use of.
///
/// [`Value::Null`] is the "absent" marker: a variable bound to it expands
/// to nothing, exactly as if it were not bound at all.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Undefined; skipped by expansion.
    #[default]
    Null,
    /// A string scalar.
    String(String),
    /// An ordered list.
    List(Vec<Value>),
    /// An associative array with insertion-ordered pairs.
    Assoc(Vec<(String, Value)>),
}

impl Value {
    /// Returns `true` for the absent marker.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Builds a list value from anything convertible to values.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_kit::Value;
    ///
    /// let list = Value::list(["red", "green", "blue"]);
    /// assert_eq!(list, Value::List(vec!["red".into(), "green".into(), "blue".into()]));
    /// ```
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Builds an associative value, preserving the pair order.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_kit::Value;
    ///
    /// let keys = Value::assoc([("semi", ";"), ("dot", "."), ("comma", ",")]);
    /// ```
    pub fn assoc<I, K, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<Value>,
    {
        Self::Assoc(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// The default value-to-string coercion.
    ///
    /// Strings pass through; `Null` is absent; everything else is rendered
    /// as its JSON representation.
    pub(crate) fn coerce_default(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::String(s) => Some(s.clone()),
            other => Some(
                serde_json::to_string(other).expect("value serialization cannot fail"),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::String(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Assoc(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (key, value) in pairs {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&String> for Value {
    #[inline]
    fn from(v: &String) -> Self {
        Self::String(v.clone())
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(v: bool) -> Self {
        Self::String(if v { "true" } else { "false" }.into())
    }
}

/// Numbers coerce to their JSON representation.
macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(v: $ty) -> Self {
                    Self::String(v.to_string())
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<f64> for Value {
    #[inline]
    fn from(v: f64) -> Self {
        Self::String(
            serde_json::to_string(&v).expect("a float serializes to a JSON number or null"),
        )
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::list(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    /// Converts a JSON tree, keeping object insertion order.
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => b.into(),
            serde_json::Value::Number(n) => Self::String(n.to_string()),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(map) => Self::Assoc(
                map.into_iter().map(|(k, v)| (k, Self::from(v))).collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_conversions() {
        assert_eq!(Value::from("a"), Value::String("a".into()));
        assert_eq!(Value::from(true), Value::String("true".into()));
        assert_eq!(Value::from(42_u32), Value::String("42".into()));
        assert_eq!(Value::from(1.5_f64), Value::String("1.5".into()));
        assert_eq!(Value::from(None::<&str>), Value::Null);
    }

    #[test]
    fn default_coercion() {
        assert_eq!(Value::Null.coerce_default(), None);
        assert_eq!(Value::from("x").coerce_default(), Some("x".into()));
        assert_eq!(
            Value::list(["a", "b"]).coerce_default(),
            Some(r#"["a","b"]"#.into())
        );
        assert_eq!(
            Value::assoc([("k", "v")]).coerce_default(),
            Some(r#"{"k":"v"}"#.into())
        );
    }

    #[test]
    fn json_conversion_keeps_pair_order() {
        let value = Value::from(json!({"semi": ";", "dot": ".", "comma": ","}));
        assert_eq!(
            value,
            Value::assoc([("semi", ";"), ("dot", "."), ("comma", ",")])
        );
    }
}
