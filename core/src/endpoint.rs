//! Structured URL construction.
//!
//! # Design
//! An `Endpoint` describes a URL as a host, a path and an ordered set of
//! query parameters. Query values form a closed union (`QueryValue`) so
//! unsupported kinds are rejected at the boundary rather than vanishing at
//! build time. Building is a pure function of the endpoint's fields: the
//! scheme is always `https`, the path always gets a leading slash, nulls are
//! dropped and lists flatten one level into repeated keys.

use indexmap::IndexMap;
use thiserror::Error;
use url::Url;

pub const URL_SCHEME: &str = "https";

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    String(String),
    Int(i64),
    /// Unsigned integers beyond `i64::MAX` keep their exact digits.
    UInt(u64),
    Float(f64),
    Bool(bool),
    Null,
    List(Vec<QueryValue>),
}

impl QueryValue {
    /// Canonical string form of a scalar. `None` for `Null` and `List`.
    pub fn as_query_string(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Int(n) => Some(n.to_string()),
            Self::UInt(n) => Some(n.to_string()),
            Self::Float(f) => Some(format_float(*f)),
            Self::Bool(b) => Some(b.to_string()),
            Self::Null | Self::List(_) => None,
        }
    }
}

/// Integral floats keep a `.0` so `2.0` and `2` stay distinguishable.
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for QueryValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

macro_rules! int_query_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

int_query_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(n) => Self::Int(n),
            Err(_) => Self::UInt(value),
        }
    }
}

impl From<usize> for QueryValue {
    fn from(value: usize) -> Self {
        match u64::try_from(value) {
            Ok(n) => Self::from(n),
            Err(_) => Self::String(value.to_string()),
        }
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// A JSON value with no query representation (an object).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unsupported query value: {0}")]
pub struct UnsupportedQueryValue(pub serde_json::Value);

impl TryFrom<serde_json::Value> for QueryValue {
    type Error = UnsupportedQueryValue;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::String(s) => Ok(Self::String(s)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Self::UInt(u))
                } else {
                    n.as_f64()
                        .map(Self::Float)
                        .ok_or_else(|| UnsupportedQueryValue(Value::Number(n)))
                }
            }
            Value::Array(items) => items
                .into_iter()
                .map(Self::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            other @ Value::Object(_) => Err(UnsupportedQueryValue(other)),
        }
    }
}

/// Why an endpoint could not be turned into a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("invalid host `{host}`: {source}")]
    InvalidHost {
        host: String,
        #[source]
        source: url::ParseError,
    },

    #[error("host `{0}` carries more than a host name")]
    NotAHost(String),
}

/// Host, path and query description of a URL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Endpoint {
    host: String,
    path: String,
    query: IndexMap<String, QueryValue>,
}

impl Endpoint {
    /// An endpoint for `host` with an empty path and no query.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: String::new(),
            query: IndexMap::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set a query parameter. Re-using a key replaces its value in place.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &IndexMap<String, QueryValue> {
        &self.query
    }

    /// Flatten the query description into ordered `(key, value)` pairs.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.query {
            push_pairs(key, value, 0, &mut pairs);
        }
        pairs
    }

    /// Build the URL.
    ///
    /// # Errors
    /// Returns `EndpointError` when `host` is not a bare host (optionally
    /// with a port).
    pub fn try_url(&self) -> Result<Url, EndpointError> {
        let mut url = Url::parse(&format!("{URL_SCHEME}://{}", self.host)).map_err(|source| {
            EndpointError::InvalidHost {
                host: self.host.clone(),
                source,
            }
        })?;

        let bare = url.username().is_empty()
            && url.password().is_none()
            && url.path() == "/"
            && url.query().is_none()
            && url.fragment().is_none();
        if !bare {
            return Err(EndpointError::NotAHost(self.host.clone()));
        }

        url.set_path(&format!("/{}", self.path));

        let pairs = self.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    /// Build the URL, treating a malformed endpoint as a programming error.
    ///
    /// # Panics
    /// Panics when `try_url` fails.
    pub fn url(&self) -> Url {
        match self.try_url() {
            Ok(url) => url,
            Err(e) => panic!("invalid endpoint {self:?}: {e}"),
        }
    }
}

fn push_pairs(key: &str, value: &QueryValue, depth: usize, out: &mut Vec<(String, String)>) {
    match value {
        QueryValue::Null => {}
        QueryValue::List(items) if depth == 0 => {
            for item in items {
                push_pairs(key, item, depth + 1, out);
            }
        }
        QueryValue::List(_) => {
            tracing::debug!(key, "discarding nested list in query parameter");
        }
        scalar => {
            if let Some(s) = scalar.as_query_string() {
                out.push((key.to_string(), s));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn builds_https_url_with_leading_slash() {
        let url = Endpoint::new("api.example.com").with_path("v1/items").url();
        assert_eq!(url.as_str(), "https://api.example.com/v1/items");
    }

    #[test]
    fn empty_path_becomes_root() {
        let url = Endpoint::new("api.example.com").url();
        assert_eq!(url.path(), "/");
        assert_eq!(url.as_str(), "https://api.example.com/");
    }

    #[test]
    fn no_query_means_no_question_mark() {
        let url = Endpoint::new("example.com")
            .with_path("a")
            .with_query("gone", QueryValue::Null)
            .url();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn scalars_emit_one_pair_each_in_order() {
        let endpoint = Endpoint::new("example.com")
            .with_query("q", "rust")
            .with_query("page", 2)
            .with_query("exact", true)
            .with_query("ratio", 0.5)
            .with_query("scale", 2.0)
            .with_query("skip", None::<i32>);
        assert_eq!(
            endpoint.query_pairs(),
            pairs(&[
                ("q", "rust"),
                ("page", "2"),
                ("exact", "true"),
                ("ratio", "0.5"),
                ("scale", "2.0"),
            ])
        );
    }

    #[test]
    fn lists_flatten_one_level() {
        let endpoint = Endpoint::new("example.com").with_query(
            "tag",
            QueryValue::List(vec![
                "a".into(),
                QueryValue::List(vec!["nested".into()]),
                QueryValue::Null,
                QueryValue::Int(3),
            ]),
        );
        assert_eq!(endpoint.query_pairs(), pairs(&[("tag", "a"), ("tag", "3")]));
        assert_eq!(
            endpoint.url().as_str(),
            "https://example.com/?tag=a&tag=3"
        );
    }

    #[test]
    fn empty_list_emits_nothing() {
        let endpoint = Endpoint::new("example.com").with_query("tag", Vec::<String>::new());
        assert!(endpoint.query_pairs().is_empty());
    }

    #[test]
    fn query_values_are_form_encoded() {
        let url = Endpoint::new("example.com")
            .with_path("search")
            .with_query("q", "a b&c")
            .url();
        assert_eq!(url.as_str(), "https://example.com/search?q=a+b%26c");
        let decoded: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(decoded, pairs(&[("q", "a b&c")]));
    }

    #[test]
    fn path_reserved_characters_are_escaped() {
        let url = Endpoint::new("example.com").with_path("a?b#c").url();
        assert_eq!(url.path(), "/a%3Fb%23c");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn host_may_carry_a_port() {
        let url = Endpoint::new("127.0.0.1:8080").with_path("x").url();
        assert_eq!(url.port(), Some(8080));
        assert_eq!(url.host_str(), Some("127.0.0.1"));
    }

    #[test]
    fn building_is_deterministic() {
        let endpoint = Endpoint::new("example.com")
            .with_path("v1")
            .with_query("b", 1)
            .with_query("a", vec!["x", "y"]);
        assert_eq!(endpoint.url(), endpoint.clone().url());
        assert_eq!(endpoint.url().as_str(), "https://example.com/v1?b=1&a=x&a=y");
    }

    #[test]
    fn malformed_hosts_are_rejected() {
        assert!(matches!(
            Endpoint::new("").try_url(),
            Err(EndpointError::InvalidHost { .. })
        ));
        assert!(matches!(
            Endpoint::new("exa mple.com").try_url(),
            Err(EndpointError::InvalidHost { .. })
        ));
        assert_eq!(
            Endpoint::new("example.com/extra").try_url(),
            Err(EndpointError::NotAHost("example.com/extra".to_string()))
        );
        assert_eq!(
            Endpoint::new("user@example.com").try_url(),
            Err(EndpointError::NotAHost("user@example.com".to_string()))
        );
    }

    #[test]
    #[should_panic(expected = "invalid endpoint")]
    fn url_panics_on_malformed_host() {
        let _ = Endpoint::new("").url();
    }

    #[test]
    fn json_values_convert_at_the_boundary() {
        let value = serde_json::json!(["a", 1, 1.5, true, null, [2]]);
        let converted = QueryValue::try_from(value).unwrap();
        assert_eq!(
            converted,
            QueryValue::List(vec![
                "a".into(),
                QueryValue::Int(1),
                QueryValue::Float(1.5),
                QueryValue::Bool(true),
                QueryValue::Null,
                QueryValue::List(vec![QueryValue::Int(2)]),
            ])
        );
    }

    #[test]
    fn large_unsigned_integers_keep_their_digits() {
        let value = QueryValue::try_from(serde_json::json!(u64::MAX)).unwrap();
        assert_eq!(value, QueryValue::UInt(u64::MAX));
        let url = Endpoint::new("example.com").with_query("id", value).url();
        assert_eq!(url.as_str(), "https://example.com/?id=18446744073709551615");

        assert_eq!(QueryValue::from(u64::MAX), QueryValue::UInt(u64::MAX));
        assert_eq!(QueryValue::from(7u64), QueryValue::Int(7));
        assert_eq!(QueryValue::from(7usize), QueryValue::Int(7));
    }

    #[test]
    fn json_objects_are_rejected() {
        let err = QueryValue::try_from(serde_json::json!({"k": 1})).unwrap_err();
        assert_eq!(err.0, serde_json::json!({"k": 1}));
        assert!(QueryValue::try_from(serde_json::json!([{"k": 1}])).is_err());
    }
}
