use axum::http::{Extensions, HeaderMap, Method, Uri};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ApiError, Source};

/// Path parameters extracted from the matched route pattern.
///
/// Linear scan — optimal for the typical 1-3 path params.
#[derive(Debug, Clone, Default)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from `(key, value)` pairs (also convenient for testing).
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (k, v) in &self.0 {
            map.insert(k.clone(), Value::String(v.clone()));
        }
        Value::Object(map)
    }
}

/// Everything a typed middleware or handler can see about the current
/// request: the HTTP envelope, the (validated) body/query/params values and
/// the type-keyed context injected by middlewares.
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    path_params: PathParams,
    pub(crate) body: Value,
    pub(crate) query: Value,
    pub(crate) params: Value,
    extensions: Extensions,
}

impl RequestContext {
    pub fn new(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        path_params: PathParams,
        body: Value,
        query: Value,
    ) -> Self {
        let params = path_params.to_value();
        Self {
            method,
            uri,
            headers,
            path_params,
            body,
            query,
            params,
            extensions: Extensions::new(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// A single path parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name)
    }

    pub fn path_params(&self) -> &PathParams {
        &self.path_params
    }

    /// The request body, after validation replaced it.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// The query object, after validation replaced it.
    pub fn query(&self) -> &Value {
        &self.query
    }

    /// The params object, after validation replaced it.
    pub fn params(&self) -> &Value {
        &self.params
    }

    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        decode(Source::Body, &self.body)
    }

    pub fn query_as<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        decode(Source::Query, &self.query)
    }

    pub fn params_as<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        decode(Source::Params, &self.params)
    }

    /// Insert an injected-context value, overwriting a previous value of
    /// the same type.
    pub fn insert<T: Clone + Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
        self.extensions.insert(value)
    }

    /// Read a value injected by a typed middleware.
    pub fn get<T: Clone + Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }
}

fn decode<T: DeserializeOwned>(source: Source, value: &Value) -> Result<T, ApiError> {
    serde_json::from_value(value.clone())
        .map_err(|err| ApiError::validation(source, source.as_str(), err.to_string()))
}
