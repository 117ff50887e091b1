use serde::Serialize;
use serde_json::Value;
use std::sync::{Mutex, PoisonError};

/// A named JSON Schema captured at registration time for documentation.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaInfo {
    pub name: String,
    pub schema: Value,
}

/// Request body encoding for a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ContentType {
    #[default]
    #[serde(rename = "application/json")]
    Json,
    #[serde(rename = "multipart/form-data")]
    Multipart,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::Multipart => "multipart/form-data",
        }
    }
}

/// Metadata about a single route, captured once at registration time.
///
/// Immutable after creation; consumed when documentation is generated.
#[derive(Debug, Clone, Serialize)]
pub struct RouteRecord {
    pub method: String,
    /// Full path: concatenation of all enclosing group prefixes plus the
    /// call-site path, in normalized `{name}` form.
    pub path: String,
    pub body: Option<SchemaInfo>,
    pub query: Option<SchemaInfo>,
    /// Explicit params schema, or the one derived from the route template.
    pub params: Option<Value>,
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub content_type: ContentType,
}

/// Explicit, append-only registry of route metadata.
///
/// Populated while routes are registered at startup and read when a
/// specification document is generated. Shared by every builder created
/// from the same root router.
#[derive(Default)]
pub struct RouteRegistry {
    inner: Mutex<Vec<RouteRecord>>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, record: RouteRecord) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    /// Clone out the records in registration order.
    pub fn snapshot(&self) -> Vec<RouteRecord> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
