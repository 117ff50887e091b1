use std::sync::Arc;

use crate::error::Source;
use crate::meta::ContentType;
use crate::middleware::{ErasedMiddleware, TypedMiddleware};
use crate::schema::{Schema, SchemaValidator};

/// Prefix and tags for a nested group of routes.
#[derive(Debug, Clone, Default)]
pub struct Group {
    pub(crate) prefix: String,
    pub(crate) tags: Vec<String>,
}

impl Group {
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            tags: Vec::new(),
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn tags<I>(mut self, tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }
}

/// Per-route registration options: validation schemas, documentation
/// metadata and route-level typed middlewares.
///
/// ```ignore
/// router.post(
///     "/users",
///     create_user,
///     RouteOptions::new()
///         .body::<CreateUser>()
///         .summary("Create a user")
///         .middleware(RequireAdmin),
/// );
/// ```
#[derive(Default)]
pub struct RouteOptions {
    pub(crate) body: Option<SchemaValidator>,
    pub(crate) query: Option<SchemaValidator>,
    pub(crate) params: Option<SchemaValidator>,
    pub(crate) tags: Option<Vec<String>>,
    pub(crate) summary: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) content_type: ContentType,
    pub(crate) middlewares: Vec<Arc<dyn ErasedMiddleware>>,
}

impl RouteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the request body against `T` before the handler runs.
    pub fn body<T>(mut self) -> Self
    where
        T: Schema,
        T::Context: Default,
    {
        self.body = Some(SchemaValidator::of::<T>(Source::Body));
        self
    }

    /// Validate the query object against `T` before the handler runs.
    pub fn query<T>(mut self) -> Self
    where
        T: Schema,
        T::Context: Default,
    {
        self.query = Some(SchemaValidator::of::<T>(Source::Query));
        self
    }

    /// Validate path parameters against `T` instead of the schema derived
    /// from the route template.
    pub fn params<T>(mut self) -> Self
    where
        T: Schema,
        T::Context: Default,
    {
        self.params = Some(SchemaValidator::of::<T>(Source::Params));
        self
    }

    /// Tags for this route. When set, they replace the group's tags in the
    /// recorded metadata.
    pub fn tags<I>(mut self, tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.tags
            .get_or_insert_with(Vec::new)
            .extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn tag(self, tag: impl Into<String>) -> Self {
        self.tags([tag.into()])
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    /// Append a route-level typed middleware. These run after the
    /// validators, in the order they were added.
    pub fn middleware(mut self, middleware: impl TypedMiddleware) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }
}
