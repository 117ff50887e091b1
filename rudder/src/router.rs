use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use axum::body::to_bytes;
use axum::extract::{FromRequestParts, RawPathParams, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{on, MethodFilter};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::context::{PathParams, RequestContext};
use crate::error::{ApiError, Source};
use crate::meta::{ContentType, RouteRecord, RouteRegistry};
use crate::middleware::{BoxFuture, ErasedMiddleware, TypedMiddleware};
use crate::options::{Group, RouteOptions};
use crate::params::{derived_params_schema, normalize_template, parse_query, template_params};
use crate::schema::SchemaValidator;

/// Upper bound on buffered request bodies, matching axum's default
/// extractor limit.
const BODY_LIMIT: usize = 2 * 1024 * 1024;

type ErasedHandler =
    Arc<dyn Fn(RequestContext) -> BoxFuture<'static, Result<Response, ApiError>> + Send + Sync>;

/// Path-parameter validation for one route: nothing to check, the schema
/// derived from the template, or an explicit schema type.
enum ParamsStep {
    None,
    Derived(Vec<String>),
    Explicit(SchemaValidator),
}

/// The assembled per-request chain for one registered route.
struct RoutePipeline {
    builder_middlewares: Vec<Arc<dyn ErasedMiddleware>>,
    body: Option<SchemaValidator>,
    query: Option<SchemaValidator>,
    params: ParamsStep,
    route_middlewares: Vec<Arc<dyn ErasedMiddleware>>,
    content_type: ContentType,
    handler: ErasedHandler,
}

struct PendingRoute {
    filter: MethodFilter,
    path: String,
    pipeline: Arc<RoutePipeline>,
}

/// State shared by every builder created from the same root: routes not yet
/// folded into an `axum::Router`, and the route-metadata registry.
struct RouterCore {
    pending: Vec<PendingRoute>,
    registry: Arc<RouteRegistry>,
}

/// Fluent route-registration façade over `axum::Router`.
///
/// `group` and `with` never mutate the builder they are called on; they
/// return a new builder sharing the same underlying router and registry.
///
/// ```ignore
/// let router = ApiRouter::new();
/// let api = router.group(Group::prefix("/api").tag("API"));
///
/// api.clone().post(
///     "/users",
///     |ctx: RequestContext| async move {
///         let user: CreateUser = ctx.body_as()?;
///         Ok::<_, ApiError>(user)
///     },
///     RouteOptions::new().body::<CreateUser>(),
/// );
///
/// let app: axum::Router = router.build();
/// ```
#[derive(Clone)]
pub struct ApiRouter {
    core: Arc<Mutex<RouterCore>>,
    prefix: String,
    tags: Vec<String>,
    middlewares: Vec<Arc<dyn ErasedMiddleware>>,
}

impl Default for ApiRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiRouter {
    pub fn new() -> Self {
        Self {
            core: Arc::new(Mutex::new(RouterCore {
                pending: Vec::new(),
                registry: Arc::new(RouteRegistry::new()),
            })),
            prefix: String::new(),
            tags: Vec::new(),
            middlewares: Vec::new(),
        }
    }

    /// A new builder for a nested group. Prefixes concatenate in
    /// declaration order and tags accumulate without deduplication; the
    /// underlying router and registry are shared with the parent.
    pub fn group(&self, group: Group) -> Self {
        let mut tags = self.tags.clone();
        tags.extend(group.tags);
        Self {
            core: Arc::clone(&self.core),
            prefix: format!("{}{}", self.prefix, group.prefix),
            tags,
            middlewares: self.middlewares.clone(),
        }
    }

    /// Append a typed middleware to this builder's chain. Middlewares run
    /// in the order they were added, before any per-route validator.
    pub fn with(mut self, middleware: impl TypedMiddleware) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    pub fn get<H, Fut, R>(self, path: &str, handler: H, options: RouteOptions) -> Self
    where
        H: Fn(RequestContext) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ApiError>> + Send + 'static,
        R: Serialize,
    {
        self.route(MethodFilter::GET, "GET", path, handler, options)
    }

    pub fn post<H, Fut, R>(self, path: &str, handler: H, options: RouteOptions) -> Self
    where
        H: Fn(RequestContext) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ApiError>> + Send + 'static,
        R: Serialize,
    {
        self.route(MethodFilter::POST, "POST", path, handler, options)
    }

    pub fn put<H, Fut, R>(self, path: &str, handler: H, options: RouteOptions) -> Self
    where
        H: Fn(RequestContext) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ApiError>> + Send + 'static,
        R: Serialize,
    {
        self.route(MethodFilter::PUT, "PUT", path, handler, options)
    }

    pub fn patch<H, Fut, R>(self, path: &str, handler: H, options: RouteOptions) -> Self
    where
        H: Fn(RequestContext) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ApiError>> + Send + 'static,
        R: Serialize,
    {
        self.route(MethodFilter::PATCH, "PATCH", path, handler, options)
    }

    pub fn delete<H, Fut, R>(self, path: &str, handler: H, options: RouteOptions) -> Self
    where
        H: Fn(RequestContext) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ApiError>> + Send + 'static,
        R: Serialize,
    {
        self.route(MethodFilter::DELETE, "DELETE", path, handler, options)
    }

    /// Register one route: record its metadata and queue the assembled
    /// pipeline for [`build`](ApiRouter::build).
    fn route<H, Fut, R>(
        self,
        filter: MethodFilter,
        method: &str,
        path: &str,
        handler: H,
        options: RouteOptions,
    ) -> Self
    where
        H: Fn(RequestContext) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ApiError>> + Send + 'static,
        R: Serialize,
    {
        let full_path = normalize_template(&format!("{}{}", self.prefix, path));
        let names = template_params(&full_path);

        let params_step = match options.params {
            Some(validator) => ParamsStep::Explicit(validator),
            None if names.is_empty() => ParamsStep::None,
            None => ParamsStep::Derived(names),
        };

        let record = RouteRecord {
            method: method.to_string(),
            path: full_path.clone(),
            body: options.body.as_ref().map(|v| v.info().clone()),
            query: options.query.as_ref().map(|v| v.info().clone()),
            params: match &params_step {
                ParamsStep::None => None,
                ParamsStep::Derived(names) => derived_params_schema(names),
                ParamsStep::Explicit(validator) => Some(validator.info().schema.clone()),
            },
            tags: options.tags.unwrap_or_else(|| self.tags.clone()),
            summary: options.summary,
            description: options.description,
            content_type: options.content_type,
        };

        // A multipart body is the host's concern; its schema is recorded for
        // documentation only and the raw body never goes through validation.
        let body_validator = match options.content_type {
            ContentType::Json => options.body,
            ContentType::Multipart => None,
        };

        let erased: ErasedHandler = Arc::new(move |ctx| {
            let handler = handler.clone();
            Box::pin(async move { respond(handler(ctx).await?) })
        });

        let pipeline = Arc::new(RoutePipeline {
            builder_middlewares: self.middlewares.clone(),
            body: body_validator,
            query: options.query,
            params: params_step,
            route_middlewares: options.middlewares,
            content_type: options.content_type,
            handler: erased,
        });

        tracing::debug!(method, path = %full_path, "route registered");

        {
            let mut core = self.core.lock().unwrap_or_else(PoisonError::into_inner);
            core.registry.push(record);
            core.pending.push(PendingRoute {
                filter,
                path: full_path,
                pipeline,
            });
        }
        self
    }

    /// Snapshot of every record registered so far, across all builders
    /// sharing this router.
    pub fn records(&self) -> Vec<RouteRecord> {
        self.core
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .registry
            .snapshot()
    }

    /// The shared registry handle.
    pub fn registry(&self) -> Arc<RouteRegistry> {
        Arc::clone(
            &self
                .core
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .registry,
        )
    }

    /// Fold every pending registration into an `axum::Router`, ready to be
    /// mounted by the host at an arbitrary base path.
    ///
    /// # Panics
    ///
    /// Panics when the same method and path were registered twice; axum
    /// rejects overlapping method routes when they are mounted.
    pub fn build(self) -> axum::Router {
        let pending = {
            let mut core = self.core.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut core.pending)
        };

        let mut router = axum::Router::new();
        for route in pending {
            let pipeline = route.pipeline;
            let handler = move |req: Request| {
                let pipeline = Arc::clone(&pipeline);
                async move { dispatch(pipeline, req).await }
            };
            router = router.route(&route.path, on(route.filter, handler));
        }
        router
    }
}

async fn dispatch(pipeline: Arc<RoutePipeline>, req: Request) -> Response {
    match run_pipeline(&pipeline, req).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// The linear per-request chain: builder middlewares, body/query/params
/// validators, route middlewares, handler. Any failing step aborts the
/// chain; the handler never runs.
async fn run_pipeline(pipeline: &RoutePipeline, req: Request) -> Result<Response, ApiError> {
    let (mut parts, body) = req.into_parts();

    let path_params = match RawPathParams::from_request_parts(&mut parts, &()).await {
        Ok(raw) => PathParams::from_pairs(raw.iter()),
        Err(_) => PathParams::new(),
    };

    let body_value = match pipeline.content_type {
        ContentType::Json => {
            let bytes = to_bytes(body, BODY_LIMIT)
                .await
                .map_err(|err| ApiError::BadRequest(format!("failed to read request body: {err}")))?;
            if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).map_err(|err| {
                    ApiError::BadRequest(format!("request body is not valid JSON: {err}"))
                })?
            }
        }
        // Multipart bodies are the host's concern; only recorded for docs.
        ContentType::Multipart => Value::Null,
    };

    let query_value = parse_query(parts.uri.query());

    let mut ctx = RequestContext::new(
        parts.method,
        parts.uri,
        parts.headers,
        path_params,
        body_value,
        query_value,
    );

    for middleware in &pipeline.builder_middlewares {
        middleware.apply(&mut ctx).await?;
    }

    if let Some(validator) = &pipeline.body {
        let raw = ctx.body.take();
        ctx.body = validator.run(raw)?;
    }
    if let Some(validator) = &pipeline.query {
        let raw = ctx.query.take();
        ctx.query = validator.run(raw)?;
    }
    match &pipeline.params {
        ParamsStep::None => {}
        ParamsStep::Derived(names) => {
            for name in names {
                if ctx.param(name).is_none() {
                    return Err(ApiError::validation(
                        Source::Params,
                        name.clone(),
                        format!("missing path parameter `{name}`"),
                    ));
                }
            }
        }
        ParamsStep::Explicit(validator) => {
            let raw = ctx.params.take();
            ctx.params = validator.run(raw)?;
        }
    }

    for middleware in &pipeline.route_middlewares {
        middleware.apply(&mut ctx).await?;
    }

    (pipeline.handler)(ctx).await
}

/// Serialize a handler's return value as the success body. A value that
/// serializes to JSON null (e.g. `()`) yields 204 with no body.
fn respond<R: Serialize>(value: R) -> Result<Response, ApiError> {
    let value = serde_json::to_value(&value)?;
    if value.is_null() {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Ok(Json(value).into_response())
    }
}
