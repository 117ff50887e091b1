//! rudder prelude — import the routing surface with a single `use`.
//!
//! ```ignore
//! use rudder::prelude::*;
//!
//! let router = ApiRouter::new().get(
//!     "/users/:id",
//!     |ctx: RequestContext| async move { Ok::<_, ApiError>(ctx.params().clone()) },
//!     RouteOptions::new(),
//! );
//! let app: axum::Router = router.build();
//! ```

// ── Core types ──────────────────────────────────────────────────────────

pub use crate::context::{PathParams, RequestContext};
pub use crate::error::{ApiError, Source};
pub use crate::meta::{ContentType, RouteRecord, RouteRegistry, SchemaInfo};
pub use crate::middleware::{check_fn, CheckFn, TypedMiddleware};
pub use crate::options::{Group, RouteOptions};
pub use crate::router::ApiRouter;
pub use crate::schema::{Schema, SchemaValidator};

// ── Type aliases ────────────────────────────────────────────────────────

pub use crate::types::ApiResult;

// ── Ecosystem re-exports ────────────────────────────────────────────────

pub use axum::http::StatusCode;
pub use axum::Json;
pub use garde::Validate;
pub use schemars::JsonSchema;
