//! rudder — a thin, typed routing layer on top of axum.
//!
//! Routes are registered on a fluent [`ApiRouter`]: each registration
//! composes a short linear pipeline of body/query/params validation
//! (serde + [garde] + [schemars]), user-supplied typed middlewares that
//! gate the request and inject values into the request context, and the
//! handler itself, whose return value is serialized as the JSON response.
//! Every registration also appends a [`RouteRecord`] to an explicit
//! registry, from which the `rudder-openapi` crate generates an OpenAPI
//! 3.1 document on demand.
//!
//! Networking, route matching and response transport are axum's job; this
//! crate only assembles what runs between dispatch and handler.
//!
//! ```ignore
//! use rudder::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Deserialize, Serialize, Validate, JsonSchema)]
//! struct CreateUser {
//!     #[garde(length(min = 1))]
//!     name: String,
//!     #[garde(email)]
//!     email: String,
//! }
//!
//! let router = ApiRouter::new();
//! let users = router.group(Group::prefix("/users").tag("Users"));
//!
//! users.post(
//!     "/",
//!     |ctx: RequestContext| async move {
//!         let user: CreateUser = ctx.body_as()?;
//!         Ok::<_, ApiError>(user)
//!     },
//!     RouteOptions::new().body::<CreateUser>().summary("Create a user"),
//! );
//!
//! let app: axum::Router = router.build();
//! ```

pub mod context;
pub mod error;
pub mod meta;
pub mod middleware;
pub mod options;
pub mod params;
pub mod prelude;
pub mod router;
pub mod schema;
pub mod types;

pub use context::{PathParams, RequestContext};
pub use error::{error_response, ApiError, Source};
pub use meta::{ContentType, RouteRecord, RouteRegistry, SchemaInfo};
pub use middleware::{check_fn, CheckFn, TypedMiddleware};
pub use options::{Group, RouteOptions};
pub use router::ApiRouter;
pub use schema::{Schema, SchemaValidator};
pub use types::ApiResult;

pub use axum;
pub use garde;
pub use schemars;
