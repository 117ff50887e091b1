//! OpenAPI 3.1 document generation for `rudder`.
//!
//! A pure transform over the [`RouteRecord`](rudder::meta::RouteRecord)
//! list an [`ApiRouter`](rudder::ApiRouter) accumulates:
//!
//! ```ignore
//! use rudder_openapi::{build_spec, OpenApiConfig};
//!
//! let config = OpenApiConfig::new("My API", "1.0.0")
//!     .with_server("https://api.example.com")
//!     .with_tag("Users");
//! let spec = build_spec(&config, &router.records());
//! ```

mod builder;

pub use builder::{build_spec, OpenApiConfig, ServerInfo, TagInfo};
