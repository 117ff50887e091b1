//! Convenience type aliases for common handler return types.

use crate::error::ApiError;

/// The common handler result — any serializable success value with
/// [`ApiError`].
///
/// ```ignore
/// async fn list_users(ctx: RequestContext) -> ApiResult<Vec<User>> {
///     Ok(fetch_users().await?)
/// }
/// ```
pub type ApiResult<T> = Result<T, ApiError>;
