use std::future::Future;
use std::pin::Pin;

use crate::context::RequestContext;
use crate::error::ApiError;

pub(crate) type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A paired check/inject unit that both gates and augments a request.
///
/// The check runs before the handler and may short-circuit the chain by
/// returning any [`ApiError`] (e.g. `Unauthorized`). When it passes, the
/// value produced by [`inject`](TypedMiddleware::inject) is inserted into
/// the request context's type-keyed map, overwriting a previous value of
/// the same type; handlers read it back with [`RequestContext::get`].
///
/// ```ignore
/// struct ApiKey;
///
/// impl TypedMiddleware for ApiKey {
///     type Inject = Caller;
///
///     async fn check(&self, ctx: &RequestContext) -> Result<(), ApiError> {
///         match ctx.header("x-api-key") {
///             Some(_) => Ok(()),
///             None => Err(ApiError::Unauthorized("missing api key".into())),
///         }
///     }
///
///     fn inject(&self, ctx: &RequestContext) -> Option<Caller> {
///         ctx.header("x-api-key").map(|key| Caller { key: key.into() })
///     }
/// }
/// ```
pub trait TypedMiddleware: Send + Sync + 'static {
    /// Value inserted into the request context after a passing check.
    type Inject: Clone + Send + Sync + 'static;

    /// Runs before the handler; return an error to abort the chain.
    fn check(
        &self,
        ctx: &RequestContext,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Produce the value to merge into the request context. Only called
    /// when `check` passed. The default injects nothing.
    fn inject(&self, _ctx: &RequestContext) -> Option<Self::Inject> {
        None
    }
}

/// Object-safe form of [`TypedMiddleware`] used by the pipeline.
pub(crate) trait ErasedMiddleware: Send + Sync {
    fn apply<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, Result<(), ApiError>>;
}

impl<M: TypedMiddleware> ErasedMiddleware for M {
    fn apply<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            self.check(&*ctx).await?;
            if let Some(value) = self.inject(&*ctx) {
                ctx.insert(value);
            }
            Ok(())
        })
    }
}

/// Middleware from a bare check closure; injects nothing.
///
/// The closure must return an owned future, so copy what you need out of
/// the context before the `async move` block.
pub fn check_fn<F, Fut>(f: F) -> CheckFn<F>
where
    F: Fn(&RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ApiError>> + Send + 'static,
{
    CheckFn(f)
}

/// See [`check_fn`].
pub struct CheckFn<F>(F);

impl<F, Fut> TypedMiddleware for CheckFn<F>
where
    F: Fn(&RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ApiError>> + Send + 'static,
{
    type Inject = ();

    fn check(
        &self,
        ctx: &RequestContext,
    ) -> impl Future<Output = Result<(), ApiError>> + Send {
        (self.0)(ctx)
    }
}
