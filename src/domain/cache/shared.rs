//! Shared, single-fetch results

use std::future::Future;

use futures::future::{BoxFuture, FutureExt, Shared};

/// One eventual outcome that any number of observers can await.
///
/// The wrapped future runs at most once; every clone observes the same value.
pub type SharedResult<V> = Shared<BoxFuture<'static, V>>;

/// Wraps a future so that its outcome can be handed to several observers
pub fn share<F>(future: F) -> SharedResult<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Clone,
{
    future.boxed().shared()
}
