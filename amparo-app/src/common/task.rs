//! Deferred work produced by `update` functions.
//!
//! A [`Task`] is a bag of futures, each resolving to one message that is fed
//! back into the update loop. Update functions never await; they describe the
//! work and the [`App`](crate::app::App) runtime drives it.

use std::{fmt, future::Future, sync::Arc};

use futures::{FutureExt, future::BoxFuture};

#[must_use = "a Task does nothing unless handed to the runtime"]
pub struct Task<T> {
    futures: Vec<BoxFuture<'static, T>>,
}

impl<T: Send + 'static> Task<T> {
    /// A task that produces nothing.
    pub fn none() -> Self {
        Self {
            futures: Vec::new(),
        }
    }

    /// A task that immediately yields `value`.
    pub fn done(value: T) -> Self {
        Self::future(async move { value })
    }

    /// Run `future` and map its output into a message.
    pub fn perform<A, F, M>(future: F, map: M) -> Self
    where
        F: Future<Output = A> + Send + 'static,
        M: FnOnce(A) -> T + Send + 'static,
    {
        Self::future(async move { map(future.await) })
    }

    pub fn future<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            futures: vec![future.boxed()],
        }
    }

    pub fn batch(tasks: impl IntoIterator<Item = Task<T>>) -> Self {
        Self {
            futures: tasks
                .into_iter()
                .flat_map(|task| task.futures)
                .collect(),
        }
    }

    pub fn map<U, F>(self, f: F) -> Task<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Task {
            futures: self
                .futures
                .into_iter()
                .map(|future| {
                    let f = Arc::clone(&f);
                    future.map(move |value| f(value)).boxed()
                })
                .collect(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.futures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.futures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.futures.is_empty()
    }

    pub fn into_futures(self) -> Vec<BoxFuture<'static, T>> {
        self.futures
    }
}

impl<T> fmt::Debug for Task<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("pending", &self.futures.len())
            .finish()
    }
}
