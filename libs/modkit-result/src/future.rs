//! Asynchronous combinators.
//!
//! Every combinator awaits exactly one step before deciding what to run next.
//! A failure short-circuits before the continuation is even created, so no
//! follow-up future is built or polled. Cancellation is dropping the future.

use std::future::Future;

use crate::outcome::Outcome;
use crate::problems::Problems;
use crate::value_outcome::ValueOutcome;

impl Outcome {
    /// Awaits the next step on success.
    pub async fn and_then_async<F, Fut>(self, f: F) -> Self
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Self>,
    {
        match self {
            Self::Success => f().await,
            failure @ Self::Failure { .. } => failure,
        }
    }

    /// Awaits a value-producing step on success.
    pub async fn and_then_value_async<U, F, Fut>(self, f: F) -> ValueOutcome<U>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ValueOutcome<U>>,
    {
        match self {
            Self::Success => f().await,
            Self::Failure { problems } => ValueOutcome::Failure { problems },
        }
    }

    /// Awaits a value on success.
    pub async fn map_async<U, F, Fut>(self, f: F) -> ValueOutcome<U>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = U>,
    {
        match self {
            Self::Success => ValueOutcome::Success(f().await),
            Self::Failure { problems } => ValueOutcome::Failure { problems },
        }
    }
}

impl<T> ValueOutcome<T> {
    /// Awaits a transformation of the value.
    pub async fn map_async<U, F, Fut>(self, f: F) -> ValueOutcome<U>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = U>,
    {
        match self {
            Self::Success(value) => ValueOutcome::Success(f(value).await),
            Self::Failure { problems } => ValueOutcome::Failure { problems },
        }
    }

    /// Awaits the next value-producing step on success.
    pub async fn and_then_async<U, F, Fut>(self, f: F) -> ValueOutcome<U>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = ValueOutcome<U>>,
    {
        match self {
            Self::Success(value) => f(value).await,
            Self::Failure { problems } => ValueOutcome::Failure { problems },
        }
    }

    /// Awaits a step without a value on success.
    pub async fn and_then_outcome_async<F, Fut>(self, f: F) -> Outcome
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Outcome>,
    {
        match self {
            Self::Success(value) => f(value).await,
            Self::Failure { problems } => Outcome::Failure { problems },
        }
    }

    /// Awaits a recovery step on failure.
    pub async fn or_else_async<F, Fut>(self, f: F) -> Self
    where
        F: FnOnce(Problems) -> Fut,
        Fut: Future<Output = Self>,
    {
        match self {
            success @ Self::Success(_) => success,
            Self::Failure { problems } => f(problems).await,
        }
    }
}

/// Combinators on futures that resolve to an [`Outcome`].
pub trait OutcomeFutureExt: Future<Output = Outcome> + Sized {
    fn and_then_outcome<F, Fut>(self, f: F) -> impl Future<Output = Outcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Outcome>,
    {
        async move { self.await.and_then_async(f).await }
    }

    fn map_outcome<U, F>(self, f: F) -> impl Future<Output = ValueOutcome<U>>
    where
        F: FnOnce() -> U,
    {
        async move { self.await.map(f) }
    }

    fn match_outcome<R>(
        self,
        on_success: impl FnOnce() -> R,
        on_failure: impl FnOnce(Problems) -> R,
    ) -> impl Future<Output = R> {
        async move { self.await.match_with(on_success, on_failure) }
    }
}

impl<Fut: Future<Output = Outcome>> OutcomeFutureExt for Fut {}

/// Combinators on futures that resolve to a [`ValueOutcome`].
pub trait ValueOutcomeFutureExt<T>: Future<Output = ValueOutcome<T>> + Sized {
    fn map_value<U, F>(self, f: F) -> impl Future<Output = ValueOutcome<U>>
    where
        F: FnOnce(T) -> U,
    {
        async move { self.await.map(f) }
    }

    fn and_then_value<U, F, Fut>(self, f: F) -> impl Future<Output = ValueOutcome<U>>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = ValueOutcome<U>>,
    {
        async move { self.await.and_then_async(f).await }
    }

    fn and_then_value_outcome<F, Fut>(self, f: F) -> impl Future<Output = Outcome>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Outcome>,
    {
        async move { self.await.and_then_outcome_async(f).await }
    }

    fn or_else_value<F, Fut>(self, f: F) -> impl Future<Output = ValueOutcome<T>>
    where
        F: FnOnce(Problems) -> Fut,
        Fut: Future<Output = ValueOutcome<T>>,
    {
        async move { self.await.or_else_async(f).await }
    }

    fn inspect_value<F>(self, f: F) -> impl Future<Output = ValueOutcome<T>>
    where
        F: FnOnce(&T),
    {
        async move { self.await.inspect(f) }
    }

    fn match_value<R>(
        self,
        on_success: impl FnOnce(T) -> R,
        on_failure: impl FnOnce(Problems) -> R,
    ) -> impl Future<Output = R> {
        async move { self.await.match_with(on_success, on_failure) }
    }
}

impl<T, Fut: Future<Output = ValueOutcome<T>>> ValueOutcomeFutureExt<T> for Fut {}
