//! Effect markers selecting the recorder variant.
//!
//! A recorder's third type parameter says what calling it looks like: a plain
//! value, a future, a `Result`, or a future of a `Result`. The markers are
//! never constructed.

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

use stubby_common::effect::EffectKind;

/// A boxed, non-`Send` future. Recorders are single-threaded.
pub type LocalFuture<T> = Pin<Box<dyn Future<Output = T>>>;

/// Describes one of the four recorder variants.
pub trait Effect: 'static {
    /// Which variant this marker stands for.
    const KIND: EffectKind;

    /// What a behavior returns, and so what `record` hands back.
    type Output<R>;

    /// `value` as an immediately successful output.
    fn succeed<R: 'static>(value: R) -> Self::Output<R>;
}

/// The two variants whose calls may fail.
pub trait FailableEffect: Effect {
    type Error;

    /// `error` as an immediately failed output.
    fn fail<R: 'static>(error: Self::Error) -> Self::Output<R>;
}

/// Synchronous, infallible.
#[derive(Debug)]
pub enum Plain {}

/// Suspends the caller; never fails.
#[derive(Debug)]
pub enum Async {}

/// Synchronous; may fail with `E`.
#[derive(Debug)]
pub struct Failable<E>(PhantomData<fn() -> E>);

/// Suspends the caller and may fail with `E`.
#[derive(Debug)]
pub struct AsyncFailable<E>(PhantomData<fn() -> E>);

impl Effect for Plain {
    const KIND: EffectKind = EffectKind::Plain;
    type Output<R> = R;

    fn succeed<R: 'static>(value: R) -> R {
        value
    }
}

impl Effect for Async {
    const KIND: EffectKind = EffectKind::Async;
    type Output<R> = LocalFuture<R>;

    fn succeed<R: 'static>(value: R) -> LocalFuture<R> {
        Box::pin(std::future::ready(value))
    }
}

impl<E: 'static> Effect for Failable<E> {
    const KIND: EffectKind = EffectKind::Failable;
    type Output<R> = Result<R, E>;

    fn succeed<R: 'static>(value: R) -> Result<R, E> {
        Ok(value)
    }
}

impl<E: 'static> FailableEffect for Failable<E> {
    type Error = E;

    fn fail<R: 'static>(error: E) -> Result<R, E> {
        Err(error)
    }
}

impl<E: 'static> Effect for AsyncFailable<E> {
    const KIND: EffectKind = EffectKind::AsyncFailable;
    type Output<R> = LocalFuture<Result<R, E>>;

    fn succeed<R: 'static>(value: R) -> LocalFuture<Result<R, E>> {
        Box::pin(std::future::ready(Ok(value)))
    }
}

impl<E: 'static> FailableEffect for AsyncFailable<E> {
    type Error = E;

    fn fail<R: 'static>(error: E) -> LocalFuture<Result<R, E>> {
        Box::pin(std::future::ready(Err(error)))
    }
}
