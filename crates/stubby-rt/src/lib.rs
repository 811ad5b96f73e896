//! Runtime support for generated mock companions.
//!
//! Generated companions hold one [`Recorder`] per mocked method and one
//! [`MockVariable`] per mocked property. Tests stub behaviors on them and
//! inspect the recorded calls afterwards.
//!
//! ## Variants
//!
//! | alias | `record` returns |
//! |---|---|
//! | [`Recorder<A, R>`] | `R` |
//! | [`AsyncRecorder<A, R>`] | `impl Future<Output = R>` |
//! | [`FailableRecorder<A, R, E>`] | `Result<R, E>` |
//! | [`AsyncFailableRecorder<A, R, E>`] | `impl Future<Output = Result<R, E>>` |
//!
//! All four are the same generic [`Recorder`] with a different [`Effect`]
//! marker. Asynchronous variants record the call before the returned future
//! is first polled.

pub mod effect;
pub mod recorder;
pub mod variable;

pub use effect::{Async, AsyncFailable, Effect, Failable, FailableEffect, LocalFuture, Plain};
pub use recorder::{AsyncFailableRecorder, AsyncRecorder, FailableRecorder, Recorder};
pub use stubby_common::effect::EffectKind;
pub use variable::MockVariable;
