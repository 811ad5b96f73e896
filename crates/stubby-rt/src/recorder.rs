//! The call recorder.
//!
//! A [`Recorder`] stands in for one mocked member. Every `record` call
//! appends its arguments to the history and then runs the current behavior.
//! The behavior is replaced wholesale by `stub`; the history only grows.
//!
//! ```
//! use stubby_rt::Recorder;
//!
//! let fetch: Recorder<(u32, String), bool> = Recorder::returning(true);
//! assert!(fetch.record((1, "a".to_string())));
//! fetch.stub(|(id, _)| id > 10);
//! assert!(!fetch.record((2, "b".to_string())));
//! assert_eq!(fetch.calls_count(), 2);
//! assert_eq!(fetch.latest_call(), Some((2, "b".to_string())));
//! ```

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::panic::Location;
use std::rc::Rc;

use crate::effect::{Async, AsyncFailable, Effect, Failable, FailableEffect, LocalFuture, Plain};

type Behavior<A, R, Fx> = Rc<dyn Fn(A) -> <Fx as Effect>::Output<R>>;

/// Records calls with arguments `A` and answers them with `R`, shaped by the
/// effect marker `Fx`.
///
/// Single-threaded: interior mutability is `RefCell`-based, so a recorder is
/// neither `Send` nor `Sync`. Behaviors are `Fn` and may call back into the
/// recorder that runs them; keep mutable state in a `Cell` or `RefCell`.
pub struct Recorder<A, R, Fx: Effect = Plain> {
    behavior: RefCell<Option<Behavior<A, R, Fx>>>,
    history: RefCell<Vec<A>>,
}

/// Recorder for a member that suspends its caller.
pub type AsyncRecorder<A, R> = Recorder<A, R, Async>;

/// Recorder for a member that may fail with `E`.
pub type FailableRecorder<A, R, E> = Recorder<A, R, Failable<E>>;

/// Recorder for a member that suspends and may fail with `E`.
pub type AsyncFailableRecorder<A, R, E> = Recorder<A, R, AsyncFailable<E>>;

impl<A, R, Fx: Effect> Recorder<A, R, Fx> {
    /// A recorder without a behavior. Recording before `stub` panics.
    pub fn new() -> Self {
        Self {
            behavior: RefCell::new(None),
            history: RefCell::new(Vec::new()),
        }
    }

    fn from_behavior(behavior: Behavior<A, R, Fx>) -> Self {
        Self {
            behavior: RefCell::new(Some(behavior)),
            history: RefCell::new(Vec::new()),
        }
    }

    fn replace_behavior(&self, behavior: Behavior<A, R, Fx>) {
        *self.behavior.borrow_mut() = Some(behavior);
    }

    /// Number of `record` calls made so far, including calls whose behavior
    /// has not finished.
    pub fn calls_count(&self) -> usize {
        self.history.borrow().len()
    }

    /// Whether `record` has been called at least once.
    pub fn was_called(&self) -> bool {
        self.calls_count() > 0
    }

    /// Whether a behavior is installed.
    pub fn is_stubbed(&self) -> bool {
        self.behavior.borrow().is_some()
    }

    #[track_caller]
    fn invoke(&self, args: A) -> Fx::Output<R>
    where
        A: Clone,
    {
        self.history.borrow_mut().push(args.clone());

        // The slot is only borrowed to clone the handle, so the behavior may
        // record on this recorder again or replace its own stub.
        let behavior = self.behavior.borrow().clone();
        let Some(behavior) = behavior else {
            unstubbed(std::any::type_name::<Self>(), Location::caller());
        };
        behavior(args)
    }
}

impl<A: Clone, R, Fx: Effect> Recorder<A, R, Fx> {
    /// Arguments of the most recent call.
    pub fn latest_call(&self) -> Option<A> {
        self.history.borrow().last().cloned()
    }

    /// Every recorded call, oldest first.
    pub fn calls(&self) -> Vec<A> {
        self.history.borrow().clone()
    }
}

impl<R, Fx: Effect> Recorder<(), R, Fx> {
    /// `record(())`, for members without parameters.
    #[track_caller]
    pub fn record_unit(&self) -> Fx::Output<R> {
        self.invoke(())
    }
}

impl<A: 'static, R: Clone + 'static, Fx: Effect> Recorder<A, R, Fx> {
    /// A recorder that answers every call with `value`.
    pub fn returning(value: R) -> Self {
        Self::from_behavior(Rc::new(move |_| Fx::succeed(value.clone())))
    }
}

impl<A: 'static, Fx: Effect> Recorder<A, (), Fx> {
    /// A recorder that accepts every call and returns `()` (or `Ok(())`).
    pub fn silent() -> Self {
        Self::returning(())
    }
}

impl<A: 'static, R: 'static, Fx: FailableEffect> Recorder<A, R, Fx>
where
    Fx::Error: Clone + 'static,
{
    /// A recorder that fails every call with `error`.
    pub fn failing_with(error: Fx::Error) -> Self {
        Self::from_behavior(Rc::new(move |_| Fx::fail(error.clone())))
    }
}

#[cold]
#[track_caller]
fn unstubbed(type_name: &str, location: &Location<'_>) -> ! {
    panic!(
        "unstubbed call to recorder `{}` at {}:{}:{}",
        type_name,
        location.file(),
        location.line(),
        location.column()
    )
}

impl<A, R, Fx: Effect> Default for Recorder<A, R, Fx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, R, Fx: Effect> fmt::Debug for Recorder<A, R, Fx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("effect", &Fx::KIND)
            .field("calls", &self.calls_count())
            .field("stubbed", &self.is_stubbed())
            .finish()
    }
}

// ── Plain ────────────────────────────────────────────────────────────────

impl<A: 'static, R: 'static> Recorder<A, R, Plain> {
    /// A recorder that answers calls with `behavior`.
    pub fn with_behavior(behavior: impl Fn(A) -> R + 'static) -> Self {
        Self::from_behavior(Rc::new(behavior))
    }

    /// Replace the behavior. History is kept.
    pub fn stub(&self, behavior: impl Fn(A) -> R + 'static) {
        self.replace_behavior(Rc::new(behavior));
    }

    /// Record `args`, then answer with the current behavior.
    #[track_caller]
    pub fn record(&self, args: A) -> R
    where
        A: Clone,
    {
        self.invoke(args)
    }
}

impl<R: 'static> Recorder<(), R, Plain> {
    /// `stub` with a closure that takes no arguments.
    pub fn stub_unit(&self, behavior: impl Fn() -> R + 'static) {
        self.stub(move |()| behavior());
    }
}

// ── Async ────────────────────────────────────────────────────────────────

impl<A: 'static, R: 'static> Recorder<A, R, Async> {
    /// A recorder whose calls await the future `behavior` returns.
    pub fn with_behavior<F, Fut>(behavior: F) -> Self
    where
        F: Fn(A) -> Fut + 'static,
        Fut: Future<Output = R> + 'static,
    {
        Self::from_behavior(Rc::new(move |args| -> LocalFuture<R> {
            Box::pin(behavior(args))
        }))
    }

    /// Replace the behavior. History is kept.
    pub fn stub<F, Fut>(&self, behavior: F)
    where
        F: Fn(A) -> Fut + 'static,
        Fut: Future<Output = R> + 'static,
    {
        self.replace_behavior(Rc::new(move |args| -> LocalFuture<R> {
            Box::pin(behavior(args))
        }));
    }

    /// Records the call immediately; the returned future runs the behavior's
    /// future. Dropping it without polling still leaves the call recorded.
    #[track_caller]
    pub fn record(&self, args: A) -> impl Future<Output = R>
    where
        A: Clone,
    {
        self.invoke(args)
    }
}

impl<R: 'static> Recorder<(), R, Async> {
    /// `stub` with a closure that takes no arguments.
    pub fn stub_unit<F, Fut>(&self, behavior: F)
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = R> + 'static,
    {
        self.stub(move |()| behavior());
    }
}

// ── Failable ─────────────────────────────────────────────────────────────

impl<A: 'static, R: 'static, E: 'static> Recorder<A, R, Failable<E>> {
    /// A recorder that answers calls with `behavior`, errors included.
    pub fn with_behavior(behavior: impl Fn(A) -> Result<R, E> + 'static) -> Self {
        Self::from_behavior(Rc::new(behavior))
    }

    /// Replace the behavior. History is kept.
    pub fn stub(&self, behavior: impl Fn(A) -> Result<R, E> + 'static) {
        self.replace_behavior(Rc::new(behavior));
    }

    /// Record `args`, then answer with the current behavior. Errors are
    /// returned as the behavior produced them.
    #[track_caller]
    pub fn record(&self, args: A) -> Result<R, E>
    where
        A: Clone,
    {
        self.invoke(args)
    }
}

impl<R: 'static, E: 'static> Recorder<(), R, Failable<E>> {
    /// `stub` with a closure that takes no arguments.
    pub fn stub_unit(&self, behavior: impl Fn() -> Result<R, E> + 'static) {
        self.stub(move |()| behavior());
    }
}

// ── Async + failable ─────────────────────────────────────────────────────

impl<A: 'static, R: 'static, E: 'static> Recorder<A, R, AsyncFailable<E>> {
    /// A recorder whose calls await the fallible future `behavior` returns.
    pub fn with_behavior<F, Fut>(behavior: F) -> Self
    where
        F: Fn(A) -> Fut + 'static,
        Fut: Future<Output = Result<R, E>> + 'static,
    {
        Self::from_behavior(Rc::new(move |args| -> LocalFuture<Result<R, E>> {
            Box::pin(behavior(args))
        }))
    }

    /// Replace the behavior. History is kept.
    pub fn stub<F, Fut>(&self, behavior: F)
    where
        F: Fn(A) -> Fut + 'static,
        Fut: Future<Output = Result<R, E>> + 'static,
    {
        self.replace_behavior(Rc::new(move |args| -> LocalFuture<Result<R, E>> {
            Box::pin(behavior(args))
        }));
    }

    /// Records the call immediately, like the infallible async variant.
    #[track_caller]
    pub fn record(&self, args: A) -> impl Future<Output = Result<R, E>>
    where
        A: Clone,
    {
        self.invoke(args)
    }
}

impl<R: 'static, E: 'static> Recorder<(), R, AsyncFailable<E>> {
    /// `stub` with a closure that takes no arguments.
    pub fn stub_unit<F, Fut>(&self, behavior: F)
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<R, E>> + 'static,
    {
        self.stub(move |()| behavior());
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn counts_every_call() {
        let rec: Recorder<i32, i32> = Recorder::new();
        rec.stub(|x| x * 2);
        assert_eq!(rec.calls_count(), 0);
        assert!(!rec.was_called());
        for i in 0..5 {
            rec.record(i);
        }
        assert_eq!(rec.calls_count(), 5);
        assert!(rec.was_called());
    }

    #[test]
    fn latest_call_tracks_last_arguments() {
        let rec: Recorder<(i32, String), ()> = Recorder::silent();
        assert_eq!(rec.latest_call(), None);
        rec.record((1, "2".to_string()));
        rec.record((3, "4".to_string()));
        assert_eq!(rec.latest_call(), Some((3, "4".to_string())));
        assert_eq!(
            rec.calls(),
            vec![(1, "2".to_string()), (3, "4".to_string())]
        );
    }

    #[test]
    fn duplicate_arguments_are_kept() {
        let rec: Recorder<&'static str, ()> = Recorder::silent();
        rec.record("a");
        rec.record("a");
        assert_eq!(rec.calls(), vec!["a", "a"]);
    }

    #[test]
    fn returning_ignores_arguments() {
        let rec: Recorder<u8, &'static str> = Recorder::returning("fixed");
        assert_eq!(rec.record(1), "fixed");
        assert_eq!(rec.record(200), "fixed");
    }

    #[test]
    fn stub_replaces_behavior_and_keeps_history() {
        let rec: Recorder<i32, i32> = Recorder::returning(0);
        rec.record(1);
        rec.stub(|x| x + 100);
        assert_eq!(rec.record(2), 102);
        rec.stub(|x| -x);
        assert_eq!(rec.record(3), -3);
        assert_eq!(rec.calls(), vec![1, 2, 3]);
    }

    #[test]
    fn behavior_sees_arguments_after_append() {
        let rec: Rc<Recorder<i32, usize>> = Rc::new(Recorder::new());
        let inner = Rc::downgrade(&rec);
        rec.stub(move |_| inner.upgrade().map_or(0, |r| r.calls_count()));
        assert_eq!(rec.record(7), 1);
        assert_eq!(rec.record(8), 2);
    }

    #[test]
    fn behavior_may_restub_itself() {
        let rec: Rc<Recorder<(), i32>> = Rc::new(Recorder::new());
        let inner = Rc::downgrade(&rec);
        rec.stub_unit(move || {
            if let Some(r) = inner.upgrade() {
                r.stub_unit(|| 2);
            }
            1
        });
        assert_eq!(rec.record_unit(), 1);
        assert_eq!(rec.record_unit(), 2);
    }

    #[test]
    fn recursive_behavior_reenters_recorder() {
        let factorial: Rc<Recorder<u32, u32>> = Rc::new(Recorder::new());
        let inner = Rc::downgrade(&factorial);
        factorial.stub(move |n| {
            if n == 0 {
                1
            } else {
                n * inner.upgrade().map_or(0, |r| r.record(n - 1))
            }
        });
        assert_eq!(factorial.record(3), 6);
        assert_eq!(factorial.calls(), vec![3, 2, 1, 0]);
        assert_eq!(factorial.record(1), 1);
    }

    #[test]
    fn panicking_behavior_stays_installed() {
        let rec: Recorder<i32, i32> = Recorder::new();
        rec.stub(|x| if x < 0 { panic!("negative") } else { x });
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| rec.record(-1)));
        assert!(result.is_err());
        assert!(rec.is_stubbed());
        assert_eq!(rec.record(4), 4);
        assert_eq!(rec.calls_count(), 2);
    }

    #[test]
    fn stateful_behavior() {
        let counter = Rc::new(Cell::new(0));
        let seen = Rc::clone(&counter);
        let rec = <Recorder<(), i32>>::with_behavior(move |()| {
            seen.set(seen.get() + 1);
            seen.get()
        });
        assert_eq!(rec.record_unit(), 1);
        assert_eq!(rec.record_unit(), 2);
        assert_eq!(counter.get(), 2);
    }

    #[test]
    #[should_panic(expected = "unstubbed call to recorder")]
    fn unset_recorder_panics() {
        let rec: Recorder<i32, i32> = Recorder::new();
        rec.record(1);
    }

    #[test]
    fn unset_panic_names_the_call_site() {
        let rec: Recorder<(), ()> = Recorder::default();
        let line = line!() + 1;
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| rec.record_unit()));
        let payload = result.unwrap_err();
        let message = payload
            .downcast_ref::<String>()
            .cloned()
            .unwrap_or_default();
        assert!(message.contains(file!()), "{message}");
        assert!(message.contains(&format!(":{line}:")), "{message}");
        // The call is recorded before the behavior is looked up.
        assert_eq!(rec.calls_count(), 1);
    }

    #[test]
    fn failable_propagates_errors() {
        let rec: FailableRecorder<u32, u32, String> = Recorder::failing_with("boom".to_string());
        assert_eq!(rec.record(1), Err("boom".to_string()));
        rec.stub(|x| if x > 5 { Ok(x) } else { Err(format!("{x} too small")) });
        assert_eq!(rec.record(9), Ok(9));
        assert_eq!(rec.record(2), Err("2 too small".to_string()));
        assert_eq!(rec.calls_count(), 3);
    }

    #[test]
    fn failable_silent_and_unit() {
        let rec: FailableRecorder<(), (), String> = Recorder::silent();
        assert_eq!(rec.record_unit(), Ok(()));
        rec.stub_unit(|| Err("nope".to_string()));
        assert_eq!(rec.record(()), Err("nope".to_string()));
    }

    #[test]
    fn is_stubbed_reflects_slot() {
        let rec: Recorder<(), i32> = Recorder::new();
        assert!(!rec.is_stubbed());
        rec.stub_unit(|| 3);
        assert!(rec.is_stubbed());
    }

    #[test]
    fn debug_shows_state() {
        let rec: Recorder<i32, ()> = Recorder::silent();
        rec.record(1);
        assert_eq!(
            format!("{rec:?}"),
            "Recorder { effect: Plain, calls: 1, stubbed: true }"
        );
    }
}
