//! The effect descriptor shared by the generator and the runtime.
//!
//! A member is either synchronous or asynchronous, and either infallible or
//! failable. The generator reads those two flags off a method signature and
//! picks one of four recorder variants; the runtime uses the same enum to
//! describe which variant a `Recorder` is.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four `{sync, async} × {infallible, failable}` recorder shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Plain,
    Async,
    Failable,
    AsyncFailable,
}

impl EffectKind {
    pub const ALL: [EffectKind; 4] = [
        EffectKind::Plain,
        EffectKind::Async,
        EffectKind::Failable,
        EffectKind::AsyncFailable,
    ];

    /// Select the variant for a member declared with the given effects.
    pub fn from_flags(is_async: bool, is_failable: bool) -> Self {
        match (is_async, is_failable) {
            (false, false) => EffectKind::Plain,
            (true, false) => EffectKind::Async,
            (false, true) => EffectKind::Failable,
            (true, true) => EffectKind::AsyncFailable,
        }
    }

    /// Whether `record` suspends the caller.
    pub fn is_async(self) -> bool {
        matches!(self, EffectKind::Async | EffectKind::AsyncFailable)
    }

    /// Whether `record` can hand a failure back to the caller.
    pub fn is_failable(self) -> bool {
        matches!(self, EffectKind::Failable | EffectKind::AsyncFailable)
    }

    /// Default spelling of the recorder type for this variant.
    pub fn recorder_name(self) -> &'static str {
        match self {
            EffectKind::Plain => "Recorder",
            EffectKind::Async => "AsyncRecorder",
            EffectKind::Failable => "FailableRecorder",
            EffectKind::AsyncFailable => "AsyncFailableRecorder",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EffectKind::Plain => "plain",
            EffectKind::Async => "async",
            EffectKind::Failable => "failable",
            EffectKind::AsyncFailable => "async failable",
        };
        f.write_str(text)
    }
}
