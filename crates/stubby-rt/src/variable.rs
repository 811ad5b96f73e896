//! Mocked properties.

use std::fmt;

use crate::recorder::Recorder;

/// A property stand-in: one recorder for writes, one for reads.
///
/// The two halves share nothing. Setting a value does not change what the
/// getter returns unless a behavior wires them together.
pub struct MockVariable<T> {
    pub setter: Recorder<T, ()>,
    pub getter: Recorder<(), T>,
}

impl<T: 'static> MockVariable<T> {
    /// Writes are accepted silently; reads panic until the getter is stubbed.
    pub fn new() -> Self {
        Self {
            setter: Recorder::silent(),
            getter: Recorder::new(),
        }
    }

    /// Reads return `value`; writes are accepted silently.
    pub fn returning(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            setter: Recorder::silent(),
            getter: Recorder::returning(value),
        }
    }

    /// Record a read.
    #[track_caller]
    pub fn get(&self) -> T {
        self.getter.record_unit()
    }

    /// Record a write.
    #[track_caller]
    pub fn set(&self, value: T)
    where
        T: Clone,
    {
        self.setter.record(value)
    }
}

impl<T: 'static> Default for MockVariable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for MockVariable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockVariable")
            .field("setter", &self.setter)
            .field("getter", &self.getter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn getter_and_setter_record_independently() {
        let priority: MockVariable<i32> = MockVariable::returning(3);
        priority.set(5);
        priority.set(7);
        assert_eq!(priority.get(), 3);
        assert_eq!(priority.setter.calls(), vec![5, 7]);
        assert_eq!(priority.getter.calls_count(), 1);
    }

    #[test]
    fn getter_can_be_stubbed() {
        let name: MockVariable<String> = MockVariable::new();
        name.getter.stub_unit(|| "stubbed".to_string());
        assert_eq!(name.get(), "stubbed");
    }

    #[test]
    fn setter_accepts_writes_by_default() {
        let flag: MockVariable<bool> = MockVariable::default();
        flag.set(true);
        assert_eq!(flag.setter.latest_call(), Some(true));
        assert!(!flag.getter.is_stubbed());
    }

    #[test]
    #[should_panic(expected = "unstubbed call to recorder")]
    fn unstubbed_getter_panics() {
        let value: MockVariable<u8> = MockVariable::new();
        value.get();
    }
}
