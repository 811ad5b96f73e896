//! A hand-written companion shaped like the generated ones: one recorder per
//! method named `<method>Calls`, one `MockVariable` per property.

#![allow(non_snake_case)]

use stubby_rt::{FailableRecorder, MockVariable, Recorder};

#[derive(Debug, Clone, PartialEq)]
struct NotFound;

#[derive(Default)]
struct UserStoreMock {
    priority: MockVariable<i32>,
    doActionCalls: Recorder<(), ()>,
    saveCalls: Recorder<(u32, String), bool>,
    findCalls: FailableRecorder<u32, String, NotFound>,
}

impl UserStoreMock {
    fn doAction(&self) {
        self.doActionCalls.record(())
    }

    fn save(&self, id: u32, name: String) -> bool {
        self.saveCalls.record((id, name))
    }

    fn find(&self, id: u32) -> Result<String, NotFound> {
        self.findCalls.record(id)
    }
}

struct UserStore {
    mock: UserStoreMock,
}

impl UserStore {
    fn new() -> Self {
        Self {
            mock: UserStoreMock::default(),
        }
    }

    fn priority(&self) -> i32 {
        self.mock.priority.get()
    }

    fn set_priority(&self, value: i32) {
        self.mock.priority.set(value)
    }
}

#[test]
fn zero_argument_method_records_unit() {
    let store = UserStore::new();
    store.mock.doActionCalls.stub_unit(|| ());
    store.mock.doAction();
    store.mock.doAction();
    assert_eq!(store.mock.doActionCalls.calls_count(), 2);
    assert_eq!(store.mock.doActionCalls.latest_call(), Some(()));
}

#[test]
fn multi_argument_method_records_tuples() {
    let store = UserStore::new();
    store.mock.saveCalls.stub(|(id, _)| id != 0);
    assert!(store.mock.save(1, "ada".into()));
    assert!(!store.mock.save(0, "root".into()));
    assert_eq!(
        store.mock.saveCalls.calls(),
        vec![(1, "ada".to_string()), (0, "root".to_string())]
    );
}

#[test]
fn failable_method_surfaces_errors() {
    let store = UserStore::new();
    store
        .mock
        .findCalls
        .stub(|id| if id == 7 { Ok("seven".into()) } else { Err(NotFound) });
    assert_eq!(store.mock.find(7), Ok("seven".to_string()));
    assert_eq!(store.mock.find(8), Err(NotFound));
}

#[test]
fn property_accessors_go_through_the_variable() {
    let store = UserStore::new();
    store.mock.priority.getter.stub_unit(|| 9);
    store.set_priority(1);
    assert_eq!(store.priority(), 9);
    assert_eq!(store.mock.priority.setter.calls(), vec![1]);
}

#[test]
fn companions_are_independent() {
    let a = UserStore::new();
    let b = UserStore::new();
    a.mock.saveCalls.stub(|_| true);
    b.mock.saveCalls.stub(|_| false);
    assert!(a.mock.save(1, "x".into()));
    assert!(!b.mock.save(1, "x".into()));
    assert_eq!(a.mock.saveCalls.calls_count(), 1);
    assert_eq!(b.mock.saveCalls.calls_count(), 1);
}
