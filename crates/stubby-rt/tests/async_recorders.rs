//! Asynchronous recorder variants driven on a tokio runtime.

use std::time::Duration;

use stubby_rt::{AsyncFailableRecorder, AsyncRecorder, Recorder};

#[tokio::test]
async fn async_returning_value() {
    let load: AsyncRecorder<u32, String> = Recorder::returning("cached".to_string());
    assert_eq!(load.record(1).await, "cached");
    assert_eq!(load.record(2).await, "cached");
    assert_eq!(load.calls(), vec![1, 2]);
}

#[tokio::test]
async fn async_stub_awaits_behavior_future() {
    let delay: AsyncRecorder<u64, u64> = Recorder::new();
    delay.stub(|ms| async move {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        ms * 2
    });
    assert_eq!(delay.record(5).await, 10);
}

#[tokio::test]
async fn history_is_appended_before_the_future_runs() {
    let ping: AsyncRecorder<(), ()> = Recorder::silent();
    let pending = ping.record_unit();
    assert_eq!(ping.calls_count(), 1);
    pending.await;
    assert_eq!(ping.calls_count(), 1);
}

#[tokio::test]
async fn dropped_call_still_counts() {
    let ping: AsyncRecorder<u8, ()> = Recorder::silent();
    drop(ping.record(9));
    assert_eq!(ping.latest_call(), Some(9));
}

#[tokio::test]
async fn interleaved_calls_keep_order() {
    let fetch: AsyncRecorder<&'static str, usize> = Recorder::new();
    fetch.stub(|key: &'static str| async move {
        tokio::task::yield_now().await;
        key.len()
    });
    let a = fetch.record("a");
    let bb = fetch.record("bb");
    let (a, bb) = tokio::join!(a, bb);
    assert_eq!((a, bb), (1, 2));
    assert_eq!(fetch.calls(), vec!["a", "bb"]);
}

#[derive(Debug, Clone, PartialEq)]
enum FetchError {
    Offline,
}

#[tokio::test]
async fn async_failable_propagates_errors() {
    let sync: AsyncFailableRecorder<u32, (), FetchError> = Recorder::failing_with(FetchError::Offline);
    assert_eq!(sync.record(1).await, Err(FetchError::Offline));

    sync.stub(|n| async move {
        if n % 2 == 0 {
            Ok(())
        } else {
            Err(FetchError::Offline)
        }
    });
    assert_eq!(sync.record(2).await, Ok(()));
    assert_eq!(sync.record(3).await, Err(FetchError::Offline));
    assert_eq!(sync.calls_count(), 3);
}

#[tokio::test]
async fn async_failable_unit_helpers() {
    let refresh: AsyncFailableRecorder<(), u8, FetchError> = Recorder::new();
    refresh.stub_unit(|| async { Ok(4) });
    assert_eq!(refresh.record_unit().await, Ok(4));
    assert_eq!(refresh.record(()).await, Ok(4));
}

#[tokio::test]
#[should_panic(expected = "unstubbed call to recorder")]
async fn unstubbed_async_recorder_panics_at_call() {
    let never: AsyncRecorder<(), ()> = Recorder::new();
    // Panics when the call is made, not when it is awaited.
    let _ = never.record_unit();
}
