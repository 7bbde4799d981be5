//! 启动/停止生命周期测试 (Start/stop lifecycle tests)

use crate::config::WheelConfig;
use crate::error::TimerError;
use crate::event::{CallbackWrapper, CompletionReceiver, EventCompletion};
use crate::timer::WheelTimer;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

fn fast_timer() -> WheelTimer {
    let config = WheelConfig::builder()
        .tick_interval(Duration::from_millis(10))
        .slot_count(16)
        .build()
        .unwrap();
    WheelTimer::new(config)
}

#[tokio::test]
async fn test_start_and_stop() {
    let mut timer = fast_timer();
    assert!(!timer.is_running());

    timer.start().unwrap();
    assert!(timer.is_running());

    assert!(timer.stop().await);
    assert!(!timer.is_running());
}

#[tokio::test]
async fn test_start_twice_is_rejected() {
    let mut timer = fast_timer();
    timer.start().unwrap();

    let err = timer.start().unwrap_err();
    assert_eq!(err, TimerError::DriverAlreadyRunning);

    timer.stop().await;
}

#[tokio::test]
async fn test_stop_without_start_returns_false() {
    let mut timer = fast_timer();
    assert!(!timer.stop().await);
}

#[tokio::test]
async fn test_oneshot_event_fires_and_notifies() {
    let mut timer = fast_timer();
    timer.start().unwrap();

    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = Arc::clone(&counter);
    let callback = CallbackWrapper::new(move || {
        let counter = Arc::clone(&counter_clone);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    let event = WheelTimer::create_event(3, Some(callback));
    let handle = timer.register(event);

    let rx = match handle.receiver {
        CompletionReceiver::OneShot(rx) => rx.0,
        CompletionReceiver::Periodic(_) => panic!("expected one-shot receiver"),
    };
    let completion = timeout(Duration::from_secs(2), rx)
        .await
        .expect("event did not fire in time")
        .unwrap();
    assert_eq!(completion, EventCompletion::Fired);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(timer.pending_count(), 0);

    timer.stop().await;
}

#[tokio::test]
async fn test_events_survive_stop_and_resume_after_restart() {
    let mut timer = fast_timer();

    let event = WheelTimer::create_event(5, None);
    let handle = timer.register(event);

    timer.start().unwrap();
    // Stop well before tick 5 elapses.
    // 在 tick 5 到来之前停止。
    timer.stop().await;
    assert_eq!(timer.pending_count(), 1);

    timer.start().unwrap();
    let rx = match handle.receiver {
        CompletionReceiver::OneShot(rx) => rx.0,
        CompletionReceiver::Periodic(_) => panic!("expected one-shot receiver"),
    };
    let completion = timeout(Duration::from_secs(2), rx)
        .await
        .expect("event did not fire after restart")
        .unwrap();
    assert_eq!(completion, EventCompletion::Fired);

    timer.stop().await;
}

#[tokio::test]
async fn test_driver_can_be_restarted_repeatedly() {
    let mut timer = fast_timer();
    for _ in 0..3 {
        timer.start().unwrap();
        assert!(timer.is_running());
        assert!(timer.stop().await);
    }
}

#[tokio::test]
async fn test_snapshot_reflects_registered_events() {
    let timer = fast_timer();
    let _h1 = timer.register(WheelTimer::create_event(2, None));
    let _h2 = timer.register(WheelTimer::create_event(2, None));

    let snapshot = timer.snapshot();
    assert_eq!(snapshot.pending, 2);
    assert_eq!(snapshot.slot_occupancy[2], 2);
}
