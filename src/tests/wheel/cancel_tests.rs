//! 取消行为测试 (Cancellation behavior tests)

use crate::config::WheelConfig;
use crate::event::{CompletionReceiver, EventCompletion, TimerEvent};
use crate::wheel::Wheel;

fn ten_slot_wheel() -> Wheel {
    let config = WheelConfig::builder().slot_count(10).build().unwrap();
    Wheel::new(&config)
}

#[test]
fn test_cancel_delivers_cancelled_to_oneshot_receiver() {
    let mut wheel = ten_slot_wheel();
    let event = TimerEvent::new_oneshot(5, None);
    let id = event.id();
    let rx = wheel.insert(event);

    assert!(wheel.cancel(id));

    let mut rx = match rx {
        CompletionReceiver::OneShot(rx) => rx.0,
        CompletionReceiver::Periodic(_) => panic!("expected one-shot receiver"),
    };
    assert_eq!(rx.try_recv().unwrap(), EventCompletion::Cancelled);
}

#[test]
fn test_cancel_delivers_cancelled_to_periodic_receiver() {
    let mut wheel = ten_slot_wheel();
    let event = TimerEvent::new_periodic(4, None, None);
    let id = event.id();
    let rx = wheel.insert(event);

    // Let it fire once before cancelling.
    // 在取消之前让它触发一次。
    for _ in 0..4 {
        wheel.advance();
    }
    assert!(wheel.cancel(id));

    let mut rx = match rx {
        CompletionReceiver::Periodic(rx) => rx,
        CompletionReceiver::OneShot(_) => panic!("expected periodic receiver"),
    };
    assert_eq!(rx.try_recv().unwrap(), EventCompletion::Fired);
    assert_eq!(rx.try_recv().unwrap(), EventCompletion::Cancelled);
}

#[test]
fn test_cancelled_periodic_event_never_fires_again() {
    let mut wheel = ten_slot_wheel();
    let event = TimerEvent::new_periodic(3, None, None);
    let id = event.id();
    let _rx = wheel.insert(event);

    for _ in 0..3 {
        wheel.advance();
    }
    assert!(wheel.cancel(id));
    assert!(wheel.is_empty());

    for _ in 0..30 {
        assert!(wheel.advance().is_empty());
    }
}

#[test]
fn test_cancel_one_of_several_in_same_slot() {
    let mut wheel = ten_slot_wheel();
    let keep_a = TimerEvent::new_oneshot(6, None);
    let drop_b = TimerEvent::new_oneshot(6, None);
    let keep_c = TimerEvent::new_oneshot(6, None);
    let drop_id = drop_b.id();

    let _rx_a = wheel.insert(keep_a);
    let _rx_b = wheel.insert(drop_b);
    let _rx_c = wheel.insert(keep_c);
    assert_eq!(wheel.snapshot().slot_occupancy[6], 3);

    assert!(wheel.cancel(drop_id));
    assert_eq!(wheel.snapshot().slot_occupancy[6], 2);

    for _ in 0..5 {
        wheel.advance();
    }
    let fired = wheel.advance();
    assert_eq!(fired.len(), 2);
}

#[test]
fn test_double_cancel_returns_false() {
    let mut wheel = ten_slot_wheel();
    let event = TimerEvent::new_oneshot(5, None);
    let id = event.id();
    let _rx = wheel.insert(event);

    assert!(wheel.cancel(id));
    assert!(!wheel.cancel(id));
}
