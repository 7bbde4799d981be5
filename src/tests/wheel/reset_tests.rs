//! 重置行为测试 (Reset behavior tests)

use crate::config::WheelConfig;
use crate::event::{CompletionReceiver, EventCompletion, TimerEvent};
use crate::wheel::Wheel;

fn ten_slot_wheel() -> Wheel {
    let config = WheelConfig::builder().slot_count(10).build().unwrap();
    Wheel::new(&config)
}

#[test]
fn test_reset_notifies_every_pending_event() {
    let mut wheel = ten_slot_wheel();
    let rx_oneshot = wheel.insert(TimerEvent::new_oneshot(5, None));
    let rx_periodic = wheel.insert(TimerEvent::new_periodic(3, None, None));

    wheel.reset();

    let mut rx_oneshot = match rx_oneshot {
        CompletionReceiver::OneShot(rx) => rx.0,
        CompletionReceiver::Periodic(_) => panic!("expected one-shot receiver"),
    };
    assert_eq!(rx_oneshot.try_recv().unwrap(), EventCompletion::Cancelled);

    let mut rx_periodic = match rx_periodic {
        CompletionReceiver::Periodic(rx) => rx,
        CompletionReceiver::OneShot(_) => panic!("expected periodic receiver"),
    };
    assert_eq!(rx_periodic.try_recv().unwrap(), EventCompletion::Cancelled);
}

#[test]
fn test_reset_mid_rotation_rewinds_the_clock() {
    let mut wheel = ten_slot_wheel();
    for _ in 0..17 {
        wheel.advance();
    }
    assert_eq!(wheel.tick_cursor(), 7);
    assert_eq!(wheel.cycle_count(), 1);

    wheel.reset();
    assert_eq!(wheel.tick_cursor(), 0);
    assert_eq!(wheel.cycle_count(), 0);
    assert_eq!(wheel.absolute_tick(), 0);
}

#[test]
fn test_scheduling_after_reset_uses_the_fresh_clock() {
    let mut wheel = ten_slot_wheel();
    let _stale = wheel.insert(TimerEvent::new_oneshot(9, None));
    for _ in 0..13 {
        wheel.advance();
    }

    wheel.reset();

    // A new event placed after the reset fires relative to tick zero.
    // 重置后放置的新事件相对于 tick 零触发。
    let _rx = wheel.insert(TimerEvent::new_oneshot(4, None));
    assert_eq!(wheel.snapshot().slot_occupancy[4], 1);

    let mut fire_ticks = Vec::new();
    for tick in 1..=10u64 {
        if !wheel.advance().is_empty() {
            fire_ticks.push(tick);
        }
    }
    assert_eq!(fire_ticks, vec![4]);
}

#[test]
fn test_reset_on_empty_wheel_is_harmless() {
    let mut wheel = ten_slot_wheel();
    wheel.reset();
    assert!(wheel.is_empty());
    assert_eq!(wheel.absolute_tick(), 0);
}
