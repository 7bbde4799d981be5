//! # rotor-timer
//!
//! 基于平面时间轮的高性能定时器库，由 tokio 异步运行时驱动。
//! (High-performance timer library based on a flat timing wheel, driven by
//! the tokio async runtime)
//!
//! ## 核心特性 (Core Features)
//!
//! - **O(1) 调度**: 插入、取消和触发判定都是常数时间的槽位操作
//!   (O(1) scheduling: insertion, cancellation and due-checking are
//!   constant-time slot operations)
//! - **平面轮设计**: 单层固定槽位环，超出一圈的延迟通过圈数计数表示
//!   (Flat wheel design: a single fixed ring of slots, delays beyond one
//!   rotation are expressed through a cycle count)
//! - **一次性与周期性事件**: 周期性事件在每次触发后自动重新插入
//!   (One-shot and periodic events: periodic events are reinserted
//!   automatically after every firing)
//! - **异步回调**: 回调是异步闭包或 [`TimerCallback`] 实现，由驱动任务
//!   内联执行 (Async callbacks: callbacks are async closures or
//!   [`TimerCallback`] implementations, executed inline by the driver task)
//! - **协作式关闭**: 驱动任务在 tick 边界响应关闭信号，不打断触发流程
//!   (Cooperative shutdown: the driver task honors the shutdown signal at
//!   tick boundaries, never interrupting a fire pass)
//!
//! ## 快速开始 (Quick Start)
//!
//! ```no_run
//! use rotor_timer::{WheelTimer, WheelConfig, CallbackWrapper};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     // 创建定时器：64 个槽位，每 10 毫秒一个 tick
//!     // (Create a timer: 64 slots, one tick every 10 milliseconds)
//!     let config = WheelConfig::builder()
//!         .tick_interval(Duration::from_millis(10))
//!         .slot_count(64)
//!         .build()
//!         .unwrap();
//!     let mut timer = WheelTimer::new(config);
//!     timer.start().unwrap();
//!
//!     // 调度一个 5 tick 后触发的一次性事件
//!     // (Schedule a one-shot event firing after 5 ticks)
//!     let callback = CallbackWrapper::new(|| async {
//!         println!("timer fired!");
//!     });
//!     let event = WheelTimer::create_event(5, Some(callback));
//!     let _handle = timer.register(event);
//!
//!     tokio::time::sleep(Duration::from_millis(100)).await;
//!     timer.stop().await;
//! }
//! ```
//!
//! ## 直接驱动 (Direct Driving)
//!
//! [`Wheel`] 本身是同步且确定性的，测试和仿真可以不启动驱动任务，直接调用
//! [`Wheel::advance`] 逐 tick 推进。
//! ([`Wheel`] itself is synchronous and deterministic; tests and simulations
//! can call [`Wheel::advance`] tick by tick without starting the driver task)

pub mod config;
pub mod error;
pub mod event;
pub mod timer;
pub mod wheel;


pub use config::{WheelConfig, WheelConfigBuilder};
pub use error::TimerError;
pub use event::{
    CallbackWrapper, CompletionReceiver, EventCompletion, EventId, OneShotReceiver,
    PeriodicReceiver, TimerCallback, TimerEvent,
};
pub use timer::{EventHandle, WheelTimer};
pub use wheel::{FiredEvent, Wheel, WheelSnapshot};
