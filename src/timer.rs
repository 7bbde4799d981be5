use crate::config::WheelConfig;
use crate::error::TimerError;
use crate::event::{CallbackWrapper, CompletionReceiver, EventId, TimerEvent};
use crate::wheel::{Wheel, WheelSnapshot};
use parking_lot::Mutex;
use std::num::NonZeroU16;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to a registered event
///
/// Holds the event ID for cancellation and rescheduling, plus the receiver
/// half of the event's completion channel. The handle is not cloneable: the
/// completion channel has exactly one consumer.
///
/// 已注册事件的句柄
///
/// 保存用于取消和重新调度的事件 ID，以及事件完成通知通道的接收端。句柄不可
/// 克隆：完成通知通道只有一个消费者。
pub struct EventHandle {
    /// Event ID
    ///
    /// 事件 ID
    pub id: EventId,
    /// Completion receiver
    ///
    /// 完成通知接收器
    pub receiver: CompletionReceiver,
}

/// Running tick driver task and its shutdown trigger
///
/// 运行中的 tick 驱动任务及其关闭触发器
struct TickDriver {
    handle: JoinHandle<()>,
    shutdown_tx: oneshot::Sender<()>,
}

/// Timing wheel timer manager.
///
/// Owns the shared [`Wheel`] and drives it from a dedicated tokio task that
/// ticks at the configured interval. Scheduling, cancellation, and
/// rescheduling go through the manager while the driver runs; the wheel lock
/// is held only for the synchronous slot operations, never across callback
/// execution.
///
/// # Usage Flow (使用流程)
///
/// 1. Create a manager with [`WheelTimer::new`] or [`WheelTimer::with_defaults`]
/// 2. Create events with [`WheelTimer::create_event`] / [`WheelTimer::create_periodic_event`]
/// 3. Register them with [`WheelTimer::register`]
/// 4. Start the tick driver with [`WheelTimer::start`]
/// 5. Stop it with [`WheelTimer::stop`] when done
///
/// 时间轮定时器管理器。
///
/// 持有共享的 [`Wheel`]，并由一个按配置间隔 tick 的专用 tokio 任务驱动。
/// 驱动运行期间，调度、取消和重新调度都通过管理器进行；时间轮锁只在同步的
/// 槽位操作期间持有，绝不跨越回调执行。
///
/// # Examples (示例)
///
/// ```no_run
/// use rotor_timer::{WheelTimer, WheelConfig, CallbackWrapper};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let config = WheelConfig::builder()
///         .tick_interval(Duration::from_millis(10))
///         .slot_count(64)
///         .build()
///         .unwrap();
///     let mut timer = WheelTimer::new(config);
///     timer.start().unwrap();
///
///     let callback = CallbackWrapper::new(|| async {
///         println!("fired");
///     });
///     let event = WheelTimer::create_event(5, Some(callback));
///     let _handle = timer.register(event);
///
///     tokio::time::sleep(Duration::from_millis(100)).await;
///     timer.stop().await;
/// }
/// ```
pub struct WheelTimer {
    /// Shared wheel state, locked briefly per operation
    ///
    /// 共享的时间轮状态，每次操作短暂加锁
    wheel: Arc<Mutex<Wheel>>,

    /// Wall-clock duration of one tick
    ///
    /// 一个 tick 的墙钟时长
    tick_interval: Duration,

    /// Tick driver, present while running
    ///
    /// tick 驱动，运行期间存在
    driver: Option<TickDriver>,
}

impl WheelTimer {
    /// Create a new timer manager from a configuration
    ///
    /// The tick driver does not start automatically; call
    /// [`WheelTimer::start`] once a tokio runtime is available.
    ///
    /// 根据配置创建新的定时器管理器
    ///
    /// tick 驱动不会自动启动；在 tokio 运行时可用后调用
    /// [`WheelTimer::start`]。
    pub fn new(config: WheelConfig) -> Self {
        Self {
            wheel: Arc::new(Mutex::new(Wheel::new(&config))),
            tick_interval: config.tick_interval,
            driver: None,
        }
    }

    /// Create a timer manager with the default configuration
    ///
    /// 使用默认配置创建定时器管理器
    pub fn with_defaults() -> Self {
        Self::new(WheelConfig::default())
    }

    /// Create a one-shot timer event
    ///
    /// # Parameters
    /// - `interval`: Delay in ticks before the event fires
    /// - `callback`: Callback, optional
    ///
    /// 创建一次性定时器事件
    ///
    /// # 参数
    /// - `interval`: 事件触发前的延迟（tick 数）
    /// - `callback`: 回调函数，可选
    #[inline]
    pub fn create_event(interval: u64, callback: Option<CallbackWrapper>) -> TimerEvent {
        TimerEvent::new_oneshot(interval, callback)
    }

    /// Create a periodic timer event
    ///
    /// # Parameters
    /// - `interval`: Ticks between firings
    /// - `callback`: Callback, optional
    /// - `notify_buffer`: Capacity of the firing notification channel, optional
    ///
    /// 创建周期性定时器事件
    ///
    /// # 参数
    /// - `interval`: 两次触发之间的 tick 数
    /// - `callback`: 回调函数，可选
    /// - `notify_buffer`: 触发通知通道的容量，可选
    #[inline]
    pub fn create_periodic_event(
        interval: u64,
        callback: Option<CallbackWrapper>,
        notify_buffer: Option<NonZeroU16>,
    ) -> TimerEvent {
        TimerEvent::new_periodic(interval, callback, notify_buffer)
    }

    /// Register an event with the wheel
    ///
    /// # Returns
    /// A handle holding the event ID and the completion receiver
    ///
    /// 向时间轮注册事件
    ///
    /// # 返回值
    /// 保存事件 ID 和完成通知接收端的句柄
    pub fn register(&self, event: TimerEvent) -> EventHandle {
        let id = event.id();
        let receiver = self.wheel.lock().insert(event);
        EventHandle { id, receiver }
    }

    /// Cancel a scheduled event
    ///
    /// # Returns
    /// Returns true on success; returns false for unknown or already-fired
    /// events
    ///
    /// 取消已调度事件
    ///
    /// # 返回值
    /// 成功返回 true；对未知或已触发的事件返回 false
    #[inline]
    pub fn cancel(&self, event_id: EventId) -> bool {
        self.wheel.lock().cancel(event_id)
    }

    /// Change an event's interval for its next placement
    ///
    /// 更改事件下一次放置使用的间隔
    #[inline]
    pub fn reschedule(&self, event_id: EventId, new_interval: u64) -> bool {
        self.wheel.lock().reschedule(event_id, new_interval)
    }

    /// Reset the wheel clock and cancel all pending events
    ///
    /// 重置时间轮时钟并取消所有待触发事件
    #[inline]
    pub fn reset(&self) {
        self.wheel.lock().reset();
    }

    /// Number of pending events
    ///
    /// 待触发事件数量
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.wheel.lock().len()
    }

    /// Take a diagnostic snapshot of the wheel
    ///
    /// 获取时间轮的诊断快照
    #[inline]
    pub fn snapshot(&self) -> WheelSnapshot {
        self.wheel.lock().snapshot()
    }

    /// Whether the tick driver is currently running
    ///
    /// tick 驱动当前是否在运行
    #[inline]
    pub fn is_running(&self) -> bool {
        self.driver.is_some()
    }

    /// Configured wall-clock duration of one tick
    ///
    /// 配置的一个 tick 的墙钟时长
    #[inline]
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Start the tick driver task
    ///
    /// Spawns a tokio task that advances the wheel once per tick interval and
    /// runs due callbacks inline. Must be called inside a tokio runtime.
    ///
    /// # Returns
    /// - `Ok(())`: Driver started
    /// - `Err(TimerError::DriverAlreadyRunning)`: Already started
    /// - `Err(TimerError::StartFailed)`: No tokio runtime available
    ///
    /// 启动 tick 驱动任务
    ///
    /// 生成一个 tokio 任务，每个 tick 间隔将时间轮前进一次并内联运行到期
    /// 回调。必须在 tokio 运行时内调用。
    ///
    /// # 返回值
    /// - `Ok(())`: 驱动已启动
    /// - `Err(TimerError::DriverAlreadyRunning)`: 已经启动
    /// - `Err(TimerError::StartFailed)`: 没有可用的 tokio 运行时
    pub fn start(&mut self) -> Result<(), TimerError> {
        if self.driver.is_some() {
            return Err(TimerError::DriverAlreadyRunning);
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            TimerError::StartFailed {
                reason: "no tokio runtime available",
            }
        })?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let wheel = Arc::clone(&self.wheel);
        let tick_interval = self.tick_interval;

        let handle = runtime.spawn(tick_loop(wheel, tick_interval, shutdown_rx));

        self.driver = Some(TickDriver {
            handle,
            shutdown_tx,
        });
        Ok(())
    }

    /// Stop the tick driver
    ///
    /// Sends the shutdown signal and waits for the driver task to finish its
    /// current tick, so an in-progress fire pass is never interrupted.
    /// Pending events stay in the wheel and resume firing after a restart.
    ///
    /// # Returns
    /// Returns true if a running driver was stopped, false if none was
    /// running
    ///
    /// 停止 tick 驱动
    ///
    /// 发送关闭信号并等待驱动任务完成当前 tick，因此进行中的触发流程不会被
    /// 中断。待触发事件留在时间轮中，重启后继续触发。
    ///
    /// # 返回值
    /// 如果停止了运行中的驱动则返回 true，没有驱动在运行则返回 false
    pub async fn stop(&mut self) -> bool {
        let driver = match self.driver.take() {
            Some(driver) => driver,
            None => return false,
        };

        // The driver may have already exited; a failed send means nothing is
        // listening, which is fine.
        // 驱动可能已经退出；发送失败意味着没有接收方，这没有问题。
        let _ = driver.shutdown_tx.send(());
        let _ = driver.handle.await;
        true
    }
}

impl Drop for WheelTimer {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.handle.abort();
        }
    }
}

/// Tick driver loop.
///
/// Advances the wheel once per tick interval, running due callbacks inline
/// on this task: a slow callback delays every later event, the documented
/// cost of keeping firing strictly ordered on one driver. The interval timer
/// skips missed ticks instead of bursting to catch up.
///
/// tick 驱动循环。
///
/// 每个 tick 间隔将时间轮前进一次，并在本任务上内联运行到期回调：慢回调会
/// 延迟之后的所有事件，这是在单个驱动上保持严格触发顺序的已知代价。间隔
/// 定时器跳过错过的 tick 而不是突发补齐。
async fn tick_loop(
    wheel: Arc<Mutex<Wheel>>,
    tick_interval: Duration,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick of a tokio interval completes immediately; consume it so
    // the wheel only advances after a full interval has elapsed.
    // tokio interval 的第一个 tick 立即完成；先消费掉它，使时间轮只在经过
    // 完整间隔后才前进。
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = &mut shutdown_rx => {
                break;
            }
            _ = ticker.tick() => {
                let fired = {
                    let mut wheel = wheel.lock();
                    wheel.advance()
                };
                for event in fired {
                    event.fire().await;
                }
            }
        }
    }
}
