use std::future::Future;
use std::num::NonZeroU16;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

/// Global unique event ID generator
///
/// 全局唯一事件 ID 生成器
static NEXT_EVENT_ID: AtomicU64 = AtomicU64::new(1);

/// Default notification buffer for periodic events
///
/// 周期性事件的默认通知缓冲区大小
const DEFAULT_NOTIFY_BUFFER: u16 = 32;

/// Event completion reason, fired or cancelled.
///
/// 事件完成原因，触发或取消。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCompletion {
    /// Event fired
    ///
    /// 事件已触发
    Fired,
    /// Event was cancelled
    ///
    /// 事件被取消
    Cancelled,
}

/// Unique identifier for scheduled events
///
/// 调度事件的唯一标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(u64);

impl EventId {
    /// Generate a new unique event ID (internal use)
    ///
    /// 生成一个新的唯一事件 ID (内部使用)
    #[inline]
    pub(crate) fn new() -> Self {
        EventId(NEXT_EVENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the numeric value of the event ID
    ///
    /// 获取事件 ID 的数值
    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Timer Callback Trait
///
/// Types implementing this trait can be used as timer callbacks. The closure
/// captures its own typed argument, so the wheel never handles raw argument
/// buffers; whatever the callback owns lives exactly as long as the event.
///
/// 可实现此特性的类型可以作为定时器回调函数。闭包捕获自己的类型化参数，
/// 时间轮从不处理原始参数缓冲区；回调持有的数据与事件同生共死。
///
/// # Examples (示例)
///
/// ```
/// use rotor_timer::TimerCallback;
/// use std::future::Future;
/// use std::pin::Pin;
///
/// struct MyCallback;
///
/// impl TimerCallback for MyCallback {
///     fn call(&self) -> Pin<Box<dyn Future<Output = ()> + Send>> {
///         Box::pin(async {
///             println!("Timer callback executed!");
///         })
///     }
/// }
/// ```
pub trait TimerCallback: Send + Sync + 'static {
    /// Execute callback, returns a Future
    ///
    /// 执行回调函数，返回一个 Future
    fn call(&self) -> Pin<Box<dyn Future<Output = ()> + Send>>;
}

/// Implement TimerCallback trait for closures
///
/// Supports Fn() -> Future closures, can be called multiple times, suitable
/// for periodic events
///
/// 为闭包实现 TimerCallback 特性，支持 Fn() -> Future 闭包，可以多次调用，
/// 适合周期性事件
impl<F, Fut> TimerCallback for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn call(&self) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin(self())
    }
}

/// Callback wrapper for standardized callback creation and management
///
/// Callback 包装器，用于标准化回调创建和管理
///
/// # Examples (示例)
///
/// ```
/// use rotor_timer::CallbackWrapper;
///
/// let callback = CallbackWrapper::new(|| async {
///     println!("Timer callback executed!");
/// });
/// ```
#[derive(Clone)]
pub struct CallbackWrapper {
    callback: Arc<dyn TimerCallback>,
}

impl CallbackWrapper {
    /// Create a new callback wrapper
    ///
    /// # Parameters
    /// - `callback`: Callback object implementing TimerCallback trait
    ///
    /// 创建一个新的回调包装器
    ///
    /// # 参数
    /// - `callback`: 实现 TimerCallback 特性的回调对象
    #[inline]
    pub fn new(callback: impl TimerCallback) -> Self {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Call the callback function
    ///
    /// 调用回调函数
    #[inline]
    pub(crate) fn call(&self) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        self.callback.call()
    }
}

/// Event kind enum to distinguish between one-shot and periodic events
///
/// 事件类型枚举，用于区分一次性和周期性事件
#[derive(Clone)]
pub enum EventKind {
    /// One-shot event: fires once and is discarded
    ///
    /// 一次性事件：触发一次后被丢弃
    OneShot,

    /// Periodic event: reinserted after every firing until cancelled
    ///
    /// 周期性事件：每次触发后重新插入，直到被取消
    Periodic {
        /// Buffer size for the periodic completion notifier
        ///
        /// 周期性事件完成通知器的缓冲区大小
        notify_buffer: NonZeroU16,
    },
}

/// Timer Event
///
/// Users interact via a two-step API:
/// 1. Create an event using [`TimerEvent::new_oneshot`] or [`TimerEvent::new_periodic`]
/// 2. Register it using `WheelTimer::register()` or `Wheel::insert()`
///
/// 定时器事件
///
/// 用户通过两步 API 与定时器交互：
/// 1. 使用 [`TimerEvent::new_oneshot`] 或 [`TimerEvent::new_periodic`] 创建事件
/// 2. 使用 `WheelTimer::register()` 或 `Wheel::insert()` 注册事件
pub struct TimerEvent {
    /// Unique event identifier
    ///
    /// 唯一事件标识符
    pub(crate) id: EventId,

    /// Event kind (one-shot or periodic)
    ///
    /// 事件类型（一次性或周期性）
    pub(crate) kind: EventKind,

    /// Requested delay in tick units; zero is rounded up to one tick at
    /// placement time
    ///
    /// 请求的延迟，以 tick 为单位；零在放置时向上取整为一个 tick
    pub(crate) interval: u64,

    /// Async callback, optional
    ///
    /// 异步回调函数，可选
    pub(crate) callback: Option<CallbackWrapper>,
}

impl TimerEvent {
    /// Create a new one-shot timer event
    ///
    /// # Parameters
    /// - `interval`: Delay in tick units before the event fires
    /// - `callback`: Callback, optional
    ///
    /// 创建一个新的一次性定时器事件
    ///
    /// # 参数
    /// - `interval`: 事件触发前的延迟（tick 数）
    /// - `callback`: 回调函数，可选
    #[inline]
    pub fn new_oneshot(interval: u64, callback: Option<CallbackWrapper>) -> Self {
        Self {
            id: EventId::new(),
            kind: EventKind::OneShot,
            interval,
            callback,
        }
    }

    /// Create a new periodic timer event
    ///
    /// The event fires every `interval` ticks until cancelled.
    ///
    /// # Parameters
    /// - `interval`: Ticks between firings
    /// - `callback`: Callback, optional
    /// - `notify_buffer`: Capacity of the firing notification channel,
    ///   defaults to 32
    ///
    /// 创建一个新的周期性定时器事件
    ///
    /// 事件每隔 `interval` 个 tick 触发一次，直到被取消。
    ///
    /// # 参数
    /// - `interval`: 两次触发之间的 tick 数
    /// - `callback`: 回调函数，可选
    /// - `notify_buffer`: 触发通知通道的容量，默认为 32
    #[inline]
    pub fn new_periodic(
        interval: u64,
        callback: Option<CallbackWrapper>,
        notify_buffer: Option<NonZeroU16>,
    ) -> Self {
        Self {
            id: EventId::new(),
            kind: EventKind::Periodic {
                notify_buffer: notify_buffer
                    .unwrap_or_else(|| NonZeroU16::new(DEFAULT_NOTIFY_BUFFER).unwrap()),
            },
            interval,
            callback,
        }
    }

    /// Get event ID
    ///
    /// 获取事件 ID
    #[inline]
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Get the requested interval in tick units
    ///
    /// 获取请求的间隔（tick 数）
    #[inline]
    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// Whether the event is periodic
    ///
    /// 事件是否为周期性
    #[inline]
    pub fn is_periodic(&self) -> bool {
        matches!(self.kind, EventKind::Periodic { .. })
    }
}

/// Completion receiver for one-shot events
///
/// 一次性事件完成通知接收器
pub struct OneShotReceiver(pub oneshot::Receiver<EventCompletion>);

/// Completion receiver for periodic events
///
/// 周期性事件完成通知接收器
pub struct PeriodicReceiver(pub(crate) mpsc::Receiver<EventCompletion>);

impl PeriodicReceiver {
    /// Try to receive a completion notification
    ///
    /// 尝试接收完成通知
    #[inline]
    pub fn try_recv(&mut self) -> Result<EventCompletion, mpsc::error::TryRecvError> {
        self.0.try_recv()
    }

    /// Receive a completion notification
    ///
    /// 接收完成通知
    #[inline]
    pub async fn recv(&mut self) -> Option<EventCompletion> {
        self.0.recv().await
    }
}

/// Completion receiver for one-shot and periodic events
///
/// 一次性和周期性事件完成通知接收器
pub enum CompletionReceiver {
    OneShot(OneShotReceiver),
    Periodic(PeriodicReceiver),
}

/// Entry kind with its completion notifier, as stored inside the wheel
///
/// 带有完成通知器的条目类型，存储在时间轮内部
pub(crate) enum EntryKind {
    OneShot {
        notifier: oneshot::Sender<EventCompletion>,
    },
    Periodic {
        notifier: mpsc::Sender<EventCompletion>,
    },
}

/// A scheduled event as it lives inside a slot.
///
/// `cycle` is recomputed on every placement; the entry's current slot index
/// is tracked by the wheel's event index rather than duplicated here.
///
/// 槽位中保存的已调度事件。`cycle` 在每次放置时重新计算；条目当前所在的
/// 槽位索引由时间轮的事件索引记录，而不在此处重复保存。
pub(crate) struct SlotEntry {
    pub(crate) id: EventId,
    pub(crate) interval: u64,
    pub(crate) cycle: u64,
    pub(crate) kind: EntryKind,
    pub(crate) callback: Option<CallbackWrapper>,
}

impl SlotEntry {
    /// Split a user-facing event into its wheel entry and the receiver half
    /// of its completion channel
    ///
    /// 将用户侧事件拆分为时间轮条目和完成通知通道的接收端
    pub(crate) fn from_event(event: TimerEvent) -> (Self, CompletionReceiver) {
        match event.kind {
            EventKind::OneShot => {
                let (tx, rx) = oneshot::channel();
                (
                    Self {
                        id: event.id,
                        interval: event.interval,
                        cycle: 0,
                        kind: EntryKind::OneShot { notifier: tx },
                        callback: event.callback,
                    },
                    CompletionReceiver::OneShot(OneShotReceiver(rx)),
                )
            }
            EventKind::Periodic { notify_buffer } => {
                let (tx, rx) = mpsc::channel(notify_buffer.get() as usize);
                (
                    Self {
                        id: event.id,
                        interval: event.interval,
                        cycle: 0,
                        kind: EntryKind::Periodic { notifier: tx },
                        callback: event.callback,
                    },
                    CompletionReceiver::Periodic(PeriodicReceiver(rx)),
                )
            }
        }
    }

    /// Send a cancellation notice and drop the entry
    ///
    /// 发送取消通知并丢弃条目
    pub(crate) fn notify_cancelled(self) {
        match self.kind {
            EntryKind::OneShot { notifier } => {
                let _ = notifier.send(EventCompletion::Cancelled);
            }
            EntryKind::Periodic { notifier } => {
                let _ = notifier.try_send(EventCompletion::Cancelled);
            }
        }
    }
}
