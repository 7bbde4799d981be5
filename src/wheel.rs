use crate::config::WheelConfig;
use crate::event::{
    CallbackWrapper, CompletionReceiver, EntryKind, EventCompletion, EventId, SlotEntry,
    TimerEvent,
};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;
use tokio::sync::oneshot;

/// Slot storage: most slots hold only a handful of events at a time, so keep
/// up to four entries inline
///
/// 槽位存储：大多数槽位同时只保存少量事件，因此最多四个条目内联存放
type Slot = SmallVec<[SlotEntry; 4]>;

/// An event that became due during [`Wheel::advance`].
///
/// The caller decides where to run the callback; [`FiredEvent::fire`] runs it
/// inline and then delivers the one-shot completion notice. Periodic events
/// have already been notified and reinserted by the time this value is
/// returned.
///
/// 在 [`Wheel::advance`] 期间到期的事件。
///
/// 由调用方决定在哪里运行回调；[`FiredEvent::fire`] 内联运行回调，然后发送
/// 一次性事件的完成通知。周期性事件在此值返回之前已被通知并重新插入。
pub struct FiredEvent {
    pub(crate) callback: Option<CallbackWrapper>,
    pub(crate) notifier: Option<oneshot::Sender<EventCompletion>>,
}

impl FiredEvent {
    /// Run the callback inline, then notify the one-shot completion channel
    ///
    /// 内联运行回调，然后向一次性完成通道发送通知
    pub async fn fire(self) {
        if let Some(callback) = self.callback {
            callback.call().await;
        }
        if let Some(notifier) = self.notifier {
            let _ = notifier.send(EventCompletion::Fired);
        }
    }
}

/// Diagnostic snapshot of the wheel: cursor, cycle, and per-slot occupancy
///
/// 时间轮的诊断快照：游标、圈数和每个槽位的占用数量
#[derive(Debug, Clone)]
pub struct WheelSnapshot {
    /// Current slot index the cursor points at
    ///
    /// 游标当前指向的槽位索引
    pub tick_cursor: usize,
    /// Completed full rotations since creation or the last reset
    ///
    /// 自创建或上次重置以来完成的完整圈数
    pub cycle_count: u64,
    /// Absolute tick position: `cycle_count * slot_count + tick_cursor`
    ///
    /// 绝对 tick 位置：`cycle_count * slot_count + tick_cursor`
    pub absolute_tick: u64,
    /// Total number of pending events
    ///
    /// 待触发事件总数
    pub pending: usize,
    /// Number of events held in each slot
    ///
    /// 每个槽位保存的事件数量
    pub slot_occupancy: Vec<usize>,
}

impl fmt::Display for WheelSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "wheel: cursor={} cycle={} abs_tick={} pending={}",
            self.tick_cursor, self.cycle_count, self.absolute_tick, self.pending
        )?;
        for (slot, count) in self.slot_occupancy.iter().enumerate() {
            if *count > 0 {
                writeln!(f, "  slot[{}] holds {} event(s)", slot, count)?;
            }
        }
        Ok(())
    }
}

/// Flat timing wheel engine.
///
/// A fixed ring of slots advanced one slot per tick. An event scheduled
/// `interval` ticks ahead is placed at
/// `slot = (abs + interval) % slot_count` with
/// `cycle = (abs + interval) / slot_count`, where `abs` is the wheel's
/// current absolute tick. It fires on the advance that lands the cursor on
/// its slot while the wheel is in its cycle.
///
/// The wheel itself is synchronous and deterministic; [`crate::WheelTimer`]
/// drives it from a tokio task, but tests and simulations may call
/// [`Wheel::advance`] directly.
///
/// 平面时间轮引擎。
///
/// 固定槽位环，每个 tick 前进一个槽位。提前 `interval` 个 tick 调度的事件
/// 被放置在 `slot = (abs + interval) % slot_count`，
/// `cycle = (abs + interval) / slot_count`，其中 `abs` 是时间轮当前的绝对
/// tick。当游标落在其槽位且时间轮处于其圈数时触发。
///
/// 时间轮本身是同步且确定性的；[`crate::WheelTimer`] 从 tokio 任务驱动它，
/// 但测试和仿真可以直接调用 [`Wheel::advance`]。
pub struct Wheel {
    /// Slot array, each slot stores scheduled events sorted ascending by cycle
    ///
    /// 槽数组，每个槽位按圈数升序存储已调度事件
    slots: Vec<Slot>,

    /// Current slot index, advances by 1 per tick, modulo `slot_count`
    ///
    /// 当前槽位索引，每个 tick 加 1，对 `slot_count` 取模
    tick_cursor: usize,

    /// Completed full rotations
    ///
    /// 已完成的完整圈数
    cycle_count: u64,

    /// Wheel width, immutable after construction
    ///
    /// 轮面宽度，构造后不可变
    slot_count: usize,

    /// Event index mapping each pending event to the slot holding it,
    /// for O(1) slot lookup on cancellation
    ///
    /// 事件索引，将每个待触发事件映射到保存它的槽位，用于取消时 O(1)
    /// 定位槽位
    pub(crate) index: FxHashMap<EventId, usize>,
}

impl Wheel {
    /// Create a new timing wheel
    ///
    /// # Parameters
    /// - `config`: Wheel configuration (already validated by the builder)
    ///
    /// 创建新的时间轮
    ///
    /// # 参数
    /// - `config`: 时间轮配置（已由构建器验证）
    pub fn new(config: &WheelConfig) -> Self {
        let mut slots = Vec::with_capacity(config.slot_count);
        for _ in 0..config.slot_count {
            slots.push(Slot::new());
        }

        Self {
            slots,
            tick_cursor: 0,
            cycle_count: 0,
            slot_count: config.slot_count,
            index: FxHashMap::default(),
        }
    }

    /// Get slot count
    ///
    /// 获取槽位数量
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Get the current cursor position
    ///
    /// 获取当前游标位置
    #[inline]
    pub fn tick_cursor(&self) -> usize {
        self.tick_cursor
    }

    /// Get the completed rotation count
    ///
    /// 获取已完成的圈数
    #[inline]
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Absolute tick position since creation or the last reset
    ///
    /// 自创建或上次重置以来的绝对 tick 位置
    #[inline]
    pub fn absolute_tick(&self) -> u64 {
        self.cycle_count * self.slot_count as u64 + self.tick_cursor as u64
    }

    /// Check if the wheel holds no pending events
    ///
    /// 检查时间轮是否没有待触发事件
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of pending events
    ///
    /// 待触发事件数量
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Compute the (cycle, slot) placement for a delay of `interval` ticks
    /// from the wheel's current absolute position. Intervals are clamped to
    /// at least one tick.
    ///
    /// 从时间轮当前的绝对位置计算延迟 `interval` 个 tick 的 (圈数, 槽位)
    /// 放置。间隔至少为一个 tick。
    #[inline]
    fn placement(&self, interval: u64) -> (u64, usize) {
        let target = self.absolute_tick() + interval.max(1);
        (
            target / self.slot_count as u64,
            (target % self.slot_count as u64) as usize,
        )
    }

    /// Insert a timer event
    ///
    /// # Parameters
    /// - `event`: Event created via [`TimerEvent::new_oneshot`] or
    ///   [`TimerEvent::new_periodic`]
    ///
    /// # Returns
    /// The receiver half of the event's completion channel
    ///
    /// 插入定时器事件
    ///
    /// # 参数
    /// - `event`: 通过 [`TimerEvent::new_oneshot`] 或
    ///   [`TimerEvent::new_periodic`] 创建的事件
    ///
    /// # 返回值
    /// 事件完成通知通道的接收端
    #[inline]
    pub fn insert(&mut self, event: TimerEvent) -> CompletionReceiver {
        let (entry, receiver) = SlotEntry::from_event(event);
        self.insert_entry(entry);
        receiver
    }

    /// Place an entry at its computed (cycle, slot) and record it in the
    /// event index
    ///
    /// 将条目放置到计算出的 (圈数, 槽位) 并记录到事件索引中
    pub(crate) fn insert_entry(&mut self, mut entry: SlotEntry) {
        let (cycle, slot) = self.placement(entry.interval);
        entry.cycle = cycle;

        // Keep the slot sorted ascending by cycle so every due entry sits at
        // the front and the fire scan can stop at the first later-cycle entry.
        // Equal cycles keep insertion order.
        //
        // 槽位按圈数升序排列，到期条目位于最前面，触发扫描可以在第一个
        // 更晚圈数的条目处停止。圈数相同时保持插入顺序。
        let slot_entries = &mut self.slots[slot];
        let pos = slot_entries
            .iter()
            .position(|e| e.cycle > cycle)
            .unwrap_or(slot_entries.len());
        self.index.insert(entry.id, slot);
        slot_entries.insert(pos, entry);
    }

    /// Cancel a scheduled event
    ///
    /// # Parameters
    /// - `event_id`: Event ID
    ///
    /// # Returns
    /// Returns true if the event was pending and is successfully cancelled;
    /// returns false for unknown or already-fired events (a defined no-op)
    ///
    /// 取消已调度事件
    ///
    /// # 参数
    /// - `event_id`: 事件 ID
    ///
    /// # 返回值
    /// 如果事件待触发且成功取消则返回 true；对未知或已触发的事件返回
    /// false（定义良好的空操作）
    #[inline]
    pub fn cancel(&mut self, event_id: EventId) -> bool {
        let slot = match self.index.remove(&event_id) {
            Some(slot) => slot,
            None => return false,
        };

        match self.slots[slot].iter().position(|e| e.id == event_id) {
            Some(pos) => {
                let entry = self.slots[slot].remove(pos);
                entry.notify_cancelled();
                true
            }
            None => false,
        }
    }

    /// Change an event's interval for its next placement
    ///
    /// The event keeps its current (cycle, slot); the new interval is used
    /// the next time the event is placed, which for a periodic event is its
    /// next reinsertion after firing.
    ///
    /// # Returns
    /// Returns true if the event was found, otherwise false
    ///
    /// 更改事件下一次放置使用的间隔
    ///
    /// 事件保留当前的 (圈数, 槽位)；新间隔在事件下一次放置时生效，对周期性
    /// 事件而言是触发后的下一次重新插入。
    ///
    /// # 返回值
    /// 如果找到事件则返回 true，否则返回 false
    #[inline]
    pub fn reschedule(&mut self, event_id: EventId, new_interval: u64) -> bool {
        let slot = match self.index.get(&event_id) {
            Some(slot) => *slot,
            None => return false,
        };

        match self.slots[slot].iter_mut().find(|e| e.id == event_id) {
            Some(entry) => {
                entry.interval = new_interval;
                true
            }
            None => false,
        }
    }

    /// Advance the wheel by one tick and collect the events that became due
    ///
    /// Moves the cursor forward (incrementing the cycle count on wraparound),
    /// then drains due entries from the front of the new cursor slot. Due
    /// periodic entries are notified and reinserted at a freshly computed
    /// placement before this method returns; their callbacks, and whole
    /// one-shot entries, are handed back to the caller for execution.
    ///
    /// 将时间轮前进一个 tick 并收集到期的事件
    ///
    /// 游标前进一格（回绕时圈数加一），然后从新游标槽位的前端取出到期条目。
    /// 到期的周期性条目在本方法返回之前被通知并按重新计算的位置插入；
    /// 它们的回调以及完整的一次性条目被交还给调用方执行。
    pub fn advance(&mut self) -> Vec<FiredEvent> {
        self.tick_cursor = (self.tick_cursor + 1) % self.slot_count;
        if self.tick_cursor == 0 {
            self.cycle_count += 1;
        }

        let cursor = self.tick_cursor;
        let mut fired = Vec::new();
        let mut reinsert = Vec::new();

        loop {
            match self.slots[cursor].first() {
                Some(entry) if entry.cycle == self.cycle_count => {}
                // Ascending cycle order: everything behind the front entry is
                // due on a later rotation.
                // 圈数升序：前端条目之后的所有条目都在更晚的圈触发。
                _ => break,
            }

            let entry = self.slots[cursor].remove(0);
            self.index.remove(&entry.id);

            let SlotEntry {
                id,
                interval,
                kind,
                callback,
                ..
            } = entry;

            match kind {
                EntryKind::OneShot { notifier } => {
                    fired.push(FiredEvent {
                        callback,
                        notifier: Some(notifier),
                    });
                }
                EntryKind::Periodic { notifier } => {
                    let _ = notifier.try_send(EventCompletion::Fired);
                    fired.push(FiredEvent {
                        callback: callback.clone(),
                        notifier: None,
                    });
                    reinsert.push(SlotEntry {
                        id,
                        interval,
                        cycle: 0,
                        kind: EntryKind::Periodic { notifier },
                        callback,
                    });
                }
            }
        }

        for entry in reinsert {
            self.insert_entry(entry);
        }

        fired
    }

    /// Reset the wheel clock and drop all pending events
    ///
    /// Rewinds the cursor and cycle count to zero and cancels every pending
    /// event, notifying its completion channel. Rewinding the clock without
    /// clearing the slots would leave every pending entry's (cycle, slot)
    /// stale relative to the new clock, so a reset wheel is an empty wheel.
    ///
    /// 重置时间轮时钟并丢弃所有待触发事件
    ///
    /// 将游标和圈数归零，并取消每个待触发事件，向其完成通道发送通知。
    /// 只回拨时钟而不清空槽位会使每个待触发条目的 (圈数, 槽位) 相对新时钟
    /// 失效，因此重置后的时间轮是空轮。
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            for entry in slot.drain(..) {
                entry.notify_cancelled();
            }
        }
        self.index.clear();
        self.tick_cursor = 0;
        self.cycle_count = 0;
    }

    /// Take a diagnostic snapshot of the wheel
    ///
    /// 获取时间轮的诊断快照
    pub fn snapshot(&self) -> WheelSnapshot {
        WheelSnapshot {
            tick_cursor: self.tick_cursor,
            cycle_count: self.cycle_count,
            absolute_tick: self.absolute_tick(),
            pending: self.index.len(),
            slot_occupancy: self.slots.iter().map(|s| s.len()).collect(),
        }
    }
}
