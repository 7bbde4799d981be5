//! 定时器配置模块 (Timer Configuration Module)
//!
//! 提供时间轮配置结构和 Builder 模式，用于配置轮面宽度与 tick 步长。
//! (Provides the wheel configuration structure and Builder pattern for
//! configuring wheel width and tick cadence)

use crate::error::TimerError;
use std::time::Duration;

/// 时间轮配置 (Timing Wheel Configuration)
///
/// 单层平面时间轮的参数：槽位数量决定一圈的宽度，tick 间隔决定每个槽位
/// 代表的墙钟时间。
/// (Parameters for the single flat timing wheel: the slot count is the width
/// of one rotation, the tick interval is the wall-clock time each slot
/// represents)
///
/// # 示例 (Examples)
/// ```
/// use rotor_timer::WheelConfig;
/// use std::time::Duration;
///
/// // 使用默认配置 (Use default configuration)
/// let config = WheelConfig::default();
///
/// // 使用 Builder 自定义配置 (Use Builder to customize configuration)
/// let config = WheelConfig::builder()
///     .tick_interval(Duration::from_millis(50))
///     .slot_count(128)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct WheelConfig {
    /// 每个 tick 的时间长度 (Duration of each tick)
    pub tick_interval: Duration,
    /// 槽位数量（轮面宽度）(Number of slots, the wheel width)
    pub slot_count: usize,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            slot_count: 64,
        }
    }
}

impl WheelConfig {
    /// 创建配置构建器 (Create configuration builder)
    pub fn builder() -> WheelConfigBuilder {
        WheelConfigBuilder::default()
    }
}

/// 时间轮配置构建器 (Timing Wheel Configuration Builder)
#[derive(Debug, Clone)]
pub struct WheelConfigBuilder {
    tick_interval: Duration,
    slot_count: usize,
}

impl Default for WheelConfigBuilder {
    fn default() -> Self {
        let config = WheelConfig::default();
        Self {
            tick_interval: config.tick_interval,
            slot_count: config.slot_count,
        }
    }
}

impl WheelConfigBuilder {
    /// 设置 tick 时长 (Set tick duration)
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// 设置槽位数量 (Set slot count)
    pub fn slot_count(mut self, count: usize) -> Self {
        self.slot_count = count;
        self
    }

    /// 构建配置并进行验证
    ///      (Build and validate configuration)
    ///
    /// # 返回 (Returns)
    /// - `Ok(WheelConfig)`: 配置有效
    ///      (Configuration is valid)
    /// - `Err(TimerError)`: 配置验证失败
    ///      (Configuration validation failed)
    ///
    /// # 验证规则 (Validation Rules)
    /// - tick 时长必须大于 0
    ///      (Tick duration must be greater than 0)
    /// - 槽位数量必须大于 0
    ///      (Slot count must be greater than 0)
    pub fn build(self) -> Result<WheelConfig, TimerError> {
        if self.tick_interval.is_zero() {
            return Err(TimerError::InvalidConfiguration {
                field: "tick_interval".to_string(),
                reason: "tick interval must be greater than zero".to_string(),
            });
        }

        if self.slot_count == 0 {
            return Err(TimerError::InvalidSlotCount {
                slot_count: self.slot_count,
                reason: "slot count must be greater than 0",
            });
        }

        Ok(WheelConfig {
            tick_interval: self.tick_interval,
            slot_count: self.slot_count,
        })
    }
}
