use std::fmt;

/// 定时器错误类型 (Timer Error Type)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// 槽位数量无效（必须大于 0）
    /// Invalid slot count (must be greater than 0)
    InvalidSlotCount {
        slot_count: usize,
        reason: &'static str,
    },

    /// 配置验证失败 (Configuration validation failed)
    InvalidConfiguration {
        field: String,
        reason: String,
    },

    /// 启动失败（无法获取 tokio 运行时来承载 tick 驱动任务）
    /// Start failed (no tokio runtime available to host the tick driver task)
    StartFailed {
        reason: &'static str,
    },

    /// tick 驱动已经在运行 (The tick driver is already running)
    DriverAlreadyRunning,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::InvalidSlotCount { slot_count, reason } => {
                write!(f, "Invalid slot count {}: {}", slot_count, reason)
            }
            TimerError::InvalidConfiguration { field, reason } => {
                write!(f, "Configuration validation failed ({}): {}", field, reason)
            }
            TimerError::StartFailed { reason } => {
                write!(f, "Failed to start tick driver: {}", reason)
            }
            TimerError::DriverAlreadyRunning => {
                write!(f, "Tick driver is already running")
            }
        }
    }
}

impl std::error::Error for TimerError {}
