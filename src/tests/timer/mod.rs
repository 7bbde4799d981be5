//! 定时器管理器与 tick 驱动测试 (Timer manager and tick driver tests)

mod lifecycle_tests;
