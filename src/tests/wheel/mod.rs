//! 时间轮引擎测试 (Timing wheel engine tests)

mod cancel_tests;
mod reset_tests;
