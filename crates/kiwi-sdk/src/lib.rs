//! Kiwi SDK - 小车行为决策核心
//!
//! 把感知输出（超声波、红外、瞄准角、目标检测框、路口标志）融合为
//! 转向与油门两条执行器命令。
//!
//! # 架构设计
//!
//! - **消息层** (`protocol`): 传感器读数与执行器命令记录
//! - **状态层** (`driver`): 线程安全的"最新值"存储与原子输出发布
//! - **决策层** (`control`): 决策规则、参数配置、固定频率循环
//!
//! # 快速开始
//!
//! ```rust
//! use kiwi_sdk::prelude::*;
//! use std::sync::Arc;
//!
//! let store = Arc::new(SensorStateStore::new());
//! let engine = DecisionEngine::new(BehaviorConfig::default());
//!
//! // 生产者写入
//! store.set_front_range(DistanceReading::new(1.0));
//! store.set_aim_angle(AngleReading::new(-2.0));
//!
//! // 周期驱动
//! engine.step(&store);
//!
//! // 消费者读取
//! let command = store.outputs();
//! assert!((command.steering.value() + 0.2).abs() < 1e-6);
//! assert_eq!(command.throttle.value(), 0.09);
//! ```

pub use kiwi_control as control;
pub use kiwi_driver as driver;
pub use kiwi_protocol as protocol;

pub mod prelude;

pub use control::{
    BehaviorConfig, ControlError, Decision, DecisionEngine, DecisionLoopHandle, LoopConfig,
    LoopStats, run_decision_loop, spawn_decision_loop,
};
pub use driver::SensorStateStore;

use tracing_subscriber::EnvFilter;

/// 初始化日志（默认 `info`，可通过 `RUST_LOG` 覆盖）
///
/// 重复调用是安全的：第二次调用会被忽略。
pub fn init_logging() {
    init_logging_with("info");
}

/// 初始化日志，指定 `RUST_LOG` 未设置时的默认级别
///
/// 同时把 `log` crate 的记录桥接到 `tracing`。
pub fn init_logging_with(default_directive: &str) {
    let _ = tracing_log::LogTracer::init();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .try_init()
        .is_err()
    {
        log::debug!("tracing subscriber already initialised");
    }
}
