//! 决策层
//!
//! 把一次输入快照转换成一对执行器命令（转向、油门）：
//! - [`config`]：所有调参常量（默认值即规则中的字面值），支持 TOML 覆盖
//! - [`ir`]：红外电压 → 距离的线性模型
//! - [`engine`]：决策引擎（快照 → 规则 → 发布）
//! - [`metrics`]：规则命中计数
//! - [`loop_runner`]：固定频率的决策循环
//!
//! # 快速开始
//!
//! ```rust
//! use kiwi_control::{BehaviorConfig, DecisionEngine};
//! use kiwi_driver::SensorStateStore;
//! use kiwi_protocol::{AngleReading, DistanceReading};
//!
//! let store = SensorStateStore::new();
//! store.set_front_range(DistanceReading::new(1.0));
//! store.set_aim_angle(AngleReading::new(0.3));
//!
//! let engine = DecisionEngine::new(BehaviorConfig::default());
//! let command = engine.step(&store);
//! assert!((command.steering.value() - 0.03).abs() < 1e-6);
//! assert_eq!(command.throttle.value(), 0.15);
//! ```

pub mod config;
pub mod engine;
mod error;
pub mod ir;
pub mod loop_runner;
pub mod metrics;

pub use config::{BehaviorConfig, IrSensorModel};
pub use engine::{Decision, DecisionEngine, DecisionTrace, ThrottleRule};
pub use error::ControlError;
pub use ir::ir_voltage_to_distance;
pub use loop_runner::{
    DecisionLoopHandle, LoopConfig, LoopStats, run_decision_loop, spawn_decision_loop,
};
pub use metrics::{EngineMetrics, EngineMetricsSnapshot};
