//! Prelude 模块
//!
//! ```rust
//! use kiwi_sdk::prelude::*;
//! ```

pub use crate::control::{BehaviorConfig, DecisionEngine, LoopConfig, ThrottleRule};
pub use crate::driver::SensorStateStore;
pub use crate::protocol::{
    ActuationCommand, AngleReading, DistanceReading, InputSnapshot, IntersectionFlag,
    KiwiDetection, SteeringCommand, ThrottleCommand, VoltageReading,
};
