//! Kiwi 消息层
//!
//! 本 crate 只定义纯数据记录，不包含任何逻辑：
//! - [`readings`]：传感器输入（超声波距离、红外电压、瞄准角、目标检测框、路口标志）
//! - [`command`]：执行器输出（转向角请求、油门/踏板位置请求）
//!
//! 所有类型均为 `Copy`，默认值为全零，与状态存储的"未收到数据前为零"语义一致。

pub mod command;
pub mod readings;

pub use command::{ActuationCommand, SteeringCommand, ThrottleCommand};
pub use readings::{
    AngleReading, DistanceReading, InputSnapshot, IntersectionFlag, KiwiDetection, VoltageReading,
};
