//! 传感器输入记录
//!
//! 使用 NewType 模式区分距离、电压、角度，防止不同通道的数值混用。
//!
//! # 示例
//!
//! ```rust
//! use kiwi_protocol::{DistanceReading, VoltageReading};
//!
//! let front = DistanceReading::new(1.0);
//! let left = VoltageReading::new(0.5);
//! assert_eq!(front.value(), 1.0);
//! assert_eq!(left.value(), 0.5);
//!
//! // 类型安全：以下代码无法编译
//! // let _: DistanceReading = left;  // ❌ 类型不匹配
//! ```

use std::fmt;

/// 超声波距离读数（米）
///
/// 来源：前/后超声波传感器。
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct DistanceReading(pub f32);

impl DistanceReading {
    /// 零距离
    pub const ZERO: Self = DistanceReading(0.0);

    #[inline]
    pub const fn new(distance: f32) -> Self {
        DistanceReading(distance)
    }

    /// 获取原始值（米）
    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl fmt::Display for DistanceReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} m", self.0)
    }
}

/// 红外反射传感器电压读数（伏特）
///
/// 经过分压电阻后的原始电压，需要通过红外模型换算成距离后才有意义。
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct VoltageReading(pub f32);

impl VoltageReading {
    #[inline]
    pub const fn new(voltage: f32) -> Self {
        VoltageReading(voltage)
    }

    /// 获取原始值（伏特）
    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl fmt::Display for VoltageReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} V", self.0)
    }
}

/// 瞄准角读数（弧度）
///
/// 由外部感知组件给出的期望航向偏差，正值表示目标在左侧。
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct AngleReading(pub f32);

impl AngleReading {
    #[inline]
    pub const fn new(angle: f32) -> Self {
        AngleReading(angle)
    }

    /// 获取原始值（弧度）
    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl fmt::Display for AngleReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} rad", self.0)
    }
}

/// Kiwi 目标检测框（像素）
///
/// `height == 0`（或 `width == 0`）表示当前没有检测到目标。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KiwiDetection {
    /// 检测框中心 X（像素）
    pub x_center: f32,
    /// 检测框中心 Y（像素）
    pub y_center: f32,
    /// 检测框宽度（像素）
    pub width: f32,
    /// 检测框高度（像素）
    pub height: f32,
}

impl KiwiDetection {
    pub const fn new(x_center: f32, y_center: f32, width: f32, height: f32) -> Self {
        Self {
            x_center,
            y_center,
            width,
            height,
        }
    }

    /// 空检测（无目标）
    pub const fn none() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// 是否检测到目标（按高度判断，用于距离估计）
    #[inline]
    pub fn has_height(&self) -> bool {
        self.height > 0.0
    }

    /// 是否检测到目标（按宽度判断，用于路口判断）
    #[inline]
    pub fn has_width(&self) -> bool {
        self.width > 0.0
    }
}

/// 路口检测标志
///
/// `0` 表示无路口，非零表示路口存在/有效。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntersectionFlag(pub i32);

impl IntersectionFlag {
    pub const INACTIVE: Self = IntersectionFlag(0);
    pub const ACTIVE: Self = IntersectionFlag(1);

    #[inline]
    pub const fn new(state: i32) -> Self {
        IntersectionFlag(state)
    }

    /// 原始状态值
    #[inline]
    pub fn state(self) -> i32 {
        self.0
    }

    #[inline]
    pub fn is_active(self) -> bool {
        self.0 != 0
    }
}

/// 输入快照（七个通道的一致性拷贝）
///
/// 由状态存储在一次原子操作中生成，是一次决策周期的唯一输入。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSnapshot {
    pub front_range: DistanceReading,
    pub rear_range: DistanceReading,
    pub left_reflectance: VoltageReading,
    pub right_reflectance: VoltageReading,
    pub aim_angle: AngleReading,
    pub detection: KiwiDetection,
    pub intersection: IntersectionFlag,
}
