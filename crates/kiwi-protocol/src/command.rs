//! 执行器命令记录

/// 转向角请求（弧度）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct SteeringCommand(pub f32);

impl SteeringCommand {
    #[inline]
    pub const fn new(ground_steering: f32) -> Self {
        SteeringCommand(ground_steering)
    }

    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }
}

/// 油门/踏板位置请求
///
/// 概念范围 `[0.0, 1.0]`，0 表示停车。决策规则不会产生负值。
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct ThrottleCommand(pub f32);

impl ThrottleCommand {
    /// 停车
    pub const STOP: Self = ThrottleCommand(0.0);

    #[inline]
    pub const fn new(position: f32) -> Self {
        ThrottleCommand(position)
    }

    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }

    #[inline]
    pub fn is_stop(self) -> bool {
        self.0 == 0.0
    }
}

/// 一个决策周期发布的输出对
///
/// 转向与油门总是成对发布；`cycle` 为发布序号（首次发布前为 0），
/// 消费者可据此判断是否有新的决策。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActuationCommand {
    pub steering: SteeringCommand,
    pub throttle: ThrottleCommand,
    pub cycle: u64,
}
