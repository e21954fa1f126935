//! Decision Engine - 决策引擎
//!
//! 把一次输入快照转换为一对执行器命令。引擎只持有不可变配置和监控计数器，
//! 相同快照永远得到相同输出。
//!
//! # 规则（按执行顺序）
//!
//! 1. 红外电压 → 距离（计算但不参与决策，写入 [`DecisionTrace`]）
//! 2. 转向角 = 增益 × 瞄准角（纯比例，不钳位）
//! 3. 油门 = 直行油门；|转向角| 超过阈值时降为急弯油门
//! 4. 目标接近：检测框高度 > 0 时按 `实际高度 × 焦距 / 像素高度` 估计距离
//!    - 距离过近或前方超声波过近 → 停车
//!    - 距离在减速区间 → 油门 × 距离 / 分母
//! 5. 路口：目标在画面右侧且路口标志有效 → 停车（最后执行，覆盖第 4 步）
//!
//! 前方超声波急停默认无条件生效，见 [`BehaviorConfig::front_guard_requires_detection`]。

use kiwi_driver::SensorStateStore;
use kiwi_protocol::{ActuationCommand, InputSnapshot, SteeringCommand, ThrottleCommand};
use tracing::{debug, info, trace};

use crate::config::BehaviorConfig;
use crate::ir::ir_voltage_to_distance;
use crate::metrics::EngineMetrics;

/// 决定最终油门的规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleRule {
    /// 直行油门
    Nominal,
    /// 急弯降速
    Cornering,
    /// 目标过近停车
    ProximityStop,
    /// 前方超声波过近停车
    FrontRangeStop,
    /// 目标距离比例减速
    ProximitySlowdown,
    /// 路口停车
    IntersectionStop,
}

impl ThrottleRule {
    pub fn as_str(self) -> &'static str {
        match self {
            ThrottleRule::Nominal => "nominal",
            ThrottleRule::Cornering => "cornering",
            ThrottleRule::ProximityStop => "proximity_stop",
            ThrottleRule::FrontRangeStop => "front_range_stop",
            ThrottleRule::ProximitySlowdown => "proximity_slowdown",
            ThrottleRule::IntersectionStop => "intersection_stop",
        }
    }

    /// 是否为停车规则
    pub fn is_stop(self) -> bool {
        matches!(
            self,
            ThrottleRule::ProximityStop | ThrottleRule::FrontRangeStop | ThrottleRule::IntersectionStop
        )
    }
}

/// 决策过程中计算出的中间量
///
/// 后方距离、左右红外距离、检测框中心 Y 目前不参与任何规则，
/// 保留在这里以便日志与后续规则使用。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionTrace {
    /// 到目标的估计距离（米），未检测到目标时为 `None`
    pub object_distance: Option<f32>,
    pub left_ir_distance: f64,
    pub right_ir_distance: f64,
    pub rear_range: f32,
    pub object_center_y: f32,
    /// 决定最终油门的规则
    pub throttle_rule: ThrottleRule,
}

/// 单次决策结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub steering: SteeringCommand,
    pub throttle: ThrottleCommand,
    pub trace: DecisionTrace,
}

/// 决策引擎
#[derive(Debug, Default)]
pub struct DecisionEngine {
    config: BehaviorConfig,
    metrics: EngineMetrics,
}

impl DecisionEngine {
    pub fn new(config: BehaviorConfig) -> Self {
        Self {
            config,
            metrics: EngineMetrics::new(),
        }
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    /// 执行一个决策周期
    ///
    /// 快照 → 规则 → 原子发布，返回本周期发布的命令。锁只在快照拷贝与发布期间持有。
    pub fn step(&self, store: &SensorStateStore) -> ActuationCommand {
        let input = store.snapshot_inputs();
        let decision = self.evaluate(&input);
        let command = store.publish_outputs(decision.steering, decision.throttle);
        self.metrics.record(decision.trace.throttle_rule);

        trace!(
            cycle = command.cycle,
            steering = decision.steering.value(),
            throttle = decision.throttle.value(),
            rule = decision.trace.throttle_rule.as_str(),
            front_range = input.front_range.value(),
            rear_range = decision.trace.rear_range,
            left_ir_distance = decision.trace.left_ir_distance,
            right_ir_distance = decision.trace.right_ir_distance,
            object_distance = ?decision.trace.object_distance,
            object_center_y = decision.trace.object_center_y,
            "decision step"
        );
        if decision.trace.throttle_rule.is_stop() {
            debug!(
                cycle = command.cycle,
                rule = decision.trace.throttle_rule.as_str(),
                front_range = input.front_range.value(),
                object_distance = ?decision.trace.object_distance,
                "throttle stopped"
            );
        }
        command
    }

    /// 对一个快照执行决策规则（纯计算，不访问存储）
    pub fn evaluate(&self, input: &InputSnapshot) -> Decision {
        let config = &self.config;

        let left_ir_distance = ir_voltage_to_distance(&config.ir, input.left_reflectance.value());
        let right_ir_distance = ir_voltage_to_distance(&config.ir, input.right_reflectance.value());
        let front_range = input.front_range.value();
        let detection = input.detection;

        // 转向：纯比例
        let steering = config.steering_gain * input.aim_angle.value();

        // 急弯降速
        let (mut throttle, mut rule) = if steering.abs() > config.cornering_threshold {
            (config.cornering_throttle, ThrottleRule::Cornering)
        } else {
            (config.nominal_throttle, ThrottleRule::Nominal)
        };

        // 目标距离与像素高度成反比
        let object_distance = detection
            .has_height()
            .then(|| config.object_real_height * config.focal_length / detection.height);
        let front_blocked = front_range < config.front_stop_distance;

        match object_distance {
            Some(distance) if distance < config.object_stop_distance => {
                throttle = 0.0;
                rule = ThrottleRule::ProximityStop;
            },
            Some(_) if front_blocked => {
                throttle = 0.0;
                rule = ThrottleRule::FrontRangeStop;
            },
            Some(distance) if distance < config.object_caution_distance => {
                throttle = throttle * distance / config.braking_ramp_divisor;
                rule = ThrottleRule::ProximitySlowdown;
                debug!(distance, throttle, "object ahead, slowing down");
            },
            Some(_) => {},
            None if front_blocked && !config.front_guard_requires_detection => {
                throttle = 0.0;
                rule = ThrottleRule::FrontRangeStop;
            },
            None => {},
        }

        // 路口：最后执行，覆盖上面的结果
        if detection.has_width()
            && detection.x_center > config.intersection_center_x
            && input.intersection.is_active()
        {
            throttle = 0.0;
            rule = ThrottleRule::IntersectionStop;
            info!(
                x_center = detection.x_center,
                state = input.intersection.state(),
                "stop at intersection"
            );
        }

        Decision {
            steering: SteeringCommand::new(steering),
            throttle: ThrottleCommand::new(throttle),
            trace: DecisionTrace {
                object_distance,
                left_ir_distance,
                right_ir_distance,
                rear_range: input.rear_range.value(),
                object_center_y: detection.y_center,
                throttle_rule: rule,
            },
        }
    }
}
