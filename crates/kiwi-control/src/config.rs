//! # 决策参数配置
//!
//! 所有阈值、增益、焦距常量都集中在 [`BehaviorConfig`] 中，默认值等于决策规则中的字面值。
//!
//! 配置文件为 TOML 格式，未出现的字段保持默认值：
//!
//! ```toml
//! steering_gain = 0.12
//! nominal_throttle = 0.2
//!
//! [ir]
//! slope = 0.08
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ControlError;

/// 决策参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// 转向比例增益（转向角 = 增益 × 瞄准角）
    pub steering_gain: f32,

    /// 直行油门
    pub nominal_throttle: f32,
    /// 转弯判定阈值（|转向角| 超过该值视为急弯）
    pub cornering_threshold: f32,
    /// 急弯油门
    pub cornering_throttle: f32,

    /// Kiwi 实际高度（米）
    pub object_real_height: f32,
    /// 等效焦距（像素，已包含 2 倍放大系数）
    pub focal_length: f32,
    /// 目标距离低于该值时停车（米）
    pub object_stop_distance: f32,
    /// 前方超声波距离低于该值时停车（米）
    pub front_stop_distance: f32,
    /// 目标距离低于该值时按比例减速（米）
    pub object_caution_distance: f32,
    /// 比例减速分母（油门 × 距离 / 分母）
    pub braking_ramp_divisor: f32,

    /// 路口判定：检测框中心 X 超过该值视为目标在画面右侧（像素）
    pub intersection_center_x: f32,

    /// 前方距离急停是否仅在检测到目标时生效
    ///
    /// 默认 `false`：前方距离急停无条件生效。
    pub front_guard_requires_detection: bool,

    /// 红外传感器模型
    pub ir: IrSensorModel,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            steering_gain: 0.1,
            nominal_throttle: 0.15,
            cornering_threshold: 0.06,
            cornering_throttle: 0.09,
            object_real_height: 0.101,
            focal_length: 1632.0,
            object_stop_distance: 0.6,
            front_stop_distance: 0.25,
            object_caution_distance: 1.1,
            braking_ramp_divisor: 1.5,
            intersection_center_x: 425.0,
            front_guard_requires_detection: false,
            ir: IrSensorModel::default(),
        }
    }
}

impl BehaviorConfig {
    /// 从 TOML 字符串解析并校验
    pub fn from_toml_str(content: &str) -> Result<Self, ControlError> {
        let config: BehaviorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载并校验
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ControlError> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.as_ref().display(), "behavior config loaded");
        Ok(config)
    }

    /// 序列化为 TOML
    pub fn to_toml_string(&self) -> Result<String, ControlError> {
        Ok(toml::to_string(self)?)
    }

    /// 保存到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ControlError> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// 校验参数
    ///
    /// 只在加载配置时调用，决策周期本身不做任何校验。
    pub fn validate(&self) -> Result<(), ControlError> {
        let finite = [
            ("steering_gain", self.steering_gain),
            ("nominal_throttle", self.nominal_throttle),
            ("cornering_threshold", self.cornering_threshold),
            ("cornering_throttle", self.cornering_throttle),
            ("object_real_height", self.object_real_height),
            ("focal_length", self.focal_length),
            ("object_stop_distance", self.object_stop_distance),
            ("front_stop_distance", self.front_stop_distance),
            ("object_caution_distance", self.object_caution_distance),
            ("braking_ramp_divisor", self.braking_ramp_divisor),
            ("intersection_center_x", self.intersection_center_x),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ControlError::InvalidConfig(format!(
                    "{name} must be finite (got {value})"
                )));
            }
        }

        let positive = [
            ("object_real_height", self.object_real_height),
            ("focal_length", self.focal_length),
            ("braking_ramp_divisor", self.braking_ramp_divisor),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(ControlError::InvalidConfig(format!(
                    "{name} must be > 0 (got {value})"
                )));
            }
        }

        self.ir.validate()
    }
}

/// 红外反射传感器线性模型
///
/// `sensor_voltage = (r1 + r2) / r2 × voltage`，
/// `distance = (intercept_voltage - sensor_voltage) / slope`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrSensorModel {
    /// 分压电阻 R1（欧姆）
    pub divider_r1: f64,
    /// 分压电阻 R2（欧姆）
    pub divider_r2: f64,
    /// 标定截距（伏特）
    pub intercept_voltage: f64,
    /// 标定斜率（伏特/米）
    pub slope: f64,
}

impl Default for IrSensorModel {
    fn default() -> Self {
        Self {
            divider_r1: 1000.0,
            divider_r2: 1000.0,
            intercept_voltage: 2.5,
            slope: 0.07,
        }
    }
}

impl IrSensorModel {
    pub fn validate(&self) -> Result<(), ControlError> {
        let fields = [
            ("ir.divider_r1", self.divider_r1),
            ("ir.divider_r2", self.divider_r2),
            ("ir.intercept_voltage", self.intercept_voltage),
            ("ir.slope", self.slope),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ControlError::InvalidConfig(format!(
                    "{name} must be finite (got {value})"
                )));
            }
        }
        if self.divider_r2 <= 0.0 {
            return Err(ControlError::InvalidConfig(format!(
                "ir.divider_r2 must be > 0 (got {})",
                self.divider_r2
            )));
        }
        if self.slope <= 0.0 {
            return Err(ControlError::InvalidConfig(format!(
                "ir.slope must be > 0 (got {})",
                self.slope
            )));
        }
        Ok(())
    }
}
