//! 红外电压 → 距离换算
//!
//! 粗略的线性估计，参数见 [`IrSensorModel`]。

use crate::config::IrSensorModel;

/// 把红外传感器原始电压换算为估计距离（米）
///
/// 先按分压电阻比例还原传感器端电压，再代入线性标定。纯函数，与其他状态无关。
///
/// ```rust
/// use kiwi_control::{IrSensorModel, ir_voltage_to_distance};
///
/// let model = IrSensorModel::default();
/// // 0.5 V × 2 = 1.0 V，(2.5 - 1.0) / 0.07 ≈ 21.43
/// let distance = ir_voltage_to_distance(&model, 0.5);
/// assert!((distance - 21.428571).abs() < 1e-5);
/// ```
pub fn ir_voltage_to_distance(model: &IrSensorModel, voltage: f32) -> f64 {
    let divider_gain = (model.divider_r1 + model.divider_r2) / model.divider_r2;
    let sensor_voltage = divider_gain * f64::from(voltage);
    (model.intercept_voltage - sensor_voltage) / model.slope
}
