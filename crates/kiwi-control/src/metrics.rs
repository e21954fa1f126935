//! 决策引擎指标
//!
//! 统计决策周期数以及每条油门规则的命中次数。计数器只用于监控，不参与决策。

use std::sync::atomic::{AtomicU64, Ordering};

use crate::engine::ThrottleRule;

/// 决策引擎实时指标
#[derive(Debug, Default)]
pub struct EngineMetrics {
    /// 决策周期总数
    pub cycles: AtomicU64,
    /// 直行油门
    pub nominal: AtomicU64,
    /// 急弯降速
    pub cornering: AtomicU64,
    /// 目标过近停车
    pub proximity_stops: AtomicU64,
    /// 前方超声波过近停车
    pub front_range_stops: AtomicU64,
    /// 目标距离比例减速
    pub proximity_slowdowns: AtomicU64,
    /// 路口停车
    pub intersection_stops: AtomicU64,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次决策周期及其最终生效的油门规则
    pub(crate) fn record(&self, rule: ThrottleRule) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
        let counter = match rule {
            ThrottleRule::Nominal => &self.nominal,
            ThrottleRule::Cornering => &self.cornering,
            ThrottleRule::ProximityStop => &self.proximity_stops,
            ThrottleRule::FrontRangeStop => &self.front_range_stops,
            ThrottleRule::ProximitySlowdown => &self.proximity_slowdowns,
            ThrottleRule::IntersectionStop => &self.intersection_stops,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> EngineMetricsSnapshot {
        EngineMetricsSnapshot {
            cycles: self.cycles.load(Ordering::Relaxed),
            nominal: self.nominal.load(Ordering::Relaxed),
            cornering: self.cornering.load(Ordering::Relaxed),
            proximity_stops: self.proximity_stops.load(Ordering::Relaxed),
            front_range_stops: self.front_range_stops.load(Ordering::Relaxed),
            proximity_slowdowns: self.proximity_slowdowns.load(Ordering::Relaxed),
            intersection_stops: self.intersection_stops.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.cycles.store(0, Ordering::Relaxed);
        self.nominal.store(0, Ordering::Relaxed);
        self.cornering.store(0, Ordering::Relaxed);
        self.proximity_stops.store(0, Ordering::Relaxed);
        self.front_range_stops.store(0, Ordering::Relaxed);
        self.proximity_slowdowns.store(0, Ordering::Relaxed);
        self.intersection_stops.store(0, Ordering::Relaxed);
    }
}

/// 指标快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineMetricsSnapshot {
    pub cycles: u64,
    pub nominal: u64,
    pub cornering: u64,
    pub proximity_stops: u64,
    pub front_range_stops: u64,
    pub proximity_slowdowns: u64,
    pub intersection_stops: u64,
}

impl EngineMetricsSnapshot {
    /// 停车周期总数（任意停车规则）
    pub fn total_stops(&self) -> u64 {
        self.proximity_stops + self.front_range_stops + self.intersection_stops
    }

    /// 停车周期占比（百分比）
    ///
    /// 如果 `cycles` 为 0，返回 0.0。
    pub fn stop_rate(&self) -> f64 {
        if self.cycles == 0 {
            return 0.0;
        }
        (self.total_stops() as f64 / self.cycles as f64) * 100.0
    }
}
