//! 状态存储指标
//!
//! 零开销的原子计数器，可以在任何线程安全地读取，不会引入锁竞争。

use std::sync::atomic::{AtomicU64, Ordering};

/// 状态存储实时指标
///
/// 每个输入通道一个更新计数器，另外记录快照与发布次数。
///
/// # 使用示例
///
/// ```rust
/// use kiwi_driver::StoreMetrics;
/// use std::sync::atomic::Ordering;
///
/// let metrics = StoreMetrics::new();
/// metrics.front_range_updates.fetch_add(1, Ordering::Relaxed);
///
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.front_range_updates, 1);
/// assert_eq!(snapshot.total_updates(), 1);
/// ```
#[derive(Debug, Default)]
pub struct StoreMetrics {
    pub front_range_updates: AtomicU64,
    pub rear_range_updates: AtomicU64,
    pub left_reflectance_updates: AtomicU64,
    pub right_reflectance_updates: AtomicU64,
    pub aim_angle_updates: AtomicU64,
    pub detection_updates: AtomicU64,
    pub intersection_updates: AtomicU64,

    /// 输入快照次数（每个决策周期一次）
    pub snapshots: AtomicU64,

    /// 输出发布次数
    pub publishes: AtomicU64,
}

impl StoreMetrics {
    /// 创建新的指标实例（所有计数器初始化为 0）
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取指标快照
    ///
    /// 使用 `Ordering::Relaxed`，不同计数器之间可能有微小的时间差。
    pub fn snapshot(&self) -> StoreMetricsSnapshot {
        StoreMetricsSnapshot {
            front_range_updates: self.front_range_updates.load(Ordering::Relaxed),
            rear_range_updates: self.rear_range_updates.load(Ordering::Relaxed),
            left_reflectance_updates: self.left_reflectance_updates.load(Ordering::Relaxed),
            right_reflectance_updates: self.right_reflectance_updates.load(Ordering::Relaxed),
            aim_angle_updates: self.aim_angle_updates.load(Ordering::Relaxed),
            detection_updates: self.detection_updates.load(Ordering::Relaxed),
            intersection_updates: self.intersection_updates.load(Ordering::Relaxed),
            snapshots: self.snapshots.load(Ordering::Relaxed),
            publishes: self.publishes.load(Ordering::Relaxed),
        }
    }

    /// 重置所有计数器（用于测试）
    pub fn reset(&self) {
        self.front_range_updates.store(0, Ordering::Relaxed);
        self.rear_range_updates.store(0, Ordering::Relaxed);
        self.left_reflectance_updates.store(0, Ordering::Relaxed);
        self.right_reflectance_updates.store(0, Ordering::Relaxed);
        self.aim_angle_updates.store(0, Ordering::Relaxed);
        self.detection_updates.store(0, Ordering::Relaxed);
        self.intersection_updates.store(0, Ordering::Relaxed);
        self.snapshots.store(0, Ordering::Relaxed);
        self.publishes.store(0, Ordering::Relaxed);
    }
}

/// 指标快照（不可变，用于读取）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreMetricsSnapshot {
    pub front_range_updates: u64,
    pub rear_range_updates: u64,
    pub left_reflectance_updates: u64,
    pub right_reflectance_updates: u64,
    pub aim_angle_updates: u64,
    pub detection_updates: u64,
    pub intersection_updates: u64,
    pub snapshots: u64,
    pub publishes: u64,
}

impl StoreMetricsSnapshot {
    /// 所有输入通道的更新总数
    pub fn total_updates(&self) -> u64 {
        self.front_range_updates
            + self.rear_range_updates
            + self.left_reflectance_updates
            + self.right_reflectance_updates
            + self.aim_angle_updates
            + self.detection_updates
            + self.intersection_updates
    }
}
