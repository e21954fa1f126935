//! 传感器状态存储
//!
//! # 同步机制
//!
//! ```text
//! ┌──────────────────────────┐
//! │    SensorStateStore      │
//! ├──────────────────────────┤
//! │ front_range        Mutex │ ┐
//! │ rear_range         Mutex │ │
//! │ left_reflectance   Mutex │ │ 输入：每通道独立锁
//! │ right_reflectance  Mutex │ │ 快照按此顺序加锁
//! │ aim_angle          Mutex │ │
//! │ detection          Mutex │ │
//! │ intersection       Mutex │ ┘
//! │ outputs          ArcSwap │ ← 输出对：原子替换，无锁读取
//! │ publish_lock       Mutex │ ← 串行化发布，保证 cycle 单调递增
//! └──────────────────────────┘
//! ```
//!
//! 使用 `parking_lot::Mutex`，不存在锁毒化，所有操作都不会失败。

use std::sync::Arc;
use std::sync::atomic::Ordering;

use arc_swap::ArcSwap;
use kiwi_protocol::{
    ActuationCommand, AngleReading, DistanceReading, InputSnapshot, IntersectionFlag,
    KiwiDetection, SteeringCommand, ThrottleCommand, VoltageReading,
};
use parking_lot::Mutex;
use tracing::trace;

use crate::metrics::StoreMetrics;

/// 传感器状态存储
///
/// 保存每个输入通道的最新值以及最近一次发布的输出对。
/// 创建时所有字段为零，读取方永远不需要等待第一个样本。
///
/// # 示例
///
/// ```rust
/// use kiwi_driver::SensorStateStore;
/// use kiwi_protocol::{AngleReading, SteeringCommand, ThrottleCommand};
/// use std::sync::Arc;
///
/// let store = Arc::new(SensorStateStore::new());
/// store.set_aim_angle(AngleReading::new(0.3));
///
/// let snapshot = store.snapshot_inputs();
/// assert_eq!(snapshot.aim_angle.value(), 0.3);
///
/// store.publish_outputs(SteeringCommand::new(0.03), ThrottleCommand::new(0.15));
/// let outputs = store.outputs();
/// assert_eq!(outputs.steering.value(), 0.03);
/// assert_eq!(outputs.throttle.value(), 0.15);
/// assert_eq!(outputs.cycle, 1);
/// ```
pub struct SensorStateStore {
    front_range: Mutex<DistanceReading>,
    rear_range: Mutex<DistanceReading>,
    left_reflectance: Mutex<VoltageReading>,
    right_reflectance: Mutex<VoltageReading>,
    aim_angle: Mutex<AngleReading>,
    detection: Mutex<KiwiDetection>,
    intersection: Mutex<IntersectionFlag>,

    outputs: ArcSwap<ActuationCommand>,
    publish_lock: Mutex<()>,

    metrics: StoreMetrics,
}

impl SensorStateStore {
    /// 创建新的状态存储（所有字段为零）
    pub fn new() -> Self {
        Self {
            front_range: Mutex::new(DistanceReading::default()),
            rear_range: Mutex::new(DistanceReading::default()),
            left_reflectance: Mutex::new(VoltageReading::default()),
            right_reflectance: Mutex::new(VoltageReading::default()),
            aim_angle: Mutex::new(AngleReading::default()),
            detection: Mutex::new(KiwiDetection::default()),
            intersection: Mutex::new(IntersectionFlag::default()),
            outputs: ArcSwap::from_pointee(ActuationCommand::default()),
            publish_lock: Mutex::new(()),
            metrics: StoreMetrics::new(),
        }
    }

    // === 输入通道（生产者调用，互不阻塞） ===

    pub fn set_front_range(&self, reading: DistanceReading) {
        *self.front_range.lock() = reading;
        self.metrics.front_range_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_rear_range(&self, reading: DistanceReading) {
        *self.rear_range.lock() = reading;
        self.metrics.rear_range_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_left_reflectance(&self, reading: VoltageReading) {
        *self.left_reflectance.lock() = reading;
        self.metrics
            .left_reflectance_updates
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_right_reflectance(&self, reading: VoltageReading) {
        *self.right_reflectance.lock() = reading;
        self.metrics
            .right_reflectance_updates
            .fetch_add(1, Ordering::Relaxed);
    }

    /// 更新瞄准角（来自外部感知服务）
    pub fn set_aim_angle(&self, reading: AngleReading) {
        *self.aim_angle.lock() = reading;
        self.metrics.aim_angle_updates.fetch_add(1, Ordering::Relaxed);
    }

    /// 更新 Kiwi 目标检测框
    pub fn set_object_detection(&self, detection: KiwiDetection) {
        *self.detection.lock() = detection;
        self.metrics.detection_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_intersection_flag(&self, flag: IntersectionFlag) {
        *self.intersection.lock() = flag;
        self.metrics
            .intersection_updates
            .fetch_add(1, Ordering::Relaxed);
    }

    /// 获取七个输入通道的一致性快照
    ///
    /// 按固定顺序（front → rear → left → right → aim → detection → intersection）
    /// 获取全部锁，仅在拷贝期间持有，拷贝完成后立即释放。
    /// 每个字段都是快照开始前最后一次写入的值。
    pub fn snapshot_inputs(&self) -> InputSnapshot {
        let snapshot = {
            let front_range = self.front_range.lock();
            let rear_range = self.rear_range.lock();
            let left_reflectance = self.left_reflectance.lock();
            let right_reflectance = self.right_reflectance.lock();
            let aim_angle = self.aim_angle.lock();
            let detection = self.detection.lock();
            let intersection = self.intersection.lock();

            InputSnapshot {
                front_range: *front_range,
                rear_range: *rear_range,
                left_reflectance: *left_reflectance,
                right_reflectance: *right_reflectance,
                aim_angle: *aim_angle,
                detection: *detection,
                intersection: *intersection,
            }
        };
        self.metrics.snapshots.fetch_add(1, Ordering::Relaxed);
        snapshot
    }

    // === 输出（周期驱动发布，消费者读取） ===

    /// 原子发布输出对
    ///
    /// 转向与油门作为一个整体替换，读取方不会看到来自不同周期的组合。
    /// 返回本次发布的完整命令（包含新的 `cycle` 序号）。
    pub fn publish_outputs(
        &self,
        steering: SteeringCommand,
        throttle: ThrottleCommand,
    ) -> ActuationCommand {
        let _guard = self.publish_lock.lock();
        let command = ActuationCommand {
            steering,
            throttle,
            cycle: self.outputs.load().cycle + 1,
        };
        self.outputs.store(Arc::new(command));
        self.metrics.publishes.fetch_add(1, Ordering::Relaxed);

        trace!(
            cycle = command.cycle,
            steering = steering.value(),
            throttle = throttle.value(),
            "outputs published"
        );
        command
    }

    /// 最近一次发布的输出对（一次读取，保证来自同一周期）
    pub fn outputs(&self) -> ActuationCommand {
        **self.outputs.load()
    }

    /// 最近一次发布的转向角请求
    pub fn steering(&self) -> SteeringCommand {
        self.outputs.load().steering
    }

    /// 最近一次发布的油门请求
    pub fn throttle(&self) -> ThrottleCommand {
        self.outputs.load().throttle
    }

    /// 指标
    pub fn metrics(&self) -> &StoreMetrics {
        &self.metrics
    }
}

impl Default for SensorStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SensorStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorStateStore")
            .field("outputs", &self.outputs())
            .field("metrics", &self.metrics.snapshot())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_store_new_is_zeroed() {
        let store = SensorStateStore::new();
        assert_eq!(store.snapshot_inputs(), InputSnapshot::default());
        assert_eq!(store.outputs(), ActuationCommand::default());
        assert_eq!(store.steering().value(), 0.0);
        assert!(store.throttle().is_stop());
    }

    #[test]
    fn test_setters_overwrite_latest_value() {
        let store = SensorStateStore::new();
        store.set_front_range(DistanceReading::new(2.0));
        store.set_front_range(DistanceReading::new(1.0));
        store.set_rear_range(DistanceReading::new(0.8));
        store.set_left_reflectance(VoltageReading::new(0.4));
        store.set_right_reflectance(VoltageReading::new(0.6));
        store.set_aim_angle(AngleReading::new(-0.2));
        store.set_object_detection(KiwiDetection::new(500.0, 20.0, 50.0, 165.5));
        store.set_intersection_flag(IntersectionFlag::ACTIVE);

        let snapshot = store.snapshot_inputs();
        assert_eq!(snapshot.front_range.value(), 1.0);
        assert_eq!(snapshot.rear_range.value(), 0.8);
        assert_eq!(snapshot.left_reflectance.value(), 0.4);
        assert_eq!(snapshot.right_reflectance.value(), 0.6);
        assert_eq!(snapshot.aim_angle.value(), -0.2);
        assert_eq!(snapshot.detection.height, 165.5);
        assert!(snapshot.intersection.is_active());
    }

    #[test]
    fn test_setters_do_not_touch_outputs() {
        let store = SensorStateStore::new();
        store.set_aim_angle(AngleReading::new(1.0));
        assert_eq!(store.outputs(), ActuationCommand::default());
    }

    #[test]
    fn test_publish_advances_cycle() {
        let store = SensorStateStore::new();
        let first = store.publish_outputs(SteeringCommand::new(0.1), ThrottleCommand::new(0.09));
        let second = store.publish_outputs(SteeringCommand::new(0.03), ThrottleCommand::new(0.15));
        assert_eq!(first.cycle, 1);
        assert_eq!(second.cycle, 2);
        assert_eq!(store.outputs(), second);
        assert_eq!(store.steering().value(), 0.03);
        assert_eq!(store.throttle().value(), 0.15);
    }

    #[test]
    fn test_metrics_track_operations() {
        let store = SensorStateStore::new();
        store.set_front_range(DistanceReading::new(1.0));
        store.set_aim_angle(AngleReading::new(0.1));
        store.set_aim_angle(AngleReading::new(0.2));
        let _ = store.snapshot_inputs();
        store.publish_outputs(SteeringCommand::default(), ThrottleCommand::default());

        let metrics = store.metrics().snapshot();
        assert_eq!(metrics.front_range_updates, 1);
        assert_eq!(metrics.aim_angle_updates, 2);
        assert_eq!(metrics.total_updates(), 3);
        assert_eq!(metrics.snapshots, 1);
        assert_eq!(metrics.publishes, 1);
    }

    #[test]
    fn test_concurrent_publishers_keep_cycles_unique() {
        let store = Arc::new(SensorStateStore::new());
        let num_threads = 4;
        let publishes_per_thread = 250;

        let handles: Vec<_> = (0..num_threads)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..publishes_per_thread {
                        store.publish_outputs(SteeringCommand::new(0.0), ThrottleCommand::new(0.0));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.outputs().cycle, (num_threads * publishes_per_thread) as u64);
    }

    #[test]
    fn test_snapshot_sees_each_channel_consistently() {
        // 每个生产者写入单调递增的值，快照中每个通道都不应倒退
        let store = Arc::new(SensorStateStore::new());
        let iterations = 2000;

        let front_writer = {
            let store = store.clone();
            thread::spawn(move || {
                for i in 1..=iterations {
                    store.set_front_range(DistanceReading::new(i as f32));
                }
            })
        };
        let aim_writer = {
            let store = store.clone();
            thread::spawn(move || {
                for i in 1..=iterations {
                    store.set_aim_angle(AngleReading::new(i as f32));
                }
            })
        };

        let mut last_front = 0.0f32;
        let mut last_aim = 0.0f32;
        for _ in 0..iterations {
            let snapshot = store.snapshot_inputs();
            assert!(snapshot.front_range.value() >= last_front);
            assert!(snapshot.aim_angle.value() >= last_aim);
            last_front = snapshot.front_range.value();
            last_aim = snapshot.aim_angle.value();
        }

        front_writer.join().unwrap();
        aim_writer.join().unwrap();
        let final_snapshot = store.snapshot_inputs();
        assert_eq!(final_snapshot.front_range.value(), iterations as f32);
        assert_eq!(final_snapshot.aim_angle.value(), iterations as f32);
    }

    #[test]
    fn test_random_writes_last_value_wins() {
        use rand::Rng;

        let store = SensorStateStore::new();
        let mut rng = rand::thread_rng();
        let mut expected = 0.0f32;
        for _ in 0..100 {
            expected = rng.gen_range(-5.0..5.0);
            store.set_rear_range(DistanceReading::new(expected));
        }
        assert_eq!(store.snapshot_inputs().rear_range.value(), expected);
    }
}
