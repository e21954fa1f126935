//! 状态存储并发测试
//!
//! 验证多生产者 + 周期决策 + 多消费者同时运行时：
//! 1. 输出对总是成对更新（不会看到来自两个周期的转向/油门组合）
//! 2. 周期序号单调递增
//! 3. 生产者之间互不阻塞，最终值为最后一次写入

use kiwi_sdk::prelude::*;
use kiwi_sdk::spawn_decision_loop;
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// 两种交替的输入对应的输出：
/// - 瞄准角 0.3 → (0.03, 0.15)
/// - 瞄准角 1.0 → (0.1, 0.09)
fn is_consistent_pair(command: &ActuationCommand) -> bool {
    let steering = command.steering.value();
    let throttle = command.throttle.value();
    if command.cycle == 0 {
        return steering == 0.0 && throttle == 0.0;
    }
    ((steering - 0.03).abs() < 1e-6 && throttle == 0.15)
        || ((steering - 0.1).abs() < 1e-6 && throttle == 0.09)
}

#[test]
fn test_outputs_change_together() {
    let store = Arc::new(SensorStateStore::new());
    store.set_front_range(DistanceReading::new(1.0));
    let engine = Arc::new(DecisionEngine::default());
    let cycles = 5000;

    let driver = {
        let store = store.clone();
        let engine = engine.clone();
        thread::spawn(move || {
            for i in 0..cycles {
                let aim = if i % 2 == 0 { 0.3 } else { 1.0 };
                store.set_aim_angle(AngleReading::new(aim));
                engine.step(&store);
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            thread::spawn(move || {
                let mut last_cycle = 0u64;
                loop {
                    let command = store.outputs();
                    assert!(is_consistent_pair(&command), "mixed pair: {:?}", command);
                    assert!(command.cycle >= last_cycle, "cycle went backwards");
                    last_cycle = command.cycle;
                    if last_cycle >= cycles as u64 {
                        break;
                    }
                    thread::yield_now();
                }
            })
        })
        .collect();

    driver.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(store.outputs().cycle, cycles as u64);
}

#[test]
fn test_producers_do_not_block_each_other() {
    let store = Arc::new(SensorStateStore::new());
    let writes = 2000;

    let producers: Vec<_> = (0..7)
        .map(|channel| {
            let store = store.clone();
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                for i in 0..writes {
                    let last = i == writes - 1;
                    let value: f32 = if last { 42.0 } else { rng.gen_range(0.0..10.0) };
                    match channel {
                        0 => store.set_front_range(DistanceReading::new(value)),
                        1 => store.set_rear_range(DistanceReading::new(value)),
                        2 => store.set_left_reflectance(VoltageReading::new(value)),
                        3 => store.set_right_reflectance(VoltageReading::new(value)),
                        4 => store.set_aim_angle(AngleReading::new(value)),
                        5 => store.set_object_detection(KiwiDetection::new(value, 0.0, 1.0, value)),
                        _ => store.set_intersection_flag(IntersectionFlag::new(value as i32)),
                    }
                }
            })
        })
        .collect();

    // 与生产者并发取快照
    for _ in 0..500 {
        let _ = store.snapshot_inputs();
    }

    for producer in producers {
        producer.join().unwrap();
    }

    let snapshot = store.snapshot_inputs();
    assert_eq!(snapshot.front_range.value(), 42.0);
    assert_eq!(snapshot.rear_range.value(), 42.0);
    assert_eq!(snapshot.left_reflectance.value(), 42.0);
    assert_eq!(snapshot.right_reflectance.value(), 42.0);
    assert_eq!(snapshot.aim_angle.value(), 42.0);
    assert_eq!(snapshot.detection.height, 42.0);
    assert_eq!(snapshot.intersection.state(), 42);

    let metrics = store.metrics().snapshot();
    assert_eq!(metrics.total_updates(), 7 * writes as u64);
}

#[test]
fn test_decision_loop_with_live_producers() {
    let store = Arc::new(SensorStateStore::new());
    store.set_front_range(DistanceReading::new(1.0));
    store.set_aim_angle(AngleReading::new(0.3));
    let engine = Arc::new(DecisionEngine::default());
    let config = LoopConfig {
        frequency_hz: 500.0,
        ..Default::default()
    };

    let handle = spawn_decision_loop(store.clone(), engine.clone(), config).unwrap();

    let stop = Arc::new(AtomicBool::new(false));
    let producer = {
        let store = store.clone();
        let stop = stop.clone();
        thread::spawn(move || {
            let mut i = 0u64;
            while !stop.load(Ordering::Acquire) {
                let aim = if i % 2 == 0 { 0.3 } else { 1.0 };
                store.set_aim_angle(AngleReading::new(aim));
                i += 1;
                thread::sleep(Duration::from_micros(200));
            }
        })
    };

    let mut observed = 0;
    for _ in 0..200 {
        let command = store.outputs();
        assert!(is_consistent_pair(&command), "mixed pair: {:?}", command);
        if command.cycle > 0 {
            observed += 1;
        }
        thread::sleep(Duration::from_micros(500));
    }

    stop.store(true, Ordering::Release);
    producer.join().unwrap();
    let stats = handle.stop().unwrap();

    assert!(observed > 0);
    assert!(stats.iterations > 0);
    assert_eq!(store.outputs().cycle, stats.iterations as u64);
    assert_eq!(engine.metrics().snapshot().cycles, stats.iterations as u64);
}

#[test]
fn test_intersection_stop_visible_to_consumers() {
    let store = Arc::new(SensorStateStore::new());
    store.set_front_range(DistanceReading::new(1.0));
    store.set_aim_angle(AngleReading::new(0.3));
    let engine = DecisionEngine::default();

    engine.step(&store);
    assert_eq!(store.throttle().value(), 0.15);

    let perception = {
        let store = store.clone();
        thread::spawn(move || {
            store.set_object_detection(KiwiDetection::new(500.0, 0.0, 50.0, 165.5));
            store.set_intersection_flag(IntersectionFlag::ACTIVE);
        })
    };
    perception.join().unwrap();

    let command = engine.step(&store);
    assert!(command.throttle.is_stop());
    assert!(store.throttle().is_stop());
    assert_eq!(store.outputs().cycle, 2);
}
