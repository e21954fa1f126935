//! Loop Runner - 固定频率决策循环
//!
//! 以固定周期调用 [`DecisionEngine::step`]，直到运行标志被清除或达到最大迭代次数。
//!
//! # 核心功能
//!
//! - **固定节拍**: 按绝对截止时间休眠，抖动不会累积
//! - **超时检测**: 单个周期超过标称周期时计数并告警，然后重新对齐节拍（不补发）
//! - **可选 spin_sleep**: 更低的延时抖动，代价是更多 CPU
//! - **后台线程**: [`spawn_decision_loop`] 在独立线程中运行，通过句柄停止
//!
//! # 使用场景
//!
//! ```rust,no_run
//! use kiwi_control::{DecisionEngine, LoopConfig, spawn_decision_loop};
//! use kiwi_driver::SensorStateStore;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), kiwi_control::ControlError> {
//! let store = Arc::new(SensorStateStore::new());
//! let engine = Arc::new(DecisionEngine::default());
//!
//! let handle = spawn_decision_loop(store.clone(), engine, LoopConfig::default())?;
//! // ... 生产者写入传感器数据，消费者读取 store.outputs() ...
//! let stats = handle.stop()?;
//! println!("iterations: {}", stats.iterations);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use kiwi_driver::SensorStateStore;
use spin_sleep::SpinSleeper;
use tracing::{info, trace, warn};

use crate::engine::DecisionEngine;
use crate::error::ControlError;

/// 决策循环配置
#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    /// 决策频率（Hz）
    pub frequency_hz: f64,

    /// 最大迭代次数（None 表示直到停止标志被清除）
    pub max_iterations: Option<usize>,

    /// 使用 spin_sleep 实现低抖动休眠
    pub use_spin_sleep: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        LoopConfig {
            frequency_hz: 20.0,   // 默认 20Hz（50ms 周期）
            max_iterations: None, // 默认无限循环
            use_spin_sleep: false,
        }
    }
}

impl LoopConfig {
    /// 校验配置并返回标称周期（不打日志，可重复调用）
    pub fn period(&self) -> Result<Duration, ControlError> {
        if !self.frequency_hz.is_finite() || self.frequency_hz <= 0.0 {
            return Err(ControlError::InvalidConfig(format!(
                "Invalid frequency_hz: {} (must be > 0)",
                self.frequency_hz
            )));
        }
        Ok(Duration::from_secs_f64(1.0 / self.frequency_hz))
    }
}

/// 循环统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopStats {
    /// 已执行的决策周期数
    pub iterations: usize,
    /// 超出标称周期的次数
    pub overruns: usize,
}

/// 运行决策循环（阻塞）
///
/// 在以下情况返回：
/// - `running` 被置为 `false`
/// - 达到 `max_iterations`（如果设置）
///
/// # 返回
///
/// - `Ok(LoopStats)`: 正常结束
/// - `Err(ControlError::InvalidConfig)`: 频率无效
pub fn run_decision_loop(
    store: &SensorStateStore,
    engine: &DecisionEngine,
    config: &LoopConfig,
    running: &AtomicBool,
) -> Result<LoopStats, ControlError> {
    let period = config.period()?;
    if config.frequency_hz > 1000.0 {
        warn!(
            "Very high decision frequency: {} Hz. This may starve sensor producers.",
            config.frequency_hz
        );
    }
    let sleeper = config.use_spin_sleep.then(SpinSleeper::default);
    let mut stats = LoopStats::default();

    info!(
        frequency_hz = config.frequency_hz,
        max_iterations = ?config.max_iterations,
        "decision loop started"
    );

    let mut deadline = Instant::now();
    loop {
        if !running.load(Ordering::Acquire) {
            trace!("decision loop: running flag is false, exiting");
            break;
        }
        if let Some(max_iter) = config.max_iterations
            && stats.iterations >= max_iter
        {
            break;
        }

        engine.step(store);
        stats.iterations += 1;
        // 最后一个周期之后不再睡眠
        if config.max_iterations == Some(stats.iterations) {
            break;
        }

        deadline += period;
        let now = Instant::now();
        if now > deadline {
            stats.overruns += 1;
            warn!(
                overrun_us = (now - deadline).as_micros() as u64,
                "decision step overran its period"
            );
            // 重新对齐，不补发错过的周期
            deadline = now;
            continue;
        }

        let remaining = deadline - now;
        match &sleeper {
            Some(sleeper) => sleeper.sleep(remaining),
            None => std::thread::sleep(remaining),
        }
    }

    info!(
        iterations = stats.iterations,
        overruns = stats.overruns,
        "decision loop stopped"
    );
    Ok(stats)
}

/// 决策循环线程句柄
///
/// Drop 时会自动停止并等待线程退出。
pub struct DecisionLoopHandle {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<Result<LoopStats, ControlError>>>,
}

impl DecisionLoopHandle {
    /// 循环是否仍在运行
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
            && self.thread.as_ref().is_some_and(|thread| !thread.is_finished())
    }

    /// 停止循环并等待线程退出
    pub fn stop(mut self) -> Result<LoopStats, ControlError> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<LoopStats, ControlError> {
        self.running.store(false, Ordering::Release);
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| ControlError::ThreadPanicked)?,
            None => Ok(LoopStats::default()),
        }
    }
}

impl Drop for DecisionLoopHandle {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("decision loop shutdown failed: {}", e);
        }
    }
}

/// 在后台线程中运行决策循环
///
/// 频率在启动前校验，无效配置直接返回错误，不会创建线程。
pub fn spawn_decision_loop(
    store: Arc<SensorStateStore>,
    engine: Arc<DecisionEngine>,
    config: LoopConfig,
) -> Result<DecisionLoopHandle, ControlError> {
    config.period()?;

    let running = Arc::new(AtomicBool::new(true));
    let running_loop = running.clone();
    let thread = std::thread::Builder::new()
        .name("kiwi-decision".to_string())
        .spawn(move || {
            let result = run_decision_loop(&store, &engine, &config, &running_loop);
            running_loop.store(false, Ordering::Release);
            result
        })
        .map_err(|e| ControlError::ThreadSpawn(e.to_string()))?;

    Ok(DecisionLoopHandle {
        running,
        thread: Some(thread),
    })
}
