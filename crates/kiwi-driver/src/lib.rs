//! 状态同步层
//!
//! 本 crate 提供 Kiwi 决策核心的共享状态：
//! - 七个输入通道的"最新值"存储（每通道独立互斥锁，生产者之间互不竞争）
//! - 一致性输入快照（固定加锁顺序，避免死锁）
//! - 输出对的原子发布（ArcSwap 无锁读取）
//! - 原子计数器指标
//!
//! 存储对象通过 `Arc` 显式注入到生产者与周期驱动中，不存在全局单例。

pub mod metrics;
pub mod store;

pub use metrics::{StoreMetrics, StoreMetricsSnapshot};
pub use store::SensorStateStore;
