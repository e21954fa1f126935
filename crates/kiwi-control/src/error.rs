//! 决策层错误类型定义
//!
//! 决策周期本身是全函数，不会失败；错误只出现在配置加载和循环线程管理上。

use thiserror::Error;

/// 决策层错误类型
#[derive(Error, Debug)]
pub enum ControlError {
    /// 配置文件读取失败
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 配置文件解析失败
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// 配置序列化失败
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// 配置参数无效
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// 决策循环线程创建失败
    #[error("Failed to spawn decision loop thread: {0}")]
    ThreadSpawn(String),

    /// 决策循环线程 panic
    #[error("Decision loop thread panicked")]
    ThreadPanicked,
}
