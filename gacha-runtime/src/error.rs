//! # Error 模块
//!
//! 定义 gacha-runtime 中使用的错误类型。
//!
//! 错误面很窄：运行期没有 IO、没有可瞬态失败的外部调用，
//! 唯一的错误类别是配置缺陷（对本轮演出致命，对进程无害）。

use thiserror::Error;

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 奖励目录为空，无法抽取
    #[error("奖励目录为空")]
    EmptyCatalog,

    /// 必需的资源引用为空
    #[error("资源槽位 '{slot}' 缺少引用")]
    MissingAsset { slot: &'static str },
}

/// Result 类型别名
pub type GachaResult<T> = Result<T, ConfigError>;
