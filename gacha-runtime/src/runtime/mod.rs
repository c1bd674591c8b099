//! # Runtime 模块
//!
//! 演出执行引擎核心，负责阶段序列与生命周期管理。
//!
//! ## 模块结构
//!
//! - [`engine`]：执行引擎与生命周期控制器
//! - [`chain`]：主演出链的阶段状态机
//! - [`idle`]：待机脉冲循环

pub mod engine;

pub(crate) mod chain;
pub(crate) mod idle;

pub use engine::GachaRuntime;
