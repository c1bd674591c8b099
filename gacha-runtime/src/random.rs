//! # Random 模块
//!
//! 可注入的随机源接口。
//!
//! ## 设计说明
//!
//! - 抖动偏移、抽取掷点都经由 [`RandomSource`] 获取，
//!   演出行为因此在测试下可完全复现
//! - 生产实现 [`RngSource`] 包装任意 `rand::Rng`
//! - [`ScriptedSource`] 按预置序列回放，用于测试与演示回放

use std::collections::VecDeque;
use std::f32::consts::TAU;

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

use crate::command::Vec2;

/// 随机源接口
///
/// Runtime 需要的三种随机量，全部集中在这里。
pub trait RandomSource {
    /// 均匀整数掷点，范围 `[0,100)`
    fn roll_percent(&mut self) -> u32;

    /// 均匀索引，范围 `[0,len)`（`len >= 1`）
    fn pick_index(&mut self, len: usize) -> usize;

    /// 单位圆盘内的均匀随机点（抖动偏移用）
    fn unit_disk(&mut self) -> Vec2;
}

/// 包装 `rand::Rng` 的生产随机源
pub struct RngSource<R: Rng> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    /// 从任意 `rand::Rng` 创建随机源
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn roll_percent(&mut self) -> u32 {
        self.rng.random_range(0..100)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    fn unit_disk(&mut self) -> Vec2 {
        // 半径取平方根，保证圆盘内均匀分布
        let angle = self.rng.random_range(0.0..TAU);
        let radius = self.rng.random::<f32>().sqrt();
        Vec2::new(radius * angle.cos(), radius * angle.sin())
    }
}

/// 基于线程本地 RNG 的随机源
pub fn thread_source() -> RngSource<ThreadRng> {
    RngSource::new(rand::rng())
}

/// 基于固定种子的随机源（可复现的演示/回放）
pub fn seeded_source(seed: u64) -> RngSource<StdRng> {
    RngSource::new(StdRng::seed_from_u64(seed))
}

/// 按预置序列回放的确定性随机源
///
/// 序列耗尽后回退到固定值（掷点 0、索引 0、圆盘原点），
/// 这样长动画中的抖动采样不需要预先铺满整个序列。
#[derive(Debug, Default)]
pub struct ScriptedSource {
    rolls: VecDeque<u32>,
    indices: VecDeque<usize>,
    disk_points: VecDeque<Vec2>,
}

impl ScriptedSource {
    /// 创建空序列的随机源
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置掷点序列
    pub fn with_rolls(mut self, rolls: impl IntoIterator<Item = u32>) -> Self {
        self.rolls.extend(rolls);
        self
    }

    /// 预置索引序列
    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(indices);
        self
    }

    /// 预置圆盘采样序列
    pub fn with_disk_points(mut self, points: impl IntoIterator<Item = Vec2>) -> Self {
        self.disk_points.extend(points);
        self
    }
}

impl RandomSource for ScriptedSource {
    fn roll_percent(&mut self) -> u32 {
        self.rolls.pop_front().unwrap_or(0)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.indices.pop_front().unwrap_or(0).min(len.saturating_sub(1))
    }

    fn unit_disk(&mut self) -> Vec2 {
        self.disk_points.pop_front().unwrap_or(Vec2::ZERO)
    }
}
