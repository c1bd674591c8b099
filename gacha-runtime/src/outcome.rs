//! # Outcome 模块
//!
//! 抽取器（Outcome Roller）：掷出奖励等级与奖励个体。
//!
//! ## 设计说明
//!
//! - 等级由 `[0,100)` 的均匀整数按固定区间划分，区间互不重叠且穷尽
//! - 奖励个体在目录中均匀抽取
//! - 完全由注入的 [`RandomSource`] 决定，无其他副作用
//! - 等级策略（闪光次数、缩放分支、着色）是 `Tier` 上的纯函数

use serde::{Deserialize, Serialize};

use crate::command::Color;
use crate::error::ConfigError;
use crate::random::RandomSource;

/// 奖励等级，按稀有度全序排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// 普通
    Common,
    /// 稀有
    Rare,
    /// 史诗
    Epic,
    /// 传说
    Legendary,
}

impl Tier {
    /// 全部等级（按稀有度升序）
    pub const ALL: [Tier; 4] = [Tier::Common, Tier::Rare, Tier::Epic, Tier::Legendary];

    /// 从 `[0,100)` 的掷点值映射等级
    ///
    /// 区间划分（下界含、上界不含）：
    /// `[0,25)` 普通、`[25,50)` 稀有、`[50,75)` 史诗、`[75,100)` 传说。
    pub fn from_percent(roll: u32) -> Self {
        debug_assert!(roll < 100);
        match roll {
            0..25 => Tier::Common,
            25..50 => Tier::Rare,
            50..75 => Tier::Epic,
            _ => Tier::Legendary,
        }
    }

    /// 闪光阶段的重复次数
    pub fn flash_count(&self) -> u8 {
        match self {
            Tier::Common => 1,
            Tier::Rare => 2,
            Tier::Epic => 3,
            Tier::Legendary => 4,
        }
    }

    /// 是否执行画布缩放阶段
    pub fn zooms(&self) -> bool {
        matches!(self, Tier::Epic | Tier::Legendary)
    }

    /// 闪光结束后蓄力光效的着色（普通等级不变色）
    pub fn charge_tint(&self) -> Option<Color> {
        match self {
            Tier::Common => None,
            Tier::Rare => Some(Color::rgb(0.35, 0.55, 1.0)),
            Tier::Epic => Some(Color::rgb(0.61, 0.43, 1.0)),
            Tier::Legendary => Some(Color::rgb(1.0, 0.74, 0.29)),
        }
    }

    /// 结果揭示时星光粒子的着色
    pub fn star_tint(&self) -> Color {
        match self {
            Tier::Common => Color::WHITE,
            Tier::Rare => Color::rgb(0.2, 0.4, 1.0),
            Tier::Epic => Color::rgb(0.6, 0.1, 0.9),
            Tier::Legendary => Color::rgb(1.0, 0.45, 0.0),
        }
    }
}

/// 一次抽取的结果
///
/// 每次触发创建一个，存活至本轮演出结束；
/// 重抽时被替换，确认时被丢弃。同一时刻至多存在一个。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// 奖励等级
    pub tier: Tier,
    /// 奖励在目录中的索引
    pub item_index: usize,
}

/// 执行一次抽取
///
/// # 参数
///
/// - `rng`: 注入的随机源
/// - `catalog_len`: 奖励目录大小
///
/// # 错误
///
/// 目录为空时返回 [`ConfigError::EmptyCatalog`]。
pub fn roll(rng: &mut dyn RandomSource, catalog_len: usize) -> Result<RollOutcome, ConfigError> {
    if catalog_len == 0 {
        return Err(ConfigError::EmptyCatalog);
    }

    let tier = Tier::from_percent(rng.roll_percent());
    let item_index = rng.pick_index(catalog_len);

    Ok(RollOutcome { tier, item_index })
}
