//! # Config 模块
//!
//! 演出配置：奖励目录、等级效果表、资源引用。
//!
//! ## 设计原则
//!
//! - 配置在构造时一次性校验，运行期查表不会失败
//! - 等级效果表是**按等级枚举直接索引的封闭表**（每个等级恰好一个档案），
//!   不使用通用关联容器
//! - 全部可序列化，Host 可以从 JSON 装载

use serde::{Deserialize, Serialize};

use crate::command::{Color, ParticleRef, SfxRef, SpriteRef};
use crate::error::ConfigError;
use crate::outcome::Tier;

/// 按等级索引的封闭表
///
/// 每个等级恰好映射一个值，由结构定义保证，查询不会失败。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierTable<T> {
    pub common: T,
    pub rare: T,
    pub epic: T,
    pub legendary: T,
}

impl<T> TierTable<T> {
    /// 按等级取值
    pub fn get(&self, tier: Tier) -> &T {
        match tier {
            Tier::Common => &self.common,
            Tier::Rare => &self.rare,
            Tier::Epic => &self.epic,
            Tier::Legendary => &self.legendary,
        }
    }

    /// 按等级顺序遍历（普通 → 传说）
    pub fn iter(&self) -> impl Iterator<Item = (Tier, &T)> {
        Tier::ALL.iter().map(move |&tier| (tier, self.get(tier)))
    }
}

/// 单个等级的演出档案
///
/// 静态配置，运行期不修改。粒子与音效槽位允许缺省（跳过对应效果）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierEffectProfile {
    /// 结果光晕颜色
    pub glow_color: Color,
    /// 等级粒子爆发配置（缺省则不触发）
    pub particle_profile: Option<ParticleRef>,
    /// 等级揭示音效（缺省则不播放）
    pub sfx: Option<SfxRef>,
}

/// 演出用的音效槽位
///
/// 每个槽位都允许缺省，缺省的音效直接跳过。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoundSet {
    /// 按钮点击
    pub click: Option<SfxRef>,
    /// 蓄力
    pub charge: Option<SfxRef>,
    /// 抖动
    pub shake: Option<SfxRef>,
    /// 结果揭示
    pub reveal: Option<SfxRef>,
}

/// 演出配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealConfig {
    /// 奖励目录（结果/剪影精灵），至少一项
    pub catalog: Vec<SpriteRef>,
    /// 等级演出档案表
    pub profiles: TierTable<TierEffectProfile>,
    /// 等级背景精灵表
    pub backgrounds: TierTable<SpriteRef>,
    /// 待机/重置时的默认背景
    pub default_background: SpriteRef,
    /// 结果揭示时的星光粒子（缺省则不触发）
    pub star_particle: Option<ParticleRef>,
    /// 音效槽位
    pub sounds: SoundSet,
    /// 是否存在结果光晕视觉
    ///
    /// 为 `false` 时跳过光晕渐入、光晕着色与待机脉冲循环。
    pub has_glow: bool,
}

impl RevealConfig {
    /// 校验配置
    ///
    /// 在 Runtime 构造时调用一次；通过校验后运行期查表不会失败。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        if self.catalog.iter().any(|s| s.is_empty()) {
            return Err(ConfigError::MissingAsset { slot: "catalog" });
        }
        if self.default_background.is_empty() {
            return Err(ConfigError::MissingAsset {
                slot: "default_background",
            });
        }
        for (tier, background) in self.backgrounds.iter() {
            if background.is_empty() {
                return Err(ConfigError::MissingAsset {
                    slot: background_slot(tier),
                });
            }
        }
        Ok(())
    }
}

fn background_slot(tier: Tier) -> &'static str {
    match tier {
        Tier::Common => "backgrounds.common",
        Tier::Rare => "backgrounds.rare",
        Tier::Epic => "backgrounds.epic",
        Tier::Legendary => "backgrounds.legendary",
    }
}
