//! # Gacha Runtime
//!
//! 抽取（gacha）揭示演出的核心运行时库。
//!
//! ## 架构概述
//!
//! `gacha-runtime` 是纯逻辑核心，不依赖任何 IO 或渲染引擎。
//! 它通过 **命令驱动模式** 与宿主层（Host）通信：
//!
//! ```text
//! Host                          Runtime
//!   │                              │
//!   │──── on_trigger() ──────────►│  掷点、启动主链
//!   │◄─── Vec<Command> ───────────│
//!   │                              │
//!   │──── tick(dt) ──────────────►│  推进所有活跃计时器
//!   │◄─── Vec<Command> ───────────│
//!   │                              │
//! ```
//!
//! 主链是一条有序阶段列表（渐暗 → 蓄力 → 抖动 → 闪光 → 缩放 →
//! 效果应用 → 光晕 → 剪影淡出 → 结果揭示 → 按钮入场），
//! 按等级分支强度；终段结束后进入待机脉冲循环。
//! 重抽/确认在任意时刻取消全部运行体并恢复基线。
//!
//! ## 核心类型
//!
//! - [`GachaRuntime`]：执行引擎与生命周期控制器
//! - [`Command`]：Runtime 向 Host 发出的指令
//! - [`RevealConfig`]：演出配置（等级效果表、奖励目录、资源引用）
//! - [`Tier`] / [`RollOutcome`]：抽取结果
//! - [`Phase`]：可观测的状态机相位
//!
//! ## 模块结构
//!
//! - [`command`]：Command 与视觉元素定义
//! - [`config`]：演出配置
//! - [`outcome`]：抽取器与等级策略
//! - [`random`]：可注入的随机源
//! - [`easing`]：插值函数
//! - [`timer`]：阶段计时器
//! - [`state`]：可观测状态
//! - [`runtime`]：执行引擎

pub mod command;
pub mod config;
pub mod easing;
pub mod error;
pub mod outcome;
pub mod random;
pub mod runtime;
pub mod state;
pub mod timer;

// 重导出核心类型
pub use command::{Color, Command, ControlId, ParticleRef, SfxRef, SpriteRef, Vec2, VisualId};
pub use config::{RevealConfig, SoundSet, TierEffectProfile, TierTable};
pub use error::{ConfigError, GachaResult};
pub use outcome::{RollOutcome, Tier, roll};
pub use random::{RandomSource, RngSource, ScriptedSource, seeded_source, thread_source};
pub use runtime::GachaRuntime;
pub use state::{Phase, SequenceHandle, StageId};
pub use timer::StageTimer;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        // 验证所有公共类型都可以正常使用
        let _cmd = Command::SetOpacity {
            visual: VisualId::FadeOverlay,
            alpha: 0.5,
        };

        let _phase = Phase::AwaitingTrigger;

        let _tier = Tier::from_percent(42);

        let _timer = StageTimer::new(1.0);
    }
}
