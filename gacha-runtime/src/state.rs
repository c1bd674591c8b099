//! # State 模块
//!
//! 演出状态机的可观测状态。
//!
//! ## 设计原则
//!
//! - 状态机显式建模：状态 = 阶段游标 + 待机循环，转换 = 计时器走完 / 取消请求
//! - Host 与测试通过 [`Phase`] 观察当前状态，不触碰内部游标

use serde::{Deserialize, Serialize};

/// 序列所有权令牌
///
/// 每次启动主链或待机循环时分配一个新句柄；
/// 取消即丢弃持有该句柄的运行体，被丢弃的运行体不可能再发出指令。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SequenceHandle(pub(crate) u64);

impl SequenceHandle {
    /// 获取内部编号
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// 演出阶段标识（主链的有序阶段列表）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageId {
    /// 背景渐暗
    FadeIn,
    /// 蓄力
    EnergyCharge,
    /// 剪影抖动
    SilhouetteShake,
    /// 闪光（次数随等级）
    Flash,
    /// 画布缩放（仅史诗/传说）
    CanvasZoom,
    /// 应用等级效果（瞬时）
    RevealApply,
    /// 光晕渐入
    GlowFadeIn,
    /// 剪影淡出
    SilhouetteFadeOut,
    /// 结果揭示
    ResultReveal,
    /// 按钮渐入
    ButtonsFadeIn,
}

/// 状态机当前相位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// 等待用户触发
    AwaitingTrigger,
    /// 主链运行中
    Chain { stage: StageId },
    /// 待机脉冲循环运行中
    IdlePulse,
    /// 主链已结束且无待机循环（无光晕配置时）
    Settled,
}

impl Phase {
    /// 是否有任何运行体处于活跃状态
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Chain { .. } | Self::IdlePulse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_is_running() {
        assert!(!Phase::AwaitingTrigger.is_running());
        assert!(!Phase::Settled.is_running());
        assert!(Phase::Chain { stage: StageId::FadeIn }.is_running());
        assert!(Phase::IdlePulse.is_running());
    }

    #[test]
    fn test_phase_serialization() {
        let phase = Phase::Chain {
            stage: StageId::SilhouetteShake,
        };
        let json = serde_json::to_string(&phase).unwrap();
        let deserialized: Phase = serde_json::from_str(&json).unwrap();
        assert_eq!(phase, deserialized);
    }
}
