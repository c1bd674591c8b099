//! # Idle 模块
//!
//! 待机脉冲循环：主链完成后进入的无限周期振荡。
//!
//! ## 设计说明
//!
//! - 相位以循环本地的累计时间驱动（从 0 开始），测试下可完全复现
//! - 无终止条件，只能被显式取消（引擎丢弃运行体）
//! - 取消时光晕停留在当前缩放；恢复基线由生命周期控制器负责

use crate::command::{Command, Vec2, VisualId};
use crate::easing::lerp;
use crate::state::SequenceHandle;

/// 脉冲缩放下限
const PULSE_SCALE_MIN: f32 = 1.0;
/// 脉冲缩放上限
const PULSE_SCALE_MAX: f32 = 1.4;
/// 振荡角速度（弧度/秒）
const PULSE_SPEED: f32 = 1.5;

/// 待机脉冲循环运行体
///
/// 与主链持有不同的 [`SequenceHandle`]，二者互不取消。
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct IdlePulse {
    handle: SequenceHandle,
    /// 循环本地累计时间（秒）
    elapsed: f32,
}

impl IdlePulse {
    pub(crate) fn new(handle: SequenceHandle) -> Self {
        Self {
            handle,
            elapsed: 0.0,
        }
    }

    pub(crate) fn handle(&self) -> SequenceHandle {
        self.handle
    }

    /// 推进循环一帧，发出光晕缩放指令
    pub(crate) fn tick(&mut self, dt: f32, commands: &mut Vec<Command>) {
        self.elapsed += dt.max(0.0);
        commands.push(Command::SetScale {
            visual: VisualId::ResultGlow,
            scale: Vec2::splat(self.scale()),
        });
    }

    /// 当前缩放值：`lerp(1.0, 1.4, (sin(t*1.5)+1)/2)`
    fn scale(&self) -> f32 {
        let t = ((self.elapsed * PULSE_SPEED).sin() + 1.0) / 2.0;
        lerp(PULSE_SCALE_MIN, PULSE_SCALE_MAX, t)
    }
}
