//! # Timer 模块
//!
//! 驱动单段插值的阶段计时器。

/// 阶段计时器
///
/// 在阶段入口创建，随 tick 单调推进，阶段出口丢弃。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageTimer {
    elapsed: f32,
    total: f32,
}

impl StageTimer {
    /// 创建指定总时长（秒）的计时器
    pub fn new(total: f32) -> Self {
        Self {
            elapsed: 0.0,
            total: total.max(0.0),
        }
    }

    /// 推进计时器
    ///
    /// # 返回
    /// - `true`: 计时器已走完
    /// - `false`: 仍在计时
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt.max(0.0);
        self.finished()
    }

    /// 归一化进度（0.0 - 1.0）
    pub fn progress(&self) -> f32 {
        if self.total <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.total).clamp(0.0, 1.0)
        }
    }

    /// 是否已走完
    pub fn finished(&self) -> bool {
        self.elapsed >= self.total
    }
}
