//! # Command 模块
//!
//! 定义 Runtime 向 Host 发出的所有指令。
//! Command 是 Runtime 与 Host 之间的**唯一通信方式**。
//!
//! ## 设计原则
//!
//! - **声明式**：Command 描述"做什么"，不描述"怎么做"
//! - **无副作用**：Command 本身不执行任何操作，由 Host 转换为实际的渲染/音频操作
//! - **引擎无关**：不包含任何具体渲染引擎的类型

use serde::{Deserialize, Serialize};

/// 精灵资源引用（由 Host 解释的资源标识）
pub type SpriteRef = String;

/// 音效资源引用
pub type SfxRef = String;

/// 粒子效果配置引用
pub type ParticleRef = String;

/// RGBA 颜色（各分量 0.0 - 1.0）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// 不透明白色
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    /// 创建不透明颜色
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// 创建带透明度的颜色
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// 二维向量（位置偏移 / 缩放）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// 零向量
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// 创建向量
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 两个分量相同的向量（等比缩放常用）
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v }
    }

    /// 向量长度
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// 可操作的视觉元素
///
/// 枚举集合是封闭的：演出只涉及这些固定元素，
/// Host 在启动时将每个元素绑定到具体的渲染对象。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualId {
    /// 全屏渐暗遮罩
    FadeOverlay,
    /// 蓄力光效
    ChargeGlyph,
    /// 结果剪影
    Silhouette,
    /// 全屏闪光遮罩
    FlashOverlay,
    /// 背景图
    Background,
    /// 结果图
    ResultImage,
    /// 结果光晕
    ResultGlow,
    /// 画布缩放根节点
    ZoomRoot,
    /// 结果面板容器（重抽/确认按钮组的整体透明度）
    ResultPanel,
}

/// 可启用/禁用的 UI 控件组
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlId {
    /// 抽取按钮
    TriggerButton,
    /// 结果面板（重抽/确认按钮组）
    ResultPanel,
}

/// Runtime 向 Host 发出的指令
///
/// Host 接收 Command 后，将其转换为实际的渲染、音频、粒子等操作。
/// 所有视觉写入假定立即生效且不会失败。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// 设置视觉元素不透明度（0.0 - 1.0）
    SetOpacity { visual: VisualId, alpha: f32 },

    /// 设置视觉元素缩放
    SetScale { visual: VisualId, scale: Vec2 },

    /// 设置视觉元素相对锚点的位置偏移
    SetPosition { visual: VisualId, offset: Vec2 },

    /// 设置视觉元素着色
    SetTint { visual: VisualId, color: Color },

    /// 切换视觉元素的精灵资源
    SetSprite { visual: VisualId, sprite: SpriteRef },

    /// 播放音效（触发即忘）
    PlaySfx { clip: SfxRef },

    /// 生成一次粒子爆发（触发即忘，Host 持有可销毁句柄）
    SpawnParticleBurst { profile: ParticleRef, tint: Color },

    /// 销毁所有已生成的粒子（重置时使用）
    ClearParticles,

    /// 启用/禁用 UI 控件组
    SetInteractable { control: ControlId, interactable: bool },
}
