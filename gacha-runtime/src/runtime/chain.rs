//! # Chain 模块
//!
//! 阶段序列器：主演出链的有序阶段状态机。
//!
//! ## 执行模型
//!
//! 原始演出把各阶段写成"每段结束时启动下一段"的协程链；
//! 这里重构为**显式的有序阶段列表 + 游标**：
//!
//! - 游标 = [`StageRun`]（当前阶段及其子相位、计时器）
//! - 转换 = 计时器走完；每个 tick 至多跨越一个段边界
//! - 边界处先写出当前段的精确终值，再进入下一段并发出其入口指令
//!
//! 等级在链启动时拷贝进 [`ChainRun`]，链中途不再重新求值。
//! 取消由引擎丢弃整个 `ChainRun` 实现，被丢弃的链不可能再发出指令。

use crate::command::{Command, ControlId, Vec2, VisualId};
use crate::config::RevealConfig;
use crate::easing::{lerp, smoothstep, triangle_pulse};
use crate::outcome::Tier;
use crate::random::RandomSource;
use crate::state::{SequenceHandle, StageId};
use crate::timer::StageTimer;

/// 背景渐暗时长
const FADE_IN_SECS: f32 = 1.0;
/// 蓄力时长
const CHARGE_SECS: f32 = 1.2;
/// 剪影抖动时长
const SHAKE_SECS: f32 = 3.0;
/// 单次闪光脉冲时长
const FLASH_PULSE_SECS: f32 = 0.2;
/// 闪光间隔（设计的纯等待段）
const FLASH_GAP_SECS: f32 = 0.1;
/// 画布缩放单程时长
const ZOOM_LEG_SECS: f32 = 0.4;
/// 画布缩放顶点停留
const ZOOM_HOLD_SECS: f32 = 0.05;
/// 光晕渐入时长
const GLOW_FADE_SECS: f32 = 0.4;
/// 剪影淡出时长
const SILHOUETTE_FADE_SECS: f32 = 0.3;
/// 结果揭示时长
const RESULT_REVEAL_SECS: f32 = 0.6;
/// 按钮渐入前的等待
const BUTTON_DELAY_SECS: f32 = 0.5;
/// 按钮渐入时长
const BUTTON_FADE_SECS: f32 = 0.5;

/// 遮罩/剪影的目标不透明度
const OVERLAY_ALPHA: f32 = 0.85;
/// 蓄力光效的目标缩放
const CHARGE_SCALE: f32 = 2.0;
/// 抖动初始振幅（随进度线性衰减到零）
const SHAKE_RADIUS: f32 = 45.0;
/// 画布缩放顶点
const ZOOM_SCALE: f32 = 1.5;
/// 结果图初始缩放（基线重置也使用）
pub(crate) const RESULT_SCALE_FROM: f32 = 0.5;
/// 结果图终点缩放
const RESULT_SCALE_TO: f32 = 2.2;

/// 闪光阶段的子相位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlashPart {
    /// 三角脉冲
    Pulse,
    /// 脉冲间的空白等待
    Gap,
}

/// 画布缩放阶段的子相位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZoomPart {
    /// 放大
    In,
    /// 顶点停留
    Hold,
    /// 缩回
    Out,
}

/// 按钮渐入阶段的子相位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ButtonPart {
    /// 入场前等待
    Delay,
    /// 不透明度渐入
    Fade,
}

/// 当前阶段游标
#[derive(Debug, Clone, PartialEq)]
enum StageRun {
    FadeIn {
        timer: StageTimer,
    },
    EnergyCharge {
        timer: StageTimer,
    },
    SilhouetteShake {
        timer: StageTimer,
    },
    Flash {
        /// 已完成的脉冲数
        repetition: u8,
        /// 本链的脉冲总数（等级决定）
        total: u8,
        part: FlashPart,
        timer: StageTimer,
    },
    CanvasZoom {
        part: ZoomPart,
        timer: StageTimer,
    },
    RevealApply {
        timer: StageTimer,
    },
    GlowFadeIn {
        timer: StageTimer,
    },
    SilhouetteFadeOut {
        timer: StageTimer,
    },
    ResultReveal {
        timer: StageTimer,
    },
    ButtonsFadeIn {
        part: ButtonPart,
        timer: StageTimer,
    },
}

impl StageRun {
    fn id(&self) -> StageId {
        match self {
            Self::FadeIn { .. } => StageId::FadeIn,
            Self::EnergyCharge { .. } => StageId::EnergyCharge,
            Self::SilhouetteShake { .. } => StageId::SilhouetteShake,
            Self::Flash { .. } => StageId::Flash,
            Self::CanvasZoom { .. } => StageId::CanvasZoom,
            Self::RevealApply { .. } => StageId::RevealApply,
            Self::GlowFadeIn { .. } => StageId::GlowFadeIn,
            Self::SilhouetteFadeOut { .. } => StageId::SilhouetteFadeOut,
            Self::ResultReveal { .. } => StageId::ResultReveal,
            Self::ButtonsFadeIn { .. } => StageId::ButtonsFadeIn,
        }
    }
}

/// 链推进结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChainEvent {
    /// 链仍在运行
    Running,
    /// 链已完成（终段结束）
    Completed,
}

/// 一次主演出链的运行体
///
/// 同一时刻至多一个活跃；引擎通过丢弃运行体实现取消。
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ChainRun {
    handle: SequenceHandle,
    tier: Tier,
    stage: StageRun,
}

impl ChainRun {
    /// 从首段启动新链
    pub(crate) fn new(handle: SequenceHandle, tier: Tier) -> Self {
        Self {
            handle,
            tier,
            stage: StageRun::FadeIn {
                timer: StageTimer::new(FADE_IN_SECS),
            },
        }
    }

    pub(crate) fn handle(&self) -> SequenceHandle {
        self.handle
    }

    pub(crate) fn stage_id(&self) -> StageId {
        self.stage.id()
    }

    /// 推进链一帧
    ///
    /// 未到段边界时发出当前段的插值指令；
    /// 到达边界时发出精确终值并进入下一段（入口指令随之发出）。
    pub(crate) fn tick(
        &mut self,
        dt: f32,
        config: &RevealConfig,
        rng: &mut dyn RandomSource,
        commands: &mut Vec<Command>,
    ) -> ChainEvent {
        match &mut self.stage {
            StageRun::FadeIn { timer } => {
                if timer.advance(dt) {
                    commands.push(Command::SetOpacity {
                        visual: VisualId::FadeOverlay,
                        alpha: OVERLAY_ALPHA,
                    });
                    self.enter_energy_charge(config, commands);
                } else {
                    commands.push(Command::SetOpacity {
                        visual: VisualId::FadeOverlay,
                        alpha: lerp(0.0, OVERLAY_ALPHA, timer.progress()),
                    });
                }
                ChainEvent::Running
            }

            StageRun::EnergyCharge { timer } => {
                if timer.advance(dt) {
                    commands.push(Command::SetScale {
                        visual: VisualId::ChargeGlyph,
                        scale: Vec2::splat(CHARGE_SCALE),
                    });
                    commands.push(Command::SetOpacity {
                        visual: VisualId::ChargeGlyph,
                        alpha: 1.0,
                    });
                    self.enter_silhouette_shake(config, commands);
                } else {
                    let t = timer.progress();
                    commands.push(Command::SetScale {
                        visual: VisualId::ChargeGlyph,
                        scale: Vec2::splat(lerp(0.0, CHARGE_SCALE, t)),
                    });
                    commands.push(Command::SetOpacity {
                        visual: VisualId::ChargeGlyph,
                        alpha: lerp(0.0, 1.0, t),
                    });
                }
                ChainEvent::Running
            }

            StageRun::SilhouetteShake { timer } => {
                if timer.advance(dt) {
                    commands.push(Command::SetOpacity {
                        visual: VisualId::Silhouette,
                        alpha: OVERLAY_ALPHA,
                    });
                    // 精确回到锚点，不做插值
                    commands.push(Command::SetPosition {
                        visual: VisualId::Silhouette,
                        offset: Vec2::ZERO,
                    });
                    self.enter_flash();
                } else {
                    let t = timer.progress();
                    commands.push(Command::SetOpacity {
                        visual: VisualId::Silhouette,
                        alpha: lerp(0.0, OVERLAY_ALPHA, t),
                    });
                    // 振幅随进度衰减，段末为零
                    let offset = rng.unit_disk() * (SHAKE_RADIUS * (1.0 - t));
                    commands.push(Command::SetPosition {
                        visual: VisualId::Silhouette,
                        offset,
                    });
                }
                ChainEvent::Running
            }

            StageRun::Flash {
                repetition,
                total,
                part,
                timer,
            } => {
                match part {
                    FlashPart::Pulse => {
                        if timer.advance(dt) {
                            commands.push(Command::SetOpacity {
                                visual: VisualId::FlashOverlay,
                                alpha: 0.0,
                            });
                            *part = FlashPart::Gap;
                            *timer = StageTimer::new(FLASH_GAP_SECS);
                        } else {
                            commands.push(Command::SetOpacity {
                                visual: VisualId::FlashOverlay,
                                alpha: triangle_pulse(timer.progress()),
                            });
                        }
                    }
                    FlashPart::Gap => {
                        // 设计的纯等待段，不发出任何指令
                        if timer.advance(dt) {
                            *repetition += 1;
                            if repetition < total {
                                *part = FlashPart::Pulse;
                                *timer = StageTimer::new(FLASH_PULSE_SECS);
                            } else {
                                if let Some(tint) = self.tier.charge_tint() {
                                    commands.push(Command::SetTint {
                                        visual: VisualId::ChargeGlyph,
                                        color: tint,
                                    });
                                }
                                self.leave_flash(config, commands);
                            }
                        }
                    }
                }
                ChainEvent::Running
            }

            StageRun::CanvasZoom { part, timer } => {
                match part {
                    ZoomPart::In => {
                        if timer.advance(dt) {
                            commands.push(Command::SetScale {
                                visual: VisualId::ZoomRoot,
                                scale: Vec2::splat(ZOOM_SCALE),
                            });
                            *part = ZoomPart::Hold;
                            *timer = StageTimer::new(ZOOM_HOLD_SECS);
                        } else {
                            commands.push(Command::SetScale {
                                visual: VisualId::ZoomRoot,
                                scale: Vec2::splat(lerp(1.0, ZOOM_SCALE, timer.progress())),
                            });
                        }
                    }
                    ZoomPart::Hold => {
                        if timer.advance(dt) {
                            *part = ZoomPart::Out;
                            *timer = StageTimer::new(ZOOM_LEG_SECS);
                        }
                    }
                    ZoomPart::Out => {
                        if timer.advance(dt) {
                            commands.push(Command::SetScale {
                                visual: VisualId::ZoomRoot,
                                scale: Vec2::splat(1.0),
                            });
                            self.enter_reveal_apply(config, commands);
                        } else {
                            commands.push(Command::SetScale {
                                visual: VisualId::ZoomRoot,
                                scale: Vec2::splat(lerp(ZOOM_SCALE, 1.0, timer.progress())),
                            });
                        }
                    }
                }
                ChainEvent::Running
            }

            StageRun::RevealApply { timer } => {
                // 入口指令已发出；零时长段在下一帧越过边界
                if timer.advance(dt) {
                    self.enter_after_apply(config, commands);
                }
                ChainEvent::Running
            }

            StageRun::GlowFadeIn { timer } => {
                if timer.advance(dt) {
                    commands.push(Command::SetOpacity {
                        visual: VisualId::ResultGlow,
                        alpha: 1.0,
                    });
                    self.enter_silhouette_fade_out();
                } else {
                    commands.push(Command::SetOpacity {
                        visual: VisualId::ResultGlow,
                        alpha: lerp(0.0, 1.0, timer.progress()),
                    });
                }
                ChainEvent::Running
            }

            StageRun::SilhouetteFadeOut { timer } => {
                if timer.advance(dt) {
                    commands.push(Command::SetOpacity {
                        visual: VisualId::Silhouette,
                        alpha: 0.0,
                    });
                    self.enter_result_reveal(commands);
                } else {
                    commands.push(Command::SetOpacity {
                        visual: VisualId::Silhouette,
                        alpha: lerp(OVERLAY_ALPHA, 0.0, timer.progress()),
                    });
                }
                ChainEvent::Running
            }

            StageRun::ResultReveal { timer } => {
                if timer.advance(dt) {
                    commands.push(Command::SetScale {
                        visual: VisualId::ResultImage,
                        scale: Vec2::splat(RESULT_SCALE_TO),
                    });
                    commands.push(Command::SetOpacity {
                        visual: VisualId::ResultImage,
                        alpha: 1.0,
                    });
                    if let Some(clip) = &config.sounds.reveal {
                        commands.push(Command::PlaySfx { clip: clip.clone() });
                    }
                    if let Some(profile) = &config.star_particle {
                        commands.push(Command::SpawnParticleBurst {
                            profile: profile.clone(),
                            tint: self.tier.star_tint(),
                        });
                    }
                    self.stage = StageRun::ButtonsFadeIn {
                        part: ButtonPart::Delay,
                        timer: StageTimer::new(BUTTON_DELAY_SECS),
                    };
                } else {
                    let t = timer.progress();
                    commands.push(Command::SetScale {
                        visual: VisualId::ResultImage,
                        scale: Vec2::splat(smoothstep(RESULT_SCALE_FROM, RESULT_SCALE_TO, t)),
                    });
                    commands.push(Command::SetOpacity {
                        visual: VisualId::ResultImage,
                        alpha: lerp(0.0, 1.0, t),
                    });
                }
                ChainEvent::Running
            }

            StageRun::ButtonsFadeIn { part, timer } => {
                match part {
                    ButtonPart::Delay => {
                        // 设计的纯等待段
                        if timer.advance(dt) {
                            *part = ButtonPart::Fade;
                            *timer = StageTimer::new(BUTTON_FADE_SECS);
                        }
                        ChainEvent::Running
                    }
                    ButtonPart::Fade => {
                        if timer.advance(dt) {
                            commands.push(Command::SetOpacity {
                                visual: VisualId::ResultPanel,
                                alpha: 1.0,
                            });
                            // 可交互性是 t=1 处的阶跃，不做插值
                            commands.push(Command::SetInteractable {
                                control: ControlId::ResultPanel,
                                interactable: true,
                            });
                            ChainEvent::Completed
                        } else {
                            commands.push(Command::SetOpacity {
                                visual: VisualId::ResultPanel,
                                alpha: lerp(0.0, 1.0, timer.progress()),
                            });
                            ChainEvent::Running
                        }
                    }
                }
            }
        }
    }

    // ── 阶段转换（入口指令在这里发出） ──

    fn enter_energy_charge(&mut self, config: &RevealConfig, commands: &mut Vec<Command>) {
        if let Some(clip) = &config.sounds.charge {
            commands.push(Command::PlaySfx { clip: clip.clone() });
        }
        self.stage = StageRun::EnergyCharge {
            timer: StageTimer::new(CHARGE_SECS),
        };
    }

    fn enter_silhouette_shake(&mut self, config: &RevealConfig, commands: &mut Vec<Command>) {
        if let Some(clip) = &config.sounds.shake {
            commands.push(Command::PlaySfx { clip: clip.clone() });
        }
        self.stage = StageRun::SilhouetteShake {
            timer: StageTimer::new(SHAKE_SECS),
        };
    }

    fn enter_flash(&mut self) {
        self.stage = StageRun::Flash {
            repetition: 0,
            total: self.tier.flash_count(),
            part: FlashPart::Pulse,
            timer: StageTimer::new(FLASH_PULSE_SECS),
        };
    }

    /// 闪光结束后按等级分支：史诗/传说先缩放，其余直接应用效果
    fn leave_flash(&mut self, config: &RevealConfig, commands: &mut Vec<Command>) {
        if self.tier.zooms() {
            self.stage = StageRun::CanvasZoom {
                part: ZoomPart::In,
                timer: StageTimer::new(ZOOM_LEG_SECS),
            };
        } else {
            self.enter_reveal_apply(config, commands);
        }
    }

    /// 进入 RevealApply：查表并一次性应用等级效果
    fn enter_reveal_apply(&mut self, config: &RevealConfig, commands: &mut Vec<Command>) {
        self.stage = StageRun::RevealApply {
            timer: StageTimer::new(0.0),
        };
        self.apply_tier_effects(config, commands);
    }

    /// 等级效果应用（瞬时段的入口指令）
    fn apply_tier_effects(&self, config: &RevealConfig, commands: &mut Vec<Command>) {
        let profile = config.profiles.get(self.tier);

        commands.push(Command::SetSprite {
            visual: VisualId::Background,
            sprite: config.backgrounds.get(self.tier).clone(),
        });
        if config.has_glow {
            commands.push(Command::SetTint {
                visual: VisualId::ResultGlow,
                color: profile.glow_color,
            });
        }
        if let Some(particle) = &profile.particle_profile {
            commands.push(Command::SpawnParticleBurst {
                profile: particle.clone(),
                tint: profile.glow_color,
            });
        }
        if let Some(clip) = &profile.sfx {
            commands.push(Command::PlaySfx { clip: clip.clone() });
        }
    }

    fn enter_after_apply(&mut self, config: &RevealConfig, commands: &mut Vec<Command>) {
        if config.has_glow {
            // 光晕从全透明开始渐入
            commands.push(Command::SetOpacity {
                visual: VisualId::ResultGlow,
                alpha: 0.0,
            });
            self.stage = StageRun::GlowFadeIn {
                timer: StageTimer::new(GLOW_FADE_SECS),
            };
        } else {
            self.enter_silhouette_fade_out();
        }
    }

    fn enter_silhouette_fade_out(&mut self) {
        self.stage = StageRun::SilhouetteFadeOut {
            timer: StageTimer::new(SILHOUETTE_FADE_SECS),
        };
    }

    fn enter_result_reveal(&mut self, commands: &mut Vec<Command>) {
        // 结果图从透明、半尺寸开始
        commands.push(Command::SetOpacity {
            visual: VisualId::ResultImage,
            alpha: 0.0,
        });
        commands.push(Command::SetScale {
            visual: VisualId::ResultImage,
            scale: Vec2::splat(RESULT_SCALE_FROM),
        });
        self.stage = StageRun::ResultReveal {
            timer: StageTimer::new(RESULT_REVEAL_SECS),
        };
    }
}
