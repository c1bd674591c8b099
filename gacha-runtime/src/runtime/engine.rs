//! # Engine 模块
//!
//! 抽取演出执行引擎与生命周期控制器。
//!
//! ## 执行模型
//!
//! ```text
//! on_trigger() / on_retry() / on_confirm() -> Vec<Command>   （入口点）
//! tick(dt)                                 -> Vec<Command>   （每帧驱动）
//! ```
//!
//! 单线程协作式调度：Host 每帧调用一次 `tick(dt)`，
//! 所有计时器由它推进。共享状态（当前结果、运行体）全部由引擎独占持有，
//! 取消即丢弃运行体，不存在抢占式中断。

use crate::command::{Color, Command, ControlId, Vec2, VisualId};
use crate::config::RevealConfig;
use crate::error::GachaResult;
use crate::outcome::{RollOutcome, roll};
use crate::random::RandomSource;
use crate::runtime::chain::{ChainEvent, ChainRun, RESULT_SCALE_FROM};
use crate::runtime::idle::IdlePulse;
use crate::state::{Phase, SequenceHandle};

/// 抽取演出执行引擎
///
/// 这是 gacha-runtime 的核心类型，负责驱动一轮抽取演出。
///
/// # 使用示例
///
/// ```ignore
/// let mut runtime = GachaRuntime::new(config, Box::new(thread_source()))?;
///
/// let commands = runtime.on_trigger()?;
/// host.execute(commands);
///
/// loop {
///     let commands = runtime.tick(frame_dt);
///     host.execute(commands);
/// }
/// ```
pub struct GachaRuntime {
    /// 演出配置（构造时已校验）
    config: RevealConfig,
    /// 注入的随机源
    rng: Box<dyn RandomSource>,
    /// 当前抽取结果（同一时刻至多一个）
    outcome: Option<RollOutcome>,
    /// 活跃的主演出链
    chain: Option<ChainRun>,
    /// 活跃的待机脉冲循环
    idle: Option<IdlePulse>,
    /// 链已完成且无待机循环（无光晕配置）
    settled: bool,
    /// 句柄分配计数
    next_handle: u64,
}

impl GachaRuntime {
    /// 创建引擎实例
    ///
    /// # 错误
    ///
    /// 配置校验失败时返回 [`crate::ConfigError`]。
    pub fn new(config: RevealConfig, rng: Box<dyn RandomSource>) -> GachaResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            outcome: None,
            chain: None,
            idle: None,
            settled: false,
            next_handle: 0,
        })
    }

    /// 用户触发抽取
    ///
    /// 仅在空闲（等待触发）时有效；演出运行中调用是无操作。
    pub fn on_trigger(&mut self) -> GachaResult<Vec<Command>> {
        if self.chain.is_some() || self.idle.is_some() || self.settled {
            return Ok(Vec::new());
        }

        let mut commands = Vec::new();
        if let Some(clip) = &self.config.sounds.click {
            commands.push(Command::PlaySfx { clip: clip.clone() });
        }
        self.begin_cycle(&mut commands)?;
        Ok(commands)
    }

    /// 重抽
    ///
    /// 取消所有在途阶段与待机循环，恢复基线，重新抽取并启动新链。
    /// 无运行体时调用等价于重置后直接开始。
    pub fn on_retry(&mut self) -> GachaResult<Vec<Command>> {
        let mut commands = Vec::new();
        if let Some(clip) = &self.config.sounds.click {
            commands.push(Command::PlaySfx { clip: clip.clone() });
        }
        self.cancel_all();
        self.push_baseline_reset(&mut commands);
        self.begin_cycle(&mut commands)?;
        Ok(commands)
    }

    /// 确认结果
    ///
    /// 取消所有运行体，恢复基线，重新启用触发控件。不抽取、不启动新链。
    /// 无运行体时调用是幂等的（只剩重置）。
    pub fn on_confirm(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        self.cancel_all();
        self.push_baseline_reset(&mut commands);
        commands.push(Command::SetInteractable {
            control: ControlId::TriggerButton,
            interactable: true,
        });
        self.outcome = None;
        commands
    }

    /// 核心驱动函数：推进所有活跃计时器一帧
    ///
    /// 主链完成时自动进入待机脉冲循环（有光晕配置时）。
    /// 没有活跃运行体时返回空指令集。
    pub fn tick(&mut self, dt: f32) -> Vec<Command> {
        let mut commands = Vec::new();

        if let Some(chain) = self.chain.as_mut() {
            match chain.tick(dt, &self.config, self.rng.as_mut(), &mut commands) {
                ChainEvent::Running => {}
                ChainEvent::Completed => {
                    self.chain = None;
                    if self.config.has_glow {
                        let handle = self.allocate_handle();
                        self.idle = Some(IdlePulse::new(handle));
                    } else {
                        self.settled = true;
                    }
                }
            }
        } else if let Some(idle) = self.idle.as_mut() {
            idle.tick(dt, &mut commands);
        }

        commands
    }

    /// 当前状态机相位
    pub fn phase(&self) -> Phase {
        if let Some(chain) = &self.chain {
            Phase::Chain {
                stage: chain.stage_id(),
            }
        } else if self.idle.is_some() {
            Phase::IdlePulse
        } else if self.settled {
            Phase::Settled
        } else {
            Phase::AwaitingTrigger
        }
    }

    /// 是否有运行体活跃
    pub fn is_running(&self) -> bool {
        self.phase().is_running()
    }

    /// 当前抽取结果
    pub fn outcome(&self) -> Option<RollOutcome> {
        self.outcome
    }

    /// 主链句柄（活跃时）
    pub fn chain_handle(&self) -> Option<SequenceHandle> {
        self.chain.as_ref().map(|c| c.handle())
    }

    /// 待机循环句柄（活跃时）
    pub fn idle_handle(&self) -> Option<SequenceHandle> {
        self.idle.as_ref().map(|i| i.handle())
    }

    /// 演出配置
    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    // ── 内部 ──

    /// 掷点、盖上结果精灵并启动新链
    fn begin_cycle(&mut self, commands: &mut Vec<Command>) -> GachaResult<()> {
        commands.push(Command::SetInteractable {
            control: ControlId::TriggerButton,
            interactable: false,
        });

        let outcome = roll(self.rng.as_mut(), self.config.catalog.len())?;
        let sprite = self.config.catalog[outcome.item_index].clone();

        commands.push(Command::SetSprite {
            visual: VisualId::ResultImage,
            sprite: sprite.clone(),
        });
        commands.push(Command::SetSprite {
            visual: VisualId::Silhouette,
            sprite,
        });
        // 剪影以全透明的纯黑开始
        commands.push(Command::SetTint {
            visual: VisualId::Silhouette,
            color: Color::rgba(0.0, 0.0, 0.0, 0.0),
        });

        self.outcome = Some(outcome);
        let handle = self.allocate_handle();
        self.chain = Some(ChainRun::new(handle, outcome.tier));
        Ok(())
    }

    /// 丢弃所有运行体（结构性取消：被丢弃的链/循环不可能再发出指令）
    fn cancel_all(&mut self) {
        self.chain = None;
        self.idle = None;
        self.settled = false;
    }

    /// 基线重置指令批：把所有视觉恢复到初始值
    ///
    /// 单点重置，避免分散的局部重置遗漏字段。
    fn push_baseline_reset(&self, commands: &mut Vec<Command>) {
        commands.push(Command::SetOpacity {
            visual: VisualId::FadeOverlay,
            alpha: 0.0,
        });
        commands.push(Command::SetTint {
            visual: VisualId::ChargeGlyph,
            color: Color::WHITE,
        });
        commands.push(Command::SetOpacity {
            visual: VisualId::ChargeGlyph,
            alpha: 0.0,
        });
        commands.push(Command::SetScale {
            visual: VisualId::ChargeGlyph,
            scale: Vec2::ZERO,
        });
        commands.push(Command::SetOpacity {
            visual: VisualId::Silhouette,
            alpha: 0.0,
        });
        commands.push(Command::SetPosition {
            visual: VisualId::Silhouette,
            offset: Vec2::ZERO,
        });
        commands.push(Command::SetOpacity {
            visual: VisualId::FlashOverlay,
            alpha: 0.0,
        });
        commands.push(Command::SetOpacity {
            visual: VisualId::ResultImage,
            alpha: 0.0,
        });
        commands.push(Command::SetScale {
            visual: VisualId::ResultImage,
            scale: Vec2::splat(RESULT_SCALE_FROM),
        });
        commands.push(Command::SetOpacity {
            visual: VisualId::ResultGlow,
            alpha: 0.0,
        });
        commands.push(Command::SetScale {
            visual: VisualId::ResultGlow,
            scale: Vec2::splat(1.0),
        });
        commands.push(Command::SetScale {
            visual: VisualId::ZoomRoot,
            scale: Vec2::splat(1.0),
        });
        commands.push(Command::SetSprite {
            visual: VisualId::Background,
            sprite: self.config.default_background.clone(),
        });
        commands.push(Command::ClearParticles);
        commands.push(Command::SetOpacity {
            visual: VisualId::ResultPanel,
            alpha: 0.0,
        });
        commands.push(Command::SetInteractable {
            control: ControlId::ResultPanel,
            interactable: false,
        });
    }

    fn allocate_handle(&mut self) -> SequenceHandle {
        self.next_handle += 1;
        SequenceHandle(self.next_handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::sample_config;
    use crate::outcome::Tier;
    use crate::random::ScriptedSource;
    use crate::state::StageId;

    const DT: f32 = 0.05;

    /// 主链是否已结束（进入待机循环 / 落定 / 回到待触发）
    fn chain_done(phase: Phase) -> bool {
        !matches!(phase, Phase::Chain { .. })
    }

    fn runtime_with_roll(roll_value: u32) -> GachaRuntime {
        let rng = ScriptedSource::new().with_rolls([roll_value]).with_indices([0]);
        GachaRuntime::new(sample_config(), Box::new(rng)).unwrap()
    }

    /// 驱动至相位满足谓词或超出帧数上限，返回全部指令
    fn drive_until(
        runtime: &mut GachaRuntime,
        max_ticks: usize,
        pred: impl Fn(Phase) -> bool,
    ) -> Vec<Command> {
        let mut commands = Vec::new();
        for _ in 0..max_ticks {
            commands.extend(runtime.tick(DT));
            if pred(runtime.phase()) {
                return commands;
            }
        }
        panic!("相位未在 {max_ticks} 帧内到达，当前 {:?}", runtime.phase());
    }

    /// 逐帧记录途经的阶段（去重相邻重复）
    fn visited_stages(runtime: &mut GachaRuntime, max_ticks: usize) -> Vec<StageId> {
        let mut stages = Vec::new();
        for _ in 0..max_ticks {
            runtime.tick(DT);
            if let Phase::Chain { stage } = runtime.phase() {
                if stages.last() != Some(&stage) {
                    stages.push(stage);
                }
            } else {
                break;
            }
        }
        stages
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = sample_config();
        config.catalog.clear();
        let result = GachaRuntime::new(config, Box::new(ScriptedSource::new()));
        assert!(result.is_err());
    }

    #[test]
    fn test_trigger_starts_chain() {
        let mut runtime = runtime_with_roll(10);
        assert_eq!(runtime.phase(), Phase::AwaitingTrigger);

        let commands = runtime.on_trigger().unwrap();

        // 点击音效、禁用触发控件、盖上结果/剪影精灵
        assert!(commands.iter().any(|c| matches!(c, Command::PlaySfx { .. })));
        assert!(commands.contains(&Command::SetInteractable {
            control: ControlId::TriggerButton,
            interactable: false,
        }));
        assert!(commands.iter().any(|c| matches!(
            c,
            Command::SetSprite { visual: VisualId::Silhouette, .. }
        )));

        assert_eq!(runtime.phase(), Phase::Chain { stage: StageId::FadeIn });
        assert_eq!(runtime.outcome().unwrap().tier, Tier::Common);
    }

    #[test]
    fn test_trigger_while_running_is_noop() {
        let mut runtime = runtime_with_roll(10);
        runtime.on_trigger().unwrap();

        let commands = runtime.on_trigger().unwrap();
        assert!(commands.is_empty());
    }

    #[test]
    fn test_tick_without_run_is_empty() {
        let mut runtime = runtime_with_roll(10);
        assert!(runtime.tick(DT).is_empty());
    }

    #[test]
    fn test_fade_in_interpolation() {
        let mut runtime = runtime_with_roll(10);
        runtime.on_trigger().unwrap();

        let commands = runtime.tick(0.5);
        assert_eq!(
            commands,
            vec![Command::SetOpacity {
                visual: VisualId::FadeOverlay,
                alpha: 0.85 * 0.5,
            }]
        );
    }

    #[test]
    fn test_common_path_skips_zoom() {
        let mut runtime = runtime_with_roll(10);
        runtime.on_trigger().unwrap();

        let stages = visited_stages(&mut runtime, 400);
        assert!(!stages.contains(&StageId::CanvasZoom));
        assert_eq!(
            stages,
            vec![
                StageId::FadeIn,
                StageId::EnergyCharge,
                StageId::SilhouetteShake,
                StageId::Flash,
                StageId::RevealApply,
                StageId::GlowFadeIn,
                StageId::SilhouetteFadeOut,
                StageId::ResultReveal,
                StageId::ButtonsFadeIn,
            ]
        );
    }

    #[test]
    fn test_legendary_path_includes_zoom() {
        let mut runtime = runtime_with_roll(80);
        runtime.on_trigger().unwrap();

        let stages = visited_stages(&mut runtime, 500);
        let zoom_at = stages.iter().position(|s| *s == StageId::CanvasZoom);
        let flash_at = stages.iter().position(|s| *s == StageId::Flash);
        assert!(zoom_at.is_some());
        assert!(flash_at.unwrap() < zoom_at.unwrap());
    }

    #[test]
    fn test_reveal_apply_effects_without_zoom() {
        // 无缩放分支也必须完整应用等级效果（背景、光晕着色、粒子、音效）
        for roll_value in [10u32, 30] {
            let mut runtime = runtime_with_roll(roll_value);
            runtime.on_trigger().unwrap();
            let tier = runtime.outcome().unwrap().tier;

            let config = sample_config();
            let profile = config.profiles.get(tier);
            let background = config.backgrounds.get(tier).clone();

            let commands = drive_until(&mut runtime, 400, chain_done);

            assert!(
                commands.contains(&Command::SetSprite {
                    visual: VisualId::Background,
                    sprite: background,
                }),
                "roll = {roll_value}"
            );
            assert!(commands.contains(&Command::SetTint {
                visual: VisualId::ResultGlow,
                color: profile.glow_color,
            }));
            assert!(commands.contains(&Command::SpawnParticleBurst {
                profile: profile.particle_profile.clone().unwrap(),
                tint: profile.glow_color,
            }));
            assert!(commands.contains(&Command::PlaySfx {
                clip: profile.sfx.clone().unwrap(),
            }));
        }
    }

    #[test]
    fn test_flash_count_by_tier() {
        for (roll_value, expected) in [(10, 1usize), (30, 2), (60, 3), (80, 4)] {
            let mut runtime = runtime_with_roll(roll_value);
            runtime.on_trigger().unwrap();
            let commands = drive_until(&mut runtime, 600, chain_done);

            // 每个脉冲结束恰好发出一次闪光清零
            let zero_flashes = commands
                .iter()
                .filter(|c| {
                    matches!(
                        c,
                        Command::SetOpacity { visual: VisualId::FlashOverlay, alpha } if *alpha == 0.0
                    )
                })
                .count();
            assert_eq!(zero_flashes, expected, "roll = {roll_value}");
        }
    }

    #[test]
    fn test_silhouette_snaps_back_to_anchor() {
        let mut runtime = runtime_with_roll(10);
        runtime.on_trigger().unwrap();

        let commands = drive_until(&mut runtime, 400, chain_done);

        // 最后一条剪影位置指令必须是精确的锚点
        let last_position = commands
            .iter()
            .rev()
            .find_map(|c| match c {
                Command::SetPosition { visual: VisualId::Silhouette, offset } => Some(*offset),
                _ => None,
            })
            .unwrap();
        assert_eq!(last_position, Vec2::ZERO);
    }

    #[test]
    fn test_chain_completion_enters_idle_pulse() {
        let mut runtime = runtime_with_roll(10);
        runtime.on_trigger().unwrap();

        drive_until(&mut runtime, 400, chain_done);
        assert_eq!(runtime.phase(), Phase::IdlePulse);
        assert!(runtime.chain_handle().is_none());
        assert!(runtime.idle_handle().is_some());

        // 待机循环的缩放始终在脉冲区间内
        for _ in 0..200 {
            for cmd in runtime.tick(DT) {
                if let Command::SetScale { visual: VisualId::ResultGlow, scale } = cmd {
                    assert!(scale.x >= 1.0 && scale.x <= 1.4);
                }
            }
        }
    }

    #[test]
    fn test_no_glow_settles_without_idle_loop() {
        let mut config = sample_config();
        config.has_glow = false;
        let rng = ScriptedSource::new().with_rolls([10]).with_indices([0]);
        let mut runtime = GachaRuntime::new(config, Box::new(rng)).unwrap();
        runtime.on_trigger().unwrap();

        drive_until(&mut runtime, 400, chain_done);
        assert_eq!(runtime.phase(), Phase::Settled);
        assert!(runtime.tick(DT).is_empty());
    }

    #[test]
    fn test_handles_are_distinct_per_run() {
        let mut runtime = runtime_with_roll(10);
        runtime.on_trigger().unwrap();
        let first_chain = runtime.chain_handle().unwrap();

        drive_until(&mut runtime, 400, chain_done);
        let idle = runtime.idle_handle().unwrap();
        assert_ne!(first_chain, idle);

        runtime.on_retry().unwrap();
        let second_chain = runtime.chain_handle().unwrap();
        assert_ne!(first_chain, second_chain);
        assert_ne!(idle, second_chain);
    }

    #[test]
    fn test_retry_mid_chain_resets_then_restarts() {
        let mut runtime = runtime_with_roll(10);
        runtime.on_trigger().unwrap();
        runtime.tick(0.5); // FadeIn 进行到一半

        let rng_exhausted_roll = 0; // ScriptedSource 耗尽后回退为 0 → 普通
        let commands = runtime.on_retry().unwrap();

        // 基线重置先于新链：渐暗遮罩清零出现在重置批中
        assert!(commands.contains(&Command::SetOpacity {
            visual: VisualId::FadeOverlay,
            alpha: 0.0,
        }));
        assert!(commands.contains(&Command::ClearParticles));

        // 新链从 t=0 开始
        assert_eq!(runtime.phase(), Phase::Chain { stage: StageId::FadeIn });
        assert_eq!(runtime.outcome().unwrap().tier, Tier::from_percent(rng_exhausted_roll));

        let first_frame = runtime.tick(0.1);
        assert_eq!(
            first_frame,
            vec![Command::SetOpacity {
                visual: VisualId::FadeOverlay,
                alpha: 0.85 * 0.1,
            }]
        );
    }

    #[test]
    fn test_confirm_after_idle_stops_loop_without_roll() {
        let mut runtime = runtime_with_roll(10);
        runtime.on_trigger().unwrap();
        drive_until(&mut runtime, 400, chain_done);

        // 待机循环运行 10 秒
        for _ in 0..100 {
            runtime.tick(0.1);
        }
        assert_eq!(runtime.phase(), Phase::IdlePulse);

        let commands = runtime.on_confirm();
        assert!(commands.contains(&Command::SetInteractable {
            control: ControlId::TriggerButton,
            interactable: true,
        }));

        // 循环已停止、结果已丢弃、无新抽取
        assert_eq!(runtime.phase(), Phase::AwaitingTrigger);
        assert_eq!(runtime.outcome(), None);
        assert!(runtime.tick(DT).is_empty());
    }

    #[test]
    fn test_confirm_when_nothing_runs_is_idempotent() {
        let mut runtime = runtime_with_roll(10);

        let first = runtime.on_confirm();
        let second = runtime.on_confirm();
        assert_eq!(first, second);
        assert_eq!(runtime.phase(), Phase::AwaitingTrigger);
    }
}
