//! # Host CLI
//!
//! 无头（headless）宿主 - 在终端以固定步长驱动 gacha-runtime，
//! 把指令流打到日志，用于调试演出逻辑与配置。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p host-cli
//! cargo run -p host-cli -- --seed 42
//! cargo run -p host-cli -- --config reveal.json --fps 30 --idle-secs 5
//! cargo run -p host-cli -- --retry
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use gacha_runtime::{
    Color, Command, GachaRuntime, Phase, RandomSource, RevealConfig, SoundSet, TierEffectProfile,
    TierTable, seeded_source, thread_source,
};

#[derive(Parser)]
#[command(name = "host-cli")]
#[command(about = "无头宿主 - 驱动一轮抽取演出并打印指令流")]
#[command(version)]
struct Cli {
    /// 演出配置文件（JSON）；缺省使用内置演示配置
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 随机种子；缺省使用系统随机源
    #[arg(short, long)]
    seed: Option<u64>,

    /// 模拟帧率
    #[arg(long, default_value = "60.0")]
    fps: f32,

    /// 进入待机循环后继续模拟的秒数
    #[arg(long, default_value = "3.0")]
    idle_secs: f32,

    /// 主链进行到一半时重抽一次
    #[arg(long)]
    retry: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            info!("加载配置: {}", path.display());
            let content = fs::read_to_string(path)
                .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("解析配置文件失败: {}", path.display()))?
        }
        None => {
            info!("使用内置演示配置");
            demo_config()
        }
    };

    let rng: Box<dyn RandomSource> = match cli.seed {
        Some(seed) => {
            info!("随机种子: {seed}");
            Box::new(seeded_source(seed))
        }
        None => Box::new(thread_source()),
    };

    let mut runtime = GachaRuntime::new(config, rng).context("创建引擎失败")?;
    let dt = 1.0 / cli.fps.max(1.0);

    info!("触发抽取");
    execute(runtime.on_trigger()?);
    let outcome = runtime
        .outcome()
        .context("触发后应持有抽取结果")?;
    info!("抽取结果: {:?}（奖励 #{}）", outcome.tier, outcome.item_index);

    // 驱动主链；可选在中途重抽一次
    let mut retry_pending = cli.retry;
    let mut frame = 0u32;
    while matches!(runtime.phase(), Phase::Chain { .. }) {
        if retry_pending && frame as f32 * dt >= 2.0 {
            retry_pending = false;
            info!("中途重抽");
            execute(runtime.on_retry()?);
            let outcome = runtime.outcome().context("重抽后应持有抽取结果")?;
            info!("新结果: {:?}（奖励 #{}）", outcome.tier, outcome.item_index);
        }

        let phase_before = runtime.phase();
        execute(runtime.tick(dt));
        let phase_after = runtime.phase();
        if phase_before != phase_after {
            info!("相位转换: {phase_before:?} -> {phase_after:?}");
        }

        frame += 1;
        if frame > 100_000 {
            anyhow::bail!("主链未收敛（帧数超限）");
        }
    }

    // 待机循环
    if runtime.phase() == Phase::IdlePulse {
        info!("待机循环 {} 秒", cli.idle_secs);
        let idle_frames = (cli.idle_secs / dt).ceil() as u32;
        for _ in 0..idle_frames {
            execute(runtime.tick(dt));
        }
    }

    info!("确认结果");
    execute(runtime.on_confirm());
    info!("演出结束，共模拟 {frame} 帧");

    Ok(())
}

/// "执行"指令：无头宿主只把指令打到日志
fn execute(commands: Vec<Command>) {
    for command in commands {
        debug!("指令: {command:?}");
    }
}

/// 内置演示配置（资源引用是占位路径，无头宿主不加载它们）
fn demo_config() -> RevealConfig {
    RevealConfig {
        catalog: vec![
            "items/sword.png".to_string(),
            "items/shield.png".to_string(),
            "items/staff.png".to_string(),
            "items/ring.png".to_string(),
        ],
        profiles: TierTable {
            common: TierEffectProfile {
                glow_color: Color::WHITE,
                particle_profile: Some("fx/burst_common".to_string()),
                sfx: Some("sfx/tier_common.ogg".to_string()),
            },
            rare: TierEffectProfile {
                glow_color: Color::rgb(0.2, 0.4, 1.0),
                particle_profile: Some("fx/burst_rare".to_string()),
                sfx: Some("sfx/tier_rare.ogg".to_string()),
            },
            epic: TierEffectProfile {
                glow_color: Color::rgb(0.6, 0.1, 0.9),
                particle_profile: Some("fx/burst_epic".to_string()),
                sfx: Some("sfx/tier_epic.ogg".to_string()),
            },
            legendary: TierEffectProfile {
                glow_color: Color::rgb(1.0, 0.45, 0.0),
                particle_profile: Some("fx/burst_legendary".to_string()),
                sfx: Some("sfx/tier_legendary.ogg".to_string()),
            },
        },
        backgrounds: TierTable {
            common: "bg/normal.png".to_string(),
            rare: "bg/rare.png".to_string(),
            epic: "bg/epic.png".to_string(),
            legendary: "bg/legendary.png".to_string(),
        },
        default_background: "bg/default.png".to_string(),
        star_particle: Some("fx/star_burst".to_string()),
        sounds: SoundSet {
            click: Some("sfx/click.ogg".to_string()),
            charge: Some("sfx/charge.ogg".to_string()),
            shake: Some("sfx/shake.ogg".to_string()),
            reveal: Some("sfx/reveal.ogg".to_string()),
        },
        has_glow: true,
    }
}
