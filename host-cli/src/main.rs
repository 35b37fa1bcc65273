//! # nav-replay
//!
//! 页面过渡的无头回放工具：不启动浏览器，按轨迹驱动 Runtime 并打印结果。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p host-cli -- replay trace.json
//! cargo run -p host-cli -- replay trace.json --config page-transitions.json --policy blocking
//! cargo run -p host-cli -- replay trace.json --json
//! cargo run -p host-cli -- check-config page-transitions.json
//! cargo run -p host-cli -- defaults
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use host_cli::{load_config, load_trace, render_text, replay};
use nav_runtime::{InterceptPolicy, TransitionConfig};
use tracing::{Level, info};

#[derive(Parser)]
#[command(name = "nav-replay")]
#[command(about = "页面过渡无头回放工具")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 输出更详细的日志（可重复：-v debug，-vv trace）
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// 回放事件轨迹
    Replay {
        /// 轨迹文件（JSON）
        trace: PathBuf,

        /// 配置文件（JSON，缺省使用默认配置）
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// 覆盖配置中的拦截策略
        #[arg(short, long)]
        policy: Option<PolicyArg>,

        /// 以 JSON 输出回放报告
        #[arg(long)]
        json: bool,
    },

    /// 验证配置文件
    CheckConfig {
        /// 配置文件（JSON）
        config: PathBuf,
    },

    /// 打印默认配置
    Defaults,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    NonBlocking,
    Blocking,
}

impl From<PolicyArg> for InterceptPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::NonBlocking => InterceptPolicy::NonBlocking,
            PolicyArg::Blocking => InterceptPolicy::Blocking,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("nav-replay error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Replay {
            trace,
            config,
            policy,
            json,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(policy) = policy {
                config.policy = policy.into();
            }
            let trace = load_trace(&trace)?;
            info!(steps = trace.steps.len(), policy = ?config.policy, "开始回放");

            let report = replay(&trace, config);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_text(&report));
            }
        }
        Commands::CheckConfig { config } => {
            let config = load_config(Some(config.as_path()))?;
            println!("配置有效（策略: {:?}）", config.policy);
        }
        Commands::Defaults => {
            println!(
                "{}",
                serde_json::to_string_pretty(&TransitionConfig::default())?
            );
        }
    }

    Ok(())
}
