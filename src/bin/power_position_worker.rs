// 电力头寸提取服务主程序 - 定时提取交易并生成小时头寸报表
use power_position::ppcommon::{build_power_service, init_logging, WorkerConfig};
use power_position::ppextract::{ExtractionCycle, ResilientFetcher, Scheduler};

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::watch;
use tracing::{error, info};

/// 命令行参数
#[derive(Debug, Parser)]
#[command(name = "power_position_worker", about = "定时提取电力交易并生成小时头寸报表")]
struct Args {
    /// 配置文件路径，未指定时依次使用 CONFIG_PATH 环境变量和默认路径
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 配置错误在启动阶段直接终止进程
    let config_path = WorkerConfig::resolve_path(args.config);
    let config = WorkerConfig::from_file(&config_path)
        .with_context(|| format!("加载配置文件失败: {}", config_path.display()))?;

    // 持有 guard，直到 main 函数结束，确保日志被完整写出
    let _log_guard = init_logging(&config.logging).context("初始化日志系统失败")?;

    info!(target: "应用生命周期", config_path = %config_path.display(), "配置加载完成");

    run_app(config).await
}

/// 应用程序的核心业务逻辑
async fn run_app(config: WorkerConfig) -> anyhow::Result<()> {
    let interval = config.schedule_interval()?;

    let power_service = build_power_service(&config.provider)?;
    let fetcher = ResilientFetcher::new(power_service);
    let cycle = ExtractionCycle::from_config(fetcher, &config);

    info!(
        target: "应用生命周期",
        output_dir = %cycle.output_dir().display(),
        "报表输出目录已确定"
    );

    let scheduler = Scheduler::new(cycle, interval)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler_handle = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

    tokio::signal::ctrl_c().await.context("监听关闭信号失败")?;
    info!(target: "应用生命周期", reason = "received_ctrl_c", "接收到关闭信号，开始优雅关闭");

    let _ = shutdown_tx.send(true);

    match scheduler_handle.await {
        Ok(cycles) => {
            info!(target: "应用生命周期", cycles, "服务已停止");
            Ok(())
        }
        Err(e) => {
            error!(target: "应用生命周期", error = %e, "调度任务异常退出");
            Err(e.into())
        }
    }
}
