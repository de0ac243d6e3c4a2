//! 提取调度器
//!
//! 启动后立即执行一次提取，之后按固定间隔触发。周期之间绝不重叠：
//! 上一个周期完全结束（无论成败）后才重新计时。

use super::cycle::CycleRunner;
use crate::ppcommon::{is_shutdown, wait_for_shutdown, AppError, Result};
use chrono::Local;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, instrument};

/// 单个周期结束后调度器的走向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleVerdict {
    /// 回到空闲状态，等待下一次触发
    Continue,
    /// 周期观察到关闭信号，调度器退出
    Stop,
}

pub struct Scheduler<R> {
    runner: R,
    interval: Duration,
}

impl<R: CycleRunner> Scheduler<R> {
    /// 创建调度器，间隔为0视为配置错误
    pub fn new(runner: R, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(AppError::ConfigError("调度间隔必须大于0".to_string()));
        }
        Ok(Self { runner, interval })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 运行调度循环直到收到关闭信号，返回启动过的周期数
    #[instrument(target = "调度器", skip_all, name = "power_position_scheduler")]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> u64 {
        info!(
            target: "调度器",
            interval_secs = self.interval.as_secs_f64(),
            "调度器启动，调度间隔 {:.2} 分钟",
            self.interval.as_secs_f64() / 60.0
        );

        let mut cycles: u64 = 0;

        if is_shutdown(&shutdown_rx) {
            info!(target: "调度器", "启动前已收到关闭信号");
            return cycles;
        }

        // 启动时立即执行一次
        if self.trigger_extraction(&shutdown_rx, &mut cycles).await == CycleVerdict::Stop {
            info!(target: "调度器", cycles, "调度器已停止");
            return cycles;
        }

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = wait_for_shutdown(&mut shutdown_rx) => {
                    info!(target: "调度器", "接收到关闭信号");
                    break;
                }
                _ = ticker.tick() => {
                    if self.trigger_extraction(&shutdown_rx, &mut cycles).await == CycleVerdict::Stop {
                        break;
                    }
                    // 周期结束后重新计时
                    ticker.reset();
                }
            }
        }

        info!(target: "调度器", cycles, "调度器已停止");
        cycles
    }

    async fn trigger_extraction(&self, shutdown_rx: &watch::Receiver<bool>, cycles: &mut u64) -> CycleVerdict {
        *cycles += 1;
        let date = Local::now().date_naive();
        info!(target: "调度器", cycle = *cycles, %date, "启动电力头寸提取...");

        match self.runner.run_cycle(date, shutdown_rx).await {
            Ok(path) => {
                info!(target: "调度器", cycle = *cycles, file_path = %path.display(), "提取成功完成");
                CycleVerdict::Continue
            }
            Err(e) if e.is_cancelled() => {
                info!(target: "调度器", cycle = *cycles, "提取因关闭信号中止");
                CycleVerdict::Stop
            }
            Err(e) => {
                // 周期失败不影响调度器，下一次触发照常进行
                error!(
                    target: "调度器",
                    cycle = *cycles,
                    error.summary = e.get_error_type_summary(),
                    error.details = %e,
                    "提取过程中发生错误"
                );
                CycleVerdict::Continue
            }
        }
    }
}
