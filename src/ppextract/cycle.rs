//! 提取周期
//!
//! 一次完整的提取：获取交易 → 聚合 → 格式化 → 写入报表文件。

use super::aggregator::aggregate;
use super::fetcher::ResilientFetcher;
use super::report::{format_report, render_csv, report_file_name};
use crate::ppcommon::{is_shutdown, AppError, PowerService, Result, WorkerConfig};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{error, info};

/// 可被调度器驱动的提取周期
#[async_trait]
pub trait CycleRunner: Send + Sync {
    /// 对指定日期执行一次提取，成功时返回写入的报表路径
    async fn run_cycle(&self, date: NaiveDate, shutdown_rx: &watch::Receiver<bool>) -> Result<PathBuf>;
}

#[async_trait]
impl<T: CycleRunner + ?Sized> CycleRunner for Arc<T> {
    async fn run_cycle(&self, date: NaiveDate, shutdown_rx: &watch::Receiver<bool>) -> Result<PathBuf> {
        (**self).run_cycle(date, shutdown_rx).await
    }
}

/// 电力头寸提取周期
pub struct ExtractionCycle<P> {
    fetcher: ResilientFetcher<P>,
    output_dir: PathBuf,
}

impl<P: PowerService> ExtractionCycle<P> {
    pub fn new(fetcher: ResilientFetcher<P>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            output_dir: output_dir.into(),
        }
    }

    /// 使用配置中的输出目录（未配置时为 `./output`）
    pub fn from_config(fetcher: ResilientFetcher<P>, config: &WorkerConfig) -> Self {
        Self::new(fetcher, config.output_dir())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    async fn execute(
        &self,
        date: NaiveDate,
        shutdown_rx: &watch::Receiver<bool>,
        stopwatch: Instant,
    ) -> Result<PathBuf> {
        // 1. 获取交易
        let trades = self.fetcher.fetch(date, shutdown_rx).await?;
        info!(
            target: "提取周期",
            trade_count = trades.len(),
            elapsed_ms = stopwatch.elapsed().as_millis() as u64,
            "获取到 {} 笔交易",
            trades.len()
        );

        // 2. 聚合
        let volumes = aggregate(&trades);
        let total_volume = volumes.total();
        info!(
            target: "提取周期",
            total_volume,
            elapsed_ms = stopwatch.elapsed().as_millis() as u64,
            "聚合完成，当日总成交量: {}",
            total_volume
        );

        // 3. 格式化
        let rows = format_report(&volumes, date);
        let content = render_csv(&rows)?;

        // 4. 落盘
        ensure_output_dir(&self.output_dir).await?;
        let file_path = self.output_dir.join(report_file_name(Utc::now()));

        if is_shutdown(shutdown_rx) {
            info!(target: "提取周期", "写入报表前收到关闭信号，放弃本次写入");
            return Err(AppError::Cancelled);
        }

        write_report(&file_path, &content).await?;

        info!(
            target: "提取周期",
            file_path = %file_path.display(),
            elapsed_ms = stopwatch.elapsed().as_millis() as u64,
            "报表已生成: {}",
            file_path.display()
        );

        Ok(file_path)
    }
}

#[async_trait]
impl<P: PowerService> CycleRunner for ExtractionCycle<P> {
    async fn run_cycle(&self, date: NaiveDate, shutdown_rx: &watch::Receiver<bool>) -> Result<PathBuf> {
        info!(target: "提取周期", %date, "开始处理电力头寸提取");
        let stopwatch = Instant::now();

        match self.execute(date, shutdown_rx, stopwatch).await {
            Ok(path) => Ok(path),
            Err(e) if e.is_cancelled() => {
                info!(
                    target: "提取周期",
                    elapsed_ms = stopwatch.elapsed().as_millis() as u64,
                    "提取周期被关闭信号中止"
                );
                Err(e)
            }
            Err(e) => {
                error!(
                    target: "提取周期",
                    elapsed_ms = stopwatch.elapsed().as_millis() as u64,
                    error.summary = e.get_error_type_summary(),
                    error.details = %e,
                    "提取电力头寸失败"
                );
                Err(e)
            }
        }
    }
}

/// 确保输出目录存在
pub async fn ensure_output_dir(output_dir: &Path) -> Result<()> {
    if !output_dir.is_dir() {
        info!(target: "提取周期", output_dir = %output_dir.display(), "创建输出目录");
        tokio::fs::create_dir_all(output_dir).await?;
    }
    Ok(())
}

/// 写入报表，已存在的同名文件会被覆盖
///
/// 先写临时文件再重命名，目标文件不会出现半截内容。
pub async fn write_report(file_path: &Path, content: &str) -> Result<()> {
    let mut tmp_name = file_path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let written = match tokio::fs::write(&tmp_path, content.as_bytes()).await {
        Ok(()) => tokio::fs::rename(&tmp_path, file_path).await,
        Err(e) => Err(e),
    };

    if let Err(e) = written {
        // 写入或重命名失败都清理临时文件
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(e.into());
    }

    Ok(())
}
