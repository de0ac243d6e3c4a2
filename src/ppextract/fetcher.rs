//! 弹性交易获取器
//!
//! 在数据源调用外面包一层有界重试和指数退避。
//! 不区分错误类型，任何失败都视为可能是暂时的；重试耗尽后原样返回最后一个错误。

use crate::ppcommon::{is_shutdown, wait_for_shutdown, AppError, PowerService, PowerTrade, Result};
use chrono::NaiveDate;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn, Instrument};

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// 总尝试次数（含首次调用）
    pub max_attempts: u32,
    /// 第一次重试前的等待时间
    pub base_delay: Duration,
    /// 每次重试的等待时间倍数
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    /// 3次尝试，2秒起步，每次翻倍（2s、4s）
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// 第 `retry` 次重试（从1开始）之前的等待时间
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1) as i32;
        self.base_delay.mul_f64(self.multiplier.powi(exponent))
    }
}

/// 带重试的交易获取器
pub struct ResilientFetcher<P> {
    inner: P,
    policy: RetryPolicy,
}

impl<P: PowerService> ResilientFetcher<P> {
    /// 使用默认重试策略
    pub fn new(inner: P) -> Self {
        Self::with_policy(inner, RetryPolicy::default())
    }

    pub fn with_policy(inner: P, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// 获取指定日期的交易
    ///
    /// 关闭信号在每次尝试前、调用进行中以及退避等待期间都会被检查，
    /// 一旦观察到立即返回 [`AppError::Cancelled`]，不再继续尝试。
    /// `Cancelled` 专用于关闭信号，数据源返回它时同样原样透传、不重试。
    pub async fn fetch(&self, date: NaiveDate, shutdown_rx: &watch::Receiver<bool>) -> Result<Vec<PowerTrade>> {
        let mut shutdown_rx = shutdown_rx.clone();
        let max_attempts = self.policy.max_attempts.max(1);

        // 为重试循环创建专用的Span
        let retry_loop_span = tracing::info_span!(
            "trade_fetch_retry_loop",
            %date,
            max_attempts,
            base_delay_ms = self.policy.base_delay.as_millis() as u64
        );

        async move {
            let mut attempt: u32 = 1;

            loop {
                if is_shutdown(&shutdown_rx) {
                    info!(target: "弹性获取", attempt, "已收到关闭信号，放弃获取交易");
                    return Err(AppError::Cancelled);
                }

                debug!(target: "弹性获取", attempt, max_attempts, "调用数据源获取交易");

                let outcome = tokio::select! {
                    biased;
                    _ = wait_for_shutdown(&mut shutdown_rx) => {
                        info!(target: "弹性获取", attempt, "数据源调用期间收到关闭信号");
                        return Err(AppError::Cancelled);
                    }
                    result = self.inner.get_trades(date) => result,
                };

                let e = match outcome {
                    Ok(trades) => {
                        if attempt > 1 {
                            info!(target: "弹性获取", attempt, trade_count = trades.len(), "重试后获取交易成功");
                        }
                        return Ok(trades);
                    }
                    Err(e) if e.is_cancelled() => return Err(e),
                    Err(e) => e,
                };

                if attempt >= max_attempts {
                    error!(
                        target: "弹性获取",
                        attempt,
                        error.summary = e.get_error_type_summary(),
                        error.details = %e,
                        "获取交易失败，已尝试{}次",
                        attempt
                    );
                    return Err(e);
                }

                let delay = self.policy.delay_for_retry(attempt);
                warn!(
                    target: "弹性获取",
                    retry = attempt,
                    delay_ms = delay.as_millis() as u64,
                    error.summary = e.get_error_type_summary(),
                    error.details = %e,
                    "第 {} 次重试，触发错误: {}，等待 {}ms",
                    attempt,
                    e,
                    delay.as_millis()
                );

                tokio::select! {
                    biased;
                    _ = wait_for_shutdown(&mut shutdown_rx) => {
                        info!(target: "弹性获取", attempt, "退避等待期间收到关闭信号");
                        return Err(AppError::Cancelled);
                    }
                    _ = tokio::time::sleep(delay) => {}
                }

                attempt += 1;
            }
        }
        .instrument(retry_loop_span)
        .await
    }
}
