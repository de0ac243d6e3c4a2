//! 统一日志系统初始化模块
//!
//! 文件日志按天滚动并通过非阻塞写入器落盘，控制台输出可选。

use crate::ppcommon::{AppError, LoggingConfig, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// 日志文件名前缀
const LOG_FILE_PREFIX: &str = "power_position.log";

/// 构造业务日志过滤器字符串，压低第三方库噪音
pub fn business_filter(log_level: &str) -> String {
    format!("{},hyper=warn,reqwest=warn", log_level)
}

/// 初始化日志系统
///
/// 返回的 guard 必须由 main 函数持有到进程结束，否则缓冲中的日志会丢失。
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.log_dir).map_err(|e| {
        AppError::ConfigError(format!("无法创建日志目录 {}: {}", config.log_dir, e))
    })?;

    // RUST_LOG 优先于配置文件
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone());
    let filter_str = business_filter(&log_level);

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_filter(EnvFilter::new(&filter_str));

    let console_layer = config.enable_console_output.then(|| {
        fmt::layer()
            .with_target(true)
            .with_filter(EnvFilter::new(&filter_str))
    });

    Registry::default()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| AppError::ConfigError(format!("日志系统初始化失败: {}", e)))?;

    eprintln!("日志系统初始化完成，日志目录: {}", config.log_dir);
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_filter_keeps_level_and_quiets_http_stack() {
        assert_eq!(business_filter("debug"), "debug,hyper=warn,reqwest=warn");
    }
}
