//! 电力头寸提取服务配置模块

use crate::ppcommon::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 系统配置常量
pub mod constants {
    /// 默认配置文件路径
    pub const DEFAULT_CONFIG_PATH: &str = "config/PowerPositionConfig.toml";

    /// 默认报表输出目录（相对于进程工作目录）
    pub const DEFAULT_OUTPUT_DIRECTORY: &str = "output";

    /// 默认HTTP请求超时（秒）
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    /// 默认日志目录
    pub const DEFAULT_LOG_DIR: &str = "logs";
}

use constants::*;

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    DEFAULT_LOG_DIR.to_string()
}

/// 默认启用控制台输出
fn default_enable_console_output() -> bool {
    true
}

/// 服务总配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// 提取任务配置
    pub power_position: PowerPositionConfig,

    /// 交易数据源配置
    pub provider: ProviderConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 提取任务配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerPositionConfig {
    /// 报表输出目录，未配置时使用 `./output`
    #[serde(default)]
    pub output_directory: Option<String>,

    /// 调度间隔（分钟），必须配置且大于0
    #[serde(default)]
    pub schedule_interval_minutes: Option<f64>,
}

/// 交易数据源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProviderConfig {
    /// HTTP/JSON 数据源
    Http {
        base_url: String,
        #[serde(default = "default_request_timeout_secs")]
        request_timeout_secs: u64,
    },
    /// 本地JSON文件数据源
    File { path: String },
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)，RUST_LOG 优先
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// 日志文件目录
    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// 是否同时输出到控制台
    #[serde(default = "default_enable_console_output")]
    pub enable_console_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            enable_console_output: default_enable_console_output(),
        }
    }
}

impl WorkerConfig {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::ConfigError(format!("读取配置文件 {} 失败: {}", path.display(), e))
        })?;

        Self::from_toml_str(&content)
    }

    /// 从TOML文本解析配置并校验
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::ConfigError(format!("解析配置文件失败: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// 按优先级确定配置文件路径：命令行参数 > CONFIG_PATH 环境变量 > 默认路径
    pub fn resolve_path(cli_path: Option<PathBuf>) -> PathBuf {
        cli_path
            .or_else(|| std::env::var("CONFIG_PATH").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        self.schedule_interval()?;

        if let Some(dir) = &self.power_position.output_directory {
            if dir.trim().is_empty() {
                return Err(AppError::ConfigError("输出目录不能为空字符串".to_string()));
            }
        }

        match &self.provider {
            ProviderConfig::Http { base_url, request_timeout_secs } => {
                if base_url.trim().is_empty() {
                    return Err(AppError::ConfigError("数据源 base_url 不能为空".to_string()));
                }
                if *request_timeout_secs == 0 {
                    return Err(AppError::ConfigError("数据源请求超时必须大于0".to_string()));
                }
            }
            ProviderConfig::File { path } => {
                if path.trim().is_empty() {
                    return Err(AppError::ConfigError("数据源文件路径不能为空".to_string()));
                }
            }
        }

        Ok(())
    }

    /// 调度间隔
    pub fn schedule_interval(&self) -> Result<Duration> {
        let minutes = self.power_position.schedule_interval_minutes.ok_or_else(|| {
            AppError::ConfigError("必须配置 power_position.schedule_interval_minutes".to_string())
        })?;

        if !minutes.is_finite() || minutes <= 0.0 {
            return Err(AppError::ConfigError(format!(
                "调度间隔必须为正数，当前值: {}",
                minutes
            )));
        }

        Duration::try_from_secs_f64(minutes * 60.0)
            .map_err(|e| AppError::ConfigError(format!("调度间隔超出范围 {}: {}", minutes, e)))
    }

    /// 报表输出目录，未配置时回退到 `./output`
    pub fn output_dir(&self) -> PathBuf {
        self.power_position
            .output_directory
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".").join(DEFAULT_OUTPUT_DIRECTORY))
    }
}
