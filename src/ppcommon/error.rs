use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Report error: {0}")]
    ReportError(String),

    #[error("Operation cancelled by shutdown signal")]
    Cancelled,
}

impl AppError {
    /// 获取错误类型的简洁摘要，作为日志字段 `error.summary` 的稳定取值
    pub fn get_error_type_summary(&self) -> &'static str {
        match self {
            // 交易数据获取
            AppError::ProviderError(_) => "trade_data_acquisition_failed",
            AppError::HttpError(_) => "trade_provider_connection_failed",
            AppError::JsonError(_) => "trade_data_parsing_failed",

            // 报表生成与落盘
            AppError::CsvError(_) => "position_report_render_failed",
            AppError::ReportError(_) => "position_report_invalid",
            AppError::IoError(_) => "position_report_file_operation_failed",

            AppError::ConfigError(_) => "worker_configuration_invalid",

            AppError::Cancelled => "shutdown_requested",
        }
    }

    /// 检查错误是否为可重试类型
    ///
    /// 仅作诊断参考：弹性获取器对除取消以外的所有错误一律重试
    pub fn is_retryable(&self) -> bool {
        match self {
            // 网络和数据源错误通常是暂时的
            AppError::ProviderError(_) |
            AppError::HttpError(_) |
            AppError::IoError(_) => true,

            AppError::JsonError(_) |
            AppError::CsvError(_) |
            AppError::ConfigError(_) |
            AppError::ReportError(_) => false,

            // 关闭信号不是故障，不重试
            AppError::Cancelled => false,
        }
    }

    /// 是否由关闭信号触发
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
