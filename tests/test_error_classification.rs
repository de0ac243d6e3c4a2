//! 测试错误分类系统
//!
//! 验证AppError的get_error_type_summary()方法是否正确工作

use power_position::ppcommon::AppError;

#[test]
fn test_provider_error_classification() {
    let error = AppError::ProviderError("连接超时".to_string());
    assert_eq!(error.get_error_type_summary(), "trade_data_acquisition_failed");
    assert!(error.is_retryable());
    assert!(!error.is_cancelled());
}

#[test]
fn test_json_error_classification() {
    // 创建一个简单的JSON解析错误
    let json_error = serde_json::from_str::<serde_json::Value>("{invalid_json").unwrap_err();
    let error = AppError::JsonError(json_error);
    assert_eq!(error.get_error_type_summary(), "trade_data_parsing_failed");
    assert!(!error.is_retryable()); // 解析错误不应重试
}

#[test]
fn test_io_error_classification() {
    let error: AppError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "拒绝访问").into();
    assert_eq!(error.get_error_type_summary(), "position_report_file_operation_failed");
    assert!(error.is_retryable());
}

#[test]
fn test_config_error_classification() {
    let error = AppError::ConfigError("配置文件格式错误".to_string());
    assert_eq!(error.get_error_type_summary(), "worker_configuration_invalid");
    assert!(!error.is_retryable()); // 配置错误不应重试
}

#[test]
fn test_cancelled_is_not_a_failure() {
    let error = AppError::Cancelled;
    assert_eq!(error.get_error_type_summary(), "shutdown_requested");
    assert!(!error.is_retryable());
    assert!(error.is_cancelled());
}

#[test]
fn test_all_error_types_have_classification() {
    // 确保所有错误类型都有对应的分类
    let test_cases = vec![
        (AppError::ProviderError("test".to_string()), "trade_data_acquisition_failed"),
        (AppError::JsonError(serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err()), "trade_data_parsing_failed"),
        (AppError::ReportError("test".to_string()), "position_report_invalid"),
        (AppError::IoError(std::io::Error::new(std::io::ErrorKind::Other, "test")), "position_report_file_operation_failed"),
        (AppError::ConfigError("test".to_string()), "worker_configuration_invalid"),
        (AppError::Cancelled, "shutdown_requested"),
    ];

    for (error, expected_summary) in test_cases {
        assert_eq!(error.get_error_type_summary(), expected_summary);
    }
}
