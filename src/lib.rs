// 导出模块
pub mod ppcommon;
pub mod ppextract;

// Re-export error types
pub use ppcommon::error::{AppError, Result};
