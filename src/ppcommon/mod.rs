// 导出共享模块
pub mod api;
pub mod config;
pub mod error;
pub mod logging_setup;
pub mod models;
pub mod shutdown;

// 重新导出常用类型，方便使用
pub use api::{build_power_service, BlockingPowerService, FilePowerService, HttpPowerService, PowerService, SpawnBlocking};
pub use config::{LoggingConfig, PowerPositionConfig, ProviderConfig, WorkerConfig};
pub use error::{AppError, Result};
pub use logging_setup::init_logging;
pub use models::{PowerPeriod, PowerTrade};
pub use shutdown::{is_shutdown, wait_for_shutdown};
