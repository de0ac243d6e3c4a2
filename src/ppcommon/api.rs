use crate::ppcommon::{AppError, PowerTrade, ProviderConfig, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// 交易数据源
///
/// 唯一的操作是按日期获取交易列表，任何失败都以错误返回，由调用方决定是否重试。
/// 实现不应返回 [`AppError::Cancelled`]，该变体专用于关闭信号。
#[async_trait]
pub trait PowerService: Send + Sync {
    async fn get_trades(&self, date: NaiveDate) -> Result<Vec<PowerTrade>>;
}

#[async_trait]
impl<T: PowerService + ?Sized> PowerService for Arc<T> {
    async fn get_trades(&self, date: NaiveDate) -> Result<Vec<PowerTrade>> {
        (**self).get_trades(date).await
    }
}

/// 同步（阻塞式）交易数据源
pub trait BlockingPowerService: Send + Sync + 'static {
    fn get_trades(&self, date: NaiveDate) -> Result<Vec<PowerTrade>>;
}

/// 把同步数据源放到阻塞线程池执行，适配为异步 [`PowerService`]
pub struct SpawnBlocking<S> {
    inner: Arc<S>,
}

impl<S: BlockingPowerService> SpawnBlocking<S> {
    pub fn new(inner: S) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

#[async_trait]
impl<S: BlockingPowerService> PowerService for SpawnBlocking<S> {
    async fn get_trades(&self, date: NaiveDate) -> Result<Vec<PowerTrade>> {
        let inner = Arc::clone(&self.inner);
        debug!(target: "数据源", %date, "调用同步数据源获取交易");

        tokio::task::spawn_blocking(move || inner.get_trades(date))
            .await
            .map_err(|e| AppError::ProviderError(format!("同步数据源任务异常终止: {}", e)))?
    }
}

/// HTTP/JSON 交易数据源
///
/// 请求 `GET {base_url}/trades?date=YYYY-MM-DD`，响应为交易数组。
#[derive(Clone, Debug)]
pub struct HttpPowerService {
    client: Client,
    base_url: String,
}

impl HttpPowerService {
    /// 创建新的HTTP数据源实例
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(request_timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// 构造指定日期的交易查询URL
    pub fn trades_url(&self, date: NaiveDate) -> String {
        format!(
            "{}/trades?date={}",
            self.base_url.trim_end_matches('/'),
            date.format("%Y-%m-%d")
        )
    }
}

#[async_trait]
impl PowerService for HttpPowerService {
    async fn get_trades(&self, date: NaiveDate) -> Result<Vec<PowerTrade>> {
        let url = self.trades_url(date);
        debug!(target: "数据源", %url, "请求交易数据");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::ProviderError(format!(
                "获取交易数据失败: {} - {}",
                status, text
            )));
        }

        let body = response.text().await?;
        let trades: Vec<PowerTrade> = serde_json::from_str(&body)?;

        debug!(target: "数据源", trade_count = trades.len(), "交易数据解析完成");
        Ok(trades)
    }
}

/// 本地JSON文件数据源
///
/// 每次调用都重新读取文件，运维人员可以在两个周期之间替换文件内容。
/// 文件即为当日交易簿，不按日期过滤。
#[derive(Clone, Debug)]
pub struct FilePowerService {
    path: PathBuf,
}

impl FilePowerService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PowerService for FilePowerService {
    async fn get_trades(&self, date: NaiveDate) -> Result<Vec<PowerTrade>> {
        debug!(target: "数据源", %date, path = %self.path.display(), "从文件读取交易数据");

        let content = tokio::fs::read_to_string(&self.path).await?;
        let trades: Vec<PowerTrade> = serde_json::from_str(&content)?;
        Ok(trades)
    }
}

/// 根据配置创建交易数据源
pub fn build_power_service(config: &ProviderConfig) -> Result<Arc<dyn PowerService>> {
    match config {
        ProviderConfig::Http { base_url, request_timeout_secs } => {
            info!(target: "数据源", %base_url, request_timeout_secs, "使用HTTP交易数据源");
            let service = HttpPowerService::new(
                base_url.clone(),
                Duration::from_secs(*request_timeout_secs),
            )?;
            Ok(Arc::new(service))
        }
        ProviderConfig::File { path } => {
            info!(target: "数据源", %path, "使用文件交易数据源");
            Ok(Arc::new(FilePowerService::new(path)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ppcommon::PowerPeriod;

    struct FixedBlockingService;

    impl BlockingPowerService for FixedBlockingService {
        fn get_trades(&self, date: NaiveDate) -> Result<Vec<PowerTrade>> {
            Ok(vec![PowerTrade::new(date, vec![PowerPeriod::new(1, 42.0)])])
        }
    }

    #[test]
    fn test_trades_url_trims_trailing_slash() {
        let service = HttpPowerService::new("http://localhost:8080/api/", Duration::from_secs(5)).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        assert_eq!(service.trades_url(date), "http://localhost:8080/api/trades?date=2024-03-09");
    }

    #[tokio::test]
    async fn test_spawn_blocking_adapter_passes_result_through() {
        let service = SpawnBlocking::new(FixedBlockingService);
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let trades = service.get_trades(date).await.unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].periods(), &[PowerPeriod::new(1, 42.0)]);
    }

    #[tokio::test]
    async fn test_file_service_reads_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.json");
        std::fs::write(
            &path,
            r#"[{"date":"2024-01-01","periods":[{"period":1,"volume":10.0}]},{"date":"2024-01-01","periods":null}]"#,
        )
        .unwrap();

        let service = FilePowerService::new(path.clone());
        let trades = service
            .get_trades(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .await
            .unwrap();

        assert_eq!(trades.len(), 2);
        assert!(trades[1].periods().is_empty());
    }

    #[tokio::test]
    async fn test_file_service_missing_file_is_error() {
        let service = FilePowerService::new("./target/does_not_exist/trades.json");
        let result = service.get_trades(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).await;

        assert!(matches!(result, Err(AppError::IoError(_))));
    }
}
