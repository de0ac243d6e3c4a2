use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 单个小时时段的成交量 - 数据源返回格式
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerPeriod {
    /// 时段序号，名义上为 1..=24，越界值同样是合法数据
    #[serde(rename = "period")]
    pub index: i32,
    /// 该时段成交量
    pub volume: f64,
}

impl PowerPeriod {
    pub fn new(index: i32, volume: f64) -> Self {
        Self { index, volume }
    }
}

/// 一笔电力交易
///
/// `periods` 为 `None` 表示数据源未给出时段数据（字段缺失或为 null），
/// 聚合时与空列表同等对待。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PowerTrade {
    /// 交易日期
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// 按小时排列的时段数据
    #[serde(default)]
    pub periods: Option<Vec<PowerPeriod>>,
}

impl PowerTrade {
    /// 创建包含时段数据的交易
    pub fn new(date: NaiveDate, periods: Vec<PowerPeriod>) -> Self {
        Self {
            date: Some(date),
            periods: Some(periods),
        }
    }

    /// 创建没有时段数据的交易
    pub fn without_periods(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            periods: None,
        }
    }

    /// 时段切片，缺失时返回空切片
    pub fn periods(&self) -> &[PowerPeriod] {
        self.periods.as_deref().unwrap_or(&[])
    }
}
