//! 头寸报表格式化
//!
//! 报表按结算惯例从前一日 23:00 开始，逐小时排列到当日 22:00。

use super::aggregator::{AggregatedVolumes, HOURS_PER_DAY};
use crate::ppcommon::{AppError, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Europe::London;

/// 报表表头
pub const REPORT_HEADER: [&str; 2] = ["Local Time", "Volume"];

/// 报表文件名模板（伦敦本地时间）
const REPORT_FILE_NAME_FORMAT: &str = "PowerPosition_%Y%m%d_%H%M.csv";

/// 报表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// "HH:mm" 格式的本地时间标签
    pub local_time_label: String,
    /// 对应小时桶的累计成交量
    pub volume: f64,
}

/// 报表第一行对应的时刻：提取日期前一天的 23:00
pub fn report_start_time(extraction_date: NaiveDate) -> NaiveDateTime {
    extraction_date.and_time(chrono::NaiveTime::MIN) - Duration::days(1) + Duration::hours(23)
}

/// 把聚合结果格式化为24行报表
///
/// 第 i 行（1..=24）的标签为起始时刻加 i-1 小时，成交量为第 i 个桶。
pub fn format_report(volumes: &AggregatedVolumes, extraction_date: NaiveDate) -> Vec<ReportRow> {
    let start = report_start_time(extraction_date);

    let rows: Vec<ReportRow> = volumes
        .iter()
        .map(|(index, volume)| {
            let time_slot = start + Duration::hours(i64::from(index - 1));
            ReportRow {
                local_time_label: time_slot.format("%H:%M").to_string(),
                volume,
            }
        })
        .collect();

    debug_assert_eq!(rows.len(), HOURS_PER_DAY);
    rows
}

/// 成交量输出为普通十进制数，不带千分位和指数
pub fn format_volume(volume: f64) -> String {
    format!("{}", volume)
}

/// 渲染为CSV文本：表头 + 每行 `HH:mm,<volume>`
pub fn render_csv(rows: &[ReportRow]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(REPORT_HEADER)?;

    for row in rows {
        wtr.write_record([row.local_time_label.as_str(), format_volume(row.volume).as_str()])?;
    }

    wtr.flush()?;

    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::ReportError(format!("刷新CSV缓冲区失败: {}", e)))?;

    String::from_utf8(bytes).map_err(|e| AppError::ReportError(format!("报表内容不是合法UTF-8: {}", e)))
}

/// 根据写入时刻生成报表文件名，时间戳换算为伦敦本地时间（随夏令时变化）
pub fn report_file_name(now: DateTime<Utc>) -> String {
    now.with_timezone(&London).format(REPORT_FILE_NAME_FORMAT).to_string()
}
