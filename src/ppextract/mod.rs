// 导出提取流水线模块
pub mod aggregator;
pub mod cycle;
pub mod fetcher;
pub mod report;
pub mod scheduler;

// 重新导出常用模块，方便使用
pub use aggregator::{aggregate, AggregatedVolumes, HOURS_PER_DAY};
pub use cycle::{CycleRunner, ExtractionCycle};
pub use fetcher::{ResilientFetcher, RetryPolicy};
pub use report::{format_report, render_csv, report_file_name, ReportRow, REPORT_HEADER};
pub use scheduler::Scheduler;
