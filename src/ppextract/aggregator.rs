//! 小时成交量聚合器
//!
//! 把一个交易日的所有交易按时段序号累加到24个固定的小时桶中。
//! 纯函数，不做任何I/O。

use crate::ppcommon::PowerTrade;

/// 每日小时桶数量
pub const HOURS_PER_DAY: usize = 24;

/// 24个小时桶的累计成交量
///
/// 桶的数量由数组长度保证，只会累加，不会增删。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatedVolumes {
    buckets: [f64; HOURS_PER_DAY],
}

impl Default for AggregatedVolumes {
    fn default() -> Self {
        Self {
            buckets: [0.0; HOURS_PER_DAY],
        }
    }
}

impl AggregatedVolumes {
    /// 时段序号转为数组下标，越界返回 None
    fn slot(index: i32) -> Option<usize> {
        if (1..=HOURS_PER_DAY as i32).contains(&index) {
            Some((index - 1) as usize)
        } else {
            None
        }
    }

    /// 按时段序号（1..=24）读取累计成交量
    pub fn get(&self, index: i32) -> Option<f64> {
        Self::slot(index).map(|slot| self.buckets[slot])
    }

    /// 累加一个时段的成交量，越界序号被忽略并返回 false
    pub fn accumulate(&mut self, index: i32, volume: f64) -> bool {
        match Self::slot(index) {
            Some(slot) => {
                self.buckets[slot] += volume;
                true
            }
            None => false,
        }
    }

    /// 按时段顺序遍历 `(序号, 成交量)`
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .map(|(slot, volume)| (slot as i32 + 1, *volume))
    }

    /// 全部桶的成交量合计
    pub fn total(&self) -> f64 {
        self.buckets.iter().sum()
    }

    pub fn as_array(&self) -> &[f64; HOURS_PER_DAY] {
        &self.buckets
    }
}

/// 聚合交易列表
///
/// - 所有桶先初始化为 0.0
/// - 序号在 1..=24 之外的时段直接丢弃，不截断也不回绕
/// - 没有时段数据的交易不贡献任何成交量
pub fn aggregate(trades: &[PowerTrade]) -> AggregatedVolumes {
    let mut volumes = AggregatedVolumes::default();

    for trade in trades {
        for period in trade.periods() {
            volumes.accumulate(period.index, period.volume);
        }
    }

    volumes
}
