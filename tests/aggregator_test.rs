#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use power_position::ppcommon::{PowerPeriod, PowerTrade};
    use power_position::ppextract::{aggregate, HOURS_PER_DAY};

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    // 创建测试交易
    fn create_trade(periods: &[(i32, f64)]) -> PowerTrade {
        PowerTrade::new(
            test_date(),
            periods.iter().map(|&(index, volume)| PowerPeriod::new(index, volume)).collect(),
        )
    }

    #[test]
    fn test_empty_input_yields_24_zero_buckets() {
        let volumes = aggregate(&[]);

        assert_eq!(volumes.iter().count(), HOURS_PER_DAY, "桶数量必须为24");
        assert!(volumes.iter().all(|(_, v)| v == 0.0), "空输入时所有桶应为0");
        assert_eq!(volumes.total(), 0.0);
    }

    #[test]
    fn test_two_trades_sum_per_period() {
        let trades = vec![
            create_trade(&[(1, 100.0), (2, 50.0)]),
            create_trade(&[(1, 50.0), (2, 20.0)]),
        ];

        let volumes = aggregate(&trades);

        assert_eq!(volumes.get(1), Some(150.0), "第1时段成交量不正确");
        assert_eq!(volumes.get(2), Some(70.0), "第2时段成交量不正确");
        for index in 3..=24 {
            assert_eq!(volumes.get(index), Some(0.0), "第{}时段应为0", index);
        }
    }

    #[test]
    fn test_out_of_range_periods_are_dropped() {
        let trades = vec![create_trade(&[(25, 100.0), (0, 30.0), (-1, 7.0), (24, 5.0)])];

        let volumes = aggregate(&trades);

        // 越界时段被丢弃，既不截断到边界桶也不回绕
        assert_eq!(volumes.get(24), Some(5.0));
        assert_eq!(volumes.get(1), Some(0.0));
        assert_eq!(volumes.total(), 5.0);
        assert_eq!(volumes.get(25), None);
        assert_eq!(volumes.get(0), None);
    }

    #[test]
    fn test_trades_without_periods_contribute_nothing() {
        let trades = vec![
            PowerTrade::without_periods(test_date()),
            PowerTrade::new(test_date(), Vec::new()),
            PowerTrade::default(),
        ];

        let volumes = aggregate(&trades);

        assert_eq!(volumes.iter().count(), HOURS_PER_DAY);
        assert_eq!(volumes.total(), 0.0);
    }

    #[test]
    fn test_total_equals_sum_of_in_range_volumes() {
        // 构造一批确定性的交易，包含越界时段
        let trades: Vec<PowerTrade> = (0..10)
            .map(|t| {
                let periods: Vec<(i32, f64)> = (-2..=27)
                    .map(|index| (index, (t * 31 + index) as f64 * 0.5))
                    .collect();
                create_trade(&periods)
            })
            .collect();

        let expected: f64 = trades
            .iter()
            .flat_map(|trade| trade.periods())
            .filter(|p| (1..=24).contains(&p.index))
            .map(|p| p.volume)
            .sum();

        let volumes = aggregate(&trades);

        assert!((volumes.total() - expected).abs() < 1e-9, "桶合计 {} 与期望 {} 不一致", volumes.total(), expected);
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let trades = vec![
            create_trade(&[(5, 1.25), (6, 2.5)]),
            create_trade(&[(6, 3.75), (30, 9.0)]),
        ];

        assert_eq!(aggregate(&trades), aggregate(&trades));
    }
}
