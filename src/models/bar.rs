use chrono::NaiveDate;
use serde::Serialize;

/// 日线数据结构，一行对应输出 CSV 的一行
#[derive(Debug, Clone, Serialize)]
pub struct DailyBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjusted_close: f64,
    pub volume: i64,
    pub dividend_amount: f64,
    pub split_coefficient: f64,
}

impl DailyBar {
    /// 判断是否落在给定的闭区间内，None 表示该侧不限
    pub fn in_range(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
        if let Some(start) = start {
            if self.date < start {
                return false;
            }
        }
        if let Some(end) = end {
            if self.date > end {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str) -> DailyBar {
        DailyBar {
            symbol: "600519.SHH".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            adjusted_close: 1.5,
            volume: 100,
            dividend_amount: 0.0,
            split_coefficient: 1.0,
        }
    }

    #[test]
    fn range_is_inclusive() {
        let b = bar("2024-05-10");
        let d = |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();

        assert!(b.in_range(None, None));
        assert!(b.in_range(Some(d("2024-05-10")), Some(d("2024-05-10"))));
        assert!(b.in_range(Some(d("2024-01-01")), None));
        assert!(b.in_range(None, Some(d("2024-12-31"))));
        assert!(!b.in_range(Some(d("2024-05-11")), None));
        assert!(!b.in_range(None, Some(d("2024-05-09"))));
    }
}
