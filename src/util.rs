use chrono::NaiveDate;
use crate::errors::{Result, FetchMarketError};

/// 将 A 股代码映射为 Alpha Vantage 支持的后缀
pub fn normalize_a_share_symbol(symbol: &str) -> String {
    let s = symbol.trim().to_uppercase();
    if s.is_empty() {
        return s;
    }
    if s.contains('.') {
        if let Some(prefix) = s.strip_suffix(".SH") {
            return format!("{}.SHH", prefix);
        }
        if let Some(prefix) = s.strip_suffix(".SZ") {
            return format!("{}.SHZ", prefix);
        }
        return s;
    }
    match s.as_bytes()[0] {
        b'6' => format!("{}.SHH", s),
        b'0' | b'3' => format!("{}.SHZ", s),
        _ => s,
    }
}

/// 解析命令行传入的日期，支持 YYYY-MM-DD、YYYY/MM/DD、YYYYMMDD
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(input, fmt) {
            return Ok(date);
        }
    }
    Err(FetchMarketError::DataError(format!("Invalid date: {}", input)))
}

/// 截断过长的文本，保留前 max_chars 个字符并追加省略号
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.is_empty() {
        return String::new();
    }
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}...", truncated)
}

/// 默认日线 CSV 输出路径（data/a_shares_时间戳.csv）
pub fn default_daily_output_path() -> String {
    format!("data/a_shares_{}.csv", chrono::Local::now().format("%Y%m%d_%H%M%S"))
}

/// 默认综合信息 JSON 输出路径（data/a_share_info_时间戳.json）
pub fn default_info_output_path() -> String {
    format!("data/a_share_info_{}.json", chrono::Local::now().format("%Y%m%d_%H%M%S"))
}
