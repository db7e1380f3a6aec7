//! Alpha Vantage 响应解析，把 JSON 载荷转换为内部数据结构

use crate::errors::Result;
use crate::models::bar::DailyBar;
use crate::models::info::{Quote, CompanyOverview, NewsItem, NewsSummary, WeekBar, WeeklySummary};
use crate::util::truncate_text;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::DAILY_SERIES_KEY;

/// 读取数值字段，Alpha Vantage 把数字编码为字符串
fn field_f64(values: &Value, key: &str) -> Option<f64> {
    match values.get(key) {
        Some(Value::String(s)) => s.parse().ok(),
        Some(v) => v.as_f64(),
        None => None,
    }
}

fn field_str(values: &Value, key: &str, default: &str) -> String {
    values
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or(default)
        .to_string()
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// 解析日线数据，复权字段缺失时回退到非复权值，按日期升序返回
pub fn parse_daily_series(symbol: &str, payload: &Value) -> Result<Vec<DailyBar>> {
    let series = match payload.get(DAILY_SERIES_KEY).and_then(|s| s.as_object()) {
        Some(series) => series,
        None => return Ok(Vec::new()),
    };

    let mut bars = Vec::with_capacity(series.len());
    for (date_str, values) in series {
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")?;
        let close = field_f64(values, "4. close").unwrap_or(f64::NAN);

        bars.push(DailyBar {
            symbol: symbol.to_string(),
            date,
            open: field_f64(values, "1. open").unwrap_or(f64::NAN),
            high: field_f64(values, "2. high").unwrap_or(f64::NAN),
            low: field_f64(values, "3. low").unwrap_or(f64::NAN),
            close,
            adjusted_close: field_f64(values, "5. adjusted close").unwrap_or(close),
            // 非复权接口的成交量在 "5. volume"
            volume: field_f64(values, "6. volume")
                .or_else(|| field_f64(values, "5. volume"))
                .unwrap_or(0.0) as i64,
            dividend_amount: field_f64(values, "7. dividend amount").unwrap_or(0.0),
            split_coefficient: field_f64(values, "8. split coefficient").unwrap_or(1.0),
        });
    }

    bars.sort_by(|a, b| a.date.cmp(&b.date));
    Ok(bars)
}

/// 解析实时报价数据
pub fn parse_quote(payload: &Value) -> Option<Quote> {
    let quote = payload.get("Global Quote")?;
    if !quote.as_object().map(|o| !o.is_empty()).unwrap_or(false) {
        return None;
    }

    Some(Quote {
        current_price: field_f64(quote, "05. price").unwrap_or(0.0),
        change: field_f64(quote, "09. change").unwrap_or(0.0),
        change_percent: field_str(quote, "10. change percent", "0%")
            .trim_end_matches('%')
            .to_string(),
        volume: field_str(quote, "06. volume", "0"),
        previous_close: field_f64(quote, "08. previous close").unwrap_or(0.0),
        open: field_f64(quote, "02. open").unwrap_or(0.0),
        high: field_f64(quote, "03. high").unwrap_or(0.0),
        low: field_f64(quote, "04. low").unwrap_or(0.0),
        latest_trading_day: field_str(quote, "07. latest trading day", ""),
    })
}

/// 解析公司基本信息
pub fn parse_overview(payload: &Value) -> Option<CompanyOverview> {
    if payload.get("Symbol").is_none() {
        return None;
    }

    Some(CompanyOverview {
        company_name: field_str(payload, "Name", ""),
        sector: field_str(payload, "Sector", ""),
        industry: field_str(payload, "Industry", ""),
        description: truncate_text(&field_str(payload, "Description", ""), 200),
        market_cap: field_str(payload, "MarketCapitalization", ""),
        pe_ratio: field_str(payload, "PERatio", ""),
        dividend_yield: field_str(payload, "DividendYield", ""),
        eps: field_str(payload, "EPS", ""),
        beta: field_str(payload, "Beta", ""),
    })
}

/// 解析新闻情感数据，只统计 since 之后发布的新闻（取最近10条）
pub fn parse_news(payload: &Value, since: NaiveDate) -> Option<NewsSummary> {
    let feed = payload.get("feed")?.as_array()?;
    if feed.is_empty() {
        return None;
    }

    let mut recent_news = Vec::new();
    let mut total_sentiment = 0.0;
    let mut positive_count = 0;
    let mut negative_count = 0;

    for item in feed.iter().take(10) {
        let published = match item.get("time_published").and_then(|v| v.as_str()) {
            Some(s) => s,
            None => continue,
        };
        let published = match NaiveDateTime::parse_from_str(published, "%Y%m%dT%H%M%S") {
            Ok(dt) => dt,
            Err(_) => continue,
        };
        if published.date() < since {
            continue;
        }

        let sentiment = field_str(item, "overall_sentiment_label", "");
        match sentiment.as_str() {
            "positive" => positive_count += 1,
            "negative" => negative_count += 1,
            _ => {}
        }
        total_sentiment += field_f64(item, "overall_sentiment_score").unwrap_or(0.0);

        recent_news.push(NewsItem {
            title: field_str(item, "title", ""),
            summary: truncate_text(&field_str(item, "summary", ""), 100),
            sentiment,
            date: published.format("%Y-%m-%d").to_string(),
        });
    }

    let avg_sentiment_score = if recent_news.is_empty() {
        0.0
    } else {
        round3(total_sentiment / recent_news.len() as f64)
    };

    Some(NewsSummary {
        recent_news_count: recent_news.len(),
        avg_sentiment_score,
        positive_news_count: positive_count,
        negative_news_count: negative_count,
        recent_news,
    })
}

/// 解析最近一周的日线数据，取最近7个交易日
pub fn parse_weekly(payload: &Value) -> Option<WeeklySummary> {
    let series = payload.get(DAILY_SERIES_KEY)?.as_object()?;
    if series.is_empty() {
        return None;
    }

    let mut dates: Vec<&String> = series.keys().collect();
    dates.sort_by(|a, b| b.cmp(a));
    dates.truncate(7);

    let mut week_data = Vec::with_capacity(dates.len());
    for date in dates {
        let day = &series[date];
        let close = field_f64(day, "4. close").unwrap_or(0.0);
        let open = field_f64(day, "1. open").unwrap_or(0.0);
        week_data.push(WeekBar {
            date: date.clone(),
            close,
            volume: field_f64(day, "5. volume").unwrap_or(0.0) as i64,
            change: close - open,
        });
    }

    // week_data[0] 为最新交易日，末尾为最早交易日
    let (week_change, week_change_percent) = if week_data.len() >= 2 {
        let first_close = week_data.last().map(|d| d.close).unwrap_or(0.0);
        let last_close = week_data[0].close;
        let change = last_close - first_close;
        let percent = if first_close > 0.0 {
            change / first_close * 100.0
        } else {
            0.0
        };
        (round2(change), round2(percent))
    } else {
        (0.0, 0.0)
    };

    Some(WeeklySummary {
        week_change,
        week_change_percent,
        week_data,
    })
}
