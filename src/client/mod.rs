pub mod parse;

use crate::config::{Config, OutputSize};
use crate::errors::{Result, FetchMarketError};
use crate::models::bar::DailyBar;
use crate::models::info::{Quote, CompanyOverview, NewsSummary, WeeklySummary, StockInfo};
use crate::rate_limit::RateLimiter;
use chrono::Duration as ChronoDuration;
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Alpha Vantage 官方接口地址
pub const ALPHAVANTAGE_API_URL: &str = "https://www.alphavantage.co/query";

/// 日线数据在响应中的键名，复权与非复权接口相同
const DAILY_SERIES_KEY: &str = "Time Series (Daily)";

const USER_AGENT: &str = "fetch-market/1.0 (+https://www.alphavantage.co/)";

/// Alpha Vantage API 客户端，内置限流与重试
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    api_url: String,
    rate_limiter: RateLimiter,
    max_retries: u32,
    output_size: OutputSize,
    adjusted: bool,
}

impl AlphaVantageClient {
    /// 创建新的客户端实例
    pub fn new(config: &Config, api_key: &str) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT);

        // 忽略系统代理（如需直连）
        if config.no_proxy {
            builder = builder.no_proxy();
        }

        let client = builder.build().map_err(FetchMarketError::RequestError)?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            api_url: ALPHAVANTAGE_API_URL.to_string(),
            rate_limiter: RateLimiter::new(config.calls_per_minute),
            max_retries: config.max_retries.max(1),
            output_size: config.output_size,
            adjusted: config.adjusted,
        })
    }

    /// 覆盖接口地址，用于测试
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.to_string();
        self
    }

    /// 通用 Alpha Vantage API 调用，处理限流提示与网络异常的重试。
    /// expect_key 指定响应中必须存在的键，缺失时视为软失败并重试。
    async fn query(
        &self,
        function: &str,
        symbol: &str,
        extra_params: &[(&str, &str)],
        expect_key: Option<&str>,
    ) -> Result<Value> {
        for attempt in 1..=self.max_retries {
            self.rate_limiter.wait().await;

            let mut request = self.client
                .get(&self.api_url)
                .query(&[
                    ("function", function),
                    ("symbol", symbol),
                    ("apikey", self.api_key.as_str()),
                    ("datatype", "json"),
                ]);
            for (key, value) in extra_params {
                request = request.query(&[(key, value)]);
            }

            match request.send().await {
                Ok(response) => {
                    if response.status() != StatusCode::OK {
                        warn!("[{}] HTTP {}，重试 {}/{}", symbol, response.status(), attempt, self.max_retries);
                        self.backoff(attempt, 2, 30).await;
                        continue;
                    }

                    let data: Value = response.json().await?;

                    // 检查限流提示
                    if data.get("Note").is_some() || data.get("Information").is_some() {
                        warn!("[{}] 命中限流提示，重试 {}/{}", symbol, attempt, self.max_retries);
                        self.backoff(attempt, 10, 75).await;
                        continue;
                    }

                    if let Some(message) = data.get("Error Message").and_then(|m| m.as_str()) {
                        return Err(FetchMarketError::ApiError(format!(
                            "{} API 返回错误: {}", symbol, message
                        )));
                    }

                    match expect_key {
                        Some(key) if data.get(key).is_none() => {
                            warn!("[{}] 响应缺少 {:?}，重试 {}/{}", symbol, key, attempt, self.max_retries);
                            self.backoff(attempt, 2, 60).await;
                        }
                        _ => return Ok(data),
                    }
                }
                Err(e) => {
                    warn!("[{}] 网络异常: {}，重试 {}/{}", symbol, e, attempt, self.max_retries);
                    self.backoff(attempt, 2, 60).await;
                }
            }
        }

        Err(FetchMarketError::RetryExhausted(format!(
            "{} {} 请求失败，超过最大重试次数 {}", symbol, function, self.max_retries
        )))
    }

    /// 按线性退避等待，最后一次尝试失败后不再等待
    async fn backoff(&self, attempt: u32, step_secs: u64, cap_secs: u64) {
        if attempt >= self.max_retries {
            return;
        }
        let wait = (step_secs * attempt as u64).min(cap_secs);
        debug!("退避等待 {}s", wait);
        tokio::time::sleep(Duration::from_secs(wait)).await;
    }

    /// 获取日线数据并解析为按日期升序的行
    pub async fn fetch_daily(&self, symbol: &str) -> Result<Vec<DailyBar>> {
        let function = if self.adjusted {
            "TIME_SERIES_DAILY_ADJUSTED"
        } else {
            "TIME_SERIES_DAILY"
        };
        info!("拉取 {} ({})...", symbol, function);

        let data = self
            .query(
                function,
                symbol,
                &[("outputsize", self.output_size.as_str())],
                Some(DAILY_SERIES_KEY),
            )
            .await?;

        let bars = parse::parse_daily_series(symbol, &data)?;
        debug!("[{}] 获取到 {} 条日线记录", symbol, bars.len());
        Ok(bars)
    }

    /// 获取实时报价信息
    pub async fn fetch_quote(&self, symbol: &str) -> Result<Option<Quote>> {
        let data = self.query("GLOBAL_QUOTE", symbol, &[], None).await?;
        Ok(parse::parse_quote(&data))
    }

    /// 获取公司基本信息
    pub async fn fetch_overview(&self, symbol: &str) -> Result<Option<CompanyOverview>> {
        let data = self.query("OVERVIEW", symbol, &[], None).await?;
        Ok(parse::parse_overview(&data))
    }

    /// 获取新闻情感分析（最近一周）
    pub async fn fetch_news(&self, symbol: &str) -> Result<Option<NewsSummary>> {
        let since = chrono::Local::now().date_naive() - ChronoDuration::days(7);
        let time_from = format!("{}T0000", since.format("%Y%m%d"));
        let data = self
            .query(
                "NEWS_SENTIMENT",
                symbol,
                &[("time_from", time_from.as_str()), ("limit", "50")],
                None,
            )
            .await?;
        Ok(parse::parse_news(&data, since))
    }

    /// 获取最近一周的日线摘要
    pub async fn fetch_weekly(&self, symbol: &str) -> Result<Option<WeeklySummary>> {
        let data = self
            .query(
                "TIME_SERIES_DAILY",
                symbol,
                &[("outputsize", "compact")],
                Some(DAILY_SERIES_KEY),
            )
            .await?;
        Ok(parse::parse_weekly(&data))
    }

    /// 获取股票的综合信息，各部分独立获取，单项失败不影响其他
    pub async fn fetch_comprehensive_info(&self, symbol: &str) -> StockInfo {
        info!("正在获取 {} 的综合信息...", symbol);
        let mut result = StockInfo::new(symbol);

        match self.fetch_quote(symbol).await {
            Ok(quote) => result.quote = quote,
            Err(e) => warn!("[{}] 获取实时报价失败: {}", symbol, e),
        }

        match self.fetch_overview(symbol).await {
            Ok(overview) => result.overview = overview,
            Err(e) => warn!("[{}] 获取公司信息失败: {}", symbol, e),
        }

        match self.fetch_news(symbol).await {
            Ok(news) => result.news = news,
            Err(e) => warn!("[{}] 获取新闻数据失败: {}", symbol, e),
        }

        match self.fetch_weekly(symbol).await {
            Ok(weekly) => result.weekly = weekly,
            Err(e) => warn!("[{}] 获取日线数据失败: {}", symbol, e),
        }

        result
    }
}
