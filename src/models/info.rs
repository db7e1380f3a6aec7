use serde::Serialize;

/// 实时报价（GLOBAL_QUOTE）
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub current_price: f64,
    pub change: f64,
    pub change_percent: String,
    pub volume: String,
    pub previous_close: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub latest_trading_day: String,
}

/// 公司基本信息（OVERVIEW）
#[derive(Debug, Clone, Serialize)]
pub struct CompanyOverview {
    pub company_name: String,
    pub sector: String,
    pub industry: String,
    pub description: String,
    pub market_cap: String,
    pub pe_ratio: String,
    pub dividend_yield: String,
    pub eps: String,
    pub beta: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub summary: String,
    pub sentiment: String,
    pub date: String,
}

/// 最近一周的新闻情感统计（NEWS_SENTIMENT）
#[derive(Debug, Clone, Serialize)]
pub struct NewsSummary {
    pub recent_news_count: usize,
    pub avg_sentiment_score: f64,
    pub positive_news_count: usize,
    pub negative_news_count: usize,
    pub recent_news: Vec<NewsItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekBar {
    pub date: String,
    pub close: f64,
    pub volume: i64,
    pub change: f64,
}

/// 最近一周的日线摘要
#[derive(Debug, Clone, Serialize)]
pub struct WeeklySummary {
    pub week_change: f64,
    pub week_change_percent: f64,
    pub week_data: Vec<WeekBar>,
}

/// 单只股票的综合信息，各部分独立获取，失败时保持为空
#[derive(Debug, Clone, Serialize)]
pub struct StockInfo {
    pub symbol: String,
    #[serde(flatten)]
    pub quote: Option<Quote>,
    #[serde(flatten)]
    pub overview: Option<CompanyOverview>,
    #[serde(flatten)]
    pub news: Option<NewsSummary>,
    #[serde(flatten)]
    pub weekly: Option<WeeklySummary>,
}

impl StockInfo {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            quote: None,
            overview: None,
            news: None,
            weekly: None,
        }
    }

    /// 生成简化 CSV 的一行
    pub fn summary_row(&self) -> InfoSummaryRow {
        InfoSummaryRow {
            symbol: self.symbol.clone(),
            company_name: self.overview.as_ref().map(|o| o.company_name.clone()).unwrap_or_default(),
            industry: self.overview.as_ref().map(|o| o.industry.clone()).unwrap_or_default(),
            current_price: self.quote.as_ref().map(|q| q.current_price).unwrap_or(0.0),
            change_percent: self.quote.as_ref().map(|q| q.change_percent.clone()).unwrap_or_else(|| "0".to_string()),
            week_change_percent: self.weekly.as_ref().map(|w| w.week_change_percent).unwrap_or(0.0),
            volume: self.quote.as_ref().map(|q| q.volume.clone()).unwrap_or_else(|| "0".to_string()),
            market_cap: self.overview.as_ref().map(|o| o.market_cap.clone()).unwrap_or_default(),
            pe_ratio: self.overview.as_ref().map(|o| o.pe_ratio.clone()).unwrap_or_default(),
            recent_news_count: self.news.as_ref().map(|n| n.recent_news_count).unwrap_or(0),
            avg_sentiment_score: self.news.as_ref().map(|n| n.avg_sentiment_score).unwrap_or(0.0),
        }
    }
}

/// 简化 CSV 行，列名与原始输出保持一致
#[derive(Debug, Clone, Serialize)]
pub struct InfoSummaryRow {
    #[serde(rename = "股票代码")]
    pub symbol: String,
    #[serde(rename = "公司名称")]
    pub company_name: String,
    #[serde(rename = "行业")]
    pub industry: String,
    #[serde(rename = "当前价格")]
    pub current_price: f64,
    #[serde(rename = "涨跌幅")]
    pub change_percent: String,
    #[serde(rename = "周涨跌幅")]
    pub week_change_percent: f64,
    #[serde(rename = "成交量")]
    pub volume: String,
    #[serde(rename = "市值")]
    pub market_cap: String,
    #[serde(rename = "市盈率")]
    pub pe_ratio: String,
    #[serde(rename = "最近新闻数")]
    pub recent_news_count: usize,
    #[serde(rename = "情感评分")]
    pub avg_sentiment_score: f64,
}
