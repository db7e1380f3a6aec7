use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchMarketError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Date parsing error: {0}")]
    DateError(#[from] chrono::ParseError),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Retry exhausted: {0}")]
    RetryExhausted(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, FetchMarketError>;

// 用于从字符串创建错误
impl From<String> for FetchMarketError {
    fn from(s: String) -> Self {
        FetchMarketError::Unknown(s)
    }
}

// 用于从&str创建错误
impl From<&str> for FetchMarketError {
    fn from(s: &str) -> Self {
        FetchMarketError::Unknown(s.to_string())
    }
}
