use fetch_market::client::AlphaVantageClient;
use fetch_market::config::{Config, OutputSize};
use fetch_market::errors::FetchMarketError;
use serde_json::json;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// 限流间隔设到 10ms，避免测试被 wait 拖慢
fn test_config() -> Config {
    Config::new()
        .with_calls_per_minute(6000)
        .with_timeout_secs(5)
        .with_max_retries(1)
}

async fn test_client(server: &MockServer, config: &Config) -> AlphaVantageClient {
    AlphaVantageClient::new(config, "demo-key")
        .unwrap()
        .with_api_url(&server.uri())
}

#[tokio::test]
async fn fetch_daily_parses_series() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("function", "TIME_SERIES_DAILY"))
        .and(query_param("symbol", "600519.SHH"))
        .and(query_param("apikey", "demo-key"))
        .and(query_param("outputsize", "full"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Meta Data": {"2. Symbol": "600519.SHH"},
            "Time Series (Daily)": {
                "2024-05-10": {
                    "1. open": "1700.0",
                    "2. high": "1720.5",
                    "3. low": "1690.0",
                    "4. close": "1710.0",
                    "5. volume": "2876500"
                },
                "2024-05-09": {
                    "1. open": "1680.0",
                    "2. high": "1705.0",
                    "3. low": "1675.0",
                    "4. close": "1701.0",
                    "5. volume": "3012800"
                }
            }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server, &test_config()).await;
    let bars = client.fetch_daily("600519.SHH").await.unwrap();

    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].date.to_string(), "2024-05-09");
    assert_eq!(bars[1].close, 1710.0);
    assert_eq!(bars[1].adjusted_close, 1710.0);
    assert_eq!(bars[1].volume, 2876500);
}

#[tokio::test]
async fn fetch_daily_adjusted_uses_adjusted_function() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("function", "TIME_SERIES_DAILY_ADJUSTED"))
        .and(query_param("outputsize", "compact"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Time Series (Daily)": {
                "2024-05-10": {
                    "1. open": "1700.0",
                    "2. high": "1720.5",
                    "3. low": "1690.0",
                    "4. close": "1710.0",
                    "5. adjusted close": "1705.2",
                    "6. volume": "2876500",
                    "7. dividend amount": "0.0000",
                    "8. split coefficient": "1.0"
                }
            }
        })))
        .mount(&server)
        .await;

    let config = test_config()
        .with_adjusted(true)
        .with_output_size(OutputSize::Compact);
    let client = test_client(&server, &config).await;
    let bars = client.fetch_daily("600519.SHH").await.unwrap();

    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].adjusted_close, 1705.2);
}

#[tokio::test]
async fn error_message_is_hard_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Error Message": "Invalid API call."
        })))
        .mount(&server)
        .await;

    let client = test_client(&server, &test_config()).await;
    let err = client.fetch_daily("BOGUS").await.unwrap_err();
    assert!(matches!(err, FetchMarketError::ApiError(_)), "got: {:?}", err);
}

#[tokio::test]
async fn rate_limit_note_exhausts_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Note": "Thank you for using Alpha Vantage! Our standard API rate limit is 25 requests per day."
        })))
        .mount(&server)
        .await;

    let client = test_client(&server, &test_config()).await;
    let err = client.fetch_daily("600519.SHH").await.unwrap_err();
    assert!(matches!(err, FetchMarketError::RetryExhausted(_)), "got: {:?}", err);
}

#[tokio::test]
async fn http_error_exhausts_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server, &test_config()).await;
    let err = client.fetch_daily("600519.SHH").await.unwrap_err();
    assert!(matches!(err, FetchMarketError::RetryExhausted(_)), "got: {:?}", err);
}

#[tokio::test]
async fn missing_series_key_exhausts_retries() {
    let server = MockServer::start().await;

    // 响应格式合法，但缺少日线键
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Meta Data": {"2. Symbol": "600519.SHH"}
        })))
        .mount(&server)
        .await;

    let client = test_client(&server, &test_config()).await;
    let err = client.fetch_daily("600519.SHH").await.unwrap_err();
    assert!(matches!(err, FetchMarketError::RetryExhausted(_)), "got: {:?}", err);
}

#[tokio::test]
async fn fetch_quote_parses_global_quote() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("function", "GLOBAL_QUOTE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Global Quote": {
                "02. open": "10.40",
                "03. high": "10.60",
                "04. low": "10.20",
                "05. price": "10.50",
                "06. volume": "123456",
                "07. latest trading day": "2024-05-10",
                "08. previous close": "10.30",
                "09. change": "0.20",
                "10. change percent": "1.9417%"
            }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server, &test_config()).await;
    let quote = client.fetch_quote("000001.SHZ").await.unwrap().unwrap();
    assert_eq!(quote.current_price, 10.5);
    assert_eq!(quote.change_percent, "1.9417");
}

#[tokio::test]
async fn comprehensive_info_survives_partial_failures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("function", "GLOBAL_QUOTE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Global Quote": {
                "05. price": "10.50",
                "09. change": "0.20",
                "10. change percent": "1.94%"
            }
        })))
        .mount(&server)
        .await;

    // 其余接口全部返回硬错误
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Error Message": "Invalid API call."
        })))
        .mount(&server)
        .await;

    let client = test_client(&server, &test_config()).await;
    let info = client.fetch_comprehensive_info("000001.SHZ").await;

    assert_eq!(info.symbol, "000001.SHZ");
    assert!(info.quote.is_some());
    assert!(info.overview.is_none());
    assert!(info.news.is_none());
    assert!(info.weekly.is_none());
}
