use fetch_market::client::AlphaVantageClient;
use fetch_market::config::{Config, OutputSize};
use fetch_market::models::bar::DailyBar;
use fetch_market::services::export;
use fetch_market::util;

use clap::{App, Arg, ArgMatches, SubCommand};
use log::{error, info, warn};
use std::path::Path;
use std::process;

/// 解析 API Key：命令行参数优先，其次环境变量 ALPHAVANTAGE_API_KEY
fn resolve_api_key(matches: &ArgMatches) -> String {
    if let Some(key) = matches.value_of("api-key") {
        return key.to_string();
    }
    match std::env::var("ALPHAVANTAGE_API_KEY") {
        Ok(key) if !key.is_empty() => key,
        _ => {
            error!("请提供 Alpha Vantage API Key（--api-key 或环境变量 ALPHAVANTAGE_API_KEY）");
            process::exit(2);
        }
    }
}

fn parse_flag<T: std::str::FromStr>(matches: &ArgMatches, name: &str, default: T) -> T {
    matches
        .value_of(name)
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

async fn run_daily(matches: &ArgMatches) -> anyhow::Result<()> {
    let api_key = resolve_api_key(matches);

    let start = match matches.value_of("start").map(util::parse_date).transpose() {
        Ok(date) => date,
        Err(e) => {
            error!("开始日期无效: {}", e);
            process::exit(2);
        }
    };
    let end = match matches.value_of("end").map(util::parse_date).transpose() {
        Ok(date) => date,
        Err(e) => {
            error!("结束日期无效: {}", e);
            process::exit(2);
        }
    };
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            error!("开始日期不能晚于结束日期");
            process::exit(2);
        }
    }

    let output_size = match matches.value_of("outputsize").unwrap_or("full") {
        "compact" => OutputSize::Compact,
        _ => OutputSize::Full,
    };

    let config = Config::new()
        .with_calls_per_minute(parse_flag(matches, "calls-per-minute", 5))
        .with_timeout_secs(parse_flag(matches, "timeout", 30))
        .with_max_retries(parse_flag(matches, "max-retries", 5))
        .with_output_size(output_size)
        .with_adjusted(matches.is_present("adjusted"))
        .with_no_proxy(matches.is_present("no-proxy"));

    let client = AlphaVantageClient::new(&config, &api_key)?;

    let mut all_bars: Vec<DailyBar> = Vec::new();
    for raw_symbol in matches.values_of("symbols").unwrap() {
        let symbol = util::normalize_a_share_symbol(raw_symbol);
        match client.fetch_daily(&symbol).await {
            Ok(bars) => {
                let filtered: Vec<DailyBar> = bars
                    .into_iter()
                    .filter(|bar| bar.in_range(start, end))
                    .collect();
                if filtered.is_empty() {
                    warn!("{} 未返回有效数据", symbol);
                    continue;
                }
                all_bars.extend(filtered);
            }
            Err(e) => {
                warn!("{} 拉取失败: {}", symbol, e);
            }
        }
    }

    if all_bars.is_empty() {
        error!("没有可用数据可写出。");
        process::exit(1);
    }

    let output = matches
        .value_of("output")
        .map(str::to_string)
        .unwrap_or_else(util::default_daily_output_path);
    export::write_daily_csv(Path::new(&output), &mut all_bars)?;

    Ok(())
}

async fn run_info(matches: &ArgMatches) -> anyhow::Result<()> {
    let api_key = resolve_api_key(matches);

    let config = Config::new()
        .with_calls_per_minute(parse_flag(matches, "calls-per-minute", 3))
        .with_timeout_secs(parse_flag(matches, "timeout", 20))
        .with_max_retries(parse_flag(matches, "max-retries", 3))
        .with_no_proxy(matches.is_present("no-proxy"));

    let client = AlphaVantageClient::new(&config, &api_key)?;

    let mut all_results = Vec::new();
    for raw_symbol in matches.values_of("symbols").unwrap() {
        let symbol = util::normalize_a_share_symbol(raw_symbol);
        let result = client.fetch_comprehensive_info(&symbol).await;
        all_results.push(result);
        info!("完成 {}", symbol);
    }

    let output = matches
        .value_of("output")
        .map(str::to_string)
        .unwrap_or_else(util::default_info_output_path);
    // 同时生成简化的 CSV（与 JSON 同名）
    let csv_output = output
        .strip_suffix(".json")
        .map(|prefix| format!("{}.csv", prefix))
        .unwrap_or_else(|| format!("{}.csv", output));

    export::write_info_json(Path::new(&output), &all_results)?;
    export::write_info_csv(Path::new(&csv_output), &all_results)?;

    info!("共处理 {} 只股票", all_results.len());
    Ok(())
}

fn build_app() -> App<'static> {
    let app = App::new("fetch-market")
        .version("1.0.0")
        .about("合规抓取A股行情数据，使用 Alpha Vantage 官方 API");

    // 添加子命令
    app.subcommand(
        SubCommand::with_name("daily")
            .about("Fetch daily kline data and write a CSV file")
            .arg(
                Arg::with_name("symbols")
                    .short('s')
                    .long("symbols")
                    .value_name("SYMBOLS")
                    .help("A股股票代码，如 600519 000001 或 600519.SHH 000001.SHZ；会自动标准化为 .SHH/.SHZ")
                    .required(true)
                    .takes_value(true)
                    .multiple_values(true),
            )
            .arg(
                Arg::with_name("api-key")
                    .short('k')
                    .long("api-key")
                    .value_name("API_KEY")
                    .help("Alpha Vantage API Key；也可通过环境变量 ALPHAVANTAGE_API_KEY 提供")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("start")
                    .long("start")
                    .value_name("DATE")
                    .help("开始日期 YYYY-MM-DD")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("end")
                    .long("end")
                    .value_name("DATE")
                    .help("结束日期 YYYY-MM-DD")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("output")
                    .short('o')
                    .long("output")
                    .value_name("PATH")
                    .help("输出 CSV 路径（默认 data/a_shares_时间戳.csv）")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("outputsize")
                    .long("outputsize")
                    .value_name("SIZE")
                    .help("compact 约最近100条，full 为全量")
                    .possible_values(["compact", "full"])
                    .default_value("full")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("calls-per-minute")
                    .long("calls-per-minute")
                    .value_name("N")
                    .help("限流：每分钟最大请求数（免费额度建议≤5）")
                    .default_value("5")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("max-retries")
                    .long("max-retries")
                    .value_name("N")
                    .help("单次请求的最大重试次数")
                    .default_value("5")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("adjusted")
                    .long("adjusted")
                    .help("使用复权日线 TIME_SERIES_DAILY_ADJUSTED；默认使用非复权日线 TIME_SERIES_DAILY")
                    .takes_value(false),
            )
            .arg(
                Arg::with_name("no-proxy")
                    .long("no-proxy")
                    .help("忽略系统代理环境变量（如 HTTP(S)_PROXY），直接直连 Alpha Vantage")
                    .takes_value(false),
            )
            .arg(
                Arg::with_name("timeout")
                    .long("timeout")
                    .value_name("SECONDS")
                    .help("单次请求超时秒数，默认 30")
                    .default_value("30")
                    .takes_value(true),
            ),
    ).subcommand(
        SubCommand::with_name("info")
            .about("Fetch comprehensive stock info (quote, overview, news, weekly summary)")
            .arg(
                Arg::with_name("symbols")
                    .short('s')
                    .long("symbols")
                    .value_name("SYMBOLS")
                    .help("A股股票代码，如 600519 000001；会自动标准化为 .SHH/.SHZ")
                    .required(true)
                    .takes_value(true)
                    .multiple_values(true),
            )
            .arg(
                Arg::with_name("api-key")
                    .short('k')
                    .long("api-key")
                    .value_name("API_KEY")
                    .help("Alpha Vantage API Key；也可通过环境变量 ALPHAVANTAGE_API_KEY 提供")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("output")
                    .short('o')
                    .long("output")
                    .value_name("PATH")
                    .help("输出 JSON 路径（默认 data/a_share_info_时间戳.json）")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("calls-per-minute")
                    .long("calls-per-minute")
                    .value_name("N")
                    .help("限流：每分钟最大请求数（建议≤3，避免触发限制）")
                    .default_value("3")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("max-retries")
                    .long("max-retries")
                    .value_name("N")
                    .help("单次请求的最大重试次数")
                    .default_value("3")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("no-proxy")
                    .long("no-proxy")
                    .help("忽略系统代理环境变量，直接直连 Alpha Vantage")
                    .takes_value(false),
            )
            .arg(
                Arg::with_name("timeout")
                    .long("timeout")
                    .value_name("SECONDS")
                    .help("单次请求超时秒数，默认 20")
                    .default_value("20")
                    .takes_value(true),
            ),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载 .env（如存在）
    dotenvy::dotenv().ok();
    // Initialize logger
    env_logger::init();

    let matches = build_app().get_matches();

    if let Some(matches) = matches.subcommand_matches("daily") {
        run_daily(matches).await?;
    } else if let Some(matches) = matches.subcommand_matches("info") {
        run_info(matches).await?;
    } else {
        info!("No command specified. Use --help for usage information.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_defaults() {
        let matches = build_app().get_matches_from(["fetch-market", "daily", "-s", "600519"]);
        let sub = matches.subcommand_matches("daily").unwrap();
        // 日线抓取默认重试5次，与综合信息不同
        assert_eq!(sub.value_of("max-retries"), Some("5"));
        assert_eq!(sub.value_of("calls-per-minute"), Some("5"));
        assert_eq!(sub.value_of("outputsize"), Some("full"));
        assert_eq!(sub.value_of("timeout"), Some("30"));
    }

    #[test]
    fn info_defaults() {
        let matches = build_app().get_matches_from(["fetch-market", "info", "-s", "600519"]);
        let sub = matches.subcommand_matches("info").unwrap();
        assert_eq!(sub.value_of("max-retries"), Some("3"));
        assert_eq!(sub.value_of("calls-per-minute"), Some("3"));
        assert_eq!(sub.value_of("timeout"), Some("20"));
    }
}
