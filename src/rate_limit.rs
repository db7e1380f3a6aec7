use std::time::{Duration, Instant};
use log::debug;
use tokio::sync::Mutex;

/// 简单的每分钟请求次数限流器，避免触发 Alpha Vantage 免费额度限制
pub struct RateLimiter {
    interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// 创建限流器，interval = 60s / calls_per_minute
    pub fn new(calls_per_minute: u32) -> Self {
        let calls = calls_per_minute.max(1);
        Self {
            interval: Duration::from_secs_f64(60.0 / calls as f64),
            last_request: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 等待请求频率限制。
    /// 锁跨越整个等待过程，时间戳在等待结束后记录，保证相邻请求的最小间隔。
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(instant) = *last {
            let elapsed = instant.elapsed();
            if elapsed < self.interval {
                let wait_time = self.interval - elapsed;
                debug!("等待 {:?} 以遵守频率限制", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }
        *last = Some(Instant::now());
    }
}
