/// Alpha Vantage 日线接口的数据量选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSize {
    /// 约最近100条
    Compact,
    /// 全量历史
    Full,
}

impl OutputSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputSize::Compact => "compact",
            OutputSize::Full => "full",
        }
    }
}

pub struct Config {
    pub calls_per_minute: u32,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub output_size: OutputSize,
    pub adjusted: bool,
    pub no_proxy: bool,
}

impl Config {
    pub fn new() -> Self {
        Self {
            calls_per_minute: 5,
            timeout_secs: 30,
            max_retries: 3,
            output_size: OutputSize::Full,
            adjusted: false,
            no_proxy: false,
        }
    }

    pub fn with_calls_per_minute(mut self, calls_per_minute: u32) -> Self {
        self.calls_per_minute = calls_per_minute;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_output_size(mut self, output_size: OutputSize) -> Self {
        self.output_size = output_size;
        self
    }

    pub fn with_adjusted(mut self, adjusted: bool) -> Self {
        self.adjusted = adjusted;
        self
    }

    pub fn with_no_proxy(mut self, no_proxy: bool) -> Self {
        self.no_proxy = no_proxy;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
