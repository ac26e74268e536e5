use std::env;
use std::time::Duration;

/// Settings for the upstream Magic Studio endpoint.
///
/// The endpoint, headers and timing constants are fixed in production; the
/// builders exist so tests can point the client at a mock server and shrink
/// the waits.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub api_url: String,
    pub referer: String,
    pub origin: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub max_attempts: u32,
    pub key_retry_pause: Duration,
    pub transient_retry_pause: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        UpstreamConfig {
            api_url: "https://ai-api.magicstudio.com/api/ai-art-generator".to_string(),
            referer: "https://magicstudio.com/ai-art-generator/".to_string(),
            origin: "https://magicstudio.com".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            request_timeout: Duration::from_secs(30),
            max_attempts: 3,
            key_retry_pause: Duration::from_secs(1),
            transient_retry_pause: Duration::from_secs(2),
        }
    }
}

impl UpstreamConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_retry_pauses(mut self, key_pause: Duration, transient_pause: Duration) -> Self {
        self.key_retry_pause = key_pause;
        self.transient_retry_pause = transient_pause;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: Option<u16>,
    pub upstream: UpstreamConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: None,
            upstream: UpstreamConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let port = env::var("PORT").ok().and_then(|port| port.parse().ok());

        Config {
            port,
            upstream: UpstreamConfig::default(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_upstream(mut self, upstream: UpstreamConfig) -> Self {
        self.upstream = upstream;
        self
    }
}
