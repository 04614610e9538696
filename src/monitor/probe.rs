use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Outcome of one reachability probe. Failures are data, never errors:
/// `response_time_ms` always carries the elapsed wall time, including up to
/// the point of a timeout or connection failure.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub ok: bool,
    pub status_code: Option<u16>,
    pub response_time_ms: i32,
    pub error: Option<String>,
}

/// Issues one bounded-timeout reachability probe against a URL.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeOutcome;
}

/// HTTP prober backed by a reqwest client with a request-level timeout.
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        let start = Instant::now();
        match self.client.get(url).send().await {
            Ok(response) => {
                let response_time_ms = start.elapsed().as_millis() as i32;
                let code = response.status().as_u16();
                ProbeOutcome {
                    // A reachable server is up even when it answers 4xx;
                    // only 5xx counts as down.
                    ok: code < 500,
                    status_code: Some(code),
                    response_time_ms,
                    error: None,
                }
            }
            Err(e) => {
                let response_time_ms = start.elapsed().as_millis() as i32;
                let error = if e.is_timeout() {
                    "timeout".to_string()
                } else {
                    e.to_string()
                };
                ProbeOutcome {
                    ok: false,
                    status_code: None,
                    response_time_ms,
                    error: Some(error),
                }
            }
        }
    }
}
