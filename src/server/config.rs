use std::env;

/// Engine configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    /// Sender address for outbound alert mail.
    pub alert_from_email: String,
    /// Optional last-resort recipient when no other destination resolves.
    pub alert_email: Option<String>,
    pub uptime_check_interval_secs: u64,
    pub expiry_check_interval_secs: u64,
    pub notification_dispatch_interval_secs: u64,
    pub uptime_probe_timeout_secs: u64,
    pub consecutive_down_threshold: usize,
    pub expiry_warning_days: i64,
    pub dispatch_batch_size: u64,
    pub renotify_while_open: bool,
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, String> {
        let smtp_host =
            env::var("SMTP_HOST").map_err(|_| "SMTP_HOST must be set".to_string())?;
        let smtp_user = env::var("SMTP_USER").ok().filter(|v| !v.is_empty());
        let smtp_pass = env::var("SMTP_PASS").ok().filter(|v| !v.is_empty());
        let alert_from_email = env::var("ALERT_FROM_EMAIL")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| smtp_user.clone())
            .ok_or_else(|| "ALERT_FROM_EMAIL or SMTP_USER must be set".to_string())?;

        Ok(Self {
            smtp_host,
            smtp_port: parse_env("SMTP_PORT", 587),
            smtp_user,
            smtp_pass,
            alert_from_email,
            alert_email: env::var("ALERT_EMAIL").ok().filter(|v| !v.is_empty()),
            uptime_check_interval_secs: parse_env("UPTIME_CHECK_INTERVAL_SECS", 21_600),
            expiry_check_interval_secs: parse_env("EXPIRY_CHECK_INTERVAL_SECS", 86_400),
            notification_dispatch_interval_secs: parse_env(
                "NOTIFICATION_DISPATCH_INTERVAL_SECS",
                60,
            ),
            uptime_probe_timeout_secs: parse_env("UPTIME_PROBE_TIMEOUT_SECS", 10),
            consecutive_down_threshold: parse_env("CONSECUTIVE_DOWN_THRESHOLD", 3),
            expiry_warning_days: parse_env("EXPIRY_WARNING_DAYS", 15),
            dispatch_batch_size: parse_env("DISPATCH_BATCH_SIZE", 20),
            renotify_while_open: parse_env("RENOTIFY_WHILE_OPEN", true),
        })
    }

    pub fn smtp_credentials(&self) -> Option<(String, String)> {
        match (&self.smtp_user, &self.smtp_pass) {
            (Some(user), Some(pass)) => Some((user.clone(), pass.clone())),
            _ => None,
        }
    }
}
