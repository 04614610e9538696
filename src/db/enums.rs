use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Last observed availability of a monitored target.
///
/// `Degraded` exists in the schema but is never assigned by the engine;
/// upstream logic owns that transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetStatus {
    Online,
    Degraded,
    Offline,
    Unknown,
}

impl TargetStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetStatus::Online => "online",
            TargetStatus::Degraded => "degraded",
            TargetStatus::Offline => "offline",
            TargetStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TargetStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(TargetStatus::Online),
            "degraded" => Ok(TargetStatus::Degraded),
            "offline" => Ok(TargetStatus::Offline),
            "unknown" => Ok(TargetStatus::Unknown),
            _ => Err(()),
        }
    }
}

/// Kind of check a sweep performs against a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckType {
    Uptime,
    Ssl,
    Domain,
}

impl CheckType {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckType::Uptime => "uptime",
            CheckType::Ssl => "ssl",
            CheckType::Domain => "domain",
        }
    }
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CheckType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uptime" => Ok(CheckType::Uptime),
            "ssl" => Ok(CheckType::Ssl),
            "domain" => Ok(CheckType::Domain),
            _ => Err(()),
        }
    }
}

/// Outcome classification of a single check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckStatus::Ok => "ok",
            CheckStatus::Warning => "warning",
            CheckStatus::Error => "error",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CheckStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ok" => Ok(CheckStatus::Ok),
            "warning" => Ok(CheckStatus::Warning),
            "error" => Ok(CheckStatus::Error),
            _ => Err(()),
        }
    }
}

/// Alert category, also used as the webhook event name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertType {
    UptimeDown,
    DomainExpiry,
    SslExpiry,
}

impl AlertType {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertType::UptimeDown => "uptime_down",
            AlertType::DomainExpiry => "domain_expiry",
            AlertType::SslExpiry => "ssl_expiry",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uptime_down" => Ok(AlertType::UptimeDown),
            "domain_expiry" => Ok(AlertType::DomainExpiry),
            "ssl_expiry" => Ok(AlertType::SslExpiry),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertStatus {
    Open,
    Closed,
}

impl AlertStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertStatus::Open => "open",
            AlertStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AlertStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(AlertStatus::Open),
            "closed" => Ok(AlertStatus::Closed),
            _ => Err(()),
        }
    }
}

/// Delivery medium for a queued notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationChannel {
    System,
    Email,
    Webhook,
}

impl NotificationChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationChannel::System => "system",
            NotificationChannel::Email => "email",
            NotificationChannel::Webhook => "webhook",
        }
    }
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationChannel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(NotificationChannel::System),
            "email" => Ok(NotificationChannel::Email),
            "webhook" => Ok(NotificationChannel::Webhook),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationStatus {
    Pending,
    Sent,
    Failed,
}

impl NotificationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationStatus::Pending => "pending",
            NotificationStatus::Sent => "sent",
            NotificationStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(NotificationStatus::Pending),
            "sent" => Ok(NotificationStatus::Sent),
            "failed" => Ok(NotificationStatus::Failed),
            _ => Err(()),
        }
    }
}

/// Which expiry date a parameterized expiry sweep inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryKind {
    Domain,
    Ssl,
}

impl ExpiryKind {
    pub fn check_type(self) -> CheckType {
        match self {
            ExpiryKind::Domain => CheckType::Domain,
            ExpiryKind::Ssl => CheckType::Ssl,
        }
    }

    pub fn alert_type(self) -> AlertType {
        match self {
            ExpiryKind::Domain => AlertType::DomainExpiry,
            ExpiryKind::Ssl => AlertType::SslExpiry,
        }
    }

    /// Human-readable subject noun used in check and alert messages.
    pub fn noun(self) -> &'static str {
        match self {
            ExpiryKind::Domain => "Domain",
            ExpiryKind::Ssl => "SSL certificate",
        }
    }
}
