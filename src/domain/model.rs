use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use url::Url;

fn default_method() -> String {
    "GET".to_string()
}

/// 一個被監控的 HTTP 端點，啟動時載入後不再變動
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_method")]
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl EndpointDescriptor {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            name: None,
            method: default_method(),
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// 端點所屬的網域 (host[:port])
    pub fn domain(&self) -> String {
        domain_of(&self.url)
    }

    /// 日誌用的顯示名稱
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }
}

/// Network authority of a URL: host plus an explicit non-default port.
///
/// Scheme, path and query are ignored, so `https://fetch.com/a?x=1` and
/// `http://fetch.com/b` land on the same domain. Text that does not parse as a
/// URL is returned unchanged so it still gets its own counters entry.
pub fn domain_of(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match (parsed.host_str(), parsed.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => url.to_string(),
        },
        Err(_) => url.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub const ALLOWED: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// 大小寫不敏感地解析，不在允許清單內則回傳 None
    pub fn parse(raw: &str) -> Option<Self> {
        // 只轉大寫，前後空白視為無效方法
        let upper = raw.to_ascii_uppercase();
        Self::ALLOWED
            .iter()
            .copied()
            .find(|method| method.as_str() == upper)
    }

    /// Resolves a configured method, falling back to GET.
    ///
    /// The boolean is `true` when the fallback was taken and the caller should warn.
    pub fn resolve(raw: &str) -> (Self, bool) {
        match Self::parse(raw) {
            Some(method) => (method, false),
            None => (HttpMethod::Get, true),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Options => reqwest::Method::OPTIONS,
        }
    }
}

/// 單次探測的分類結果，交給聚合器後即丟棄
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    pub domain: String,
    pub status_code: Option<u16>,
    pub latency_seconds: Option<f64>,
    pub succeeded: bool,
}

impl ProbeOutcome {
    pub fn success(domain: impl Into<String>, status_code: u16, latency_seconds: f64) -> Self {
        Self {
            domain: domain.into(),
            status_code: Some(status_code),
            latency_seconds: Some(latency_seconds),
            succeeded: true,
        }
    }

    /// 有回應但被判定為失敗 (非 2xx 或超過延遲上限)
    pub fn rejected(domain: impl Into<String>, status_code: u16, latency_seconds: f64) -> Self {
        Self {
            domain: domain.into(),
            status_code: Some(status_code),
            latency_seconds: Some(latency_seconds),
            succeeded: false,
        }
    }

    /// 連線錯誤或逾時，沒有狀態碼
    pub fn unreachable(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            status_code: None,
            latency_seconds: None,
            succeeded: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainCounters {
    pub domain: String,
    pub total_attempts: u64,
    pub successful_attempts: u64,
}

impl DomainCounters {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            total_attempts: 0,
            successful_attempts: 0,
        }
    }

    /// Availability rounded half up to a whole percent.
    ///
    /// `None` until the first attempt is recorded.
    pub fn percentage(&self) -> Option<u64> {
        if self.total_attempts == 0 {
            return None;
        }
        let (s, t) = (self.successful_attempts, self.total_attempts);
        Some((200 * s + t) / (2 * t))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainAvailability {
    pub domain: String,
    pub successful_attempts: u64,
    pub total_attempts: u64,
    pub availability: u64,
}

impl fmt::Display for DomainAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} has {}% availability percentage",
            self.domain, self.availability
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundReport {
    pub round: u64,
    pub started_at: DateTime<Utc>,
    pub domains: Vec<DomainAvailability>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub rounds_completed: u64,
    pub last_report: Option<RoundReport>,
}
