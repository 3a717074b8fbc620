use crate::domain::model::{EndpointDescriptor, HttpMethod, ProbeOutcome};
use crate::domain::ports::Prober;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

/// 2xx 視為成功，其餘 (含 1xx、3xx) 皆為失敗
pub fn classify_status(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Decides whether a received response counts as available.
///
/// Without a latency ceiling only the status code matters; the transport
/// timeout already bounds how slow a counted response can be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeClassifier {
    latency_ceiling: Option<Duration>,
}

impl ProbeClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency_ceiling(mut self, ceiling: Option<Duration>) -> Self {
        self.latency_ceiling = ceiling;
        self
    }

    pub fn classify(&self, status: u16, latency: Duration) -> bool {
        if !classify_status(status) {
            return false;
        }
        match self.latency_ceiling {
            Some(ceiling) => latency < ceiling,
            None => true,
        }
    }
}

pub struct HttpProber {
    client: Client,
    classifier: ProbeClassifier,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            classifier: ProbeClassifier::new(),
        })
    }

    pub fn with_latency_ceiling(mut self, ceiling: Option<Duration>) -> Self {
        self.classifier = self.classifier.with_latency_ceiling(ceiling);
        self
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, endpoint: &EndpointDescriptor) -> ProbeOutcome {
        let domain = endpoint.domain();

        let (method, fell_back) = HttpMethod::resolve(&endpoint.method);
        if fell_back {
            tracing::warn!(
                "⚠️ Invalid HTTP method '{}' specified for {}. Defaulting to 'GET'",
                endpoint.method,
                endpoint.label()
            );
        }

        let mut request = self.client.request(method.into(), endpoint.url.as_str());
        for (key, value) in &endpoint.headers {
            request = request.header(key, value);
        }
        if let Some(body) = &endpoint.body {
            request = request.body(body.clone());
        }

        let started = Instant::now();
        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                // 延遲計到整個 body 讀完為止，body 讀取同樣受逾時限制
                if let Err(e) = response.bytes().await {
                    tracing::warn!(
                        "⚠️ Reading response from {} failed: {}",
                        endpoint.label(),
                        e
                    );
                    return ProbeOutcome::unreachable(domain);
                }
                let latency = started.elapsed();
                let latency_seconds = latency.as_secs_f64();

                tracing::debug!(
                    "{} {} -> {} in {:.3}s",
                    method,
                    endpoint.label(),
                    status,
                    latency_seconds
                );

                if self.classifier.classify(status, latency) {
                    ProbeOutcome::success(domain, status, latency_seconds)
                } else {
                    ProbeOutcome::rejected(domain, status, latency_seconds)
                }
            }
            Err(e) => {
                tracing::warn!("⚠️ Request to {} failed: {}", endpoint.label(), e);
                ProbeOutcome::unreachable(domain)
            }
        }
    }
}
