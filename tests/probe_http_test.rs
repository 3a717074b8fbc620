use anyhow::Result;
use httpmock::prelude::*;
use small_uptime::domain::ports::Prober;
use small_uptime::{ConsoleReporter, EndpointDescriptor, HttpProber, RoundScheduler};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 收集 tracing 輸出，方便檢查警告訊息
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn prober() -> Result<HttpProber> {
    Ok(HttpProber::new(Duration::from_millis(500))?)
}

fn domain_of(server: &MockServer) -> String {
    format!("{}:{}", server.host(), server.port())
}

#[tokio::test]
async fn test_2xx_response_is_success() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/health");
            then.status(200);
        })
        .await;

    let outcome = prober()?
        .probe(&EndpointDescriptor::new(server.url("/health?verbose=1")))
        .await;

    mock.assert_async().await;
    assert!(outcome.succeeded);
    assert_eq!(outcome.status_code, Some(200));
    assert_eq!(outcome.domain, domain_of(&server));
    assert!(outcome.latency_seconds.is_some_and(|s| s >= 0.0));
    Ok(())
}

#[tokio::test]
async fn test_status_code_boundaries() -> Result<()> {
    let server = MockServer::start_async().await;
    for code in [200u16, 299, 300, 503] {
        server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/status/{}", code));
                then.status(code);
            })
            .await;
    }

    let prober = prober()?;
    let mut results = Vec::new();
    for code in [200u16, 299, 300, 503] {
        let endpoint = EndpointDescriptor::new(server.url(format!("/status/{}", code)));
        let outcome = prober.probe(&endpoint).await;
        assert_eq!(outcome.status_code, Some(code));
        results.push((code, outcome.succeeded));
    }

    assert_eq!(
        results,
        vec![(200, true), (299, true), (300, false), (503, false)]
    );
    Ok(())
}

#[tokio::test]
async fn test_invalid_method_falls_back_to_get() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(200);
        })
        .await;

    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let endpoint = EndpointDescriptor::new(server.url("/")).with_method("FOO");
    let mut scheduler = RoundScheduler::new(
        vec![endpoint],
        prober()?,
        ConsoleReporter::new(Vec::new()),
        Duration::ZERO,
    )?;
    let report = scheduler.run_round().await?;

    mock.assert_hits_async(1).await;
    assert!(logs.contents().contains("Invalid HTTP method 'FOO'"));

    let counters = scheduler.aggregator().counters(&domain_of(&server)).unwrap();
    assert_eq!(counters.total_attempts, 1);
    assert_eq!(counters.successful_attempts, 1);
    assert_eq!(report.domains[0].availability, 100);
    Ok(())
}

#[tokio::test]
async fn test_response_body_is_read_before_success() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/page");
            then.status(200).body("x".repeat(64 * 1024));
        })
        .await;

    let outcome = prober()?
        .probe(&EndpointDescriptor::new(server.url("/page")))
        .await;

    mock.assert_async().await;
    assert!(outcome.succeeded);
    assert!(outcome.latency_seconds.is_some_and(|s| s >= 0.0));
    Ok(())
}

#[tokio::test]
async fn test_method_headers_and_body_are_passed_through() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/some/post/endpoint")
                .header("content-type", "application/json")
                .header("user-agent", "fetch-synthetic-monitor")
                .body(r#"{"foo":"bar"}"#);
            then.status(201);
        })
        .await;

    let endpoint = EndpointDescriptor::new(server.url("/some/post/endpoint"))
        .with_name("fake post endpoint")
        .with_method("post")
        .with_header("content-type", "application/json")
        .with_header("user-agent", "fetch-synthetic-monitor")
        .with_body(r#"{"foo":"bar"}"#);

    let outcome = prober()?.probe(&endpoint).await;

    mock.assert_async().await;
    assert!(outcome.succeeded);
    assert_eq!(outcome.status_code, Some(201));
    Ok(())
}

#[tokio::test]
async fn test_timeout_is_a_failure_without_status() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).delay(Duration::from_millis(800));
        })
        .await;

    let prober = HttpProber::new(Duration::from_millis(100))?;
    let outcome = prober.probe(&EndpointDescriptor::new(server.url("/slow"))).await;

    assert!(!outcome.succeeded);
    assert_eq!(outcome.status_code, None);
    assert_eq!(outcome.latency_seconds, None);
    Ok(())
}

#[tokio::test]
async fn test_latency_ceiling_rejects_slow_success() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/sluggish");
            then.status(200).delay(Duration::from_millis(200));
        })
        .await;

    let prober = HttpProber::new(Duration::from_secs(2))?
        .with_latency_ceiling(Some(Duration::from_millis(50)));
    let outcome = prober
        .probe(&EndpointDescriptor::new(server.url("/sluggish")))
        .await;

    assert!(!outcome.succeeded);
    assert_eq!(outcome.status_code, Some(200));
    assert!(outcome.latency_seconds.is_some_and(|s| s >= 0.05));
    Ok(())
}
