use crate::core::aggregator::AvailabilityAggregator;
use crate::domain::model::{EndpointDescriptor, RoundReport, RunSummary};
use crate::domain::ports::{Prober, Reporter};
use crate::utils::error::{MonitorError, Result};
use chrono::Utc;
use std::time::Duration;
use tokio::sync::watch;

/// Drives probing rounds on a fixed interval until told to stop.
///
/// A round is never interrupted: the stop signal is only observed before a
/// round starts and while sleeping between rounds.
pub struct RoundScheduler<P: Prober, R: Reporter> {
    endpoints: Vec<EndpointDescriptor>,
    prober: P,
    reporter: R,
    aggregator: AvailabilityAggregator,
    interval: Duration,
    max_rounds: Option<u64>,
    rounds_completed: u64,
}

impl<P: Prober, R: Reporter> RoundScheduler<P, R> {
    pub fn new(
        endpoints: Vec<EndpointDescriptor>,
        prober: P,
        reporter: R,
        interval: Duration,
    ) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(MonitorError::InvalidInput {
                message: "no endpoints to monitor".to_string(),
            });
        }

        Ok(Self {
            endpoints,
            prober,
            reporter,
            aggregator: AvailabilityAggregator::new(),
            interval,
            max_rounds: None,
            rounds_completed: 0,
        })
    }

    /// 限制最多執行幾輪，None 代表不限
    pub fn with_max_rounds(mut self, max_rounds: Option<u64>) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub async fn run_round(&mut self) -> Result<RoundReport> {
        let round = self.rounds_completed + 1;
        let started_at = Utc::now();
        tracing::debug!("🔄 Starting round {} ({} endpoints)", round, self.endpoints.len());

        self.reporter.round_started(round)?;

        // 依序探測，整輪結果都記錄完才輸出報告
        for endpoint in &self.endpoints {
            let outcome = self.prober.probe(endpoint).await;
            self.aggregator.record_outcome(&outcome);
        }

        let report = RoundReport {
            round,
            started_at,
            domains: self.aggregator.report(),
        };
        self.reporter.round_finished(&report)?;
        self.rounds_completed = round;

        Ok(report)
    }

    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<RunSummary> {
        let mut last_report = None;

        loop {
            if *shutdown.borrow() {
                tracing::info!("🛑 Stop requested before round {}", self.rounds_completed + 1);
                break;
            }

            last_report = Some(self.run_round().await?);

            if self
                .max_rounds
                .is_some_and(|max| self.rounds_completed >= max)
            {
                tracing::info!("🏁 Reached round limit of {}", self.rounds_completed);
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = wait_for_stop(&mut shutdown) => {
                    tracing::info!("🛑 Stop requested after round {}", self.rounds_completed);
                    break;
                }
            }

            self.reporter.round_separator()?;
        }

        Ok(RunSummary {
            rounds_completed: self.rounds_completed,
            last_report,
        })
    }

    pub fn aggregator(&self) -> &AvailabilityAggregator {
        &self.aggregator
    }

    pub fn rounds_completed(&self) -> u64 {
        self.rounds_completed
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }
}

/// 發送端被丟棄時視為永遠不會停止
async fn wait_for_stop(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}
