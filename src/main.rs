use clap::Parser;
use small_uptime::config::prompt_for_path;
use small_uptime::core::shutdown::relay_interrupts;
use small_uptime::domain::ports::Reporter;
use small_uptime::utils::{logger, validation::Validate};
use small_uptime::{
    CliConfig, ConsoleReporter, EndpointList, HttpProber, JsonReporter, MonitorError,
    ReportFormat, RoundScheduler, RunSummary,
};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 不存在時不算錯誤
    let dotenv = dotenvy::dotenv();
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("🚀 Starting small-uptime");
    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let endpoints = match load_endpoints(&config).await {
        Ok(endpoints) => endpoints,
        Err(e) => {
            tracing::error!("❌ Failed to load endpoints: {}", e);
            for line in e.startup_diagnostic() {
                eprintln!("{}", line);
            }
            std::process::exit(e.exit_code());
        }
    };

    tracing::info!(
        "📋 Monitoring {} endpoints every {}s (timeout {}ms)",
        endpoints.len(),
        config.interval.unwrap_or_default(),
        config.timeout_ms
    );

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        // 第二次 Ctrl-C 直接結束，不等本輪跑完
        if relay_interrupts(tokio::signal::ctrl_c, stop_tx).await {
            std::process::exit(130);
        }
    });

    let result = match config.format {
        ReportFormat::Text => {
            run_monitor(&config, endpoints, ConsoleReporter::stdout(), stop_rx).await
        }
        ReportFormat::Json => {
            run_monitor(&config, endpoints, JsonReporter::stdout(), stop_rx).await
        }
    };

    match result {
        Ok(summary) => {
            tracing::info!("✅ Stopped after {} rounds", summary.rounds_completed);
            if let Some(report) = &summary.last_report {
                for line in &report.domains {
                    tracing::info!(
                        "📊 {} ({}/{} successful)",
                        line,
                        line.successful_attempts,
                        line.total_attempts
                    );
                }
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Monitoring failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

async fn load_endpoints(config: &CliConfig) -> small_uptime::Result<EndpointList> {
    let path = match &config.endpoints {
        Some(path) => path.clone(),
        None => tokio::task::spawn_blocking(|| {
            prompt_for_path(&mut std::io::stdin().lock(), &mut std::io::stdout())
        })
        .await
        .map_err(|e| MonitorError::ConfigError {
            message: format!("Failed to read the endpoint file path: {}", e),
        })??,
    };

    tracing::info!("📁 Loading endpoints from: {}", path);
    let endpoints = EndpointList::from_file(&path)?;
    endpoints.validate()?;
    Ok(endpoints)
}

async fn run_monitor<R: Reporter>(
    config: &CliConfig,
    endpoints: EndpointList,
    reporter: R,
    stop: watch::Receiver<bool>,
) -> small_uptime::Result<RunSummary> {
    let prober =
        HttpProber::new(config.timeout())?.with_latency_ceiling(config.latency_ceiling());

    let mut scheduler = RoundScheduler::new(
        endpoints.into_endpoints(),
        prober,
        reporter,
        config.interval()?,
    )?
    .with_max_rounds(config.rounds);

    scheduler.run(stop).await
}
