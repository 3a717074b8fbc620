use std::future::Future;
use tokio::sync::watch;

/// Forwards interrupts to the scheduler's stop channel.
///
/// The first interrupt asks the scheduler to stop after the current round.
/// A second one returns `true` so the caller can exit immediately. Returns
/// `false` if the interrupt listener itself fails.
pub async fn relay_interrupts<F, Fut>(mut next_interrupt: F, stop: watch::Sender<bool>) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = next_interrupt().await {
        tracing::warn!("⚠️ Unable to listen for interrupts: {}", e);
        return false;
    }
    tracing::info!("🛑 Interrupt received, stopping after the current round");
    let _ = stop.send(true);

    match next_interrupt().await {
        Ok(()) => {
            tracing::warn!("⚠️ Second interrupt received, exiting immediately");
            true
        }
        Err(e) => {
            tracing::warn!("⚠️ Unable to listen for interrupts: {}", e);
            false
        }
    }
}
