//! Background snapshot refresh.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::shared::SharedSnapshotService;

/// Lower bound on the refresh period.
const MIN_PERIOD: Duration = Duration::from_secs(1);

/// Starts the refresh loop; the first run happens one `period` after start.
///
/// Each run goes to whichever service is current at that tick. A run that
/// panics is logged and the loop carries on.
pub fn start_refresh_scheduler(
    shared: Arc<SharedSnapshotService>,
    period: Duration,
) -> JoinHandle<()> {
    let period = period.max(MIN_PERIOD);
    tokio::spawn(async move {
        info!("Snapshot refresh scheduler started ({:?} interval)", period);

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            run_refresh(&shared).await;
        }
    })
}

async fn run_refresh(shared: &SharedSnapshotService) {
    let service = shared.current().await;
    match tokio::spawn(async move { service.refresh().await }).await {
        Ok(Some(snapshot)) => debug!(
            "Background refresh done: {} indices, {} calendar events",
            snapshot.indices.len(),
            snapshot.calendar.events.len()
        ),
        Ok(None) => debug!("Background refresh skipped"),
        Err(e) => error!("Error in background refresh: {}", e),
    }
}
