//! Periodic background refresh of the health store.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::store::HealthStore;

/// Refresh `store` every `every`, starting one period from now.
///
/// The refresh itself reads files, so it runs on the blocking pool. A failed
/// or panicking refresh is logged and the loop keeps going.
pub fn spawn_refresh_loop(store: Arc<HealthStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            sleep(every).await;
            log::info!("Scheduled health data refresh");
            let store = Arc::clone(&store);
            match tokio::task::spawn_blocking(move || store.refresh()).await {
                Ok(outcome) => log::info!("Scheduled refresh done: {}", outcome),
                Err(e) => log::error!("Scheduled refresh failed: {}", e),
            }
        }
    })
}
