//! The process-wide home of the current snapshot.
//!
//! Readers clone an `Arc` under a short read lock and then work on their own
//! handle, so a refresh never exposes a half-built snapshot: the new one is
//! built off to the side and swapped in whole. Refreshes are serialized on a
//! mutex that also guards the random source; a second trigger waits for the
//! first to finish.

use chrono::Local;
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::derive;
use crate::fallback;
use crate::pipeline::{build_snapshot, RefreshOutcome};
use crate::types::{
    Alert, DashboardStats, DiseaseSurveillance, HighRiskArea, LocationRecord, Snapshot, TrendPoint,
};

pub struct HealthStore {
    data_dir: PathBuf,
    extensions: Vec<String>,
    current: RwLock<Arc<Snapshot>>,
    refresh: Mutex<StdRng>,
}

impl HealthStore {
    /// A store holding the minimal snapshot until the first refresh.
    pub fn new(config: &Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        HealthStore::with_rng(config, rng)
    }

    pub fn with_rng(config: &Config, rng: StdRng) -> Self {
        HealthStore {
            data_dir: config.data_dir.clone(),
            extensions: config.extensions.clone(),
            current: RwLock::new(Arc::new(fallback::minimal(Local::now().naive_local()))),
            refresh: Mutex::new(rng),
        }
    }

    /// Construct and run the first refresh.
    pub fn open(config: &Config) -> Self {
        let store = HealthStore::new(config);
        store.refresh();
        store
    }

    /// Rebuild the snapshot from the data directory and install it.
    pub fn refresh(&self) -> RefreshOutcome {
        let mut rng = self.refresh.lock();
        log::info!("Refreshing data from {}", self.data_dir.display());
        let now = Local::now().naive_local();
        let (snapshot, outcome) = build_snapshot(&self.data_dir, &self.extensions, now, &mut *rng);
        log::info!(
            "Installed snapshot ({}): {} diseases summarized, {} series, {} locations",
            outcome,
            snapshot.national_summary.len(),
            snapshot.disease_trends.len(),
            snapshot.map_data.len()
        );
        *self.current.write() = Arc::new(snapshot);
        outcome
    }

    pub fn get_current_snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read())
    }

    pub fn get_dashboard_stats(&self) -> DashboardStats {
        self.get_current_snapshot().dashboard_stats.clone()
    }

    pub fn get_disease_trends(&self) -> BTreeMap<String, Vec<TrendPoint>> {
        self.get_current_snapshot().disease_trends.clone()
    }

    pub fn get_map_data(&self) -> Vec<LocationRecord> {
        self.get_current_snapshot().map_data.clone()
    }

    /// Alerts read from the source first, then the threshold alerts.
    pub fn get_alerts(&self) -> Vec<Alert> {
        let snapshot = self.get_current_snapshot();
        let mut alerts = snapshot.alerts.clone();
        alerts.extend(derive::alerts(&snapshot));
        alerts
    }

    pub fn get_high_risk_areas(&self) -> Vec<HighRiskArea> {
        derive::high_risk_areas(&self.get_current_snapshot(), derive::DEFAULT_HIGH_RISK_COUNT)
    }

    pub fn get_disease_surveillance(&self) -> DiseaseSurveillance {
        derive::disease_surveillance(&self.get_current_snapshot())
    }
}
