//! Health-surveillance data service: spreadsheet ingestion, a swappable
//! snapshot of national case data, derived dashboard views, and optional
//! weather and narrative collaborators.

pub mod classify;
pub mod config;
pub mod derive;
pub mod error;
pub mod fallback;
pub mod loader;
pub mod logger;
pub mod narrative;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod scheduler;
pub mod store;
pub mod types;
pub mod util;
pub mod weather;

pub use config::Config;
pub use error::{DataError, Result};
pub use pipeline::RefreshOutcome;
pub use store::HealthStore;
pub use types::{Alert, DashboardStats, LocationRecord, Snapshot, TrendPoint};
