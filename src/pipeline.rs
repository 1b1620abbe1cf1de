use chrono::NaiveDateTime;
use rand::Rng;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{DataError, Result};
use crate::fallback;
use crate::loader::{find_input, load_workbook};
use crate::normalize::SnapshotBuilder;
use crate::types::Snapshot;

/// Which path a refresh took to produce its snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Loaded { path: PathBuf, sheets: usize },
    MinimalFallback,
    RealisticFallback,
}

impl fmt::Display for RefreshOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshOutcome::Loaded { path, sheets } => {
                write!(f, "loaded {} sheet(s) from {}", sheets, path.display())
            }
            RefreshOutcome::MinimalFallback => f.write_str("no input, empty snapshot"),
            RefreshOutcome::RealisticFallback => {
                f.write_str("unreadable input, synthetic snapshot")
            }
        }
    }
}

/// Load, classify and normalize the first spreadsheet in `dir`.
pub fn load_snapshot<R: Rng + ?Sized>(
    dir: &Path,
    extensions: &[String],
    now: NaiveDateTime,
    rng: &mut R,
) -> Result<(Snapshot, RefreshOutcome)> {
    let path = find_input(dir, extensions)?;
    log::info!("Loading data from {}", path.display());
    let workbook = load_workbook(&path)?;
    log::info!("Read {} using the {:?} engine", path.display(), workbook.engine);
    let mut builder = SnapshotBuilder::new(now);
    for sheet in &workbook.sheets {
        builder.absorb(sheet, &mut *rng);
    }
    let outcome = RefreshOutcome::Loaded {
        path,
        sheets: workbook.sheets.len(),
    };
    Ok((builder.finish(), outcome))
}

/// Always yields a snapshot: missing input gives the minimal fallback, any
/// other failure the realistic one.
pub fn build_snapshot<R: Rng + ?Sized>(
    dir: &Path,
    extensions: &[String],
    now: NaiveDateTime,
    rng: &mut R,
) -> (Snapshot, RefreshOutcome) {
    match load_snapshot(dir, extensions, now, &mut *rng) {
        Ok(loaded) => loaded,
        Err(DataError::InputMissing { dir }) => {
            log::warn!(
                "No spreadsheet found in {}, installing empty data structure",
                dir.display()
            );
            (fallback::minimal(now), RefreshOutcome::MinimalFallback)
        }
        Err(e) => {
            log::warn!("{}; installing synthetic data", e);
            (
                fallback::realistic(now, rng),
                RefreshOutcome::RealisticFallback,
            )
        }
    }
}
