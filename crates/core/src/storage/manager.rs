use std::path::{Path, PathBuf};

use crate::errors::CoreError;
use crate::models::record::{HoldingRecord, SectorRecord, Snapshot};
use crate::models::settings::Settings;

use super::snapshot;

/// High-level snapshot operations: the two output files as one unit.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    stocks_path: PathBuf,
    sectors_path: PathBuf,
}

impl SnapshotStore {
    pub fn new(stocks_path: impl Into<PathBuf>, sectors_path: impl Into<PathBuf>) -> Self {
        Self {
            stocks_path: stocks_path.into(),
            sectors_path: sectors_path.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.stocks_path.clone(), settings.sectors_path.clone())
    }

    pub fn stocks_path(&self) -> &Path {
        &self.stocks_path
    }

    pub fn sectors_path(&self) -> &Path {
        &self.sectors_path
    }

    /// Overwrite both snapshot files. Holdings are written first.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), CoreError> {
        snapshot::write_table(&snapshot.holdings, &self.stocks_path)?;
        snapshot::write_table(&snapshot.sectors, &self.sectors_path)?;
        Ok(())
    }

    /// Load both tables back.
    pub fn load(&self) -> Result<Snapshot, CoreError> {
        let holdings: Vec<HoldingRecord> = snapshot::read_table(&self.stocks_path)?;
        let sectors: Vec<SectorRecord> = snapshot::read_table(&self.sectors_path)?;
        Ok(Snapshot { holdings, sectors })
    }
}
