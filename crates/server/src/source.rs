use std::path::Path;

use portfolio_snapshot_core::errors::CoreError;
use portfolio_snapshot_core::storage::snapshot;

/// Where the server gets snapshot documents from.
///
/// The default reads the file from disk on every call. Tests inject their
/// own implementation to exercise handlers without touching the filesystem.
pub trait SnapshotSource: Send + Sync {
    fn read(&self, path: &Path) -> Result<serde_json::Value, CoreError>;
}

/// Reads and parses the JSON file at `path`. No caching: every call opens,
/// reads and closes the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSnapshotSource;

impl SnapshotSource for FileSnapshotSource {
    fn read(&self, path: &Path) -> Result<serde_json::Value, CoreError> {
        snapshot::read_raw(path)
    }
}
