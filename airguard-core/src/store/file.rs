//! File-backed baseline record
//!
//! The record lives in one small text file. Writes replace the whole file
//! in place (truncate + write), which is not atomic: a power cut during
//! `save` can leave a partial record behind. `load` treats that the same as
//! a missing file.
//!
//! ## Example
//!
//! ```rust,no_run
//! use airguard_core::store::{BaselineStore, CalibrationBaseline, FileBaselineStore};
//!
//! let mut store = FileBaselineStore::new("/opt/tvoc/baseline.dat");
//! if store.load().is_none() {
//!     // start uncalibrated
//! }
//! store.save(&CalibrationBaseline::new(35187, 36821))?;
//! # Ok::<(), airguard_core::StoreError>(())
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{BaselineStore, CalibrationBaseline};
use crate::errors::StoreError;

/// Baseline store backed by a single file
#[derive(Debug, Clone)]
pub struct FileBaselineStore {
    path: PathBuf,
}

impl FileBaselineStore {
    /// Store at `path`; the file need not exist yet, its directory must
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the record
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BaselineStore for FileBaselineStore {
    fn load(&self) -> Option<CalibrationBaseline> {
        let record = match fs::read_to_string(&self.path) {
            Ok(record) => record,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("no baseline record at {}", self.path.display());
                return None;
            }
            Err(e) => {
                log::warn!(
                    "baseline record at {} unreadable: {}",
                    self.path.display(),
                    e
                );
                return None;
            }
        };

        match record.parse() {
            Ok(baseline) => Some(baseline),
            Err(e) => {
                log::warn!(
                    "baseline record at {} is corrupt ({:?}): {}",
                    self.path.display(),
                    record,
                    e
                );
                None
            }
        }
    }

    fn save(&mut self, baseline: &CalibrationBaseline) -> Result<(), StoreError> {
        fs::write(&self.path, baseline.to_string())?;
        log::debug!("wrote baseline {} to {}", baseline, self.path.display());
        Ok(())
    }
}
