//! In-memory baseline record
//!
//! Holds the raw record text exactly as a file would, so corrupt and
//! truncated records can be reproduced without touching disk.

use alloc::string::{String, ToString};

use super::{BaselineStore, CalibrationBaseline};
use crate::errors::StoreError;

/// Baseline store backed by a `String`
#[derive(Debug, Clone, Default)]
pub struct MemoryBaselineStore {
    record: Option<String>,
    saves: usize,
    reject_saves: bool,
}

impl MemoryBaselineStore {
    /// Store with no record
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with arbitrary record text, valid or not
    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            record: Some(record.into()),
            ..Self::default()
        }
    }

    /// Make every subsequent save fail (or succeed again)
    pub fn reject_saves(&mut self, reject: bool) {
        self.reject_saves = reject;
    }

    /// Raw record text, if any
    pub fn record(&self) -> Option<&str> {
        self.record.as_deref()
    }

    /// Number of successful saves
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl BaselineStore for MemoryBaselineStore {
    fn load(&self) -> Option<CalibrationBaseline> {
        let record = self.record.as_deref()?;
        match record.parse() {
            Ok(baseline) => Some(baseline),
            Err(e) => {
                log::warn!("ignoring in-memory baseline record {:?}: {}", record, e);
                None
            }
        }
    }

    fn save(&mut self, baseline: &CalibrationBaseline) -> Result<(), StoreError> {
        if self.reject_saves {
            return Err(StoreError::Unavailable {
                reason: "saves rejected",
            });
        }

        self.record = Some(baseline.to_string());
        self.saves += 1;
        Ok(())
    }
}
