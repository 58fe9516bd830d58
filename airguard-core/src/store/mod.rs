//! Gas sensor baseline checkpoint
//!
//! The only durable state the daemon keeps. A record is one line of text:
//!
//! ```text
//! <eCO2 baseline>,<TVOC baseline>
//! ```
//!
//! Both values are opaque 16-bit counters owned by the gas sensor. They are
//! stored, loaded and logged, never interpreted.
//!
//! ## Recovery
//!
//! Saves are plain overwrites with no versioning or locking. A crash
//! mid-write can leave a truncated record; `load` reports any unreadable
//! record as "not found" so the node comes back uncalibrated instead of
//! crash-looping on a corrupt file.
//!
//! ## Submodules
//! - `memory` - in-memory record for tests and hosts without storage
//! - `file` - single file on disk (requires `std`)

use core::fmt;
use core::str::FromStr;

use thiserror_no_std::Error;

use crate::errors::StoreError;

pub mod memory;

#[cfg(feature = "std")]
pub mod file;

pub use memory::MemoryBaselineStore;

#[cfg(feature = "std")]
pub use file::FileBaselineStore;

/// Gas sensor drift-compensation counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CalibrationBaseline {
    /// eCO2 baseline counter
    pub eco2: u16,
    /// TVOC baseline counter
    pub tvoc: u16,
}

impl CalibrationBaseline {
    /// Baseline from raw counters
    pub const fn new(eco2: u16, tvoc: u16) -> Self {
        Self { eco2, tvoc }
    }
}

impl fmt::Display for CalibrationBaseline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.eco2, self.tvoc)
    }
}

/// Why a record could not be read back
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineParseError {
    /// Not exactly two comma separated fields
    #[error("expected 2 comma separated fields, found {found}")]
    FieldCount {
        /// Number of fields present
        found: usize,
    },

    /// A field is not a decimal 16-bit counter
    #[error("{field} is not a 16-bit decimal counter")]
    InvalidField {
        /// Which field failed
        field: &'static str,
    },
}

impl FromStr for CalibrationBaseline {
    type Err = BaselineParseError;

    fn from_str(record: &str) -> Result<Self, Self::Err> {
        let mut fields = record.split(',');
        let (eco2, tvoc) = match (fields.next(), fields.next(), fields.next()) {
            (Some(eco2), Some(tvoc), None) => (eco2, tvoc),
            _ => {
                return Err(BaselineParseError::FieldCount {
                    found: record.split(',').count(),
                })
            }
        };

        Ok(Self {
            eco2: parse_counter(eco2, "eCO2")?,
            tvoc: parse_counter(tvoc, "TVOC")?,
        })
    }
}

fn parse_counter(field: &str, name: &'static str) -> Result<u16, BaselineParseError> {
    field
        .trim()
        .parse()
        .map_err(|_| BaselineParseError::InvalidField { field: name })
}

/// Durable home of the baseline checkpoint
///
/// Single writer, single reader, both the daemon itself.
pub trait BaselineStore {
    /// Read the checkpoint
    ///
    /// Missing, empty and corrupt records all come back as `None`. This must
    /// never fail the caller.
    fn load(&self) -> Option<CalibrationBaseline>;

    /// Overwrite the checkpoint
    fn save(&mut self, baseline: &CalibrationBaseline) -> Result<(), StoreError>;
}
