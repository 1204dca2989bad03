//! Run-time replacement of the acceleration curve.
//!
//! A calibration link can deliver a new accel table between control cycles.
//! The engine only swaps when the link reports a clean read and the table
//! has the accel-curve shape; anything else puts the reference curve back.

use ecu_lut::LookupTable;
use serde::{Deserialize, Serialize};

use crate::error::TorqueError;
use crate::tables::validate_accel_table;
use crate::torque::TorqueEngine;

/// Outcome of reading a calibration file, as reported by the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FileStatus {
    /// File read and key phrase matched.
    PresentAndValid = 0,
    /// No calibration file.
    NotPresent = 1,
    /// Key phrase did not match.
    InvalidKeyPhrase = 2,
    /// The link failed while logging.
    LoggingError = 3,
    /// The file exists but could not be opened.
    FileOpenError = 4,
}

impl TryFrom<u8> for FileStatus {
    type Error = TorqueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::PresentAndValid),
            1 => Ok(Self::NotPresent),
            2 => Ok(Self::InvalidKeyPhrase),
            3 => Ok(Self::LoggingError),
            4 => Ok(Self::FileOpenError),
            other => Err(TorqueError::UnknownFileStatus(other)),
        }
    }
}

/// A candidate accel table delivered by the calibration link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccelTableUpdate {
    /// Link-side read status.
    pub status: FileStatus,
    /// Identifier echoed back on acceptance.
    pub lut_id: u8,
    /// The table itself, absent when the read failed.
    #[serde(default)]
    pub table: Option<LookupTable>,
}

impl TorqueEngine {
    /// Apply an accel table update and return the response for the link.
    ///
    /// Responds with `lut_id` when the table was installed, and `0` after
    /// reverting to the reference accel curve. Id `0` names the reference
    /// curve, so an update carrying it is rejected.
    pub fn apply_accel_update(&mut self, update: AccelTableUpdate) -> u8 {
        let AccelTableUpdate {
            status,
            lut_id,
            table,
        } = update;

        let rejection = match (status, table) {
            (FileStatus::PresentAndValid, Some(_)) if lut_id == 0 => {
                "id 0 is reserved for the reference table".to_owned()
            }
            (FileStatus::PresentAndValid, Some(table)) => match validate_accel_table(&table) {
                Ok(()) => {
                    tracing::info!(lut_id, entries = table.len(), "Accel table replaced");
                    self.tables.accel = table;
                    self.accel_table_id = lut_id;
                    return lut_id;
                }
                Err(e) => e.to_string(),
            },
            (FileStatus::PresentAndValid, None) => "no table supplied".to_owned(),
            (status, _) => format!("link reported {status:?}"),
        };

        tracing::warn!(lut_id, reason = %rejection, "Accel table rejected, reverting to reference");
        self.tables.accel = self.reference_accel.clone();
        self.accel_table_id = 0;
        0
    }

    /// Identifier of the installed accel table, `0` for the reference curve.
    #[must_use]
    pub fn accel_table_id(&self) -> u8 {
        self.accel_table_id
    }
}
