use thiserror::Error;

use crate::constants::{SensorCode, VehicleId};

/// Line-level parsing errors for raw detection records.
///
/// Variants
/// -----------------
/// * `MissingField` – The record has no column at `index`.
/// * `InvalidSpeed` – The speed column is not a number (after decimal-comma normalization).
/// * `InvalidDate` – The date column is not `YYYY<sep>MM<sep>DD`; payload carries the offending text.
/// * `InvalidTime` – The time column is not `HH<sep>MM<sep>SS`; payload carries the offending text.
/// * `InvalidDateTime` – Components parsed but do not form a calendar instant.
#[derive(Error, Debug, PartialEq)]
pub enum ParseDetectionError {
    #[error("Missing field at column {index}")]
    MissingField { index: usize },
    #[error("Invalid speed value: {0}")]
    InvalidSpeed(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid time: {0}")]
    InvalidTime(String),
    #[error("Invalid date-time: {0}")]
    InvalidDateTime(String),
}

#[derive(Error, Debug)]
pub enum OdFlowError {
    #[error("Error while parsing detection at line {line}: {source}")]
    Parse {
        line: u64,
        #[source]
        source: ParseDetectionError,
    },

    #[error("Trajectory has no points (vehicle: {0})")]
    EmptyTrajectory(VehicleId),

    #[error("Sensor code not registered: {0}")]
    UnknownSensorCode(SensorCode),

    #[error("Vehicle id mismatch on append: trajectory {expected:?}, point {found:?}")]
    VehicleIdMismatch {
        expected: Option<VehicleId>,
        found: Option<VehicleId>,
    },

    #[error("Invalid reader parameter: {0}")]
    InvalidReaderParameter(String),

    #[error("Invalid batch parameter: {0}")]
    InvalidBatchParameter(String),

    #[error("OD matrices have not been generated for the current batch")]
    MatrixNotGenerated,

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid file name pattern: {0}")]
    InvalidFilePattern(#[from] regex::Error),

    #[error("UTF-8 Path error: {0}")]
    Utf8PathError(String),

    #[error("Directory traversal error: {0}")]
    WalkDirError(#[from] walkdir::Error),
}

impl PartialEq for OdFlowError {
    fn eq(&self, other: &Self) -> bool {
        use OdFlowError::*;
        match (self, other) {
            (
                Parse {
                    line: l1,
                    source: s1,
                },
                Parse {
                    line: l2,
                    source: s2,
                },
            ) => l1 == l2 && s1 == s2,
            (EmptyTrajectory(a), EmptyTrajectory(b)) => a == b,
            (UnknownSensorCode(a), UnknownSensorCode(b)) => a == b,
            (
                VehicleIdMismatch {
                    expected: e1,
                    found: f1,
                },
                VehicleIdMismatch {
                    expected: e2,
                    found: f2,
                },
            ) => e1 == e2 && f1 == f2,
            (InvalidReaderParameter(a), InvalidReaderParameter(b)) => a == b,
            (InvalidBatchParameter(a), InvalidBatchParameter(b)) => a == b,
            (Utf8PathError(a), Utf8PathError(b)) => a == b,

            // Not comparable: equal when the variant matches
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (InvalidFilePattern(_), InvalidFilePattern(_)) => true,
            (WalkDirError(_), WalkDirError(_)) => true,

            (MatrixNotGenerated, MatrixNotGenerated) => true,

            _ => false,
        }
    }
}
