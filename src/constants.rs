//! # Constants and type definitions for odflow
//!
//! Centralizes the **type aliases**, **container types** and **fixed values** shared by the
//! ingestion, trajectory and aggregation layers.
//!
//! ## Overview
//!
//! - Identifier aliases (sensor code, vehicle id, dense sensor index)
//! - Container type for the points of one trajectory
//! - Default raw-record layout (column indices and separators)
//! - Output file suffixes

use smallvec::SmallVec;

use crate::detections::Detection;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Code identifying a roadway sensor, as written in the raw records.
pub type SensorCode = String;

/// Identifier of a detected vehicle (plate hash, tag id, ...).
pub type VehicleId = String;

/// Dense matrix index assigned to a sensor code, contiguous in `[0, N)`.
pub type SensorIndex = usize;

/// Vehicle speed as reported by the sensor.
pub type Speed = f64;

/// Points of a single trajectory.
///
/// Most vehicles cross a handful of sensors per batch, so the first points live inline.
pub type Detections = SmallVec<[Detection; 8]>;

// -------------------------------------------------------------------------------------------------
// Raw record layout
// -------------------------------------------------------------------------------------------------

/// Field separator of the raw detection files.
pub const DEFAULT_SEPARATOR: u8 = b';';

/// Column holding the sensor code.
pub const SENSOR_CODE_INDEX: usize = 0;

/// Column holding the date (`YYYY-MM-DD`).
pub const DATE_INDEX: usize = 1;

/// Column holding the time of day (`HH:MM:SS`).
pub const TIME_INDEX: usize = 2;

/// Column holding the speed (decimal comma accepted).
pub const SPEED_INDEX: usize = 5;

/// Column holding the vehicle id; only present when the record has exactly `VEHICLE_ID_INDEX + 1` fields.
pub const VEHICLE_ID_INDEX: usize = 8;

/// Separator between the date components.
pub const DATE_SEPARATOR: char = '-';

/// Separator between the time components.
pub const TIME_SEPARATOR: char = ':';

// -------------------------------------------------------------------------------------------------
// Output files
// -------------------------------------------------------------------------------------------------

/// Suffix of the sensor code → index mapping file.
pub const IDS_SUFFIX: &str = "IDS";

/// Suffix of the OD count matrix dump.
pub const MATRIX_SUFFIX: &str = "MATRIX";

/// Suffix of the max travel time matrix dump.
pub const MAX_TIME_SUFFIX: &str = "MAXTIME";

/// Suffix of the sorted trajectory dump.
pub const TRAJ_SUFFIX: &str = "TRAJ";
