//! # Detections: one sensor sighting of a vehicle
//!
//! A [`Detection`] is the atomic input of the whole pipeline: a sensor code, the optional
//! vehicle id read by the sensor, the measured speed and the instant of the sighting.
//!
//! ## Overview
//! -----------------
//! * [`Detection`] – Immutable value type, built once from a raw record and then moved into a
//!   [`Trajectory`](crate::trajectories::Trajectory) (or the orphan list of the
//!   [`TrajectoryStore`](crate::trajectories::trajectory_store::TrajectoryStore)).
//! * [`RawDetection`] – The borrowed string fields of one raw record, before type conversion.
//! * [`csv_reader`] – Reader turning a `;`-separated detection file into [`Detection`]s.
//!
//! ## Conversion rules
//! -----------------
//! * **Speed:** a decimal comma is normalized to a decimal point before parsing (`"52,5"` → `52.5`).
//! * **Timestamp:** built from the separate date and time columns, civil **UTC**, one-second
//!   resolution (see [`date_time_to_epoch`]).
//! * **Vehicle id:** absent for incomplete records; such detections become *orphans*.
//!
//! No validation happens beyond type conversion: a record that converts is accepted as is.
use std::fmt;

use hifitime::Epoch;

use crate::{
    constants::{SensorCode, Speed, VehicleId},
    odflow_errors::ParseDetectionError,
    params::ReaderParams,
    time::date_time_to_epoch,
};

pub mod csv_reader;

/// A single sensor sighting.
///
/// # Fields
///
/// * `sensor_code` - Code of the sensor that produced the record
/// * `vehicle_id` - Identifier of the detected vehicle, `None` for incomplete records
/// * `speed` - Measured speed
/// * `timestamp` - Instant of the sighting (UTC)
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    sensor_code: SensorCode,
    vehicle_id: Option<VehicleId>,
    speed: Speed,
    timestamp: Epoch,
}

impl Detection {
    pub fn new(
        sensor_code: impl Into<SensorCode>,
        vehicle_id: Option<VehicleId>,
        speed: Speed,
        timestamp: Epoch,
    ) -> Self {
        Detection {
            sensor_code: sensor_code.into(),
            vehicle_id,
            speed,
            timestamp,
        }
    }

    pub fn sensor_code(&self) -> &str {
        &self.sensor_code
    }

    pub fn vehicle_id(&self) -> Option<&str> {
        self.vehicle_id.as_deref()
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn timestamp(&self) -> Epoch {
        self.timestamp
    }
}

impl fmt::Display for Detection {
    /// `"<sensor_code>@<timestamp> <speed>km/h"`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} {}km/h",
            self.sensor_code, self.timestamp, self.speed
        )
    }
}

/// String fields of one raw record, as extracted by a reader.
///
/// Fields borrow from the reader's buffer; [`RawDetection::to_detection`] performs the
/// type conversions and owns the result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawDetection<'a> {
    pub sensor_code: &'a str,
    pub date: &'a str,
    pub time: &'a str,
    pub speed: &'a str,
    pub vehicle_id: Option<&'a str>,
}

impl RawDetection<'_> {
    /// Convert the raw fields into a [`Detection`].
    ///
    /// Arguments
    /// -----------------
    /// * `params` – Reader configuration, used for the date and time separators.
    ///
    /// Return
    /// ----------
    /// * The converted [`Detection`], or the [`ParseDetectionError`] of the first field that
    ///   failed to convert (speed, then date, then time).
    pub fn to_detection(&self, params: &ReaderParams) -> Result<Detection, ParseDetectionError> {
        let speed = parse_speed(self.speed)?;
        let timestamp = date_time_to_epoch(
            self.date,
            self.time,
            params.date_separator,
            params.time_separator,
        )?;

        Ok(Detection::new(
            self.sensor_code,
            self.vehicle_id.map(str::to_string),
            speed,
            timestamp,
        ))
    }
}

/// Parse a speed field, accepting a decimal comma.
fn parse_speed(speed: &str) -> Result<Speed, ParseDetectionError> {
    speed
        .trim()
        .replace(',', ".")
        .parse::<Speed>()
        .map_err(|_| ParseDetectionError::InvalidSpeed(speed.to_string()))
}
