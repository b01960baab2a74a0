//! # Raw detection file reader
//!
//! Reads `;`-separated sensor logs (no header line) into [`Detection`]s.
//!
//! ## Record layout
//! -----------------
//! With the default [`ReaderParams`]:
//!
//! | column | content                          |
//! |--------|----------------------------------|
//! | 0      | sensor code                      |
//! | 1      | date `YYYY-MM-DD`                |
//! | 2      | time `HH:MM:SS`                  |
//! | 5      | speed (decimal comma accepted)   |
//! | 8      | vehicle id (optional)            |
//!
//! Other columns are ignored. The vehicle id is read only when the record has exactly
//! [`ReaderParams::full_record_len`] fields and the field is not blank; any other record length leaves the
//! detection without a vehicle id. A record too short to hold the sensor code, date, time or
//! speed columns is a parse error.
//!
//! ## Error Handling
//! -----------------
//! Reading is **fail-fast**: the first malformed record aborts the whole file with
//! [`OdFlowError::Parse`] (carrying the 1-based line number). Callers get either every
//! detection of the file or none.
use std::io;

use camino::Utf8Path;
use csv::{ReaderBuilder, StringRecord};

use crate::{
    detections::{Detection, RawDetection},
    odflow_errors::{OdFlowError, ParseDetectionError},
    params::ReaderParams,
};

fn field<'a>(record: &'a StringRecord, index: usize) -> Result<&'a str, ParseDetectionError> {
    record
        .get(index)
        .ok_or(ParseDetectionError::MissingField { index })
}

/// Extract the raw fields of one record.
pub(crate) fn raw_from_record<'a>(
    record: &'a StringRecord,
    params: &ReaderParams,
) -> Result<RawDetection<'a>, ParseDetectionError> {
    let vehicle_id = if record.len() == params.full_record_len() {
        record
            .get(params.vehicle_id_index)
            .filter(|id| !id.trim().is_empty())
    } else {
        None
    };

    Ok(RawDetection {
        sensor_code: field(record, params.sensor_code_index)?,
        date: field(record, params.date_index)?,
        time: field(record, params.time_index)?,
        speed: field(record, params.speed_index)?,
        vehicle_id,
    })
}

/// Read every detection of a raw log.
///
/// Arguments
/// -----------------
/// * `reader` – Source of the raw log (file, in-memory buffer, ...).
/// * `params` – Record layout.
///
/// Return
/// ----------
/// * All detections in file order, or the first error met (I/O, CSV framing, or
///   [`OdFlowError::Parse`]).
pub fn read_detections<R: io::Read>(
    reader: R,
    params: &ReaderParams,
) -> Result<Vec<Detection>, OdFlowError> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(params.separator)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut detections = Vec::new();
    let mut record = StringRecord::new();
    let mut line = 0;

    while csv_reader.read_record(&mut record)? {
        line = record.position().map_or(line + 1, |pos| pos.line());
        let detection = raw_from_record(&record, params)
            .and_then(|raw| raw.to_detection(params))
            .map_err(|source| OdFlowError::Parse { line, source })?;
        detections.push(detection);
    }

    Ok(detections)
}

/// Read every detection of the raw log at `path`.
///
/// See [`read_detections`] for the error semantics.
pub fn read_detections_from_path(
    path: &Utf8Path,
    params: &ReaderParams,
) -> Result<Vec<Detection>, OdFlowError> {
    let file = std::fs::File::open(path)?;
    read_detections(io::BufReader::new(file), params)
}
