//! # Reader and batch configuration
//!
//! Two parameter sets drive the pipeline:
//!
//! * [`ReaderParams`] – layout of the raw detection files (field separator, column indices,
//!   date/time separators).
//! * [`BatchParams`] – directory-level runner settings (input/output directories, file name
//!   pattern, optional max-time dump) embedding a [`ReaderParams`].
//!
//! Both come with a **fluent builder** that validates the values on `build()`, and both
//! derive `serde` traits so they can be embedded in a caller's configuration file.
//!
//! ```rust
//! use odflow::params::ReaderParams;
//!
//! let params = ReaderParams::builder()
//!     .separator(b',')
//!     .vehicle_id_index(6)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.separator, b',');
//! ```
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        DATE_INDEX, DATE_SEPARATOR, DEFAULT_SEPARATOR, SENSOR_CODE_INDEX, SPEED_INDEX,
        TIME_INDEX, TIME_SEPARATOR, VEHICLE_ID_INDEX,
    },
    odflow_errors::OdFlowError,
};

/// Layout of a raw detection file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderParams {
    /// Field separator (single ASCII byte).
    pub separator: u8,
    pub sensor_code_index: usize,
    pub date_index: usize,
    pub time_index: usize,
    pub speed_index: usize,
    /// Column of the vehicle id. A record carries a vehicle id only when it has exactly
    /// `vehicle_id_index + 1` fields.
    pub vehicle_id_index: usize,
    pub date_separator: char,
    pub time_separator: char,
}

impl ReaderParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ReaderParamsBuilder {
        ReaderParamsBuilder::new()
    }

    /// Number of fields a record must have to carry a vehicle id: one past the highest
    /// column index in use.
    pub fn full_record_len(&self) -> usize {
        [
            self.sensor_code_index,
            self.date_index,
            self.time_index,
            self.speed_index,
            self.vehicle_id_index,
        ]
        .into_iter()
        .max()
        .unwrap_or_default()
            + 1
    }
}

impl Default for ReaderParams {
    fn default() -> Self {
        ReaderParams {
            separator: DEFAULT_SEPARATOR,
            sensor_code_index: SENSOR_CODE_INDEX,
            date_index: DATE_INDEX,
            time_index: TIME_INDEX,
            speed_index: SPEED_INDEX,
            vehicle_id_index: VEHICLE_ID_INDEX,
            date_separator: DATE_SEPARATOR,
            time_separator: TIME_SEPARATOR,
        }
    }
}

/// Builder for [`ReaderParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct ReaderParamsBuilder {
    params: ReaderParams,
}

impl ReaderParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: ReaderParams::default(),
        }
    }

    pub fn separator(mut self, v: u8) -> Self {
        self.params.separator = v;
        self
    }
    pub fn sensor_code_index(mut self, v: usize) -> Self {
        self.params.sensor_code_index = v;
        self
    }
    pub fn date_index(mut self, v: usize) -> Self {
        self.params.date_index = v;
        self
    }
    pub fn time_index(mut self, v: usize) -> Self {
        self.params.time_index = v;
        self
    }
    pub fn speed_index(mut self, v: usize) -> Self {
        self.params.speed_index = v;
        self
    }
    pub fn vehicle_id_index(mut self, v: usize) -> Self {
        self.params.vehicle_id_index = v;
        self
    }
    pub fn date_separator(mut self, v: char) -> Self {
        self.params.date_separator = v;
        self
    }
    pub fn time_separator(mut self, v: char) -> Self {
        self.params.time_separator = v;
        self
    }

    /// Validate and return the parameters.
    ///
    /// Return
    /// ----------
    /// * [`OdFlowError::InvalidReaderParameter`] when:
    ///   - the field separator is not ASCII,
    ///   - two columns share the same index,
    ///   - the date or time separator equals the field separator.
    pub fn build(self) -> Result<ReaderParams, OdFlowError> {
        let p = &self.params;

        if !p.separator.is_ascii() {
            return Err(OdFlowError::InvalidReaderParameter(
                "separator must be an ASCII byte".into(),
            ));
        }

        let columns = [
            p.sensor_code_index,
            p.date_index,
            p.time_index,
            p.speed_index,
            p.vehicle_id_index,
        ];
        for (i, a) in columns.iter().enumerate() {
            if columns[i + 1..].contains(a) {
                return Err(OdFlowError::InvalidReaderParameter(format!(
                    "column index {a} is used twice"
                )));
            }
        }

        let sep = char::from(p.separator);
        if p.date_separator == sep || p.time_separator == sep {
            return Err(OdFlowError::InvalidReaderParameter(
                "date/time separators must differ from the field separator".into(),
            ));
        }

        Ok(self.params)
    }
}

/// File name pattern of the detection files picked up by the batch runner.
pub const DEFAULT_FILE_PATTERN: &str = r"^Ofuscado.*\.csv$";

/// Settings of the directory-level batch runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchParams {
    pub input_dir: Utf8PathBuf,
    pub output_dir: Utf8PathBuf,
    /// Regex matched against the file name (not the full path).
    pub file_pattern: String,
    /// Also dump the max travel time matrix.
    pub write_max_time: bool,
    #[serde(default)]
    pub reader: ReaderParams,
}

impl BatchParams {
    /// Start a builder for the files of `input_dir`; outputs default to `<input_dir>/output`.
    pub fn builder(input_dir: impl AsRef<Utf8Path>) -> BatchParamsBuilder {
        BatchParamsBuilder::new(input_dir)
    }

    /// Compiled [`BatchParams::file_pattern`].
    pub fn file_regex(&self) -> Result<Regex, OdFlowError> {
        Ok(Regex::new(&self.file_pattern)?)
    }
}

/// Builder for [`BatchParams`], with validation.
#[derive(Debug, Clone)]
pub struct BatchParamsBuilder {
    params: BatchParams,
}

impl BatchParamsBuilder {
    pub fn new(input_dir: impl AsRef<Utf8Path>) -> Self {
        let input_dir = input_dir.as_ref().to_path_buf();
        Self {
            params: BatchParams {
                output_dir: input_dir.join("output"),
                input_dir,
                file_pattern: DEFAULT_FILE_PATTERN.to_string(),
                write_max_time: true,
                reader: ReaderParams::default(),
            },
        }
    }

    pub fn output_dir(mut self, v: impl AsRef<Utf8Path>) -> Self {
        self.params.output_dir = v.as_ref().to_path_buf();
        self
    }
    pub fn file_pattern(mut self, v: impl Into<String>) -> Self {
        self.params.file_pattern = v.into();
        self
    }
    pub fn write_max_time(mut self, v: bool) -> Self {
        self.params.write_max_time = v;
        self
    }
    pub fn reader(mut self, v: ReaderParams) -> Self {
        self.params.reader = v;
        self
    }

    /// Validate and return the parameters.
    ///
    /// Return
    /// ----------
    /// * [`OdFlowError::InvalidFilePattern`] if the pattern does not compile,
    /// * [`OdFlowError::InvalidBatchParameter`] if the output directory equals the input
    ///   directory (outputs would be picked up as inputs on the next run).
    pub fn build(self) -> Result<BatchParams, OdFlowError> {
        self.params.file_regex()?;

        if self.params.output_dir == self.params.input_dir {
            return Err(OdFlowError::InvalidBatchParameter(
                "output_dir must differ from input_dir".into(),
            ));
        }

        Ok(self.params)
    }
}
