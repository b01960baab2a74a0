//! # OdSession: one ingestion-and-aggregation run
//!
//! [`OdSession`] owns everything a batch mutates:
//!
//! 1. **Sensor registry** ([`SensorRegistry`]) — sensor code → dense index, first-seen order.
//! 2. **Trajectory store** ([`TrajectoryStore`]) — detections grouped by vehicle, orphans aside.
//! 3. **Matrices** ([`OdMatrices`]) — last generated snapshot, if any.
//! 4. **Reader layout** ([`ReaderParams`]) — used by the file ingestion helpers.
//!
//! Sessions are independent values: several batches (or tests) can run side by side, each with
//! its own session, and [`OdSession::clear`] resets one for reuse on the next input.
//!
//! ## Typical usage
//!
//! ```rust,no_run
//! use camino::Utf8Path;
//! use odflow::od_matrix::writer::OutputPaths;
//! use odflow::session::OdSession;
//!
//! # fn run() -> Result<(), odflow::odflow_errors::OdFlowError> {
//! let mut session = OdSession::default();
//! session.ingest_file(Utf8Path::new("data/day1.csv"), true)?;
//!
//! let paths = OutputPaths::from_prefix(Utf8Path::new("data/output/day1_"));
//! session.save_trajectories(&paths)?;
//! session.generate_od_matrix()?;
//! session.save_od_matrix(&paths, true)?;
//! # Ok(()) }
//! ```
//!
//! ## Batch atomicity
//!
//! File ingestion parses the whole input before touching the session: a malformed record
//! leaves registry and store exactly as they were.
use std::io;

use camino::Utf8Path;
use tracing::{debug, info};

use crate::{
    detections::{
        csv_reader::{read_detections, read_detections_from_path},
        Detection,
    },
    od_matrix::{
        writer::{save_matrices, save_trajectories, OutputPaths},
        OdMatrices,
    },
    odflow_errors::OdFlowError,
    params::ReaderParams,
    sensors::SensorRegistry,
    trajectories::trajectory_store::TrajectoryStore,
};

#[derive(Debug, Clone, Default)]
pub struct OdSession {
    params: ReaderParams,
    registry: SensorRegistry,
    store: TrajectoryStore,
    matrices: Option<OdMatrices>,
}

impl OdSession {
    pub fn new(params: ReaderParams) -> Self {
        OdSession {
            params,
            ..Default::default()
        }
    }

    pub fn params(&self) -> &ReaderParams {
        &self.params
    }

    pub fn registry(&self) -> &SensorRegistry {
        &self.registry
    }

    pub fn store(&self) -> &TrajectoryStore {
        &self.store
    }

    /// Last generated matrices, `None` before [`OdSession::generate_od_matrix`] or after a clear.
    pub fn od_matrices(&self) -> Option<&OdMatrices> {
        self.matrices.as_ref()
    }

    /// Register the detection's sensor and route it to its trajectory (or the orphans).
    pub fn add_detection(&mut self, detection: Detection) -> Result<(), OdFlowError> {
        self.registry.register(detection.sensor_code());
        self.store.add_detection(detection)
    }

    /// Ingest already-converted detections, in order.
    pub fn ingest_detections<I>(&mut self, detections: I) -> Result<usize, OdFlowError>
    where
        I: IntoIterator<Item = Detection>,
    {
        let mut count = 0;
        for detection in detections {
            self.add_detection(detection)?;
            count += 1;
        }
        debug!(
            detections = count,
            sensors = self.registry.size(),
            trajectories = self.store.len(),
            orphans = self.store.orphans().len(),
            "detections ingested"
        );
        Ok(count)
    }

    /// Parse a raw log from `reader` and ingest it.
    ///
    /// Arguments
    /// -----------------
    /// * `reader` – Raw log source.
    /// * `clear_all` – Reset the session before ingesting.
    ///
    /// Return
    /// ----------
    /// * The number of detections ingested, or the parse/I/O error. On error the session is
    ///   unchanged (not even cleared).
    pub fn ingest_reader<R: io::Read>(
        &mut self,
        reader: R,
        clear_all: bool,
    ) -> Result<usize, OdFlowError> {
        let detections = read_detections(reader, &self.params)?;
        self.commit(detections, clear_all)
    }

    /// Parse the raw log at `path` and ingest it; see [`OdSession::ingest_reader`].
    pub fn ingest_file(&mut self, path: &Utf8Path, clear_all: bool) -> Result<usize, OdFlowError> {
        let detections = read_detections_from_path(path, &self.params)?;
        info!(file = %path, detections = detections.len(), "raw log parsed");
        self.commit(detections, clear_all)
    }

    fn commit(&mut self, detections: Vec<Detection>, clear_all: bool) -> Result<usize, OdFlowError> {
        if clear_all {
            self.clear();
        }
        self.ingest_detections(detections)
    }

    /// Sort every trajectory and aggregate the OD and max-time matrices.
    ///
    /// The result replaces any previous snapshot and is sized on the current registry.
    pub fn generate_od_matrix(&mut self) -> Result<&OdMatrices, OdFlowError> {
        self.store.sort_all();
        let matrices = OdMatrices::generate(self.store.all_trajectories(), &self.registry)?;
        info!(
            sensors = self.registry.size(),
            trajectories = self.store.len(),
            total_flow = matrices.total_flow(),
            "OD matrices generated"
        );
        Ok(self.matrices.insert(matrices))
    }

    /// Sort every trajectory and write the `TRAJ` dump.
    pub fn save_trajectories(&mut self, paths: &OutputPaths) -> Result<(), OdFlowError> {
        self.store.sort_all();
        save_trajectories(paths, self.store.all_trajectories())?;
        debug!(file = %paths.trajectories, "trajectories saved");
        Ok(())
    }

    /// Write the `IDS` and `MATRIX` dumps, plus `MAXTIME` when `with_max_time`.
    ///
    /// Return
    /// ----------
    /// * [`OdFlowError::MatrixNotGenerated`] if no matrices were generated since the last clear.
    pub fn save_od_matrix(&self, paths: &OutputPaths, with_max_time: bool) -> Result<(), OdFlowError> {
        let matrices = self
            .matrices
            .as_ref()
            .ok_or(OdFlowError::MatrixNotGenerated)?;
        save_matrices(paths, &self.registry, matrices, with_max_time)?;
        debug!(file = %paths.matrix, "OD matrix saved");
        Ok(())
    }

    /// Forget every detection, sensor and matrix of the current batch.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.store.clear();
        self.matrices = None;
    }
}

#[cfg(test)]
mod session_tests {
    use super::*;

    const LOG: &str = "\
S1;2016-03-14;08:00:00;x;x;50;x;x;V1
S2;2016-03-14;08:00:40;x;x;50;x;x;V1
S9;2016-03-14;08:00:45;x;x;50;x;x
S1;2016-03-14;08:01:00;x;x;50;x;x;V2
";

    #[test]
    fn test_ingest_and_generate() {
        let mut session = OdSession::default();
        assert_eq!(session.ingest_reader(LOG.as_bytes(), true).unwrap(), 4);

        assert_eq!(session.registry().size(), 3);
        assert_eq!(session.registry().lookup("S9"), Some(2));
        assert_eq!(session.store().len(), 2);
        assert_eq!(session.store().orphans().len(), 1);

        let m = session.generate_od_matrix().unwrap();
        assert_eq!(m.dimension(), 4);
        assert_eq!(m.count(0, 1), 1);
        assert_eq!(m.count(0, 0), 3);
        assert_eq!(m.total_flow(), 4);
    }

    #[test]
    fn test_failed_ingest_keeps_state() {
        let mut session = OdSession::default();
        session.ingest_reader(LOG.as_bytes(), true).unwrap();
        session.generate_od_matrix().unwrap();

        let bad = "S7;2016-03-14;xx:00:00;x;x;50;x;x;V7\n";
        assert!(matches!(
            session.ingest_reader(bad.as_bytes(), true),
            Err(OdFlowError::Parse { line: 1, .. })
        ));
        assert_eq!(session.registry().size(), 3);
        assert_eq!(session.registry().lookup("S7"), None);
        assert!(session.od_matrices().is_some());
    }

    #[test]
    fn test_save_without_matrix() {
        let session = OdSession::default();
        let paths = OutputPaths::from_prefix(Utf8Path::new("unused_"));
        assert_eq!(
            session.save_od_matrix(&paths, false),
            Err(OdFlowError::MatrixNotGenerated)
        );
    }

    #[test]
    fn test_append_without_clear() {
        let mut session = OdSession::default();
        session.ingest_reader(LOG.as_bytes(), true).unwrap();
        let more = "S4;2016-03-14;09:00:00;x;x;50;x;x;V1\n";
        session.ingest_reader(more.as_bytes(), false).unwrap();

        assert_eq!(session.registry().lookup("S4"), Some(3));
        assert_eq!(session.store().get("V1").unwrap().len(), 3);
    }
}
