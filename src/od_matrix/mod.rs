//! # Origin–destination aggregation
//!
//! Builds, in one pass over a batch of trajectories, the two square matrices indexed by
//! sensor:
//!
//! * **OD matrix** (`u32` counts): cell `[i][j]` counts trajectories whose first point was
//!   seen by sensor `i` and last point by sensor `j`. Every trajectory also credits one
//!   *pass* to its origin's diagonal cell `[i][i]`, so a trajectory that starts and ends on
//!   the same sensor adds 2 to that cell.
//! * **Max-time matrix** ([`hifitime::Duration`]): cell `[i][j]` holds the longest elapsed
//!   time observed between first and last point among the `i → j` trajectories, zero if none.
//!
//! Both matrices are `(N + 1) × (N + 1)` with `N` the registry size at generation time; the
//! extra row and column stay zero. They are a snapshot: growing the registry afterwards does
//! not resize them.
//!
//! Each trajectory contributes exactly 2 to the sum of the OD matrix, hence
//! `total_flow() == 2 × trajectory count`.
//!
//! ## Preconditions
//! -----------------
//! * Trajectories must be **sorted** (see [`Trajectory::sort`]); the aggregator reads
//!   first/last in the current order and never sorts.
//! * Every sensor code of every trajectory must be registered, otherwise
//!   [`OdFlowError::UnknownSensorCode`].
//! * Trajectories must be non-empty, otherwise [`OdFlowError::EmptyTrajectory`].
//!
//! ## Example
//! -----------------
//! ```rust
//! use hifitime::{Duration, Epoch};
//! use odflow::detections::Detection;
//! use odflow::od_matrix::OdMatrices;
//! use odflow::sensors::SensorRegistry;
//! use odflow::trajectories::Trajectory;
//!
//! let t0 = Epoch::from_gregorian_utc_at_midnight(2016, 3, 14);
//! let mut registry = SensorRegistry::new();
//! let mut traj = Trajectory::new();
//! for (sensor, secs) in [("S1", 0.0), ("S2", 90.0)] {
//!     registry.register(sensor);
//!     let det = Detection::new(sensor, Some("V1".into()), 50.0, t0 + Duration::from_seconds(secs));
//!     traj.append(det).unwrap();
//! }
//!
//! let matrices = OdMatrices::generate([&traj], &registry).unwrap();
//! assert_eq!(matrices.count(0, 1), 1);
//! assert_eq!(matrices.count(0, 0), 1);
//! assert_eq!(matrices.max_time(0, 1), Duration::from_seconds(90.0));
//! ```
use hifitime::Duration;
use nalgebra::DMatrix;

use crate::{
    constants::SensorIndex, odflow_errors::OdFlowError, sensors::SensorRegistry,
    trajectories::Trajectory,
};

pub mod writer;

/// OD count matrix and max travel time matrix of one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct OdMatrices {
    od: DMatrix<u32>,
    max_time: DMatrix<Duration>,
}

impl OdMatrices {
    /// Zero matrices sized for `sensor_count` sensors (plus the unused headroom row/column).
    pub fn zeros(sensor_count: usize) -> Self {
        let n = sensor_count + 1;
        OdMatrices {
            od: DMatrix::from_element(n, n, 0u32),
            max_time: DMatrix::from_element(n, n, Duration::ZERO),
        }
    }

    /// Aggregate a batch of sorted trajectories.
    ///
    /// Arguments
    /// -----------------
    /// * `trajectories` – Any iterable of trajectory references, in any order (the result
    ///   does not depend on it).
    /// * `registry` – Registry holding every sensor code seen during the batch.
    ///
    /// Return
    /// ----------
    /// * The filled matrices, or the first internal-consistency error met
    ///   ([`OdFlowError::EmptyTrajectory`], [`OdFlowError::UnknownSensorCode`]).
    ///
    /// Complexity
    /// ----------
    /// * O(N²) for the allocation plus O(T) for T trajectories.
    pub fn generate<'a, I>(trajectories: I, registry: &SensorRegistry) -> Result<Self, OdFlowError>
    where
        I: IntoIterator<Item = &'a Trajectory>,
    {
        let mut matrices = Self::zeros(registry.size());
        for trajectory in trajectories {
            matrices.accumulate(trajectory, registry)?;
        }
        Ok(matrices)
    }

    fn accumulate(
        &mut self,
        trajectory: &Trajectory,
        registry: &SensorRegistry,
    ) -> Result<(), OdFlowError> {
        debug_assert!(
            trajectory.is_sorted(),
            "trajectories must be sorted before aggregation"
        );

        let first = trajectory.first()?;
        let last = trajectory.last()?;

        let index_of = |code: &str| {
            registry
                .lookup(code)
                .ok_or_else(|| OdFlowError::UnknownSensorCode(code.to_string()))
        };
        let from = index_of(first.sensor_code())?;
        let to = index_of(last.sensor_code())?;

        // flow count
        self.od[(from, to)] += 1;

        let elapsed = last.timestamp() - first.timestamp();
        if elapsed > self.max_time[(from, to)] {
            self.max_time[(from, to)] = elapsed;
        }

        // pass credit on the origin
        self.od[(from, from)] += 1;

        Ok(())
    }

    /// Side length of both matrices (`N + 1`).
    pub fn dimension(&self) -> usize {
        self.od.nrows()
    }

    pub fn count(&self, from: SensorIndex, to: SensorIndex) -> u32 {
        self.od[(from, to)]
    }

    pub fn max_time(&self, from: SensorIndex, to: SensorIndex) -> Duration {
        self.max_time[(from, to)]
    }

    pub fn od_matrix(&self) -> &DMatrix<u32> {
        &self.od
    }

    pub fn max_time_matrix(&self) -> &DMatrix<Duration> {
        &self.max_time
    }

    /// Sum of every OD cell.
    pub fn total_flow(&self) -> u64 {
        self.od.iter().map(|&c| u64::from(c)).sum()
    }
}

#[cfg(test)]
mod od_matrix_tests {
    use super::*;
    use crate::detections::Detection;
    use hifitime::Epoch;

    fn trajectory(vehicle: &str, points: &[(&str, f64)], registry: &mut SensorRegistry) -> Trajectory {
        let t0 = Epoch::from_gregorian_utc_at_midnight(2016, 3, 14);
        let mut traj = Trajectory::for_vehicle(vehicle);
        for &(sensor, secs) in points {
            registry.register(sensor);
            traj.append(Detection::new(
                sensor,
                Some(vehicle.to_string()),
                50.0,
                t0 + Duration::from_seconds(secs),
            ))
            .unwrap();
        }
        traj.sort();
        traj
    }

    #[test]
    fn test_single_point_double_diagonal() {
        let mut registry = SensorRegistry::new();
        let traj = trajectory("V2", &[("S1", 0.0)], &mut registry);

        let m = OdMatrices::generate([&traj], &registry).unwrap();
        assert_eq!(m.dimension(), 2);
        assert_eq!(m.count(0, 0), 2);
        assert_eq!(m.max_time(0, 0), Duration::ZERO);
        assert_eq!(m.total_flow(), 2);
    }

    #[test]
    fn test_two_vehicles_same_pair() {
        let mut registry = SensorRegistry::new();
        let a = trajectory("V1", &[("S1", 0.0), ("S2", 30.0)], &mut registry);
        let b = trajectory("V2", &[("S1", 100.0), ("S2", 175.0)], &mut registry);

        let m = OdMatrices::generate([&a, &b], &registry).unwrap();
        let (s1, s2) = (registry.lookup("S1").unwrap(), registry.lookup("S2").unwrap());
        assert_eq!(m.count(s1, s2), 2);
        assert_eq!(m.count(s1, s1), 2);
        assert_eq!(m.count(s2, s2), 0);
        assert_eq!(m.max_time(s1, s2), Duration::from_seconds(75.0));
        assert_eq!(m.total_flow(), 4);
    }

    #[test]
    fn test_headroom_stays_zero() {
        let mut registry = SensorRegistry::new();
        let a = trajectory("V1", &[("S1", 0.0), ("S2", 5.0), ("S3", 9.0)], &mut registry);

        let m = OdMatrices::generate([&a], &registry).unwrap();
        assert_eq!(m.dimension(), 4);
        assert!(m.od_matrix().row(3).iter().all(|&c| c == 0));
        assert!(m.od_matrix().column(3).iter().all(|&c| c == 0));
        // S2 is neither origin nor destination
        assert!(m.od_matrix().row(1).iter().all(|&c| c == 0));
    }

    #[test]
    fn test_unknown_sensor() {
        let mut registry = SensorRegistry::new();
        let traj = trajectory("V1", &[("S1", 0.0), ("S2", 5.0)], &mut registry);
        let empty = SensorRegistry::new();

        assert_eq!(
            OdMatrices::generate([&traj], &empty),
            Err(OdFlowError::UnknownSensorCode("S1".into()))
        );
    }

    #[test]
    fn test_empty_trajectory_rejected() {
        let registry = SensorRegistry::new();
        let traj = Trajectory::for_vehicle("V3");
        assert_eq!(
            OdMatrices::generate([&traj], &registry),
            Err(OdFlowError::EmptyTrajectory("V3".into()))
        );
    }

    #[test]
    fn test_no_trajectories() {
        let mut registry = SensorRegistry::new();
        registry.register("S1");
        let m = OdMatrices::generate(std::iter::empty(), &registry).unwrap();
        assert_eq!(m, OdMatrices::zeros(1));
        assert_eq!(m.total_flow(), 0);
    }
}
