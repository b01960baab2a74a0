//! # Trajectories: per-vehicle sequences of detections
//!
//! A [`Trajectory`] holds every [`Detection`] of one vehicle within an ingestion batch.
//! The [`TrajectoryStore`](trajectory_store::TrajectoryStore) groups incoming detections into
//! trajectories and keeps the orphan detections (no vehicle id) aside.
//!
//! Modules
//! -----------------
//! * [`trajectory_store`] – Vehicle id → [`Trajectory`] map plus orphan list.
//!
//! Ordering
//! -----------------
//! Points are kept in **append order** until [`Trajectory::sort`] is called. [`Trajectory::first`]
//! and [`Trajectory::last`] always read the current order, so callers that want the
//! chronological origin/destination must sort first. Sorting is stable: detections sharing a
//! timestamp keep their append order.
//!
//! Vehicle id
//! -----------------
//! The vehicle id of a trajectory is fixed by its first point (or at construction through
//! [`Trajectory::for_vehicle`]). Appending a point with another vehicle id, or with none, is
//! rejected with [`OdFlowError::VehicleIdMismatch`].
use std::fmt;

use hifitime::Duration;
use itertools::Itertools;

use crate::{
    constants::{Detections, VehicleId},
    detections::Detection,
    odflow_errors::OdFlowError,
};

pub mod trajectory_store;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    vehicle_id: Option<VehicleId>,
    points: Detections,
}

impl Trajectory {
    /// An empty trajectory; its vehicle id is taken from the first appended point.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty trajectory bound to `vehicle_id`.
    pub fn for_vehicle(vehicle_id: impl Into<VehicleId>) -> Self {
        Trajectory {
            vehicle_id: Some(vehicle_id.into()),
            points: Detections::new(),
        }
    }

    pub fn vehicle_id(&self) -> Option<&str> {
        self.vehicle_id.as_deref()
    }

    /// Append a point at the end of the trajectory.
    ///
    /// Arguments
    /// ---------
    /// * `point`: a detection carrying the vehicle id of this trajectory
    ///
    /// Return
    /// ------
    /// * [`OdFlowError::VehicleIdMismatch`] if the point has no vehicle id or a different one;
    ///   the trajectory is left unchanged in that case
    pub fn append(&mut self, point: Detection) -> Result<(), OdFlowError> {
        let found = point.vehicle_id();
        if self.vehicle_id.is_none() && found.is_some() {
            self.vehicle_id = found.map(str::to_string);
        }
        if found.is_none() || self.vehicle_id.as_deref() != found {
            return Err(OdFlowError::VehicleIdMismatch {
                expected: self.vehicle_id.clone(),
                found: found.map(str::to_string),
            });
        }
        self.points.push(point);
        Ok(())
    }

    fn empty_error(&self) -> OdFlowError {
        OdFlowError::EmptyTrajectory(self.vehicle_id.clone().unwrap_or_default())
    }

    /// First point in the current order.
    pub fn first(&self) -> Result<&Detection, OdFlowError> {
        self.points.first().ok_or_else(|| self.empty_error())
    }

    /// Last point in the current order.
    pub fn last(&self) -> Result<&Detection, OdFlowError> {
        self.points.last().ok_or_else(|| self.empty_error())
    }

    /// Elapsed time between the first and the last point in the current order.
    pub fn duration(&self) -> Result<Duration, OdFlowError> {
        Ok(self.last()?.timestamp() - self.first()?.timestamp())
    }

    /// Reorder the points by ascending timestamp (stable, idempotent).
    pub fn sort(&mut self) {
        self.points
            .sort_by(|a, b| a.timestamp().cmp(&b.timestamp()));
    }

    /// `true` if the points are in non-decreasing timestamp order.
    pub fn is_sorted(&self) -> bool {
        self.points
            .windows(2)
            .all(|w| w[0].timestamp() <= w[1].timestamp())
    }

    /// Points in the current order.
    pub fn iter(&self) -> std::slice::Iter<'_, Detection> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Detection;
    type IntoIter = std::slice::Iter<'a, Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Trajectory {
    /// `"<vehicle_id>: [<p1>, <p2>, ...]\n"`; an empty trajectory renders as nothing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        writeln!(
            f,
            "{}: [{}]",
            self.vehicle_id.as_deref().unwrap_or_default(),
            self.points.iter().join(", ")
        )
    }
}
