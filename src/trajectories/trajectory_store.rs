//! # Trajectory store
//!
//! Groups detections by vehicle id into [`Trajectory`]s.
//!
//! Data Model
//! -----------------
//! * **Key:** [`VehicleId`].
//! * **Value:** [`Trajectory`], created on the first detection of the vehicle and never empty
//!   once visible (the creating call appends its point right away).
//! * **Map:** `HashMap<VehicleId, Trajectory, ahash::RandomState>`; iteration order is
//!   unspecified.
//! * **Orphans:** detections without vehicle id, kept in arrival order for diagnostics only.
use std::collections::{hash_map::Entry, HashMap};

use ahash::RandomState;

use crate::{
    constants::VehicleId, detections::Detection, odflow_errors::OdFlowError,
    trajectories::Trajectory,
};

/// Vehicle id → trajectory map.
pub type TrajectoryMap = HashMap<VehicleId, Trajectory, RandomState>;

#[derive(Debug, Clone, Default)]
pub struct TrajectoryStore {
    trajectories: TrajectoryMap,
    orphans: Vec<Detection>,
}

impl TrajectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a detection to its vehicle's trajectory, or to the orphan list when it has no
    /// vehicle id.
    pub fn add_detection(&mut self, point: Detection) -> Result<(), OdFlowError> {
        match point.vehicle_id() {
            Some(vehicle_id) => {
                let vehicle_id = vehicle_id.to_string();
                self.get_or_create(vehicle_id).append(point)
            }
            None => {
                self.orphans.push(point);
                Ok(())
            }
        }
    }

    /// Trajectory of `vehicle_id`, created empty on first request.
    pub fn get_or_create(&mut self, vehicle_id: VehicleId) -> &mut Trajectory {
        match self.trajectories.entry(vehicle_id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let traj = Trajectory::for_vehicle(entry.key().clone());
                entry.insert(traj)
            }
        }
    }

    pub fn get(&self, vehicle_id: &str) -> Option<&Trajectory> {
        self.trajectories.get(vehicle_id)
    }

    /// All trajectories, in unspecified order.
    pub fn all_trajectories(&self) -> impl Iterator<Item = &Trajectory> {
        self.trajectories.values()
    }

    /// Sort every trajectory chronologically.
    pub fn sort_all(&mut self) {
        self.trajectories.values_mut().for_each(Trajectory::sort);
    }

    pub fn orphans(&self) -> &[Detection] {
        &self.orphans
    }

    /// Number of trajectories (distinct vehicle ids).
    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    /// Number of detections held, orphans included.
    pub fn detection_count(&self) -> usize {
        self.trajectories.values().map(Trajectory::len).sum::<usize>() + self.orphans.len()
    }

    pub fn clear(&mut self) {
        self.trajectories.clear();
        self.orphans.clear();
    }
}
