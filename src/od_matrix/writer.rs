//! # Flat-file dumps
//!
//! Text renderers for the results of one batch. Each writer takes any [`io::Write`] so the
//! same code serves files, buffers and tests.
//!
//! | file            | line format                        | order                  |
//! |-----------------|------------------------------------|------------------------|
//! | `<prefix>IDS`   | `<sensor_code> , <index>`          | index                  |
//! | `<prefix>MATRIX`| `<i>, <j> , <count>`               | row-major, all cells   |
//! | `<prefix>MAXTIME`| `<i>, <j> , <milliseconds>`       | row-major, all cells   |
//! | `<prefix>TRAJ`  | `<vehicle_id>: [<p1>, <p2>, ...]`  | vehicle id             |
//!
//! `prefix` is a plain string prefix, not a directory: `out/day1_` gives `out/day1_IDS`.
use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

use camino::{Utf8Path, Utf8PathBuf};
use hifitime::{Duration, Unit};
use itertools::Itertools;
use nalgebra::DMatrix;

use crate::{
    constants::{IDS_SUFFIX, MATRIX_SUFFIX, MAX_TIME_SUFFIX, TRAJ_SUFFIX},
    od_matrix::OdMatrices,
    odflow_errors::OdFlowError,
    sensors::SensorRegistry,
    trajectories::Trajectory,
};

/// Output file paths derived from a common prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub ids: Utf8PathBuf,
    pub matrix: Utf8PathBuf,
    pub max_time: Utf8PathBuf,
    pub trajectories: Utf8PathBuf,
}

impl OutputPaths {
    pub fn from_prefix(prefix: &Utf8Path) -> Self {
        let with = |suffix: &str| Utf8PathBuf::from(format!("{prefix}{suffix}"));
        OutputPaths {
            ids: with(IDS_SUFFIX),
            matrix: with(MATRIX_SUFFIX),
            max_time: with(MAX_TIME_SUFFIX),
            trajectories: with(TRAJ_SUFFIX),
        }
    }
}

/// Write the sensor code → index mapping, one `"<code> , <index>"` line per sensor.
pub fn write_ids<W: Write>(mut out: W, registry: &SensorRegistry) -> io::Result<()> {
    for (code, idx) in registry.iter() {
        writeln!(out, "{code} , {idx}")?;
    }
    out.flush()
}

fn write_cells<W, T, F>(mut out: W, matrix: &DMatrix<T>, render: F) -> io::Result<()>
where
    W: Write,
    T: nalgebra::Scalar,
    F: Fn(&T) -> String,
{
    for i in 0..matrix.nrows() {
        for j in 0..matrix.ncols() {
            writeln!(out, "{i}, {j} , {}", render(&matrix[(i, j)]))?;
        }
    }
    out.flush()
}

/// Write every cell of the OD count matrix, row-major.
pub fn write_od_matrix<W: Write>(out: W, matrices: &OdMatrices) -> io::Result<()> {
    write_cells(out, matrices.od_matrix(), u32::to_string)
}

/// Write every cell of the max travel time matrix, row-major, in whole milliseconds.
pub fn write_max_time_matrix<W: Write>(out: W, matrices: &OdMatrices) -> io::Result<()> {
    write_cells(out, matrices.max_time_matrix(), |d: &Duration| {
        (d.to_unit(Unit::Millisecond).round() as i64).to_string()
    })
}

/// Write one line per non-empty trajectory, ordered by vehicle id.
///
/// Trajectories are written in their current point order; sort them first for a
/// chronological dump.
pub fn write_trajectories<'a, W, I>(mut out: W, trajectories: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Trajectory>,
{
    for traj in trajectories
        .into_iter()
        .filter(|t| !t.is_empty())
        .sorted_by(|a, b| a.vehicle_id().cmp(&b.vehicle_id()))
    {
        write!(out, "{traj}")?;
    }
    out.flush()
}

fn create(path: &Utf8Path) -> Result<BufWriter<File>, OdFlowError> {
    Ok(BufWriter::new(File::create(path)?))
}

/// Write the `IDS` and `MATRIX` files (and `MAXTIME` when `with_max_time`).
pub fn save_matrices(
    paths: &OutputPaths,
    registry: &SensorRegistry,
    matrices: &OdMatrices,
    with_max_time: bool,
) -> Result<(), OdFlowError> {
    write_ids(create(&paths.ids)?, registry)?;
    write_od_matrix(create(&paths.matrix)?, matrices)?;
    if with_max_time {
        write_max_time_matrix(create(&paths.max_time)?, matrices)?;
    }
    Ok(())
}

/// Write the `TRAJ` file.
pub fn save_trajectories<'a, I>(paths: &OutputPaths, trajectories: I) -> Result<(), OdFlowError>
where
    I: IntoIterator<Item = &'a Trajectory>,
{
    write_trajectories(create(&paths.trajectories)?, trajectories)?;
    Ok(())
}

#[cfg(test)]
mod writer_tests {
    use super::*;
    use crate::detections::Detection;
    use hifitime::Epoch;

    fn render<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn sample() -> (SensorRegistry, Vec<Trajectory>) {
        let t0 = Epoch::from_gregorian_utc_at_midnight(2016, 3, 14);
        let mut registry = SensorRegistry::new();
        let mut trajs = Vec::new();
        for (vehicle, from, to, secs) in [("V2", "S1", "S2", 1.5), ("V1", "S2", "S2", 0.0)] {
            let mut traj = Trajectory::new();
            for (sensor, dt) in [(from, 0.0), (to, secs)] {
                registry.register(sensor);
                traj.append(Detection::new(
                    sensor,
                    Some(vehicle.into()),
                    10.0,
                    t0 + Duration::from_seconds(dt),
                ))
                .unwrap();
            }
            trajs.push(traj);
        }
        (registry, trajs)
    }

    #[test]
    fn test_paths_from_prefix() {
        let paths = OutputPaths::from_prefix(Utf8Path::new("out/day1_"));
        assert_eq!(paths.ids, Utf8PathBuf::from("out/day1_IDS"));
        assert_eq!(paths.matrix, Utf8PathBuf::from("out/day1_MATRIX"));
        assert_eq!(paths.max_time, Utf8PathBuf::from("out/day1_MAXTIME"));
        assert_eq!(paths.trajectories, Utf8PathBuf::from("out/day1_TRAJ"));
    }

    #[test]
    fn test_ids_and_matrix_dump() {
        let (registry, trajs) = sample();
        let m = OdMatrices::generate(&trajs, &registry).unwrap();

        assert_eq!(render(|b| write_ids(b, &registry)), "S1 , 0\nS2 , 1\n");

        let matrix = render(|b| write_od_matrix(b, &m));
        let lines: Vec<_> = matrix.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "0, 0 , 1");
        assert_eq!(lines[1], "0, 1 , 1");
        assert_eq!(lines[4], "1, 1 , 2");
        assert_eq!(lines[8], "2, 2 , 0");

        let max_time = render(|b| write_max_time_matrix(b, &m));
        assert_eq!(max_time.lines().nth(1), Some("0, 1 , 1500"));
    }

    #[test]
    fn test_trajectory_dump_sorted_by_vehicle() {
        let (_, mut trajs) = sample();
        trajs.push(Trajectory::for_vehicle("V0"));

        let dump = render(|b| write_trajectories(b, &trajs));
        let lines: Vec<_> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("V1: [S2@"));
        assert!(lines[1].starts_with("V2: [S1@"));
    }
}
