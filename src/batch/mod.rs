//! # Directory batch runner
//!
//! Runs one [`OdSession`] over every detection file of a directory and writes the per-file
//! dumps next to each other in the output directory.
//!
//! Pipeline (per file)
//! -----------------
//! 1. Clear the session and ingest the file (all-or-nothing).
//! 2. Sort the trajectories and generate the OD / max-time matrices.
//! 3. Write `<prefix>TRAJ`, then `<prefix>IDS`, `<prefix>MATRIX` and optionally `<prefix>MAXTIME`.
//!
//! `prefix` is `<output_dir>/<file stem>_`. Nothing is written for a file whose ingestion or
//! aggregation fails; the failure is logged, recorded in the [`BatchReport`], and the runner
//! moves on to the next file.
//!
//! File selection
//! -----------------
//! Regular files directly under `input_dir` (no recursion) whose **file name** matches
//! [`BatchParams::file_pattern`], processed in file-name order so index assignment and output
//! are reproducible.
//!
//! With the `progress` feature, an `indicatif` bar tracks the files.
#[cfg(feature = "progress")]
pub(crate) mod progress_bar;

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::{
    od_matrix::writer::OutputPaths, odflow_errors::OdFlowError, params::BatchParams,
    session::OdSession,
};

/// Outcome of a [`run_batch`] call.
#[derive(Debug, Default, PartialEq)]
pub struct BatchReport {
    /// Files fully processed, in processing order.
    pub processed: Vec<Utf8PathBuf>,
    /// Files skipped after an error, with that error.
    pub failed: Vec<(Utf8PathBuf, OdFlowError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.processed.len() + self.failed.len()
    }
}

/// Matching input files of `params.input_dir`, sorted by file name.
pub fn list_input_files(params: &BatchParams) -> Result<Vec<Utf8PathBuf>, OdFlowError> {
    let pattern = params.file_regex()?;
    let mut files = Vec::new();

    for entry in WalkDir::new(&params.input_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = Utf8PathBuf::from_path_buf(entry.into_path())
            .map_err(|p| OdFlowError::Utf8PathError(format!("non UTF-8 file name: {}", p.display())))?;
        if path.file_name().is_some_and(|name| pattern.is_match(name)) {
            files.push(path);
        }
    }
    Ok(files)
}

/// Output prefix of `file`: `<output_dir>/<file stem>_`.
pub fn output_prefix(output_dir: &Utf8Path, file: &Utf8Path) -> Utf8PathBuf {
    output_dir.join(format!("{}_", file.file_stem().unwrap_or_default()))
}

/// Run the full pipeline on one file with a reused session.
pub fn process_file(
    session: &mut OdSession,
    file: &Utf8Path,
    output_dir: &Utf8Path,
    write_max_time: bool,
) -> Result<(), OdFlowError> {
    let paths = OutputPaths::from_prefix(&output_prefix(output_dir, file));

    session.ingest_file(file, true)?;
    session.generate_od_matrix()?;
    session.save_trajectories(&paths)?;
    session.save_od_matrix(&paths, write_max_time)?;

    if !session.store().orphans().is_empty() {
        warn!(
            file = %file,
            orphans = session.store().orphans().len(),
            "detections without vehicle id ignored"
        );
    }
    Ok(())
}

/// Process every matching file of `params.input_dir`.
///
/// Arguments
/// -----------------
/// * `params` – Validated batch settings (see [`BatchParams::builder`]).
///
/// Return
/// ----------
/// * A [`BatchReport`] listing processed and failed files. Per-file errors never abort the run;
///   only listing the input directory or creating the output directory can fail the call.
pub fn run_batch(params: &BatchParams) -> Result<BatchReport, OdFlowError> {
    let files = list_input_files(params)?;
    fs::create_dir_all(&params.output_dir)?;

    info!(
        input_dir = %params.input_dir,
        output_dir = %params.output_dir,
        files = files.len(),
        "batch started"
    );

    let mut session = OdSession::new(params.reader.clone());
    let mut report = BatchReport::default();

    #[cfg(feature = "progress")]
    let mut progress = progress_bar::BatchProgress::new(files.len());

    for file in files {
        match process_file(&mut session, &file, &params.output_dir, params.write_max_time) {
            Ok(()) => report.processed.push(file.clone()),
            Err(err) => {
                error!(file = %file, error = %err, "file skipped");
                report.failed.push((file.clone(), err));
            }
        }

        #[cfg(feature = "progress")]
        progress.file_done(file.file_name().unwrap_or_default());
    }

    #[cfg(feature = "progress")]
    progress.finish();

    info!(
        processed = report.processed.len(),
        failed = report.failed.len(),
        "batch finished"
    );
    Ok(report)
}

#[cfg(test)]
mod batch_tests {
    use super::*;

    #[test]
    fn test_output_prefix() {
        let out = Utf8Path::new("/data/output");
        assert_eq!(
            output_prefix(out, Utf8Path::new("/data/Ofuscado_0314.csv")),
            Utf8PathBuf::from("/data/output/Ofuscado_0314_")
        );
        assert_eq!(
            output_prefix(out, Utf8Path::new("/data/raw")),
            Utf8PathBuf::from("/data/output/raw_")
        );
    }

    #[test]
    fn test_report_counts() {
        let mut report = BatchReport::default();
        assert!(report.is_success());
        report.processed.push("a.csv".into());
        report
            .failed
            .push(("b.csv".into(), OdFlowError::MatrixNotGenerated));
        assert!(!report.is_success());
        assert_eq!(report.file_count(), 2);
    }
}
