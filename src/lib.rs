//! # odflow
//!
//! Vehicle trajectory reconstruction and origin–destination (OD) flow aggregation from roadside
//! sensor detection logs.
//!
//! A detection log lists, one record per line, which sensor saw which vehicle, when and how
//! fast. `odflow` groups the detections by vehicle into time-ordered [`trajectories`], assigns
//! every sensor a dense index in first-seen order ([`sensors`]), and aggregates an OD count matrix
//! plus a max travel-time matrix over the trajectories ([`od_matrix`]).
//!
//! Entry points
//! -----------------
//! * [`OdSession`] – one ingestion-and-aggregation run (registry, store and matrices).
//! * [`batch::run_batch`] – the same pipeline over every matching file of a directory.
//! * the `odflow` binary – command-line front-end for both.
//!
//! Cargo features
//! -----------------
//! * `progress` – progress bar over the files of a batch run.
pub mod batch;
pub mod constants;
pub mod detections;
pub mod od_matrix;
pub mod odflow_errors;
pub mod params;
pub mod sensors;
pub mod session;
pub mod time;
pub mod trajectories;

pub use odflow_errors::OdFlowError;
pub use params::{BatchParams, ReaderParams};
pub use session::OdSession;
