//! skin-transform library
//!
//! The load -> skin -> write -> report pipeline behind the `skin-transform`
//! binary, exposed for tests and other tools.

pub mod app;
pub mod config;
pub mod documents;
pub mod obj;
pub mod stats_writer;

pub use app::{TOTAL_STAGE, run};
pub use config::{AppInput, JobFile, load_job_file, resolve};
