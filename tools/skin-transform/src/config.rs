//! Job configuration
//!
//! A run is described by six paths plus the bench/backend options. They come
//! from command-line flags, an optional TOML job file, or both; flags win.
//!
//! ```toml
//! mesh = "rest.obj"
//! bones_weights = "weights.json"
//! inverse_bind_pose = "inverse_bind.json"
//! new_pose = "pose.json"
//! output = "skinned.obj"
//! stats = "stats.json"
//! bench = 100
//! accelerated = true
//! ```

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use skin_core::SkinBackend;
use std::path::{Path, PathBuf};

/// Partially specified job, as read from a job file or the command line
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobFile {
    pub mesh: Option<PathBuf>,
    pub bones_weights: Option<PathBuf>,
    pub inverse_bind_pose: Option<PathBuf>,
    pub new_pose: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub stats: Option<PathBuf>,
    pub bench: Option<usize>,
    #[serde(default)]
    pub accelerated: bool,
}

impl JobFile {
    /// Layer `overrides` on top of `self`; any value set in `overrides` wins
    pub fn merge(self, overrides: JobFile) -> JobFile {
        JobFile {
            mesh: overrides.mesh.or(self.mesh),
            bones_weights: overrides.bones_weights.or(self.bones_weights),
            inverse_bind_pose: overrides.inverse_bind_pose.or(self.inverse_bind_pose),
            new_pose: overrides.new_pose.or(self.new_pose),
            output: overrides.output.or(self.output),
            stats: overrides.stats.or(self.stats),
            bench: overrides.bench.or(self.bench),
            accelerated: overrides.accelerated || self.accelerated,
        }
    }
}

/// Fully resolved inputs for one run
#[derive(Debug, Clone, PartialEq)]
pub struct AppInput {
    pub mesh_file: PathBuf,
    pub weights_file: PathBuf,
    pub inverse_bind_pose_file: PathBuf,
    pub new_pose_file: PathBuf,
    pub output_mesh_file: PathBuf,
    pub stats_file: PathBuf,
    /// `Some(n)` repeats skinning `n` times and adds a bench summary
    pub bench_runs: Option<usize>,
    pub backend: SkinBackend,
}

impl TryFrom<JobFile> for AppInput {
    type Error = anyhow::Error;

    fn try_from(job: JobFile) -> Result<Self> {
        if job.bench == Some(0) {
            bail!("Invalid bench run count 0 (expected a positive integer)");
        }

        Ok(AppInput {
            mesh_file: required(job.mesh, "--mesh", "mesh")?,
            weights_file: required(job.bones_weights, "--bones-weights", "bones_weights")?,
            inverse_bind_pose_file: required(
                job.inverse_bind_pose,
                "--inverse-bind-pose",
                "inverse_bind_pose",
            )?,
            new_pose_file: required(job.new_pose, "--new-pose", "new_pose")?,
            output_mesh_file: required(job.output, "--output", "output")?,
            stats_file: required(job.stats, "--stats", "stats")?,
            bench_runs: job.bench,
            backend: if job.accelerated {
                SkinBackend::Accelerated
            } else {
                SkinBackend::Scalar
            },
        })
    }
}

fn required(value: Option<PathBuf>, flag: &str, key: &str) -> Result<PathBuf> {
    match value {
        Some(path) => Ok(path),
        None => bail!("Missing required input: {} (or `{}` in the job file)", flag, key),
    }
}

/// Load and parse a TOML job file
pub fn load_job_file(path: &Path) -> Result<JobFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read job file: {:?}", path))?;
    let job: JobFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse job file: {:?}", path))?;
    Ok(job)
}

/// Combine an optional job file with command-line overrides
pub fn resolve(job_file: Option<&Path>, overrides: JobFile) -> Result<AppInput> {
    let base = match job_file {
        Some(path) => load_job_file(path)?,
        None => JobFile::default(),
    };
    AppInput::try_from(base.merge(overrides))
}
