//! Run orchestration: load -> skin (once or N times) -> write -> report

use anyhow::Result;
use skin_core::{BenchSummary, MeshSkinner, Profiler, SKINNING_STAGE, StatsReport, TimingSink};
use std::time::Instant;

use crate::config::AppInput;
use crate::{documents, obj, stats_writer};

/// Stage covering the whole run, recorded last
pub const TOTAL_STAGE: &str = "total";

/// Execute one job and write its stats file
///
/// The stats file is written on failure too, on a best-effort basis: if that
/// write also fails it is logged and the original error is returned.
pub fn run(input: &AppInput) -> Result<StatsReport> {
    let mut profiler = Profiler::new();
    let started = Instant::now();

    let result = run_pipeline(input, &mut profiler);
    profiler.record(TOTAL_STAGE, started.elapsed());

    let bench_summary = input
        .bench_runs
        .map(|_| BenchSummary::from_samples(&profiler.samples(SKINNING_STAGE)));
    let report = profiler.report(bench_summary);

    match result {
        Ok(()) => {
            stats_writer::write_stats(&input.stats_file, &report)?;
            if let Some(summary) = &report.bench_summary {
                tracing::info!(
                    "Bench: {} runs, mean {:.1}us, median {:.1}us, min {:.1}us, max {:.1}us",
                    summary.runs,
                    summary.mean_microseconds,
                    summary.median_microseconds,
                    summary.min_microseconds,
                    summary.max_microseconds
                );
            }
            Ok(report)
        }
        Err(err) => {
            if let Err(stats_err) = stats_writer::write_stats(&input.stats_file, &report) {
                tracing::warn!("Failed to write stats after error: {:#}", stats_err);
            }
            Err(err)
        }
    }
}

fn run_pipeline(input: &AppInput, profiler: &mut Profiler) -> Result<()> {
    let source = obj::read_obj(&input.mesh_file, profiler)?;
    let weights = documents::read_bone_weights(&input.weights_file, profiler)?;
    let poses = documents::read_bone_pose(
        &input.inverse_bind_pose_file,
        &input.new_pose_file,
        profiler,
    )?;
    tracing::info!(
        "Loaded {:?}: {} vertices, {} triangles, {} bones",
        input.mesh_file,
        source.vertex_count(),
        source.triangle_count(),
        poses.new_pose.len()
    );

    let skinner = MeshSkinner::with_backend(input.backend);
    if skinner.backend() != input.backend {
        tracing::warn!(
            "{:?} skinning is not supported on this target, using {:?}",
            input.backend,
            skinner.backend()
        );
    }

    let runs = input.bench_runs.unwrap_or(1);
    let mut skinned = skinner.skin(&source, &weights, &poses, profiler)?;
    for _ in 1..runs {
        skinned = skinner.skin(&source, &weights, &poses, profiler)?;
    }

    obj::write_obj(&input.output_mesh_file, &skinned, profiler)?;
    tracing::info!("Wrote skinned mesh to {:?}", input.output_mesh_file);
    Ok(())
}
