//! Integration tests for skin-transform
//!
//! Tests the full pipeline: generate test assets -> skin -> verify outputs


use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use skin_core::{SkinBackend, Vec3};
use skin_transform::obj::parse_obj;
use skin_transform::{AppInput, TOTAL_STAGE};
use tempfile::{TempDir, tempdir};

const PIPELINE_STAGES: [&str; 7] = [
    "read_obj_mesh",
    "read_weights_json",
    "read_inverse_bind_pose_json",
    "read_new_pose_json",
    "cpu_skinning",
    "write_obj_mesh",
    "total",
];

/// Paths of one generated job inside a temp dir
struct Job {
    _dir: TempDir,
    mesh: PathBuf,
    weights: PathBuf,
    inverse_bind_pose: PathBuf,
    new_pose: PathBuf,
    output: PathBuf,
    stats: PathBuf,
}

impl Job {
    /// Triangle bound to one bone translated by (1, 2, 3)
    fn translated_triangle() -> Job {
        let job = Job::empty();
        generate_test_assets::generate_triangle_obj(&job.mesh).expect("Failed to generate OBJ");
        generate_test_assets::generate_single_bone_weights(&job.weights, 3)
            .expect("Failed to generate weights");
        generate_test_assets::generate_pose(
            &job.inverse_bind_pose,
            &[generate_test_assets::identity_json()],
        )
        .expect("Failed to generate inverse bind pose");
        generate_test_assets::generate_pose(
            &job.new_pose,
            &[generate_test_assets::translation_json(1.0, 2.0, 3.0)],
        )
        .expect("Failed to generate new pose");
        job
    }

    fn empty() -> Job {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = |name: &str| dir.path().join(name);
        Job {
            mesh: path("mesh.obj"),
            weights: path("weights.json"),
            inverse_bind_pose: path("inverse_bind_pose.json"),
            new_pose: path("new_pose.json"),
            output: path("skinned.obj"),
            stats: path("stats.json"),
            _dir: dir,
        }
    }

    fn args(&self) -> Vec<String> {
        let pairs: [(&str, &Path); 6] = [
            ("--mesh", &self.mesh),
            ("--bones-weights", &self.weights),
            ("--inverse-bind-pose", &self.inverse_bind_pose),
            ("--new-pose", &self.new_pose),
            ("--output", &self.output),
            ("--stats", &self.stats),
        ];
        pairs
            .iter()
            .flat_map(|(flag, path)| [flag.to_string(), path.to_str().unwrap().to_string()])
            .collect()
    }

    fn input(&self) -> AppInput {
        AppInput {
            mesh_file: self.mesh.clone(),
            weights_file: self.weights.clone(),
            inverse_bind_pose_file: self.inverse_bind_pose.clone(),
            new_pose_file: self.new_pose.clone(),
            output_mesh_file: self.output.clone(),
            stats_file: self.stats.clone(),
            bench_runs: None,
            backend: SkinBackend::Scalar,
        }
    }

    fn output_positions(&self) -> Vec<Vec3> {
        let text = std::fs::read_to_string(&self.output).expect("Failed to read skinned OBJ");
        parse_obj(&text).expect("Skinned OBJ should parse").positions
    }

    fn stats(&self) -> serde_json::Value {
        let text = std::fs::read_to_string(&self.stats).expect("Failed to read stats");
        serde_json::from_str(&text).expect("Stats should be valid JSON")
    }
}

fn run_skin_transform(args: &[String]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_skin-transform"))
        .args(args)
        .output()
        .expect("Failed to run skin-transform")
}

fn stage_names(stats: &serde_json::Value) -> Vec<String> {
    stats["stages"]
        .as_array()
        .expect("stages should be an array")
        .iter()
        .map(|entry| entry["stage"].as_str().unwrap().to_string())
        .collect()
}

fn assert_close(actual: Vec3, expected: Vec3) {
    assert!(
        (actual.x - expected.x).abs() < 1e-5
            && (actual.y - expected.y).abs() < 1e-5
            && (actual.z - expected.z).abs() < 1e-5,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

/// Test the binary end to end: skinned OBJ, stats file, exit status
#[test]
fn test_cli_translates_triangle() {
    let job = Job::translated_triangle();

    let output = run_skin_transform(&job.args());
    assert!(output.status.success(), "skin-transform failed: {:?}", output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Success"));

    let positions = job.output_positions();
    assert_eq!(positions.len(), 3);
    assert_close(positions[0], Vec3::new(1.0, 2.0, 3.0));
    assert_close(positions[1], Vec3::new(2.0, 2.0, 3.0));
    assert_close(positions[2], Vec3::new(1.0, 3.0, 3.0));

    let skinned = std::fs::read_to_string(&job.output).unwrap();
    assert!(skinned.starts_with("# Skinned mesh"));
    assert!(skinned.contains("f 1 2 3"));

    let stats = job.stats();
    assert_eq!(stage_names(&stats), PIPELINE_STAGES);
    assert!(stats.get("bench_summary").is_none());
    for entry in stats["stages"].as_array().unwrap() {
        assert!(entry["microseconds"].as_f64().unwrap() >= 0.0);
    }
}

/// Test the library runner with an even two-bone blend
#[test]
fn test_run_blends_two_bones() {
    let job = Job::empty();
    generate_test_assets::generate_triangle_obj(&job.mesh).unwrap();
    generate_test_assets::generate_two_bone_weights(&job.weights, 3).unwrap();
    let identity = generate_test_assets::identity_json();
    generate_test_assets::generate_pose(&job.inverse_bind_pose, &[identity.clone(), identity])
        .unwrap();
    generate_test_assets::generate_pose(
        &job.new_pose,
        &[
            generate_test_assets::translation_json(2.0, 0.0, 0.0),
            generate_test_assets::translation_json(0.0, 2.0, 0.0),
        ],
    )
    .unwrap();

    let report = skin_transform::run(&job.input()).expect("run should succeed");
    assert_eq!(report.stages.last().unwrap().stage, TOTAL_STAGE);

    let positions = job.output_positions();
    assert_close(positions[0], Vec3::new(1.0, 1.0, 0.0));
    assert_close(positions[1], Vec3::new(2.0, 1.0, 0.0));
}

/// Test that the stats file is still written when skinning fails
#[test]
fn test_stats_written_on_failure() {
    let job = Job::translated_triangle();
    // Two inverse bind matrices against one new pose matrix
    let identity = generate_test_assets::identity_json();
    generate_test_assets::generate_pose(&job.inverse_bind_pose, &[identity.clone(), identity])
        .unwrap();

    let output = run_skin_transform(&job.args());
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "stderr: {}", stderr);
    assert!(!job.output.exists(), "no partial mesh output");

    let stages = stage_names(&job.stats());
    assert!(stages.contains(&"cpu_skinning".to_string()));
    assert_eq!(stages.last().map(String::as_str), Some("total"));
    assert!(!stages.contains(&"write_obj_mesh".to_string()));
}

/// Test that a failed stats write does not replace the skinning error
#[test]
fn test_skinning_error_kept_when_stats_unwritable() {
    let job = Job::translated_triangle();
    let identity = generate_test_assets::identity_json();
    generate_test_assets::generate_pose(&job.inverse_bind_pose, &[identity.clone(), identity])
        .unwrap();
    let mut input = job.input();
    input.stats_file = job.mesh.with_file_name("missing").join("stats.json");

    let err = skin_transform::run(&input).unwrap_err();
    let core = err
        .downcast_ref::<skin_core::SkinError>()
        .expect("skinning error should be returned");
    assert_eq!(core.kind(), skin_core::ErrorKind::Validation);
    assert!(!input.stats_file.exists());
    assert!(!job.output.exists());

    let mut args = job.args();
    let stats_value = args.len() - 1;
    args[stats_value] = input.stats_file.to_str().unwrap().to_string();
    let output = run_skin_transform(&args);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "stderr: {}", stderr);
    assert!(!stderr.contains("Error: Failed to create stats output"), "stderr: {}", stderr);
}

/// Test that a parse failure is reported and still timed
#[test]
fn test_malformed_weights_document() {
    let job = Job::translated_triangle();
    std::fs::write(&job.weights, r#"{ "vertices": [ { "weights": [1.0], } ] }"#).unwrap();

    let err = skin_transform::run(&job.input()).unwrap_err();
    let core = err
        .downcast_ref::<skin_core::SkinError>()
        .expect("core error should be in the chain");
    assert_eq!(core.kind(), skin_core::ErrorKind::Parse);

    let stages = stage_names(&job.stats());
    assert_eq!(stages, ["read_obj_mesh", "read_weights_json", "total"]);
}

/// Test the bench loop: N skinning samples plus a summary
#[test]
fn test_bench_five_runs() {
    let job = Job::translated_triangle();
    let mut args = job.args();
    args.extend(["--bench".to_string(), "5".to_string()]);

    let output = run_skin_transform(&args);
    assert!(output.status.success(), "skin-transform failed: {:?}", output);

    let stats = job.stats();
    let skinning_runs = stage_names(&stats)
        .iter()
        .filter(|stage| *stage == "cpu_skinning")
        .count();
    assert_eq!(skinning_runs, 5);

    let summary = &stats["bench_summary"];
    assert_eq!(summary["runs"], 5);
    let min = summary["min_microseconds"].as_f64().unwrap();
    let mean = summary["mean_microseconds"].as_f64().unwrap();
    let median = summary["median_microseconds"].as_f64().unwrap();
    let max = summary["max_microseconds"].as_f64().unwrap();
    assert!(min <= mean && mean <= max);
    assert!(min <= median && median <= max);
    assert!(summary["stddev_microseconds"].as_f64().unwrap() >= 0.0);
}

/// Test that a non-positive bench count is rejected with exit code 1
#[test]
fn test_invalid_bench_rejected() {
    let job = Job::translated_triangle();
    for bad in ["0", "-3", "many"] {
        let mut args = job.args();
        args.extend(["--bench".to_string(), bad.to_string()]);
        let output = run_skin_transform(&args);
        assert_eq!(output.status.code(), Some(1), "--bench {} accepted", bad);
    }
    assert!(!job.stats.exists());
}

/// Test that a missing required input is reported
#[test]
fn test_missing_required_argument() {
    let job = Job::translated_triangle();
    let args: Vec<String> = job.args().into_iter().take(10).collect();

    let output = run_skin_transform(&args);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--stats"));
}

/// Test that help goes to stdout with exit code 0
#[test]
fn test_help_exits_zero() {
    let output = run_skin_transform(&["--help".to_string()]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"), "stdout: {}", stdout);
    assert!(stdout.contains("--bones-weights"));
}

/// Test that an unknown flag is reported on stderr with exit code 1
#[test]
fn test_unknown_flag_rejected() {
    let output = run_skin_transform(&["--frobnicate".to_string()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--frobnicate"));
}

/// Test a TOML job file with a command-line override
#[test]
fn test_job_file_with_override() {
    let job = Job::translated_triangle();
    let config = job.mesh.with_file_name("job.toml");
    let cli_stats = job.mesh.with_file_name("cli-stats.json");
    std::fs::write(
        &config,
        format!(
            "mesh = {:?}\nbones_weights = {:?}\ninverse_bind_pose = {:?}\nnew_pose = {:?}\noutput = {:?}\nstats = {:?}\nbench = 2\n",
            job.mesh, job.weights, job.inverse_bind_pose, job.new_pose, job.output, job.stats
        ),
    )
    .unwrap();

    let output = run_skin_transform(&[
        "--config".to_string(),
        config.to_str().unwrap().to_string(),
        "--stats".to_string(),
        cli_stats.to_str().unwrap().to_string(),
    ]);
    assert!(output.status.success(), "skin-transform failed: {:?}", output);

    assert!(!job.stats.exists(), "job file stats path should be overridden");
    let stats: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&cli_stats).unwrap()).unwrap();
    assert_eq!(stats["bench_summary"]["runs"], 2);
    assert_close(job.output_positions()[0], Vec3::new(1.0, 2.0, 3.0));
}

/// Test that the accelerated flag produces the same mesh
#[test]
fn test_accelerated_matches_scalar() {
    let job = Job::translated_triangle();
    let mut args = job.args();
    args.push("--accelerated".to_string());

    let output = run_skin_transform(&args);
    assert!(output.status.success(), "skin-transform failed: {:?}", output);

    let positions = job.output_positions();
    assert_close(positions[0], Vec3::new(1.0, 2.0, 3.0));
    assert_close(positions[2], Vec3::new(1.0, 3.0, 3.0));
}
