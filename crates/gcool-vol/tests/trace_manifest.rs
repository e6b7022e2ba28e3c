use std::fs;

use gcool_core::Region;
use gcool_poly::{canonical_hash, cube};
use gcool_vol::{estimate_volume, VolumeConfig, VolumeManifest};
use tempfile::tempdir;

fn square_estimate(config: &VolumeConfig) -> (String, gcool_vol::VolumeEstimate) {
    let mut region = cube(2, 1.0).unwrap();
    let hash = canonical_hash(&region);
    let ball = region.inner_ball().unwrap();
    let outcome = estimate_volume(
        &mut region,
        config,
        &ball,
        false,
        &mut config.seed_policy.rng(),
    )
    .unwrap();
    (hash, outcome.estimate().unwrap().clone())
}

#[test]
fn trace_csv_has_one_row_per_phase() {
    let config = VolumeConfig::default().with_seed(21);
    let (_, estimate) = square_estimate(&config);
    let dir = tempdir().unwrap();
    let path = dir.path().join("trace.csv");
    estimate.trace().write_csv(&path).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "phase,a_from,a_to,ratio,samples,window_spread");
    assert_eq!(lines.len(), estimate.num_phases() + 1);
    let first: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(first.len(), 6);
    assert_eq!(first[0], "0");
    assert_eq!(first[4].parse::<usize>().unwrap(), estimate.phases[0].samples);
}

#[test]
fn trace_write_reports_missing_directory() {
    let config = VolumeConfig::default().with_seed(21);
    let (_, estimate) = square_estimate(&config);
    let dir = tempdir().unwrap();
    let err = estimate
        .trace()
        .write_csv(dir.path().join("missing").join("trace.csv"))
        .unwrap_err();
    assert_eq!(err.info().code, "trace-write");
}

#[test]
fn manifest_round_trips_through_disk() {
    let config = VolumeConfig::default().with_seed(33);
    let (hash, estimate) = square_estimate(&config);
    let dir = tempdir().unwrap();
    let path = dir.path().join("run").join("manifest.json");
    let manifest =
        VolumeManifest::from_estimate(&config, hash.clone(), &estimate).with_trace_file("trace.csv");
    manifest.write(&path).unwrap();

    let loaded = VolumeManifest::load(&path).unwrap();
    assert_eq!(loaded.config, config);
    assert_eq!(loaded.master_seed, 33);
    assert_eq!(loaded.region_hash, hash);
    assert_eq!(loaded.total_steps, estimate.total_steps);
    assert_eq!(loaded.phase_steps, estimate.phase_steps);
    assert_eq!(loaded.schedule.len(), estimate.schedule.len());
    assert!((loaded.volume - estimate.volume).abs() < 1e-12 * estimate.volume);
    assert_eq!(loaded.trace_file.as_deref(), Some(std::path::Path::new("trace.csv")));
}

#[test]
fn loading_garbage_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("manifest.json");
    fs::write(&path, "{ not json").unwrap();
    assert_eq!(
        VolumeManifest::load(&path).unwrap_err().info().code,
        "manifest-parse"
    );
    assert_eq!(
        VolumeManifest::load(&dir.path().join("absent.json"))
            .unwrap_err()
            .info()
            .code,
        "manifest-read"
    );
}
