#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use flappy_evo::simulation::collision::CollisionKind;
use flappy_evo::simulation::params::{Params, ParamsError};
use std::fs;
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("flappy_evo_params_{}_{}.json", name, std::process::id()))
}

#[test]
fn test_defaults_match_classic_game() {
    let params = Params::default();
    assert!(params.validate().is_ok());

    assert_eq!(params.ground_y, 680.0);
    assert_eq!((params.agent_start_x, params.agent_start_y), (200.0, 280.0));
    assert_eq!(params.impulse_velocity, -10.5);
    assert_eq!(params.obstacle_gap, 200.0);
    assert_eq!(params.obstacle_speed, 5.0);
    assert_eq!(params.tick_rate, 30);
    assert_eq!(params.layer_sizes, vec![3, 6, 1]);
    assert_eq!(params.bounds_penalty, 0.0);
    assert_eq!(params.collision, CollisionKind::PixelMask);
    assert!((params.tick_seconds() - 1.0 / 30.0).abs() < 1e-6);
}

#[test]
fn test_invalid_values_rejected() {
    let cases = [
        Params {
            obstacle_speed: 0.0,
            ..Params::default()
        },
        Params {
            gap_top_min: 300.0,
            gap_top_max: 300.0,
            ..Params::default()
        },
        Params {
            obstacle_gap: 40.0,
            ..Params::default()
        },
        Params {
            tick_rate: 0,
            ..Params::default()
        },
        Params {
            population_size: 0,
            ..Params::default()
        },
        Params {
            elite_count: 60,
            ..Params::default()
        },
        Params {
            parent_fraction: 0.0,
            ..Params::default()
        },
        Params {
            mutation_min: 0.5,
            mutation_max: 0.1,
            ..Params::default()
        },
        Params {
            layer_sizes: vec![4, 6, 1],
            ..Params::default()
        },
        Params {
            layer_sizes: vec![3],
            ..Params::default()
        },
        Params {
            layer_sizes: vec![3, 0, 1],
            ..Params::default()
        },
        Params {
            window_width: f32::NAN,
            ..Params::default()
        },
        Params {
            gap_top_min: f32::NEG_INFINITY,
            ..Params::default()
        },
        Params {
            gap_top_min: -3.0e38,
            gap_top_max: 3.0e38,
            ..Params::default()
        },
        Params {
            agent_start_y: f32::NAN,
            ..Params::default()
        },
        Params {
            gravity: f32::INFINITY,
            ..Params::default()
        },
        Params {
            impulse_velocity: f32::NEG_INFINITY,
            ..Params::default()
        },
        Params {
            rise_bias: f32::NAN,
            ..Params::default()
        },
    ];

    for params in cases {
        assert!(
            matches!(params.validate(), Err(ParamsError::Invalid { .. })),
            "{params:?} should be rejected"
        );
    }
}

#[test]
fn test_json_round_trip() {
    let params = Params {
        obstacle_gap: 180.0,
        collision: CollisionKind::BoundingBox,
        layer_sizes: vec![3, 8, 4, 1],
        ..Params::default()
    };
    let path = temp_path("round_trip");

    params.save_to_file(&path).expect("Failed to save params");
    let loaded = Params::load_from_file(&path).expect("Failed to load params");
    assert_eq!(loaded, params);

    fs::remove_file(&path).ok();
}

#[test]
fn test_partial_file_uses_defaults() {
    let path = temp_path("partial");
    fs::write(&path, r#"{ "obstacle_gap": 180.0, "score_ceiling": 5 }"#)
        .expect("Failed to write file");

    let loaded = Params::load_from_file(&path).expect("Failed to load params");
    assert_eq!(loaded.obstacle_gap, 180.0);
    assert_eq!(loaded.score_ceiling, 5);
    assert_eq!(loaded.ground_y, Params::default().ground_y);

    fs::remove_file(&path).ok();
}

#[test]
fn test_invalid_file_rejected_at_load() {
    let path = temp_path("invalid");
    fs::write(&path, r#"{ "gap_top_min": 500.0, "gap_top_max": 100.0 }"#)
        .expect("Failed to write file");
    assert!(matches!(
        Params::load_from_file(&path),
        Err(ParamsError::Invalid { name: "gap_top_min", .. })
    ));

    fs::write(&path, "not json").expect("Failed to write file");
    assert!(matches!(
        Params::load_from_file(&path),
        Err(ParamsError::Json { .. })
    ));

    fs::remove_file(&path).ok();
    assert!(matches!(
        Params::load_from_file(&path),
        Err(ParamsError::Io { .. })
    ));
}

#[test]
fn test_overflowing_gap_rejected_at_load() {
    let path = temp_path("overflow");
    // -1e39 does not fit in an f32 and decodes as negative infinity
    fs::write(&path, r#"{ "gap_top_min": -1e39 }"#).expect("Failed to write file");

    assert!(matches!(
        Params::load_from_file(&path),
        Err(ParamsError::Invalid { name: "gap_top_min", .. })
    ));

    fs::remove_file(&path).ok();
}
