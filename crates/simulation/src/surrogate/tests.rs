use std::fs;
use std::path::PathBuf;

use super::*;
use crate::scenario::ZoneParameters;

fn lowland() -> ZoneParameters {
    ZoneParameters {
        a: 0.9,
        b: 0.15,
        c: 0.7,
        threshold: 3.5,
        damage_scale: 12.0,
    }
}

/// A 6 → 2 → 1 → 1 network computing `relu(storage) + 0.5·relu(rain)`
/// (identity scaler).
fn tiny_weights() -> SurrogateWeights {
    SurrogateWeights {
        scaler_mean: vec![0.0; FEATURE_COUNT],
        scaler_scale: vec![1.0; FEATURE_COUNT],
        w_0: vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.0, 0.0],
            vec![0.0, 0.0],
            vec![0.0, 0.0],
            vec![0.0, 0.0],
        ],
        b_0: vec![0.0, 0.0],
        w_1: vec![vec![1.0], vec![0.5]],
        b_1: vec![0.0],
        w_2: vec![vec![1.0]],
        b_2: vec![0.0],
    }
}

// ---------------------------------------------------------------------------
// Closed-form fallback
// ---------------------------------------------------------------------------

#[test]
fn test_fallback_formula() {
    let model = TransitionModel::fallback();
    let next = model.predict_next_storage(2.0, 10.0, 1.0, &lowland());
    // 0.9*2 + 0.15*10 - 0.7*1 = 2.6
    assert!((next - 2.6).abs() < 1e-12, "got {next}");
}

#[test]
fn test_fallback_floors_at_zero() {
    let model = TransitionModel::fallback();
    let next = model.predict_next_storage(0.5, 0.0, 10.0, &lowland());
    assert_eq!(next, 0.0);
}

#[test]
fn test_prediction_never_negative() {
    let models = [TransitionModel::fallback(), TransitionModel::with_weights(tiny_weights())];
    for model in &models {
        for storage in [0.0, 0.1, 5.0, 50.0] {
            for rain in [0.0, 1.0, 60.0] {
                for effect in [0.0, 1.5, 4.0, 100.0] {
                    let next = model.predict_next_storage(storage, rain, effect, &lowland());
                    assert!(next >= 0.0, "negative storage {next}");
                }
            }
        }
    }
}

#[test]
fn test_prediction_is_pure() {
    let model = TransitionModel::with_weights(tiny_weights());
    let a = model.predict_next_storage(3.0, 4.0, 0.0, &lowland());
    let b = model.predict_next_storage(3.0, 4.0, 0.0, &lowland());
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// Trained weights
// ---------------------------------------------------------------------------

#[test]
fn test_trained_forward_pass() {
    let model = TransitionModel::with_weights(tiny_weights());
    assert!(model.has_weights());
    let next = model.predict_next_storage(3.0, 4.0, 0.0, &lowland());
    assert!((next - 5.0).abs() < 1e-12, "expected 3 + 0.5*4, got {next}");
}

#[test]
fn test_scaler_is_applied() {
    let mut weights = tiny_weights();
    weights.scaler_mean[0] = 1.0;
    weights.scaler_scale[0] = 2.0;
    let y = weights.infer(&[5.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
    assert!((y - 2.0).abs() < 1e-12, "(5 - 1) / 2 = 2, got {y}");
}

#[test]
fn test_shape_mismatch_falls_back() {
    let mut weights = tiny_weights();
    weights.b_0.push(0.0);
    assert!(matches!(
        weights.validate(),
        Err(InferenceError::ShapeMismatch { what: "w_0", .. })
    ));

    let model = TransitionModel::with_weights(weights);
    assert!(model.infer(2.0, 10.0, 1.0, &lowland()).is_err());
    let next = model.predict_next_storage(2.0, 10.0, 1.0, &lowland());
    assert!((next - 2.6).abs() < 1e-12, "fallback expected, got {next}");
}

#[test]
fn test_zero_scale_is_non_finite() {
    let mut weights = tiny_weights();
    weights.scaler_scale[2] = 0.0;
    let err = weights.infer(&[1.0; FEATURE_COUNT]).unwrap_err();
    assert!(matches!(err, InferenceError::NonFinite("scaler_scale")));
}

#[test]
fn test_missing_weights_reports_unavailable() {
    let model = TransitionModel::fallback();
    assert!(!model.has_weights());
    assert!(model.infer(1.0, 1.0, 0.0, &lowland()).is_err());
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn test_file(name: &str) -> PathBuf {
    let dir = PathBuf::from("/tmp/flood_surrogate_test");
    fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn test_load_json_roundtrip() {
    let path = test_file("weights_ok.json");
    fs::write(&path, serde_json::to_string(&tiny_weights()).unwrap()).unwrap();

    let loaded = SurrogateWeights::load_json(&path).unwrap();
    assert_eq!(loaded, tiny_weights());

    let model = TransitionModel::load_or_fallback(Some(&path));
    assert!(model.has_weights());
    let _ = fs::remove_file(&path);
}

#[test]
fn test_malformed_file_uses_fallback() {
    let path = test_file("weights_bad.json");
    fs::write(&path, r#"{"scaler_mean": [1, 2]}"#).unwrap();

    assert!(matches!(
        SurrogateWeights::load_json(&path),
        Err(InferenceError::Parse(_))
    ));
    let model = TransitionModel::load_or_fallback(Some(&path));
    assert!(!model.has_weights());
    let _ = fs::remove_file(&path);
}

#[test]
fn test_missing_file_uses_fallback() {
    let path = PathBuf::from("/tmp/flood_surrogate_test/does_not_exist.json");
    assert!(matches!(
        SurrogateWeights::load_json(&path),
        Err(InferenceError::Io(_))
    ));
    assert!(!TransitionModel::load_or_fallback(Some(&path)).has_weights());
    assert!(!TransitionModel::load_or_fallback(None).has_weights());
}
