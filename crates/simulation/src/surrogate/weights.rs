//! Trained MLP parameters and the forward pass over them.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Inputs: storage, rain, effect, a, b, c.
pub const FEATURE_COUNT: usize = 6;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why the trained model could not produce a prediction.
#[derive(Debug)]
pub enum InferenceError {
    /// A weight matrix or vector has the wrong dimensions.
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// A scale is zero or an intermediate value is NaN/infinite.
    NonFinite(&'static str),
    /// The weights file could not be read.
    Io(std::io::Error),
    /// The weights file is not valid JSON for the expected layout.
    Parse(serde_json::Error),
}

impl fmt::Display for InferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceError::ShapeMismatch {
                what,
                expected,
                found,
            } => write!(f, "Shape mismatch in {what}: expected {expected}, found {found}"),
            InferenceError::NonFinite(what) => write!(f, "Non-finite value in {what}"),
            InferenceError::Io(e) => write!(f, "I/O error: {e}"),
            InferenceError::Parse(e) => write!(f, "Weights parse error: {e}"),
        }
    }
}

impl std::error::Error for InferenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InferenceError::Io(e) => Some(e),
            InferenceError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for InferenceError {
    fn from(e: std::io::Error) -> Self {
        InferenceError::Io(e)
    }
}

impl From<serde_json::Error> for InferenceError {
    fn from(e: serde_json::Error) -> Self {
        InferenceError::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Standard-scaler statistics plus three dense layers (6 → H1 → H2 → 1).
///
/// Matrices are stored input-major: `w_0[i][j]` connects input `i` to hidden
/// unit `j`, so a layer computes `y[j] = b[j] + Σ_i x[i] · w[i][j]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurrogateWeights {
    pub scaler_mean: Vec<f64>,
    pub scaler_scale: Vec<f64>,
    pub w_0: Vec<Vec<f64>>,
    pub b_0: Vec<f64>,
    pub w_1: Vec<Vec<f64>>,
    pub b_1: Vec<f64>,
    pub w_2: Vec<Vec<f64>>,
    pub b_2: Vec<f64>,
}

impl SurrogateWeights {
    /// Read a JSON weights export and check its shapes.
    pub fn load_json(path: &Path) -> Result<Self, InferenceError> {
        let text = fs::read_to_string(path)?;
        let weights: SurrogateWeights = serde_json::from_str(&text)?;
        weights.validate()?;
        Ok(weights)
    }

    /// Check that every layer lines up with its neighbours.
    pub fn validate(&self) -> Result<(), InferenceError> {
        expect_len("scaler_mean", self.scaler_mean.len(), FEATURE_COUNT)?;
        expect_len("scaler_scale", self.scaler_scale.len(), FEATURE_COUNT)?;
        let hidden_1 = check_layer("w_0", &self.w_0, &self.b_0, FEATURE_COUNT)?;
        let hidden_2 = check_layer("w_1", &self.w_1, &self.b_1, hidden_1)?;
        let out = check_layer("w_2", &self.w_2, &self.b_2, hidden_2)?;
        expect_len("b_2", out, 1)
    }

    /// Forward pass: standardize, two ReLU layers, one linear output.
    ///
    /// The output is not clamped; the caller floors it at zero.
    pub fn infer(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, InferenceError> {
        self.validate()?;

        let mut scaled = [0.0; FEATURE_COUNT];
        for (i, x) in features.iter().enumerate() {
            let scale = self.scaler_scale[i];
            if scale == 0.0 || !scale.is_finite() {
                return Err(InferenceError::NonFinite("scaler_scale"));
            }
            scaled[i] = (x - self.scaler_mean[i]) / scale;
        }

        let h1 = dense(&scaled, &self.w_0, &self.b_0, true);
        let h2 = dense(&h1, &self.w_1, &self.b_1, true);
        let out = dense(&h2, &self.w_2, &self.b_2, false);

        match out.first() {
            Some(&y) if y.is_finite() => Ok(y),
            _ => Err(InferenceError::NonFinite("output")),
        }
    }
}

fn expect_len(what: &'static str, found: usize, expected: usize) -> Result<(), InferenceError> {
    if found == expected {
        Ok(())
    } else {
        Err(InferenceError::ShapeMismatch {
            what,
            expected,
            found,
        })
    }
}

/// Validate a `(inputs × outputs)` matrix and its bias; returns the output width.
fn check_layer(
    what: &'static str,
    weights: &[Vec<f64>],
    bias: &[f64],
    inputs: usize,
) -> Result<usize, InferenceError> {
    expect_len(what, weights.len(), inputs)?;
    let outputs = bias.len();
    for row in weights {
        expect_len(what, row.len(), outputs)?;
    }
    Ok(outputs)
}

fn dense(input: &[f64], weights: &[Vec<f64>], bias: &[f64], relu: bool) -> Vec<f64> {
    let mut out = bias.to_vec();
    for (x, row) in input.iter().zip(weights) {
        for (acc, w) in out.iter_mut().zip(row) {
            *acc += x * w;
        }
    }
    if relu {
        for v in &mut out {
            *v = v.max(0.0);
        }
    }
    out
}
