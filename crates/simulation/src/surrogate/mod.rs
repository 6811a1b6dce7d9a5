//! Storage transition model: a small trained MLP with a closed-form fallback.

mod model;
#[cfg(test)]
mod tests;
mod weights;

pub use model::{closed_form_storage, TransitionModel};
pub use weights::{InferenceError, SurrogateWeights, FEATURE_COUNT};
