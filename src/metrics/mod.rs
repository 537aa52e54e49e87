//! Agreement and bias statistics over annotated tables.
//!
//! Every reducer is pure: tables in, numbers out. Randomised helpers take
//! the RNG as an argument.

pub mod accuracy;
pub mod bias;
pub mod cohen;
pub mod delta;
pub mod fleiss;
pub mod kappa;
pub mod sampling;

use crate::dimension::Dimension;

/// One scalar per requested dimension, in request order
pub type DimensionStats = Vec<(Dimension, f64)>;

pub use accuracy::{compute_accuracy, AccuracyReport};
pub use bias::{compute_mae, compute_mape, compute_mbe};
pub use cohen::compute_cohen_kappa;
pub use delta::{merge_annotations_for_delta, BiasLabel, DeltaMerge, DeltaSources};
pub use fleiss::{compute_fleiss_kappa, FleissReport};
pub use sampling::{compute_random_cohens_kappa, create_sample, RandomKappa};

/// Mean of the defined values, NaN when there are none
pub(crate) fn nan_mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, n) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}
