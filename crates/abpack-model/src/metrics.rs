//! Evaluation summaries for predicted against measured angles.

/// Root mean squared error. `NaN` when the slices are empty.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return f64::NAN;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (p - a) * (p - a))
        .sum();
    (sum / n as f64).sqrt()
}

/// Mean absolute error. `NaN` when the slices are empty.
pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return f64::NAN;
    }
    let sum: f64 = actual.iter().zip(predicted).map(|(a, p)| (p - a).abs()).sum();
    sum / n as f64
}

/// Mean signed error, predicted minus actual.
pub fn mean_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return f64::NAN;
    }
    let sum: f64 = actual.iter().zip(predicted).map(|(a, p)| p - a).sum();
    sum / n as f64
}
