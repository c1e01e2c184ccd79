use libm::erf;

/// Tolerance for floating bookkeeping that should sum to exact values.
pub const ERROR_MARGIN: f64 = 1e-9;

pub fn normal_probability(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// Index of the largest value; the lowest index wins ties and an empty slice yields 0.
pub fn max_index(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Resizes `votes` to `len` entries and scales them to sum to one. Negative or
/// non-finite entries count as zero; an all-zero vector becomes uniform.
pub fn normalize_votes(mut votes: Vec<f64>, len: usize) -> Vec<f64> {
    if len == 0 {
        return Vec::new();
    }
    votes.resize(len, 0.0);
    for v in votes.iter_mut() {
        if !v.is_finite() || *v < 0.0 {
            *v = 0.0;
        }
    }
    let total = sum(&votes);
    if total > 0.0 {
        votes.iter_mut().for_each(|v| *v /= total);
    } else {
        votes.iter_mut().for_each(|v| *v = 1.0 / len as f64);
    }
    votes
}

pub fn count_non_zero(values: &[f64]) -> usize {
    values.iter().filter(|&&v| v > 0.0).count()
}
