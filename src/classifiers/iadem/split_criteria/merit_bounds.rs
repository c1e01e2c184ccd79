use crate::classifiers::iadem::bounds::hoeffding_bound;
use crate::classifiers::iadem::lots_and_holes::{best_case_distribution, worst_case_distribution};
use crate::classifiers::iadem::split_criteria::SplitCriterionKind;
use crate::error::Result;
use crate::utils::math::ERROR_MARGIN;

/// Confidence interval on the normalized impurity left by a split (lower is better).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeritBounds {
    pub lower: f64,
    pub upper: f64,
}

impl MeritBounds {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Length of the intersection of both intervals over the length of their union.
    pub fn percent_in_common(&self, other: &MeritBounds) -> f64 {
        let union = self.upper.max(other.upper) - self.lower.min(other.lower);
        if union <= ERROR_MARGIN {
            return 1.0;
        }
        let overlap = (self.upper.min(other.upper) - self.lower.max(other.lower)).max(0.0);
        (overlap / union).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SplitEvaluator {
    pub criterion: SplitCriterionKind,
    pub confidence: f64,
}

impl SplitEvaluator {
    pub fn new(criterion: SplitCriterionKind, confidence: f64) -> Self {
        Self {
            criterion,
            confidence,
        }
    }

    fn branch_bounds(&self, dist: &[f64], n: f64) -> Result<MeritBounds> {
        let estimates: Vec<f64> = dist.iter().map(|c| (c / n).clamp(0.0, 1.0)).collect();
        let intervals: Vec<(f64, f64)> = estimates
            .iter()
            .map(|&p| {
                let eps = hoeffding_bound(p, n, self.confidence);
                ((p - eps).max(0.0), (p + eps).min(1.0))
            })
            .collect();

        let worst = worst_case_distribution(&intervals)?;
        let best = best_case_distribution(&intervals, &estimates)?;
        Ok(MeritBounds {
            lower: self.criterion.normalized_measure(&best)?,
            upper: self.criterion.normalized_measure(&worst)?,
        })
    }

    /// Weighted merit bounds of the branches; `None` when no branch holds weight.
    pub fn merit_bounds(&self, branches: &[Vec<f64>]) -> Result<Option<MeritBounds>> {
        let total: f64 = branches.iter().map(|b| b.iter().sum::<f64>()).sum();
        if total <= 0.0 {
            return Ok(None);
        }
        let mut lower = 0.0;
        let mut upper = 0.0;
        for branch in branches {
            let n: f64 = branch.iter().sum();
            if n <= 0.0 {
                continue;
            }
            let bounds = self.branch_bounds(branch, n)?;
            lower += n / total * bounds.lower;
            upper += n / total * bounds.upper;
        }
        let upper = upper.clamp(0.0, 1.0);
        Ok(Some(MeritBounds {
            lower: lower.clamp(0.0, upper),
            upper,
        }))
    }

    pub fn class_distribution_bounds(&self, dist: &[f64]) -> Result<Option<MeritBounds>> {
        self.merit_bounds(&[dist.to_vec()])
    }
}
