//! Extreme class distributions consistent with per-class probability intervals.
//!
//! The available probability mass is poured into the intervals like water into a
//! vessel whose floor is drawn by the intervals ("lots") and whose width at each
//! height is the number of intervals covering it ("holes").

use crate::error::{IademError, Result};
use crate::utils::math::ERROR_MARGIN;

#[derive(Clone, Debug, Default)]
pub struct LotsAndHoles {
    lots: Vec<f64>,
    holes: Vec<usize>,
}

impl LotsAndHoles {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_breakpoint(&mut self, x: f64) -> usize {
        let pos = self.lots.partition_point(|&b| b < x);
        if self.lots.get(pos) != Some(&x) {
            let inherited = pos.checked_sub(1).map_or(0, |k| self.holes[k]);
            self.lots.insert(pos, x);
            self.holes.insert(pos, inherited);
        }
        pos
    }

    pub fn insert(&mut self, lower: f64, upper: f64) {
        if upper < lower {
            return;
        }
        let start = self.ensure_breakpoint(lower);
        let end = self.ensure_breakpoint(upper);
        for hole in &mut self.holes[start..end] {
            *hole += 1;
        }
    }

    pub fn compute_level(&self, available: f64) -> Result<f64> {
        let mut remaining = checked_mass("lots and holes level", available)?;
        let Some(&first) = self.lots.first() else {
            return Ok(0.0);
        };
        let mut level = first;
        for k in 0..self.lots.len() - 1 {
            let next = self.lots[k + 1];
            let holes = self.holes[k];
            if holes > 0 {
                let capacity = (next - self.lots[k]) * holes as f64;
                if remaining <= capacity {
                    return Ok(self.lots[k] + remaining / holes as f64);
                }
                remaining -= capacity;
            }
            level = next;
        }
        Ok(level)
    }
}

fn checked_mass(context: &'static str, value: f64) -> Result<f64> {
    if value < -ERROR_MARGIN || value.is_nan() {
        return Err(IademError::Computation { context, value });
    }
    Ok(value.max(0.0))
}

fn available_mass(intervals: &[(f64, f64)]) -> Result<f64> {
    checked_mass(
        "available probability mass",
        1.0 - intervals.iter().map(|(lo, _)| lo).sum::<f64>(),
    )
}

/// Most uniform distribution inside `intervals`, the one of maximal impurity.
pub fn worst_case_distribution(intervals: &[(f64, f64)]) -> Result<Vec<f64>> {
    let available = available_mass(intervals)?;
    let mut vessel = LotsAndHoles::new();
    for &(lo, hi) in intervals {
        vessel.insert(lo, hi);
    }
    let level = vessel.compute_level(available)?;
    Ok(intervals
        .iter()
        .map(|&(lo, hi)| level.clamp(lo, hi.max(lo)))
        .collect())
}

/// Most concentrated distribution inside `intervals`: the mass left above the
/// lower bounds goes to the classes with the highest `estimates` first.
pub fn best_case_distribution(intervals: &[(f64, f64)], estimates: &[f64]) -> Result<Vec<f64>> {
    let mut remaining = available_mass(intervals)?;
    let mut order: Vec<usize> = (0..intervals.len()).collect();
    order.sort_by(|&a, &b| {
        let ea = estimates.get(a).copied().unwrap_or(0.0);
        let eb = estimates.get(b).copied().unwrap_or(0.0);
        eb.total_cmp(&ea).then(a.cmp(&b))
    });

    let mut dist: Vec<f64> = intervals.iter().map(|&(lo, _)| lo).collect();
    for k in order {
        if remaining <= 0.0 {
            break;
        }
        let (lo, hi) = intervals[k];
        let add = remaining.min((hi - lo).max(0.0));
        dist[k] += add;
        remaining -= add;
    }
    Ok(dist)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9
    }

    #[test]
    fn level_spreads_mass_over_covering_intervals() {
        let mut v = LotsAndHoles::new();
        v.insert(0.0, 0.5);
        v.insert(0.2, 0.8);
        // [0,0.2) one hole, [0.2,0.5) two holes
        assert!(approx_eq(v.compute_level(0.1).unwrap(), 0.1));
        assert!(approx_eq(v.compute_level(0.4).unwrap(), 0.3));
        // capacity exhausted: level stops at the last breakpoint
        assert!(approx_eq(v.compute_level(5.0).unwrap(), 0.8));
    }

    #[test]
    fn gaps_between_intervals_are_free() {
        let mut v = LotsAndHoles::new();
        v.insert(0.0, 0.1);
        v.insert(0.6, 0.9);
        assert!(approx_eq(v.compute_level(0.15).unwrap(), 0.65));
    }

    #[test]
    fn negative_mass_beyond_margin_is_an_error() {
        let v = LotsAndHoles::new();
        assert!(v.compute_level(-1e-12).is_ok());
        assert!(matches!(
            v.compute_level(-0.1),
            Err(IademError::Computation { .. })
        ));
        assert!(worst_case_distribution(&[(0.7, 0.9), (0.5, 0.6)]).is_err());
    }

    #[test]
    fn worst_case_is_as_uniform_as_allowed() {
        let dist = worst_case_distribution(&[(0.7, 1.0), (0.0, 0.3)]).unwrap();
        assert!(approx_eq(dist[0], 0.7));
        assert!(approx_eq(dist[1], 0.3));

        let dist = worst_case_distribution(&[(0.2, 0.6), (0.1, 0.6), (0.0, 0.6)]).unwrap();
        assert!(approx_eq(dist.iter().sum::<f64>(), 1.0));
        for d in &dist {
            assert!(approx_eq(*d, 1.0 / 3.0));
        }
    }

    #[test]
    fn best_case_concentrates_on_likely_classes() {
        let intervals = [(0.5, 0.9), (0.1, 0.5), (0.0, 0.2)];
        let dist = best_case_distribution(&intervals, &[0.7, 0.3, 0.0]).unwrap();
        assert!(approx_eq(dist[0], 0.9));
        assert!(approx_eq(dist[1], 0.1));
        assert!(approx_eq(dist[2], 0.0));
    }

    #[test]
    fn best_case_breaks_ties_by_index() {
        let dist = best_case_distribution(&[(0.0, 1.0), (0.0, 1.0)], &[0.5, 0.5]).unwrap();
        assert_eq!(dist, vec![1.0, 0.0]);
    }
}
