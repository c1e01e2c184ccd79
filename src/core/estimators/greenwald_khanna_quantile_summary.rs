/// One entry of the summary: `g` is the weight covered since the previous entry and
/// `delta` bounds the rank uncertainty of `value`.
#[derive(Clone, Debug, PartialEq)]
pub struct GkTuple {
    pub value: f64,
    pub g: f64,
    pub delta: f64,
}

/// Weighted Greenwald–Khanna quantile summary holding at most `max_tuples` entries.
#[derive(Clone, Debug)]
pub struct GreenwaldKhannaQuantileSummary {
    tuples: Vec<GkTuple>,
    max_tuples: usize,
    total_weight: f64,
}

impl GreenwaldKhannaQuantileSummary {
    pub fn new(max_tuples: usize) -> Self {
        Self {
            tuples: Vec::new(),
            max_tuples: max_tuples.max(2),
            total_weight: 0.0,
        }
    }

    pub fn insert(&mut self, value: f64, weight: f64) {
        if !value.is_finite() || !weight.is_finite() || weight <= 0.0 {
            return;
        }
        self.total_weight += weight;

        let pos = self.tuples.partition_point(|t| t.value < value);
        if let Some(existing) = self.tuples.get_mut(pos) {
            if existing.value == value {
                existing.g += weight;
                return;
            }
        }

        let delta = if pos == 0 || pos == self.tuples.len() {
            0.0
        } else {
            let next = &self.tuples[pos];
            (next.g + next.delta - 1.0).max(0.0)
        };
        self.tuples.insert(
            pos,
            GkTuple {
                value,
                g: weight,
                delta,
            },
        );

        if self.tuples.len() > self.max_tuples {
            self.compress();
        }
    }

    /// Merges the interior entry whose removal adds the least rank uncertainty into
    /// its successor. The extreme values are never merged away.
    fn compress(&mut self) {
        let n = self.tuples.len();
        if n < 3 {
            return;
        }
        let mut best = 1;
        let mut best_cost = f64::INFINITY;
        for i in 1..n - 1 {
            let cost = self.tuples[i].g + self.tuples[i + 1].g + self.tuples[i + 1].delta;
            if cost < best_cost {
                best_cost = cost;
                best = i;
            }
        }
        let removed = self.tuples.remove(best);
        self.tuples[best].g += removed.g;
    }

    pub fn weight_at_or_below(&self, cut: f64) -> f64 {
        self.tuples
            .iter()
            .take_while(|t| t.value <= cut)
            .map(|t| t.g)
            .sum()
    }

    pub fn tuples(&self) -> &[GkTuple] {
        &self.tuples
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_sorted_entries_and_total() {
        let mut s = GreenwaldKhannaQuantileSummary::new(10);
        for v in [5.0, 1.0, 3.0, 3.0, 9.0] {
            s.insert(v, 1.0);
        }
        let values: Vec<f64> = s.tuples().iter().map(|t| t.value).collect();
        assert_eq!(values, vec![1.0, 3.0, 5.0, 9.0]);
        assert_eq!(s.total_weight(), 5.0);
        assert_eq!(s.weight_at_or_below(3.0), 3.0);
        assert_eq!(s.weight_at_or_below(0.5), 0.0);
    }

    #[test]
    fn never_exceeds_capacity_and_conserves_weight() {
        let mut s = GreenwaldKhannaQuantileSummary::new(8);
        for i in 0..500 {
            s.insert(((i * 37) % 101) as f64, 1.0);
        }
        assert!(s.len() <= 8);
        let g_sum: f64 = s.tuples().iter().map(|t| t.g).sum();
        assert!((g_sum - 500.0).abs() < 1e-9);
        assert_eq!(s.tuples().first().map(|t| t.value), Some(0.0));
        assert_eq!(s.tuples().last().map(|t| t.value), Some(100.0));
    }

    #[test]
    fn rank_estimate_is_roughly_right_for_uniform_input() {
        let mut s = GreenwaldKhannaQuantileSummary::new(20);
        for i in 0..1000 {
            s.insert(i as f64 / 1000.0, 1.0);
        }
        let below_half = s.weight_at_or_below(0.5);
        assert!((below_half - 500.0).abs() < 150.0, "got {below_half}");
    }

    #[test]
    fn ignores_invalid_input() {
        let mut s = GreenwaldKhannaQuantileSummary::new(4);
        s.insert(f64::NAN, 1.0);
        s.insert(1.0, -1.0);
        assert!(s.is_empty());
    }
}
