use crate::classifiers::attribute_class_observers::attribute_class_observer::{
    AttributeClassObserver, NumericAttributeClassObserver, is_observable, thin_evenly,
};
use std::any::Any;

#[derive(Clone, Debug, Default)]
struct Bin {
    lower_bound: f64,
    upper_bound: f64,
    class_weights: Vec<f64>,
    boundary_class: usize,
    boundary_weight: f64,
}

impl Bin {
    fn new(value: f64, class_val: usize, weight: f64) -> Self {
        let mut bin = Bin {
            lower_bound: value,
            upper_bound: value,
            class_weights: Vec::new(),
            boundary_class: class_val,
            boundary_weight: weight,
        };
        bin.add(class_val, weight);
        bin
    }

    fn add(&mut self, class_val: usize, weight: f64) {
        if class_val >= self.class_weights.len() {
            self.class_weights.resize(class_val + 1, 0.0);
        }
        self.class_weights[class_val] += weight;
    }

    fn weight_of(&self, class_val: usize) -> f64 {
        self.class_weights.get(class_val).copied().unwrap_or(0.0)
    }
}

/// Numeric observer summarising values into at most `max_bins` adaptive bins.
///
/// Bins are split at new values until the cap is reached; weights of the split bin
/// are shared by linear interpolation, except the weight sitting exactly on its
/// lower boundary, which stays put.
#[derive(Clone, Debug)]
pub struct VfmlNumericAttributeClassObserver {
    bins: Vec<Bin>,
    max_bins: usize,
}

#[derive(Clone, Copy)]
enum Position {
    Inside(usize),
    BeforeFirst,
    AfterLast,
}

impl VfmlNumericAttributeClassObserver {
    pub fn new(max_bins: usize) -> Self {
        Self {
            bins: Vec::new(),
            max_bins: max_bins.max(1),
        }
    }

    fn locate(&self, value: f64) -> Position {
        let last = self.bins.len() - 1;
        let (mut lo, mut hi) = (0isize, last as isize);
        while lo <= hi {
            let i = ((lo + hi) / 2) as usize;
            let bin = &self.bins[i];
            let inside = value >= bin.lower_bound
                && (value < bin.upper_bound || (i == last && value <= bin.upper_bound));
            if inside {
                return Position::Inside(i);
            }
            if value < bin.lower_bound {
                hi = i as isize - 1;
            } else {
                lo = i as isize + 1;
            }
        }
        if value < self.bins[0].lower_bound {
            Position::BeforeFirst
        } else {
            Position::AfterLast
        }
    }

    fn insert(&mut self, value: f64, class_val: usize, weight: f64) {
        let position = self.locate(value);
        let index = match position {
            Position::Inside(i) => i,
            Position::BeforeFirst => 0,
            Position::AfterLast => self.bins.len() - 1,
        };

        let at_capacity = self.bins.len() >= self.max_bins;
        let bin = &mut self.bins[index];
        if bin.lower_bound == value || at_capacity {
            bin.add(class_val, weight);
            if bin.boundary_class == class_val && bin.lower_bound == value {
                bin.boundary_weight += weight;
            }
            return;
        }

        let mut new_bin = Bin::new(value, class_val, weight);
        let width = bin.upper_bound - bin.lower_bound;
        let percent = match position {
            Position::Inside(_) if width > 0.0 => 1.0 - (value - bin.lower_bound) / width,
            _ => 0.0,
        };

        let boundary_class = bin.boundary_class;
        let boundary_weight = bin.boundary_weight;
        bin.add(boundary_class, -boundary_weight);
        for (c, w) in bin.class_weights.iter_mut().enumerate() {
            let shifted = *w * percent;
            *w -= shifted;
            if shifted != 0.0 {
                new_bin.add(c, shifted);
            }
        }
        bin.add(boundary_class, boundary_weight);

        match position {
            Position::AfterLast => {
                bin.upper_bound = value;
                new_bin.upper_bound = value;
                self.bins.push(new_bin);
            }
            Position::BeforeFirst => {
                new_bin.upper_bound = bin.lower_bound;
                self.bins.insert(0, new_bin);
            }
            Position::Inside(i) => {
                new_bin.upper_bound = bin.upper_bound;
                bin.upper_bound = value;
                self.bins.insert(i + 1, new_bin);
            }
        }
    }

    pub fn number_of_bins(&self) -> usize {
        self.bins.len()
    }
}

impl AttributeClassObserver for VfmlNumericAttributeClassObserver {
    fn observe_attribute_class(&mut self, att_val: f64, class_val: usize, weight: f64) {
        if !is_observable(att_val, weight) || !att_val.is_finite() {
            return;
        }
        if self.bins.is_empty() {
            self.bins.push(Bin::new(att_val, class_val, weight));
        } else {
            self.insert(att_val, class_val, weight);
        }
    }

    fn probability_of_attribute_value_given_class(
        &self,
        att_val: f64,
        class_val: usize,
    ) -> Option<f64> {
        if att_val.is_nan() || self.bins.is_empty() {
            return None;
        }
        let class_total: f64 = self.bins.iter().map(|b| b.weight_of(class_val)).sum();
        if class_total <= 0.0 {
            return None;
        }
        let mass = match self.locate(att_val) {
            Position::Inside(i) => self.bins[i].weight_of(class_val).max(0.0),
            _ => 0.0,
        };
        Some((mass + 1.0) / (class_total + self.bins.len() as f64))
    }

    fn total_weight_observed(&self) -> f64 {
        self.class_distribution().iter().sum()
    }

    fn class_distribution(&self) -> Vec<f64> {
        let classes = self.bins.iter().map(|b| b.class_weights.len()).max().unwrap_or(0);
        (0..classes)
            .map(|c| self.bins.iter().map(|b| b.weight_of(c)).sum())
            .collect()
    }

    fn reset(&mut self) {
        self.bins.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl NumericAttributeClassObserver for VfmlNumericAttributeClassObserver {
    fn number_of_cut_points(&self) -> usize {
        self.bins.len().saturating_sub(1)
    }

    fn cut_point_suggestions(&self, max_cut_points: usize) -> Vec<f64> {
        let points = self.bins.iter().skip(1).map(|b| b.lower_bound).collect();
        thin_evenly(points, max_cut_points)
    }

    fn left_class_distribution(&self, cut_value: f64) -> Vec<f64> {
        let classes = self.bins.iter().map(|b| b.class_weights.len()).max().unwrap_or(0);
        let mut left = vec![0.0; classes];
        for bin in self.bins.iter().filter(|b| b.lower_bound < cut_value) {
            for (c, w) in bin.class_weights.iter().enumerate() {
                left[c] += w;
            }
        }
        left
    }

    fn cut_value_goes_left(&self) -> bool {
        false
    }
}
