mod sea_generator;
mod stagger_generator;

pub use sea_generator::SeaGenerator;
pub use stagger_generator::StaggerGenerator;

use rand::Rng;
use rand::rngs::StdRng;

/// Concept schedule shared by the generators: a starting function and an
/// optional abrupt switch to another one after `drift_at` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ConceptSchedule {
    pub function_id: u8,
    pub drift: Option<(u64, u8)>,
}

impl ConceptSchedule {
    pub fn function_at(&self, produced: u64) -> u8 {
        match self.drift {
            Some((at, function_id)) if produced >= at => function_id,
            _ => self.function_id,
        }
    }
}

/// Keeps drawing until `draw` yields the wanted class when balancing, and
/// alternates the wanted class between calls.
pub(crate) fn draw_balanced<T>(
    rng: &mut StdRng,
    balance: bool,
    next_class_should_be_zero: &mut bool,
    mut draw: impl FnMut(&mut StdRng) -> (T, usize),
) -> (T, usize) {
    loop {
        let (values, class) = draw(rng);
        if !balance {
            return (values, class);
        }
        let wanted = if *next_class_should_be_zero { 0 } else { 1 };
        if class == wanted {
            *next_class_should_be_zero = !*next_class_should_be_zero;
            return (values, class);
        }
    }
}

pub(crate) fn apply_label_noise(rng: &mut StdRng, class: usize, noise: f64) -> usize {
    if noise > 0.0 && rng.random::<f64>() < noise {
        1 - class
    } else {
        class
    }
}
