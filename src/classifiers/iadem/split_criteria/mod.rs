mod merit_bounds;
mod split_criterion;

pub use merit_bounds::{MeritBounds, SplitEvaluator};
pub use split_criterion::SplitCriterionKind;
