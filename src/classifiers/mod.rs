pub mod attribute_class_observers;
mod classifier;
pub mod conditional_tests;
pub mod iadem;

pub use classifier::Classifier;
pub use iadem::IademTree;
