mod attribute_class_observer;
mod gaussian_numeric_attribute_class_observer;
mod greenwald_khanna_numeric_attribute_class_observer;
mod nominal_attribute_class_observer;
mod vfml_numeric_attribute_class_observer;

pub use attribute_class_observer::{AttributeClassObserver, NumericAttributeClassObserver};
pub use gaussian_numeric_attribute_class_observer::GaussianNumericAttributeClassObserver;
pub use greenwald_khanna_numeric_attribute_class_observer::GreenwaldKhannaNumericAttributeClassObserver;
pub use nominal_attribute_class_observer::NominalAttributeClassObserver;
pub use vfml_numeric_attribute_class_observer::VfmlNumericAttributeClassObserver;
