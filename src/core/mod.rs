pub mod attributes;
pub mod drift;
pub mod estimators;
pub mod instance_header;
pub mod instances;
