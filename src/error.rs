use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum IademError {
    #[error("computation error in {context}: value {value} is outside the tolerated margin")]
    Computation { context: &'static str, value: f64 },

    #[error("invalid measure input: {0}")]
    InvalidMeasureInput(String),

    #[error("illegal configuration: {0}")]
    IllegalConfiguration(String),

    #[error("branch {branch} requested but the split test allows at most {max} branches")]
    BranchOutOfRange { branch: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, IademError>;
