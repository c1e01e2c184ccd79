use std::borrow::Cow;
use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub name: Cow<'static, str>,
    pub value: f64,
}

impl Measurement {
    pub fn new(name: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl Display for Measurement {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}={}", self.name, self.value)
    }
}
