use crate::core::drift::DriftEstimator;

/// Reports a fixed error and age, and signals a change on one chosen input.
#[derive(Debug, Clone)]
pub struct ScriptedDriftEstimator {
    error: f64,
    age: u64,
    change_on_input: Option<u64>,
    error_after: Option<(u64, f64)>,
    inputs: u64,
    lifetime_inputs: u64,
}

impl ScriptedDriftEstimator {
    pub fn new(error: f64, age: u64) -> Self {
        Self {
            error,
            age,
            change_on_input: None,
            error_after: None,
            inputs: 0,
            lifetime_inputs: 0,
        }
    }

    /// Signals a change right after the `n`-th input since the last reset.
    pub fn changing_on_input(mut self, n: u64) -> Self {
        self.change_on_input = Some(n);
        self
    }

    /// Reports `error` once `n` inputs were seen in total; resets do not rewind this.
    pub fn with_error_after(mut self, n: u64, error: f64) -> Self {
        self.error_after = Some((n, error));
        self
    }

    pub fn inputs(&self) -> u64 {
        self.inputs
    }
}

impl DriftEstimator for ScriptedDriftEstimator {
    fn input(&mut self, _error: f64) {
        self.inputs += 1;
        self.lifetime_inputs += 1;
    }

    fn estimation(&self) -> f64 {
        match self.error_after {
            Some((n, error)) if self.lifetime_inputs >= n => error,
            _ => self.error,
        }
    }

    fn delay(&self) -> u64 {
        self.age
    }

    fn change(&self) -> bool {
        self.change_on_input == Some(self.inputs)
    }

    fn in_warning_zone(&self) -> bool {
        false
    }

    fn reset(&mut self) {
        self.inputs = 0;
    }

    fn clone_box(&self) -> Box<dyn DriftEstimator> {
        Box::new(self.clone())
    }
}
