use crate::classifiers::Classifier;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::error::{IademError, Result};
use crate::testing::stubs::one_hot;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

pub struct TrainSpyHandle(Arc<AtomicU64>);

impl TrainSpyHandle {
    pub fn count(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Counts training calls; optionally fails on the `n`-th one.
pub struct TrainSpyClassifier {
    count: Arc<AtomicU64>,
    number_of_classes: usize,
    fail_on: Option<u64>,
}

impl TrainSpyClassifier {
    pub fn new() -> (Self, TrainSpyHandle) {
        let counter = Arc::new(AtomicU64::new(0));
        (
            Self {
                count: Arc::clone(&counter),
                number_of_classes: 2,
                fail_on: None,
            },
            TrainSpyHandle(counter),
        )
    }

    pub fn failing_on(mut self, n: u64) -> Self {
        self.fail_on = Some(n);
        self
    }
}

impl Classifier for TrainSpyClassifier {
    fn get_votes_for_instance(&self, inst: &dyn Instance) -> Vec<f64> {
        one_hot(inst, self.number_of_classes)
    }

    fn set_model_context(&mut self, h: Arc<InstanceHeader>) {
        self.number_of_classes = h.number_of_classes().max(2);
    }

    fn train_on_instance(&mut self, _inst: &dyn Instance) -> Result<()> {
        let seen = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        if self.fail_on == Some(seen) {
            return Err(IademError::Computation {
                context: "spy",
                value: seen as f64,
            });
        }
        Ok(())
    }
}
