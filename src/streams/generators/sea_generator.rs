use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::error::{IademError, Result};
use crate::streams::Stream;
use crate::streams::generators::{ConceptSchedule, apply_label_noise, draw_balanced};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;
use std::sync::Arc;

const THRESHOLDS: [f64; 4] = [8.0, 9.0, 7.0, 9.5];

fn check_function(function_id: u8) -> Result<()> {
    if (1..=THRESHOLDS.len() as u8).contains(&function_id) {
        Ok(())
    } else {
        Err(IademError::IllegalConfiguration(format!(
            "SEA function must be in 1..=4, got {function_id}"
        )))
    }
}

/// SEA concepts: three numeric attributes in `[0, 10)`, and the record is
/// `groupA` when `x1 + x2` is at most the function's threshold.
pub struct SeaGenerator {
    header: Arc<InstanceHeader>,
    schedule: ConceptSchedule,
    balance: bool,
    noise: f64,
    max_instances: Option<u64>,
    seed: u64,
    rng: StdRng,
    produced: u64,
    next_class_should_be_zero: bool,
}

impl SeaGenerator {
    pub fn new(
        function_id: u8,
        balance: bool,
        noise: f64,
        max_instances: Option<u64>,
        seed: u64,
    ) -> Result<Self> {
        check_function(function_id)?;
        if !(0.0..=1.0).contains(&noise) {
            return Err(IademError::IllegalConfiguration(format!(
                "noise must be in [0, 1], got {noise}"
            )));
        }

        let attributes: Vec<AttributeRef> = vec![
            Arc::new(NumericAttribute::new("attrib1".into())),
            Arc::new(NumericAttribute::new("attrib2".into())),
            Arc::new(NumericAttribute::new("attrib3".into())),
            Arc::new(NominalAttribute::from_labels("class", vec!["groupA", "groupB"])),
        ];
        let header = Arc::new(InstanceHeader::new(
            "sea-generator".into(),
            attributes,
            3,
        ));

        Ok(Self {
            header,
            schedule: ConceptSchedule {
                function_id,
                drift: None,
            },
            balance,
            noise,
            max_instances,
            seed,
            rng: StdRng::seed_from_u64(seed),
            produced: 0,
            next_class_should_be_zero: false,
        })
    }

    /// Switches abruptly to `function_id` once `at` records have been produced.
    pub fn with_drift(mut self, at: u64, function_id: u8) -> Result<Self> {
        check_function(function_id)?;
        self.schedule.drift = Some((at, function_id));
        Ok(self)
    }

    pub fn current_function(&self) -> u8 {
        self.schedule.function_at(self.produced)
    }

}

impl Stream for SeaGenerator {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn has_more_instances(&self) -> bool {
        self.max_instances.is_none_or(|max| self.produced < max)
    }

    fn next_instance(&mut self) -> Option<Box<dyn Instance>> {
        if !self.has_more_instances() {
            return None;
        }
        let threshold = THRESHOLDS[usize::from(self.current_function() - 1)];
        let (values, class) = draw_balanced(
            &mut self.rng,
            self.balance,
            &mut self.next_class_should_be_zero,
            |rng| {
                let x: [f64; 3] = [
                    rng.random_range(0.0..10.0),
                    rng.random_range(0.0..10.0),
                    rng.random_range(0.0..10.0),
                ];
                let class = if x[0] + x[1] <= threshold { 0 } else { 1 };
                (x, class)
            },
        );
        let class = apply_label_noise(&mut self.rng, class, self.noise);
        self.produced += 1;

        let instance = DenseInstance::new(
            Arc::clone(&self.header),
            vec![values[0], values[1], values[2], class as f64],
            1.0,
        );
        Some(Box::new(instance))
    }

    fn restart(&mut self) -> io::Result<()> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.produced = 0;
        self.next_class_should_be_zero = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(stream: &mut dyn Stream) -> Vec<Vec<f64>> {
        let mut out = Vec::new();
        while let Some(instance) = stream.next_instance() {
            out.push(instance.to_vec());
        }
        out
    }

    #[test]
    fn labels_follow_the_threshold() {
        let mut g = SeaGenerator::new(1, false, 0.0, Some(500), 7).unwrap();
        for row in drain(&mut g) {
            assert!(row[..3].iter().all(|v| (0.0..10.0).contains(v)));
            let expected = if row[0] + row[1] <= 8.0 { 0.0 } else { 1.0 };
            assert_eq!(row[3], expected);
        }
        assert!(!g.has_more_instances());
    }

    #[test]
    fn restart_replays_the_same_records() {
        let mut g: Box<dyn Stream> = Box::new(SeaGenerator::new(2, true, 0.1, Some(50), 11).unwrap());
        let first = drain(g.as_mut());
        g.restart().unwrap();
        assert_eq!(first, drain(g.as_mut()));
        assert_eq!(first.len(), 50);
    }

    #[test]
    fn balance_alternates_classes() {
        let mut g = SeaGenerator::new(3, true, 0.0, Some(20), 3).unwrap();
        let classes: Vec<f64> = drain(&mut g).iter().map(|r| r[3]).collect();
        for (i, c) in classes.iter().enumerate() {
            assert_eq!(*c, if i % 2 == 0 { 1.0 } else { 0.0 });
        }
    }

    #[test]
    fn drift_switches_function() {
        let mut g = SeaGenerator::new(1, false, 0.0, Some(400), 5)
            .unwrap()
            .with_drift(200, 3)
            .unwrap();
        let rows = drain(&mut g);
        for (i, row) in rows.iter().enumerate() {
            let threshold = if i < 200 { 8.0 } else { 7.0 };
            let expected = if row[0] + row[1] <= threshold { 0.0 } else { 1.0 };
            assert_eq!(row[3], expected, "record {i}");
        }
    }

    #[test]
    fn rejects_unknown_functions_and_noise() {
        assert!(SeaGenerator::new(0, false, 0.0, None, 1).is_err());
        assert!(SeaGenerator::new(1, false, 1.5, None, 1).is_err());
        let g = SeaGenerator::new(1, false, 0.0, None, 1).unwrap();
        assert!(g.with_drift(10, 5).is_err());
    }
}
