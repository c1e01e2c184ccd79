use crate::core::attributes::{AttributeRef, NominalAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::error::{IademError, Result};
use crate::streams::Stream;
use crate::streams::generators::{ConceptSchedule, draw_balanced};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;
use std::sync::Arc;

const SMALL: usize = 0;
const MEDIUM: usize = 1;
const LARGE: usize = 2;
const RED: usize = 0;
const GREEN: usize = 2;
const CIRCLE: usize = 0;

fn check_function(function_id: u8) -> Result<()> {
    if (1..=3).contains(&function_id) {
        Ok(())
    } else {
        Err(IademError::IllegalConfiguration(format!(
            "STAGGER function must be in 1..=3, got {function_id}"
        )))
    }
}

fn concept(function_id: u8, size: usize, color: usize, shape: usize) -> bool {
    match function_id {
        1 => size == SMALL && color == RED,
        2 => color == GREEN || shape == CIRCLE,
        _ => size == MEDIUM || size == LARGE,
    }
}

pub struct StaggerGenerator {
    header: Arc<InstanceHeader>,
    schedule: ConceptSchedule,
    balance: bool,
    max_instances: Option<u64>,
    seed: u64,
    rng: StdRng,
    produced: u64,
    next_class_should_be_zero: bool,
}

impl StaggerGenerator {
    pub fn new(function_id: u8, balance: bool, max_instances: Option<u64>, seed: u64) -> Result<Self> {
        check_function(function_id)?;
        let attributes: Vec<AttributeRef> = vec![
            Arc::new(NominalAttribute::from_labels("size", vec!["small", "medium", "large"])),
            Arc::new(NominalAttribute::from_labels("color", vec!["red", "blue", "green"])),
            Arc::new(NominalAttribute::from_labels("shape", vec!["circle", "square", "triangle"])),
            Arc::new(NominalAttribute::from_labels("class", vec!["false", "true"])),
        ];
        Ok(Self {
            header: Arc::new(InstanceHeader::new("stagger-generator".into(), attributes, 3)),
            schedule: ConceptSchedule {
                function_id,
                drift: None,
            },
            balance,
            max_instances,
            seed,
            rng: StdRng::seed_from_u64(seed),
            produced: 0,
            next_class_should_be_zero: false,
        })
    }

    pub fn with_drift(mut self, at: u64, function_id: u8) -> Result<Self> {
        check_function(function_id)?;
        self.schedule.drift = Some((at, function_id));
        Ok(self)
    }

    pub fn current_function(&self) -> u8 {
        self.schedule.function_at(self.produced)
    }
}

impl Stream for StaggerGenerator {
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
        let function_id = self.current_function();
        let (values, class) = draw_balanced(
            &mut self.rng,
            self.balance,
            &mut self.next_class_should_be_zero,
            |rng| {
                let size = rng.random_range(0..3usize);
                let color = rng.random_range(0..3usize);
                let shape = rng.random_range(0..3usize);
                let class = usize::from(concept(function_id, size, color, shape));
                ([size, color, shape], class)
            },
        );
        self.produced += 1;

        let row = vec![
            values[0] as f64,
            values[1] as f64,
            values[2] as f64,
            class as f64,
        ];
        Some(Box::new(DenseInstance::new(Arc::clone(&self.header), row, 1.0)))
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

    #[test]
    fn labels_follow_each_concept() {
        for function_id in 1..=3u8 {
            let mut g = StaggerGenerator::new(function_id, false, Some(200), 9).unwrap();
            while let Some(instance) = g.next_instance() {
                let row = instance.to_vec();
                let expected = concept(
                    function_id,
                    row[0] as usize,
                    row[1] as usize,
                    row[2] as usize,
                );
                assert_eq!(row[3], if expected { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn header_is_fully_nominal() {
        let g = StaggerGenerator::new(1, false, None, 1).unwrap();
        let header = g.header();
        assert_eq!(header.number_of_classes(), 2);
        for i in 0..3 {
            assert_eq!(header.number_of_values_at_index(i), Some(3));
        }
        assert!(g.has_more_instances());
    }

    #[test]
    fn balanced_stream_alternates_even_for_rare_concepts() {
        let mut g = StaggerGenerator::new(1, true, Some(10), 4).unwrap();
        let mut classes = Vec::new();
        while let Some(instance) = g.next_instance() {
            classes.push(instance.class_value().unwrap());
        }
        assert_eq!(classes, vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn restart_through_the_stream_trait_replays_records() {
        let mut g: Box<dyn Stream> = Box::new(
            StaggerGenerator::new(2, true, Some(30), 8)
                .unwrap()
                .with_drift(10, 3)
                .unwrap(),
        );
        let mut first = Vec::new();
        while let Some(instance) = g.next_instance() {
            first.push(instance.to_vec());
        }
        g.restart().unwrap();
        let mut second = Vec::new();
        while let Some(instance) = g.next_instance() {
            second.push(instance.to_vec());
        }
        assert_eq!(first.len(), 30);
        assert_eq!(first, second);
    }

    #[test]
    fn drift_changes_the_concept() {
        let mut g = StaggerGenerator::new(1, false, Some(10), 2)
            .unwrap()
            .with_drift(5, 2)
            .unwrap();
        assert_eq!(g.current_function(), 1);
        for _ in 0..5 {
            g.next_instance();
        }
        assert_eq!(g.current_function(), 2);
        assert!(StaggerGenerator::new(4, false, None, 0).is_err());
    }
}
