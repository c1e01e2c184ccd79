use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::streams::Stream;
use std::io::Error;
use std::sync::Arc;

/// Replays the given labels; the only attribute `x` carries the label as a number.
pub struct VecStream {
    header: Arc<InstanceHeader>,
    labels: Vec<usize>,
    position: usize,
}

impl VecStream {
    pub fn new(labels: Vec<usize>) -> Self {
        let classes = labels.iter().max().map_or(2, |m| (m + 1).max(2));
        let attributes: Vec<AttributeRef> = vec![
            Arc::new(NumericAttribute::new("x".into())),
            Arc::new(NominalAttribute::from_labels(
                "class",
                (0..classes).map(|c| c.to_string()).collect(),
            )),
        ];
        Self {
            header: Arc::new(InstanceHeader::new("vec".into(), attributes, 1)),
            labels,
            position: 0,
        }
    }
}

impl Stream for VecStream {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn has_more_instances(&self) -> bool {
        self.position < self.labels.len()
    }

    fn next_instance(&mut self) -> Option<Box<dyn Instance>> {
        let label = *self.labels.get(self.position)?;
        self.position += 1;
        let values = vec![label as f64, label as f64];
        Some(Box::new(DenseInstance::new(Arc::clone(&self.header), values, 1.0)))
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.position = 0;
        Ok(())
    }
}
