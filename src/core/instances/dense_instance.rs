use crate::core::attributes::Attribute;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::io::{Error, ErrorKind};
use std::sync::Arc;

/// Vector-backed record. Missing values are stored as `NaN`.
#[derive(Clone, Debug)]
pub struct DenseInstance {
    pub header: Arc<InstanceHeader>,
    pub values: Vec<f64>,
    pub weight: f64,
}

impl DenseInstance {
    pub fn new(header: Arc<InstanceHeader>, values: Vec<f64>, weight: f64) -> Self {
        Self {
            header,
            values,
            weight,
        }
    }

    fn out_of_bounds(&self, index: usize) -> Error {
        Error::new(
            ErrorKind::InvalidInput,
            format!(
                "attribute index {index} out of bounds for {} values",
                self.values.len()
            ),
        )
    }
}

impl Instance for DenseInstance {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn set_weight(&mut self, new_value: f64) -> Result<(), Error> {
        if !new_value.is_finite() || new_value < 0.0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("weight must be finite and non-negative, got {new_value}"),
            ));
        }
        self.weight = new_value;
        Ok(())
    }

    fn value_at_index(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    fn set_value_at_index(&mut self, index: usize, new_value: f64) -> Result<(), Error> {
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = new_value;
                Ok(())
            }
            None => Err(self.out_of_bounds(index)),
        }
    }

    fn is_missing_at_index(&self, index: usize) -> Result<bool, Error> {
        self.values
            .get(index)
            .map(|v| v.is_nan())
            .ok_or_else(|| self.out_of_bounds(index))
    }

    fn attribute_at_index(&self, index: usize) -> Option<&dyn Attribute> {
        self.header.attribute_at_index(index)
    }

    fn index_of_attribute(&self, attribute: &dyn Attribute) -> Option<usize> {
        self.header.index_of_attribute(&attribute.name())
    }

    fn number_of_attributes(&self) -> usize {
        self.values.len()
    }

    fn class_index(&self) -> usize {
        self.header.class_index()
    }

    fn class_value(&self) -> Option<f64> {
        self.values
            .get(self.header.class_index())
            .copied()
            .filter(|v| !v.is_nan())
    }

    fn set_class_value(&mut self, new_value: f64) -> Result<(), Error> {
        let index = self.header.class_index();
        self.set_value_at_index(index, new_value)
    }

    fn is_class_missing(&self) -> bool {
        self.class_value().is_none()
    }

    fn number_of_classes(&self) -> usize {
        self.header.number_of_classes()
    }

    fn to_vec(&self) -> Vec<f64> {
        self.values.clone()
    }

    fn header(&self) -> &InstanceHeader {
        &self.header
    }
}
