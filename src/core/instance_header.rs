use crate::core::attributes::{Attribute, AttributeRef, NominalAttribute};
use std::fmt;

pub struct InstanceHeader {
    relation_name: String,
    pub attributes: Vec<AttributeRef>,
    class_index: usize,
}

impl InstanceHeader {
    pub fn new(
        relation_name: String,
        attributes: Vec<AttributeRef>,
        class_index: usize,
    ) -> InstanceHeader {
        InstanceHeader {
            relation_name,
            attributes,
            class_index,
        }
    }

    pub fn class_attribute(&self) -> Option<&dyn Attribute> {
        self.attribute_at_index(self.class_index)
    }

    pub fn number_of_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn relation_name(&self) -> &str {
        &self.relation_name
    }

    pub fn attribute_at_index(&self, index: usize) -> Option<&dyn Attribute> {
        self.attributes.get(index).map(|a| a.as_ref() as &dyn Attribute)
    }

    pub fn index_of_attribute(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|attr| attr.name() == name)
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    pub fn number_of_values_at_index(&self, index: usize) -> Option<usize> {
        self.attributes
            .get(index)?
            .as_any()
            .downcast_ref::<NominalAttribute>()
            .map(NominalAttribute::number_of_values)
    }

    pub fn number_of_classes(&self) -> usize {
        self.number_of_values_at_index(self.class_index)
            .unwrap_or(0)
    }
}

impl fmt::Debug for InstanceHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceHeader")
            .field("relation_name", &self.relation_name)
            .field("class_index", &self.class_index)
            .field("n_attributes", &self.attributes.len())
            .finish()
    }
}
