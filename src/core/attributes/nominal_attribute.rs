use crate::core::attributes::Attribute;
use std::any::Any;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct NominalAttribute {
    pub name: String,
    pub values: Vec<String>,
    pub label_to_index: HashMap<String, usize>,
}

impl NominalAttribute {
    pub fn with_values(
        name: String,
        values: Vec<String>,
        label_to_index: HashMap<String, usize>,
    ) -> NominalAttribute {
        NominalAttribute {
            name,
            values,
            label_to_index,
        }
    }

    pub fn from_labels<S: Into<String>>(name: &str, labels: Vec<S>) -> NominalAttribute {
        let values: Vec<String> = labels.into_iter().map(Into::into).collect();
        let label_to_index = values
            .iter()
            .enumerate()
            .map(|(i, v)| (v.clone(), i))
            .collect();
        NominalAttribute::with_values(name.to_string(), values, label_to_index)
    }

    pub fn number_of_values(&self) -> usize {
        self.values.len()
    }

    pub fn index_of_value(&self, label: &str) -> Option<usize> {
        self.label_to_index.get(label).copied()
    }

    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }
}

impl Attribute for NominalAttribute {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn is_nominal(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_indexed_in_order() {
        let attr = NominalAttribute::from_labels("color", vec!["red", "green", "blue"]);
        assert_eq!(attr.number_of_values(), 3);
        assert_eq!(attr.index_of_value("green"), Some(1));
        assert_eq!(attr.index_of_value("pink"), None);
        assert_eq!(attr.value(2), Some("blue"));
        assert!(attr.is_nominal());
    }
}
