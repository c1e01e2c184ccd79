use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::DenseInstance;
use std::sync::Arc;

/// `num` (numeric), `nom` in {a, b}, and the class in {neg, pos} at index 2.
pub fn header_binary() -> Arc<InstanceHeader> {
    let attributes: Vec<AttributeRef> = vec![
        Arc::new(NumericAttribute::new("num".into())),
        Arc::new(NominalAttribute::from_labels("nom", vec!["a", "b"])),
        Arc::new(NominalAttribute::from_labels("class", vec!["neg", "pos"])),
    ];
    Arc::new(InstanceHeader::new("binary".into(), attributes, 2))
}

/// `attributes` numeric columns `x0..` followed by a class with `classes` labels.
pub fn header_numeric(attributes: usize, classes: usize) -> Arc<InstanceHeader> {
    let mut attrs: Vec<AttributeRef> = (0..attributes)
        .map(|i| Arc::new(NumericAttribute::new(format!("x{i}"))) as AttributeRef)
        .collect();
    let labels: Vec<String> = (0..classes).map(|c| format!("c{c}")).collect();
    attrs.push(Arc::new(NominalAttribute::from_labels("class", labels)));
    Arc::new(InstanceHeader::new("numeric".into(), attrs, attributes))
}

pub fn instance_of(header: &Arc<InstanceHeader>, values: &[f64]) -> DenseInstance {
    DenseInstance::new(Arc::clone(header), values.to_vec(), 1.0)
}
