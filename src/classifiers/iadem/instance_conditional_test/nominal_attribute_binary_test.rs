use crate::classifiers::iadem::instance_conditional_test::instance_conditional_test::{
    InstanceConditionalTest, tested_value,
};
use crate::core::instances::Instance;
use std::any::Any;

/// `attribute == value` goes to branch 0, anything else to branch 1.
#[derive(Clone, Debug)]
pub struct NominalAttributeBinaryTest {
    attribute_index: usize,
    attribute_value: usize,
}

impl NominalAttributeBinaryTest {
    pub fn new(attribute_index: usize, attribute_value: usize) -> Self {
        Self {
            attribute_index,
            attribute_value,
        }
    }

    pub fn attribute_value(&self) -> usize {
        self.attribute_value
    }
}

impl InstanceConditionalTest for NominalAttributeBinaryTest {
    fn branch_for_instance(&self, instance: &dyn Instance) -> Option<usize> {
        let value = tested_value(instance, self.attribute_index)?;
        Some(if value as usize == self.attribute_value { 0 } else { 1 })
    }

    fn max_branches(&self) -> usize {
        2
    }

    fn get_atts_test_depends_on(&self) -> Vec<usize> {
        vec![self.attribute_index]
    }

    fn is_equivalent_to(&self, other: &dyn InstanceConditionalTest) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|o| {
                o.attribute_index == self.attribute_index
                    && o.attribute_value == self.attribute_value
            })
    }

    fn describe_condition_for_branch(&self, branch: usize) -> String {
        let op = if branch == 0 { "==" } else { "!=" };
        format!("att[{}] {op} {}", self.attribute_index, self.attribute_value)
    }

    fn clone_box(&self) -> Box<dyn InstanceConditionalTest> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{header_binary, instance_of};

    #[test]
    fn matching_value_goes_left() {
        let test = NominalAttributeBinaryTest::new(1, 1);
        let header = header_binary();
        assert_eq!(test.branch_for_instance(&instance_of(&header, &[0.3, 1.0, 0.0])), Some(0));
        assert_eq!(test.branch_for_instance(&instance_of(&header, &[0.3, 0.0, 0.0])), Some(1));
        assert_eq!(
            test.branch_for_instance(&instance_of(&header, &[0.3, f64::NAN, 0.0])),
            None
        );
    }

    #[test]
    fn equivalence_needs_same_attribute_and_value() {
        let test = NominalAttributeBinaryTest::new(1, 1);
        assert!(test.is_equivalent_to(&NominalAttributeBinaryTest::new(1, 1)));
        assert!(!test.is_equivalent_to(&NominalAttributeBinaryTest::new(1, 0)));
        assert!(!test.is_equivalent_to(&NominalAttributeBinaryTest::new(0, 1)));
        assert_eq!(test.max_branches(), 2);
        assert_eq!(test.get_atts_test_depends_on(), vec![1]);
    }
}
