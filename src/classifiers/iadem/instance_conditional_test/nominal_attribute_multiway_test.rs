use crate::classifiers::iadem::instance_conditional_test::instance_conditional_test::{
    InstanceConditionalTest, tested_value,
};
use crate::core::instances::Instance;
use std::any::Any;

#[derive(Clone, Debug)]
pub struct NominalAttributeMultiwayTest {
    attribute_index: usize,
    number_of_values: usize,
}

impl NominalAttributeMultiwayTest {
    /// `number_of_values` is the attribute's cardinality; 0 leaves it unbounded.
    pub fn new(attribute_index: usize, number_of_values: usize) -> Self {
        Self {
            attribute_index,
            number_of_values,
        }
    }
}

impl InstanceConditionalTest for NominalAttributeMultiwayTest {
    fn branch_for_instance(&self, instance: &dyn Instance) -> Option<usize> {
        let value = tested_value(instance, self.attribute_index)?;
        (value >= 0.0).then_some(value as usize)
    }

    fn max_branches(&self) -> usize {
        if self.number_of_values == 0 {
            usize::MAX
        } else {
            self.number_of_values
        }
    }

    fn get_atts_test_depends_on(&self) -> Vec<usize> {
        vec![self.attribute_index]
    }

    fn is_equivalent_to(&self, other: &dyn InstanceConditionalTest) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|o| o.attribute_index == self.attribute_index)
    }

    fn describe_condition_for_branch(&self, branch: usize) -> String {
        format!("att[{}] == {branch}", self.attribute_index)
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
    fn routes_by_value_index() {
        let test = NominalAttributeMultiwayTest::new(1, 2);
        let header = header_binary();
        assert_eq!(test.branch_for_instance(&instance_of(&header, &[0.0, 1.0, 0.0])), Some(1));
        assert_eq!(
            test.branch_for_instance(&instance_of(&header, &[0.0, f64::NAN, 0.0])),
            None
        );
        assert_eq!(test.max_branches(), 2);
    }

    #[test]
    fn unknown_cardinality_is_unbounded() {
        assert_eq!(NominalAttributeMultiwayTest::new(0, 0).max_branches(), usize::MAX);
    }
}
