use crate::classifiers::iadem::{Iadem3Parameters, IademConfig};
use crate::ui::types::choices::UIChoice;
use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(LearnerKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum LearnerChoice {
    #[strum_discriminants(strum(
        message = "IADEM-2",
        detailed_message = "Incremental tree splitting on separated merit intervals."
    ))]
    Iadem2(IademConfig),

    #[strum_discriminants(strum(
        message = "IADEM-3",
        detailed_message = "IADEM-2 with drift detection, alternative subtrees and pruning."
    ))]
    Iadem3(Iadem3Parameters),
}

impl UIChoice for LearnerChoice {
    type Kind = LearnerKind;

    fn default_params(kind: Self::Kind) -> Result<Value> {
        Ok(match kind {
            LearnerKind::Iadem2 => serde_json::to_value(IademConfig::default())?,
            LearnerKind::Iadem3 => serde_json::to_value(Iadem3Parameters::default())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::EnumMessage;

    #[test]
    fn kinds_use_short_names() {
        assert_eq!(LearnerKind::Iadem2.to_string(), "iadem2");
        assert_eq!("iadem3".parse::<LearnerKind>().unwrap(), LearnerKind::Iadem3);
        assert_eq!(LearnerKind::Iadem3.get_message(), Some("IADEM-3"));
    }

    #[test]
    fn from_parts_rebuilds_the_variant() {
        let mut params = LearnerChoice::default_params(LearnerKind::Iadem3).unwrap();
        params["grace_period"] = json!(25);
        params["max_subtrees_per_node"] = json!(3);
        match LearnerChoice::from_parts(LearnerKind::Iadem3, params).unwrap() {
            LearnerChoice::Iadem3(p) => {
                assert_eq!(p.tree.grace_period, 25);
                assert_eq!(p.max_subtrees_per_node, 3);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn tagged_serialization() {
        let v = serde_json::to_value(LearnerChoice::Iadem2(IademConfig::default())).unwrap();
        assert_eq!(v["type"], "iadem2");
        assert_eq!(v["params"]["split_criterion"], "entropy");
    }

    #[test]
    fn unknown_criterion_is_rejected() {
        let mut params = LearnerChoice::default_params(LearnerKind::Iadem2).unwrap();
        params["split_criterion"] = json!("no-such-criterion");
        assert!(LearnerChoice::from_parts(LearnerKind::Iadem2, params).is_err());
    }

    #[test]
    fn schema_lists_both_learners() {
        let schema = serde_json::to_string(&LearnerChoice::schema()).unwrap();
        assert!(schema.contains("iadem2"));
        assert!(schema.contains("iadem3"));
        assert_eq!(LearnerChoice::describe_kinds().len(), 2);
    }
}
