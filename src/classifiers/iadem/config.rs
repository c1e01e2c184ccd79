use crate::classifiers::attribute_class_observers::{
    GaussianNumericAttributeClassObserver, GreenwaldKhannaNumericAttributeClassObserver,
    NumericAttributeClassObserver, VfmlNumericAttributeClassObserver,
};
use crate::classifiers::iadem::split_criteria::{SplitCriterionKind, SplitEvaluator};
use crate::core::drift::{DriftEstimator, EwmaChartDriftEstimator};
use crate::error::{IademError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SplitTestPolicy {
    BinaryOnly,
    MultiwayOnly,
    #[default]
    BestOfBoth,
}

impl SplitTestPolicy {
    pub fn allows_binary(&self) -> bool {
        !matches!(self, Self::MultiwayOnly)
    }

    pub fn allows_multiway(&self) -> bool {
        !matches!(self, Self::BinaryOnly)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LeafPredictionOption {
    MajorityClass,
    NaiveBayes,
    #[default]
    NaiveBayesAdaptive,
    WeightedVote,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum NumericEstimatorKind {
    #[default]
    Gaussian,
    GreenwaldKhanna,
    Vfml,
}

impl NumericEstimatorKind {
    pub fn new_observer(&self, max_bins: usize) -> Box<dyn NumericAttributeClassObserver> {
        match self {
            Self::Gaussian => Box::new(GaussianNumericAttributeClassObserver::with_num_bins(max_bins)),
            Self::GreenwaldKhanna => {
                Box::new(GreenwaldKhannaNumericAttributeClassObserver::new(max_bins))
            }
            Self::Vfml => Box::new(VfmlNumericAttributeClassObserver::new(max_bins)),
        }
    }
}

fn default_grace_period() -> u64 {
    100
}

fn default_split_confidence() -> f64 {
    0.01
}

fn default_numeric_max_bins() -> usize {
    10
}

fn default_attribute_differentiation() -> f64 {
    0.1
}

fn default_max_branch_fraction() -> f64 {
    0.95
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct IademConfig {
    #[serde(default = "default_grace_period")]
    #[schemars(
        title = "Grace Period",
        description = "Weight a leaf must observe between split attempts",
        range(min = 1),
        default = "default_grace_period"
    )]
    pub grace_period: u64,

    #[serde(default = "default_split_confidence")]
    #[schemars(
        title = "Split Confidence",
        description = "Allowed error in split decisions and subtree comparisons",
        range(min = 0.0, max = 1.0),
        default = "default_split_confidence"
    )]
    pub split_confidence: f64,

    #[serde(default)]
    #[schemars(title = "Split Criterion", description = "Impurity measure")]
    pub split_criterion: SplitCriterionKind,

    #[serde(default)]
    #[schemars(
        title = "Split Tests",
        description = "Nominal split tests considered: binary, multiway or both"
    )]
    pub split_test_policy: SplitTestPolicy,

    #[serde(default)]
    #[schemars(title = "Leaf Prediction", description = "Prediction strategy at leaves")]
    pub leaf_prediction: LeafPredictionOption,

    #[serde(default)]
    #[schemars(
        title = "Numeric Estimator",
        description = "Observer summarising numeric attributes"
    )]
    pub numeric_estimator: NumericEstimatorKind,

    #[serde(default = "default_numeric_max_bins")]
    #[schemars(
        title = "Numeric Bins",
        description = "Cut points, quantile tuples or bins kept per numeric attribute",
        range(min = 1),
        default = "default_numeric_max_bins"
    )]
    pub numeric_max_bins: usize,

    #[serde(default = "default_attribute_differentiation")]
    #[schemars(
        title = "Attribute Differentiation",
        description = "Overlap below which two merit intervals count as different",
        range(min = 0.0, max = 1.0),
        default = "default_attribute_differentiation"
    )]
    pub attribute_differentiation: f64,

    #[serde(default = "default_max_branch_fraction")]
    #[schemars(
        title = "Max Branch Fraction",
        description = "Splits sending more than this fraction of the weight to one branch are vetoed",
        range(min = 0.0, max = 1.0),
        default = "default_max_branch_fraction"
    )]
    pub max_branch_fraction: f64,
}

impl Default for IademConfig {
    fn default() -> Self {
        Self {
            grace_period: default_grace_period(),
            split_confidence: default_split_confidence(),
            split_criterion: SplitCriterionKind::default(),
            split_test_policy: SplitTestPolicy::default(),
            leaf_prediction: LeafPredictionOption::default(),
            numeric_estimator: NumericEstimatorKind::default(),
            numeric_max_bins: default_numeric_max_bins(),
            attribute_differentiation: default_attribute_differentiation(),
            max_branch_fraction: default_max_branch_fraction(),
        }
    }
}

impl IademConfig {
    pub fn validate(&self) -> Result<()> {
        let illegal = |msg: String| Err(IademError::IllegalConfiguration(msg));
        if self.grace_period == 0 {
            return illegal("grace_period must be at least 1".into());
        }
        if !(self.split_confidence > 0.0 && self.split_confidence <= 1.0) {
            return illegal(format!(
                "split_confidence must be in (0, 1], got {}",
                self.split_confidence
            ));
        }
        if self.numeric_max_bins == 0 {
            return illegal("numeric_max_bins must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.attribute_differentiation) {
            return illegal(format!(
                "attribute_differentiation must be in [0, 1], got {}",
                self.attribute_differentiation
            ));
        }
        if !(self.max_branch_fraction > 0.0 && self.max_branch_fraction <= 1.0) {
            return illegal(format!(
                "max_branch_fraction must be in (0, 1], got {}",
                self.max_branch_fraction
            ));
        }
        Ok(())
    }

    pub fn split_evaluator(&self) -> SplitEvaluator {
        SplitEvaluator::new(self.split_criterion, self.split_confidence)
    }
}

/// Settings of the drift-aware variant. A negative limit means unbounded.
pub struct AdaptiveConfig {
    pub drift_estimator: Box<dyn DriftEstimator>,
    pub max_nesting_level: i32,
    pub max_subtrees_per_node: i32,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            drift_estimator: Box::new(EwmaChartDriftEstimator::default()),
            max_nesting_level: 1,
            max_subtrees_per_node: 1,
        }
    }
}

impl Clone for AdaptiveConfig {
    fn clone(&self) -> Self {
        Self {
            drift_estimator: self.drift_estimator.clone_box(),
            max_nesting_level: self.max_nesting_level,
            max_subtrees_per_node: self.max_subtrees_per_node,
        }
    }
}

impl std::fmt::Debug for AdaptiveConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdaptiveConfig")
            .field("max_nesting_level", &self.max_nesting_level)
            .field("max_subtrees_per_node", &self.max_subtrees_per_node)
            .finish()
    }
}

impl AdaptiveConfig {
    pub fn new_estimator(&self) -> Box<dyn DriftEstimator> {
        let mut estimator = self.drift_estimator.clone_box();
        estimator.reset();
        estimator
    }

    /// Whether a node at `level` holding `alternatives` subtrees may grow another.
    pub fn can_spawn_alternative(&self, level: usize, alternatives: usize) -> bool {
        let nesting_ok =
            self.max_nesting_level < 0 || level + 1 <= self.max_nesting_level as usize;
        let count_ok =
            self.max_subtrees_per_node < 0 || alternatives < self.max_subtrees_per_node as usize;
        nesting_ok && count_ok
    }
}

fn default_max_nesting_level() -> i32 {
    1
}

fn default_max_subtrees_per_node() -> i32 {
    1
}

fn default_drift_lambda() -> f64 {
    EwmaChartDriftEstimator::DEFAULT_LAMBDA
}

fn default_drift_min_instances() -> u64 {
    EwmaChartDriftEstimator::DEFAULT_MIN_INSTANCES
}

/// User-facing settings of the drift-aware tree: the base tree settings plus the
/// alternative-subtree limits and the EWMA chart detector used at every node.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Iadem3Parameters {
    #[serde(flatten)]
    pub tree: IademConfig,

    #[serde(default = "default_max_nesting_level")]
    #[schemars(
        title = "Max Nesting Level",
        description = "How deep alternative subtrees may nest (-1 = unbounded)",
        range(min = -1),
        default = "default_max_nesting_level"
    )]
    pub max_nesting_level: i32,

    #[serde(default = "default_max_subtrees_per_node")]
    #[schemars(
        title = "Max Subtrees Per Node",
        description = "Alternative subtrees a split node may hold at once (-1 = unbounded)",
        range(min = -1),
        default = "default_max_subtrees_per_node"
    )]
    pub max_subtrees_per_node: i32,

    #[serde(default = "default_drift_lambda")]
    #[schemars(
        title = "Drift Lambda",
        description = "Smoothing factor of the EWMA chart",
        range(min = 0.0, max = 1.0),
        default = "default_drift_lambda"
    )]
    pub drift_lambda: f64,

    #[serde(default = "default_drift_min_instances")]
    #[schemars(
        title = "Drift Warm-up",
        description = "Samples the EWMA chart needs before it may signal",
        default = "default_drift_min_instances"
    )]
    pub drift_min_instances: u64,
}

impl Default for Iadem3Parameters {
    fn default() -> Self {
        Self {
            tree: IademConfig::default(),
            max_nesting_level: default_max_nesting_level(),
            max_subtrees_per_node: default_max_subtrees_per_node(),
            drift_lambda: default_drift_lambda(),
            drift_min_instances: default_drift_min_instances(),
        }
    }
}

impl Iadem3Parameters {
    pub fn adaptive_config(&self) -> Result<AdaptiveConfig> {
        if !(self.drift_lambda > 0.0 && self.drift_lambda <= 1.0) {
            return Err(IademError::IllegalConfiguration(format!(
                "drift_lambda must be in (0, 1], got {}",
                self.drift_lambda
            )));
        }
        Ok(AdaptiveConfig {
            drift_estimator: Box::new(EwmaChartDriftEstimator::new(
                self.drift_lambda,
                self.drift_min_instances,
            )),
            max_nesting_level: self.max_nesting_level,
            max_subtrees_per_node: self.max_subtrees_per_node,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::schema_for;

    #[test]
    fn defaults_are_valid() {
        let config = IademConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grace_period, 100);
        assert_eq!(config.split_criterion, SplitCriterionKind::Entropy);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let bad = [
            IademConfig { grace_period: 0, ..Default::default() },
            IademConfig { split_confidence: 0.0, ..Default::default() },
            IademConfig { numeric_max_bins: 0, ..Default::default() },
            IademConfig { attribute_differentiation: 1.5, ..Default::default() },
            IademConfig { max_branch_fraction: 0.0, ..Default::default() },
        ];
        for config in bad {
            assert!(matches!(
                config.validate(),
                Err(IademError::IllegalConfiguration(_))
            ));
        }
    }

    #[test]
    fn missing_fields_take_defaults_when_deserializing() {
        let config: IademConfig =
            serde_json::from_str(r#"{"grace_period": 50, "split_criterion": "gini"}"#).unwrap();
        assert_eq!(config.grace_period, 50);
        assert_eq!(config.split_criterion, SplitCriterionKind::Gini);
        assert_eq!(config.max_branch_fraction, 0.95);
        assert_eq!(config.leaf_prediction, LeafPredictionOption::NaiveBayesAdaptive);
    }

    #[test]
    fn schema_carries_ranges_and_defaults() {
        let schema = serde_json::to_value(schema_for!(IademConfig)).unwrap();
        let grace = &schema["properties"]["grace_period"];
        assert_eq!(grace["minimum"].as_f64(), Some(1.0));
        assert_eq!(grace["default"].as_f64(), Some(100.0));
        let fraction = &schema["properties"]["max_branch_fraction"];
        assert_eq!(fraction["maximum"].as_f64(), Some(1.0));
    }

    #[test]
    fn spawn_limits() {
        let adaptive = AdaptiveConfig::default();
        assert!(adaptive.can_spawn_alternative(0, 0));
        assert!(!adaptive.can_spawn_alternative(0, 1));
        assert!(!adaptive.can_spawn_alternative(1, 0));

        let unbounded = AdaptiveConfig {
            max_nesting_level: -1,
            max_subtrees_per_node: -1,
            ..Default::default()
        };
        assert!(unbounded.can_spawn_alternative(7, 40));
    }

    #[test]
    fn iadem3_parameters_flatten_the_tree_settings() {
        let params: Iadem3Parameters = serde_json::from_str(
            r#"{"grace_period": 20, "max_subtrees_per_node": -1, "drift_lambda": 0.1}"#,
        )
        .unwrap();
        assert_eq!(params.tree.grace_period, 20);
        assert_eq!(params.max_nesting_level, 1);
        let adaptive = params.adaptive_config().unwrap();
        assert!(adaptive.can_spawn_alternative(0, 12));

        let bad = Iadem3Parameters {
            drift_lambda: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            bad.adaptive_config(),
            Err(IademError::IllegalConfiguration(_))
        ));
    }

    #[test]
    fn numeric_estimators_build_matching_observers() {
        let obs = NumericEstimatorKind::Vfml.new_observer(4);
        assert!(obs.as_any().is::<VfmlNumericAttributeClassObserver>());
        let obs = NumericEstimatorKind::default().new_observer(4);
        assert!(obs.as_any().is::<GaussianNumericAttributeClassObserver>());
    }
}
