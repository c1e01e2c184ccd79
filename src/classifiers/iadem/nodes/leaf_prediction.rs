use crate::classifiers::iadem::config::LeafPredictionOption;
use crate::classifiers::iadem::virtual_nodes::VirtualNode;
use crate::core::instances::Instance;
use crate::utils::math::{max_index, normalize_votes, sum};

/// Prediction strategy of a leaf together with the accuracy bookkeeping the
/// switching strategies need.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LeafPredictor {
    #[default]
    MajorityClass,
    NaiveBayes,
    NaiveBayesAdaptive {
        mc_correct_weight: f64,
        nb_correct_weight: f64,
    },
    WeightedVote {
        mc_correct_weight: f64,
        nb_correct_weight: f64,
    },
}

impl LeafPredictor {
    pub fn new(option: LeafPredictionOption) -> Self {
        match option {
            LeafPredictionOption::MajorityClass => Self::MajorityClass,
            LeafPredictionOption::NaiveBayes => Self::NaiveBayes,
            LeafPredictionOption::NaiveBayesAdaptive => Self::NaiveBayesAdaptive {
                mc_correct_weight: 0.0,
                nb_correct_weight: 0.0,
            },
            LeafPredictionOption::WeightedVote => Self::WeightedVote {
                mc_correct_weight: 0.0,
                nb_correct_weight: 0.0,
            },
        }
    }

    pub fn votes(
        &self,
        instance: &dyn Instance,
        class_distribution: &[f64],
        virtual_nodes: &[Option<Box<dyn VirtualNode>>],
    ) -> Vec<f64> {
        match *self {
            Self::MajorityClass => class_distribution.to_vec(),
            Self::NaiveBayes => naive_bayes_votes(instance, class_distribution, virtual_nodes),
            Self::NaiveBayesAdaptive {
                mc_correct_weight,
                nb_correct_weight,
            } => {
                if nb_correct_weight > mc_correct_weight {
                    naive_bayes_votes(instance, class_distribution, virtual_nodes)
                } else {
                    class_distribution.to_vec()
                }
            }
            Self::WeightedVote {
                mc_correct_weight,
                nb_correct_weight,
            } => {
                let len = class_distribution.len();
                let mc = normalize_votes(class_distribution.to_vec(), len);
                let nb = normalize_votes(
                    naive_bayes_votes(instance, class_distribution, virtual_nodes),
                    len,
                );
                let (mc_w, nb_w) = if mc_correct_weight + nb_correct_weight > 0.0 {
                    (mc_correct_weight, nb_correct_weight)
                } else {
                    (1.0, 1.0)
                };
                mc.iter()
                    .zip(&nb)
                    .map(|(m, n)| mc_w * m + nb_w * n)
                    .collect()
            }
        }
    }

    /// Scores both base predictors on a record the leaf has not absorbed yet.
    pub fn record_outcome(
        &mut self,
        instance: &dyn Instance,
        class_val: usize,
        weight: f64,
        class_distribution: &[f64],
        virtual_nodes: &[Option<Box<dyn VirtualNode>>],
    ) {
        let (mc_correct_weight, nb_correct_weight) = match self {
            Self::NaiveBayesAdaptive {
                mc_correct_weight,
                nb_correct_weight,
            }
            | Self::WeightedVote {
                mc_correct_weight,
                nb_correct_weight,
            } => (mc_correct_weight, nb_correct_weight),
            Self::MajorityClass | Self::NaiveBayes => return,
        };

        if max_index(class_distribution) == class_val {
            *mc_correct_weight += weight;
        }
        let nb = naive_bayes_votes(instance, class_distribution, virtual_nodes);
        if max_index(&nb) == class_val {
            *nb_correct_weight += weight;
        }
    }

    pub fn reset(&mut self) {
        match self {
            Self::NaiveBayesAdaptive {
                mc_correct_weight,
                nb_correct_weight,
            }
            | Self::WeightedVote {
                mc_correct_weight,
                nb_correct_weight,
            } => {
                *mc_correct_weight = 0.0;
                *nb_correct_weight = 0.0;
            }
            Self::MajorityClass | Self::NaiveBayes => {}
        }
    }
}

/// `prior(c) * prod p(x_i | c)` over the attributes with a known value.
pub fn naive_bayes_votes(
    instance: &dyn Instance,
    class_distribution: &[f64],
    virtual_nodes: &[Option<Box<dyn VirtualNode>>],
) -> Vec<f64> {
    let total = sum(class_distribution);
    if total <= 0.0 {
        return class_distribution.to_vec();
    }

    (0..class_distribution.len())
        .map(|class_val| {
            let mut score = class_distribution[class_val] / total;
            for vn in virtual_nodes.iter().flatten() {
                let Some(value) = instance
                    .value_at_index(vn.attribute_index())
                    .filter(|v| !v.is_nan())
                else {
                    continue;
                };
                score *= vn
                    .observer()
                    .probability_of_attribute_value_given_class(value, class_val)
                    .unwrap_or(0.0);
            }
            score
        })
        .collect()
}
