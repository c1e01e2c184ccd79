use crate::error::{IademError, Result};
use crate::utils::math::ERROR_MARGIN;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::f64::consts::E;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

const BETA: f64 = 2.0;
const GAMMA: f64 = 2.0;

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
pub enum SplitCriterionKind {
    #[default]
    Entropy,
    EntropyLogE,
    WeightedEntropy,
    WeightedEntropyLogE,
    BetaBase2,
    BetaBaseE,
    GammaBase2,
    GammaBaseE,
    Gini,
    Misclassification,
}

impl SplitCriterionKind {
    pub fn from_name(name: &str) -> Result<Self> {
        Self::from_str(name).map_err(|_| {
            IademError::IllegalConfiguration(format!("unknown split criterion '{name}'"))
        })
    }

    pub fn measure(&self, values: &[f64]) -> Result<f64> {
        let p = normalized(values)?;
        let value = match self {
            Self::Entropy => entropy(&p, f64::log2),
            Self::EntropyLogE => entropy(&p, f64::ln),
            Self::WeightedEntropy => weighted_entropy(&p, f64::log2),
            Self::WeightedEntropyLogE => weighted_entropy(&p, f64::ln),
            Self::BetaBase2 => beta(&p, 2.0),
            Self::BetaBaseE => beta(&p, E),
            Self::GammaBase2 => gamma(&p, 2.0),
            Self::GammaBaseE => gamma(&p, E),
            Self::Gini => 1.0 - p.iter().map(|x| x * x).sum::<f64>(),
            Self::Misclassification => 1.0 - p.iter().copied().fold(0.0, f64::max),
        };
        Ok(value)
    }

    pub fn max_measure(&self, number_of_classes: usize) -> f64 {
        if number_of_classes <= 1 {
            return 0.0;
        }
        self.measure(&vec![1.0; number_of_classes]).unwrap_or(0.0)
    }

    /// `measure` scaled by the uniform-distribution value and clamped into `[0, 1]`.
    pub fn normalized_measure(&self, values: &[f64]) -> Result<f64> {
        let raw = self.measure(values)?;
        let max = self.max_measure(values.len());
        if max <= 0.0 {
            return Ok(0.0);
        }
        Ok((raw / max).clamp(0.0, 1.0))
    }
}

fn normalized(values: &[f64]) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(IademError::InvalidMeasureInput("empty distribution".into()));
    }
    if let Some(bad) = values
        .iter()
        .find(|v| !v.is_finite() || **v < -ERROR_MARGIN)
    {
        return Err(IademError::InvalidMeasureInput(format!(
            "distribution entry {bad} is negative or not finite"
        )));
    }
    let total: f64 = values.iter().map(|v| v.max(0.0)).sum();
    if total <= 0.0 {
        return Err(IademError::InvalidMeasureInput(
            "distribution sums to zero".into(),
        ));
    }
    Ok(values.iter().map(|v| v.max(0.0) / total).collect())
}

fn entropy(p: &[f64], log: fn(f64) -> f64) -> f64 {
    -p.iter()
        .filter(|&&x| x > 0.0)
        .map(|&x| x * log(x))
        .sum::<f64>()
}

fn weighted_entropy(p: &[f64], log: fn(f64) -> f64) -> f64 {
    -p.iter()
        .filter(|&&x| x > 0.0)
        .map(|&x| (1.0 - x) * x * log(x))
        .sum::<f64>()
}

fn beta(p: &[f64], base: f64) -> f64 {
    let sum: f64 = p.iter().map(|x| x.powf(BETA)).sum();
    (sum - 1.0) / (base.powf(1.0 - BETA) - 1.0)
}

fn gamma(p: &[f64], base: f64) -> f64 {
    let sum: f64 = p.iter().map(|x| x.powf(1.0 / GAMMA)).sum();
    (sum.powf(GAMMA) - 1.0) / (base.powf(GAMMA - 1.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9
    }

    #[test]
    fn entropy_of_fair_coin_is_one_bit() {
        let kind = SplitCriterionKind::Entropy;
        assert!(approx_eq(kind.measure(&[5.0, 5.0]).unwrap(), 1.0));
        assert!(approx_eq(
            SplitCriterionKind::EntropyLogE.measure(&[1.0, 1.0]).unwrap(),
            2f64.ln()
        ));
    }

    #[test]
    fn pure_distributions_have_zero_impurity() {
        for kind in SplitCriterionKind::iter() {
            let m = kind.measure(&[0.0, 7.0, 0.0]).unwrap();
            assert!(approx_eq(m, 0.0), "{kind}: {m}");
        }
    }

    #[test]
    fn uniform_is_the_normalized_maximum() {
        for kind in SplitCriterionKind::iter() {
            assert!(approx_eq(kind.normalized_measure(&[2.0, 2.0, 2.0]).unwrap(), 1.0));
            let skewed = kind.normalized_measure(&[8.0, 1.0, 1.0]).unwrap();
            assert!((0.0..1.0).contains(&skewed), "{kind}: {skewed}");
        }
    }

    #[test]
    fn closed_forms_for_two_classes() {
        let p = [0.25, 0.75];
        assert!(approx_eq(SplitCriterionKind::Gini.measure(&p).unwrap(), 0.375));
        assert!(approx_eq(SplitCriterionKind::Misclassification.measure(&p).unwrap(), 0.25));
        assert!(approx_eq(SplitCriterionKind::BetaBase2.measure(&p).unwrap(), 0.75));
        let gamma2 = (0.25f64.sqrt() + 0.75f64.sqrt()).powi(2) - 1.0;
        assert!(approx_eq(SplitCriterionKind::GammaBase2.measure(&p).unwrap(), gamma2));
    }

    #[test]
    fn rejects_invalid_inputs() {
        let kind = SplitCriterionKind::Gini;
        assert!(matches!(kind.measure(&[]), Err(IademError::InvalidMeasureInput(_))));
        assert!(matches!(kind.measure(&[0.0, 0.0]), Err(IademError::InvalidMeasureInput(_))));
        assert!(matches!(kind.measure(&[1.0, -0.5]), Err(IademError::InvalidMeasureInput(_))));
        assert!(kind.measure(&[1.0, -1e-12]).is_ok());
    }

    #[test]
    fn names_round_trip_through_strum() {
        assert_eq!(
            SplitCriterionKind::from_name("beta-base2").unwrap(),
            SplitCriterionKind::BetaBase2
        );
        assert_eq!(SplitCriterionKind::EntropyLogE.to_string(), "entropy-log-e");
        assert!(matches!(
            SplitCriterionKind::from_name("chi-square"),
            Err(IademError::IllegalConfiguration(_))
        ));
    }
}
