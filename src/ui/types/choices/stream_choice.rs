use crate::ui::types::choices::UIChoice;
use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

const DEFAULT_SEED: u64 = 42;
fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_sea_function() -> u8 {
    1
}

fn default_stagger_function() -> u8 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DriftParameters {
    #[schemars(title = "Drift At", description = "Records produced before the switch")]
    pub at: u64,

    #[schemars(title = "Drift Function", description = "Function used after the switch", range(min = 1))]
    pub function_id: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SeaParameters {
    #[serde(default = "default_sea_function")]
    #[schemars(
        title = "Function",
        description = "Classification SEA Function used (1-4)",
        range(min = 1, max = 4),
        default = "default_sea_function"
    )]
    pub function_id: u8,

    #[serde(default)]
    #[schemars(title = "Balance", description = "Balance classes during generation?")]
    pub balance: bool,

    #[serde(default)]
    #[schemars(
        title = "Noise",
        description = "Fraction of labels flipped (0.0-1.0)",
        range(min = 0.0, max = 1.0)
    )]
    pub noise_pct: f64,

    #[serde(default)]
    #[schemars(title = "Max Instances", description = "Upper bound on records; empty = infinite")]
    pub max_instances: Option<u64>,

    #[serde(default)]
    #[schemars(title = "Drift", description = "Optional abrupt concept change")]
    pub drift: Option<DriftParameters>,

    #[serde(default = "default_seed")]
    #[schemars(title = "Seed", description = "PRNG seed", default = "default_seed")]
    pub seed: u64,
}

impl Default for SeaParameters {
    fn default() -> Self {
        Self {
            function_id: default_sea_function(),
            balance: false,
            noise_pct: 0.0,
            max_instances: None,
            drift: None,
            seed: DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StaggerParameters {
    #[serde(default = "default_stagger_function")]
    #[schemars(
        title = "Function",
        description = "STAGGER concept (1-3)",
        range(min = 1, max = 3),
        default = "default_stagger_function"
    )]
    pub function_id: u8,

    #[serde(default)]
    #[schemars(title = "Balance", description = "Balance classes during generation?")]
    pub balance: bool,

    #[serde(default)]
    #[schemars(title = "Max Instances", description = "Upper bound on records; empty = infinite")]
    pub max_instances: Option<u64>,

    #[serde(default)]
    #[schemars(title = "Drift", description = "Optional abrupt concept change")]
    pub drift: Option<DriftParameters>,

    #[serde(default = "default_seed")]
    #[schemars(title = "Seed", description = "PRNG seed", default = "default_seed")]
    pub seed: u64,
}

impl Default for StaggerParameters {
    fn default() -> Self {
        Self {
            function_id: default_stagger_function(),
            balance: false,
            max_instances: None,
            drift: None,
            seed: DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(StreamKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum StreamChoice {
    #[strum_discriminants(strum(
        message = "SEA Generator",
        detailed_message = "Generates SEA concept functions."
    ))]
    SeaGenerator(SeaParameters),

    #[strum_discriminants(strum(
        message = "STAGGER Generator",
        detailed_message = "Generates STAGGER concepts over size, color and shape."
    ))]
    StaggerGenerator(StaggerParameters),
}

impl UIChoice for StreamChoice {
    type Kind = StreamKind;

    fn default_params(kind: Self::Kind) -> Result<Value> {
        Ok(match kind {
            StreamKind::SeaGenerator => serde_json::to_value(SeaParameters::default())?,
            StreamKind::StaggerGenerator => serde_json::to_value(StaggerParameters::default())?,
        })
    }
}
