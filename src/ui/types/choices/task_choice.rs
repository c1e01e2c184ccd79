use crate::evaluation::CurveFormat;
use crate::ui::types::choices::{LearnerChoice, StreamChoice, UIChoice};
use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::PathBuf;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DumpFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl From<DumpFormat> for CurveFormat {
    fn from(value: DumpFormat) -> Self {
        match value {
            DumpFormat::Csv => CurveFormat::Csv,
            DumpFormat::Tsv => CurveFormat::Tsv,
            DumpFormat::Json => CurveFormat::Json,
        }
    }
}

fn default_sample_frequency() -> u64 {
    100_000
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PrequentialParams {
    #[schemars(skip)]
    pub learner: LearnerChoice,
    #[schemars(skip)]
    pub stream: StreamChoice,

    #[serde(default)]
    #[schemars(
        title = "Max Instances",
        description = "Stop after this many instances (None = unlimited)"
    )]
    pub max_instances: Option<u64>,

    #[serde(default)]
    #[schemars(
        title = "Max Seconds",
        description = "Stop after this many CPU seconds (None = unlimited)"
    )]
    pub max_seconds: Option<u64>,

    #[serde(default = "default_sample_frequency")]
    #[schemars(
        title = "Sample Frequency",
        description = "Emit metrics every N instances",
        range(min = 1)
    )]
    pub sample_frequency: u64,

    #[serde(default)]
    #[schemars(
        with = "String",
        title = "Dump file",
        description = "If set, write all snapshots at the end to this file",
        extend("format" = "path", "x-file" = true, "x-must-exist" = false)
    )]
    pub dump_file: Option<PathBuf>,

    #[serde(default)]
    #[schemars(title = "Dump format", description = "csv / tsv / json (default: csv)")]
    pub dump_format: DumpFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(TaskKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum TaskChoice {
    #[strum_discriminants(strum(
        message = "Evaluate Prequential",
        detailed_message = "Interleave test-then-train with periodic reporting."
    ))]
    EvaluatePrequential(PrequentialParams),
}

impl UIChoice for TaskChoice {
    type Kind = TaskKind;

    /// Only the run limits; learner and stream are supplied separately.
    fn default_params(kind: Self::Kind) -> Result<Value> {
        Ok(match kind {
            TaskKind::EvaluatePrequential => json!({
                "max_instances": null,
                "max_seconds": null,
                "sample_frequency": default_sample_frequency(),
                "dump_file": null,
                "dump_format": "csv"
            }),
        })
    }
}
