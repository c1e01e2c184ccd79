mod learner_choice;
mod stream_choice;
mod task_choice;

pub use learner_choice::{LearnerChoice, LearnerKind};
pub use stream_choice::{DriftParameters, SeaParameters, StaggerParameters, StreamChoice, StreamKind};
pub use task_choice::{DumpFormat, PrequentialParams, TaskChoice, TaskKind};

use anyhow::{Context, Result};
use schemars::{JsonSchema, Schema};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::fmt::Display;
use std::str::FromStr;
use strum::{EnumMessage, IntoEnumIterator};

/// A tagged `type`/`params` enum that can be assembled from a kind name plus a
/// JSON object of parameters.
pub trait UIChoice: Sized + Serialize + DeserializeOwned + JsonSchema {
    type Kind: Copy + Display + FromStr + EnumMessage + IntoEnumIterator;

    fn schema() -> Schema {
        schemars::schema_for!(Self)
    }

    fn default_params(kind: Self::Kind) -> Result<Value>;

    fn from_parts(kind: Self::Kind, params: Value) -> Result<Self> {
        let tagged = json!({ "type": kind.to_string(), "params": params });
        serde_json::from_value(tagged).with_context(|| format!("invalid parameters for '{kind}'"))
    }

    fn describe_kinds() -> Vec<String> {
        Self::Kind::iter()
            .map(|k| match k.get_detailed_message() {
                Some(desc) => format!("{k:<20} {desc}"),
                None => k.to_string(),
            })
            .collect()
    }
}
