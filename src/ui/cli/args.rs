use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use serde_json::{Map, Value};

use crate::ui::types::choices::{
    DumpFormat, LearnerChoice, PrequentialParams, StreamChoice, TaskChoice, UIChoice,
};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Prequential runner for the IADEM incremental decision trees"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate a learner on a stream, test-then-train
    Run(RunArgs),
    /// Print the JSON schema of the learner or stream parameters
    Schema(SchemaArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemaTarget {
    Learner,
    Stream,
}

#[derive(Debug, Args)]
pub struct SchemaArgs {
    #[arg(value_enum)]
    pub target: SchemaTarget,
}

impl SchemaArgs {
    pub fn render(&self) -> Result<String> {
        let (schema, kinds) = match self.target {
            SchemaTarget::Learner => (LearnerChoice::schema(), LearnerChoice::describe_kinds()),
            SchemaTarget::Stream => (StreamChoice::schema(), StreamChoice::describe_kinds()),
        };
        let mut out = kinds.join("\n");
        out.push_str("\n\n");
        out.push_str(&serde_json::to_string_pretty(&schema)?);
        Ok(out)
    }
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Learner to use (iadem2, iadem3)
    #[arg(long, value_name = "LEARNER")]
    pub learner: String,

    /// Stream to consume (sea-generator, stagger-generator)
    #[arg(long, value_name = "STREAM")]
    pub stream: String,

    /// Stop after this many instances (omit for unlimited)
    #[arg(long, value_name = "N")]
    pub max_instances: Option<u64>,

    /// Stop after this many CPU seconds (omit for unlimited)
    #[arg(long, value_name = "SECONDS")]
    pub max_seconds: Option<u64>,

    /// Emit metrics every N instances
    #[arg(
        long,
        default_value_t = 100_000,
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub sample_frequency: u64,

    /// File to dump evaluation snapshots after completion
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub dump_file: Option<PathBuf>,

    /// Format for the dump file (csv, tsv, json)
    #[arg(long, value_name = "FORMAT")]
    pub dump_format: Option<String>,

    /// Override learner parameters (key=value, nested keys with dots)
    #[arg(long = "learner-param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub learner_params: Vec<KeyValue>,

    /// Override stream parameters (key=value, nested keys with dots)
    #[arg(long = "stream-param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub stream_params: Vec<KeyValue>,
}

#[derive(Clone, Debug)]
pub struct KeyValue {
    key: String,
    value: Value,
}

impl RunArgs {
    pub fn into_task_choice(self) -> Result<TaskChoice> {
        let learner = build_choice::<LearnerChoice>(&self.learner, &self.learner_params)
            .with_context(|| format!("invalid learner '{}'", self.learner))?;
        let stream = build_choice::<StreamChoice>(&self.stream, &self.stream_params)
            .with_context(|| format!("invalid stream '{}'", self.stream))?;

        let dump_format = match self.dump_format {
            Some(fmt) => {
                parse_dump_format(&fmt).with_context(|| format!("invalid dump format '{fmt}'"))?
            }
            None => DumpFormat::default(),
        };

        Ok(TaskChoice::EvaluatePrequential(PrequentialParams {
            learner,
            stream,
            max_instances: self.max_instances,
            max_seconds: self.max_seconds,
            sample_frequency: self.sample_frequency,
            dump_file: self.dump_file,
            dump_format,
        }))
    }
}

fn build_choice<C>(kind_input: &str, overrides: &[KeyValue]) -> Result<C>
where
    C: UIChoice,
    <C::Kind as FromStr>::Err: std::fmt::Display,
{
    let kind = parse_kind::<C::Kind>(kind_input)?;
    let mut params = C::default_params(kind)?;
    apply_overrides(&mut params, overrides)?;
    C::from_parts(kind, params)
}

fn parse_kind<T>(raw: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    candidate_spellings(raw)
        .iter()
        .find_map(|cand| cand.parse::<T>().ok())
        .ok_or_else(|| anyhow!("could not parse value '{raw}'"))
}

fn candidate_spellings(input: &str) -> Vec<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut out = vec![
        trimmed.to_string(),
        trimmed.to_lowercase(),
        kebab_from_token(trimmed),
        trimmed.replace('_', "-").to_lowercase(),
    ];
    out.sort();
    out.dedup();
    out
}

/// `SeaGenerator` and `sea_generator` both become `sea-generator`.
fn kebab_from_token(token: &str) -> String {
    let mut buf = String::new();
    let mut prev_lower = false;
    for ch in token.chars() {
        if ch.is_uppercase() {
            if prev_lower {
                buf.push('-');
            }
            buf.extend(ch.to_lowercase());
            prev_lower = false;
        } else if ch == '_' {
            buf.push('-');
            prev_lower = false;
        } else {
            buf.push(ch);
            prev_lower = ch.is_lowercase();
        }
    }
    buf
}

fn parse_dump_format(input: &str) -> Result<DumpFormat> {
    match input.trim().to_lowercase().as_str() {
        "csv" => Ok(DumpFormat::Csv),
        "tsv" => Ok(DumpFormat::Tsv),
        "json" => Ok(DumpFormat::Json),
        other => Err(anyhow!("unknown format '{other}'")),
    }
}

fn apply_overrides(target: &mut Value, overrides: &[KeyValue]) -> Result<()> {
    for kv in overrides {
        set_path(target, &kv.key, kv.value.clone())
            .with_context(|| format!("failed to set '{}'", kv.key))?;
    }
    Ok(())
}

fn set_path(target: &mut Value, path: &str, new_value: Value) -> Result<()> {
    let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
    let Some((last, parents)) = segments.split_last() else {
        bail!("empty key is not allowed");
    };

    let mut current = target;
    for seg in parents {
        current = as_object(current)?
            .entry((*seg).to_string())
            .or_insert(Value::Null);
    }
    as_object(current)?.insert((*last).to_string(), new_value);
    Ok(())
}

fn as_object(value: &mut Value) -> Result<&mut Map<String, Value>> {
    if value.is_null() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => Ok(map),
        other => bail!("cannot set nested field on non-object value: {other:?}"),
    }
}

fn parse_key_value(raw: &str) -> Result<KeyValue, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| "expected KEY=VALUE".to_string())?;
    let key = key.trim();
    if key.is_empty() {
        return Err("key cannot be empty".to_string());
    }

    Ok(KeyValue {
        key: key.to_string(),
        value: parse_literal(value.trim()),
    })
}

fn parse_literal(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
