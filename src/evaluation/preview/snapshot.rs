use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Model measurements shown first, in this order, when present.
pub const MODEL_COLUMNS: &[&str] = &[
    "nodes",
    "leaves",
    "internal_nodes",
    "splits_by_breaking_ties",
    "interchanged_trees",
    "deleted_trees",
    "pruned_subtrees",
];

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub instances_seen: u64,
    pub accuracy: f64,
    pub kappa: f64,
    pub seconds: f64,
    #[serde(flatten)]
    pub extras: BTreeMap<String, f64>,
}

impl Snapshot {
    #[inline]
    pub(crate) fn fmtv(v: f64) -> String {
        if v.is_nan() {
            "NaN".into()
        } else if v.fract() == 0.0 && v.abs() < 1e15 {
            format!("{}", v as i64)
        } else {
            format!("{:.6}", v)
        }
    }

    pub fn ordered_extras(&self) -> impl Iterator<Item = (&str, f64)> {
        let known = MODEL_COLUMNS
            .iter()
            .filter_map(|k| self.extras.get(*k).map(|v| (*k, *v)));
        let rest = self
            .extras
            .iter()
            .filter(|(k, _)| !MODEL_COLUMNS.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), *v));
        known.chain(rest)
    }
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "seen={}, acc={}, kappa={}, t={:.6}s",
            self.instances_seen,
            Self::fmtv(self.accuracy),
            Self::fmtv(self.kappa),
            self.seconds
        )?;
        for (k, v) in self.ordered_extras() {
            write!(f, ", {}={}", k, Self::fmtv(v))?;
        }
        Ok(())
    }
}
