use crate::evaluation::Snapshot;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Error, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

#[derive(Debug, Clone, Default)]
pub struct LearningCurve {
    snapshots: Vec<Snapshot>,
}

impl LearningCurve {
    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn export(&self, path: &Path, format: CurveFormat) -> Result<(), Error> {
        let mut out = BufWriter::new(File::create(path)?);
        match format {
            CurveFormat::Csv => self.write_delimited(&mut out, ',')?,
            CurveFormat::Tsv => self.write_delimited(&mut out, '\t')?,
            CurveFormat::Json => {
                serde_json::to_writer_pretty(&mut out, &self.snapshots).map_err(Error::other)?;
                writeln!(out)?;
            }
        }
        out.flush()
    }

    fn write_delimited<W: Write>(&self, out: &mut W, sep: char) -> Result<(), Error> {
        let first = self.snapshots.first();
        let mut extra_keys: Vec<String> = first
            .map(|s| s.ordered_extras().map(|(k, _)| k.to_string()).collect())
            .unwrap_or_default();
        let listed: BTreeSet<String> = extra_keys.iter().cloned().collect();
        let late: BTreeSet<&String> = self
            .snapshots
            .iter()
            .flat_map(|s| s.extras.keys())
            .filter(|k| !listed.contains(*k))
            .collect();
        extra_keys.extend(late.into_iter().cloned());

        let mut header = vec![
            "instances_seen".to_string(),
            "accuracy".to_string(),
            "kappa".to_string(),
            "seconds".to_string(),
        ];
        header.extend(extra_keys.iter().cloned());
        writeln!(out, "{}", header.join(&sep.to_string()))?;

        for s in &self.snapshots {
            let mut row = vec![
                s.instances_seen.to_string(),
                Snapshot::fmtv(s.accuracy),
                Snapshot::fmtv(s.kappa),
                format!("{:.6}", s.seconds),
            ];
            row.extend(
                extra_keys
                    .iter()
                    .map(|k| s.extras.get(k).map(|v| Snapshot::fmtv(*v)).unwrap_or_default()),
            );
            writeln!(out, "{}", row.join(&sep.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;

    fn snapshot(seen: u64, nodes: f64) -> Snapshot {
        let mut extras = BTreeMap::new();
        extras.insert("nodes".to_string(), nodes);
        Snapshot {
            instances_seen: seen,
            accuracy: 0.75,
            kappa: 0.5,
            seconds: 1.0,
            extras,
        }
    }

    fn curve() -> LearningCurve {
        let mut c = LearningCurve::default();
        c.push(snapshot(100, 1.0));
        c.push(snapshot(200, 3.0));
        c
    }

    #[test]
    fn keeps_order_and_latest() {
        let c = curve();
        assert_eq!(c.len(), 2);
        assert_eq!(c.latest().map(|s| s.instances_seen), Some(200));
        assert!(LearningCurve::default().latest().is_none());
    }

    #[test]
    fn exports_csv_and_tsv() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("curve.csv");
        curve().export(&csv, CurveFormat::Csv).unwrap();
        let text = fs::read_to_string(&csv).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "instances_seen,accuracy,kappa,seconds,nodes");
        assert_eq!(lines[2], "200,0.750000,0.500000,1.000000,3");

        let tsv = dir.path().join("curve.tsv");
        curve().export(&tsv, CurveFormat::Tsv).unwrap();
        let text = fs::read_to_string(&tsv).unwrap();
        assert!(text.starts_with("instances_seen\taccuracy\tkappa\tseconds\tnodes\n"));
    }

    #[test]
    fn exports_json_with_flattened_extras() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve.json");
        curve().export(&path, CurveFormat::Json).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["instances_seen"], 100);
        assert_eq!(rows[1]["nodes"], 3.0);
    }
}
