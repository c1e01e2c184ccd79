use crate::classifiers::Classifier;
use crate::core::instance_header::InstanceHeader;
use crate::evaluation::{LearningCurve, PerformanceEvaluator, Snapshot};
use crate::streams::Stream;
use std::collections::BTreeMap;
use std::io::{Error, ErrorKind};
use std::sync::Arc;
use std::sync::mpsc::Sender;

use cpu_time::ThreadTime;
use tracing::debug;

/// Test-then-train loop: every record is first scored by the learner and then
/// used to train it.
pub struct PrequentialEvaluator {
    learner: Box<dyn Classifier>,
    stream: Box<dyn Stream>,
    evaluator: Box<dyn PerformanceEvaluator>,

    curve: LearningCurve,

    max_instances: Option<u64>,
    max_seconds: Option<u64>,
    sample_frequency: u64,

    processed: u64,
    start_cpu: ThreadTime,
    progress_tx: Option<Sender<Snapshot>>,
}

impl PrequentialEvaluator {
    pub fn new(
        mut learner: Box<dyn Classifier>,
        stream: Box<dyn Stream>,
        evaluator: Box<dyn PerformanceEvaluator>,
        max_instances: Option<u64>,
        max_seconds: Option<u64>,
        sample_frequency: u64,
    ) -> Result<Self, Error> {
        if sample_frequency == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "sample_frequency must be > 0",
            ));
        }

        let header = stream.header();
        let header_arc = Arc::new(InstanceHeader::new(
            header.relation_name().to_string(),
            header.attributes.clone(),
            header.class_index(),
        ));
        learner.set_model_context(header_arc);

        Ok(Self {
            learner,
            stream,
            evaluator,
            curve: LearningCurve::default(),
            max_instances,
            max_seconds,
            sample_frequency,
            processed: 0,
            start_cpu: ThreadTime::now(),
            progress_tx: None,
        })
    }

    pub fn with_progress(mut self, tx: Sender<Snapshot>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn run(&mut self) -> Result<(), Error> {
        self.start_cpu = ThreadTime::now();

        while self.stream.has_more_instances() {
            if self.max_instances.is_some_and(|n| self.processed >= n) {
                break;
            }
            if self
                .max_seconds
                .is_some_and(|s| self.start_cpu.elapsed().as_secs() >= s)
            {
                break;
            }

            let Some(instance) = self.stream.next_instance() else {
                break;
            };
            self.processed += 1;

            let votes = self.learner.get_votes_for_instance(instance.as_ref());
            self.evaluator.add_result(instance.as_ref(), votes);
            self.learner
                .train_on_instance(instance.as_ref())
                .map_err(|e| {
                    Error::other(format!("learner failed on record {}: {e}", self.processed))
                })?;

            if self.processed % self.sample_frequency == 0 {
                self.push_snapshot();
            }
        }

        if self
            .curve
            .latest()
            .is_none_or(|s| s.instances_seen != self.processed)
        {
            self.push_snapshot();
        }
        debug!(processed = self.processed, "prequential run finished");
        Ok(())
    }

    pub fn curve(&self) -> &LearningCurve {
        &self.curve
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    fn push_snapshot(&mut self) {
        let mut accuracy = f64::NAN;
        let mut kappa = f64::NAN;
        let mut extras = BTreeMap::new();

        let measurements = self
            .evaluator
            .performance()
            .into_iter()
            .chain(self.learner.get_model_measurements());
        for m in measurements {
            match m.name.as_ref() {
                "accuracy" => accuracy = m.value,
                "kappa" => kappa = m.value,
                other => {
                    extras.insert(other.to_string(), m.value);
                }
            }
        }

        let snapshot = Snapshot {
            instances_seen: self.processed,
            accuracy,
            kappa,
            seconds: self.start_cpu.elapsed().as_secs_f64(),
            extras,
        };

        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(snapshot.clone());
        }
        self.curve.push(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::IademTree;
    use crate::classifiers::iadem::IademConfig;
    use crate::evaluation::{BasicClassificationEvaluator, BasicEstimator};
    use crate::streams::SeaGenerator;
    use crate::testing::{ClassifierNoneVotes, OracleClassifier, TrainSpyClassifier, VecStream};

    fn alternating(n: usize) -> Box<dyn Stream> {
        Box::new(VecStream::new((0..n).map(|i| i % 2).collect()))
    }

    fn evaluator() -> Box<dyn PerformanceEvaluator> {
        Box::new(BasicClassificationEvaluator::<BasicEstimator>::new(2))
    }

    fn oracle() -> Box<dyn Classifier> {
        Box::new(OracleClassifier::default())
    }

    #[test]
    fn zero_sample_frequency_is_rejected() {
        let err = PrequentialEvaluator::new(oracle(), alternating(10), evaluator(), None, None, 0)
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn periodic_and_final_snapshots() {
        let mut pq =
            PrequentialEvaluator::new(oracle(), alternating(105), evaluator(), None, None, 10)
                .unwrap();
        pq.run().unwrap();

        assert_eq!(pq.curve().len(), 11);
        let last = pq.curve().latest().unwrap();
        assert_eq!(last.instances_seen, 105);
        assert!(last.accuracy > 0.9999);
        assert!(last.kappa > 0.99);
        assert_eq!(last.extras.get("nodes"), Some(&105.0));
    }

    #[test]
    fn no_duplicate_final_snapshot_on_exact_multiple() {
        let mut pq =
            PrequentialEvaluator::new(oracle(), alternating(100), evaluator(), None, None, 10)
                .unwrap();
        pq.run().unwrap();
        assert_eq!(pq.curve().len(), 10);
    }

    #[test]
    fn stops_at_max_instances() {
        let mut pq =
            PrequentialEvaluator::new(oracle(), alternating(1000), evaluator(), Some(25), None, 5)
                .unwrap();
        pq.run().unwrap();

        assert_eq!(pq.curve().len(), 5);
        assert_eq!(pq.processed(), 25);
        assert_eq!(pq.curve().latest().unwrap().instances_seen, 25);
    }

    #[test]
    fn stops_immediately_when_time_is_zero() {
        let mut pq =
            PrequentialEvaluator::new(oracle(), alternating(100), evaluator(), None, Some(0), 10)
                .unwrap();
        pq.run().unwrap();

        assert_eq!(pq.curve().len(), 1);
        let last = pq.curve().latest().unwrap();
        assert_eq!(last.instances_seen, 0);
        assert!(last.accuracy.is_nan());
        assert_eq!(last.kappa, 0.0);
    }

    #[test]
    fn empty_votes_keep_metrics_undefined() {
        let l: Box<dyn Classifier> = Box::new(ClassifierNoneVotes);
        let mut pq =
            PrequentialEvaluator::new(l, alternating(20), evaluator(), None, None, 10).unwrap();
        pq.run().unwrap();

        let last = pq.curve().latest().unwrap();
        assert!(last.accuracy.is_nan());
        assert_eq!(last.kappa, 0.0);
    }

    #[test]
    fn trains_once_per_record() {
        let (spy, handle) = TrainSpyClassifier::new();
        let mut pq =
            PrequentialEvaluator::new(Box::new(spy), alternating(37), evaluator(), None, None, 10)
                .unwrap();
        pq.run().unwrap();
        assert_eq!(handle.count(), 37);
    }

    #[test]
    fn learner_errors_stop_the_run() {
        let (spy, handle) = TrainSpyClassifier::new();
        let mut pq = PrequentialEvaluator::new(
            Box::new(spy.failing_on(7)),
            alternating(37),
            evaluator(),
            None,
            None,
            10,
        )
        .unwrap();
        let err = pq.run().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert!(err.to_string().contains("record 7"));
        assert_eq!(handle.count(), 7);
    }

    #[test]
    fn iadem_tree_learns_sea() {
        let learner: Box<dyn Classifier> =
            Box::new(IademTree::new(IademConfig::default()).unwrap());
        let stream: Box<dyn Stream> =
            Box::new(SeaGenerator::new(1, false, 0.0, Some(5000), 42).unwrap());
        let mut pq =
            PrequentialEvaluator::new(learner, stream, evaluator(), None, None, 1000).unwrap();
        pq.run().unwrap();

        let last = pq.curve().latest().unwrap();
        assert_eq!(last.instances_seen, 5000);
        assert!(last.accuracy > 0.75, "accuracy {}", last.accuracy);
        assert!(last.extras.get("nodes").is_some_and(|n| *n >= 1.0));
    }
}
