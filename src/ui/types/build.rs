use crate::classifiers::{Classifier, IademTree};
use crate::evaluation::{BasicClassificationEvaluator, BasicEstimator, PerformanceEvaluator};
use crate::streams::{SeaGenerator, StaggerGenerator, Stream};
use crate::ui::types::choices::{LearnerChoice, StreamChoice};
use anyhow::{Context, Result};

pub fn build_learner(choice: LearnerChoice) -> Result<Box<dyn Classifier>> {
    let tree = match choice {
        LearnerChoice::Iadem2(config) => IademTree::new(config).context("invalid IADEM-2 settings")?,
        LearnerChoice::Iadem3(params) => {
            let adaptive = params
                .adaptive_config()
                .context("invalid IADEM-3 drift settings")?;
            IademTree::new_adaptive(params.tree, adaptive).context("invalid IADEM-3 settings")?
        }
    };
    Ok(Box::new(tree))
}

pub fn build_stream(choice: StreamChoice) -> Result<Box<dyn Stream>> {
    match choice {
        StreamChoice::SeaGenerator(p) => {
            let mut g = SeaGenerator::new(
                p.function_id,
                p.balance,
                p.noise_pct,
                p.max_instances,
                p.seed,
            )?;
            if let Some(drift) = p.drift {
                g = g.with_drift(drift.at, drift.function_id)?;
            }
            Ok(Box::new(g))
        }
        StreamChoice::StaggerGenerator(p) => {
            let mut g = StaggerGenerator::new(p.function_id, p.balance, p.max_instances, p.seed)?;
            if let Some(drift) = p.drift {
                g = g.with_drift(drift.at, drift.function_id)?;
            }
            Ok(Box::new(g))
        }
    }
}

pub fn build_evaluator(stream: &dyn Stream) -> Box<dyn PerformanceEvaluator> {
    let classes = stream.header().number_of_classes();
    Box::new(BasicClassificationEvaluator::<BasicEstimator>::new(classes))
}
