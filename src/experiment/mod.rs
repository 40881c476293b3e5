// A/B experiment assessment: assumption checks, test selection, decision.
//
// The pipeline is strictly linear (spec'd by the experiment procedure, not
// by code structure): normality per arm, homogeneity across arms, then one
// comparison test chosen by the normality outcome alone. Homogeneity is
// always computed and always reported, even when the non-parametric branch
// makes it irrelevant to the selected test.

mod config;
mod verdict;

pub use config::ExperimentConfig;
pub use verdict::{
    assess_experiment, ComparisonTest, Decision, ExperimentAssessment, HomogeneityVerdict,
    NormalityVerdict,
};
