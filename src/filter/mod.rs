mod fir;
mod lms;

pub use fir::{fir_filter, FirFilter};
pub use lms::{
    lms, lms_update, run, AdaptiveOutput, LmsConfig, LmsFilter, LmsOutput, StepRule,
    WeightTrajectory, DEFAULT_EPSILON,
};
