// Domain model exports
pub mod domain;

pub use domain::{
    week_start_of, Assignment, AssignmentStatus, Member, PairScore, PairingConfig,
    PairingConfigError, ScoreWeights,
};
