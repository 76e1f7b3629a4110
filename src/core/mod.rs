// Core algorithm exports
pub mod engine;
pub mod hungarian;
pub mod matrix;
pub mod scoring;
pub mod validator;

pub use engine::{EngineError, PairingEngine};
pub use hungarian::{solve, SolveError};
pub use matrix::{build_cost_matrix, CostMatrix, MatrixError, SELF_PAIR_COST};
pub use scoring::score_pair;
pub use validator::{validate_batch, Diagnostic, DiagnosticKind};
