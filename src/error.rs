//! Error types for u-ibea.
//!
//! Every error is unrecoverable for the current run: the runner aborts and
//! returns a [`RunError`] carrying the generation and evaluation count at
//! the point of failure.

use thiserror::Error;

/// Raised by a [`Problem`](crate::ibea::Problem) when a solution cannot be
/// evaluated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluationError {
    /// A decision variable lies outside its declared bounds.
    #[error("variable {index} = {value} is outside bounds [{min}, {max}]")]
    OutOfBounds {
        index: usize,
        value: f64,
        min: f64,
        max: f64,
    },

    /// The variable vector has the wrong length.
    #[error("expected {expected} variables, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Problem-specific failure.
    #[error("{0}")]
    Failed(String),
}

/// Raised by mating selection operators.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SelectionError {
    /// A candidate has no `fitness` attribute.
    #[error("solution {index} has no fitness attribute")]
    MissingFitness { index: usize },

    /// Every candidate has zero fitness, so no candidate can be accepted.
    #[error("all {population} candidates have zero fitness")]
    ZeroFitness { population: usize },

    /// Rejection sampling did not accept a candidate within the retry cap.
    #[error("no candidate accepted after {attempts} attempts")]
    Exhausted { attempts: usize },
}

/// Top-level error for IBEA operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IbeaError {
    /// Invalid parameters.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Environmental selection asked to keep more solutions than it holds.
    #[error("truncation target {target} exceeds working set size {available}")]
    TruncationTarget { target: usize, available: usize },

    /// Objective evaluation failed.
    #[error("evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),

    /// Mating selection could not make progress.
    #[error("degenerate selection: {0}")]
    Selection(#[from] SelectionError),
}

/// An [`IbeaError`] annotated with where in the run it happened.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("run aborted at generation {generation} after {evaluations} evaluations: {source}")]
pub struct RunError {
    /// Generation in progress when the error occurred (0 = initialization).
    pub generation: usize,

    /// Evaluations completed before the error.
    pub evaluations: usize,

    /// The underlying error.
    #[source]
    pub source: IbeaError,
}

impl RunError {
    pub(crate) fn new(generation: usize, evaluations: usize, source: impl Into<IbeaError>) -> Self {
        Self {
            generation,
            evaluations,
            source: source.into(),
        }
    }
}
