// ---------------------------------
// Solver status type
// ---------------------------------

/// Status of solver at termination

#[repr(u32)]
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverStatus {
    /// Problem is not solved (solver hasn't run).
    #[default]
    Unsolved,
    /// Solver terminated with a solution.
    Solved,
    /// Problem appears primal or dual infeasible.  No certificate is returned.
    Infeasible,
    /// Iteration limit reached before the loss was driven to zero.
    MaxIterations,
    /// Time limit reached before the loss was driven to zero.
    MaxTime,
    /// Solver terminated with a numerical error
    NumericalError,
    /// An inner solve or line search stopped making progress.
    InsufficientProgress,
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
