use std::time::Duration;

use crate::{
    Result,
    bitvec::Width,
    solver::{Session, SolverChoice},
};

/// Width used when none is given.
pub const DEFAULT_WIDTH: usize = 4;

/// Everything needed to run one adder equivalence check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckConfig {
    pub width: Width,
    /// Solver time budget per query, no limit if `None`.
    pub timeout: Option<Duration>,
    pub solver: SolverChoice,
}

impl CheckConfig {
    /// Default configuration on `width` bits, failing if the width is not supported.
    pub fn new(width: usize) -> Result<Self> {
        Ok(CheckConfig {
            width: Width::new(width)?,
            ..Default::default()
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_solver(mut self, solver: SolverChoice) -> Self {
        self.solver = solver;
        self
    }

    /// Opens a solver session with this configuration's solver and time budget.
    pub fn open_session(&self) -> Result<Session> {
        Ok(self.solver.open(self.timeout)?)
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::*;
    use crate::{Error, error::ConstructionError, solver::SolverError};

    #[test]
    fn default_config_test() {
        let config = CheckConfig::default();
        assert_eq!(config.width.get(), DEFAULT_WIDTH);
        assert_eq!(config.timeout, None);
        assert_eq!(config.solver, SolverChoice::Varisat);
    }

    #[test]
    fn new_config_test() {
        let config = CheckConfig::new(8)
            .unwrap()
            .with_timeout(Duration::from_millis(10));
        assert_eq!(config.width.get(), 8);
        assert_eq!(config.timeout, Some(Duration::from_millis(10)));

        assert!(matches!(
            CheckConfig::new(0),
            Err(Error::Construction(ConstructionError::InvalidWidth(0)))
        ));
        assert!(matches!(
            CheckConfig::new(65),
            Err(Error::Construction(ConstructionError::InvalidWidth(65)))
        ));
    }

    #[test]
    fn open_session_test() {
        let session = CheckConfig::default()
            .with_timeout(Duration::from_secs(1))
            .open_session()
            .unwrap();
        assert_eq!(session.backend_name(), "varisat");
        assert_eq!(session.timeout(), Some(Duration::from_secs(1)));

        let missing = CheckConfig::default()
            .with_solver(SolverChoice::Dimacs(PathBuf::from("/nonexistent/kissat")));
        assert!(matches!(
            missing.open_session(),
            Err(Error::Solver(SolverError::Unavailable(_)))
        ));
    }
}
