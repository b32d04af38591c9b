use std::{
    env,
    io::{Read, Write},
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use log::{debug, warn};

use super::{Model, SatBackend, SatResult, SolverError, expired};
use crate::cnf::Cnf;

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Backend running an external SAT solver executable (kissat, cadical, minisat, ...).
///
/// The CNF is written to a temporary DIMACS file given as the only argument of the solver, and its
/// standard output is parsed following the SAT competition format:
/// `s SATISFIABLE` / `s UNSATISFIABLE` / `s UNKNOWN` and `v ...` lines for the model.
#[derive(Debug, Clone)]
pub struct DimacsBackend {
    executable: PathBuf,
}

/// Finds `name` in the directories of the `PATH` environment variable.
fn find_executable(name: &Path) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

impl DimacsBackend {
    /// Uses `executable` as is if it is a path, else searches the `PATH` for it.
    pub fn locate(executable: &Path) -> Result<Self, SolverError> {
        let resolved = if executable.components().count() > 1 {
            executable.is_file().then(|| executable.to_path_buf())
        } else {
            find_executable(executable)
        };
        match resolved {
            Some(executable) => {
                debug!("using external SAT solver {}", executable.display());
                Ok(DimacsBackend { executable })
            }
            None => Err(SolverError::Unavailable(format!(
                "cannot find SAT solver executable {}",
                executable.display()
            ))),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

/// Kills the solver process when dropped, unless it already exited.
struct ChildGuard(Child);

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Ok(None) = self.0.try_wait() {
            let _ = self.0.kill();
            let _ = self.0.wait();
        }
    }
}

/// Parses the standard output of a SAT competition compliant solver.
pub(crate) fn parse_solver_output(stdout: &str) -> SatResult {
    let mut status = None;
    let mut model = Vec::new();
    for line in stdout.lines() {
        let line = line.trim();
        if let Some(s) = line.strip_prefix("s ") {
            status = Some(s.trim().to_string());
        } else if let Some(values) = line.strip_prefix("v ") {
            model.extend(values.split_whitespace().filter_map(|v| v.parse::<i64>().ok()));
        }
    }
    match status.as_deref() {
        Some("SATISFIABLE") => SatResult::Sat(Model::from_dimacs(model)),
        Some("UNSATISFIABLE") => SatResult::Unsat,
        Some(other) => SatResult::Unknown(format!("solver answered {}", other)),
        None => SatResult::Unknown("no status line in solver output".to_string()),
    }
}

impl SatBackend for DimacsBackend {
    fn name(&self) -> &str {
        "dimacs"
    }

    fn solve(&mut self, cnf: &Cnf, deadline: Option<Instant>) -> Result<SatResult, SolverError> {
        if expired(deadline) {
            return Ok(SatResult::Unknown(
                "time budget exhausted before solving".to_string(),
            ));
        }

        let mut file = tempfile::Builder::new()
            .prefix("carrycheck-")
            .suffix(".cnf")
            .tempfile()?;
        file.write_all(cnf.to_dimacs().as_bytes())?;
        file.flush()?;

        let child = Command::new(&self.executable)
            .arg(file.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                SolverError::Unavailable(format!(
                    "cannot run {}: {}",
                    self.executable.display(),
                    e
                ))
            })?;
        let mut child = ChildGuard(child);

        // Reading on another thread so a verbose solver never blocks on a full pipe
        let mut stdout = child
            .0
            .stdout
            .take()
            .ok_or_else(|| SolverError::Failed("solver stdout not captured".to_string()))?;
        let reader = thread::spawn(move || {
            let mut out = String::new();
            stdout.read_to_string(&mut out).map(|_| out)
        });

        // Early returns leave the child to the guard, which kills it
        loop {
            if child.0.try_wait()?.is_some() {
                break;
            }
            if expired(deadline) {
                warn!(
                    "{} did not answer before the deadline, killing it",
                    self.executable.display()
                );
                child.0.kill()?;
                child.0.wait()?;
                return Ok(SatResult::Unknown("timeout".to_string()));
            }
            thread::sleep(POLL_INTERVAL);
        }

        let stdout = reader
            .join()
            .map_err(|_| SolverError::Failed("solver output reader panicked".to_string()))??;
        Ok(parse_solver_output(&stdout))
    }
}
