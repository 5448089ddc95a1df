use std::path::{Path, PathBuf};

#[cfg(windows)]
const SYSTEM_PYTHON: &str = "python";
#[cfg(not(windows))]
const SYSTEM_PYTHON: &str = "python3";

/// Where the interpreter for the audit script came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpreterSource {
    Explicit,
    VirtualEnv,
    SystemPath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    pub path: PathBuf,
    pub source: InterpreterSource,
}

fn venv_bin_dir(venv_path: &Path) -> PathBuf {
    if cfg!(windows) {
        venv_path.join("Scripts")
    } else {
        venv_path.join("bin")
    }
}

fn venv_python(venv_path: &Path) -> PathBuf {
    let bin_dir = venv_bin_dir(venv_path);
    if cfg!(windows) {
        bin_dir.join("python.exe")
    } else {
        bin_dir.join("python")
    }
}

/// Pick the Python interpreter used to run the audit script.
///
/// An explicit path wins. Otherwise the active virtual environment's python is
/// used if it exists, falling back to the system python looked up on `PATH`
/// when the process is spawned.
pub fn resolve_interpreter(explicit: Option<&Path>, virtual_env: Option<&Path>) -> Interpreter {
    if let Some(path) = explicit {
        return Interpreter {
            path: path.to_path_buf(),
            source: InterpreterSource::Explicit,
        };
    }

    if let Some(venv) = virtual_env.filter(|p| !p.as_os_str().is_empty()) {
        let python = venv_python(venv);
        if python.exists() {
            return Interpreter {
                path: python,
                source: InterpreterSource::VirtualEnv,
            };
        }
        tracing::debug!(
            "VIRTUAL_ENV set but {} does not exist; using {}",
            python.display(),
            SYSTEM_PYTHON
        );
    }

    Interpreter {
        path: PathBuf::from(SYSTEM_PYTHON),
        source: InterpreterSource::SystemPath,
    }
}
